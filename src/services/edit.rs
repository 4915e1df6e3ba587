// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Popup edit state.
//!
//! Only one marker popup can be in edit mode at a time. Which one is recorded
//! as `editing_id` on the [`FootprintStore`]; this module keeps the staged
//! title/description for it until they are saved or discarded.

use crate::error::FootprintError;
use crate::models::FootprintPatch;
use crate::services::store::FootprintStore;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Per-marker popup mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupMode {
    Viewing,
    Editing,
}

/// Field values typed into the popup but not yet sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StagedEdit {
    pub footprint_id: String,
    pub title: String,
    /// `None` when the field is blank
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PopupEditor {
    staged: Option<StagedEdit>,
}

impl PopupEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter edit mode for `id`, seeding the staged fields from the stored row.
    ///
    /// If another marker was being edited, its staged fields are discarded.
    pub fn begin(
        &mut self,
        store: &mut FootprintStore,
        id: &str,
    ) -> Result<&StagedEdit, FootprintError> {
        let footprint = store
            .get(id)
            .ok_or_else(|| FootprintError::UnknownFootprint(id.to_string()))?;

        let staged = StagedEdit {
            footprint_id: footprint.id.clone(),
            title: footprint.title.clone(),
            description: footprint.description.clone(),
        };

        if let Some(previous) = store.editing_id() {
            if previous != id {
                tracing::debug!(
                    previous = %previous,
                    next = %id,
                    "Switching edit target, discarding staged edits"
                );
            }
        }

        store.set_editing(id);
        Ok(&*self.staged.insert(staged))
    }

    /// Staged fields for the current edit target, if any.
    ///
    /// Returns `None` when the store no longer points at the staged footprint
    /// (it was deleted or vanished on reload).
    pub fn staged<'a>(&'a self, store: &FootprintStore) -> Option<&'a StagedEdit> {
        let editing = store.editing_id()?;
        self.staged
            .as_ref()
            .filter(|staged| staged.footprint_id == editing)
    }

    pub fn mode(&self, store: &FootprintStore, id: &str) -> PopupMode {
        match self.staged(store) {
            Some(staged) if staged.footprint_id == id => PopupMode::Editing,
            _ => PopupMode::Viewing,
        }
    }

    /// Change staged fields. Nothing is sent to the backend.
    ///
    /// A blank description stages "no description".
    pub fn stage(
        &mut self,
        store: &FootprintStore,
        title: Option<String>,
        description: Option<String>,
    ) -> Result<&StagedEdit, FootprintError> {
        if self.staged(store).is_none() {
            return Err(FootprintError::NotEditing);
        }
        let staged = self.staged.as_mut().ok_or(FootprintError::NotEditing)?;

        if let Some(title) = title {
            staged.title = title;
        }
        if let Some(description) = description {
            staged.description = Some(description).filter(|d| !d.trim().is_empty());
        }
        Ok(&*staged)
    }

    /// Leave edit mode, discarding staged fields.
    pub fn cancel(&mut self, store: &mut FootprintStore) {
        self.staged = None;
        store.clear_editing();
    }

    /// The update that saving would send: `(footprint id, patch)`.
    ///
    /// Only fields that differ from the stored row are included, so the
    /// patch is empty if nothing was changed.
    pub fn pending(
        &self,
        store: &FootprintStore,
    ) -> Result<(String, FootprintPatch), FootprintError> {
        let staged = self.staged(store).ok_or(FootprintError::NotEditing)?;
        let stored = store
            .get(&staged.footprint_id)
            .ok_or(FootprintError::NotEditing)?;

        let patch = FootprintPatch {
            title: (staged.title != stored.title).then(|| staged.title.clone()),
            description: (staged.description != stored.description)
                .then(|| staged.description.clone()),
            ..Default::default()
        };
        Ok((staged.footprint_id.clone(), patch))
    }
}
