// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client-side footprint list.
//!
//! Holds the session user's footprints newest first, plus the id of the one
//! marker whose popup is in edit mode. The list is a projection of the remote
//! table: it only changes in response to confirmed backend results.

use crate::models::{Footprint, FootprintPatch};

#[derive(Debug, Clone, Default)]
pub struct FootprintStore {
    footprints: Vec<Footprint>,
    editing_id: Option<String>,
}

impl FootprintStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents with a freshly fetched list (already newest first).
    ///
    /// Drops the edit target if its footprint is no longer present.
    pub fn load(&mut self, footprints: Vec<Footprint>) {
        self.footprints = footprints;
        if let Some(id) = &self.editing_id {
            if !self.contains(id) {
                self.editing_id = None;
            }
        }
    }

    /// Prepend a confirmed row.
    pub fn insert(&mut self, footprint: Footprint) -> &Footprint {
        self.footprints.insert(0, footprint);
        &self.footprints[0]
    }

    /// Apply `patch` to the footprint with `id` in place.
    ///
    /// Returns `None` (and changes nothing) if the id is unknown. Confirmed
    /// backend updates go through [`replace`](Self::replace) instead, since the
    /// returned row also carries backend-stamped fields like `updated_at`.
    pub fn update(&mut self, id: &str, patch: &FootprintPatch) -> Option<&Footprint> {
        let footprint = self.footprints.iter_mut().find(|f| f.id == id)?;
        patch.apply_to(footprint);
        Some(&*footprint)
    }

    /// Swap in the row the backend returned for an existing entry.
    ///
    /// Unknown ids are ignored; the position in the list is kept.
    pub fn replace(&mut self, row: Footprint) -> bool {
        match self.footprints.iter_mut().find(|f| f.id == row.id) {
            Some(slot) => {
                *slot = row;
                true
            }
            None => false,
        }
    }

    /// Remove the footprint with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.footprints.len();
        self.footprints.retain(|f| f.id != id);
        if self.editing_id.as_deref() == Some(id) {
            self.editing_id = None;
        }
        self.footprints.len() != before
    }

    pub fn get(&self, id: &str) -> Option<&Footprint> {
        self.footprints.iter().find(|f| f.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn footprints(&self) -> &[Footprint] {
        &self.footprints
    }

    pub fn len(&self) -> usize {
        self.footprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.footprints.is_empty()
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    /// Point the single edit target at `id`. Unknown ids are refused.
    pub fn set_editing(&mut self, id: &str) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.editing_id = Some(id.to_string());
        true
    }

    pub fn clear_editing(&mut self) {
        self.editing_id = None;
    }

    pub fn clear(&mut self) {
        self.footprints.clear();
        self.editing_id = None;
    }
}
