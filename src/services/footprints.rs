// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Footprint commands for one signed-in user.
//!
//! Each command talks to the backend first and touches the store only after
//! the backend confirmed the write. A failed write leaves the store exactly
//! as it was and is reported to the caller; a failed load keeps the previous
//! list and only marks it stale.

use crate::error::{FootprintError, WriteAction};
use crate::models::{Coordinates, Footprint, FootprintPatch, Session};
use crate::services::edit::{PopupEditor, PopupMode, StagedEdit};
use crate::services::map_click::MapClickAdapter;
use crate::services::session::SessionContext;
use crate::services::store::FootprintStore;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, OwnedMutexGuard};
use validator::Validate;

/// How long an unused view is kept before it is dropped.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

pub struct FootprintsController {
    ctx: SessionContext,
    store: FootprintStore,
    editor: PopupEditor,
    clicks: MapClickAdapter,
    initialized: bool,
    stale: bool,
}

impl FootprintsController {
    pub fn new(ctx: SessionContext) -> Self {
        Self {
            ctx,
            store: FootprintStore::new(),
            editor: PopupEditor::new(),
            clicks: MapClickAdapter::default(),
            initialized: false,
            stale: false,
        }
    }

    pub fn session(&self) -> &Session {
        self.ctx.session()
    }

    pub fn store(&self) -> &FootprintStore {
        &self.store
    }

    /// Whether the last load failed and the list may be out of date.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// First load after the session started. Later calls are no-ops.
    pub async fn init(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        // Load failures are already logged and flagged as stale.
        let _ = self.load().await;
    }

    /// Drop all client-side state at sign-out.
    pub fn teardown(&mut self) {
        tracing::debug!(
            user_id = %self.ctx.session().user_id,
            footprints = self.store.len(),
            "Tearing down footprint view"
        );
        self.editor.cancel(&mut self.store);
        self.store.clear();
        self.initialized = false;
        self.stale = false;
    }

    /// Pick up a refreshed access token for the same user.
    pub fn refresh_session(&mut self, session: Session) {
        if !self.ctx.refresh(session) {
            tracing::warn!(
                user_id = %self.ctx.session().user_id,
                "Ignoring session refresh for a different user"
            );
        }
    }

    /// Fetch the user's footprints and replace the list.
    ///
    /// On failure the previous list stays in place.
    pub async fn load(&mut self) -> Result<usize, FootprintError> {
        let session = self.ctx.session();
        match self.ctx.gateway().list_by_user(session).await {
            Ok(rows) => {
                let count = rows.len();
                self.store.load(rows);
                self.stale = false;
                tracing::debug!(user_id = %session.user_id, count, "Footprints loaded");
                Ok(count)
            }
            Err(e) => {
                tracing::error!(
                    user_id = %session.user_id,
                    error = %e,
                    "Failed to load footprints"
                );
                self.stale = true;
                Err(FootprintError::Fetch(e))
            }
        }
    }

    /// Map click: create a footprint at `(lat, lng)` and put it first in the list.
    pub async fn request_create(
        &mut self,
        lat: f64,
        lng: f64,
    ) -> Result<Footprint, FootprintError> {
        let session = self.ctx.session();
        let draft = self.clicks.draft(
            session,
            Coordinates { lat, lng },
            self.store.len(),
            chrono::Utc::now(),
        )?;

        let row = self
            .ctx
            .gateway()
            .create(session, &draft)
            .await
            .map_err(|e| {
                tracing::error!(
                    user_id = %session.user_id,
                    lat,
                    lng,
                    error = %e,
                    "Failed to create footprint"
                );
                FootprintError::write(WriteAction::Create, e)
            })?;

        tracing::info!(
            user_id = %session.user_id,
            footprint_id = %row.id,
            lat,
            lng,
            "Footprint created"
        );
        Ok(self.store.insert(row).clone())
    }

    /// Update fields of an existing footprint.
    pub async fn request_update(
        &mut self,
        id: &str,
        patch: &FootprintPatch,
    ) -> Result<Footprint, FootprintError> {
        if !self.store.contains(id) {
            return Err(FootprintError::UnknownFootprint(id.to_string()));
        }
        if patch.is_empty() {
            return Err(FootprintError::Invalid("nothing to update".to_string()));
        }
        patch
            .validate()
            .map_err(|e| FootprintError::Invalid(e.to_string()))?;

        let session = self.ctx.session();
        let row = self
            .ctx
            .gateway()
            .update_by_id(session, id, patch)
            .await
            .map_err(|e| {
                tracing::error!(
                    user_id = %session.user_id,
                    footprint_id = %id,
                    error = %e,
                    "Failed to update footprint"
                );
                FootprintError::write(WriteAction::Update, e)
            })?;

        tracing::info!(user_id = %session.user_id, footprint_id = %id, "Footprint updated");
        // The returned row is authoritative, timestamps included.
        self.store.replace(row.clone());
        Ok(row)
    }

    /// Delete a footprint (the caller has already confirmed with the user).
    pub async fn request_delete(&mut self, id: &str) -> Result<(), FootprintError> {
        if !self.store.contains(id) {
            return Err(FootprintError::UnknownFootprint(id.to_string()));
        }

        let session = self.ctx.session();
        self.ctx
            .gateway()
            .delete_by_id(session, id)
            .await
            .map_err(|e| {
                tracing::error!(
                    user_id = %session.user_id,
                    footprint_id = %id,
                    error = %e,
                    "Failed to delete footprint"
                );
                FootprintError::write(WriteAction::Delete, e)
            })?;

        tracing::info!(user_id = %session.user_id, footprint_id = %id, "Footprint deleted");
        self.store.remove(id);
        Ok(())
    }

    // ─── Popup editing ───────────────────────────────────────────

    pub fn begin_edit(&mut self, id: &str) -> Result<StagedEdit, FootprintError> {
        self.editor.begin(&mut self.store, id).cloned()
    }

    pub fn stage_edit(
        &mut self,
        title: Option<String>,
        description: Option<String>,
    ) -> Result<StagedEdit, FootprintError> {
        self.editor.stage(&self.store, title, description).cloned()
    }

    pub fn cancel_edit(&mut self) {
        self.editor.cancel(&mut self.store);
    }

    pub fn staged_edit(&self) -> Option<&StagedEdit> {
        self.editor.staged(&self.store)
    }

    pub fn popup_mode(&self, id: &str) -> PopupMode {
        self.editor.mode(&self.store, id)
    }

    /// Commit the staged fields. On failure the popup stays in edit mode
    /// with the staged fields intact.
    ///
    /// Untouched fields are not sent. Saving without changes only leaves
    /// edit mode.
    pub async fn save_edit(&mut self) -> Result<Footprint, FootprintError> {
        let (id, patch) = self.editor.pending(&self.store)?;
        let row = if patch.is_empty() {
            self.store
                .get(&id)
                .cloned()
                .ok_or_else(|| FootprintError::UnknownFootprint(id.clone()))?
        } else {
            self.request_update(&id, &patch).await?
        };
        self.editor.cancel(&mut self.store);
        Ok(row)
    }
}

/// One controller per signed-in user, shared by that user's requests.
///
/// The per-user mutex serializes commands, so each user sees the same
/// one-event-at-a-time behavior as a single page.
///
/// Views that go unused for longer than the idle timeout are dropped; the
/// next request for that user loads a fresh one.
pub struct ControllerRegistry {
    controllers: DashMap<String, ViewSlot>,
    idle_timeout: Duration,
    last_sweep: Mutex<Instant>,
}

struct ViewSlot {
    handle: Arc<Mutex<FootprintsController>>,
    last_used: Instant,
}

impl Default for ControllerRegistry {
    fn default() -> Self {
        Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
    }
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            controllers: DashMap::new(),
            idle_timeout,
            last_sweep: Mutex::new(Instant::now()),
        }
    }

    /// Lock the controller for `ctx`'s user, creating and loading it on first use.
    pub async fn open(&self, ctx: SessionContext) -> OwnedMutexGuard<FootprintsController> {
        self.sweep_if_due();

        let user_id = ctx.session().user_id.clone();
        let session = ctx.session().clone();

        // Clone the Arc out so no map shard lock is held across the await.
        let handle = {
            let mut slot = self.controllers.entry(user_id).or_insert_with(|| ViewSlot {
                handle: Arc::new(Mutex::new(FootprintsController::new(ctx))),
                last_used: Instant::now(),
            });
            slot.last_used = Instant::now();
            slot.handle.clone()
        };

        let mut controller = handle.lock_owned().await;
        controller.refresh_session(session);
        controller.init().await;
        controller
    }

    /// Tear down and forget the controller for `user_id`, if any.
    pub async fn teardown(&self, user_id: &str) -> bool {
        match self.controllers.remove(user_id) {
            Some((_, slot)) => {
                slot.handle.lock().await.teardown();
                true
            }
            None => false,
        }
    }

    /// Drop views idle for longer than the timeout. Views that are locked
    /// by a request in flight are kept. Returns how many were dropped.
    pub fn evict_idle(&self) -> usize {
        let mut evicted = 0;
        self.controllers.retain(|user_id, slot| {
            let in_use = Arc::strong_count(&slot.handle) > 1;
            if in_use || slot.last_used.elapsed() < self.idle_timeout {
                return true;
            }
            tracing::debug!(user_id = %user_id, "Evicting idle footprint view");
            evicted += 1;
            false
        });
        evicted
    }

    /// Sweep at most once per quarter of the idle timeout.
    fn sweep_if_due(&self) {
        let Ok(mut last_sweep) = self.last_sweep.try_lock() else {
            return;
        };
        if last_sweep.elapsed() < self.idle_timeout / 4 {
            return;
        }
        *last_sweep = Instant::now();

        let evicted = self.evict_idle();
        if evicted > 0 {
            tracing::info!(evicted, remaining = self.controllers.len(), "Evicted idle views");
        }
    }

    pub fn active_sessions(&self) -> usize {
        self.controllers.len()
    }
}
