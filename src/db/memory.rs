// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Process-local footprint store.
//!
//! Behaves like the hosted table: ids are assigned on insert (random UUIDs),
//! timestamps are stamped on every write, reads are ordered newest first and
//! rows owned by another user are invisible. Failure switches let tests
//! exercise the error paths.

use crate::db::FootprintGateway;
use crate::error::RemoteError;
use crate::models::{Footprint, FootprintDraft, FootprintPatch, Session, User};
use crate::time_utils::row_timestamp;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

#[derive(Clone)]
struct StoredRow {
    /// Insertion order, used as the `created_at desc` tie-breaker.
    seq: u64,
    footprint: Footprint,
}

/// In-memory footprint database.
#[derive(Default)]
pub struct InMemoryGateway {
    rows: DashMap<String, StoredRow>,
    profiles: DashMap<String, User>,
    next_seq: AtomicU64,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent read fail with [`RemoteError::Unavailable`].
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent write fail with [`RemoteError::Unavailable`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Store a profile row, as the auth provider would on sign-up.
    pub fn insert_profile(&self, user: User) {
        self.profiles.insert(user.id.clone(), user);
    }

    /// Total rows across all users.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn check_reads(&self) -> Result<(), RemoteError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RemoteError::Unavailable("reads disabled".to_string()));
        }
        Ok(())
    }

    fn check_writes(&self) -> Result<(), RemoteError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RemoteError::Unavailable("writes disabled".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl FootprintGateway for InMemoryGateway {
    async fn create(
        &self,
        session: &Session,
        draft: &FootprintDraft,
    ) -> Result<Footprint, RemoteError> {
        self.check_writes()?;

        // Row-level security: inserts for another user are rejected.
        if draft.user_id != session.user_id {
            return Err(RemoteError::Unauthorized);
        }

        let now = row_timestamp(chrono::Utc::now());
        let footprint = Footprint {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: draft.user_id.clone(),
            lat: draft.lat,
            lng: draft.lng,
            title: draft.title.clone(),
            description: draft.description.clone(),
            photo_url: draft.photo_url.clone(),
            visited_at: draft.visited_at.clone(),
            created_at: now.clone(),
            updated_at: now,
        };

        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        self.rows.insert(
            footprint.id.clone(),
            StoredRow {
                seq,
                footprint: footprint.clone(),
            },
        );

        Ok(footprint)
    }

    async fn list_by_user(&self, session: &Session) -> Result<Vec<Footprint>, RemoteError> {
        self.check_reads()?;

        let mut owned: Vec<StoredRow> = self
            .rows
            .iter()
            .filter(|entry| entry.footprint.user_id == session.user_id)
            .map(|entry| entry.value().clone())
            .collect();

        owned.sort_by(|a, b| b.seq.cmp(&a.seq));
        Ok(owned.into_iter().map(|row| row.footprint).collect())
    }

    async fn update_by_id(
        &self,
        session: &Session,
        id: &str,
        patch: &FootprintPatch,
    ) -> Result<Footprint, RemoteError> {
        self.check_writes()?;

        let mut row = self
            .rows
            .get_mut(id)
            .filter(|row| row.footprint.user_id == session.user_id)
            .ok_or_else(|| RemoteError::NotFound(id.to_string()))?;

        patch.apply_to(&mut row.footprint);
        row.footprint.updated_at = row_timestamp(chrono::Utc::now());
        Ok(row.footprint.clone())
    }

    async fn delete_by_id(&self, session: &Session, id: &str) -> Result<(), RemoteError> {
        self.check_writes()?;

        // Deleting a missing row is not an error, same as a filtered DELETE.
        self.rows
            .remove_if(id, |_, row| row.footprint.user_id == session.user_id);
        Ok(())
    }

    async fn fetch_profile(&self, session: &Session) -> Result<Option<User>, RemoteError> {
        self.check_reads()?;
        Ok(self
            .profiles
            .get(&session.user_id)
            .map(|user| user.value().clone()))
    }
}
