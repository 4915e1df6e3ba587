//! Database layer: the Backend Gateway over the hosted store.

pub mod memory;
pub mod supabase;

pub use memory::InMemoryGateway;
pub use supabase::SupabaseGateway;

use crate::error::RemoteError;
use crate::models::{Footprint, FootprintDraft, FootprintPatch, Session, User};
use async_trait::async_trait;

/// Table names as constants.
pub mod tables {
    pub const FOOTPRINTS: &str = "footprints";
    pub const USERS: &str = "users";
}

/// CRUD over the `footprints` table, scoped to the session user.
///
/// Implementations must never read or write rows whose `user_id` differs
/// from `session.user_id`.
#[async_trait]
pub trait FootprintGateway: Send + Sync {
    /// Insert a row and return it as stored.
    async fn create(
        &self,
        session: &Session,
        draft: &FootprintDraft,
    ) -> Result<Footprint, RemoteError>;

    /// All rows owned by the session user, newest first.
    async fn list_by_user(&self, session: &Session) -> Result<Vec<Footprint>, RemoteError>;

    /// Update a row and return it as stored.
    async fn update_by_id(
        &self,
        session: &Session,
        id: &str,
        patch: &FootprintPatch,
    ) -> Result<Footprint, RemoteError>;

    async fn delete_by_id(&self, session: &Session, id: &str) -> Result<(), RemoteError>;

    /// Profile row of the session user, if one exists.
    async fn fetch_profile(&self, session: &Session) -> Result<Option<User>, RemoteError>;
}
