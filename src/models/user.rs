//! User model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// User profile row (`users` table), managed by the auth provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct User {
    /// Auth user id (also the primary key)
    pub id: String,
    pub email: String,
    /// Display name
    pub nickname: String,
    /// Profile picture URL
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// The signed-in user, as read from the access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Auth user id (`sub` claim)
    pub user_id: String,
    pub email: Option<String>,
    /// Raw access token, forwarded to the hosted database for row-level security.
    pub access_token: String,
}
