// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.
//!
//! Three layers:
//! - [`RemoteError`]: what the hosted database / auth API reported.
//! - [`FootprintError`]: outcome of a controller command (load, create, update, delete).
//! - [`AppError`]: HTTP-facing error that renders a JSON body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

/// Failure reported by the Backend Gateway.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("access token rejected by backend")]
    Unauthorized,

    #[error("row not found: {0}")]
    NotFound(String),

    #[error("could not decode backend response: {0}")]
    Decode(String),

    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Session / authentication failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("no session")]
    MissingSession,

    #[error("invalid or expired access token")]
    InvalidToken,

    #[error("auth provider error: {0}")]
    Provider(String),
}

/// The write a failed command was attempting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAction {
    Create,
    Update,
    Delete,
}

impl fmt::Display for WriteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WriteAction::Create => "create",
            WriteAction::Update => "update",
            WriteAction::Delete => "delete",
        })
    }
}

/// Outcome of a failed controller command.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FootprintError {
    /// Initial or repeated load failed. The store keeps its previous contents.
    #[error("failed to load footprints: {0}")]
    Fetch(#[source] RemoteError),

    /// Create/update/delete failed. The store is left untouched.
    #[error("failed to {action} footprint: {source}")]
    Write {
        action: WriteAction,
        #[source]
        source: RemoteError,
    },

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("footprint {0} is not on the map")]
    UnknownFootprint(String),

    #[error("no footprint is being edited")]
    NotEditing,

    #[error("invalid footprint: {0}")]
    Invalid(String),
}

impl FootprintError {
    pub(crate) fn write(action: WriteAction, source: RemoteError) -> Self {
        FootprintError::Write { action, source }
    }

    /// Message suitable for a blocking alert dialog.
    ///
    /// Only writes are surfaced this way; load failures are logged and the
    /// stale list is shown instead.
    pub fn alert_message(&self) -> Option<String> {
        match self {
            FootprintError::Write { action, .. } => Some(match action {
                WriteAction::Create => "Failed to save the new footprint.".to_string(),
                WriteAction::Update => "Failed to update the footprint.".to_string(),
                WriteAction::Delete => "Failed to delete the footprint.".to_string(),
            }),
            _ => None,
        }
    }
}

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Backend write failed: {0}")]
    WriteFailed(FootprintError),

    #[error("Backend error: {0}")]
    Backend(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingSession => AppError::Unauthorized,
            AuthError::InvalidToken => AppError::InvalidToken,
            AuthError::Provider(msg) => AppError::Backend(msg),
        }
    }
}

impl From<FootprintError> for AppError {
    fn from(err: FootprintError) -> Self {
        match err {
            FootprintError::Write { .. } => AppError::WriteFailed(err),
            FootprintError::Fetch(source) => AppError::Backend(source.to_string()),
            FootprintError::Auth(auth) => auth.into(),
            FootprintError::UnknownFootprint(id) => {
                AppError::NotFound(format!("Footprint {} not found", id))
            }
            FootprintError::NotEditing => AppError::Conflict(err.to_string()),
            FootprintError::Invalid(msg) => AppError::BadRequest(msg),
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    alert: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut alert = None;
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token", None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", Some(msg.clone())),
            AppError::WriteFailed(err) => {
                alert = err.alert_message();
                (StatusCode::BAD_GATEWAY, "write_failed", Some(err.to_string()))
            }
            AppError::Backend(msg) => {
                tracing::error!(error = %msg, "Backend error");
                (StatusCode::BAD_GATEWAY, "backend_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
            alert,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_writes_raise_alerts() {
        let write = FootprintError::write(WriteAction::Delete, RemoteError::Unauthorized);
        assert_eq!(
            write.alert_message().as_deref(),
            Some("Failed to delete the footprint.")
        );

        let fetch = FootprintError::Fetch(RemoteError::Network("timeout".to_string()));
        assert!(fetch.alert_message().is_none());
    }

    #[test]
    fn test_write_error_maps_to_bad_gateway() {
        let err: AppError = FootprintError::write(
            WriteAction::Create,
            RemoteError::Status {
                status: 500,
                body: "boom".to_string(),
            },
        )
        .into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_unknown_footprint_maps_to_not_found() {
        let err: AppError = FootprintError::UnknownFootprint("abc".to_string()).into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
