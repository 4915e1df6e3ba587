// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session guard middleware.

use crate::error::AuthError;
use crate::services::session::{GuardDecision, SessionState};
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// Cookie carrying the access token.
pub const SESSION_COOKIE: &str = "footprints_token";

/// Access token from the session cookie, falling back to a bearer header.
pub fn extract_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Admit signed-in users; redirect everyone else to the login path.
///
/// The admitted [`crate::models::Session`] is stored in the request extensions.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let resolved = match extract_token(&jar, request.headers()) {
        Some(token) => state.auth.resolve(&token).await,
        None => Err(AuthError::MissingSession),
    };

    match state.guard.check(&SessionState::from_resolution(resolved)) {
        GuardDecision::Render(session) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        GuardDecision::Redirect(to) => {
            tracing::debug!(path = %request.uri().path(), "No session, redirecting to login");
            Redirect::to(&to).into_response()
        }
        GuardDecision::ShowLoading => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(header::RETRY_AFTER, "1")],
        )
            .into_response(),
    }
}
