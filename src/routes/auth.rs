// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session routes: login landing, session cookie exchange, sign-out.

use axum::{
    extract::State,
    http::HeaderMap,
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::Result;
use crate::middleware::auth::{extract_token, SESSION_COOKIE};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", get(login))
        .route("/auth/session", post(create_session))
        .route("/auth/logout", post(logout))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LoginResponse {
    pub message: String,
    /// Hosted auth endpoint to sign in against (absent for the in-memory backend)
    pub auth_url: Option<String>,
    /// Where to post the access token after signing in
    pub session_endpoint: String,
}

/// Where unauthenticated visitors land.
async fn login(State(state): State<Arc<AppState>>) -> Json<LoginResponse> {
    Json(LoginResponse {
        message: "Sign in to see your footprints.".to_string(),
        auth_url: state
            .config
            .supabase_url
            .as_ref()
            .map(|url| format!("{}/auth/v1", url)),
        session_endpoint: "/auth/session".to_string(),
    })
}

#[derive(Deserialize)]
pub struct CreateSessionRequest {
    access_token: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionResponse {
    pub user_id: String,
    pub email: Option<String>,
}

/// Only mark the cookie `Secure` when the frontend is served over HTTPS.
fn session_cookie(state: &AppState, value: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.frontend_url.starts_with("https://"))
        .build()
}

/// Exchange an access token from the auth provider for a session cookie.
async fn create_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<CreateSessionRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let session = state.auth.resolve(body.access_token.trim()).await?;

    tracing::info!(user_id = %session.user_id, "Session started");

    let jar = jar.add(session_cookie(&state, session.access_token.clone()));
    Ok((
        jar,
        Json(SessionResponse {
            user_id: session.user_id,
            email: session.email,
        }),
    ))
}

/// Sign out: end the provider session, drop the user's view, clear the cookie.
///
/// Always succeeds locally, even if the provider call fails. Expired tokens
/// are still honored here so their owner's view gets torn down.
async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> (CookieJar, Redirect) {
    if let Some(token) = extract_token(&jar, &headers) {
        match state.auth.resolve_for_sign_out(&token).await {
            Ok(session) => {
                if let Err(e) = state.auth.sign_out(&session).await {
                    tracing::warn!(
                        user_id = %session.user_id,
                        error = %e,
                        "Provider sign-out failed"
                    );
                }
                state.views.teardown(&session.user_id).await;
                tracing::info!(user_id = %session.user_id, "Signed out");
            }
            Err(e) => {
                tracing::debug!(error = %e, "Logout with unusable token");
            }
        }
    }

    let removal = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.frontend_url.starts_with("https://"));

    (
        jar.remove(removal),
        Redirect::to(state.guard.login_path()),
    )
}

