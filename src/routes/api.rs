// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for signed-in users.
//!
//! Every handler locks the caller's footprint view for the duration of the
//! command, so one user's commands run one at a time.

use crate::error::{AppError, Result};
use crate::models::{Coordinates, Footprint, FootprintPatch, MapSettings, Session, User};
use crate::services::{geojson_export, FootprintsController, StagedEdit};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes (require a session).
/// The session guard is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_view))
        .route("/api/me", get(get_me))
        .route(
            "/api/footprints",
            get(list_footprints).post(create_footprint),
        )
        .route("/api/footprints/geojson", get(get_geojson))
        .route(
            "/api/footprints/{id}",
            patch(update_footprint).delete(delete_footprint),
        )
        .route("/api/footprints/{id}/edit", post(begin_edit))
        .route("/api/edit", patch(stage_edit).delete(cancel_edit))
        .route("/api/edit/save", post(save_edit))
}

// ─── View ────────────────────────────────────────────────────

/// Everything the map page needs to render.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ViewResponse {
    pub user_id: String,
    pub email: Option<String>,
    pub map: MapSettings,
    #[serde(flatten)]
    pub list: FootprintListResponse,
}

/// Current footprint list.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FootprintListResponse {
    /// Newest first
    pub footprints: Vec<Footprint>,
    pub count: usize,
    /// Footprint whose popup is in edit mode
    pub editing_id: Option<String>,
    pub staged: Option<StagedEdit>,
    /// True if the last load failed and the list may be out of date
    pub stale: bool,
}

impl FootprintListResponse {
    fn from_view(view: &FootprintsController) -> Self {
        let store = view.store();
        Self {
            footprints: store.footprints().to_vec(),
            count: store.len(),
            editing_id: store.editing_id().map(str::to_string),
            staged: view.staged_edit().cloned(),
            stale: view.is_stale(),
        }
    }
}

async fn get_view(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Json<ViewResponse> {
    let view = state.open_view(&session).await;

    Json(ViewResponse {
        user_id: session.user_id.clone(),
        email: session.email.clone(),
        map: state.config.map.clone(),
        list: FootprintListResponse::from_view(&view),
    })
}

// ─── User Profile ────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MeResponse {
    pub user_id: String,
    pub email: Option<String>,
    /// Stored profile, if the user has one
    pub profile: Option<User>,
}

/// Get current user and profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Json<MeResponse> {
    let profile = match state.gateway.fetch_profile(&session).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!(user_id = %session.user_id, error = %e, "Failed to fetch profile");
            None
        }
    };

    Json(MeResponse {
        user_id: session.user_id,
        email: session.email,
        profile,
    })
}

// ─── Footprints ──────────────────────────────────────────────

/// Reload from the backend. A failed reload still answers with the
/// previous list, flagged as stale.
async fn list_footprints(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Json<FootprintListResponse> {
    let mut view = state.open_view(&session).await;
    let _ = view.load().await;
    Json(FootprintListResponse::from_view(&view))
}

async fn get_geojson(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Json<geojson::FeatureCollection> {
    let view = state.open_view(&session).await;
    Json(geojson_export::feature_collection(view.store().footprints()))
}

/// Map click.
async fn create_footprint(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(at): Json<Coordinates>,
) -> Result<(StatusCode, Json<Footprint>)> {
    at.check().map_err(AppError::BadRequest)?;

    let mut view = state.open_view(&session).await;
    let footprint = view.request_create(at.lat, at.lng).await?;
    Ok((StatusCode::CREATED, Json(footprint)))
}

async fn update_footprint(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    Json(patch): Json<FootprintPatch>,
) -> Result<Json<Footprint>> {
    let mut view = state.open_view(&session).await;
    Ok(Json(view.request_update(&id, &patch).await?))
}

async fn delete_footprint(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let mut view = state.open_view(&session).await;
    view.request_delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ─── Popup Editing ───────────────────────────────────────────

#[derive(Deserialize)]
struct StageEditRequest {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

async fn begin_edit(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> Result<Json<StagedEdit>> {
    let mut view = state.open_view(&session).await;
    Ok(Json(view.begin_edit(&id)?))
}

async fn stage_edit(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(body): Json<StageEditRequest>,
) -> Result<Json<StagedEdit>> {
    let mut view = state.open_view(&session).await;
    Ok(Json(view.stage_edit(body.title, body.description)?))
}

async fn cancel_edit(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> StatusCode {
    let mut view = state.open_view(&session).await;
    view.cancel_edit();
    StatusCode::NO_CONTENT
}

async fn save_edit(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<Footprint>> {
    let mut view = state.open_view(&session).await;
    Ok(Json(view.save_edit().await?))
}

/// Map widget settings (public).
pub async fn get_map_settings(State(state): State<Arc<AppState>>) -> Json<MapSettings> {
    Json(state.config.map.clone())
}
