// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod auth;
pub mod edit;
pub mod footprints;
pub mod geojson_export;
pub mod map_click;
pub mod session;
pub mod store;

pub use auth::{AuthProvider, StaticJwtAuth, SupabaseAuth};
pub use edit::{PopupEditor, PopupMode, StagedEdit};
pub use footprints::{ControllerRegistry, FootprintsController};
pub use map_click::MapClickAdapter;
pub use session::{GuardDecision, SessionContext, SessionGuard, SessionState};
pub use store::FootprintStore;
