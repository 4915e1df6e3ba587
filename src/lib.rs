// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Footprints: pin the places you have been on a map.
//!
//! This crate hosts the map view's backend: it gates access on the hosted
//! auth session, keeps one footprint list per signed-in user, and forwards
//! create/update/delete commands to the hosted database.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FootprintGateway;
use models::Session;
use services::{
    AuthProvider, ControllerRegistry, FootprintsController, SessionContext, SessionGuard,
};
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub gateway: Arc<dyn FootprintGateway>,
    pub auth: Arc<dyn AuthProvider>,
    pub guard: SessionGuard,
    pub views: ControllerRegistry,
}

impl AppState {
    pub fn new(
        config: Config,
        gateway: Arc<dyn FootprintGateway>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        let guard = SessionGuard::new(config.login_path.clone());
        let views = ControllerRegistry::with_idle_timeout(config.view_idle_timeout);
        Self {
            config,
            gateway,
            auth,
            guard,
            views,
        }
    }

    /// Lock the footprint view of `session`'s user, loading it on first use.
    pub async fn open_view(
        &self,
        session: &Session,
    ) -> OwnedMutexGuard<FootprintsController> {
        self.views
            .open(SessionContext::new(session.clone(), self.gateway.clone()))
            .await
    }
}
