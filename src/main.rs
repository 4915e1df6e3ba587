// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Footprints API Server
//!
//! Backend for the footprints map: session gate, per-user footprint lists
//! and the hosted database gateway.

use anyhow::Context;
use footprints::{
    config::{BackendKind, Config},
    db::{FootprintGateway, InMemoryGateway, SupabaseGateway},
    services::{AuthProvider, StaticJwtAuth, SupabaseAuth},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(port = config.port, backend = ?config.backend, "Starting Footprints API");

    let (gateway, auth) = build_backend(&config)?;

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), gateway, auth));

    // Build router
    let app = footprints::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

type Backend = (Arc<dyn FootprintGateway>, Arc<dyn AuthProvider>);

/// Pick the gateway and auth provider for the configured backend.
fn build_backend(config: &Config) -> anyhow::Result<Backend> {
    match config.backend {
        BackendKind::Supabase => {
            let url = config
                .supabase_url
                .as_deref()
                .context("SUPABASE_URL not set")?;
            let anon_key = config
                .supabase_anon_key
                .as_deref()
                .context("SUPABASE_ANON_KEY not set")?;

            tracing::info!(url = %url, "Using Supabase backend");
            let gateway: Arc<dyn FootprintGateway> =
                Arc::new(SupabaseGateway::new(url, anon_key));
            let auth: Arc<dyn AuthProvider> = Arc::new(SupabaseAuth::new(
                url,
                anon_key,
                config.jwt_secret.clone(),
            ));
            Ok((gateway, auth))
        }
        BackendKind::Memory => {
            tracing::warn!("Using in-memory backend; footprints are lost on restart");
            let gateway: Arc<dyn FootprintGateway> = Arc::new(InMemoryGateway::new());
            let auth: Arc<dyn AuthProvider> =
                Arc::new(StaticJwtAuth::new(config.jwt_secret.clone()));
            Ok((gateway, auth))
        }
    }
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("footprints=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
