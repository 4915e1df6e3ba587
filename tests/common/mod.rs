// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
};
use footprints::config::Config;
use footprints::db::InMemoryGateway;
use footprints::routes::create_router;
use footprints::services::auth::Claims;
use footprints::services::StaticJwtAuth;
use footprints::AppState;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Handles to a test app backed by the in-memory gateway.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    pub db: Arc<InMemoryGateway>,
}

/// Create a test app with in-memory dependencies.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    create_test_app_with_config(Config::test_default())
}

#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config) -> TestApp {
    let db = Arc::new(InMemoryGateway::new());
    let auth = Arc::new(StaticJwtAuth::new(config.jwt_secret.clone()));
    let state = Arc::new(AppState::new(config, db.clone(), auth));

    TestApp {
        router: create_router(state.clone()),
        state,
        db,
    }
}

/// Create an access token the way the hosted auth service does.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, signing_key: &[u8]) -> String {
    create_test_jwt_expiring_in(user_id, signing_key, 3600)
}

/// Create an access token expiring `secs` from now (negative for expired).
#[allow(dead_code)]
pub fn create_test_jwt_expiring_in(user_id: &str, signing_key: &[u8], secs: i64) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;

    let claims = Claims {
        sub: user_id.to_string(),
        exp: (now + secs) as usize,
        iat: now as usize,
        aud: "authenticated".to_string(),
        email: Some(format!("{}@example.com", user_id)),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )
    .unwrap()
}

/// Build a request authenticated with a bearer token.
#[allow(dead_code)]
pub fn authed(
    method: &str,
    uri: &str,
    token: &str,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token));

    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Read a JSON response body.
#[allow(dead_code)]
pub async fn json_body(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
