// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session cookie exchange and sign-out.

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{
    authed, create_test_app, create_test_jwt, create_test_jwt_expiring_in, json_body,
};
use serde_json::json;
use tower::ServiceExt;

fn session_request(token: &str) -> Request<Body> {
    Request::post("/auth/session")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "access_token": token }).to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_login_page_is_public() {
    let app = create_test_app();

    let response = app
        .router
        .oneshot(Request::get("/login").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["session_endpoint"], "/auth/session");
    // In-memory backend has no hosted auth endpoint
    assert!(body["auth_url"].is_null());
}

#[tokio::test]
async fn test_session_sets_http_only_cookie() {
    let app = create_test_app();
    let token = create_test_jwt("user-1", &app.state.config.jwt_secret);

    let response = app.router.oneshot(session_request(&token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(cookie.starts_with(&format!("footprints_token={}", token)));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    // Frontend is plain http in tests
    assert!(!cookie.contains("Secure"));

    let body = json_body(response).await;
    assert_eq!(body["user_id"], "user-1");
    assert_eq!(body["email"], "user-1@example.com");
}

#[tokio::test]
async fn test_session_cookie_is_secure_for_https_frontend() {
    let mut config = footprints::config::Config::test_default();
    config.frontend_url = "https://footprints.example.com".to_string();
    let app = common::create_test_app_with_config(config);
    let token = create_test_jwt("user-1", &app.state.config.jwt_secret);

    let response = app.router.oneshot(session_request(&token)).await.unwrap();

    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.contains("Secure"));
}

#[tokio::test]
async fn test_session_rejects_bad_token() {
    let app = create_test_app();

    let response = app
        .router
        .oneshot(session_request("garbage"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    let body = json_body(response).await;
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn test_logout_clears_cookie_and_view() {
    let app = create_test_app();
    let token = create_test_jwt("user-1", &app.state.config.jwt_secret);

    let response = app
        .router
        .clone()
        .oneshot(authed("GET", "/", &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.state.views.active_sessions(), 1);

    let response = app
        .router
        .oneshot(
            Request::post("/auth/logout")
                .header(header::COOKIE, format!("footprints_token={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/login");

    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("footprints_token="));
    assert!(cookie.contains("Max-Age=0"));

    assert_eq!(app.state.views.active_sessions(), 0);
}

#[tokio::test]
async fn test_logout_with_expired_token_tears_down_view() {
    let app = create_test_app();
    let secret = app.state.config.jwt_secret.clone();
    let token = create_test_jwt("user-1", &secret);

    app.router
        .clone()
        .oneshot(authed("GET", "/", &token, None))
        .await
        .unwrap();
    assert_eq!(app.state.views.active_sessions(), 1);

    let expired = create_test_jwt_expiring_in("user-1", &secret, -3600);
    let response = app
        .router
        .oneshot(
            Request::post("/auth/logout")
                .header(header::COOKIE, format!("footprints_token={}", expired))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(app.state.views.active_sessions(), 0);
}

#[tokio::test]
async fn test_logout_with_forged_token_keeps_view() {
    let app = create_test_app();
    let token = create_test_jwt("user-1", &app.state.config.jwt_secret);

    app.router
        .clone()
        .oneshot(authed("GET", "/", &token, None))
        .await
        .unwrap();

    let forged = create_test_jwt_expiring_in("user-1", b"some_other_secret_also_32_bytes!!", -60);
    let response = app
        .router
        .oneshot(authed("POST", "/auth/logout", &forged, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(app.state.views.active_sessions(), 1);
}

#[tokio::test]
async fn test_logout_without_session_still_redirects() {
    let app = create_test_app();

    let response = app
        .router
        .oneshot(Request::post("/auth/logout").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/login");
}

#[tokio::test]
async fn test_signing_back_in_reloads_from_backend() {
    let app = create_test_app();
    let token = create_test_jwt("user-1", &app.state.config.jwt_secret);

    app.router
        .clone()
        .oneshot(authed(
            "POST",
            "/api/footprints",
            &token,
            Some(json!({ "lat": 1.0, "lng": 2.0 })),
        ))
        .await
        .unwrap();

    app.router
        .clone()
        .oneshot(authed("POST", "/auth/logout", &token, None))
        .await
        .unwrap();
    assert_eq!(app.state.views.active_sessions(), 0);

    let view = json_body(
        app.router
            .oneshot(authed("GET", "/", &token, None))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(view["count"], 1);
}
