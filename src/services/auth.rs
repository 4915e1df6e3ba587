// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Auth provider integration.
//!
//! Access tokens are issued by the hosted auth service (HS256 JWTs signed
//! with the project secret). They are verified locally on every request;
//! only sign-out needs a round trip.

use crate::error::AuthError;
use crate::models::Session;
use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Audience the hosted auth service puts on user tokens.
pub const TOKEN_AUDIENCE: &str = "authenticated";

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (auth user id)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: usize,
    pub aud: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Reads and ends sessions.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Turn an access token into a session, or reject it.
    async fn resolve(&self, token: &str) -> Result<Session, AuthError>;

    /// Like [`resolve`](Self::resolve) but accepts an expired token.
    ///
    /// Used at sign-out, where the token has usually outlived its expiry.
    /// The signature and audience are still checked.
    async fn resolve_for_sign_out(&self, token: &str) -> Result<Session, AuthError>;

    /// End the session on the provider side.
    async fn sign_out(&self, session: &Session) -> Result<(), AuthError>;
}

/// Verify an access token with the shared secret.
pub fn verify_token(token: &str, secret: &[u8]) -> Result<Session, AuthError> {
    decode_session(token, secret, true)
}

/// Verify signature and audience only; expired tokens are accepted.
pub fn verify_token_ignoring_expiry(token: &str, secret: &[u8]) -> Result<Session, AuthError> {
    decode_session(token, secret, false)
}

fn decode_session(token: &str, secret: &[u8], check_expiry: bool) -> Result<Session, AuthError> {
    let key = DecodingKey::from_secret(secret);
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[TOKEN_AUDIENCE]);
    validation.validate_exp = check_expiry;

    let token_data =
        decode::<Claims>(token, &key, &validation).map_err(|_| AuthError::InvalidToken)?;

    if token_data.claims.sub.is_empty() {
        return Err(AuthError::InvalidToken);
    }

    Ok(Session {
        user_id: token_data.claims.sub,
        email: token_data.claims.email,
        access_token: token.to_string(),
    })
}

/// Supabase auth: local verification plus remote sign-out.
#[derive(Clone)]
pub struct SupabaseAuth {
    http: reqwest::Client,
    auth_url: String,
    anon_key: String,
    jwt_secret: Vec<u8>,
}

impl SupabaseAuth {
    pub fn new(project_url: &str, anon_key: &str, jwt_secret: Vec<u8>) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth_url: format!("{}/auth/v1", project_url.trim_end_matches('/')),
            anon_key: anon_key.to_string(),
            jwt_secret,
        }
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuth {
    async fn resolve(&self, token: &str) -> Result<Session, AuthError> {
        verify_token(token, &self.jwt_secret)
    }

    async fn resolve_for_sign_out(&self, token: &str) -> Result<Session, AuthError> {
        verify_token_ignoring_expiry(token, &self.jwt_secret)
    }

    async fn sign_out(&self, session: &Session) -> Result<(), AuthError> {
        let response = self
            .http
            .post(format!("{}/logout", self.auth_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await
            .map_err(|e| AuthError::Provider(format!("Sign-out request failed: {}", e)))?;

        let status = response.status();
        // An already-expired session is as signed out as it gets.
        if status.is_success() || status.as_u16() == 401 {
            tracing::info!(user_id = %session.user_id, "Signed out with auth provider");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(AuthError::Provider(format!("HTTP {}: {}", status, body)))
    }
}

/// Verification-only provider for the in-memory backend and tests.
#[derive(Clone)]
pub struct StaticJwtAuth {
    jwt_secret: Vec<u8>,
}

impl StaticJwtAuth {
    pub fn new(jwt_secret: Vec<u8>) -> Self {
        Self { jwt_secret }
    }
}

#[async_trait]
impl AuthProvider for StaticJwtAuth {
    async fn resolve(&self, token: &str) -> Result<Session, AuthError> {
        verify_token(token, &self.jwt_secret)
    }

    async fn resolve_for_sign_out(&self, token: &str) -> Result<Session, AuthError> {
        verify_token_ignoring_expiry(token, &self.jwt_secret)
    }

    async fn sign_out(&self, session: &Session) -> Result<(), AuthError> {
        tracing::debug!(user_id = %session.user_id, "Local sign-out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    const SECRET: &[u8] = b"unit_test_secret_that_is_long_enough";

    fn token(sub: &str, aud: &str, exp_offset: i64) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        let claims = Claims {
            sub: sub.to_string(),
            exp: (now + exp_offset) as usize,
            iat: now as usize,
            aud: aud.to_string(),
            email: Some("hiker@example.com".to_string()),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token_yields_session() {
        let raw = token("user-1", TOKEN_AUDIENCE, 3600);
        let session = verify_token(&raw, SECRET).unwrap();

        assert_eq!(session.user_id, "user-1");
        assert_eq!(session.email.as_deref(), Some("hiker@example.com"));
        assert_eq!(session.access_token, raw);
    }

    #[test]
    fn test_rejects_expired_wrong_audience_and_wrong_key() {
        let expired = token("user-1", TOKEN_AUDIENCE, -3600);
        assert_eq!(verify_token(&expired, SECRET), Err(AuthError::InvalidToken));

        let service_role = token("user-1", "service_role", 3600);
        assert_eq!(
            verify_token(&service_role, SECRET),
            Err(AuthError::InvalidToken)
        );

        let good = token("user-1", TOKEN_AUDIENCE, 3600);
        assert_eq!(
            verify_token(&good, b"some_other_secret"),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn test_sign_out_accepts_expired_but_not_forged() {
        let expired = token("user-1", TOKEN_AUDIENCE, -3600);
        let session = verify_token_ignoring_expiry(&expired, SECRET).unwrap();
        assert_eq!(session.user_id, "user-1");

        assert_eq!(
            verify_token_ignoring_expiry(&expired, b"some_other_secret"),
            Err(AuthError::InvalidToken)
        );
        let service_role = token("user-1", "service_role", -3600);
        assert_eq!(
            verify_token_ignoring_expiry(&service_role, SECRET),
            Err(AuthError::InvalidToken)
        );
    }

    #[tokio::test]
    async fn test_static_provider_signs_out_locally() {
        let provider = StaticJwtAuth::new(SECRET.to_vec());
        let session = provider
            .resolve(&token("user-1", TOKEN_AUDIENCE, 60))
            .await
            .unwrap();
        assert!(provider.sign_out(&session).await.is_ok());
    }
}
