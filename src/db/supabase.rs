// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Supabase (PostgREST) client with typed footprint operations.
//!
//! Every request carries the project anon key plus the user's own access
//! token, so row-level security on the hosted side applies in addition to
//! the explicit `user_id` filters added here.

use crate::db::{tables, FootprintGateway};
use crate::error::RemoteError;
use crate::models::{Footprint, FootprintDraft, FootprintPatch, Session, User};
use async_trait::async_trait;
use reqwest::header::HeaderValue;
use serde::de::DeserializeOwned;

/// Supabase REST client.
#[derive(Clone)]
pub struct SupabaseGateway {
    http: reqwest::Client,
    rest_url: String,
    anon_key: String,
}

impl SupabaseGateway {
    /// Create a client for the project at `project_url` (no trailing slash).
    pub fn new(project_url: &str, anon_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            rest_url: format!("{}/rest/v1", project_url.trim_end_matches('/')),
            anon_key: anon_key.to_string(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }

    fn request(
        &self,
        method: reqwest::Method,
        url: &str,
        session: &Session,
    ) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&session.access_token)
    }

    /// Send a request that returns rows (`Prefer: return=representation`).
    async fn send_rows<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Vec<T>, RemoteError> {
        let response = request
            .header("Prefer", HeaderValue::from_static("return=representation"))
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        check_response(response)
            .await?
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

/// Filter value for PostgREST `eq.` operators.
fn eq(value: &str) -> String {
    format!("eq.{}", value)
}

/// Check response status and return error if not successful.
async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();

    if status.as_u16() == 401 || status.as_u16() == 403 {
        tracing::warn!(status = status.as_u16(), "Supabase rejected access token");
        return Err(RemoteError::Unauthorized);
    }

    Err(RemoteError::Status {
        status: status.as_u16(),
        body,
    })
}

fn single_row(rows: Vec<Footprint>, id: &str) -> Result<Footprint, RemoteError> {
    rows.into_iter()
        .next()
        .ok_or_else(|| RemoteError::NotFound(id.to_string()))
}

#[async_trait]
impl FootprintGateway for SupabaseGateway {
    async fn create(
        &self,
        session: &Session,
        draft: &FootprintDraft,
    ) -> Result<Footprint, RemoteError> {
        let url = self.table_url(tables::FOOTPRINTS);
        let rows = self
            .send_rows(
                self.request(reqwest::Method::POST, &url, session)
                    .json(draft),
            )
            .await?;

        let footprint = single_row(rows, "<new>")?;
        tracing::debug!(
            user_id = %session.user_id,
            footprint_id = %footprint.id,
            "Footprint inserted"
        );
        Ok(footprint)
    }

    async fn list_by_user(&self, session: &Session) -> Result<Vec<Footprint>, RemoteError> {
        let url = self.table_url(tables::FOOTPRINTS);
        let response = self
            .request(reqwest::Method::GET, &url, session)
            .query(&[
                ("select", "*".to_string()),
                ("user_id", eq(&session.user_id)),
                ("order", "created_at.desc".to_string()),
            ])
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        check_response(response)
            .await?
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }

    async fn update_by_id(
        &self,
        session: &Session,
        id: &str,
        patch: &FootprintPatch,
    ) -> Result<Footprint, RemoteError> {
        let url = self.table_url(tables::FOOTPRINTS);
        let rows = self
            .send_rows(
                self.request(reqwest::Method::PATCH, &url, session)
                    .query(&[("id", eq(id)), ("user_id", eq(&session.user_id))])
                    .json(patch),
            )
            .await?;

        single_row(rows, id)
    }

    async fn delete_by_id(&self, session: &Session, id: &str) -> Result<(), RemoteError> {
        let url = self.table_url(tables::FOOTPRINTS);
        let response = self
            .request(reqwest::Method::DELETE, &url, session)
            .query(&[("id", eq(id)), ("user_id", eq(&session.user_id))])
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        check_response(response).await?;
        Ok(())
    }

    async fn fetch_profile(&self, session: &Session) -> Result<Option<User>, RemoteError> {
        let url = self.table_url(tables::USERS);
        let response = self
            .request(reqwest::Method::GET, &url, session)
            .query(&[("select", "*".to_string()), ("id", eq(&session.user_id))])
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let rows: Vec<User> = check_response(response)
            .await?
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))?;

        Ok(rows.into_iter().next())
    }
}
