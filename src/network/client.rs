//! HTTP backend - GoTrue auth and PostgREST row store over reqwest

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::Config;
use crate::constants::REQUEST_TIMEOUT_SECS;
use crate::models::{Credentials, Shipment, ShipmentDraft};
use crate::network::backend::{Backend, RemoteError};

/// Fields of the password-grant response we keep
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Supabase-compatible backend client.
///
/// The access token from the last successful sign-in is kept privately and
/// sent as the bearer on row-store calls; without one the anon key is used.
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    table: String,
    access_token: Mutex<Option<String>>,
}

impl SupabaseClient {
    pub fn new(config: &Config) -> Self {
        SupabaseClient {
            http: create_client(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            table: config.table.clone(),
            access_token: Mutex::new(None),
        }
    }

    fn bearer(&self) -> String {
        let token = self
            .access_token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        format!("Bearer {}", token.unwrap_or_else(|| self.anon_key.clone()))
    }

    fn set_token(&self, token: Option<String>) {
        *self
            .access_token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = token;
    }

    /// Attach the headers every endpoint expects
    fn with_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.anon_key)
            .header("Authorization", self.bearer())
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }
}

#[async_trait]
impl Backend for SupabaseClient {
    async fn sign_up(&self, credentials: &Credentials) -> Result<(), RemoteError> {
        tracing::info!(email = %credentials.email, "Signing up");
        let req = self.with_auth(self.http.post(self.auth_url("signup")).json(credentials));
        send(req).await.map(|_| ())
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<(), RemoteError> {
        tracing::info!(email = %credentials.email, "Signing in");
        let req = self.with_auth(
            self.http
                .post(self.auth_url("token"))
                .query(&[("grant_type", "password")])
                .json(credentials),
        );
        let body = send(req).await?;
        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| RemoteError::new(format!("Unexpected sign-in response: {}", e)))?;
        self.set_token(Some(token.access_token));
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), RemoteError> {
        let req = self.with_auth(self.http.post(self.auth_url("logout")));
        // The local session is gone whatever the server says
        self.set_token(None);
        send(req).await.map(|_| ())
    }

    async fn select_shipments(&self) -> Result<Vec<Shipment>, RemoteError> {
        let req = self.with_auth(
            self.http
                .get(self.table_url())
                .query(&[("select", "*"), ("order", "id.asc")]),
        );
        let body = send(req).await?;
        serde_json::from_str(&body)
            .map_err(|e| RemoteError::new(format!("Unexpected shipments response: {}", e)))
    }

    async fn insert_shipment(&self, draft: &ShipmentDraft) -> Result<(), RemoteError> {
        let req = self.with_auth(
            self.http
                .post(self.table_url())
                .header("Prefer", "return=minimal")
                .json(&[draft]),
        );
        send(req).await.map(|_| ())
    }

    async fn update_shipment(&self, shipment: &Shipment) -> Result<(), RemoteError> {
        let filter = format!("eq.{}", shipment.id);
        let req = self.with_auth(
            self.http
                .patch(self.table_url())
                .query(&[("id", filter.as_str())])
                .header("Prefer", "return=minimal")
                .json(&shipment.fields),
        );
        send(req).await.map(|_| ())
    }
}

/// Send a request and return the body of a 2xx response; anything else is
/// folded into a `RemoteError` carrying the provider's message.
async fn send(req: reqwest::RequestBuilder) -> Result<String, RemoteError> {
    let resp = req.send().await.map_err(|e| {
        let msg = if e.is_timeout() {
            format!("Request timed out ({}s)", REQUEST_TIMEOUT_SECS)
        } else if e.is_connect() {
            format!("Connection failed: {}", e)
        } else {
            format!("Request failed: {}", e)
        };
        RemoteError::new(msg)
    })?;

    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| RemoteError::new(format!("Error reading body: {}", e)))?;

    if status.is_success() {
        Ok(body)
    } else {
        Err(RemoteError::new(provider_message(status.as_u16(), &body)))
    }
}

/// Pull the human-readable message out of a GoTrue or PostgREST error body
pub fn provider_message(status: u16, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["msg", "message", "error_description", "error"] {
            if let Some(text) = json.get(key).and_then(|v| v.as_str()) {
                if !text.is_empty() {
                    return text.to_string();
                }
            }
        }
    }
    if body.trim().is_empty() {
        format!("HTTP {}", status)
    } else {
        format!("HTTP {}: {}", status, body.trim())
    }
}

/// Create an HTTP client with default configuration
pub fn create_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
