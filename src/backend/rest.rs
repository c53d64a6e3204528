//! Hosted backend client.
//!
//! Table calls go to the PostgREST surface under `/rest/v1`, auth calls to the
//! GoTrue surface under `/auth/v1`. Every request carries the project's anon
//! key as `apikey`; the bearer token is the session's access token when signed
//! in and the anon key otherwise.

use std::path::PathBuf;
use std::sync::RwLock;

use chrono::{TimeDelta, Utc};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::{Backend, BackendError};
use crate::config::BackendConfig;
use crate::domain::{Credentials, Order, OrderInsert, OrderPatch, Session, SessionUser};

// ---------------------------------------------------------------------------
// URL normalisation
// ---------------------------------------------------------------------------

/// Normalise the project URL:
/// - ensure a scheme is present (https, or http for localhost)
/// - strip trailing slashes
/// - strip a trailing `/rest/v1` segment
pub fn normalize_base_url(url: &str) -> String {
    let mut url = url.trim().to_string();

    if !url.starts_with("http://") && !url.starts_with("https://") {
        if url.starts_with("localhost") || url.starts_with("127.0.0.1") {
            url = format!("http://{url}");
        } else {
            url = format!("https://{url}");
        }
    }

    while url.ends_with('/') {
        url.pop();
    }
    if let Some(stripped) = url.strip_suffix("/rest/v1") {
        url = stripped.to_string();
    }
    while url.ends_with('/') {
        url.pop();
    }

    url
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

fn friendly_error(url: &str, err: &reqwest::Error) -> BackendError {
    if err.is_connect() {
        return BackendError::Network(format!("Cannot reach backend at {url}"));
    }
    if err.is_timeout() {
        return BackendError::Network(format!("Connection to {url} timed out"));
    }
    if err.is_decode() {
        return BackendError::Decode(err.to_string());
    }
    BackendError::Network(format!("Network error communicating with {url}: {err}"))
}

fn status_message(status: StatusCode) -> String {
    match status.as_u16() {
        401 => "API key or session is invalid or expired".to_string(),
        403 => "Not authorized for this table".to_string(),
        404 => "Backend endpoint not found".to_string(),
        s if s >= 500 => format!("Backend server error (HTTP {s})"),
        s => format!("Unexpected response from backend (HTTP {s})"),
    }
}

/// Pull the human-readable message out of a PostgREST or GoTrue error body.
fn error_body_message(body: &str) -> Option<String> {
    let json = serde_json::from_str::<Value>(body).ok()?;
    ["message", "msg", "error_description", "error"]
        .iter()
        .find_map(|key| json.get(*key).and_then(Value::as_str))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

async fn check(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = error_body_message(&body).unwrap_or_else(|| status_message(status));
    Err(BackendError::Status {
        status: status.as_u16(),
        message,
    })
}

// ---------------------------------------------------------------------------
// Auth payloads
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    user: SessionUser,
}

impl From<TokenResponse> for Session {
    fn from(token: TokenResponse) -> Self {
        Session {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            // An out-of-range lifetime is treated as no expiry.
            expires_at: token
                .expires_in
                .and_then(TimeDelta::try_seconds)
                .and_then(|ttl| Utc::now().checked_add_signed(ttl)),
            user: token.user,
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct RestBackend {
    http: Client,
    base_url: String,
    anon_key: String,
    table: String,
    session: RwLock<Option<Session>>,
    session_file: Option<PathBuf>,
}

impl RestBackend {
    /// Build the client and restore a session saved by an earlier run.
    pub async fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BackendError::Network(format!("Failed to create HTTP client: {e}")))?;

        let backend = Self {
            http,
            base_url: normalize_base_url(&config.url),
            anon_key: config.anon_key.clone(),
            table: config.table.clone(),
            session: RwLock::new(None),
            session_file: config.session_file.clone(),
        };
        if let Some(session) = backend.load_session().await {
            *backend
                .session
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(session);
        }
        Ok(backend)
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }

    fn session(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn bearer(&self) -> String {
        self.session()
            .map(|s| s.access_token)
            .unwrap_or_else(|| self.anon_key.clone())
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, BackendError> {
        let response = request
            .send()
            .await
            .map_err(|e| friendly_error(&self.base_url, &e))?;
        check(response).await
    }

    async fn store_session(&self, session: Option<Session>) {
        self.persist_session(session.as_ref()).await;
        *self
            .session
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = session;
    }

    async fn load_session(&self) -> Option<Session> {
        let path = self.session_file.as_ref()?;
        let raw = tokio::fs::read_to_string(path).await.ok()?;
        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => {
                debug!(path = %path.display(), "Restored stored session");
                Some(session)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable session file");
                None
            }
        }
    }

    async fn persist_session(&self, session: Option<&Session>) {
        let Some(path) = &self.session_file else {
            return;
        };
        let result = match session {
            Some(session) => match serde_json::to_string(session) {
                Ok(json) => tokio::fs::write(path, json).await,
                Err(e) => Err(std::io::Error::other(e)),
            },
            None => match tokio::fs::remove_file(path).await {
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                other => other,
            },
        };
        if let Err(e) = result {
            warn!(path = %path.display(), error = %e, "Failed to update session file");
        }
    }
}

/// Decode fetched rows one at a time. A row that does not decode is logged
/// and left out instead of failing the whole list.
fn decode_rows(rows: Vec<Value>) -> Vec<Order> {
    rows.into_iter()
        .filter_map(|row| {
            let row_id = row.get("id").cloned();
            match serde_json::from_value::<Order>(row) {
                Ok(order) => Some(order),
                Err(e) => {
                    warn!(row_id = ?row_id, error = %e, "Skipping undecodable order row");
                    None
                }
            }
        })
        .collect()
}

impl Backend for RestBackend {
    #[instrument(skip(self), fields(table = %self.table))]
    async fn list_orders(&self) -> Result<Vec<Order>, BackendError> {
        let request = self
            .request(Method::GET, &self.table_url())
            .query(&[("select", "*"), ("order", "created_at.desc")]);
        let response = self.send(request).await?;
        let rows: Vec<Value> = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        let fetched = rows.len();
        let orders = decode_rows(rows);
        debug!(row_count = orders.len(), skipped = fetched - orders.len(), "Fetched orders");
        Ok(orders)
    }

    #[instrument(skip(self), fields(table = %self.table))]
    async fn update_order(&self, id: &str, patch: OrderPatch) -> Result<(), BackendError> {
        let request = self
            .request(Method::PATCH, &self.table_url())
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=minimal")
            .json(&patch);
        self.send(request).await?;
        Ok(())
    }

    #[instrument(skip(self, row), fields(table = %self.table, ordercli = %row.identifier))]
    async fn insert_order(&self, row: OrderInsert) -> Result<(), BackendError> {
        let request = self
            .request(Method::POST, &self.table_url())
            .header("Prefer", "return=minimal")
            .json(&[row]);
        self.send(request).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(table = %self.table))]
    async fn delete_order(&self, id: &str) -> Result<(), BackendError> {
        let request = self
            .request(Method::DELETE, &self.table_url())
            .query(&[("id", format!("eq.{id}"))]);
        self.send(request).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn current_session(&self) -> Result<Option<Session>, BackendError> {
        let Some(session) = self.session() else {
            return Ok(None);
        };
        if session.is_expired(Utc::now()) {
            info!("Stored session expired");
            self.store_session(None).await;
            return Ok(None);
        }

        let request = self.request(Method::GET, &self.auth_url("user"));
        match self.send(request).await {
            Ok(_) => Ok(Some(session)),
            Err(BackendError::Status { status: 401 | 403, .. }) => {
                info!("Stored session rejected by backend");
                self.store_session(None).await;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn sign_in(&self, credentials: Credentials) -> Result<Session, BackendError> {
        let request = self
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&credentials);

        let response = match self.send(request).await {
            Ok(response) => response,
            Err(BackendError::Status { status, message }) if status < 500 => {
                warn!(status, "Sign-in rejected");
                return Err(BackendError::Auth(message));
            }
            Err(e) => return Err(e),
        };

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        let session = Session::from(token);
        self.store_session(Some(session.clone())).await;
        info!("Signed in");
        Ok(session)
    }

    #[instrument(skip(self))]
    async fn sign_out(&self) -> Result<(), BackendError> {
        if self.session().is_none() {
            return Ok(());
        }
        let request = self.request(Method::POST, &self.auth_url("logout"));
        let result = self.send(request).await.map(|_| ());
        // The local session is gone whatever the backend said.
        self.store_session(None).await;
        result
    }
}
