//! REST client plumbing shared by every endpoint.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::{AppError, Result};
use crate::session::Session;

/// Front desk backend client.
///
/// Cheap to clone; clones share the HTTP connection pool and the session.
/// Every request except the auth endpoints carries the session's bearer
/// token, and any 401 ends the session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    /// Create a new client instance.
    pub fn new(config: &ApiConfig, session: Session) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.normalized_base_url().to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{base}{path}", base = self.base_url)
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    pub(crate) fn patch(&self, path: &str) -> RequestBuilder {
        self.client.patch(self.url(path))
    }

    pub(crate) fn delete(&self, path: &str) -> RequestBuilder {
        self.client.delete(self.url(path))
    }

    /// Send an authenticated request and check its status.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let request = match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;
        debug!("{} {}", response.status(), response.url().path());

        if response.status() == StatusCode::UNAUTHORIZED {
            warn!("Backend rejected session token, logging out");
            self.session.end();
            return Err(AppError::Unauthorized);
        }
        error_for_status(response).await
    }

    /// Send a request without the bearer token (auth endpoints).
    pub(crate) async fn send_anonymous(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        debug!("{} {}", response.status(), response.url().path());
        error_for_status(response).await
    }

    /// Send an authenticated request and decode a JSON body.
    pub(crate) async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        Ok(response.json::<T>().await?)
    }

    /// Check that the backend is reachable and healthy.
    ///
    /// The root path has no route of its own, so 404 and 401 count as a
    /// live backend. Server errors do not.
    pub async fn test_connection(&self) -> Result<bool> {
        let status = self.client.get(self.url("/")).send().await?.status();
        debug!("{} /", status);
        Ok(status.is_success() || status == StatusCode::NOT_FOUND || status == StatusCode::UNAUTHORIZED)
    }
}

/// Turn a non-success response into `AppError::Server`.
async fn error_for_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(AppError::Server {
        status: status.as_u16(),
        message: extract_message(&body),
    })
}

/// Pull the user-facing message out of an error body.
///
/// The backend reports either `{"message": "..."}` or, for validation
/// failures, `{"message": ["first", "second"]}`; the first string wins.
pub(crate) fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("message")? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Array(items) => items.iter().find_map(|v| v.as_str()).map(str::to_string),
        _ => None,
    }
}
