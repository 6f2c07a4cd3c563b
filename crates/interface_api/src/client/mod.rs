//! REST client for the claims backend
//!
//! `ApiClient` wraps a `reqwest::Client`, attaches the bearer token from
//! the shared [`SessionStore`], unwraps the `{ data, message, success }`
//! envelope and maps failures onto [`ApiError`]. A 401 clears the stored
//! session so the next command starts from the login screen.
//!
//! Calls are grouped per resource in the submodules.

mod attachments;
mod auth;
mod claims;
mod notes;
mod reports;
mod users;

use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::dto::{ApiResponse, ErrorBody};
use crate::error::ApiError;
use crate::session::SessionStore;

/// Typed client for the backend REST API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: SessionStore) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Request to `{base_url}{path}`, authenticated when a session exists
    async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        match self.session.token().await {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends a request and unwraps the response envelope
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<ApiResponse<T>, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        debug!(%status, url = %response.url(), "Backend response");

        let bytes = response.bytes().await?;
        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(ErrorBody::into_message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_string());
            return Err(self.failure(status, message).await);
        }

        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Sends a request and returns only the envelope's data
    async fn data<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        Ok(self.send(builder).await?.data)
    }

    async fn failure(&self, status: StatusCode, message: String) -> ApiError {
        match status {
            StatusCode::UNAUTHORIZED => {
                warn!(%message, "Backend rejected the session, clearing stored token");
                self.session.clear().await;
                ApiError::Unauthorized(message)
            }
            StatusCode::FORBIDDEN => ApiError::Forbidden(message),
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            _ => ApiError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}
