//! HTTP transport seam.
//!
//! ARCHITECTURE
//! ============
//! Every backend call in this crate is a single `GET` with optional bearer
//! auth. `HttpTransport` captures exactly that so session and loader logic can
//! run against `ReqwestTransport` in production and a scripted mock in tests.
//!
//! TRADE-OFFS
//! ==========
//! Replies carry the raw body text rather than decoded JSON: callers decide
//! whether a non-success body is an error envelope or noise.

use crate::config::{ClientConfig, normalize_base_url};
use crate::credentials::{Credential, bearer_header};
use crate::error::{ClientError, TransportError};

/// Status code and body of one HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON into `T`.
    ///
    /// # Errors
    ///
    /// Returns the serde error if the body does not match `T`.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Issue a `GET` against the backend.
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    /// Fetch `path` (relative to the API base URL), attaching
    /// `Authorization: Bearer <token>` when `credential` is present.
    async fn get(&self, path: &str, credential: Option<&Credential>) -> Result<Reply, TransportError>;
}

/// `reqwest`-backed transport bound to one API base URL.
pub struct ReqwestTransport {
    http: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Build a transport with the configured base URL and timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeouts.request())
            .connect_timeout(config.timeouts.connect())
            .build()
            .map_err(|e| ClientError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: normalize_base_url(&config.api_base_url) })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, path: &str, credential: Option<&Credential>) -> Result<Reply, TransportError> {
        let url = self.url(path);
        let mut request = self.http.get(&url);
        if let Some(credential) = credential {
            request = request.header(reqwest::header::AUTHORIZATION, bearer_header(credential));
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::debug!(%url, status, "backend reply");

        Ok(Reply { status, body })
    }
}

#[cfg(test)]
#[path = "transport_test.rs"]
mod tests;
