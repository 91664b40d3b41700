//! HTTP plumbing shared by the VERSE backend clients.
//!
//! The backend serves JSON endpoints under `{base}/api/`. Failures come back
//! as a non-2xx status with a body of the form
//! `{"error": "...", "details": "...", "suggestion": "..."}`.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Errors talking to the VERSE backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: reqwest::StatusCode,
        /// The backend's `error` field, or the raw body.
        message: String,
    },

    /// Response body did not match the expected shape.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Base URL and endpoint do not form a valid URL.
    #[error("invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl BackendError {
    /// Whether the request timed out before the backend answered.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout())
    }

    /// HTTP status of an API error.
    #[must_use]
    pub const fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Error body returned by the backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
    pub details: Option<String>,
    pub suggestion: Option<String>,
}

/// Client for the VERSE backend.
///
/// Cloning is cheap and shares the connection pool.
#[derive(Debug, Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

#[derive(Debug)]
struct BackendClientInner {
    client: reqwest::Client,
    api_root: Url,
}

impl BackendClient {
    /// Create a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Http`] if the HTTP client cannot be built and
    /// [`BackendError::InvalidUrl`] if `base_url` cannot be a base.
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("verse-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        // Exactly one trailing slash, so `join` appends instead of replacing
        let normalised = format!("{}/", base_url.as_str().trim_end_matches('/'));
        let api_root = Url::parse(&normalised)?.join("api/")?;

        Ok(Self {
            inner: Arc::new(BackendClientInner { client, api_root }),
        })
    }

    /// Full URL of an `/api/{name}` endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidUrl`] if `name` does not form a URL.
    pub fn endpoint(&self, name: &str) -> Result<Url, BackendError> {
        Ok(self.inner.api_root.join(name)?)
    }

    /// The underlying HTTP client.
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.inner.client
    }

    /// POST `body` as JSON and return the raw response.
    pub(crate) async fn post_json<B>(
        &self,
        name: &str,
        body: &B,
    ) -> Result<reqwest::Response, BackendError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(name)?;
        Ok(self.inner.client.post(url).json(body).send().await?)
    }

    /// POST `body` as JSON and decode a successful response as `T`.
    pub(crate) async fn call<B, T>(&self, name: &str, body: &B) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.post_json(name, body).await?;
        read_json(response).await
    }
}

/// Decode a successful response, or turn a failed one into [`BackendError::Api`].
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, BackendError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(api_error(status, &body));
    }

    serde_json::from_str(&body).map_err(|e| {
        tracing::error!(
            error = %e,
            status = %status,
            body = %body.chars().take(500).collect::<String>(),
            "Failed to parse backend response"
        );
        BackendError::Parse(e)
    })
}

/// Build an API error from a failed response body.
pub(crate) fn api_error(status: reqwest::StatusCode, body: &str) -> BackendError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .unwrap_or_else(|| body.chars().take(200).collect());

    tracing::warn!(status = %status, message = %message, "Backend returned an error");
    BackendError::Api { status, message }
}
