//! HTTP client for the CodeKnowl backend: `POST /qa/ask` and `GET /health`.
//!
//! Every call is a single round trip. Nothing is retried; a failed attempt is
//! returned to the caller as a [`ClientError`].

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::BackendConfig;
use crate::messages::{AskRequest, AskResponse, HealthStatus};

/// Path of the question endpoint, appended to the base URL.
pub const ASK_PATH: &str = "/qa/ask";

/// Path of the liveness endpoint, appended to the base URL.
pub const HEALTH_PATH: &str = "/health";

/// Errors produced by backend calls.
///
/// Messages carry no prefix; the command layer adds the user-facing one.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be completed (connection refused, DNS, timeout,
    /// unusable URL). The message is whatever the transport reports.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("Backend request failed: {status} {status_text}: {body}")]
    Backend {
        status: u16,
        status_text: String,
        /// Raw response body, verbatim.
        body: String,
    },

    /// A 2xx body that is not JSON or does not match the expected shape.
    #[error("{0}")]
    MalformedResponse(#[from] serde_json::Error),
}

impl ClientError {
    fn backend(status: StatusCode, body: String) -> Self {
        ClientError::Backend {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        }
    }
}

/// Result alias for backend calls.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Thin backend client. Holds a reusable connection pool; the base URL and
/// timeout are passed per call so a changed setting applies immediately.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
}

impl Client {
    /// Build a client with the transport's defaults (no overall timeout).
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http })
    }

    /// Ask `question` against the backend at `backend.base_url`.
    #[instrument(skip_all, fields(base_url = %backend.base_url))]
    pub async fn ask(&self, backend: &BackendConfig, question: &str) -> Result<AskResponse> {
        let url = format!("{}{}", backend.base_url, ASK_PATH);
        debug!("POST {}", url);

        let mut req = self.http.post(&url).json(&AskRequest::new(question));
        if let Some(timeout) = backend.request_timeout {
            req = req.timeout(timeout);
        }
        let resp = req.send().await?;
        read_json(resp).await
    }

    /// Query the backend's liveness route.
    #[instrument(skip_all, fields(base_url = %backend.base_url))]
    pub async fn health(&self, backend: &BackendConfig) -> Result<HealthStatus> {
        let url = format!("{}{}", backend.base_url, HEALTH_PATH);
        debug!("GET {}", url);

        let mut req = self.http.get(&url);
        if let Some(timeout) = backend.request_timeout {
            req = req.timeout(timeout);
        }
        let resp = req.send().await?;
        read_json(resp).await
    }
}

/// One-shot ask against `base_url` (already normalized) with a fresh client.
pub async fn ask_backend(question: &str, base_url: &str) -> Result<AskResponse> {
    let backend = BackendConfig {
        base_url: base_url.to_string(),
        request_timeout: None,
    };
    Client::new()?.ask(&backend, question).await
}

async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    let text = resp.text().await?;
    if !status.is_success() {
        debug!(status = status.as_u16(), "backend returned an error status");
        return Err(ClientError::backend(status, text));
    }
    Ok(serde_json::from_str(&text)?)
}
