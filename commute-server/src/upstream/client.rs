//! Routing backend HTTP client.
//!
//! Posts route requests to the backend's route-generation endpoint and
//! hands back the raw JSON body. Nothing here interprets the body; that is
//! the normalization pipeline's job.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use super::RouteRequest;
use super::error::UpstreamError;

/// Default base URL for the routing backend.
const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How much of an unparseable body to keep for diagnostics.
const BODY_EXCERPT_CHARS: usize = 500;

/// Configuration for the upstream client.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Base URL of the routing API
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl UpstreamConfig {
    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Routing backend client.
///
/// Uses a semaphore to limit concurrent requests.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl UpstreamClient {
    /// Create a new client with the given configuration.
    ///
    /// `max_concurrent` is clamped to what a tokio semaphore can hold.
    pub fn new(config: UpstreamConfig) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.clamp(1, Semaphore::MAX_PERMITS))),
        })
    }

    /// URL of the route-generation endpoint.
    pub fn generate_url(&self) -> String {
        format!("{}/routes/generate", self.base_url)
    }

    /// Request routes and return the raw response body.
    ///
    /// The backend reports "no route" and "outside coverage" as JSON bodies
    /// on error statuses, so any JSON body is returned whatever the status.
    /// Only a 429, or a non-JSON body, is an error.
    pub async fn generate(&self, request: &RouteRequest) -> Result<Value, UpstreamError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| UpstreamError::ApiError {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = self.generate_url();
        debug!(%url, from = %request.from, to = %request.to, "requesting routes");

        let response = self.http.post(&url).json(request).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!(%url, "routing API rate limited");
            return Err(UpstreamError::RateLimited);
        }

        let body = response.text().await?;

        match serde_json::from_str::<Value>(&body) {
            Ok(value) => {
                if !status.is_success() {
                    debug!(status = status.as_u16(), "routing API returned JSON error body");
                }
                Ok(value)
            }
            Err(e) if status.is_success() => Err(UpstreamError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(BODY_EXCERPT_CHARS).collect()),
            }),
            Err(_) => Err(UpstreamError::ApiError {
                status: status.as_u16(),
                message: body.chars().take(BODY_EXCERPT_CHARS).collect(),
            }),
        }
    }
}
