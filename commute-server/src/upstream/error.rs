//! Upstream client error types.

/// Errors from fetching route responses.
///
/// These are transport and fixture failures only. A response that arrives
/// but says "no route" is not an error; it is assembled like any other.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not JSON
    #[error("JSON parse error: {message}{}", body_suffix(.body))]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status with a non-JSON body
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// Rate limited by the API
    #[error("rate limited by routing API")]
    RateLimited,

    /// No canned response for the request
    #[error("no mock response for {0}")]
    NotFound(String),

    /// A mock fixture could not be loaded
    #[error("failed to load fixture {path}: {message}")]
    Fixture { path: String, message: String },
}

fn body_suffix(body: &Option<String>) -> String {
    body.as_deref()
        .map(|b| format!(" (body: {b})"))
        .unwrap_or_default()
}
