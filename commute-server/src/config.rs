//! Server configuration, read from the environment.
//!
//! | Variable                          | Default                     |
//! |-----------------------------------|-----------------------------|
//! | `COMMUTE_BIND_ADDR`               | `127.0.0.1:3000`            |
//! | `COMMUTE_UPSTREAM_URL`            | `http://localhost:8080/api` |
//! | `COMMUTE_UPSTREAM_TIMEOUT_SECS`   | `30`                        |
//! | `COMMUTE_UPSTREAM_MAX_CONCURRENT` | `8`                         |
//! | `COMMUTE_MOCK_DIR`                | unset (use the live API)    |
//! | `COMMUTE_INFRA_SIGNATURES`        | built-in list               |

use std::net::SocketAddr;
use std::path::PathBuf;

use tokio::sync::Semaphore;

use crate::normalize::PipelineConfig;
use crate::upstream::UpstreamConfig;

/// Address the server listens on when none is configured.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Errors from reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid bind address {value:?}: {message}")]
    InvalidBindAddr { value: String, message: String },

    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var} must be at most {max}, got {value:?}")]
    TooLarge {
        var: &'static str,
        value: String,
        max: usize,
    },
}

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub upstream: UpstreamConfig,
    pub pipeline: PipelineConfig,
    /// Serve fixtures from this directory instead of calling the backend.
    pub mock_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let bind_value = get("COMMUTE_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_value
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidBindAddr {
                value: bind_value.clone(),
                message: e.to_string(),
            })?;

        let mut upstream = UpstreamConfig::default();
        if let Some(url) = get("COMMUTE_UPSTREAM_URL") {
            upstream = upstream.with_base_url(url.trim());
        }
        if let Some(secs) = get("COMMUTE_UPSTREAM_TIMEOUT_SECS") {
            upstream = upstream.with_timeout(positive("COMMUTE_UPSTREAM_TIMEOUT_SECS", &secs)?);
        }
        if let Some(n) = get("COMMUTE_UPSTREAM_MAX_CONCURRENT") {
            upstream = upstream.with_max_concurrent(permits("COMMUTE_UPSTREAM_MAX_CONCURRENT", &n)?);
        }

        let pipeline = match get("COMMUTE_INFRA_SIGNATURES") {
            Some(list) => PipelineConfig::new(
                list.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            None => PipelineConfig::default(),
        };

        Ok(Self {
            bind_addr,
            upstream,
            pipeline,
            mock_dir: get("COMMUTE_MOCK_DIR").map(PathBuf::from),
        })
    }
}

fn positive(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        })
}

/// A positive permit count the upstream semaphore can hold.
fn permits(var: &'static str, value: &str) -> Result<usize, ConfigError> {
    let n = positive(var, value)?;
    usize::try_from(n)
        .ok()
        .filter(|n| *n <= Semaphore::MAX_PERMITS)
        .ok_or_else(|| ConfigError::TooLarge {
            var,
            value: value.to_string(),
            max: Semaphore::MAX_PERMITS,
        })
}
