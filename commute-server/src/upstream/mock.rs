//! Mock upstream for running without a routing backend.
//!
//! Loads canned route-generation responses from JSON files and serves them
//! as if they came from the live API. Fixtures are kept as raw JSON, so
//! they may use any of the layouts the backend produces.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::RouteRequest;
use super::error::UpstreamError;

/// Fixture served when no route-specific file matches.
const DEFAULT_FIXTURE: &str = "default";

/// Mock upstream that serves responses from JSON files.
#[derive(Debug, Clone)]
pub struct MockUpstreamClient {
    /// Raw responses, keyed by file stem.
    responses: Arc<HashMap<String, Value>>,
}

impl MockUpstreamClient {
    /// Load every `*.json` file in `data_dir`.
    ///
    /// A file named `{from}_to_{to}.json` (slugged, e.g. `kubwa_to_wuse-market.json`)
    /// answers that pair; `default.json` answers everything else.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, UpstreamError> {
        let data_dir = data_dir.as_ref();

        let mut responses = HashMap::new();
        let entries = std::fs::read_dir(data_dir).map_err(|e| fixture_error(data_dir, e))?;

        for entry in entries {
            let path = entry.map_err(|e| fixture_error(data_dir, e))?.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let json = std::fs::read_to_string(&path).map_err(|e| fixture_error(&path, e))?;
            let value: Value = serde_json::from_str(&json).map_err(|e| fixture_error(&path, e))?;
            responses.insert(stem.to_lowercase(), value);
        }

        if responses.is_empty() {
            return Err(fixture_error(data_dir, "no .json fixtures found"));
        }

        debug!(fixtures = responses.len(), dir = %data_dir.display(), "loaded mock route responses");
        Ok(Self {
            responses: Arc::new(responses),
        })
    }

    /// Number of loaded fixtures.
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Serve the fixture for `request`, or the default fixture.
    pub async fn generate(&self, request: &RouteRequest) -> Result<Value, UpstreamError> {
        let key = fixture_key(request);
        self.responses
            .get(&key)
            .or_else(|| self.responses.get(DEFAULT_FIXTURE))
            .cloned()
            .ok_or(UpstreamError::NotFound(key))
    }
}

fn fixture_error(path: &Path, message: impl std::fmt::Display) -> UpstreamError {
    UpstreamError::Fixture {
        path: path.display().to_string(),
        message: message.to_string(),
    }
}

/// `{from}_to_{to}`, lowercased, with anything but ASCII letters and digits
/// turned into `-`.
fn fixture_key(request: &RouteRequest) -> String {
    format!("{}_to_{}", slug(&request.from), slug(&request.to))
}

fn slug(place: &str) -> String {
    place
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}
