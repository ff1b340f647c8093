//! Configuration for the normalization pipeline.

/// Substrings that mark an upstream error message as an infrastructure
/// failure (DNS, connection, or ISP interference) rather than a gap in
/// route coverage.
pub const DEFAULT_INFRASTRUCTURE_SIGNATURES: &[&str] = &[
    "ISP_LEAK",
    "isp leak",
    "querySrv",
    "ECONNREFUSED",
    "ENOTFOUND",
    "ETIMEDOUT",
];

/// Configuration parameters for route assembly.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Substrings identifying infrastructure failures, matched
    /// case-insensitively against upstream error messages.
    pub infrastructure_signatures: Vec<String>,
}

impl PipelineConfig {
    /// Create a configuration with the given signatures.
    pub fn new(infrastructure_signatures: Vec<String>) -> Self {
        Self {
            infrastructure_signatures,
        }
    }

    /// Add one more infrastructure signature.
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.infrastructure_signatures.push(signature.into());
        self
    }

    /// Returns the first signature contained in `message`, if any.
    pub fn infrastructure_signature_in(&self, message: &str) -> Option<&str> {
        let message = message.to_lowercase();
        self.infrastructure_signatures
            .iter()
            .filter(|s| !s.is_empty())
            .find(|s| message.contains(&s.to_lowercase()))
            .map(String::as_str)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            infrastructure_signatures: DEFAULT_INFRASTRUCTURE_SIGNATURES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}
