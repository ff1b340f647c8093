//! Routing backend adapter.
//!
//! Fetches raw route-generation responses, either from the live backend
//! over HTTP or from canned JSON fixtures, and runs them through the
//! normalization pipeline.

mod client;
mod error;
mod mock;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::normalize::{RouteAssembler, RouteResponse};

pub use client::{UpstreamClient, UpstreamConfig};
pub use error::UpstreamError;
pub use mock::MockUpstreamClient;

/// A route request as the backend expects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    /// Origin place name.
    pub from: String,

    /// Destination place name.
    pub to: String,

    /// Routing strategy hint, e.g. "fastest" or "cheapest".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
}

impl RouteRequest {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            strategy: None,
        }
    }

    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }
}

/// Source of raw route-generation responses.
///
/// This abstraction allows the web layer to be tested with fixtures.
pub trait RouteProvider {
    /// Fetch the raw response for `request`.
    fn fetch_routes(
        &self,
        request: &RouteRequest,
    ) -> impl Future<Output = Result<Value, UpstreamError>> + Send;
}

impl RouteProvider for UpstreamClient {
    async fn fetch_routes(&self, request: &RouteRequest) -> Result<Value, UpstreamError> {
        self.generate(request).await
    }
}

impl RouteProvider for MockUpstreamClient {
    async fn fetch_routes(&self, request: &RouteRequest) -> Result<Value, UpstreamError> {
        self.generate(request).await
    }
}

/// Either the live backend or mock fixtures, chosen at startup.
#[derive(Debug, Clone)]
pub enum RouteSource {
    Live(UpstreamClient),
    Mock(MockUpstreamClient),
}

impl RouteProvider for RouteSource {
    async fn fetch_routes(&self, request: &RouteRequest) -> Result<Value, UpstreamError> {
        match self {
            RouteSource::Live(client) => client.generate(request).await,
            RouteSource::Mock(client) => client.generate(request).await,
        }
    }
}

/// Fetch routes for `request` and assemble the result.
///
/// Transport failures are returned as errors; anything the backend actually
/// said, including "no route", comes back as a [`RouteResponse`].
pub async fn plan_route<P: RouteProvider>(
    provider: &P,
    assembler: &RouteAssembler,
    request: &RouteRequest,
) -> Result<RouteResponse, UpstreamError> {
    let raw = provider.fetch_routes(request).await?;
    let response = assembler.assemble(&raw);

    info!(
        from = %request.from,
        to = %request.to,
        routes = response.data.len(),
        success = response.success,
        "planned route"
    );
    Ok(response)
}
