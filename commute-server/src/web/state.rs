//! Application state for the web layer.

use std::sync::Arc;

use crate::normalize::RouteAssembler;
use crate::upstream::RouteSource;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Normalization pipeline
    pub assembler: Arc<RouteAssembler>,

    /// Where raw route responses come from
    pub source: Arc<RouteSource>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(assembler: RouteAssembler, source: RouteSource) -> Self {
        Self {
            assembler: Arc::new(assembler),
            source: Arc::new(source),
        }
    }
}
