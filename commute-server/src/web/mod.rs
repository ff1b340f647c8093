//! Web layer for the commute route service.
//!
//! Provides HTTP endpoints for normalizing raw route responses and for
//! planning routes through the routing backend.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
