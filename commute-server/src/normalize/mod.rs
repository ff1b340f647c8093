//! Route response normalization.
//!
//! The routing backend is inconsistent about how it shapes responses,
//! names fields, and encodes numbers. This module turns whatever it returns
//! into canonical [`Route`](crate::domain::Route)s:
//!
//! - [`coerce`] reads numbers out of numbers, numeric strings and range objects
//! - [`segment`] rewrites one raw leg into canonical segment keys
//! - [`sanitize`] builds typed values with defaults for anything missing
//! - [`shape`] recognises the response layout and extracts route candidates
//! - [`assemble`] produces the final result with derived fields
//!
//! None of these fail: malformed input degrades to defaults.

pub mod assemble;
pub mod coerce;
pub mod config;
pub mod sanitize;
pub mod segment;
pub mod shape;
mod value;

#[cfg(test)]
mod strategies;

pub use assemble::{RouteAssembler, RouteResponse, assemble_routes};
pub use coerce::{CoercionMode, coerce_number, coerce_number_with};
pub use config::{DEFAULT_INFRASTRUCTURE_SIGNATURES, PipelineConfig};
pub use sanitize::{Sanitize, sanitize_all};
pub use segment::{UNKNOWN_END, UNKNOWN_START, normalize_segment, normalize_segments};
pub use shape::{ResponseShape, extract_routes};
