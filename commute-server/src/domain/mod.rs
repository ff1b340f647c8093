//! Canonical domain types for commute routes.
//!
//! These are the shapes every consumer can rely on: lists are never
//! missing, numbers are always finite, and stops always carry coordinates
//! (`0, 0` meaning "unknown"). Values of these types are only ever built by
//! the normalization pipeline or by hand in tests.

mod route;
mod segment;
mod stop;
mod vehicle;

pub use route::{DEFAULT_STRATEGY, Route, RouteClassification, RouteMetadata, UNKNOWN_PLACE};
pub use segment::{DEFAULT_RISK_LEVEL, FareRange, SafetyData, Segment};
pub use stop::{Stop, UNKNOWN_STOP_NAME};
pub use vehicle::{UnknownVehicleType, VehicleType};
