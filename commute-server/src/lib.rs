//! Commute route server.
//!
//! Normalizes the inconsistent responses of a commute routing backend into
//! canonical routes that clients can render as they are, and
//! serves them over HTTP.

pub mod config;
pub mod domain;
pub mod normalize;
pub mod projection;
pub mod upstream;
pub mod web;
