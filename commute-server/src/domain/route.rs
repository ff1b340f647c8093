//! Route types.
//!
//! A `Route` is a complete trip from origin to destination, made of
//! segments, with totals and turn-by-turn instructions. Every route handed
//! to callers has come through the sanitizer, so its lists are never
//! missing and its numbers are always finite.

use serde::Serialize;
use serde_json::{Map, Value};

use super::Segment;

/// Place name used when a payload names no origin or destination.
pub const UNKNOWN_PLACE: &str = "Unknown";

/// Strategy recorded when a payload names none.
pub const DEFAULT_STRATEGY: &str = "standard";

/// Broad shape of a route, derived from its segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteClassification {
    /// A single ridden segment, possibly with walks around it.
    Direct,
    /// Two or more ridden segments.
    Transfer,
    /// Nothing but walking.
    WalkOnly,
    /// No segments to judge by.
    #[default]
    Unknown,
}

impl RouteClassification {
    /// Parse a classification label such as `"DIRECT"` or `"walk_only"`.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        match label.as_str() {
            "DIRECT" => Some(RouteClassification::Direct),
            "TRANSFER" => Some(RouteClassification::Transfer),
            "WALK_ONLY" => Some(RouteClassification::WalkOnly),
            "UNKNOWN" => Some(RouteClassification::Unknown),
            _ => None,
        }
    }

    /// Classify a route by counting its ridden segments.
    pub fn of_segments(segments: &[Segment]) -> Self {
        if segments.is_empty() {
            return RouteClassification::Unknown;
        }

        let ridden = segments
            .iter()
            .filter(|s| s.vehicle_type.is_motorized())
            .count();

        match ridden {
            0 => RouteClassification::WalkOnly,
            1 => RouteClassification::Direct,
            _ => RouteClassification::Transfer,
        }
    }
}

/// Route metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMetadata {
    /// Name of the strategy that produced the route.
    pub strategy: String,

    /// Whether the upstream also offered alternatives.
    pub alternative_routes: bool,

    /// Other metadata carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for RouteMetadata {
    fn default() -> Self {
        Self {
            strategy: DEFAULT_STRATEGY.to_string(),
            alternative_routes: false,
            extra: Map::new(),
        }
    }
}

/// A canonical route.
///
/// # Invariants
///
/// - `total_distance`, `total_time` and `total_cost` are finite and `>= 0`
/// - `instructions` holds no blank strings
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Origin name.
    pub from: String,

    /// Destination name.
    pub to: String,

    /// Legs in travel order. May be empty.
    pub segments: Vec<Segment>,

    /// Total distance in meters.
    pub total_distance: f64,

    /// Total travel time in minutes.
    pub total_time: f64,

    /// Total fare in currency units.
    pub total_cost: f64,

    /// Turn-by-turn instructions.
    pub instructions: Vec<String>,

    /// Why the upstream chose this route.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,

    pub classification: RouteClassification,

    pub metadata: RouteMetadata,

    /// Fields the payload carried that this type does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Route {
    /// Sum of the segments' distances, in meters.
    pub fn segment_distance(&self) -> f64 {
        self.segments.iter().map(|s| s.distance).sum()
    }

    /// Sum of the segments' travel times, in minutes.
    pub fn segment_time(&self) -> f64 {
        self.segments.iter().map(|s| s.estimated_time).sum()
    }

    /// Sum of the segments' fares.
    pub fn segment_cost(&self) -> f64 {
        self.segments.iter().map(|s| s.cost).sum()
    }
}

impl Default for Route {
    fn default() -> Self {
        Self {
            from: UNKNOWN_PLACE.to_string(),
            to: UNKNOWN_PLACE.to_string(),
            segments: Vec::new(),
            total_distance: 0.0,
            total_time: 0.0,
            total_cost: 0.0,
            instructions: Vec::new(),
            rationale: None,
            classification: RouteClassification::Unknown,
            metadata: RouteMetadata::default(),
            extra: Map::new(),
        }
    }
}
