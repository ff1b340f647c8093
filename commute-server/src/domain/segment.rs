//! Segment types.
//!
//! A `Segment` is one leg of a commute: a single vehicle (or a walk)
//! between two stops, with its distance, time, cost and safety notes.

use serde::Serialize;
use serde_json::{Map, Value};

use super::{Stop, VehicleType};

/// Risk level assumed when a payload does not state one.
pub const DEFAULT_RISK_LEVEL: &str = "safe";

/// Safety annotations attached to a segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyData {
    /// Human-readable alerts along the segment.
    pub risk_alerts: Vec<String>,

    /// Whether the segment lies in a designated safe zone.
    pub is_safe_zone: bool,

    /// Overall risk level label (e.g. "safe", "moderate", "high").
    pub risk_level: String,

    /// Specific threats reported along the segment.
    pub threats: Vec<String>,
}

impl Default for SafetyData {
    fn default() -> Self {
        Self {
            risk_alerts: Vec::new(),
            is_safe_zone: false,
            risk_level: DEFAULT_RISK_LEVEL.to_string(),
            threats: Vec::new(),
        }
    }
}

/// A fare quoted as a range rather than a single figure.
///
/// # Invariants
///
/// - `0 <= min <= max`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FareRange {
    pub min: f64,
    pub max: f64,
}

impl FareRange {
    /// Build a range from two bounds in either order.
    ///
    /// Negative bounds are raised to zero.
    ///
    /// ```
    /// use commute_server::domain::FareRange;
    ///
    /// let fare = FareRange::new(300.0, 200.0);
    /// assert_eq!((fare.min, fare.max), (200.0, 300.0));
    /// ```
    pub fn new(a: f64, b: f64) -> Self {
        let (a, b) = (a.max(0.0), b.max(0.0));
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }
}

/// One leg of a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// How the segment is travelled.
    pub vehicle_type: VehicleType,

    /// Where the segment starts.
    pub from_stop: Stop,

    /// Where the segment ends.
    pub to_stop: Stop,

    /// Upstream identifier of the start stop, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_stop_id: Option<String>,

    /// Upstream identifier of the end stop, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_stop_id: Option<String>,

    /// Distance in meters.
    pub distance: f64,

    /// Travel time in minutes.
    pub estimated_time: f64,

    /// Fare in currency units (the upper bound when quoted as a range).
    pub cost: f64,

    /// The quoted fare range, when the payload gave one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fare_range: Option<FareRange>,

    /// What the commuter should do. Never empty.
    pub instruction: String,

    /// Safety annotations.
    pub safety_data: SafetyData,

    /// Fields the payload carried that this type does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Segment {
    /// Phrase a user-facing instruction for travelling to `destination`.
    ///
    /// ```
    /// use commute_server::domain::{Segment, VehicleType};
    ///
    /// assert_eq!(
    ///     Segment::describe(VehicleType::Keke, Some("Wuse Market")),
    ///     "Take keke to Wuse Market"
    /// );
    /// assert_eq!(Segment::describe(VehicleType::Walk, None), "Walk to the next stop");
    /// ```
    pub fn describe(vehicle: VehicleType, destination: Option<&str>) -> String {
        let destination = destination.unwrap_or("the next stop");
        match vehicle {
            VehicleType::Walk => format!("Walk to {destination}"),
            vehicle => format!("Take {vehicle} to {destination}"),
        }
    }
}

impl Default for Segment {
    fn default() -> Self {
        Self {
            vehicle_type: VehicleType::Walk,
            from_stop: Stop::default(),
            to_stop: Stop::default(),
            from_stop_id: None,
            to_stop_id: None,
            distance: 0.0,
            estimated_time: 0.0,
            cost: 0.0,
            fare_range: None,
            instruction: Segment::describe(VehicleType::Walk, None),
            safety_data: SafetyData::default(),
            extra: Map::new(),
        }
    }
}
