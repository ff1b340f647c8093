//! Vehicle mode vocabulary.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Error returned when a label names no known vehicle mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown vehicle type: {label:?}")]
pub struct UnknownVehicleType {
    label: String,
}

/// How a segment of a commute is travelled.
///
/// Upstream payloads spell modes many ways ("Keke", "tricycle", "minibus");
/// [`VehicleType::parse`] folds those spellings onto this closed set.
/// A segment with no usable mode is walked.
///
/// # Examples
///
/// ```
/// use commute_server::domain::VehicleType;
///
/// assert_eq!(VehicleType::parse("Keke"), Some(VehicleType::Keke));
/// assert_eq!(VehicleType::parse("tricycle"), Some(VehicleType::Keke));
/// assert_eq!(VehicleType::parse("hovercraft"), None);
/// assert_eq!(VehicleType::default(), VehicleType::Walk);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    #[default]
    Walk,
    Keke,
    Okada,
    Danfo,
    Bus,
    Brt,
    Taxi,
    Train,
    Ferry,
}

impl VehicleType {
    /// Every vehicle type, walk first.
    pub const ALL: [VehicleType; 9] = [
        VehicleType::Walk,
        VehicleType::Keke,
        VehicleType::Okada,
        VehicleType::Danfo,
        VehicleType::Bus,
        VehicleType::Brt,
        VehicleType::Taxi,
        VehicleType::Train,
        VehicleType::Ferry,
    ];

    /// Parse a mode label, accepting common aliases.
    ///
    /// Matching ignores case, surrounding whitespace, and treats `-` and
    /// spaces like `_`.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_lowercase().replace(['-', ' '], "_");

        let vehicle = match label.as_str() {
            "walk" | "walking" | "foot" | "on_foot" => VehicleType::Walk,
            "keke" | "keke_napep" | "napep" | "tricycle" => VehicleType::Keke,
            "okada" | "motorcycle" | "motorbike" | "bike" => VehicleType::Okada,
            "danfo" | "minibus" => VehicleType::Danfo,
            "bus" | "coaster" | "molue" => VehicleType::Bus,
            "brt" => VehicleType::Brt,
            "taxi" | "cab" | "car" | "ride" | "uber" | "bolt" => VehicleType::Taxi,
            "train" | "rail" | "metro" => VehicleType::Train,
            "ferry" | "boat" => VehicleType::Ferry,
            _ => return None,
        };

        Some(vehicle)
    }

    /// Canonical lowercase label, as serialized.
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleType::Walk => "walk",
            VehicleType::Keke => "keke",
            VehicleType::Okada => "okada",
            VehicleType::Danfo => "danfo",
            VehicleType::Bus => "bus",
            VehicleType::Brt => "brt",
            VehicleType::Taxi => "taxi",
            VehicleType::Train => "train",
            VehicleType::Ferry => "ferry",
        }
    }

    /// Whether the segment is ridden rather than walked.
    pub fn is_motorized(self) -> bool {
        self != VehicleType::Walk
    }
}

impl FromStr for VehicleType {
    type Err = UnknownVehicleType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VehicleType::parse(s).ok_or_else(|| UnknownVehicleType {
            label: s.to_string(),
        })
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
