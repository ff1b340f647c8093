//! Stop type.

use serde::Serialize;
use serde_json::{Map, Value};

/// Name given to a stop when the payload carries none.
pub const UNKNOWN_STOP_NAME: &str = "Unknown Stop";

/// A named place a segment starts or ends at.
///
/// Coordinates of `(0, 0)` mean the position is unknown; they are never a
/// real position in this system and consumers must not plot them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    /// Display name.
    pub name: String,

    /// Latitude in degrees, `0` when unknown.
    pub latitude: f64,

    /// Longitude in degrees, `0` when unknown.
    pub longitude: f64,

    /// Fields the payload carried that this type does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Stop {
    /// A stop with a name and no known position.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// A stop with a name and a position.
    pub fn at(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            extra: Map::new(),
        }
    }

    /// Whether the stop has a real position.
    pub fn has_position(&self) -> bool {
        !(self.latitude == 0.0 && self.longitude == 0.0)
    }

    /// Whether the stop has a real name.
    pub fn has_name(&self) -> bool {
        self.name != UNKNOWN_STOP_NAME
    }
}

impl Default for Stop {
    fn default() -> Self {
        Self {
            name: UNKNOWN_STOP_NAME.to_string(),
            latitude: 0.0,
            longitude: 0.0,
            extra: Map::new(),
        }
    }
}
