//! Proptest strategies for arbitrary upstream-like JSON.

use proptest::prelude::*;
use serde_json::{Map, Value};

/// Keys the pipeline reads somewhere, so generated objects hit real paths.
const KNOWN_KEYS: &[&str] = &[
    "data",
    "routes",
    "route",
    "legs",
    "segments",
    "success",
    "message",
    "errorType",
    "nearbyHubs",
    "suggestion",
    "from",
    "to",
    "origin",
    "destination",
    "totalDistance",
    "totalTime",
    "totalDuration",
    "totalCost",
    "totalFare",
    "instructions",
    "instruction",
    "rationale",
    "classification",
    "metadata",
    "strategy",
    "alternativeRoutes",
    "mode",
    "type",
    "vehicleType",
    "fromStop",
    "toStop",
    "fromName",
    "toName",
    "fromStopId",
    "toStopId",
    "fromId",
    "toId",
    "_id",
    "id",
    "distance",
    "duration",
    "estimatedTime",
    "cost",
    "fareRange",
    "value",
    "min",
    "max",
    "amount",
    "total",
    "name",
    "lat",
    "lng",
    "lon",
    "latitude",
    "longitude",
    "location",
    "coordinates",
    "safetyData",
    "riskAlerts",
    "isSafeZone",
    "riskLevel",
    "threats",
];

const WORDS: &[&str] = &[
    "keke", "bus", "walk", "danfo", "okada", "taxi", "Wuse Market", "Berger", "42.5", "900",
    "1e999", "NaN", "DIRECT", "walk_only", "", " ",
];

fn key() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => prop::sample::select(KNOWN_KEYS).prop_map(str::to_string),
        1 => "[a-z]{1,6}",
    ]
}

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1.0e6f64..1.0e6).prop_map(Value::from),
        (-100i64..2000).prop_map(Value::from),
        prop::sample::select(WORDS).prop_map(|w| Value::String(w.to_string())),
        "[a-zA-Z0-9 .]{0,8}".prop_map(Value::String),
    ]
}

/// Arbitrary JSON, biased towards the keys and values routes are made of.
pub(crate) fn arb_json() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            prop::collection::vec((key(), inner), 0..7)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}
