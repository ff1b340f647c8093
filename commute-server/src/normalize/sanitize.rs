//! Schema sanitizer.
//!
//! Builds canonical values out of arbitrary JSON. Absent or unreadable
//! fields fall back to the defaults defined on the domain types; known
//! aliases are folded onto canonical fields; everything else on an object is
//! carried through untouched in its `extra` map.
//!
//! Sanitizing is idempotent: serializing a sanitized value and sanitizing it
//! again gives back an equal value.

use serde_json::{Map, Value};

use crate::domain::{
    DEFAULT_RISK_LEVEL, DEFAULT_STRATEGY, FareRange, Route, RouteClassification, RouteMetadata,
    SafetyData, Segment, Stop, UNKNOWN_PLACE, UNKNOWN_STOP_NAME, VehicleType,
};

use super::coerce::{CoercionMode, coerce_number, coerce_number_with, scalar};
use super::value::{field, first_field, is_falsy, member, name_of, string_list, text, without_keys};

/// Keys a route reads; they never land in `Route::extra`.
const ROUTE_KEYS: &[&str] = &[
    "from",
    "origin",
    "to",
    "destination",
    "segments",
    "legs",
    "totalDistance",
    "distance",
    "totalTime",
    "totalDuration",
    "duration",
    "estimatedTime",
    "totalCost",
    "totalFare",
    "cost",
    "instructions",
    "rationale",
    "classification",
    "metadata",
];

/// Keys a segment reads; they never land in `Segment::extra`.
const SEGMENT_KEYS: &[&str] = &[
    "vehicleType",
    "type",
    "mode",
    "fromStop",
    "toStop",
    "fromStopId",
    "toStopId",
    "distance",
    "estimatedTime",
    "duration",
    "cost",
    "fareRange",
    "instruction",
    "instructions",
    "safetyData",
];

/// Keys a stop reads; they never land in `Stop::extra`.
const STOP_KEYS: &[&str] = &[
    "name",
    "stopName",
    "title",
    "lat",
    "latitude",
    "lng",
    "lon",
    "longitude",
    "location",
];

const METADATA_KEYS: &[&str] = &["strategy", "alternativeRoutes"];

/// Keys naming a segment's vehicle, in priority order.
const VEHICLE_KEYS: &[&str] = &["vehicleType", "type", "mode"];

/// A type that can be built from any JSON value without failing.
pub trait Sanitize: Sized {
    /// Build a canonical value, substituting defaults for anything absent
    /// or unreadable.
    fn sanitize(value: &Value) -> Self;
}

/// Sanitize a list.
///
/// Falsy entries (`null`, `false`, `0`, `""`) are dropped and the rest
/// sanitized in order. A lone object counts as a list of one; anything else
/// is an empty list.
pub fn sanitize_all<T: Sanitize>(value: Option<&Value>) -> Vec<T> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| !is_falsy(item))
            .map(T::sanitize)
            .collect(),
        Some(item @ Value::Object(_)) => vec![T::sanitize(item)],
        _ => Vec::new(),
    }
}

fn sanitize_field<T: Sanitize>(obj: &Map<String, Value>, key: &str) -> T {
    T::sanitize(field(obj, key).unwrap_or(&Value::Null))
}

/// Coerced number, raised to zero if negative.
fn metric(value: Option<&Value>) -> f64 {
    coerce_number(value).max(0.0)
}

/// The first vehicle key holding a recognised mode, or walking.
pub(crate) fn vehicle_type_of(obj: &Map<String, Value>) -> VehicleType {
    let labels: Vec<&str> = VEHICLE_KEYS
        .iter()
        .filter_map(|key| field(obj, key).and_then(Value::as_str))
        .collect();

    match labels.iter().find_map(|label| VehicleType::parse(label)) {
        Some(vehicle) => vehicle,
        None => {
            if !labels.is_empty() {
                tracing::debug!(?labels, "unrecognised vehicle type, assuming walk");
            }
            VehicleType::Walk
        }
    }
}

/// An instruction written on the payload: `instruction`, else
/// `instructions` (a list is joined into one sentence).
pub(crate) fn written_instruction(obj: &Map<String, Value>) -> Option<String> {
    if let Some(instruction) = field(obj, "instruction").and_then(text) {
        return Some(instruction);
    }

    let steps = string_list(field(obj, "instructions"));
    (!steps.is_empty()).then(|| steps.join(", then "))
}

/// The fare range implied by a raw cost, if it was a range object.
pub(crate) fn fare_range_of(cost: Option<&Value>) -> Option<FareRange> {
    let range = cost?.as_object()?;
    if field(range, "min").is_none() && field(range, "max").is_none() {
        return None;
    }

    Some(FareRange::new(
        coerce_number_with(cost, CoercionMode::Optimistic),
        coerce_number_with(cost, CoercionMode::Conservative),
    ))
}

/// A stop identifier: non-blank text, or a number rendered as text.
pub(crate) fn stop_id(value: Option<&Value>) -> Option<String> {
    value.and_then(text)
}

impl Sanitize for Route {
    fn sanitize(value: &Value) -> Self {
        let Value::Object(obj) = value else {
            return Route::default();
        };

        Route {
            from: place(first_field(obj, &["from", "origin"])),
            to: place(first_field(obj, &["to", "destination"])),
            segments: sanitize_all(first_field(obj, &["segments", "legs"])),
            total_distance: metric(first_field(obj, &["totalDistance", "distance"])),
            total_time: metric(first_field(
                obj,
                &["totalTime", "totalDuration", "duration", "estimatedTime"],
            )),
            total_cost: metric(first_field(obj, &["totalCost", "totalFare", "cost"])),
            instructions: string_list(field(obj, "instructions")),
            rationale: field(obj, "rationale").and_then(text),
            classification: field(obj, "classification")
                .and_then(Value::as_str)
                .and_then(RouteClassification::parse)
                .unwrap_or_default(),
            metadata: sanitize_field(obj, "metadata"),
            extra: without_keys(obj, ROUTE_KEYS),
        }
    }
}

fn place(value: Option<&Value>) -> String {
    value
        .and_then(name_of)
        .unwrap_or_else(|| UNKNOWN_PLACE.to_string())
}

impl Sanitize for RouteMetadata {
    fn sanitize(value: &Value) -> Self {
        let Value::Object(obj) = value else {
            return RouteMetadata::default();
        };

        RouteMetadata {
            strategy: field(obj, "strategy")
                .and_then(text)
                .unwrap_or_else(|| DEFAULT_STRATEGY.to_string()),
            alternative_routes: field(obj, "alternativeRoutes")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            extra: without_keys(obj, METADATA_KEYS),
        }
    }
}

impl Sanitize for Segment {
    fn sanitize(value: &Value) -> Self {
        let Value::Object(obj) = value else {
            return Segment::default();
        };

        let vehicle_type = vehicle_type_of(obj);
        let from_stop: Stop = sanitize_field(obj, "fromStop");
        let to_stop: Stop = sanitize_field(obj, "toStop");

        let instruction = written_instruction(obj).unwrap_or_else(|| {
            let destination = to_stop.has_name().then_some(to_stop.name.as_str());
            Segment::describe(vehicle_type, destination)
        });

        let fare_range = field(obj, "fareRange")
            .filter(|range| range.is_object())
            .map(|range| {
                FareRange::new(
                    coerce_number(member(range, "min")),
                    coerce_number(member(range, "max")),
                )
            })
            .or_else(|| fare_range_of(field(obj, "cost")));

        Segment {
            vehicle_type,
            from_stop,
            to_stop,
            from_stop_id: stop_id(field(obj, "fromStopId")),
            to_stop_id: stop_id(field(obj, "toStopId")),
            distance: metric(field(obj, "distance")),
            estimated_time: metric(first_field(obj, &["estimatedTime", "duration"])),
            cost: metric(field(obj, "cost")),
            fare_range,
            instruction,
            safety_data: sanitize_field(obj, "safetyData"),
            extra: without_keys(obj, SEGMENT_KEYS),
        }
    }
}

impl Sanitize for SafetyData {
    fn sanitize(value: &Value) -> Self {
        let Value::Object(obj) = value else {
            return SafetyData::default();
        };

        SafetyData {
            risk_alerts: string_list(field(obj, "riskAlerts")),
            is_safe_zone: field(obj, "isSafeZone")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            risk_level: field(obj, "riskLevel")
                .and_then(text)
                .unwrap_or_else(|| DEFAULT_RISK_LEVEL.to_string()),
            threats: string_list(field(obj, "threats")),
        }
    }
}

/// Which coordinate of a stop to look up.
#[derive(Clone, Copy)]
enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    fn keys(self) -> &'static [&'static str] {
        match self {
            Axis::Latitude => &["lat", "latitude"],
            Axis::Longitude => &["lng", "lon", "longitude"],
        }
    }

    /// Index into a GeoJSON `[lng, lat]` pair.
    fn geojson_index(self) -> usize {
        match self {
            Axis::Latitude => 1,
            Axis::Longitude => 0,
        }
    }
}

/// First readable coordinate among the flat keys, then `location.*`, then
/// `location.coordinates`; `0` when none.
fn coordinate(obj: &Map<String, Value>, axis: Axis) -> f64 {
    let flat = axis.keys().iter().filter_map(|key| field(obj, key));

    let location = field(obj, "location");
    let nested = axis
        .keys()
        .iter()
        .filter_map(move |key| location.and_then(|l| member(l, key)));
    let geojson = location
        .and_then(|l| member(l, "coordinates"))
        .and_then(|c| c.get(axis.geojson_index()));

    flat.chain(nested)
        .chain(geojson)
        .find_map(scalar)
        .unwrap_or(0.0)
}

impl Sanitize for Stop {
    fn sanitize(value: &Value) -> Self {
        match value {
            Value::Object(obj) => Stop {
                name: first_field(obj, &["name", "stopName", "title"])
                    .and_then(text)
                    .unwrap_or_else(|| UNKNOWN_STOP_NAME.to_string()),
                latitude: coordinate(obj, Axis::Latitude),
                longitude: coordinate(obj, Axis::Longitude),
                extra: without_keys(obj, STOP_KEYS),
            },
            other => text(other).map(Stop::named).unwrap_or_default(),
        }
    }
}
