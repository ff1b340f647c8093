//! Response shape resolver.
//!
//! The routing backend has answered route requests in several layouts over
//! time. [`ResponseShape::detect`] recognises them in a fixed priority
//! order, first match wins:
//!
//! 1. `{"data": {"routes": [...]}}`
//! 2. `{"data": [...]}`
//! 3. `{"route": {...}}` (one route, segments under `legs` or `segments`)
//! 4. `{"legs": [...], "totalDuration": ...}` (one route spread over the top level)
//! 5. `[...]`: segments of one route if the first entry has a `mode` or
//!    `instruction`, otherwise a list of routes
//!
//! Anything else is [`ResponseShape::Unrecognized`], which resolves to no
//! routes and is logged so it can be diagnosed.

use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::domain::{DEFAULT_STRATEGY, Route, UNKNOWN_PLACE};

use super::sanitize::Sanitize;
use super::segment::normalize_segments;
use super::value::{describe_top_level, field, first_field, is_falsy, without_keys};

/// A recognised response layout, borrowing from the response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResponseShape<'a> {
    /// `data.routes` is a list of routes.
    DataRoutes(&'a [Value]),
    /// `data` itself is a list of routes.
    DataList(&'a [Value]),
    /// `route` is a single route object.
    SingleRoute(&'a Map<String, Value>),
    /// The response is itself one route with top-level `legs`.
    TopLevelLegs(&'a Map<String, Value>),
    /// A bare list of segments making up one route.
    BareSegments(&'a [Value]),
    /// A bare list of routes.
    BareRoutes(&'a [Value]),
    /// None of the above.
    Unrecognized,
}

impl<'a> ResponseShape<'a> {
    /// Detect which layout `response` uses.
    pub fn detect(response: &'a Value) -> Self {
        match response {
            Value::Object(obj) => Self::detect_object(obj),
            Value::Array(items) => {
                if items.first().is_some_and(is_segment_like) {
                    ResponseShape::BareSegments(items)
                } else {
                    ResponseShape::BareRoutes(items)
                }
            }
            _ => ResponseShape::Unrecognized,
        }
    }

    fn detect_object(obj: &'a Map<String, Value>) -> Self {
        let data = field(obj, "data");

        if let Some(Value::Array(routes)) = data.and_then(|d| d.get("routes")) {
            return ResponseShape::DataRoutes(routes);
        }
        if let Some(Value::Array(routes)) = data {
            return ResponseShape::DataList(routes);
        }
        if let Some(Value::Object(route)) = field(obj, "route") {
            return ResponseShape::SingleRoute(route);
        }
        if let Some(Value::Array(_)) = field(obj, "legs") {
            return ResponseShape::TopLevelLegs(obj);
        }

        ResponseShape::Unrecognized
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            ResponseShape::DataRoutes(_) => "data.routes",
            ResponseShape::DataList(_) => "data[]",
            ResponseShape::SingleRoute(_) => "route",
            ResponseShape::TopLevelLegs(_) => "legs",
            ResponseShape::BareSegments(_) => "segment[]",
            ResponseShape::BareRoutes(_) => "route[]",
            ResponseShape::Unrecognized => "unrecognized",
        }
    }

    /// The raw route candidates of this layout, before normalization.
    pub fn candidates(&self) -> Vec<Value> {
        match *self {
            ResponseShape::DataRoutes(routes)
            | ResponseShape::DataList(routes)
            | ResponseShape::BareRoutes(routes) => routes.to_vec(),
            ResponseShape::SingleRoute(route) => vec![wrap_single_route(route)],
            ResponseShape::TopLevelLegs(response) => vec![wrap_top_level_legs(response)],
            ResponseShape::BareSegments(segments) => vec![json!({
                "from": UNKNOWN_PLACE,
                "to": UNKNOWN_PLACE,
                "segments": segments,
                "metadata": merged_metadata(None),
            })],
            ResponseShape::Unrecognized => Vec::new(),
        }
    }
}

/// A list entry is segment-like if it is an object with a `mode` or an
/// `instruction`.
fn is_segment_like(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|obj| obj.contains_key("mode") || obj.contains_key("instruction"))
}

/// Default metadata with any metadata object from the payload laid over it.
fn merged_metadata(metadata: Option<&Value>) -> Value {
    let mut merged = Map::new();
    merged.insert("strategy".into(), json!(DEFAULT_STRATEGY));
    merged.insert("alternativeRoutes".into(), json!(false));
    if let Some(Value::Object(extra)) = metadata {
        merged.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    Value::Object(merged)
}

fn wrap_single_route(route: &Map<String, Value>) -> Value {
    let mut candidate = without_keys(route, &["legs", "segments", "metadata"]);
    candidate.insert(
        "segments".into(),
        first_field(route, &["legs", "segments"])
            .cloned()
            .unwrap_or_else(|| json!([])),
    );
    candidate.insert("metadata".into(), merged_metadata(field(route, "metadata")));
    Value::Object(candidate)
}

fn wrap_top_level_legs(response: &Map<String, Value>) -> Value {
    let mut candidate = Map::new();
    let mut copy = |target: &str, sources: &[&str]| {
        if let Some(value) = first_field(response, sources) {
            candidate.insert(target.to_string(), value.clone());
        }
    };

    copy("from", &["from", "origin"]);
    copy("to", &["to", "destination"]);
    copy("segments", &["legs"]);
    copy("totalTime", &["totalTime", "totalDuration", "duration"]);
    copy("totalCost", &["totalCost", "totalFare", "cost"]);
    copy("totalDistance", &["totalDistance", "distance"]);
    copy("instructions", &["instructions"]);
    copy("rationale", &["rationale"]);

    candidate.insert(
        "metadata".into(),
        merged_metadata(field(response, "metadata")),
    );
    Value::Object(candidate)
}

/// Replace a candidate's segment list with its normalized form.
fn with_normalized_segments(candidate: &Value) -> Value {
    let Value::Object(obj) = candidate else {
        return candidate.clone();
    };

    let segments = normalize_segments(first_field(obj, &["segments", "legs"]));
    let mut out = without_keys(obj, &["segments", "legs"]);
    out.insert("segments".into(), segments);
    Value::Object(out)
}

/// Extract the canonical routes from one backend response.
///
/// Every candidate's segments are normalized and every candidate is
/// sanitized, so callers never see raw data. An unrecognized layout gives
/// an empty list and a warning.
///
/// ```
/// use commute_server::normalize::extract_routes;
/// use serde_json::json;
///
/// let routes = extract_routes(&json!({"legs": [{"mode": "walk", "distance": 50}], "totalDuration": 5}));
/// assert_eq!(routes.len(), 1);
/// assert_eq!(routes[0].total_time, 5.0);
///
/// assert!(extract_routes(&json!({})).is_empty());
/// ```
pub fn extract_routes(response: &Value) -> Vec<Route> {
    let shape = ResponseShape::detect(response);

    if shape == ResponseShape::Unrecognized {
        warn!(
            response = %describe_top_level(response),
            "route response matched no known shape"
        );
        return Vec::new();
    }

    let routes: Vec<Route> = shape
        .candidates()
        .iter()
        .filter(|candidate| !is_falsy(candidate))
        .map(|candidate| Route::sanitize(&with_normalized_segments(candidate)))
        .collect();

    debug!(shape = shape.name(), routes = routes.len(), "resolved route response");
    routes
}
