//! Segment normalizer.
//!
//! Maps the many spellings upstream segments arrive in onto the canonical
//! segment keys, before the sanitizer's final pass. The output is still
//! untyped JSON: unknown fields ride along, and only the keys below are
//! rewritten.
//!
//! | canonical key   | read from, first present wins                          |
//! |-----------------|--------------------------------------------------------|
//! | `vehicleType`   | `vehicleType`, `type`, `mode`, else `walk`             |
//! | `fromStop`      | `fromStop`, `fromName`, else `"Unknown Start"`         |
//! | `toStop`        | `toStop`, `toName`, else `"Unknown End"`               |
//! | `fromStopId`    | `fromStopId`, `fromId`, `fromStop._id`, `fromStop.id`  |
//! | `toStopId`      | `toStopId`, `toId`, `toStop._id`, `toStop.id`          |
//! | `distance`      | `distance.value`, `distance`                           |
//! | `estimatedTime` | `duration.value` seconds, `estimatedTime`, `duration`  |
//! | `cost`          | `cost`, plus `fareRange` when it was a range           |
//! | `instruction`   | `instruction`, `instructions`, else synthesized        |
//! | `safetyData`    | `safetyData`, else built from the top-level fields     |

use serde_json::{Map, Value, json};

use crate::domain::{DEFAULT_RISK_LEVEL, Segment};

use super::coerce::coerce_number;
use super::sanitize::{fare_range_of, stop_id, vehicle_type_of, written_instruction};
use super::value::{field, first_field, is_falsy, member, name_of, without_keys};

/// Start stop name used when a segment names none.
pub const UNKNOWN_START: &str = "Unknown Start";

/// End stop name used when a segment names none.
pub const UNKNOWN_END: &str = "Unknown End";

/// Alias keys folded into canonical ones; dropped from the output.
const ALIAS_KEYS: &[&str] = &[
    "type",
    "mode",
    "fromName",
    "toName",
    "fromId",
    "toId",
    "duration",
    "instructions",
    "riskAlerts",
    "isSafeZone",
    "riskLevel",
    "threats",
];

/// Normalize a list of raw segments.
///
/// Falsy entries are dropped before normalization, so
/// [`normalize_segment`] never sees an absent element. A lone object counts
/// as a list of one; anything else gives an empty list.
pub fn normalize_segments(raw: Option<&Value>) -> Value {
    let segments = match raw {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| !is_falsy(item))
            .map(normalize_segment)
            .collect(),
        Some(item @ Value::Object(_)) => vec![normalize_segment(item)],
        _ => Vec::new(),
    };
    Value::Array(segments)
}

/// Rewrite one raw segment onto canonical keys.
///
/// Values that are not objects are returned as they are; the sanitizer
/// turns them into default segments.
///
/// ```
/// use commute_server::normalize::normalize_segment;
/// use serde_json::json;
///
/// let segment = normalize_segment(&json!({
///     "mode": "keke",
///     "toStop": "Wuse Market",
///     "duration": {"value": 900},
/// }));
///
/// assert_eq!(segment["vehicleType"], "keke");
/// assert_eq!(segment["estimatedTime"], 15.0);
/// assert_eq!(segment["instruction"], "Take keke to Wuse Market");
/// ```
pub fn normalize_segment(raw: &Value) -> Value {
    let Value::Object(obj) = raw else {
        return raw.clone();
    };

    let vehicle = vehicle_type_of(obj);
    let from_stop = first_field(obj, &["fromStop", "fromName"]);
    let to_stop = first_field(obj, &["toStop", "toName"]);

    let instruction = written_instruction(obj)
        .unwrap_or_else(|| Segment::describe(vehicle, to_stop.and_then(name_of).as_deref()));

    let mut out = without_keys(obj, ALIAS_KEYS);
    out.insert("vehicleType".into(), json!(vehicle.as_str()));
    out.insert(
        "fromStop".into(),
        from_stop.cloned().unwrap_or_else(|| json!(UNKNOWN_START)),
    );
    out.insert(
        "toStop".into(),
        to_stop.cloned().unwrap_or_else(|| json!(UNKNOWN_END)),
    );
    out.remove("fromStopId");
    out.remove("toStopId");
    if let Some(id) = endpoint_id(obj, "fromStopId", "fromId", "fromStop") {
        out.insert("fromStopId".into(), json!(id));
    }
    if let Some(id) = endpoint_id(obj, "toStopId", "toId", "toStop") {
        out.insert("toStopId".into(), json!(id));
    }
    out.insert("distance".into(), json!(distance(obj)));
    out.insert("estimatedTime".into(), json!(estimated_minutes(obj)));

    let cost = field(obj, "cost");
    out.insert("cost".into(), json!(coerce_number(cost)));
    if field(&out, "fareRange").is_none()
        && let Some(range) = fare_range_of(cost)
    {
        out.insert("fareRange".into(), json!({"min": range.min, "max": range.max}));
    }

    out.insert("instruction".into(), json!(instruction));
    out.insert("safetyData".into(), safety_data(obj));

    Value::Object(out)
}

/// Identifier of a segment endpoint: the explicit id keys first, then the
/// `_id`/`id` of the stop object itself.
fn endpoint_id(obj: &Map<String, Value>, id_key: &str, alias: &str, stop_key: &str) -> Option<String> {
    let stop = field(obj, stop_key);
    let candidates = [
        field(obj, id_key),
        field(obj, alias),
        stop.and_then(|s| member(s, "_id")),
        stop.and_then(|s| member(s, "id")),
    ];
    candidates.into_iter().flatten().find_map(|v| stop_id(Some(v)))
}

/// Meters, from either a scalar or a `{value}` wrapper.
fn distance(obj: &Map<String, Value>) -> f64 {
    let raw = field(obj, "distance");
    coerce_number(raw.and_then(|d| member(d, "value")).or(raw))
}

/// Minutes. A `duration.value` is seconds (the directions-API form); a
/// bare `estimatedTime` or `duration` is already minutes.
fn estimated_minutes(obj: &Map<String, Value>) -> f64 {
    match field(obj, "duration").and_then(|d| member(d, "value")) {
        Some(seconds) => (coerce_number(Some(seconds)) / 60.0).round(),
        None => coerce_number(first_field(obj, &["estimatedTime", "duration"])),
    }
}

fn safety_data(obj: &Map<String, Value>) -> Value {
    if let Some(safety) = field(obj, "safetyData") {
        return safety.clone();
    }

    json!({
        "riskAlerts": field(obj, "riskAlerts").cloned().unwrap_or_else(|| json!([])),
        "isSafeZone": field(obj, "isSafeZone").cloned().unwrap_or(json!(false)),
        "riskLevel": field(obj, "riskLevel").cloned().unwrap_or_else(|| json!(DEFAULT_RISK_LEVEL)),
        "threats": field(obj, "threats").cloned().unwrap_or_else(|| json!([])),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vehicle_type_precedence() {
        let seg = normalize_segment(&json!({"vehicleType": "danfo", "mode": "bus"}));
        assert_eq!(seg["vehicleType"], "danfo");

        let seg = normalize_segment(&json!({"mode": "Okada"}));
        assert_eq!(seg["vehicleType"], "okada");

        let seg = normalize_segment(&json!({}));
        assert_eq!(seg["vehicleType"], "walk");
        assert!(seg.get("mode").is_none());
    }

    #[test]
    fn stop_names_fall_back() {
        let seg = normalize_segment(&json!({"fromName": "Kubwa"}));
        assert_eq!(seg["fromStop"], "Kubwa");
        assert_eq!(seg["toStop"], "Unknown End");

        let seg = normalize_segment(&json!({}));
        assert_eq!(seg["fromStop"], "Unknown Start");
    }

    #[test]
    fn stop_objects_are_kept_whole() {
        let seg = normalize_segment(&json!({"toStop": {"name": "Berger", "lat": 9.06}}));
        assert_eq!(seg["toStop"], json!({"name": "Berger", "lat": 9.06}));
    }

    #[test]
    fn stop_id_precedence() {
        let seg = normalize_segment(&json!({
            "fromId": "a",
            "fromStop": {"_id": "b", "id": "c"},
            "toStop": {"id": 7},
        }));
        assert_eq!(seg["fromStopId"], "a");
        assert_eq!(seg["toStopId"], "7");

        let seg = normalize_segment(&json!({"fromStop": {"_id": "b", "id": "c"}}));
        assert_eq!(seg["fromStopId"], "b");
        assert!(seg.get("toStopId").is_none());
    }

    #[test]
    fn distance_scalar_or_wrapped() {
        assert_eq!(normalize_segment(&json!({"distance": 50}))["distance"], 50.0);
        assert_eq!(
            normalize_segment(&json!({"distance": {"value": 1200, "text": "1.2 km"}}))["distance"],
            1200.0
        );
        assert_eq!(normalize_segment(&json!({"distance": "3.5"}))["distance"], 3.5);
    }

    #[test]
    fn duration_seconds_become_minutes() {
        let seg = normalize_segment(&json!({"duration": {"value": 900}}));
        assert_eq!(seg["estimatedTime"], 15.0);

        let seg = normalize_segment(&json!({"duration": {"value": 100}}));
        assert_eq!(seg["estimatedTime"], 2.0);
        assert!(seg.get("duration").is_none());
    }

    #[test]
    fn plain_times_are_minutes() {
        assert_eq!(normalize_segment(&json!({"estimatedTime": 12}))["estimatedTime"], 12.0);
        assert_eq!(normalize_segment(&json!({"duration": 8}))["estimatedTime"], 8.0);
        assert_eq!(
            normalize_segment(&json!({"estimatedTime": 3, "duration": 8}))["estimatedTime"],
            3.0
        );
        assert_eq!(normalize_segment(&json!({}))["estimatedTime"], 0.0);
    }

    #[test]
    fn cost_range_keeps_fare_range() {
        let seg = normalize_segment(&json!({"cost": {"min": 100, "max": 150}}));
        assert_eq!(seg["cost"], 150.0);
        assert_eq!(seg["fareRange"], json!({"min": 100.0, "max": 150.0}));

        let seg = normalize_segment(&json!({"cost": "200"}));
        assert_eq!(seg["cost"], 200.0);
        assert!(seg.get("fareRange").is_none());
    }

    #[test]
    fn null_fare_range_is_replaced_by_cost_range() {
        let seg = normalize_segment(&json!({"cost": {"min": 100, "max": 150}, "fareRange": null}));
        assert_eq!(seg["fareRange"], json!({"min": 100.0, "max": 150.0}));

        let seg = normalize_segment(&json!({"cost": {"min": 100, "max": 150}, "fareRange": {"min": 80, "max": 120}}));
        assert_eq!(seg["fareRange"], json!({"min": 80, "max": 120}));
    }

    #[test]
    fn instruction_precedence() {
        let seg = normalize_segment(&json!({"instruction": "Board the blue bus", "instructions": ["x"]}));
        assert_eq!(seg["instruction"], "Board the blue bus");

        let seg = normalize_segment(&json!({"instructions": "Walk past the mosque"}));
        assert_eq!(seg["instruction"], "Walk past the mosque");
        assert!(seg.get("instructions").is_none());
    }

    #[test]
    fn instruction_is_synthesized() {
        let seg = normalize_segment(&json!({"vehicleType": "keke", "toStop": "Wuse Market"}));
        assert_eq!(seg["instruction"], "Take keke to Wuse Market");

        let seg = normalize_segment(&json!({"mode": "walk", "toStop": {"name": "Berger"}}));
        assert_eq!(seg["instruction"], "Walk to Berger");

        let seg = normalize_segment(&json!({"mode": "bus"}));
        assert_eq!(seg["instruction"], "Take bus to the next stop");
    }

    #[test]
    fn safety_data_built_from_top_level() {
        let seg = normalize_segment(&json!({"riskAlerts": ["Dark underpass"], "riskLevel": "moderate"}));
        assert_eq!(
            seg["safetyData"],
            json!({
                "riskAlerts": ["Dark underpass"],
                "isSafeZone": false,
                "riskLevel": "moderate",
                "threats": [],
            })
        );
        assert!(seg.get("riskAlerts").is_none());
    }

    #[test]
    fn safety_data_passes_through() {
        let safety = json!({"isSafeZone": true});
        let seg = normalize_segment(&json!({"safetyData": safety, "riskLevel": "high"}));
        assert_eq!(seg["safetyData"], safety);
    }

    #[test]
    fn unknown_fields_ride_along() {
        let seg = normalize_segment(&json!({"mode": "bus", "corridor": "Airport Road"}));
        assert_eq!(seg["corridor"], "Airport Road");
    }

    #[test]
    fn input_is_not_modified() {
        let raw = json!({"mode": "bus", "duration": {"value": 600}});
        let before = raw.clone();
        let _ = normalize_segment(&raw);
        assert_eq!(raw, before);
    }

    #[test]
    fn non_objects_pass_through() {
        assert_eq!(normalize_segment(&json!("walk")), json!("walk"));
    }

    #[test]
    fn falsy_entries_dropped_before_normalizing() {
        let segs = normalize_segments(Some(&json!([null, {"mode": "bus"}, "", 0, {"mode": "walk"}])));
        let modes: Vec<_> = segs
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["vehicleType"].clone())
            .collect();
        assert_eq!(modes, vec![json!("bus"), json!("walk")]);
    }

    #[test]
    fn segment_list_shapes() {
        assert_eq!(normalize_segments(None), json!([]));
        assert_eq!(normalize_segments(Some(&json!("legs"))), json!([]));
        assert_eq!(
            normalize_segments(Some(&json!({"mode": "taxi"})))
                .as_array()
                .unwrap()
                .len(),
            1
        );
    }
}
