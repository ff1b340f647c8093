//! Lookup helpers over untyped JSON.
//!
//! Upstream payloads treat `null` and a missing key the same way, so every
//! lookup here does too.

use serde_json::{Map, Value};

/// Whether a value counts as "nothing" when filtering lists:
/// `null`, `false`, `0` and `""`.
pub(crate) fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Value at `key`, with `null` treated as absent.
pub(crate) fn field<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

/// First non-null value among `keys`, in order.
pub(crate) fn first_field<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| field(obj, key))
}

/// Value at `key` of an object value, with `null` treated as absent.
pub(crate) fn member<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.as_object().and_then(|obj| field(obj, key))
}

/// A non-blank string, or a number rendered as text.
pub(crate) fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Like [`text`], but also reads the `name` of an object.
pub(crate) fn name_of(value: &Value) -> Option<String> {
    match value {
        Value::Object(obj) => field(obj, "name").and_then(text),
        other => text(other),
    }
}

/// The non-blank strings of a list; a lone string counts as a list of one.
pub(crate) fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// Copy of `obj` without `keys`.
pub(crate) fn without_keys(obj: &Map<String, Value>, keys: &[&str]) -> Map<String, Value> {
    obj.iter()
        .filter(|(key, _)| !keys.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Short description of a response's top level, for diagnostics.
pub(crate) fn describe_top_level(value: &Value) -> String {
    match value {
        Value::Object(obj) if obj.is_empty() => "empty object".to_string(),
        Value::Object(obj) => {
            let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
            format!("object with keys [{}]", keys.join(", "))
        }
        Value::Array(items) => format!("array of {}", items.len()),
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(_) => "string".to_string(),
    }
}
