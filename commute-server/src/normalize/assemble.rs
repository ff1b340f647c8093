//! Route assembler.
//!
//! Turns one raw route-generation response into the result callers act on:
//! canonical routes with derived fields, whether the request succeeded, and
//! the upstream's diagnostic fields for when it found nothing.

use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use crate::domain::{Route, RouteClassification};

use super::config::PipelineConfig;
use super::sanitize::{Sanitize, sanitize_all};
use super::shape::extract_routes;
use super::value::{field, member};

/// The assembled result of one route request.
///
/// `message`, `error_type`, `nearby_hubs` and `suggestion` are the
/// upstream's own diagnostics, passed through only when no route was found.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponse {
    /// False only when the upstream said so explicitly.
    pub success: bool,

    /// Canonical routes, best first as the upstream ordered them.
    pub data: Vec<Route>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,

    /// Transport hubs near the request, offered when it is outside coverage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nearby_hubs: Option<Vec<Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// The upstream failed for infrastructure reasons rather than coverage.
    pub infrastructure_failure: bool,
}

impl Default for RouteResponse {
    fn default() -> Self {
        Self {
            success: true,
            data: Vec::new(),
            message: None,
            error_type: None,
            nearby_hubs: None,
            suggestion: None,
            infrastructure_failure: false,
        }
    }
}

impl Sanitize for RouteResponse {
    fn sanitize(value: &Value) -> Self {
        let Value::Object(obj) = value else {
            return RouteResponse::default();
        };

        RouteResponse {
            success: explicit_success(value),
            data: sanitize_all(field(obj, "data")),
            message: diagnostic(value, "message"),
            error_type: diagnostic(value, "errorType"),
            nearby_hubs: field(obj, "nearbyHubs")
                .and_then(Value::as_array)
                .cloned(),
            suggestion: diagnostic(value, "suggestion"),
            infrastructure_failure: field(obj, "infrastructureFailure")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        }
    }
}

/// `success` unless the response carries `"success": false`.
fn explicit_success(raw: &Value) -> bool {
    raw.get("success") != Some(&Value::Bool(false))
}

/// A diagnostic string, exactly as the upstream wrote it.
fn diagnostic(raw: &Value, key: &str) -> Option<String> {
    raw.get(key).and_then(Value::as_str).map(str::to_owned)
}

/// Builds [`RouteResponse`]s from raw upstream responses.
#[derive(Debug, Clone, Default)]
pub struct RouteAssembler {
    config: PipelineConfig,
}

impl RouteAssembler {
    /// Create an assembler with the given configuration.
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Assemble one raw response.
    pub fn assemble(&self, raw: &Value) -> RouteResponse {
        let success = explicit_success(raw);
        let infrastructure_failure = self.detect_infrastructure_failure(raw);
        let routes = extract_routes(raw);

        if routes.is_empty() {
            let message = diagnostic(raw, "message");
            let error_type = diagnostic(raw, "errorType");
            if !infrastructure_failure {
                info!(
                    success,
                    upstream_message = message.as_deref(),
                    error_type = error_type.as_deref(),
                    "no usable routes in response"
                );
            }

            return RouteResponse {
                success,
                data: Vec::new(),
                message,
                error_type,
                nearby_hubs: raw.get("nearbyHubs").and_then(Value::as_array).cloned(),
                suggestion: diagnostic(raw, "suggestion"),
                infrastructure_failure,
            };
        }

        RouteResponse {
            success,
            data: routes.into_iter().map(with_derived_fields).collect(),
            infrastructure_failure,
            ..RouteResponse::default()
        }
    }

    /// Whether the upstream's error text carries an infrastructure
    /// signature. Logs at error level when it does.
    fn detect_infrastructure_failure(&self, raw: &Value) -> bool {
        let error_value = raw.get("error");
        let messages = [
            raw.get("message"),
            error_value,
            error_value.and_then(|e| member(e, "message")),
            raw.get("errorType"),
        ];

        for message in messages.into_iter().flatten().filter_map(Value::as_str) {
            if let Some(signature) = self.config.infrastructure_signature_in(message) {
                error!(
                    signature,
                    upstream_message = message,
                    "upstream reported an infrastructure failure"
                );
                return true;
            }
        }

        false
    }
}

/// Assemble a raw response with the default configuration.
///
/// ```
/// use commute_server::normalize::assemble_routes;
/// use serde_json::json;
///
/// let result = assemble_routes(&json!({}));
/// assert!(result.success);
/// assert!(result.data.is_empty());
/// ```
pub fn assemble_routes(raw: &Value) -> RouteResponse {
    RouteAssembler::default().assemble(raw)
}

/// Fill in what a sanitized route leaves blank: the classification, the
/// instructions, and any zero total the segments can account for.
fn with_derived_fields(mut route: Route) -> Route {
    if route.classification == RouteClassification::Unknown {
        route.classification = RouteClassification::of_segments(&route.segments);
    }

    if route.instructions.is_empty() {
        route.instructions = route
            .segments
            .iter()
            .map(|s| s.instruction.clone())
            .collect();
    }

    let from_segments = |total: f64, sum: f64| {
        if total == 0.0 && sum.is_finite() { sum } else { total }
    };
    route.total_distance = from_segments(route.total_distance, route.segment_distance());
    route.total_time = from_segments(route.total_time, route.segment_time());
    route.total_cost = from_segments(route.total_cost, route.segment_cost());

    route
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::normalize::strategies::arb_json;
    use proptest::prelude::*;

    proptest! {
        /// Assembly never panics and every route keeps the consumer guarantees.
        #[test]
        fn assemble_total(raw in arb_json()) {
            let result = assemble_routes(&raw);
            for route in &result.data {
                for n in [route.total_distance, route.total_time, route.total_cost] {
                    prop_assert!(n.is_finite() && n >= 0.0);
                }
                prop_assert!(route.instructions.iter().all(|i| !i.trim().is_empty()));
            }
        }

        /// The assembled result is a fixed point of the result schema.
        #[test]
        fn result_idempotent(raw in arb_json()) {
            let result = assemble_routes(&raw);
            let again = RouteResponse::sanitize(&serde_json::to_value(&result).unwrap());
            prop_assert_eq!(again, result);
        }

        /// Success follows the explicit flag only.
        #[test]
        fn success_flag(raw in arb_json()) {
            let explicit_false = raw.get("success") == Some(&Value::Bool(false));
            prop_assert_eq!(assemble_routes(&raw).success, !explicit_false);
        }
    }
}
