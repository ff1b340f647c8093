//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::normalize::RouteResponse;
use crate::projection::{MapView, project_route};
use crate::upstream::RouteRequest;

/// Query for planning a route through the backend.
#[derive(Debug, Deserialize)]
pub struct PlanRouteQuery {
    /// Origin place name
    pub from: Option<String>,

    /// Destination place name
    pub to: Option<String>,

    /// Optional routing strategy hint
    pub strategy: Option<String>,
}

impl PlanRouteQuery {
    /// Validate into a backend request. Both ends must be non-blank.
    pub fn into_request(self) -> Result<RouteRequest, String> {
        let place = |value: Option<String>, name: &str| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| format!("missing required query parameter: {name}"))
        };

        let request = RouteRequest::new(place(self.from, "from")?, place(self.to, "to")?);
        Ok(match self.strategy.filter(|s| !s.trim().is_empty()) {
            Some(strategy) => request.with_strategy(strategy.trim()),
            None => request,
        })
    }
}

/// Assembled routes together with their map views, in the same order.
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    #[serde(flatten)]
    pub response: RouteResponse,

    /// One map view per route in `data`
    pub views: Vec<MapView>,
}

impl From<RouteResponse> for PreviewResponse {
    fn from(response: RouteResponse) -> Self {
        let views = response.data.iter().map(project_route).collect();
        Self { response, views }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::assemble_routes;
    use serde_json::json;

    fn query(from: Option<&str>, to: Option<&str>, strategy: Option<&str>) -> PlanRouteQuery {
        PlanRouteQuery {
            from: from.map(str::to_string),
            to: to.map(str::to_string),
            strategy: strategy.map(str::to_string),
        }
    }

    #[test]
    fn plan_query_into_request() {
        let request = query(Some(" Kubwa "), Some("Wuse"), Some("cheapest"))
            .into_request()
            .unwrap();
        assert_eq!(request, RouteRequest::new("Kubwa", "Wuse").with_strategy("cheapest"));

        let request = query(Some("Kubwa"), Some("Wuse"), Some(" ")).into_request().unwrap();
        assert_eq!(request.strategy, None);
    }

    #[test]
    fn plan_query_requires_both_ends() {
        let err = query(None, Some("Wuse"), None).into_request().unwrap_err();
        assert_eq!(err, "missing required query parameter: from");

        let err = query(Some("Kubwa"), Some("  "), None).into_request().unwrap_err();
        assert_eq!(err, "missing required query parameter: to");
    }

    #[test]
    fn preview_flattens_response() {
        let response = assemble_routes(&json!([{"mode": "bus", "toStop": {"name": "Berger", "lat": 9.07, "lng": 7.48}}]));
        let preview = PreviewResponse::from(response);
        assert_eq!(preview.views.len(), 1);

        let value = serde_json::to_value(&preview).unwrap();
        assert_eq!(value["success"], json!(true));
        assert_eq!(value["data"].as_array().map(Vec::len), Some(1));
        assert_eq!(value["views"][0]["markers"][0]["name"], json!("Berger"));
    }
}
