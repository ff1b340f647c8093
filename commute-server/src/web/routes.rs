//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::Value;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::normalize::RouteResponse;
use crate::upstream::{UpstreamError, plan_route};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/routes/normalize", post(normalize_routes))
        .route("/routes/preview", post(preview_routes))
        .route("/routes/plan", get(plan))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Normalize a raw route-generation response posted by the caller.
async fn normalize_routes(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<RouteResponse>, AppError> {
    let raw = parse_body(&body)?;
    Ok(Json(state.assembler.assemble(&raw)))
}

/// Normalize a raw response and project every route onto a map view.
async fn preview_routes(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PreviewResponse>, AppError> {
    let raw = parse_body(&body)?;
    Ok(Json(state.assembler.assemble(&raw).into()))
}

/// Ask the routing backend for routes and normalize its answer.
async fn plan(
    State(state): State<AppState>,
    Query(query): Query<PlanRouteQuery>,
) -> Result<Json<RouteResponse>, AppError> {
    let request = query
        .into_request()
        .map_err(|message| AppError::BadRequest { message })?;

    let response = plan_route(state.source.as_ref(), &state.assembler, &request).await?;
    Ok(Json(response))
}

/// Parse a request body as JSON. Any JSON value is accepted.
fn parse_body(body: &Bytes) -> Result<Value, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, bytes = body.len(), "request body is not JSON");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    BadGateway { message: String },
}

impl From<UpstreamError> for AppError {
    fn from(e: UpstreamError) -> Self {
        match e {
            UpstreamError::NotFound(_) => AppError::NotFound {
                message: e.to_string(),
            },
            _ => AppError::BadGateway {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::RouteAssembler;
    use crate::upstream::{MockUpstreamClient, RouteSource};
    use std::fs;
    use tempfile::TempDir;

    fn mock_state(fixtures: &[(&str, &str)]) -> (AppState, TempDir) {
        let dir = TempDir::new().unwrap();
        for (name, contents) in fixtures {
            fs::write(dir.path().join(name), contents).unwrap();
        }
        let source = RouteSource::Mock(MockUpstreamClient::new(dir.path()).unwrap());
        (AppState::new(RouteAssembler::default(), source), dir)
    }

    fn plan_query(from: &str, to: &str) -> Query<PlanRouteQuery> {
        Query(PlanRouteQuery {
            from: Some(from.to_string()),
            to: Some(to.to_string()),
            strategy: None,
        })
    }

    #[tokio::test]
    async fn health_is_ok() {
        assert_eq!(health().await, "ok");
    }

    #[tokio::test]
    async fn normalize_accepts_any_json() {
        let (state, _dir) = mock_state(&[("default.json", "{}")]);

        let Json(response) = normalize_routes(
            State(state.clone()),
            Bytes::from_static(br#"{"data": {"routes": [{"from": "Kubwa", "legs": [{"mode": "bus"}]}]}}"#),
        )
        .await
        .unwrap();
        assert_eq!(response.data.len(), 1);
        assert_eq!(response.data[0].from, "Kubwa");

        let Json(response) = normalize_routes(State(state), Bytes::from_static(b"42")).await.unwrap();
        assert!(response.data.is_empty());
        assert!(response.success);
    }

    #[tokio::test]
    async fn normalize_rejects_invalid_json() {
        let (state, _dir) = mock_state(&[("default.json", "{}")]);
        let result = normalize_routes(State(state), Bytes::from_static(b"{routes")).await;
        assert!(matches!(result, Err(AppError::BadRequest { .. })));
    }

    #[tokio::test]
    async fn preview_includes_views() {
        let (state, _dir) = mock_state(&[("default.json", "{}")]);
        let Json(preview) = preview_routes(
            State(state),
            Bytes::from_static(br#"[{"mode": "keke", "fromStop": {"name": "Berger", "lat": 9.07, "lng": 7.48}, "cost": 150}]"#),
        )
        .await
        .unwrap();

        assert_eq!(preview.response.data.len(), 1);
        assert_eq!(preview.views.len(), 1);
        assert_eq!(preview.views[0].fare_label, "₦150");
    }

    #[tokio::test]
    async fn plan_uses_source() {
        let (state, _dir) = mock_state(&[(
            "kubwa_to_wuse.json",
            r#"{"success": false, "message": "Area not covered yet", "errorType": "OUT_OF_COVERAGE"}"#,
        )]);

        let Json(response) = plan(State(state), plan_query("Kubwa", "Wuse")).await.unwrap();
        assert!(!response.success);
        assert!(response.data.is_empty());
        assert_eq!(response.error_type.as_deref(), Some("OUT_OF_COVERAGE"));
    }

    #[tokio::test]
    async fn plan_without_fixture_is_not_found() {
        let (state, _dir) = mock_state(&[("kubwa_to_wuse.json", "[]")]);
        let result = plan(State(state), plan_query("Lugbe", "Garki")).await;
        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn plan_requires_both_ends() {
        let (state, _dir) = mock_state(&[("default.json", "{}")]);
        let result = plan(State(state), plan_query("Kubwa", " ")).await;
        assert!(matches!(result, Err(AppError::BadRequest { .. })));
    }

    #[test]
    fn error_status_codes() {
        let cases = [
            (AppError::BadRequest { message: "x".into() }, StatusCode::BAD_REQUEST),
            (AppError::NotFound { message: "x".into() }, StatusCode::NOT_FOUND),
            (AppError::BadGateway { message: "x".into() }, StatusCode::BAD_GATEWAY),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn upstream_errors_map_to_gateway() {
        assert!(matches!(AppError::from(UpstreamError::RateLimited), AppError::BadGateway { .. }));
        assert!(matches!(
            AppError::from(UpstreamError::NotFound("a_to_b".into())),
            AppError::NotFound { .. }
        ));
    }
}
