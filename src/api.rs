use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tower_http::cors::CorsLayer;

use crate::metrics::{self, Metrics};
use crate::simulator::{AlarmSimulator, RequestInput};
use crate::strategy::AlarmPlan;

/// Required request fields, in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 8] = [
    "user_id",
    "bedtime",
    "sleep_duration_hours",
    "screen_time_before_bed_min",
    "light_activity_min",
    "is_weekend",
    "chronotype",
    "alarm_time",
];

#[derive(Clone)]
pub struct AppState {
    pub simulator: Arc<AlarmSimulator>,
    pub metrics: Option<Metrics>,
}

impl AppState {
    pub fn new(simulator: AlarmSimulator) -> Self {
        Self {
            simulator: Arc::new(simulator),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }
}

pub fn create_router(state: AppState) -> Router {
    let metrics_routes = state.metrics.as_ref().map(Metrics::router);

    let mut router = Router::new()
        .route("/", get(home))
        .route("/predict_alarm", post(predict_alarm))
        .with_state(state);

    if let Some(m) = metrics_routes {
        router = router.merge(m);
    }

    router.layer(CorsLayer::very_permissive())
}

/// Failures surfaced to HTTP callers as `{"message": ...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InvalidJson,
    MissingField(&'static str),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson | ApiError::MissingField(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::InvalidJson => "Invalid request: Request body must be valid JSON.".into(),
            ApiError::MissingField(f) => format!("Missing data field: '{f}' is required."),
            ApiError::Internal(detail) => {
                format!("Internal server error during prediction. Error: {detail}")
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::InvalidJson => "invalid_json",
            ApiError::MissingField(_) => "missing_field",
            ApiError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        metrics::record_error(self.kind());
        (self.status(), Json(json!({ "message": self.message() }))).into_response()
    }
}

#[derive(Debug, Serialize)]
struct HomeResp {
    status: &'static str,
    endpoint: &'static str,
}

async fn home() -> Json<HomeResp> {
    Json(HomeResp {
        status: "API is running",
        endpoint: "/predict_alarm",
    })
}

#[derive(Debug, Serialize)]
struct PredictResp {
    status: &'static str,
    prediction: AlarmPlan,
}

async fn predict_alarm(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PredictResp>, ApiError> {
    let data = parse_body(&body)?;
    let input = validate(data)?;

    tracing::info!(user_id = %input.user_id, "received and validated prediction request");

    let plan = state.simulator.get_alarm_plan(&input).map_err(|e| {
        tracing::error!(user_id = %input.user_id, error = %e, kind = e.kind(), "prediction failed");
        ApiError::Internal(e.to_string())
    })?;

    metrics::record_plan(&plan);
    Ok(Json(PredictResp {
        status: "success",
        prediction: plan,
    }))
}

/// Parse the raw body into a non-empty JSON object.
fn parse_body(body: &[u8]) -> Result<Map<String, Value>, ApiError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) if !map.is_empty() => Ok(map),
        Ok(_) => {
            tracing::warn!("request body is empty or not a JSON object");
            Err(ApiError::InvalidJson)
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to parse request JSON");
            Err(ApiError::InvalidJson)
        }
    }
}

/// Presence check in field order, then typed extraction.
fn validate(data: Map<String, Value>) -> Result<RequestInput, ApiError> {
    // A null user_id counts as missing; other fields only need the key.
    if matches!(data.get("user_id"), None | Some(Value::Null)) {
        tracing::warn!("user_id is missing");
        return Err(ApiError::MissingField("user_id"));
    }
    if let Some(field) = REQUIRED_FIELDS[1..]
        .iter()
        .copied()
        .find(|f| !data.contains_key(*f))
    {
        tracing::warn!(field, "missing required field");
        return Err(ApiError::MissingField(field));
    }

    serde_json::from_value::<RequestInput>(Value::Object(data)).map_err(|e| {
        tracing::error!(error = %e, "request fields have unexpected types");
        ApiError::Internal(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> Map<String, Value> {
        match json!({
            "user_id": "user_1",
            "bedtime": "23:00",
            "sleep_duration_hours": 7.5,
            "screen_time_before_bed_min": 30,
            "light_activity_min": 10,
            "is_weekend": false,
            "chronotype": "early",
            "alarm_time": "06:30"
        }) {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn empty_and_non_object_bodies_are_invalid() {
        for raw in ["", "{}", "null", "[]", "not json", "[1,2]", "\"x\""] {
            assert_eq!(
                parse_body(raw.as_bytes()).unwrap_err(),
                ApiError::InvalidJson,
                "body {raw:?}"
            );
        }
    }

    #[test]
    fn null_user_id_counts_as_missing() {
        let mut m = full();
        m.insert("user_id".into(), Value::Null);
        assert_eq!(validate(m).unwrap_err(), ApiError::MissingField("user_id"));
    }

    #[test]
    fn first_missing_field_in_order_is_reported() {
        let mut m = full();
        m.remove("alarm_time");
        m.remove("bedtime");
        assert_eq!(validate(m).unwrap_err(), ApiError::MissingField("bedtime"));
    }

    #[test]
    fn wrong_type_is_internal() {
        let mut m = full();
        m.insert("chronotype".into(), json!(5));
        assert!(matches!(validate(m), Err(ApiError::Internal(_))));
    }

    #[test]
    fn messages_match_contract() {
        assert_eq!(
            ApiError::MissingField("chronotype").message(),
            "Missing data field: 'chronotype' is required."
        );
        assert_eq!(
            ApiError::Internal("boom".into()).message(),
            "Internal server error during prediction. Error: boom"
        );
        assert_eq!(ApiError::Internal("x".into()).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
