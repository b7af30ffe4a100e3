use axum::{routing::get, Router};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

use crate::strategy::AlarmPlan;

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

#[derive(Clone)]
pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder (once per process) and describe our series.
    pub fn init() -> anyhow::Result<Self> {
        let handle = HANDLE.get_or_try_init(|| {
            // Use default buckets to avoid API differences across crate versions.
            let handle = PrometheusBuilder::new().install_recorder()?;
            describe_counter!(
                "alarm_predictions_total",
                "Alarm plans served, labelled by strategy."
            );
            describe_counter!(
                "alarm_prediction_errors_total",
                "Prediction requests that failed, labelled by kind."
            );
            describe_histogram!("alarm_prediction_score", "Served readiness scores.");
            anyhow::Ok(handle)
        })?;
        Ok(Self {
            handle: handle.clone(),
        })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

/// Count a served plan. No-op when no recorder is installed.
pub fn record_plan(plan: &AlarmPlan) {
    counter!("alarm_predictions_total", "strategy" => plan.strategy.as_str()).increment(1);
    histogram!("alarm_prediction_score").record(plan.prediction_score);
}

/// Count a failed prediction by kind (`invalid_json`, `missing_field`, ...).
pub fn record_error(kind: &'static str) {
    counter!("alarm_prediction_errors_total", "kind" => kind).increment(1);
}
