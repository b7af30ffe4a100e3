// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod api;
pub mod config;
pub mod error;
pub mod features;
pub mod history;
pub mod metrics;
pub mod rolling;
pub mod scoring;
pub mod simulator;
pub mod strategy;
pub mod weights;

// Offline dataset generation (used by the `sleep-dataset` binary)
pub mod dataset;

// ---- Re-exports for stable public API ----
pub use crate::api::create_router;
pub use crate::error::SimError;
pub use crate::simulator::{AlarmSimulator, RequestInput};
pub use crate::strategy::{AlarmPlan, Strategy};

/// Build the full in-process app from `AppConfig::load_default()`, the same
/// way the server binary does.
pub async fn app() -> anyhow::Result<axum::Router> {
    let cfg = config::AppConfig::load_default()?;
    let simulator = cfg.build_simulator()?;
    let mut state = api::AppState::new(simulator);
    if cfg.metrics_enabled {
        state = state.with_metrics(crate::metrics::Metrics::init()?);
    }
    Ok(api::create_router(state))
}
