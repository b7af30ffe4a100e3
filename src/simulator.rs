//! Alarm plan simulator: history lookup → features → score → plan.
//!
//! Stands in for a trained ensemble model. Weights and history are fixed at
//! construction; only the noise source carries state between calls.

use serde::{de, Deserialize, Deserializer, Serialize};
use std::sync::Arc;

use crate::error::SimError;
use crate::features::build_features;
use crate::history::{HistoryRepository, InMemoryHistory};
use crate::scoring::{predict_score, NoiseSource, UniformNoise, DEFAULT_NOISE_AMPLITUDE};
use crate::strategy::AlarmPlan;
use crate::weights::ScoreWeights;

/// Caller-supplied fields for one prediction. Presence is checked upstream;
/// no range checks are applied. `bedtime` and `light_activity_min` do not feed
/// the score and are carried as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestInput {
    #[serde(deserialize_with = "id_string")]
    pub user_id: String,
    pub bedtime: serde_json::Value,
    pub sleep_duration_hours: f64,
    pub screen_time_before_bed_min: f64,
    pub light_activity_min: serde_json::Value,
    #[serde(deserialize_with = "flag")]
    pub is_weekend: bool,
    pub chronotype: String,
    pub alarm_time: String,
}

/// Any JSON value becomes a lookup key: strings as-is, everything else by its
/// text form (`7` → `"7"`, `true` → `"True"`).
fn id_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match serde_json::Value::deserialize(d)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Bool(true) => "True".into(),
        serde_json::Value::Bool(false) => "False".into(),
        serde_json::Value::Null => "None".into(),
        other => other.to_string(),
    })
}

/// Accept `true`/`false` as well as `1`/`0`.
fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    match serde_json::Value::deserialize(d)? {
        serde_json::Value::Bool(b) => Ok(b),
        serde_json::Value::Number(n) => Ok(n.as_f64().is_some_and(|x| x != 0.0)),
        other => Err(de::Error::custom(format!(
            "is_weekend must be a boolean or number, got {other}"
        ))),
    }
}

pub struct AlarmSimulator {
    weights: Arc<ScoreWeights>,
    history: Arc<dyn HistoryRepository>,
    noise: Arc<dyn NoiseSource>,
}

impl AlarmSimulator {
    pub fn new(
        weights: Arc<ScoreWeights>,
        history: Arc<dyn HistoryRepository>,
        noise: Arc<dyn NoiseSource>,
    ) -> Self {
        Self {
            weights,
            history,
            noise,
        }
    }

    /// Built-in weights and history, unseeded ±0.5 noise.
    pub fn mock() -> Self {
        Self::new(
            Arc::new(ScoreWeights::default()),
            Arc::new(InMemoryHistory::mock()),
            Arc::new(UniformNoise::from_entropy(DEFAULT_NOISE_AMPLITUDE)),
        )
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Predict the next-day readiness score for one request.
    pub fn predict_score(&self, input: &RequestInput) -> Result<f64, SimError> {
        let history = self.history.get_history(&input.user_id);
        let features = build_features(input, &history, &self.weights)?;
        Ok(predict_score(&features, &self.weights, self.noise.as_ref()))
    }

    /// The single entry point used by the HTTP layer.
    pub fn get_alarm_plan(&self, input: &RequestInput) -> Result<AlarmPlan, SimError> {
        let score = self.predict_score(input)?;
        let plan = AlarmPlan::for_score(score);
        tracing::debug!(
            user_id = %input.user_id,
            score,
            strategy = %plan.strategy,
            "alarm plan computed"
        );
        Ok(plan)
    }
}

impl std::fmt::Debug for AlarmSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlarmSimulator")
            .field("weights", &self.weights)
            .finish_non_exhaustive()
    }
}
