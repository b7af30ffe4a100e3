//! Linear score weights, loaded once at startup.
//!
//! JSON shape (flat, one key per feature plus `intercept`):
//! {
//!   "sleep_duration_hours": 0.45,
//!   "previous_day_smart_sleep": 0.25,
//!   ...
//!   "intercept": 3.0
//! }

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::Path};

/// Key of the intercept term in the weight table.
pub const INTERCEPT_KEY: &str = "intercept";

/// Feature weights plus an intercept. Never mutated after construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct ScoreWeights {
    pub intercept: f64,
    weights: BTreeMap<String, f64>,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        let weights = [
            ("sleep_duration_hours", 0.45),
            ("previous_day_smart_sleep", 0.25),
            ("screen_time_before_bed_min", -0.015),
            ("avg_stress_level_3d", -0.08),
            ("bedtime_regularity_std_7d", -0.05),
            ("avg_sleep_quality_7d", 0.1),
            ("is_weekend", 0.3),
            // Late chronotype generally hurts the score
            ("chronotype_late", -0.2),
        ]
        .into_iter()
        .map(|(k, w)| (k.to_string(), w))
        .collect();

        Self {
            intercept: 3.0,
            weights,
        }
    }
}

impl ScoreWeights {
    pub fn new(intercept: f64, weights: BTreeMap<String, f64>) -> Self {
        let mut weights = weights;
        weights.remove(INTERCEPT_KEY);
        Self { intercept, weights }
    }

    /// Feature names carrying a weight (intercept excluded).
    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.weights.keys().map(String::as_str)
    }

    pub fn weight(&self, feature: &str) -> Option<f64> {
        self.weights.get(feature).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(k, &w)| (k.as_str(), w))
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl TryFrom<BTreeMap<String, f64>> for ScoreWeights {
    type Error = String;

    fn try_from(mut map: BTreeMap<String, f64>) -> std::result::Result<Self, Self::Error> {
        let intercept = map
            .remove(INTERCEPT_KEY)
            .ok_or_else(|| format!("weights table is missing '{INTERCEPT_KEY}'"))?;
        if let Some((k, _)) = map.iter().find(|(_, w)| !w.is_finite()) {
            return Err(format!("weight for '{k}' is not finite"));
        }
        Ok(Self::new(intercept, map))
    }
}

impl From<ScoreWeights> for BTreeMap<String, f64> {
    fn from(w: ScoreWeights) -> Self {
        let mut map = w.weights;
        map.insert(INTERCEPT_KEY.to_string(), w.intercept);
        map
    }
}

/// Load weights directly from a JSON file. Public for tests/tools.
pub fn load_weights_file(path: &Path) -> Result<ScoreWeights> {
    let bytes =
        fs::read(path).with_context(|| format!("reading weights from {}", path.display()))?;
    let w: ScoreWeights = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing weights JSON at {}", path.display()))?;
    Ok(w)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_eight_features_and_intercept() {
        let w = ScoreWeights::default();
        assert_eq!(w.len(), 8);
        assert!((w.intercept - 3.0).abs() < f64::EPSILON);
        assert_eq!(w.weight("chronotype_late"), Some(-0.2));
        assert_eq!(w.weight(INTERCEPT_KEY), None);
    }

    #[test]
    fn parses_flat_json() {
        let w: ScoreWeights =
            serde_json::from_str(r#"{"sleep_duration_hours": 1.0, "intercept": 2.5}"#).unwrap();
        assert!((w.intercept - 2.5).abs() < f64::EPSILON);
        assert_eq!(w.feature_names().collect::<Vec<_>>(), vec!["sleep_duration_hours"]);
    }

    #[test]
    fn missing_intercept_is_rejected() {
        let r: std::result::Result<ScoreWeights, _> =
            serde_json::from_str(r#"{"sleep_duration_hours": 1.0}"#);
        assert!(r.is_err());
    }

    #[test]
    fn file_loader_reads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights.json");
        let json = serde_json::to_string(&ScoreWeights::default()).unwrap();
        fs::write(&path, json).unwrap();

        let w = load_weights_file(&path).unwrap();
        assert_eq!(w, ScoreWeights::default());
    }
}
