//! Feature engineering: request fields + user history → named feature values.
//!
//! Every feature the pipeline knows how to derive is computed, then the result
//! is projected onto the weight table so the vector holds exactly the weighted
//! feature names (missing ones default to `0.0`).

use chrono::{NaiveTime, Timelike};
use std::collections::BTreeMap;

use crate::error::SimError;
use crate::history::UserHistory;
use crate::rolling::{mean_last, population_std, slide, WINDOW_DAYS};
use crate::simulator::RequestInput;
use crate::weights::ScoreWeights;

pub const F_REGULARITY_STD_7D: &str = "bedtime_regularity_std_7d";
pub const F_PREVIOUS_DAY_SCORE: &str = "previous_day_smart_sleep";
pub const F_SCREEN_TIME: &str = "screen_time_before_bed_min";
pub const F_SLEEP_DURATION: &str = "sleep_duration_hours";
pub const F_IS_WEEKEND: &str = "is_weekend";
pub const F_CHRONOTYPE_LATE: &str = "chronotype_late";

/// Named feature values for one scoring call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector(BTreeMap<String, f64>);

impl FeatureVector {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

}

impl FromIterator<(String, f64)> for FeatureVector {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Parse a 24-hour `HH:MM` string into minutes past midnight.
pub fn parse_alarm_time(raw: &str) -> Result<u32, SimError> {
    let t = NaiveTime::parse_from_str(raw, "%H:%M")
        .map_err(|_| SimError::TimeFormat(raw.to_string()))?;
    Ok(t.hour() * 60 + t.minute())
}

/// Alarm-time regularity: population std over the stored window with the
/// oldest day dropped and today's alarm appended.
pub fn alarm_regularity(history: &UserHistory, current_alarm_min: u32) -> f64 {
    let stored: Vec<f64> = history
        .alarm_time_minutes_7d
        .iter()
        .map(|&m| f64::from(m))
        .collect();
    population_std(&slide(&stored, f64::from(current_alarm_min), WINDOW_DAYS))
}

/// Rolling features from history alone (plus today's alarm for regularity).
///
/// Produces 3-day and 7-day means for stress, quality and duration. The default
/// weight table only reads `avg_stress_level_3d` and `avg_sleep_quality_7d`.
pub fn rolling_features(history: &UserHistory, current_alarm_min: u32) -> BTreeMap<String, f64> {
    let mut out = BTreeMap::new();
    out.insert(
        F_REGULARITY_STD_7D.to_string(),
        alarm_regularity(history, current_alarm_min),
    );

    let series: [(&str, &[f64]); 3] = [
        ("stress_level", history.stress_level_7d.as_slice()),
        ("sleep_quality", history.sleep_quality_7d.as_slice()),
        ("sleep_duration", history.sleep_duration_7d.as_slice()),
    ];
    for (name, values) in series {
        out.insert(format!("avg_{name}_3d"), mean_last(values, 3));
        out.insert(format!("avg_{name}_7d"), mean_last(values, WINDOW_DAYS));
    }
    out
}

/// `1.0` when the chronotype is "late" (any case), else `0.0`.
pub fn chronotype_late(chronotype: &str) -> f64 {
    if chronotype.to_lowercase() == "late" {
        1.0
    } else {
        0.0
    }
}

/// Build the feature vector the weight table expects.
pub fn build_features(
    input: &RequestInput,
    history: &UserHistory,
    weights: &ScoreWeights,
) -> Result<FeatureVector, SimError> {
    let alarm_min = parse_alarm_time(&input.alarm_time)?;

    let mut all = rolling_features(history, alarm_min);
    all.insert(F_SCREEN_TIME.to_string(), input.screen_time_before_bed_min);
    all.insert(F_SLEEP_DURATION.to_string(), input.sleep_duration_hours);
    all.insert(
        F_IS_WEEKEND.to_string(),
        if input.is_weekend { 1.0 } else { 0.0 },
    );
    all.insert(
        F_PREVIOUS_DAY_SCORE.to_string(),
        history.smart_sleep_meter_lag_1,
    );
    all.insert(
        F_CHRONOTYPE_LATE.to_string(),
        chronotype_late(&input.chronotype),
    );

    Ok(weights
        .feature_names()
        .map(|name| (name.to_string(), all.get(name).copied().unwrap_or(0.0)))
        .collect())
}
