//! strategy.rs — score bands and the alarm plan returned to callers.
//!
//! Bands are half-open and evaluated high → low, so an exact edge value
//! (8.5, 7.0, 5.0) belongs to the upper band.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete wake-up strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    Optimal,
    Good,
    Fair,
    Recovery,
}

impl Strategy {
    pub const OPTIMAL_MIN: f64 = 8.5;
    pub const GOOD_MIN: f64 = 7.0;
    pub const FAIR_MIN: f64 = 5.0;

    pub fn from_score(score: f64) -> Self {
        if score >= Self::OPTIMAL_MIN {
            Strategy::Optimal
        } else if score >= Self::GOOD_MIN {
            Strategy::Good
        } else if score >= Self::FAIR_MIN {
            Strategy::Fair
        } else {
            Strategy::Recovery
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Optimal => "Optimal",
            Strategy::Good => "Good",
            Strategy::Fair => "Fair",
            Strategy::Recovery => "Recovery",
        }
    }

    pub fn wake_up_mode(self) -> &'static str {
        match self {
            Strategy::Optimal => "Energetic & Bright",
            Strategy::Good => "Gentle-Rise",
            Strategy::Fair => "Standard",
            Strategy::Recovery => "Gentle & Gradual",
        }
    }

    pub fn music_type(self) -> &'static str {
        match self {
            Strategy::Optimal => "Upbeat Pop/Rock",
            Strategy::Good => "Ambient/Lo-Fi",
            Strategy::Fair => "Soft Rock/Instrumental",
            Strategy::Recovery => "Classical/Nature Sounds",
        }
    }

    pub fn snooze_allowance(self) -> &'static str {
        match self {
            Strategy::Optimal => "Strict (1 max)",
            Strategy::Good => "Lenient (3 max)",
            Strategy::Fair => "Not Recommended",
            Strategy::Recovery => "Strictly Avoid",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recommendation bundle for one request. This is the `prediction` object of
/// a successful `/predict_alarm` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmPlan {
    pub prediction_score: f64,
    pub strategy: Strategy,
    pub wake_up_mode: String,
    pub music_type: String,
    pub snooze_allowance: String,
    pub message: String,
}

impl AlarmPlan {
    /// Map an already clamped score to its plan.
    pub fn for_score(score: f64) -> Self {
        let s = Strategy::from_score(score);
        Self {
            prediction_score: score,
            strategy: s,
            wake_up_mode: s.wake_up_mode().to_string(),
            music_type: s.music_type().to_string(),
            snooze_allowance: s.snooze_allowance().to_string(),
            message: format!(
                "Your next-day readiness score is {}. Recommended strategy: {}.",
                format_score(score),
                s
            ),
        }
    }
}

/// One-decimal rendering that always keeps the decimal point ("7.0", not "7").
fn format_score(score: f64) -> String {
    format!("{score:.1}")
}
