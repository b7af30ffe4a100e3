//! Error types for the alarm simulator.

use thiserror::Error;

/// Errors raised while turning a request into an alarm plan.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    /// The alarm time could not be read as 24-hour `HH:MM`.
    #[error("time data '{0}' does not match format '%H:%M'")]
    TimeFormat(String),
}

impl SimError {
    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SimError::TimeFormat(_) => "time_format",
        }
    }
}
