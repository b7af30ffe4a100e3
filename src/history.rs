//! history.rs — per-user sleep history used for lag and rolling features.
//!
//! The simulator never writes history; it is loaded once at startup and read
//! per request through the [`HistoryRepository`] seam.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::Path};

use crate::rolling::WINDOW_DAYS;

/// User id whose history backs unknown ids when nothing else is configured.
pub const DEFAULT_USER_ID: &str = "user_1";

/// The last seven days of a user's sleep data, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserHistory {
    /// Previous day's smart sleep score (lag-1).
    pub smart_sleep_meter_lag_1: f64,
    pub stress_level_7d: [f64; WINDOW_DAYS],
    pub sleep_duration_7d: [f64; WINDOW_DAYS],
    pub sleep_quality_7d: [f64; WINDOW_DAYS],
    /// Alarm times as minutes past midnight.
    pub alarm_time_minutes_7d: [u32; WINDOW_DAYS],
}

impl UserHistory {
    /// Built-in history for the default user.
    pub fn seed() -> Self {
        Self {
            smart_sleep_meter_lag_1: 7.2,
            stress_level_7d: [5.0, 4.5, 6.0, 5.5, 7.0, 6.5, 5.8],
            sleep_duration_7d: [7.0, 7.5, 6.5, 7.2, 7.1, 7.8, 6.9],
            sleep_quality_7d: [7.5, 7.8, 6.5, 7.0, 8.1, 7.5, 7.2],
            alarm_time_minutes_7d: [420, 425, 430, 420, 435, 420, 425],
        }
    }
}

/// Lookup of a user's history. Unknown ids resolve to a default history
/// instead of failing.
pub trait HistoryRepository: Send + Sync {
    fn get_history(&self, user_id: &str) -> UserHistory;
}

/// Read-only in-memory history table.
#[derive(Debug, Clone)]
pub struct InMemoryHistory {
    users: HashMap<String, UserHistory>,
    default_user: String,
}

impl InMemoryHistory {
    pub fn new(users: HashMap<String, UserHistory>, default_user: impl Into<String>) -> Self {
        Self {
            users,
            default_user: default_user.into(),
        }
    }

    /// Table holding only the built-in `user_1` history.
    pub fn mock() -> Self {
        let mut users = HashMap::new();
        users.insert(DEFAULT_USER_ID.to_string(), UserHistory::seed());
        Self::new(users, DEFAULT_USER_ID)
    }

    /// Load a JSON object of `user_id -> UserHistory`.
    ///
    /// The default user must be present in the file.
    pub fn load_from_file<P: AsRef<Path>>(path: P, default_user: &str) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading history from {}", path.display()))?;
        let users: HashMap<String, UserHistory> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing history JSON at {}", path.display()))?;
        if !users.contains_key(default_user) {
            anyhow::bail!(
                "history file {} has no entry for default user '{}'",
                path.display(),
                default_user
            );
        }
        Ok(Self::new(users, default_user))
    }

    pub fn default_user(&self) -> &str {
        &self.default_user
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl HistoryRepository for InMemoryHistory {
    fn get_history(&self, user_id: &str) -> UserHistory {
        self.users
            .get(user_id)
            .or_else(|| self.users.get(&self.default_user))
            .cloned()
            .unwrap_or_else(UserHistory::seed)
    }
}
