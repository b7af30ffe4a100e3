// src/dataset/labels.rs
//! "Next day" label columns for supervised training on the daily logs.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::generate::DailyLog;

/// A daily log plus the labels derived from the following day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledLog {
    pub user_id: u32,
    pub day: u32,
    pub weekday: u32,
    pub alarm_hour: u32,
    pub alarm_minute: u32,
    pub alarm_hour_with_snooze: u32,
    pub alarm_minute_with_snooze: u32,
    pub sleep_duration_hours: f64,
    pub screen_time_before_bed_min: u32,
    pub smart_sleep_meter: f64,
    pub mood: f64,
    pub stress_level: f64,
    pub sleep_quality: f64,
    pub exercise_done: u8,
    pub nap_duration_min: u32,
    pub snooze_count: u32,
    pub next_day_smart_sleep: f64,
    pub next_day_mood: f64,
    pub next_day_stress: f64,
    pub optimal_alarm_hour: u32,
    pub optimal_alarm_minute: u32,
}

impl LabeledLog {
    fn from_pair(today: &DailyLog, tomorrow: &DailyLog, optimal: (u32, u32)) -> Self {
        Self {
            user_id: today.user_id,
            day: today.day,
            weekday: today.weekday,
            alarm_hour: today.alarm_hour,
            alarm_minute: today.alarm_minute,
            alarm_hour_with_snooze: today.alarm_hour_with_snooze,
            alarm_minute_with_snooze: today.alarm_minute_with_snooze,
            sleep_duration_hours: today.sleep_duration_hours,
            screen_time_before_bed_min: today.screen_time_before_bed_min,
            smart_sleep_meter: today.smart_sleep_meter,
            mood: today.mood,
            stress_level: today.stress_level,
            sleep_quality: today.sleep_quality,
            exercise_done: today.exercise_done,
            nap_duration_min: today.nap_duration_min,
            snooze_count: today.snooze_count,
            next_day_smart_sleep: tomorrow.smart_sleep_meter,
            next_day_mood: tomorrow.mood,
            next_day_stress: tomorrow.stress_level,
            optimal_alarm_hour: optimal.0,
            optimal_alarm_minute: optimal.1,
        }
    }
}

/// Keep today's alarm if it beat the user's mean score, otherwise move it an
/// hour earlier or later at random.
pub fn optimal_alarm<R: Rng + ?Sized>(rng: &mut R, log: &DailyLog, user_mean: f64) -> (u32, u32) {
    if log.smart_sleep_meter >= user_mean {
        return (log.alarm_hour, log.alarm_minute);
    }
    let shift: i64 = if rng.random_bool(0.5) { 1 } else { -1 };
    let hour = (i64::from(log.alarm_hour) + shift).rem_euclid(24) as u32;
    (hour, log.alarm_minute)
}

/// Sort by (user, day), attach next-day labels, and drop each user's last day.
pub fn add_labels<R: Rng + ?Sized>(rng: &mut R, mut logs: Vec<DailyLog>) -> Vec<LabeledLog> {
    logs.sort_by_key(|l| (l.user_id, l.day));

    let mut out = Vec::with_capacity(logs.len());
    for group in logs.chunk_by(|a, b| a.user_id == b.user_id) {
        let user_mean =
            group.iter().map(|l| l.smart_sleep_meter).sum::<f64>() / group.len() as f64;
        for pair in group.windows(2) {
            let optimal = optimal_alarm(rng, &pair[0], user_mean);
            out.push(LabeledLog::from_pair(&pair[0], &pair[1], optimal));
        }
    }
    tracing::info!(input_rows = logs.len(), labeled_rows = out.len(), "labels added");
    out
}
