// src/dataset/generate.rs
//! Simulated daily sleep logs with user-specific baselines.

use anyhow::{bail, Result};
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::reference::ReferenceSample;
use super::{round1, sample_normal};

/// exercise_done value and its probability.
const EXERCISE_CHOICES: [(u8, f64); 2] = [(0, 0.4), (1, 0.6)];
/// Snooze count and its probability.
const SNOOZE_CHOICES: [(u32, f64); 4] = [(0, 0.5), (1, 0.3), (2, 0.15), (3, 0.05)];
const SNOOZE_STEP_MIN: u32 = 10;
/// Score penalty per minute of screen time before bed.
const SCREEN_PENALTY: f64 = 0.02;

/// One simulated user-day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    pub user_id: u32,
    pub day: u32,
    /// 0 = Monday .. 6 = Sunday.
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
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub users: u32,
    pub days_per_user: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            users: 50,
            days_per_user: 30,
        }
    }
}

/// Alarm time after `snooze_count` snoozes, wrapping past midnight.
pub fn snoozed_alarm(hour: u32, minute: u32, snooze_count: u32) -> (u32, u32) {
    let total = minute + snooze_count * SNOOZE_STEP_MIN;
    ((hour + total / 60) % 24, total % 60)
}

/// Generate `days_per_user` logs for a single user.
pub fn generate_user_logs<R: Rng + ?Sized>(
    rng: &mut R,
    user_id: u32,
    days_per_user: u32,
    pool: &[ReferenceSample],
) -> Result<Vec<DailyLog>> {
    if pool.is_empty() {
        bail!("reference pool is empty");
    }

    let base_wake_hour: u32 = rng.random_range(6..9);
    let base_sleep_duration = sample_normal(rng, 7.0, 0.5).clamp(5.0, 9.0);

    let mut logs = Vec::new();
    for day in 1..=days_per_user {
        let weekday = (day - 1) % 7;
        // Slightly later wakeups on weekends
        let weekend_adjust = u32::from(weekday >= 5);

        let Some(sample) = pool.choose(rng) else {
            bail!("reference pool is empty");
        };
        let mut smart_sleep =
            (sample.smart_sleep_meter + sample_normal(rng, 0.0, 0.8)).clamp(0.0, 10.0);
        let mood = (sample.mood_norm + sample_normal(rng, 0.0, 1.0)).clamp(0.0, 10.0);
        let stress = (sample.stress_norm + sample_normal(rng, 0.0, 1.0)).clamp(0.0, 10.0);
        let sleep_quality =
            (sample.sleep_quality_norm + sample_normal(rng, 0.0, 1.0)).clamp(0.0, 10.0);
        let screen_time: u32 = rng.random_range(0..90);
        let alarm_hour = base_wake_hour + weekend_adjust;
        let alarm_minute: u32 = rng.random_range(0..60);
        let exercise = EXERCISE_CHOICES.choose_weighted(rng, |c| c.1)?.0;
        let nap_duration: u32 = rng.random_range(0..60);
        let sleep_duration = (base_sleep_duration + sample_normal(rng, 0.0, 1.0)).clamp(4.0, 10.0);

        // More screen time → lower score. Applied after the clip, as in the source data.
        smart_sleep -= SCREEN_PENALTY * f64::from(screen_time);

        let snooze_count = SNOOZE_CHOICES.choose_weighted(rng, |c| c.1)?.0;
        let (hour_snooze, minute_snooze) = snoozed_alarm(alarm_hour, alarm_minute, snooze_count);

        logs.push(DailyLog {
            user_id,
            day,
            weekday,
            alarm_hour,
            alarm_minute,
            alarm_hour_with_snooze: hour_snooze,
            alarm_minute_with_snooze: minute_snooze,
            sleep_duration_hours: round1(sleep_duration),
            screen_time_before_bed_min: screen_time,
            smart_sleep_meter: round1(smart_sleep),
            mood: round1(mood),
            stress_level: round1(stress),
            sleep_quality: round1(sleep_quality),
            exercise_done: exercise,
            nap_duration_min: nap_duration,
            snooze_count,
        });
    }
    Ok(logs)
}

/// Generate logs for users `1..=cfg.users`.
pub fn generate_dataset<R: Rng + ?Sized>(
    rng: &mut R,
    pool: &[ReferenceSample],
    cfg: GeneratorConfig,
) -> Result<Vec<DailyLog>> {
    let mut all = Vec::new();
    for user_id in 1..=cfg.users {
        all.extend(generate_user_logs(rng, user_id, cfg.days_per_user, pool)?);
    }
    tracing::info!(users = cfg.users, rows = all.len(), "synthetic daily logs generated");
    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::reference::{build_pool, synthetic_raw};
    use rand::{rngs::StdRng, SeedableRng};

    fn pool(rng: &mut StdRng) -> Vec<ReferenceSample> {
        build_pool(&synthetic_raw(rng, 100))
    }

    #[test]
    fn snooze_carries_into_hour() {
        assert_eq!(snoozed_alarm(7, 10, 0), (7, 10));
        assert_eq!(snoozed_alarm(7, 45, 2), (8, 5));
        assert_eq!(snoozed_alarm(23, 55, 3), (0, 25));
    }

    #[test]
    fn rows_respect_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let p = pool(&mut rng);
        let logs = generate_dataset(
            &mut rng,
            &p,
            GeneratorConfig {
                users: 5,
                days_per_user: 14,
            },
        )
        .unwrap();
        assert_eq!(logs.len(), 70);

        for l in &logs {
            assert!((6..=9).contains(&l.alarm_hour));
            assert!(l.alarm_minute < 60 && l.alarm_minute_with_snooze < 60);
            assert!(l.screen_time_before_bed_min < 90);
            assert!(l.nap_duration_min < 60);
            assert!(l.snooze_count <= 3);
            assert!(l.exercise_done <= 1);
            assert!((4.0..=10.0).contains(&l.sleep_duration_hours));
            for v in [l.mood, l.stress_level, l.sleep_quality] {
                assert!((0.0..=10.0).contains(&v));
            }
            // screen penalty can push the score below zero (max 89 * 0.02)
            assert!((-1.8..=10.0).contains(&l.smart_sleep_meter));
        }
    }

    #[test]
    fn weekend_alarm_is_one_hour_later() {
        let mut rng = StdRng::seed_from_u64(8);
        let p = pool(&mut rng);
        let logs = generate_user_logs(&mut rng, 1, 7, &p).unwrap();
        let weekday_hour = logs[0].alarm_hour;
        assert_eq!(logs[5].weekday, 5);
        assert_eq!(logs[5].alarm_hour, weekday_hour + 1);
        assert_eq!(logs[6].alarm_hour, weekday_hour + 1);
        assert!(logs[..5].iter().all(|l| l.alarm_hour == weekday_hour));
    }

    #[test]
    fn empty_pool_is_an_error() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate_user_logs(&mut rng, 1, 3, &[]).is_err());
    }

    #[test]
    fn same_seed_same_dataset() {
        let run = || {
            let mut rng = StdRng::seed_from_u64(99);
            let p = pool(&mut rng);
            generate_dataset(&mut rng, &p, GeneratorConfig { users: 2, days_per_user: 5 }).unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn oversized_request_fails_without_overflow() {
        let mut rng = StdRng::seed_from_u64(3);
        let cfg = GeneratorConfig {
            users: u32::MAX,
            days_per_user: u32::MAX,
        };
        assert!(generate_dataset(&mut rng, &[], cfg).is_err());
    }

    #[test]
    fn snooze_counts_follow_their_weights() {
        let mut rng = StdRng::seed_from_u64(12);
        let p = pool(&mut rng);
        let logs = generate_user_logs(&mut rng, 1, 4000, &p).unwrap();
        let mut counts = [0usize; 4];
        for l in &logs {
            counts[l.snooze_count as usize] += 1;
        }
        assert!(counts[0] > counts[1] && counts[1] > counts[2] && counts[2] > counts[3]);
        assert!(counts[3] > 0);
        let exercised = logs.iter().filter(|l| l.exercise_done == 1).count();
        assert!(exercised > logs.len() / 2);
    }
}
