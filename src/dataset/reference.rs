// src/dataset/reference.rs
//! Reference pool of normalised mood / stress / sleep-quality readings that the
//! daily-log generator samples from.

use anyhow::Result;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{read_csv, round1};

/// One raw reading on whatever scale the source used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawReading {
    pub mood: f64,
    pub stress: f64,
    pub sleep_quality: f64,
}

/// A reading rescaled to 0..10, with the derived smart sleep score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSample {
    pub mood_norm: f64,
    /// Inverted: 10 means no stress.
    pub stress_norm: f64,
    pub sleep_quality_norm: f64,
    pub smart_sleep_meter: f64,
}

/// Min-max scale to 0..10, rounded to one decimal. A constant series maps to zeros.
pub fn normalize(series: &[f64]) -> Vec<f64> {
    let min = series.iter().copied().fold(f64::INFINITY, f64::min);
    let max = series.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    series
        .iter()
        .map(|&x| {
            if span > 0.0 {
                round1((x - min) / span * 10.0)
            } else {
                0.0
            }
        })
        .collect()
}

/// Normalise a set of raw readings together and derive their smart sleep score.
pub fn build_pool(raw: &[RawReading]) -> Vec<ReferenceSample> {
    let mood = normalize(&raw.iter().map(|r| r.mood).collect::<Vec<_>>());
    let stress = normalize(&raw.iter().map(|r| r.stress).collect::<Vec<_>>());
    let quality = normalize(&raw.iter().map(|r| r.sleep_quality).collect::<Vec<_>>());

    mood.into_iter()
        .zip(stress)
        .zip(quality)
        .map(|((m, s), q)| {
            let stress_norm = 10.0 - s;
            ReferenceSample {
                mood_norm: m,
                stress_norm,
                sleep_quality_norm: q,
                smart_sleep_meter: round1((m + stress_norm + q) / 3.0),
            }
        })
        .collect()
}

/// Read raw readings from a CSV with `mood,stress,sleep_quality` columns.
pub fn read_raw_csv(path: &Path) -> Result<Vec<RawReading>> {
    read_csv(path)
}

/// Survey-like readings: mood and stress on 1..5, sleep quality on 1..10.
pub fn synthetic_raw<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<RawReading> {
    (0..n)
        .map(|_| RawReading {
            mood: f64::from(rng.random_range(1..=5u8)),
            stress: f64::from(rng.random_range(1..=5u8)),
            sleep_quality: f64::from(rng.random_range(1..=10u8)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn normalize_scales_to_ten() {
        assert_eq!(normalize(&[1.0, 3.0, 5.0]), vec![0.0, 5.0, 10.0]);
        assert_eq!(normalize(&[2.0, 2.0]), vec![0.0, 0.0]);
        assert!(normalize(&[]).is_empty());
    }

    #[test]
    fn pool_inverts_stress_and_averages() {
        let raw = [
            RawReading {
                mood: 1.0,
                stress: 1.0,
                sleep_quality: 1.0,
            },
            RawReading {
                mood: 5.0,
                stress: 5.0,
                sleep_quality: 10.0,
            },
        ];
        let pool = build_pool(&raw);
        assert_eq!(pool[0].stress_norm, 10.0);
        assert_eq!(pool[1].stress_norm, 0.0);
        assert_eq!(pool[0].smart_sleep_meter, round1(10.0 / 3.0));
        assert_eq!(pool[1].smart_sleep_meter, round1(20.0 / 3.0));
    }

    #[test]
    fn synthetic_raw_respects_scales() {
        let mut rng = StdRng::seed_from_u64(5);
        for r in synthetic_raw(&mut rng, 500) {
            assert!((1.0..=5.0).contains(&r.mood));
            assert!((1.0..=5.0).contains(&r.stress));
            assert!((1.0..=10.0).contains(&r.sleep_quality));
        }
    }
}
