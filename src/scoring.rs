//! Linear scoring with a bounded random perturbation.
//!
//! score = intercept + Σ feature × weight + noise, clamped to [1, 10] and
//! rounded to one decimal place.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

use crate::features::FeatureVector;
use crate::weights::ScoreWeights;

pub const SCORE_MIN: f64 = 1.0;
pub const SCORE_MAX: f64 = 10.0;

/// Default half-width of the uniform perturbation.
pub const DEFAULT_NOISE_AMPLITUDE: f64 = 0.5;

/// Source of the residual noise added to every score.
pub trait NoiseSource: Send + Sync {
    fn draw(&self) -> f64;
}

/// Uniform noise in `[-amplitude, +amplitude]`.
#[derive(Debug)]
pub struct UniformNoise {
    amplitude: f64,
    rng: Mutex<StdRng>,
}

impl UniformNoise {
    /// Seeded from OS entropy; draws are not reproducible.
    pub fn from_entropy(amplitude: f64) -> Self {
        Self::with_rng(amplitude, StdRng::from_os_rng())
    }

    pub fn seeded(amplitude: f64, seed: u64) -> Self {
        Self::with_rng(amplitude, StdRng::seed_from_u64(seed))
    }

    fn with_rng(amplitude: f64, rng: StdRng) -> Self {
        Self {
            amplitude: amplitude.abs(),
            rng: Mutex::new(rng),
        }
    }
}

impl NoiseSource for UniformNoise {
    fn draw(&self) -> f64 {
        let a = self.amplitude;
        let mut rng = self.rng.lock().expect("noise rng mutex poisoned");
        rng.random_range(-a..=a)
    }
}

/// Always returns the same offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedNoise(pub f64);

impl NoiseSource for FixedNoise {
    fn draw(&self) -> f64 {
        self.0
    }
}

/// Intercept plus weighted sum, before noise and clamping.
pub fn linear_score(features: &FeatureVector, weights: &ScoreWeights) -> f64 {
    weights
        .iter()
        .filter_map(|(name, w)| features.get(name).map(|v| v * w))
        .fold(weights.intercept, |acc, x| acc + x)
}

/// Clamp into the score range and round to one decimal.
pub fn finalize_score(raw: f64) -> f64 {
    round_tenths_half_even(raw.clamp(SCORE_MIN, SCORE_MAX))
}

/// Round to one decimal using the exact binary value of `x`, ties to even.
///
/// `7.25` is exact and rounds to `7.2`; `0.15` is stored just below the tie
/// and rounds to `0.1`.
pub fn round_tenths_half_even(x: f64) -> f64 {
    let scaled = x * 10.0;
    // exact error of the multiply
    let residual = x.mul_add(10.0, -scaled);
    let rounded = if (scaled - scaled.trunc()).abs() != 0.5 {
        scaled.round()
    } else if residual < 0.0 {
        scaled - 0.5
    } else if residual > 0.0 {
        scaled + 0.5
    } else {
        scaled.round_ties_even()
    };
    rounded / 10.0
}

/// Full scoring step used by the simulator.
pub fn predict_score(
    features: &FeatureVector,
    weights: &ScoreWeights,
    noise: &dyn NoiseSource,
) -> f64 {
    finalize_score(linear_score(features, weights) + noise.draw())
}
