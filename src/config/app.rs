// src/config/app.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::history::{InMemoryHistory, DEFAULT_USER_ID};
use crate::scoring::{NoiseSource, UniformNoise, DEFAULT_NOISE_AMPLITUDE};
use crate::simulator::AlarmSimulator;
use crate::weights::{load_weights_file, ScoreWeights};

// --- env defaults & names ---
pub const DEFAULT_CONFIG_PATH: &str = "config/alarm.toml";

pub const ENV_CONFIG_PATH: &str = "ALARM_CONFIG_PATH";
pub const ENV_SEED: &str = "ALARM_SEED";
pub const ENV_NOISE_AMPLITUDE: &str = "ALARM_NOISE_AMPLITUDE";
pub const ENV_METRICS: &str = "ALARM_METRICS";

fn default_user() -> String {
    DEFAULT_USER_ID.to_string()
}
fn default_noise_amplitude() -> f64 {
    DEFAULT_NOISE_AMPLITUDE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// History used for unknown user ids.
    #[serde(default = "default_user")]
    pub default_user: String,
    /// Optional JSON weight table; built-in weights when absent.
    #[serde(default)]
    pub weights_path: Option<PathBuf>,
    /// Optional JSON history table; built-in `user_1` history when absent.
    #[serde(default)]
    pub history_path: Option<PathBuf>,
    /// Half-width of the uniform score perturbation.
    #[serde(default = "default_noise_amplitude")]
    pub noise_amplitude: f64,
    /// Fixed RNG seed for reproducible scores. Unseeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Mount `/metrics` (Prometheus exposition).
    #[serde(default)]
    pub metrics_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_user: default_user(),
            weights_path: None,
            history_path: None,
            noise_amplitude: default_noise_amplitude(),
            seed: None,
            metrics_enabled: false,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let mut cfg: AppConfig = toml::from_str(s)?;
        cfg.sanitize();
        Ok(cfg)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let mut cfg = Self::from_toml_str(&data)
            .with_context(|| format!("parsing config at {}", path.display()))?;

        // Relative table paths resolve against the config file's directory.
        if let Some(dir) = path.parent() {
            cfg.weights_path = cfg.weights_path.map(|p| resolve(dir, p));
            cfg.history_path = cfg.history_path.map(|p| resolve(dir, p));
        }
        Ok(cfg)
    }

    /// Load using env var + fallbacks, then apply env overrides:
    /// 1) $ALARM_CONFIG_PATH (must exist)
    /// 2) config/alarm.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from_file(&pb)?
        } else {
            let p = PathBuf::from(DEFAULT_CONFIG_PATH);
            if p.exists() {
                Self::load_from_file(&p)?
            } else {
                Self::default()
            }
        };
        cfg.apply_env()?;
        Ok(cfg)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(raw) = std::env::var(ENV_SEED) {
            let seed = raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{ENV_SEED} must be an unsigned integer"))?;
            self.seed = Some(seed);
        }
        if let Ok(raw) = std::env::var(ENV_NOISE_AMPLITUDE) {
            self.noise_amplitude = raw
                .trim()
                .parse::<f64>()
                .with_context(|| format!("{ENV_NOISE_AMPLITUDE} must be a number"))?;
        }
        if let Ok(raw) = std::env::var(ENV_METRICS) {
            self.metrics_enabled = matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        self.sanitize();
        Ok(())
    }

    fn sanitize(&mut self) {
        if !self.noise_amplitude.is_finite() || self.noise_amplitude < 0.0 {
            self.noise_amplitude = default_noise_amplitude();
        }
        if self.default_user.trim().is_empty() {
            self.default_user = default_user();
        }
    }

    pub fn load_weights(&self) -> Result<ScoreWeights> {
        match &self.weights_path {
            Some(p) => load_weights_file(p),
            None => Ok(ScoreWeights::default()),
        }
    }

    pub fn load_history(&self) -> Result<InMemoryHistory> {
        match &self.history_path {
            Some(p) => InMemoryHistory::load_from_file(p, &self.default_user),
            None => Ok(InMemoryHistory::mock()),
        }
    }

    pub fn noise_source(&self) -> Arc<dyn NoiseSource> {
        match self.seed {
            Some(seed) => Arc::new(UniformNoise::seeded(self.noise_amplitude, seed)),
            None => Arc::new(UniformNoise::from_entropy(self.noise_amplitude)),
        }
    }

    /// Assemble the simulator from the configured tables.
    pub fn build_simulator(&self) -> Result<AlarmSimulator> {
        let weights = self.load_weights()?;
        let history = self.load_history()?;
        tracing::info!(
            features = weights.len(),
            users = history.len(),
            default_user = %history.default_user(),
            seeded = self.seed.is_some(),
            "alarm simulator configured"
        );
        Ok(AlarmSimulator::new(
            Arc::new(weights),
            Arc::new(history),
            self.noise_source(),
        ))
    }
}

fn resolve(base: &Path, p: PathBuf) -> PathBuf {
    if p.is_absolute() {
        p
    } else {
        base.join(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn clear_env() {
        for k in [ENV_CONFIG_PATH, ENV_SEED, ENV_NOISE_AMPLITUDE, ENV_METRICS] {
            env::remove_var(k);
        }
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let cfg = AppConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn negative_amplitude_is_reset() {
        let cfg = AppConfig::from_toml_str("noise_amplitude = -3.0").unwrap();
        assert_eq!(cfg.noise_amplitude, DEFAULT_NOISE_AMPLITUDE);
    }

    #[test]
    fn relative_paths_resolve_next_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alarm.toml");
        fs::write(&path, "weights_path = \"weights.json\"\nseed = 9\n").unwrap();

        let cfg = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(cfg.weights_path, Some(dir.path().join("weights.json")));
        assert_eq!(cfg.seed, Some(9));
    }

    #[serial_test::serial]
    #[test]
    fn env_path_then_overrides() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alarm.toml");
        fs::write(&path, "metrics_enabled = false\nnoise_amplitude = 0.25\n").unwrap();

        env::set_var(ENV_CONFIG_PATH, path.display().to_string());
        env::set_var(ENV_SEED, "123");
        env::set_var(ENV_METRICS, "1");
        let cfg = AppConfig::load_default().unwrap();
        assert_eq!(cfg.seed, Some(123));
        assert!(cfg.metrics_enabled);
        assert_eq!(cfg.noise_amplitude, 0.25);

        env::set_var(ENV_CONFIG_PATH, dir.path().join("missing.toml").display().to_string());
        assert!(AppConfig::load_default().is_err());
        clear_env();
    }

    #[serial_test::serial]
    #[test]
    fn bad_seed_env_is_an_error() {
        clear_env();
        env::set_var(ENV_SEED, "not-a-number");
        assert!(AppConfig::load_default().is_err());
        clear_env();
    }

    #[test]
    fn builds_simulator_from_defaults() {
        let cfg = AppConfig {
            seed: Some(1),
            ..AppConfig::default()
        };
        let sim = cfg.build_simulator().unwrap();
        assert_eq!(sim.weights(), &ScoreWeights::default());
    }
}
