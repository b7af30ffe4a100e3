// src/config/mod.rs
//! Startup configuration for the alarm service.

pub mod app;

pub use app::{
    AppConfig, DEFAULT_CONFIG_PATH, ENV_CONFIG_PATH, ENV_METRICS, ENV_NOISE_AMPLITUDE, ENV_SEED,
};
