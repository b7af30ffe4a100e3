// src/dataset/mod.rs
//! Synthetic sleep time-series: reference pool → daily logs → next-day labels.
//!
//! Batch only; nothing here is used by the HTTP service.

pub mod generate;
pub mod labels;
pub mod reference;

use anyhow::{Context, Result};
use rand::Rng;
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;

pub use generate::{generate_dataset, DailyLog, GeneratorConfig};
pub use labels::{add_labels, LabeledLog};
pub use reference::{build_pool, normalize, RawReading, ReferenceSample};

/// Round to one decimal place.
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Sample from a normal distribution using the Box-Muller transform.
pub fn sample_normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, sd: f64) -> f64 {
    let u1: f64 = rng.random::<f64>().max(1e-12);
    let u2: f64 = rng.random();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + sd * z
}

pub fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("opening CSV {}", path.display()))?;
    let mut rows = Vec::new();
    for (i, rec) in rdr.deserialize::<T>().enumerate() {
        rows.push(rec.with_context(|| format!("{}: bad row {}", path.display(), i + 1))?);
    }
    Ok(rows)
}

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating CSV {}", path.display()))?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()
        .with_context(|| format!("flushing CSV {}", path.display()))?;
    Ok(())
}
