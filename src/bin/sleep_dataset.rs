//! Synthetic sleep dataset tool.
//!
//! Usage:
//! ```bash
//! # 50 users x 30 days from a synthetic reference pool
//! cargo run --bin sleep-dataset -- generate --out synthetic_sleep_time_series_enhanced.csv
//!
//! # Reproducible run sampling from real readings (mood,stress,sleep_quality columns)
//! cargo run --bin sleep-dataset -- generate --seed 7 --reference readings.csv --out logs.csv
//!
//! # Attach next-day labels
//! cargo run --bin sleep-dataset -- label --input logs.csv --out synthetic_sleep_time_series_ai_ready.csv
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use smart_alarm_simulator::dataset::{
    add_labels, build_pool, generate_dataset, read_csv, reference, write_csv, DailyLog,
    GeneratorConfig,
};

/// Reference rows drawn when no `--reference` file is given.
const SYNTHETIC_POOL_SIZE: usize = 200;

#[derive(Parser)]
#[command(
    name = "sleep-dataset",
    about = "Synthetic sleep time-series generator",
    long_about = "Generate simulated daily sleep logs and derive next-day training labels"
)]
struct Cli {
    /// Random seed for reproducible output (optional)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate daily logs per simulated user
    Generate {
        /// Number of users
        #[arg(long, default_value = "50")]
        users: u32,

        /// Days per user
        #[arg(long, default_value = "30")]
        days: u32,

        /// CSV of raw readings (mood,stress,sleep_quality) to sample from
        #[arg(long)]
        reference: Option<PathBuf>,

        /// Output CSV path
        #[arg(long, default_value = "synthetic_sleep_time_series_enhanced.csv")]
        out: PathBuf,
    },
    /// Add next-day labels to a generated dataset
    Label {
        /// Input CSV produced by `generate`
        #[arg(long, default_value = "synthetic_sleep_time_series_enhanced.csv")]
        input: PathBuf,

        /// Output CSV path
        #[arg(long, default_value = "synthetic_sleep_time_series_ai_ready.csv")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    match cli.command {
        Command::Generate {
            users,
            days,
            reference: reference_path,
            out,
        } => {
            let raw = match &reference_path {
                Some(p) => reference::read_raw_csv(p)?,
                None => reference::synthetic_raw(&mut rng, SYNTHETIC_POOL_SIZE),
            };
            let pool = build_pool(&raw);
            info!(pool = pool.len(), "reference pool ready");

            let cfg = GeneratorConfig {
                users,
                days_per_user: days,
            };
            let logs = generate_dataset(&mut rng, &pool, cfg)?;
            write_csv(&out, &logs)?;
            info!(rows = logs.len(), out = %out.display(), "enhanced dataset saved");
        }
        Command::Label { input, out } => {
            let logs: Vec<DailyLog> = read_csv(&input)?;
            let labeled = add_labels(&mut rng, logs);
            write_csv(&out, &labeled)?;
            info!(rows = labeled.len(), out = %out.display(), "AI-ready dataset saved");
        }
    }
    Ok(())
}
