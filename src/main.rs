//! SnrSweep - SNR-Sweep Aggregation for Sensor-Control Trials
//!
//! A CLI tool that collects serialized trial records, derives per-trial
//! summary statistics, groups them by SNR condition, and writes an
//! aggregated report for downstream figure generation.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (missing data, missing field, parse/IO failure)

mod analysis;
mod cli;
mod collector;
mod config;
mod error;
mod loader;
mod metrics;
mod models;
mod report;
mod sweep;

use anyhow::{Context, Result};
use cli::Args;
use collector::Collector;
use config::Config;
use error::SweepError;
use models::Condition;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("SnrSweep v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the sweep
    match run_pipeline(args) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Sweep failed: {}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .snrsweep.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(".snrsweep.toml");

    if path.exists() {
        eprintln!("⚠️  .snrsweep.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .snrsweep.toml")?;

    println!("✅ Created .snrsweep.toml with default settings.");
    println!("   Edit it to customize histogram ranges, filter cutoff, and more.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete sweep workflow. Returns the exit code.
fn run_pipeline(args: Args) -> Result<i32> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let data_dir = args.data_dir().to_path_buf();
    let conditions = args.condition.conditions();

    // Handle --dry-run: list trial files and exit
    if args.dry_run {
        return handle_dry_run(&data_dir, &conditions);
    }

    println!("📂 Data directory: {}", data_dir.display());
    println!(
        "   Conditions: {}",
        conditions
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("   Length policy: {:?}", config.sweep.length_policy);

    println!("\n🔬 Evaluating trial metrics...");
    let report = sweep::run_sweep(&data_dir, &conditions, &config, !args.quiet)?;

    println!("\n📝 Generating report...");
    let out_dir = PathBuf::from(&config.general.out_dir);
    let written = report::write_report(&report, &out_dir, args.format)?;

    // Print summary
    println!("\n📊 Sweep Summary:");
    for condition in &report.conditions {
        println!(
            "   {}: {} trials across {} SNR conditions",
            condition.condition,
            condition.trials,
            condition.snr_conditions.len()
        );
    }
    println!("   Files processed: {}", report.metadata.files_processed);
    println!("   Duration: {:.1}s", report.metadata.duration_seconds);

    for path in &written {
        println!("\n✅ Report saved to: {}", path.display());
    }

    Ok(0)
}

/// Handle --dry-run: list what would be processed, exit.
fn handle_dry_run(data_dir: &Path, conditions: &[Condition]) -> Result<i32> {
    println!("\n🔍 Dry run: collecting trial files (no evaluation)...\n");

    let collector = Collector::new(data_dir.to_path_buf());
    let mut total = 0usize;

    for &condition in conditions {
        match collector.collect(condition) {
            Ok(files) => {
                println!("   {} ({} files):", condition, files.len());
                for file in &files {
                    match file.snr_tag {
                        Some(snr) => println!("     📄 {} (SNR {})", file.name, snr),
                        None => println!("     📄 {}", file.name),
                    }
                }
                total += files.len();
            }
            Err(SweepError::MissingData { .. }) => {
                println!("   {}: no matching trial files.", condition);
            }
            Err(e) => return Err(e.into()),
        }
    }

    println!("\n   Total: {} files", total);
    println!("\n✅ Dry run complete. Nothing was evaluated.");
    Ok(0)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .snrsweep.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
