//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::config::LengthPolicy;
use crate::models::Condition;
use clap::Parser;
use std::path::{Path, PathBuf};

/// SnrSweep - SNR-sweep aggregation for sensor-control trial data
///
/// Collects serialized trial records from a data directory, derives
/// per-trial summary statistics, groups them by SNR condition, and writes
/// an aggregated report. Offline batch analysis; a failure in any trial
/// aborts the whole run.
///
/// Examples:
///   snrsweep ./SimData
///   snrsweep ./SimData -o ./figures --format json
///   snrsweep ./SimData --condition eih --compute-ergodicity
///   snrsweep ./SimData --dry-run
///   snrsweep --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Directory holding the trial result records
    ///
    /// Filenames are expected to carry an experimental-condition tag
    /// (EIH or Infotaxis) and an SNR-<value> segment.
    /// Not required when using --init-config.
    #[arg(value_name = "DATA_DIR", required_unless_present = "init_config")]
    pub data_dir: Option<PathBuf>,

    /// Output directory for the report files
    ///
    /// Defaults to ./sweep_report (or the config file's setting).
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Which experimental condition(s) to process
    #[arg(long, default_value = "all", value_name = "COND")]
    pub condition: ConditionFilter,

    /// Report format (json, markdown, both)
    #[arg(long, default_value = "both", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Also reduce the per-trial ergodicity list (Ergodic-variant trials)
    #[arg(long)]
    pub compute_ergodicity: bool,

    /// Policy for mismatched estimate/target lengths
    ///
    /// truncate: cut both series to the common prefix and log a warning.
    /// strict: fail the run on any disagreement.
    #[arg(long, value_name = "POLICY")]
    pub length_policy: Option<LengthPolicy>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .snrsweep.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: collect and list trial files without evaluating them
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .snrsweep.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Report format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Markdown summary tables
    Markdown,
    /// Both documents (default)
    #[default]
    Both,
}

/// Experimental condition selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ConditionFilter {
    /// Ergodic-information-harvesting trials only
    Eih,
    /// Infotaxis trials only
    Infotaxis,
    /// Both conditions (default)
    #[default]
    All,
}

impl ConditionFilter {
    /// The conditions selected by this filter, in report order.
    pub fn conditions(&self) -> Vec<Condition> {
        match self {
            ConditionFilter::Eih => vec![Condition::Eih],
            ConditionFilter::Infotaxis => vec![Condition::Infotaxis],
            ConditionFilter::All => Condition::all().to_vec(),
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the data directory, panicking if not set (should be validated first).
    pub fn data_dir(&self) -> &Path {
        self.data_dir
            .as_deref()
            .unwrap_or_else(|| Path::new(""))
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        let Some(ref data_dir) = self.data_dir else {
            return Err("A data directory is required".to_string());
        };

        if !data_dir.exists() {
            return Err(format!(
                "Data directory does not exist: {}",
                data_dir.display()
            ));
        }
        if !data_dir.is_dir() {
            return Err(format!(
                "Data path is not a directory: {}",
                data_dir.display()
            ));
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            data_dir: Some(PathBuf::from(".")),
            out_dir: None,
            condition: ConditionFilter::All,
            format: OutputFormat::Both,
            compute_ergodicity: false,
            length_policy: None,
            config: None,
            verbose: false,
            quiet: false,
            dry_run: false,
            init_config: false,
        }
    }

    #[test]
    fn test_validation_missing_dir() {
        let mut args = make_args();
        args.data_dir = Some(PathBuf::from("/no/such/dir/anywhere"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_condition_filter_expansion() {
        assert_eq!(ConditionFilter::Eih.conditions(), vec![Condition::Eih]);
        assert_eq!(
            ConditionFilter::All.conditions(),
            vec![Condition::Eih, Condition::Infotaxis]
        );
    }
}
