//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.snrsweep.toml` files. Every metric tunable lives here as an explicit
//! parameter with the production value as its default; there is no
//! process-wide mutable state.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Policy for position-estimate/target length disagreement.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LengthPolicy {
    /// Truncate both series to the common prefix and log a warning.
    #[default]
    Truncate,
    /// Fail the run on any length disagreement.
    Strict,
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Sweep behavior settings.
    #[serde(default)]
    pub sweep: SweepConfig,

    /// Histogram settings.
    #[serde(default)]
    pub histogram: HistogramConfig,

    /// Low-pass filter settings.
    #[serde(default)]
    pub filter: FilterConfig,

    /// Stationary-time estimator settings.
    #[serde(default)]
    pub stationary: StationaryConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output directory for report files.
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            verbose: false,
        }
    }
}

fn default_out_dir() -> String {
    "sweep_report".to_string()
}

/// Sweep behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Policy for mismatched estimate/target lengths.
    #[serde(default)]
    pub length_policy: LengthPolicy,

    /// Reduce the per-trial ergodicity list when the record carries one.
    #[serde(default)]
    pub compute_ergodicity: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            length_policy: LengthPolicy::default(),
            compute_ergodicity: false,
        }
    }
}

/// Histogram settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramConfig {
    /// Number of bins for every histogram.
    #[serde(default = "default_bins")]
    pub bins: usize,

    /// Signed estimate-error range.
    #[serde(default = "default_error_min")]
    pub error_min: f64,
    #[serde(default = "default_error_max")]
    pub error_max: f64,

    /// Sensor/target position range.
    #[serde(default = "default_position_min")]
    pub position_min: f64,
    #[serde(default = "default_position_max")]
    pub position_max: f64,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            bins: default_bins(),
            error_min: default_error_min(),
            error_max: default_error_max(),
            position_min: default_position_min(),
            position_max: default_position_max(),
        }
    }
}

fn default_bins() -> usize {
    20
}

fn default_error_min() -> f64 {
    -0.4
}

fn default_error_max() -> f64 {
    0.4
}

fn default_position_min() -> f64 {
    0.2
}

fn default_position_max() -> f64 {
    0.8
}

/// Low-pass filter settings for the relative-exploration metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Cutoff frequency in Hz, relative to the trial's sampling rate.
    #[serde(default = "default_cutoff_hz")]
    pub cutoff_hz: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            cutoff_hz: default_cutoff_hz(),
        }
    }
}

fn default_cutoff_hz() -> f64 {
    2.0
}

/// Stationary-time estimator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationaryConfig {
    /// Moving-average smoothing window, in samples.
    #[serde(default = "default_window")]
    pub window: usize,

    /// Consecutive smoothed-sample differences below this count as
    /// stationary.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Runs spanning this many samples or fewer are discarded as noise.
    #[serde(default = "default_min_run")]
    pub min_run: usize,
}

impl Default for StationaryConfig {
    fn default() -> Self {
        Self {
            window: default_window(),
            tolerance: default_tolerance(),
            min_run: default_min_run(),
        }
    }
}

fn default_window() -> usize {
    6
}

fn default_tolerance() -> f64 {
    1e-12
}

fn default_min_run() -> usize {
    2
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".snrsweep.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref out_dir) = args.out_dir {
            self.general.out_dir = out_dir.to_string_lossy().to_string();
        }

        // Flags only override when set; the config file keeps its say
        // otherwise.
        if args.compute_ergodicity {
            self.sweep.compute_ergodicity = true;
        }
        if let Some(policy) = args.length_policy {
            self.sweep.length_policy = policy;
        }
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.histogram.bins, 20);
        assert_eq!(config.histogram.error_min, -0.4);
        assert_eq!(config.filter.cutoff_hz, 2.0);
        assert_eq!(config.stationary.window, 6);
        assert_eq!(config.stationary.min_run, 2);
        assert_eq!(config.sweep.length_policy, LengthPolicy::Truncate);
        assert!(!config.sweep.compute_ergodicity);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
out_dir = "figures"
verbose = true

[sweep]
length_policy = "strict"
compute_ergodicity = true

[histogram]
bins = 40

[stationary]
window = 10
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.out_dir, "figures");
        assert!(config.general.verbose);
        assert_eq!(config.sweep.length_policy, LengthPolicy::Strict);
        assert!(config.sweep.compute_ergodicity);
        assert_eq!(config.histogram.bins, 40);
        assert_eq!(config.stationary.window, 10);
        // Untouched sections keep their defaults
        assert_eq!(config.filter.cutoff_hz, 2.0);
        assert_eq!(config.histogram.error_max, 0.4);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[histogram]"));
        assert!(toml_str.contains("[stationary]"));
    }
}
