//! Data models for the sweep pipeline.
//!
//! This module contains the core data structures used throughout the
//! application for representing trials, per-trial metrics, SNR-condition
//! aggregates, and the final report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Experimental condition a trial belongs to.
///
/// Trials are split by a tag embedded in the result filename. The tag also
/// determines which belief variant the record is expected to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    /// Ergodic-information-harvesting runs (`EIH` filename tag).
    Eih,
    /// Infotaxis runs (`Infotaxis` filename tag).
    Infotaxis,
}

impl Condition {
    /// The filename tag identifying this condition.
    pub fn tag(&self) -> &'static str {
        match self {
            Condition::Eih => "EIH",
            Condition::Infotaxis => "Infotaxis",
        }
    }

    /// All conditions, in report order.
    pub fn all() -> [Condition; 2] {
        [Condition::Eih, Condition::Infotaxis]
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Eih => write!(f, "EIH"),
            Condition::Infotaxis => write!(f, "Infotaxis"),
        }
    }
}

/// Belief distribution recorded by the simulation.
///
/// The nesting depth of the `pB` field decides the variant: the InfoMax
/// family records one belief vector per timestep, the Ergodic family
/// records a collection of belief vectors (one per optimization sample)
/// per timestep.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Belief {
    /// `pB[t][s]` is the belief vector of sample `s` at timestep `t`.
    Ergodic(Vec<Vec<Vec<f64>>>),
    /// `pB[t]` is the belief vector at timestep `t`.
    InfoMax(Vec<Vec<f64>>),
}

impl Belief {
    /// Returns true for the Ergodic (multi-sample) variant.
    pub fn is_ergodic(&self) -> bool {
        matches!(self, Belief::Ergodic(_))
    }

    /// Number of recorded timesteps.
    pub fn timesteps(&self) -> usize {
        match self {
            Belief::Ergodic(b) => b.len(),
            Belief::InfoMax(b) => b.len(),
        }
    }
}

/// One validated simulation trial.
#[derive(Debug, Clone)]
pub struct Trial {
    /// SNR condition label the trial was run at.
    pub snr: f64,
    /// Sensor position over time.
    pub sensor_traj: Vec<f64>,
    /// Target position over time, same length as `sensor_traj`.
    pub target_traj: Vec<f64>,
    /// Sampling interval in seconds.
    pub dt: f64,
    /// Recorded belief distribution.
    pub belief: Belief,
    /// Per-step entropy, when the simulation recorded it.
    pub entropy_list: Option<Vec<f64>>,
    /// Per-step ergodicity metric (Ergodic variant only).
    pub ergodicity_list: Option<Vec<f64>>,
}

/// Fixed-range histogram: `counts.len()` bins, `counts.len() + 1` edges.
///
/// Counts are stored as floats so that across-trial means stay exact
/// elementwise averages of the raw count vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub counts: Vec<f64>,
    pub edges: Vec<f64>,
}

impl Histogram {
    /// Total number of counted samples.
    pub fn total(&self) -> f64 {
        self.counts.iter().sum()
    }

    /// Number of bins.
    pub fn bins(&self) -> usize {
        self.counts.len()
    }
}

/// Position-estimate error statistics for one trial.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ErrorStats {
    pub rms: f64,
    pub mean: f64,
    pub var: f64,
}

/// Belief-entropy statistics for one trial.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EntropyStats {
    pub mean: f64,
    pub rms: f64,
    pub var: f64,
}

/// Ergodicity-metric statistics for one trial (Ergodic variant only).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ErgodicityStats {
    pub mean: f64,
    pub var: f64,
}

/// Metrics derived from a single trial. Immutable once computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerTrialMetrics {
    /// Statistics of |position estimate - target|.
    pub error: ErrorStats,
    /// Histogram of the signed estimate error.
    pub error_hist: Histogram,
    /// Histogram of the sensor position.
    pub sensor_hist: Histogram,
    /// Histogram of the target position.
    pub target_hist: Histogram,
    /// Cumulative filtered-sensor path length over cumulative target
    /// path length.
    pub relative_exploration: f64,
    /// Belief-entropy statistics over the reduction tail.
    pub entropy: EntropyStats,
    /// Percentage of the trial the sensor spent stationary, in [0, 100].
    pub percent_stationary: f64,
    /// Present only when ergodicity reduction was requested and the
    /// record carried an ergodicity list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ergodicity: Option<ErgodicityStats>,
}

/// All trials sharing one SNR value, with scalar metrics kept verbatim as
/// per-trial arrays and histograms averaged across the bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnrCondition {
    /// The shared SNR value.
    pub snr: f64,
    /// Number of trials in the bucket.
    pub trials: usize,
    pub error_rms: Vec<f64>,
    pub error_mean: Vec<f64>,
    pub error_var: Vec<f64>,
    pub relative_exploration: Vec<f64>,
    pub entropy_mean: Vec<f64>,
    pub entropy_rms: Vec<f64>,
    pub entropy_var: Vec<f64>,
    pub percent_stationary: Vec<f64>,
    /// Collected only from trials that carried ergodicity statistics.
    pub ergodicity_mean: Vec<f64>,
    pub ergodicity_var: Vec<f64>,
    /// Elementwise mean of the bucket's histogram counts when the bucket
    /// holds more than one trial, the single trial's histogram otherwise.
    pub error_hist: Histogram,
    pub sensor_hist: Histogram,
    pub target_hist: Histogram,
}

/// Aggregated results for one experimental condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionSummary {
    pub condition: Condition,
    /// Trials processed under this condition.
    pub trials: usize,
    /// One entry per distinct SNR value, ordered by value.
    pub snr_conditions: Vec<SnrCondition>,
}

/// Metadata about the sweep run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Directory the trial records were read from.
    pub data_dir: PathBuf,
    /// Date and time of the run.
    pub generated_at: DateTime<Utc>,
    /// Total trial files processed.
    pub files_processed: usize,
    /// Duration of the run in seconds.
    pub duration_seconds: f64,
}

/// The complete sweep report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    pub metadata: ReportMetadata,
    pub conditions: Vec<ConditionSummary>,
}
