//! Per-trial metric evaluation.
//!
//! Turns one loaded [`Trial`] into the scalar and vector metrics the
//! aggregation stage groups by SNR: position-estimate error statistics,
//! fixed-range histograms, the relative-exploration ratio, entropy and
//! ergodicity reductions, and the stationary-time percentage.

pub mod entropy;
pub mod filter;
pub mod histogram;
pub mod stationary;
pub mod stats;

use crate::config::{Config, LengthPolicy};
use crate::error::SweepError;
use crate::models::{
    Belief, EntropyStats, ErgodicityStats, ErrorStats, Histogram, PerTrialMetrics, Trial,
};
use tracing::warn;

/// Posterior mean of one belief column against a linear position grid
/// spanning [0, 1] with as many points as the column has entries.
pub fn posterior_mean(column: &[f64]) -> f64 {
    let total: f64 = column.iter().sum();
    if total <= 0.0 || column.len() < 2 {
        return 0.0;
    }
    let step = 1.0 / (column.len() - 1) as f64;
    column
        .iter()
        .enumerate()
        .map(|(i, &p)| p * step * i as f64)
        .sum::<f64>()
        / total
}

/// Position estimate over the whole trial.
///
/// InfoMax records yield one estimate per timestep. Ergodic records yield
/// one estimate per (time, sample) column, concatenated in time order.
pub fn position_estimate(belief: &Belief) -> Vec<f64> {
    match belief {
        Belief::InfoMax(columns) => columns.iter().map(|c| posterior_mean(c)).collect(),
        Belief::Ergodic(slices) => slices
            .iter()
            .flat_map(|slice| slice.iter())
            .map(|c| posterior_mean(c))
            .collect(),
    }
}

/// Evaluates per-trial metrics under one configuration.
pub struct Evaluator<'a> {
    config: &'a Config,
}

impl<'a> Evaluator<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Compute all metrics for one trial.
    pub fn evaluate(&self, trial: &Trial) -> Result<PerTrialMetrics, SweepError> {
        let estimate = position_estimate(&trial.belief);
        let (error, error_hist) = self.error_stats(&estimate, &trial.target_traj)?;

        let hist = &self.config.histogram;
        let sensor_hist = histogram::histogram(
            &trial.sensor_traj,
            hist.position_min,
            hist.position_max,
            hist.bins,
        );
        let target_hist = histogram::histogram(
            &trial.target_traj,
            hist.position_min,
            hist.position_max,
            hist.bins,
        );

        Ok(PerTrialMetrics {
            error,
            error_hist,
            sensor_hist,
            target_hist,
            relative_exploration: self.relative_exploration(trial),
            entropy: self.entropy_stats(trial),
            percent_stationary: stationary::percent_stationary(
                &trial.sensor_traj,
                &self.config.stationary,
            ),
            ergodicity: self.ergodicity_stats(trial),
        })
    }

    /// Absolute-error statistics and the signed-error histogram, under
    /// the configured length policy.
    fn error_stats(
        &self,
        estimate: &[f64],
        target: &[f64],
    ) -> Result<(ErrorStats, Histogram), SweepError> {
        let common = if estimate.len() == target.len() {
            estimate.len()
        } else {
            match self.config.sweep.length_policy {
                LengthPolicy::Strict => {
                    return Err(SweepError::LengthMismatch {
                        estimate: estimate.len(),
                        target: target.len(),
                    });
                }
                LengthPolicy::Truncate => {
                    let common = estimate.len().min(target.len());
                    warn!(
                        "position estimate has {} samples, target has {}; truncating to {}",
                        estimate.len(),
                        target.len(),
                        common
                    );
                    common
                }
            }
        };

        let signed: Vec<f64> = estimate[..common]
            .iter()
            .zip(&target[..common])
            .map(|(e, t)| e - t)
            .collect();
        let absolute: Vec<f64> = signed.iter().map(|d| d.abs()).collect();

        let hist = &self.config.histogram;
        let error_hist =
            histogram::histogram(&signed, hist.error_min, hist.error_max, hist.bins);

        Ok((
            ErrorStats {
                rms: stats::rms(&absolute),
                mean: stats::mean(&absolute),
                var: stats::variance(&absolute),
            },
            error_hist,
        ))
    }

    /// Filtered-sensor path length over target path length.
    fn relative_exploration(&self, trial: &Trial) -> f64 {
        let filtered = filter::low_pass(
            &trial.sensor_traj,
            self.config.filter.cutoff_hz,
            trial.dt,
        );
        let target_path = stats::path_length(&trial.target_traj);
        if target_path == 0.0 {
            warn!("target trajectory has zero path length; relative exploration set to 0");
            return 0.0;
        }
        stats::path_length(&filtered) / target_path
    }

    /// Entropy reduction over the tail of the recorded (or derived) list.
    ///
    /// The recorded `enpList` wins when present. Ergodic records without
    /// one get the list derived from the belief columns; InfoMax records
    /// always carry it, so an absence there reduces an empty list.
    fn entropy_stats(&self, trial: &Trial) -> EntropyStats {
        let list = match &trial.entropy_list {
            Some(recorded) => recorded.clone(),
            None => match &trial.belief {
                Belief::Ergodic(slices) => entropy::derive_from_belief(slices),
                Belief::InfoMax(_) => Vec::new(),
            },
        };

        // Ergodic runs warm up on the first entry, InfoMax runs park on
        // the last; either way the off-end sample is excluded.
        let tail: &[f64] = if list.is_empty() {
            &[]
        } else if trial.belief.is_ergodic() {
            &list[1..]
        } else {
            &list[..list.len() - 1]
        };

        EntropyStats {
            mean: stats::mean(tail),
            rms: stats::rms(tail),
            var: stats::variance(tail),
        }
    }

    /// Mean and variance of the ergodicity metric over its interior
    /// elements, when requested and recorded.
    fn ergodicity_stats(&self, trial: &Trial) -> Option<ErgodicityStats> {
        if !self.config.sweep.compute_ergodicity {
            return None;
        }
        let list = trial.ergodicity_list.as_ref()?;
        let interior: &[f64] = if list.len() > 2 {
            &list[1..list.len() - 1]
        } else {
            &[]
        };
        Some(ErgodicityStats {
            mean: stats::mean(interior),
            var: stats::variance(interior),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Belief vector with all mass at one grid index.
    fn point_mass(len: usize, index: usize) -> Vec<f64> {
        let mut column = vec![0.0; len];
        column[index] = 1.0;
        column
    }

    fn infomax_trial(timesteps: usize) -> Trial {
        Trial {
            snr: 10.0,
            sensor_traj: vec![0.5; timesteps],
            target_traj: vec![0.5; timesteps],
            dt: 0.02,
            belief: Belief::InfoMax(vec![point_mass(101, 50); timesteps]),
            entropy_list: None,
            ergodicity_list: None,
        }
    }

    #[test]
    fn test_posterior_mean_of_point_mass_at_grid_center() {
        assert!((posterior_mean(&point_mass(101, 50)) - 0.5).abs() < 1e-12);
        assert_eq!(posterior_mean(&point_mass(101, 0)), 0.0);
        assert!((posterior_mean(&point_mass(101, 100)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_posterior_mean_normalizes_the_column() {
        // Scaled column, same distribution
        let scaled: Vec<f64> = point_mass(101, 50).iter().map(|p| p * 7.0).collect();
        assert!((posterior_mean(&scaled) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_infomax_estimate_has_one_entry_per_timestep() {
        let trial = infomax_trial(5);
        let estimate = position_estimate(&trial.belief);
        assert_eq!(estimate.len(), 5);
        for e in estimate {
            assert!((e - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_ergodic_estimate_concatenates_samples_in_time_order() {
        let belief = Belief::Ergodic(vec![
            vec![point_mass(101, 0), point_mass(101, 25)],
            vec![point_mass(101, 50), point_mass(101, 100)],
        ]);
        let estimate = position_estimate(&belief);
        assert_eq!(estimate.len(), 4);
        assert_eq!(estimate[0], 0.0);
        assert!((estimate[1] - 0.25).abs() < 1e-12);
        assert!((estimate[2] - 0.5).abs() < 1e-12);
        assert!((estimate[3] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_point_mass_estimate_against_constant_target_has_zero_error() {
        let config = Config::default();
        let evaluator = Evaluator::new(&config);
        let metrics = evaluator.evaluate(&infomax_trial(10)).unwrap();

        assert!(metrics.error.rms.abs() < 1e-12);
        assert!(metrics.error.mean.abs() < 1e-12);
        assert!(metrics.error.var.abs() < 1e-12);
        // Every signed error lands in a middle bin, none dropped
        assert_eq!(metrics.error_hist.total(), 10.0);
    }

    #[test]
    fn test_histogram_edge_count_and_bound() {
        let config = Config::default();
        let evaluator = Evaluator::new(&config);
        let metrics = evaluator.evaluate(&infomax_trial(10)).unwrap();

        assert_eq!(metrics.sensor_hist.bins(), 20);
        assert_eq!(metrics.sensor_hist.edges.len(), 21);
        assert!(metrics.sensor_hist.total() <= 10.0);
        assert!(metrics.target_hist.total() <= 10.0);
    }

    #[test]
    fn test_strict_policy_rejects_mismatched_lengths() {
        let mut config = Config::default();
        config.sweep.length_policy = LengthPolicy::Strict;
        let evaluator = Evaluator::new(&config);

        let mut trial = infomax_trial(10);
        // Ergodic-style over-recording: more belief columns than target samples
        trial.belief = Belief::InfoMax(vec![point_mass(101, 50); 12]);

        let err = evaluator.evaluate(&trial).unwrap_err();
        assert!(matches!(err, SweepError::LengthMismatch { .. }));
    }

    #[test]
    fn test_truncate_policy_uses_common_prefix() {
        let config = Config::default();
        let evaluator = Evaluator::new(&config);

        let mut trial = infomax_trial(10);
        trial.belief = Belief::InfoMax(vec![point_mass(101, 50); 12]);

        let metrics = evaluator.evaluate(&trial).unwrap();
        assert!(metrics.error.rms.abs() < 1e-12);
        assert_eq!(metrics.error_hist.total(), 10.0);
    }

    #[test]
    fn test_relative_exploration_is_one_for_matching_trajectories() {
        let config = Config::default();
        let evaluator = Evaluator::new(&config);

        // Make the target exactly the filtered sensor trajectory
        let sensor: Vec<f64> = (0..50).map(|i| 0.5 + 0.2 * (i as f64 * 0.3).sin()).collect();
        let mut trial = infomax_trial(50);
        trial.target_traj = filter::low_pass(&sensor, config.filter.cutoff_hz, trial.dt);
        trial.sensor_traj = sensor;

        let ratio = evaluator.relative_exploration(&trial);
        assert!((ratio - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_recorded_entropy_list_wins_over_derivation() {
        let config = Config::default();
        let evaluator = Evaluator::new(&config);

        let mut trial = infomax_trial(4);
        // InfoMax reduction drops the last element
        trial.entropy_list = Some(vec![1.0, 2.0, 3.0, 99.0]);

        let stats = evaluator.entropy_stats(&trial);
        assert!((stats.mean - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_derived_entropy_for_ergodic_trial_without_list() {
        let config = Config::default();
        let evaluator = Evaluator::new(&config);

        let uniform = vec![0.25; 4];
        let mut trial = infomax_trial(3);
        trial.belief = Belief::Ergodic(vec![
            vec![uniform.clone(), uniform.clone()],
            vec![uniform.clone(), uniform.clone()],
        ]);

        // Derivation skips the first column (3 remain), the Ergodic
        // reduction drops the first derived element (2 remain), and every
        // remaining entry is ln 4.
        let stats = evaluator.entropy_stats(&trial);
        assert!((stats.mean - 4.0f64.ln()).abs() < 1e-12);
        assert!(stats.var.abs() < 1e-12);
    }

    #[test]
    fn test_ergodicity_interior_reduction() {
        let mut config = Config::default();
        config.sweep.compute_ergodicity = true;
        let evaluator = Evaluator::new(&config);

        let mut trial = infomax_trial(3);
        trial.ergodicity_list = Some(vec![99.0, 1.0, 2.0, 3.0, 99.0]);

        let erg = evaluator.ergodicity_stats(&trial).unwrap();
        assert!((erg.mean - 2.0).abs() < 1e-12);
        assert!((erg.var - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ergodicity_skipped_unless_requested() {
        let config = Config::default();
        let evaluator = Evaluator::new(&config);

        let mut trial = infomax_trial(3);
        trial.ergodicity_list = Some(vec![1.0, 2.0, 3.0]);

        assert!(evaluator.ergodicity_stats(&trial).is_none());
    }
}
