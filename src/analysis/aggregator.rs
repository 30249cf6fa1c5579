//! SNR-condition aggregation.
//!
//! Groups per-trial metrics by the trial's SNR value. Scalar metrics are
//! collected verbatim into per-trial arrays (the report keeps every
//! repeat visible); histograms are averaged across the bucket.

use crate::models::{Histogram, PerTrialMetrics, SnrCondition};
use std::cmp::Ordering;

/// Group `(snr, metrics)` pairs into one [`SnrCondition`] per distinct
/// SNR value, in stable order by value.
pub fn aggregate_by_snr(trials: &[(f64, PerTrialMetrics)]) -> Vec<SnrCondition> {
    let mut buckets: Vec<(f64, Vec<&PerTrialMetrics>)> = Vec::new();

    for (snr, metrics) in trials {
        match buckets.iter_mut().find(|(s, _)| s == snr) {
            Some((_, bucket)) => bucket.push(metrics),
            None => buckets.push((*snr, vec![metrics])),
        }
    }

    buckets.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    buckets
        .into_iter()
        .map(|(snr, bucket)| condition_from_bucket(snr, &bucket))
        .collect()
}

fn condition_from_bucket(snr: f64, bucket: &[&PerTrialMetrics]) -> SnrCondition {
    SnrCondition {
        snr,
        trials: bucket.len(),
        error_rms: bucket.iter().map(|m| m.error.rms).collect(),
        error_mean: bucket.iter().map(|m| m.error.mean).collect(),
        error_var: bucket.iter().map(|m| m.error.var).collect(),
        relative_exploration: bucket.iter().map(|m| m.relative_exploration).collect(),
        entropy_mean: bucket.iter().map(|m| m.entropy.mean).collect(),
        entropy_rms: bucket.iter().map(|m| m.entropy.rms).collect(),
        entropy_var: bucket.iter().map(|m| m.entropy.var).collect(),
        percent_stationary: bucket.iter().map(|m| m.percent_stationary).collect(),
        ergodicity_mean: bucket
            .iter()
            .filter_map(|m| m.ergodicity.map(|e| e.mean))
            .collect(),
        ergodicity_var: bucket
            .iter()
            .filter_map(|m| m.ergodicity.map(|e| e.var))
            .collect(),
        error_hist: mean_histogram(bucket.iter().map(|m| &m.error_hist)),
        sensor_hist: mean_histogram(bucket.iter().map(|m| &m.sensor_hist)),
        target_hist: mean_histogram(bucket.iter().map(|m| &m.target_hist)),
    }
}

/// Elementwise mean of the bucket's histogram counts. A single-trial
/// bucket passes its histogram through unchanged.
fn mean_histogram<'a>(mut hists: impl Iterator<Item = &'a Histogram>) -> Histogram {
    let first = hists
        .next()
        .expect("SNR bucket always holds at least one trial")
        .clone();

    let mut counts = first.counts.clone();
    let mut n = 1usize;
    for hist in hists {
        for (acc, c) in counts.iter_mut().zip(&hist.counts) {
            *acc += c;
        }
        n += 1;
    }
    if n == 1 {
        return first;
    }

    for acc in counts.iter_mut() {
        *acc /= n as f64;
    }
    Histogram {
        counts,
        edges: first.edges,
    }
}
