//! Fixed-range histogram binning.

use crate::models::Histogram;
use crate::metrics::stats::linspace;

/// Count `values` into `bins` equal-width bins spanning `[min, max]`.
///
/// Values outside the range are dropped, so the counts sum to at most
/// `values.len()`. The upper edge is inclusive: a value exactly at `max`
/// lands in the last bin. Returns `bins + 1` edges alongside the counts.
pub fn histogram(values: &[f64], min: f64, max: f64, bins: usize) -> Histogram {
    let edges = linspace(min, max, bins + 1);
    let mut counts = vec![0.0; bins];

    if bins > 0 && max > min {
        let width = (max - min) / bins as f64;
        for &v in values {
            if v < min || v > max {
                continue;
            }
            let idx = (((v - min) / width) as usize).min(bins - 1);
            counts[idx] += 1.0;
        }
    }

    Histogram { counts, edges }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twenty_bins_have_twenty_one_edges() {
        let hist = histogram(&[0.0, 0.5, 1.0], 0.0, 1.0, 20);
        assert_eq!(hist.counts.len(), 20);
        assert_eq!(hist.edges.len(), 21);
    }

    #[test]
    fn test_out_of_range_values_are_dropped() {
        let values = [-0.5, 0.1, 0.3, 0.9];
        let hist = histogram(&values, 0.2, 0.8, 20);
        assert_eq!(hist.total(), 1.0);
        assert!(hist.total() <= values.len() as f64);
    }

    #[test]
    fn test_upper_edge_is_inclusive() {
        let hist = histogram(&[0.8], 0.2, 0.8, 20);
        assert_eq!(hist.counts[19], 1.0);
    }

    #[test]
    fn test_values_land_in_expected_bins() {
        let hist = histogram(&[-0.39, 0.0, 0.39], -0.4, 0.4, 20);
        assert_eq!(hist.counts[0], 1.0);
        assert_eq!(hist.counts[10], 1.0);
        assert_eq!(hist.counts[19], 1.0);
        assert_eq!(hist.total(), 3.0);
    }
}
