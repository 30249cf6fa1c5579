//! Single-pole low-pass filter.

use std::f64::consts::PI;

/// Filter `signal` with a single-pole low-pass at `cutoff_hz`, sampled
/// at `1/dt` Hz. The first sample passes through unchanged.
pub fn low_pass(signal: &[f64], cutoff_hz: f64, dt: f64) -> Vec<f64> {
    let Some(&first) = signal.first() else {
        return Vec::new();
    };

    let rc = 1.0 / (2.0 * PI * cutoff_hz);
    let alpha = dt / (rc + dt);

    let mut out = Vec::with_capacity(signal.len());
    let mut y = first;
    out.push(y);
    for &x in &signal[1..] {
        y += alpha * (x - y);
        out.push(y);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_signal_passes_through() {
        let filtered = low_pass(&[0.5; 10], 2.0, 0.02);
        assert_eq!(filtered.len(), 10);
        for y in filtered {
            assert!((y - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_step_response_is_monotone_and_bounded() {
        let mut signal = vec![0.0; 5];
        signal.extend(vec![1.0; 50]);
        let filtered = low_pass(&signal, 2.0, 0.02);

        for w in filtered.windows(2) {
            assert!(w[1] >= w[0] - 1e-12);
        }
        // Converges toward the step level without overshoot
        assert!(*filtered.last().unwrap() > 0.9);
        assert!(filtered.iter().all(|&y| y <= 1.0));
    }

    #[test]
    fn test_smoothing_reduces_path_length() {
        use crate::metrics::stats::path_length;

        let jagged: Vec<f64> = (0..100)
            .map(|i| 0.5 + if i % 2 == 0 { 0.1 } else { -0.1 })
            .collect();
        let filtered = low_pass(&jagged, 2.0, 0.02);
        assert!(path_length(&filtered) < path_length(&jagged));
    }

    #[test]
    fn test_empty_signal() {
        assert!(low_pass(&[], 2.0, 0.02).is_empty());
    }
}
