//! Belief-entropy derivation.
//!
//! Most records carry a precomputed `enpList`; the derivation here covers
//! Ergodic-variant records from simulation versions that did not save it.
//! It is a separate, exported function so the formula is tested
//! independently of the use-the-recorded-list path.

/// Shannon entropy (natural log) of a probability mass column.
///
/// The column is normalized to sum to 1 before the reduction; zero
/// entries contribute nothing.
pub fn shannon(column: &[f64]) -> f64 {
    let total: f64 = column.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    -column
        .iter()
        .filter(|&&p| p > 0.0)
        .map(|&p| {
            let q = p / total;
            q * q.ln()
        })
        .sum::<f64>()
}

/// Entropy of every (time, sample)-indexed belief column, in time-major
/// order, skipping the first recorded entry.
pub fn derive_from_belief(belief: &[Vec<Vec<f64>>]) -> Vec<f64> {
    belief
        .iter()
        .flat_map(|slice| slice.iter())
        .skip(1)
        .map(|column| shannon(column))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_mass_has_zero_entropy() {
        let mut column = vec![0.0; 101];
        column[50] = 1.0;
        assert_eq!(shannon(&column), 0.0);
    }

    #[test]
    fn test_uniform_entropy_is_log_n() {
        let column = vec![0.25; 4];
        assert!((shannon(&column) - 4.0f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_unnormalized_column_is_normalized_first() {
        // Same distribution at a different scale gives the same entropy
        let a = shannon(&[1.0, 1.0, 2.0]);
        let b = shannon(&[0.25, 0.25, 0.5]);
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn test_derivation_skips_first_entry() {
        let belief = vec![
            vec![vec![1.0, 0.0], vec![0.5, 0.5]],
            vec![vec![0.25, 0.75], vec![0.0, 1.0]],
        ];
        let derived = derive_from_belief(&belief);

        // 4 columns recorded, first skipped
        assert_eq!(derived.len(), 3);
        assert!((derived[0] - shannon(&[0.5, 0.5])).abs() < 1e-12);
        assert_eq!(*derived.last().unwrap(), 0.0);
    }
}
