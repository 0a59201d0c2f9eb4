//! Small numeric helpers shared by scoring, aggregation and CAS.

use ordered_float::OrderedFloat;

use crate::dimension::NEUTRAL_SCORE;

/// Arithmetic mean, `None` for an empty slice.
#[inline]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation (n - 1 denominator).
///
/// Fewer than two observations have no spread and yield `0.0`.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = values.iter().sum::<f64>() / values.len() as f64;
    let sum_sq: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Round to `places` decimals, ties to even.
///
/// Rounds the exact binary value: `0.075` is stored below the tie and
/// rounds down to `0.07`.
pub fn round_to(value: f64, places: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", places, value).parse().unwrap_or(value)
}

/// Weighted median of `(value, weight)` pairs.
///
/// Pairs are sorted by value; the result is the first value at which the
/// cumulative weight reaches half of the total. Empty input or a zero total
/// weight yields [`NEUTRAL_SCORE`].
pub fn weighted_median(pairs: &[(f64, f64)]) -> f64 {
    if pairs.is_empty() {
        return NEUTRAL_SCORE;
    }

    let total: f64 = pairs.iter().map(|(_, w)| w).sum();
    if total <= 0.0 {
        return NEUTRAL_SCORE;
    }

    let mut sorted = pairs.to_vec();
    sorted.sort_by_key(|(v, _)| OrderedFloat(*v));

    let half = total / 2.0;
    let mut cumulative = 0.0;
    for (value, weight) in &sorted {
        cumulative += weight;
        if cumulative >= half {
            return *value;
        }
    }

    // Unreachable with finite weights; the last value is the upper median.
    sorted[sorted.len() - 1].0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[10.0, 20.0, 60.0]), Some(30.0));
    }

    #[test]
    fn test_sample_std_dev() {
        assert_eq!(sample_std_dev(&[]), 0.0);
        assert_eq!(sample_std_dev(&[42.0]), 0.0);
        assert_eq!(sample_std_dev(&[5.0, 5.0, 5.0]), 0.0);
        let sd = sample_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((sd - 2.138_089_935).abs() < 1e-6);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(66.666_666, 2), 66.67);
        assert_eq!(round_to(0.912_345_6, 4), 0.9123);
        assert_eq!(round_to(0.125, 2), 0.12);
    }

    #[test]
    fn test_round_to_uses_stored_value() {
        // Both sit just below the tie in binary.
        assert_eq!(round_to(0.075, 2), 0.07);
        assert_eq!(round_to(2.675, 2), 2.67);
        assert_eq!(round_to(1.005, 2), 1.0);
        assert_eq!(round_to(-0.075, 2), -0.07);
    }

    #[test]
    fn test_weighted_median_uniform_weights() {
        let pairs = [(30.0, 1.0), (10.0, 1.0), (20.0, 1.0)];
        assert_eq!(weighted_median(&pairs), 20.0);
    }

    #[test]
    fn test_weighted_median_lower_median_on_even_count() {
        let pairs = [(10.0, 1.0), (20.0, 1.0), (30.0, 1.0), (40.0, 1.0)];
        assert_eq!(weighted_median(&pairs), 20.0);
    }

    #[test]
    fn test_weighted_median_respects_weights() {
        // Heavy weight on the high value pulls the median up.
        let pairs = [(10.0, 0.5), (20.0, 0.5), (90.0, 3.0)];
        assert_eq!(weighted_median(&pairs), 90.0);
    }

    #[test]
    fn test_weighted_median_degenerate_inputs() {
        assert_eq!(weighted_median(&[]), NEUTRAL_SCORE);
        assert_eq!(weighted_median(&[(80.0, 0.0), (20.0, 0.0)]), NEUTRAL_SCORE);
    }
}
