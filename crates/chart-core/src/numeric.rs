//! Small numeric helpers shared by the indicator, wave and valuation code.

/// Compute the mean of a data slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Minimum and maximum of a slice, `None` when empty.
pub fn min_max(data: &[f64]) -> Option<(f64, f64)> {
    if data.is_empty() {
        return None;
    }
    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}

/// Min-max normalize into [0, 1].
///
/// `epsilon` is added to the denominator so a flat series maps to all zeros
/// instead of dividing by zero.
pub fn min_max_normalize(data: &[f64], epsilon: f64) -> Vec<f64> {
    let Some((min, max)) = min_max(data) else {
        return vec![];
    };
    let range = max - min + epsilon;
    data.iter().map(|x| (x - min) / range).collect()
}

/// Round to `decimals` places. Exact halves go to the even neighbour, so
/// 0.125 becomes 0.12 and 0.375 becomes 0.38.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean() {
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), 2.5);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_min_max() {
        assert_eq!(min_max(&[3.0, -1.0, 7.5]), Some((-1.0, 7.5)));
        assert_eq!(min_max(&[]), None);
    }

    #[test]
    fn test_normalize_range() {
        let n = min_max_normalize(&[10.0, 20.0, 15.0], 0.0);
        assert_relative_eq!(n[0], 0.0);
        assert_relative_eq!(n[1], 1.0);
        assert_relative_eq!(n[2], 0.5);
    }

    #[test]
    fn test_normalize_flat_series() {
        // Flat input must not produce NaN
        let n = min_max_normalize(&[5.0, 5.0, 5.0], 1e-8);
        assert!(n.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_round_to() {
        assert_relative_eq!(round_to(12.3456, 2), 12.35);
        assert_relative_eq!(round_to(-0.004, 2), 0.0);
    }

    #[test]
    fn test_round_to_exact_halves_go_even() {
        assert_relative_eq!(round_to(0.125, 2), 0.12);
        assert_relative_eq!(round_to(0.375, 2), 0.38);
        assert_relative_eq!(round_to(2.5, 0), 2.0);
        assert_relative_eq!(round_to(-0.125, 2), -0.12);
    }
}
