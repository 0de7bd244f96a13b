//! Small numeric helpers shared by the analyzers.
//!
//! All scores produced by the engine live on a 0-100 scale; `clamp_score`
//! is the single place that enforces it.

/// Compute the mean of a data slice (0.0 when empty).
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Mean of the values, or `None` when there are none.
pub fn mean_opt<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Clamp a score into [0, 100]. NaN collapses to 0.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 100.0)
}

/// `part / total` as a percentage, 0.0 when the total is not positive.
pub fn percent_of(part: f64, total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    part / total * 100.0
}

/// Herfindahl-style sum of squared shares. Shares are fractions of 1.
pub fn sum_of_squares(shares: impl IntoIterator<Item = f64>) -> f64 {
    shares.into_iter().map(|s| s * s).sum()
}

/// Descending comparison on f64 that treats NaN as equal.
pub fn cmp_desc(a: f64, b: f64) -> std::cmp::Ordering {
    b.partial_cmp(&a).unwrap_or(std::cmp::Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert!((mean(&[1.0, 2.0, 3.0]) - 2.0).abs() < 1e-9);
        assert_eq!(mean_opt(Vec::<f64>::new()), None);
        assert_eq!(mean_opt(vec![2.0, 4.0]), Some(3.0));
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(-5.0), 0.0);
        assert_eq!(clamp_score(150.0), 100.0);
        assert_eq!(clamp_score(42.0), 42.0);
        assert_eq!(clamp_score(f64::NAN), 0.0);
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(5.0, 0.0), 0.0);
        assert!((percent_of(25.0, 200.0) - 12.5).abs() < 1e-9);
    }

    #[test]
    fn test_sum_of_squares() {
        assert!((sum_of_squares([0.5, 0.5]) - 0.5).abs() < 1e-9);
        assert!((sum_of_squares([1.0]) - 1.0).abs() < 1e-9);
    }
}
