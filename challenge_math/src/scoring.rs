//! Error metrics for scoring point forecasts

/// Tolerance used when matching a quantile level in hub data.
pub const QUANTILE_TOLERANCE: f64 = 0.001;

/// Root mean squared error between index-aligned predictions and
/// observations.
///
/// Pairs where either side is non-finite are excluded from the mean rather
/// than treated as zero. Returns `None` when the series are empty, differ
/// in length, or no valid pair remains.
pub fn rmse(predictions: &[f64], observations: &[f64]) -> Option<f64> {
    if predictions.is_empty() || observations.is_empty() {
        return None;
    }
    if predictions.len() != observations.len() {
        return None;
    }

    let mut sum_squared_errors = 0.0;
    let mut count = 0usize;
    for (&prediction, &observed) in predictions.iter().zip(observations.iter()) {
        if prediction.is_finite() && observed.is_finite() {
            let error = prediction - observed;
            sum_squared_errors += error * error;
            count += 1;
        }
    }

    if count == 0 {
        return None;
    }
    Some((sum_squared_errors / count as f64).sqrt())
}

/// Number of index-aligned pairs where both sides are finite.
pub fn valid_pair_count(predictions: &[f64], observations: &[f64]) -> usize {
    predictions
        .iter()
        .zip(observations.iter())
        .filter(|(p, o)| p.is_finite() && o.is_finite())
        .count()
}

/// Look up the value at a quantile level within `tolerance`, from parallel
/// level/value arrays. Returns `None` on a length mismatch, when no level
/// matches, or when the matched value is non-finite.
pub fn quantile_value(levels: &[f64], values: &[f64], target: f64, tolerance: f64) -> Option<f64> {
    if levels.len() != values.len() {
        return None;
    }
    levels
        .iter()
        .position(|level| (level - target).abs() < tolerance)
        .map(|index| values[index])
        .filter(|value| value.is_finite())
}

/// The median (quantile 0.5) from parallel level/value arrays.
pub fn median_from_quantiles(levels: &[f64], values: &[f64]) -> Option<f64> {
    quantile_value(levels, values, 0.5, QUANTILE_TOLERANCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rmse_perfect_forecast_is_zero() {
        assert_eq!(rmse(&[10.0, 20.0, 30.0], &[10.0, 20.0, 30.0]), Some(0.0));
    }

    #[test]
    fn test_rmse_known_value() {
        // errors 3 and 4: sqrt((9 + 16) / 2) = sqrt(12.5)
        let result = rmse(&[0.0, 0.0], &[3.0, 4.0]).unwrap();
        assert!((result - 12.5_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_rmse_empty_is_none() {
        assert_eq!(rmse(&[], &[]), None);
    }

    #[test]
    fn test_rmse_length_mismatch_is_none() {
        assert_eq!(rmse(&[1.0, 2.0], &[1.0]), None);
    }

    #[test]
    fn test_rmse_skips_non_finite_pairs() {
        // The NaN pair is excluded, not scored as zero error.
        let result = rmse(&[10.0, f64::NAN, 30.0], &[10.0, 20.0, 30.0]);
        assert_eq!(result, Some(0.0));

        let result = rmse(&[10.0, 25.0], &[10.0, f64::INFINITY]);
        assert_eq!(result, Some(0.0));
    }

    #[test]
    fn test_rmse_all_pairs_invalid_is_none() {
        assert_eq!(rmse(&[f64::NAN], &[1.0]), None);
    }

    #[test]
    fn test_valid_pair_count() {
        assert_eq!(valid_pair_count(&[1.0, f64::NAN, 3.0], &[1.0, 2.0, 3.0]), 2);
    }

    #[test]
    fn test_quantile_lookup_within_tolerance() {
        let levels = [0.025, 0.25, 0.5, 0.75, 0.975];
        let values = [5.0, 8.0, 10.0, 12.0, 15.0];
        assert_eq!(median_from_quantiles(&levels, &values), Some(10.0));
        assert_eq!(quantile_value(&levels, &values, 0.9749, 0.001), Some(15.0));
        assert_eq!(quantile_value(&levels, &values, 0.4, 0.001), None);
    }

    #[test]
    fn test_quantile_lookup_rejects_bad_shapes() {
        assert_eq!(median_from_quantiles(&[0.5], &[]), None);
        assert_eq!(median_from_quantiles(&[0.5], &[f64::NAN]), None);
    }
}
