use argminmax::ArgMinMax;

/// Ordinary least-squares fit of `prices` against `times`.
///
/// Returns `(slope, intercept)` with `slope = cov(t, p) / var(t)` and
/// `intercept = mean(p) - slope * mean(t)`. Both slices must have the same
/// non-zero length. Returns `None` when the time values are all identical
/// (zero variance), which cannot happen for points taken from a series with
/// strictly increasing timestamps.
pub fn linear_fit(times: &[f64], prices: &[f64]) -> Option<(f64, f64)> {
    debug_assert_eq!(times.len(), prices.len());
    if times.is_empty() {
        return None;
    }

    let n = times.len() as f64;
    let mean_t = times.iter().sum::<f64>() / n;
    let mean_p = prices.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var = 0.0;
    for (&t, &p) in times.iter().zip(prices.iter()) {
        cov += (t - mean_t) * (p - mean_p);
        var += (t - mean_t) * (t - mean_t);
    }

    if var == 0.0 {
        return None;
    }

    let slope = cov / var;
    let intercept = mean_p - slope * mean_t;
    Some((slope, intercept))
}

/// Distance between an actual and a predicted price, relative to the actual.
/// Callers must guard against `actual == 0.0` before calling.
#[inline]
pub fn relative_distance(actual: f64, predicted: f64) -> f64 {
    (actual - predicted).abs() / actual
}

pub fn get_max(vec: &[f64]) -> f64 {
    let max_index: usize = vec.argmax();
    vec[max_index]
}

pub fn get_min(vec: &[f64]) -> f64 {
    let min_index: usize = vec.argmin();
    vec[min_index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_fit_exact_line() {
        // p = 2t + 5
        let times = [0.0, 3600.0, 7200.0, 10800.0];
        let prices: Vec<f64> = times.iter().map(|t| 2.0 * t + 5.0).collect();

        let (slope, intercept) = linear_fit(&times, &prices).unwrap();
        assert!((slope - 2.0).abs() < 1e-12);
        assert!((intercept - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_fit_degenerate_time() {
        let times = [100.0, 100.0, 100.0];
        let prices = [1.0, 2.0, 3.0];
        assert!(linear_fit(&times, &prices).is_none());
    }

    #[test]
    fn test_get_max_and_min() {
        let v = [3.0, 9.0, 1.0, 7.0];
        assert_eq!(get_max(&v), 9.0);
        assert_eq!(get_min(&v), 1.0);
    }
}
