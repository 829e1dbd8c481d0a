//! Descriptive-statistics primitives over raw value slices.
//!
//! All dispersion measures use the sample (n−1) convention; quantiles use
//! linear interpolation; skewness and kurtosis are the bias-corrected
//! estimators, returning `None` below their defining sample sizes.

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn sample_variance(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let m = mean(values)?;
    let sum_sq = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>();
    Some(sum_sq / (n - 1) as f64)
}

pub fn sample_stdev(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(f64::sqrt)
}

/// Sample covariance of two equal-length slices.
pub fn sample_covariance(a: &[f64], b: &[f64]) -> Option<f64> {
    let n = a.len();
    if n < 2 || n != b.len() {
        return None;
    }
    let mean_a = mean(a)?;
    let mean_b = mean(b)?;
    let sum = a
        .iter()
        .zip(b)
        .map(|(x, y)| (x - mean_a) * (y - mean_b))
        .sum::<f64>();
    Some(sum / (n - 1) as f64)
}

/// Pearson correlation; `None` when undefined (short input or a
/// zero-variance side).
pub fn pearson_correlation(a: &[f64], b: &[f64]) -> Option<f64> {
    let covariance = sample_covariance(a, b)?;
    let stdev_a = sample_stdev(a)?;
    let stdev_b = sample_stdev(b)?;
    let denominator = stdev_a * stdev_b;
    if denominator == 0.0 {
        return None;
    }
    Some(covariance / denominator)
}

/// Linear-interpolation quantile, `q` in `[0, 1]`.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("finite values must compare"));

    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let fraction = position - lower as f64;

    if lower + 1 >= sorted.len() {
        return Some(sorted[lower]);
    }
    Some(sorted[lower] + fraction * (sorted[lower + 1] - sorted[lower]))
}

pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Bias-corrected skewness (adjusted Fisher–Pearson), requires n ≥ 3 and
/// nonzero dispersion.
pub fn skewness(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 3 {
        return None;
    }
    let m = mean(values)?;
    let s = sample_stdev(values)?;
    if s == 0.0 {
        return None;
    }

    let sum_cubed = values
        .iter()
        .map(|v| {
            let z = (v - m) / s;
            z * z * z
        })
        .sum::<f64>();
    let n = n as f64;
    Some(n / ((n - 1.0) * (n - 2.0)) * sum_cubed)
}

/// Bias-corrected excess kurtosis, requires n ≥ 4 and nonzero dispersion.
pub fn excess_kurtosis(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 4 {
        return None;
    }
    let m = mean(values)?;
    let s = sample_stdev(values)?;
    if s == 0.0 {
        return None;
    }

    let sum_fourth = values
        .iter()
        .map(|v| {
            let z = (v - m) / s;
            z * z * z * z
        })
        .sum::<f64>();
    let n = n as f64;
    let leading = n * (n + 1.0) / ((n - 1.0) * (n - 2.0) * (n - 3.0));
    let correction = 3.0 * (n - 1.0) * (n - 1.0) / ((n - 2.0) * (n - 3.0));
    Some(leading * sum_fourth - correction)
}

/// Share of strictly positive values.
pub fn fraction_positive(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let positive = values.iter().filter(|v| **v > 0.0).count();
    Some(positive as f64 / values.len() as f64)
}
