//! Descriptive statistics shared by the metrics and risk modules.

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (N-1 denominator).
///
/// `None` when fewer than 2 values are given. A spread at rounding-noise
/// level (see [`is_negligible_spread`]) is reported as exactly `0.0`.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    let std = variance.sqrt();
    if is_negligible_spread(std, m) {
        return Some(0.0);
    }
    Some(std)
}

/// Whether a standard deviation is indistinguishable from rounding error
/// around `mean`.
///
/// Constant inputs such as `[0.01; 10]` do not produce an exact zero from
/// the two-pass variance because the mean itself is rounded.
pub fn is_negligible_spread(std: f64, mean: f64) -> bool {
    std <= f64::EPSILON * mean.abs().max(1.0) * 16.0
}

/// Percentile with linear interpolation between closest ranks.
///
/// `pct` is in percent and clamped to `[0, 100]`. The rank position is
/// `pct / 100 * (n - 1)` over the sorted values.
///
/// ```rust
/// use finmetrics_core::stats::percentile;
///
/// let values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
/// assert!((percentile(&values, 50.0).unwrap() - 5.5).abs() < 1e-12);
/// ```
pub fn percentile(values: &[f64], pct: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let pos = pct.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Pearson correlation coefficient of two equal-length samples.
///
/// `None` if the lengths differ, fewer than 2 points are given, or either
/// side has zero variance up to rounding.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let mx = mean(xs)?;
    let my = mean(ys)?;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let dof = (xs.len() - 1) as f64;
    let flat_x = is_negligible_spread((var_x / dof).sqrt(), mx);
    let flat_y = is_negligible_spread((var_y / dof).sqrt(), my);
    if flat_x || flat_y {
        return None;
    }
    // Rounding can push |r| a hair past 1
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}
