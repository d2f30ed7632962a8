//! Rolling-window and moving-average primitives
//!
//! All rolling functions keep the output aligned with the input: a window of
//! size `k` produces its first defined value at index `k - 1`, and earlier
//! indices (or any window containing a NaN) are NaN. Standard deviations use
//! the sample (n - 1) divisor.

/// Arithmetic mean over the whole slice; NaN when empty
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation over the whole slice; NaN when fewer than two values
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

/// Rolling mean with the given window size
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(values, window, mean)
}

/// Rolling sample standard deviation with the given window size
pub fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(values, window, sample_std)
}

/// Rolling minimum with the given window size
pub fn rolling_min(values: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(values, window, |w| fold_nan_aware(w, f64::min))
}

/// Rolling maximum with the given window size
pub fn rolling_max(values: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(values, window, |w| fold_nan_aware(w, f64::max))
}

/// Exponential moving average with the given span
///
/// Recursive definition seeded by the first value, alpha = 2 / (span + 1),
/// no look-back bias adjustment.
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev = f64::NAN;
    for (i, &v) in values.iter().enumerate() {
        prev = if i == 0 {
            v
        } else {
            alpha * v + (1.0 - alpha) * prev
        };
        out.push(prev);
    }
    out
}

/// Exponential moving average with the given span, look-back adjusted
///
/// Weighted form `sum((1-alpha)^i * x[t-i]) / sum((1-alpha)^i)`,
/// alpha = 2 / (span + 1). Early values carry full relative weight instead
/// of being dominated by the seed.
pub fn ema_adjusted(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let decay = 1.0 - alpha;
    let mut out = Vec::with_capacity(values.len());
    let mut num = 0.0;
    let mut den = 0.0;
    for &v in values {
        num = v + decay * num;
        den = 1.0 + decay * den;
        out.push(num / den);
    }
    out
}

fn rolling_apply(values: &[f64], window: usize, f: impl Fn(&[f64]) -> f64) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }
    for i in (window - 1)..values.len() {
        out[i] = f(&values[i + 1 - window..=i]);
    }
    out
}

// f64::min/max skip NaN operands, so windows containing NaN must be
// short-circuited explicitly to keep the undefined-prefix convention.
fn fold_nan_aware(window: &[f64], f: impl Fn(f64, f64) -> f64) -> f64 {
    let mut acc = f64::NAN;
    for (i, &v) in window.iter().enumerate() {
        if v.is_nan() {
            return f64::NAN;
        }
        acc = if i == 0 { v } else { f(acc, v) };
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_mean_and_std() {
        assert!(mean(&[]).is_nan());
        assert!(close(mean(&[1.0, 2.0, 3.0]), 2.0));
        assert!(sample_std(&[5.0]).is_nan());
        // Sample std of 2, 4, 4, 4, 5, 5, 7, 9 is sqrt(32/7)
        let s = sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!(close(s, (32.0_f64 / 7.0).sqrt()));
    }

    #[test]
    fn test_rolling_mean_alignment() {
        let out = rolling_mean(&[1.0, 2.0, 3.0, 4.0], 3);
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert!(close(out[2], 2.0));
        assert!(close(out[3], 3.0));
    }

    #[test]
    fn test_rolling_window_longer_than_input() {
        let out = rolling_mean(&[1.0, 2.0], 20);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_rolling_min_max_propagate_nan() {
        let values = [f64::NAN, 2.0, 1.0, 4.0];
        let mins = rolling_min(&values, 2);
        let maxs = rolling_max(&values, 2);
        assert!(mins[1].is_nan());
        assert!(close(mins[2], 1.0));
        assert!(close(maxs[3], 4.0));
    }

    #[test]
    fn test_ema_seeded_by_first_value() {
        let out = ema(&[10.0, 20.0], 3);
        assert!(close(out[0], 10.0));
        // alpha = 0.5 for span 3
        assert!(close(out[1], 15.0));
    }

    #[test]
    fn test_ema_adjusted_weights_early_values() {
        let out = ema_adjusted(&[10.0, 20.0], 3);
        assert!(close(out[0], 10.0));
        // (20 + 0.5 * 10) / 1.5 for span 3
        assert!(close(out[1], 25.0 / 1.5));
    }

    #[test]
    fn test_ema_constant_input() {
        let out = ema(&[7.0; 30], 12);
        assert!(out.iter().all(|&v| close(v, 7.0)));
    }
}
