//! Numeric helpers shared by every detector.
//!
//! All functions are pure and never return NaN or infinity for finite input:
//! empty slices and zero denominators map to `0.0`.

/// Arithmetic mean; `0.0` for an empty slice.
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Population standard deviation around `mean` (divides by N).
pub fn std_dev(xs: &[f64], mean: f64) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let sq_diff: f64 = xs.iter().map(|x| (x - mean).powi(2)).sum();
    (sq_diff / xs.len() as f64).sqrt()
}

/// Exponential moving average seeded with the first value.
///
/// The output has the same length as the input. A `period` of 0 is treated as 1.
pub fn ema(xs: &[f64], period: usize) -> Vec<f64> {
    let Some(&first) = xs.first() else {
        return vec![];
    };
    let multiplier = 2.0 / (period.max(1) as f64 + 1.0);

    let mut out = Vec::with_capacity(xs.len());
    let mut prev = first;
    out.push(prev);
    for &x in &xs[1..] {
        prev = (x - prev) * multiplier + prev;
        out.push(prev);
    }
    out
}

/// Simple moving average over trailing windows.
///
/// Returns `len - window + 1` values; entry `j` is the mean of `xs[j..j + window]`.
/// Empty when `window` is 0 or longer than the input.
pub fn moving_average(xs: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || window > xs.len() {
        return vec![];
    }
    xs.windows(window).map(mean).collect()
}

/// Pearson product-moment correlation over the common prefix of both slices.
///
/// `0.0` when either slice is empty or either side is constant.
pub fn pearson_correlation(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return 0.0;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    let (mx, my) = (mean(xs), mean(ys));

    let mut num = 0.0;
    let mut sx = 0.0;
    let mut sy = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        let (dx, dy) = (x - mx, y - my);
        num += dx * dy;
        sx += dx * dx;
        sy += dy * dy;
    }

    let den = (sx * sy).sqrt();
    if den == 0.0 || !den.is_finite() {
        return 0.0;
    }
    num / den
}

/// Nearest-rank percentile without interpolation.
///
/// Sorts ascending and returns the element at `floor(p / 100 * n)`, clamped to
/// the last index. `p` is clamped to `0..=100`; an empty slice yields `0.0`.
pub fn percentile(xs: &[f64], p: f64) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let mut sorted = xs.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 100.0) };
    let idx = ((p / 100.0) * sorted.len() as f64).floor() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// `num / den`, or `0.0` when the denominator is zero.
pub(crate) fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 { 0.0 } else { num / den }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn mean_and_population_std() {
        let xs = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let m = mean(&xs);
        assert!((m - 5.0).abs() < EPS);
        assert!((std_dev(&xs, m) - 2.0).abs() < EPS);
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(std_dev(&[], 0.0), 0.0);
    }

    #[test]
    fn ema_is_seeded_with_first_value() {
        let out = ema(&[10.0, 20.0, 20.0], 3);
        // multiplier = 0.5
        assert_eq!(out, vec![10.0, 15.0, 17.5]);
        assert!(ema(&[], 5).is_empty());
        assert_eq!(ema(&[1.0, 1.0, 1.0], 0).len(), 3);
    }

    #[test]
    fn moving_average_length_and_values() {
        let out = moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 2);
        assert_eq!(out, vec![1.5, 2.5, 3.5, 4.5]);
        assert!(moving_average(&[1.0, 2.0], 3).is_empty());
        assert!(moving_average(&[1.0, 2.0], 0).is_empty());
        assert_eq!(moving_average(&[1.0, 2.0, 3.0], 3), vec![2.0]);
    }

    #[test]
    fn pearson_identity_and_constant() {
        let x = [1.0, 3.0, 2.0, 5.0, 4.0];
        assert!((pearson_correlation(&x, &x) - 1.0).abs() < EPS);
        assert_eq!(pearson_correlation(&x, &[7.0; 5]), 0.0);
        assert_eq!(pearson_correlation(&[], &x), 0.0);

        let neg: Vec<f64> = x.iter().map(|v| -2.0 * v + 1.0).collect();
        assert!((pearson_correlation(&x, &neg) + 1.0).abs() < EPS);
    }

    #[test]
    fn pearson_uses_common_prefix() {
        let x = [1.0, 2.0, 3.0, 100.0, -50.0];
        let y = [2.0, 4.0, 6.0];
        assert!((pearson_correlation(&x, &y) - 1.0).abs() < EPS);
    }

    #[test]
    fn percentile_is_nearest_rank() {
        let xs = [5.0, 1.0, 4.0, 2.0, 3.0];
        assert_eq!(percentile(&xs, 0.0), 1.0);
        assert_eq!(percentile(&xs, 50.0), 3.0); // floor(2.5) = 2
        assert_eq!(percentile(&xs, 90.0), 5.0); // floor(4.5) = 4
        assert_eq!(percentile(&xs, 100.0), 5.0); // clamped
        assert_eq!(percentile(&[], 90.0), 0.0);
    }

    proptest! {
        #[test]
        fn helpers_stay_finite(xs in proptest::collection::vec(-1.0e6f64..1.0e6, 0..60),
                               ys in proptest::collection::vec(-1.0e6f64..1.0e6, 0..60),
                               period in 0usize..40,
                               p in 0.0f64..100.0) {
            let m = mean(&xs);
            prop_assert!(m.is_finite());
            prop_assert!(std_dev(&xs, m).is_finite());
            prop_assert!(ema(&xs, period).iter().all(|v| v.is_finite()));
            prop_assert!(moving_average(&xs, period).iter().all(|v| v.is_finite()));
            let r = pearson_correlation(&xs, &ys);
            prop_assert!(r.is_finite());
            prop_assert!(r.abs() <= 1.0 + 1e-9);
            prop_assert!(percentile(&xs, p).is_finite());
        }
    }
}
