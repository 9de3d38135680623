//! Goodness-of-fit helpers

/// One-sample Kolmogorov–Smirnov statistic D = sup |F_n(x) − F(x)|
///
/// Returns 0 for an empty sample.
///
/// # Example
/// ```
/// use packet_source_core_rs::diagnostics::ks_statistic;
///
/// let d = ks_statistic(&[0.1, 0.5, 0.9], |x| x.clamp(0.0, 1.0));
/// assert!((d - 0.2333).abs() < 1e-3);
/// ```
pub fn ks_statistic<F: Fn(f64) -> f64>(samples: &[f64], cdf: F) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len() as f64;
    sorted
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let f = cdf(x);
            let above = (i as f64 + 1.0) / n - f;
            let below = f - i as f64 / n;
            above.max(below)
        })
        .fold(0.0, f64::max)
}

/// Asymptotic KS critical value c(α)/√n, c(α) = √(−ln(α/2)/2)
///
/// For α = 0.05 this is ≈ 1.358/√n.
pub fn ks_critical_value(n: usize, alpha: f64) -> f64 {
    (-(alpha / 2.0).ln() / 2.0).sqrt() / (n as f64).sqrt()
}

/// Counts of `values` in `bins` equal-width bins over [min, max)
///
/// Values outside the range are ignored.
pub fn histogram(values: &[f64], min: f64, max: f64, bins: usize) -> Vec<usize> {
    let mut counts = vec![0; bins];
    if bins == 0 || !(max > min) {
        return counts;
    }
    let width = (max - min) / bins as f64;
    for &v in values {
        if v < min || v >= max {
            continue;
        }
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ks_perfect_grid() {
        // Midpoints of n equal cells give D = 1/(2n)
        let n = 100;
        let samples: Vec<f64> = (0..n).map(|i| (i as f64 + 0.5) / n as f64).collect();
        let d = ks_statistic(&samples, |x| x);
        assert!((d - 0.005).abs() < 1e-12);
    }

    #[test]
    fn test_ks_detects_wrong_distribution() {
        let samples: Vec<f64> = (0..1000).map(|i| i as f64 / 1000.0).collect();
        // Uniform samples against F(x) = x² (density 2x)
        let d = ks_statistic(&samples, |x| x * x);
        assert!(d > 0.2);
        assert!(d > ks_critical_value(samples.len(), 0.05));
    }

    #[test]
    fn test_ks_empty() {
        assert_eq!(ks_statistic(&[], |x| x), 0.0);
    }

    #[test]
    fn test_critical_value_at_five_percent() {
        assert!((ks_critical_value(1, 0.05) - 1.3581).abs() < 1e-3);
    }

    #[test]
    fn test_histogram_edges() {
        let counts = histogram(&[0.0, 0.49, 0.5, 0.99, 1.0, -0.1], 0.0, 1.0, 2);
        assert_eq!(counts, vec![2, 2]);
        assert_eq!(histogram(&[0.5], 1.0, 1.0, 3), vec![0, 0, 0]);
    }
}
