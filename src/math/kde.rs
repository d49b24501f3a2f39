//! Gaussian kernel density estimate.
//!
//! Bandwidth follows Scott's rule (`σ · n^(-1/5)`), the scipy/seaborn default.

use std::f64::consts::PI;

use crate::math::stats::sample_std;

/// Scott's-rule bandwidth; `None` when the sample has no spread.
pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
    let sigma = sample_std(values)?;
    if !(sigma.is_finite() && sigma > 0.0) {
        return None;
    }
    Some(sigma * (values.len() as f64).powf(-0.2))
}

/// Evaluate the density on `steps` evenly spaced points in `[lo, hi]`.
///
/// Returns `(x, density)` pairs; empty when the bandwidth is undefined.
pub fn gaussian_kde(values: &[f64], lo: f64, hi: f64, steps: usize) -> Vec<(f64, f64)> {
    let Some(bw) = scott_bandwidth(values) else {
        return Vec::new();
    };
    let steps = steps.max(2);
    let n = values.len() as f64;
    let norm = 1.0 / (n * bw * (2.0 * PI).sqrt());

    (0..steps)
        .map(|i| {
            let x = lo + (hi - lo) * i as f64 / (steps - 1) as f64;
            let sum: f64 = values
                .iter()
                .map(|v| {
                    let z = (x - v) / bw;
                    (-0.5 * z * z).exp()
                })
                .sum();
            (x, sum * norm)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_sample_has_no_density() {
        assert!(gaussian_kde(&[2.0, 2.0, 2.0], 1.0, 3.0, 10).is_empty());
        assert!(gaussian_kde(&[2.0], 1.0, 3.0, 10).is_empty());
    }

    #[test]
    fn density_integrates_to_about_one() {
        let values: Vec<f64> = (0..50).map(|i| f64::from(i) * 0.1).collect();
        let curve = gaussian_kde(&values, -5.0, 10.0, 2000);
        let dx = curve[1].0 - curve[0].0;
        let area: f64 = curve.iter().map(|(_, d)| d * dx).sum();
        assert!((area - 1.0).abs() < 0.01, "area = {area}");
    }

    #[test]
    fn density_peaks_near_the_mode() {
        let values = [0.0, 0.1, -0.1, 0.05, 5.0];
        let curve = gaussian_kde(&values, -2.0, 7.0, 91);
        let (peak_x, _) = curve
            .iter()
            .copied()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .unwrap();
        assert!(peak_x.abs() < 0.5, "peak at {peak_x}");
    }
}
