//! Summary statistics over plain `f64` slices.
//!
//! Callers pass only present (non-missing) values. Quantiles use linear
//! interpolation between closest ranks, which is the pandas/numpy default.

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (ddof = 1); `None` below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (n as f64 - 1.0)).sqrt())
}

/// Sorted copy of the input (total order, so NaN never panics the sort).
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(f64::total_cmp);
    out
}

/// Quantile `q ∈ [0, 1]` of already-sorted values.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Five-number summary plus mean/std for one numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericSummary {
    pub mean: f64,
    pub std: Option<f64>,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

pub fn summarize(values: &[f64]) -> Option<NumericSummary> {
    let s = sorted(values);
    Some(NumericSummary {
        mean: mean(&s)?,
        std: sample_std(&s),
        min: *s.first()?,
        q1: quantile_sorted(&s, 0.25)?,
        median: quantile_sorted(&s, 0.5)?,
        q3: quantile_sorted(&s, 0.75)?,
        max: *s.last()?,
    })
}

/// Number of histogram bins using numpy's `"auto"` rule:
/// the larger of Sturges and Freedman–Diaconis, capped at `max_bins`.
pub fn auto_bin_count(sorted: &[f64], max_bins: usize) -> usize {
    let n = sorted.len();
    if n < 2 {
        return 1;
    }
    let range = sorted[n - 1] - sorted[0];
    if range <= 0.0 || !range.is_finite() {
        return 1;
    }

    let sturges = (n as f64).log2().ceil() as usize + 1;

    let iqr = match (quantile_sorted(sorted, 0.75), quantile_sorted(sorted, 0.25)) {
        (Some(q3), Some(q1)) => q3 - q1,
        _ => 0.0,
    };
    let fd = if iqr > 0.0 {
        let width = 2.0 * iqr / (n as f64).cbrt();
        (range / width).ceil() as usize
    } else {
        0
    };

    sturges.max(fd).clamp(1, max_bins.max(1))
}
