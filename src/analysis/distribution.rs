//! Histogram + density data for the distribution plots.
//!
//! All numbers are computed here; `plot::histogram` only draws them.

use crate::math::{auto_bin_count, gaussian_kde, sorted};

/// Upper bound on histogram bins.
pub const MAX_BINS: usize = 500;
/// Points on the density curve.
pub const KDE_STEPS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub column: String,
    pub bins: Vec<Bin>,
    /// Density scaled to the count axis; empty when undefined.
    pub density: Vec<(f64, f64)>,
}

impl Distribution {
    pub fn x_range(&self) -> (f64, f64) {
        match (self.bins.first(), self.bins.last()) {
            (Some(first), Some(last)) => (first.lo, last.hi),
            _ => (0.0, 1.0),
        }
    }

    pub fn y_max(&self) -> f64 {
        let bars = self.bins.iter().map(|b| b.count as f64).fold(0.0, f64::max);
        let curve = self.density.iter().map(|p| p.1).fold(0.0, f64::max);
        bars.max(curve)
    }
}

/// Bin the present values; `None` when there are none.
///
/// A zero-range sample becomes a single unit-wide bar centred on the value,
/// without a density curve.
pub fn distribution(column: &str, values: &[f64]) -> Option<Distribution> {
    let s = sorted(values);
    let (&min, &max) = (s.first()?, s.last()?);
    let n = s.len();

    if max - min <= 0.0 {
        return Some(Distribution {
            column: column.to_string(),
            bins: vec![Bin {
                lo: min - 0.5,
                hi: max + 0.5,
                count: n,
            }],
            density: Vec::new(),
        });
    }

    let k = auto_bin_count(&s, MAX_BINS);
    let width = (max - min) / k as f64;
    let mut counts = vec![0usize; k];
    for v in &s {
        // The last edge is inclusive, as in numpy.
        let idx = (((v - min) / width) as usize).min(k - 1);
        counts[idx] += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            lo: min + width * i as f64,
            hi: if i + 1 == k { max } else { min + width * (i + 1) as f64 },
            count,
        })
        .collect();

    let scale = n as f64 * width;
    let density = gaussian_kde(&s, min, max, KDE_STEPS)
        .into_iter()
        .map(|(x, d)| (x, d * scale))
        .collect();

    Some(Distribution {
        column: column.to_string(),
        bins,
        density,
    })
}
