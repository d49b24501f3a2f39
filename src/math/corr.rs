//! Pairwise Pearson correlation.
//!
//! Each pair uses only rows where both values are present (pandas'
//! pairwise-complete behaviour). Undefined coefficients are `NaN`.

use nalgebra::DMatrix;

/// Pearson correlation of two equally long columns with missing values.
pub fn pearson_pairwise(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    let n = pairs.len();
    if n < 2 {
        return f64::NAN;
    }

    let nf = n as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / nf;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / nf;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx <= 0.0 || syy <= 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0)
}

/// Symmetric correlation matrix over the given columns.
pub fn correlation_matrix(columns: &[&[Option<f64>]]) -> DMatrix<f64> {
    let k = columns.len();
    let mut m = DMatrix::from_element(k, k, f64::NAN);
    for i in 0..k {
        for j in i..k {
            let r = pearson_pairwise(columns[i], columns[j]);
            m[(i, j)] = r;
            m[(j, i)] = r;
        }
    }
    m
}
