//! IQR outlier detection.
//!
//! Fences are `Q1 − 1.5·IQR` and `Q3 + 1.5·IQR`; a row is flagged when its
//! value lies strictly outside them. With `IQR = 0` both fences equal the
//! constant quartile value, so exactly the rows that differ from it are
//! flagged. Missing values are never flagged.

use crate::math::{quantile_sorted, sorted};

/// Fence multiplier applied to the IQR.
pub const IQR_FACTOR: f64 = 1.5;

#[derive(Debug, Clone, PartialEq)]
pub struct OutlierReport {
    pub column: String,
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
    /// Flagged row indices, ascending.
    pub rows: Vec<usize>,
}

impl OutlierReport {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Compute fences and flagged rows; `None` when the column has no values.
pub fn detect_outliers(column: &str, values: &[Option<f64>]) -> Option<OutlierReport> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    let s = sorted(&present);
    let q1 = quantile_sorted(&s, 0.25)?;
    let q3 = quantile_sorted(&s, 0.75)?;
    let iqr = q3 - q1;
    let lower = q1 - IQR_FACTOR * iqr;
    let upper = q3 + IQR_FACTOR * iqr;

    let rows = values
        .iter()
        .enumerate()
        .filter_map(|(row, v)| {
            let v = (*v)?;
            (v < lower || v > upper).then_some(row)
        })
        .collect();

    Some(OutlierReport {
        column: column.to_string(),
        q1,
        q3,
        lower,
        upper,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn flags_the_extreme_value() {
        let values = [Some(1.0), Some(2.0), Some(3.0), None, Some(4.0), Some(1000.0)];
        let r = detect_outliers("n", &values).unwrap();
        assert_eq!((r.q1, r.q3), (2.0, 4.0));
        assert_eq!(r.rows, vec![5]);
    }

    #[test]
    fn three_values_keep_wide_fences() {
        // q1 = 1.5, q3 = 501: the extreme value sits inside [-747.75, 1250.25].
        let r = detect_outliers("n", &[Some(1.0), Some(2.0), Some(1000.0)]).unwrap();
        assert_eq!((r.q1, r.q3), (1.5, 501.0));
        assert_eq!((r.lower, r.upper), (-747.75, 1250.25));
        assert!(r.is_empty());
    }

    #[test]
    fn constant_column_flags_only_different_values() {
        let values = [Some(5.0), Some(5.0), Some(5.0), Some(5.0), Some(5.0), Some(7.0), None];
        let r = detect_outliers("c", &values).unwrap();
        assert_eq!(r.iqr(), 0.0);
        assert_eq!(r.rows, vec![5]);

        let flat = detect_outliers("c", &[Some(5.0), Some(5.0)]).unwrap();
        assert!(flat.is_empty());
    }

    #[test]
    fn values_on_the_fence_are_not_flagged() {
        // q1 = 2, q3 = 4, iqr = 2 -> fences [-1, 7].
        let values: Vec<Option<f64>> = [3.0, 2.0, -1.0, 4.0, 3.0, 2.0, 7.0, 4.0, 3.0]
            .iter()
            .copied()
            .map(Some)
            .collect();
        let r = detect_outliers("f", &values).unwrap();
        assert_eq!((r.lower, r.upper), (-1.0, 7.0));
        assert!(r.is_empty());
    }

    #[test]
    fn all_missing_column_has_no_report() {
        assert!(detect_outliers("m", &[None, None]).is_none());
    }

    #[test]
    fn flagged_set_matches_brute_force_on_random_columns() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let n = rng.gen_range(1..40);
            let values: Vec<Option<f64>> = (0..n)
                .map(|_| {
                    if rng.gen_bool(0.1) {
                        None
                    } else if rng.gen_bool(0.1) {
                        Some(rng.gen_range(-500.0..500.0))
                    } else {
                        Some(rng.gen_range(0.0..10.0_f64).round())
                    }
                })
                .collect();

            let Some(r) = detect_outliers("x", &values) else {
                assert!(values.iter().all(Option::is_none));
                continue;
            };
            let expected: Vec<usize> = values
                .iter()
                .enumerate()
                .filter(|(_, v)| v.is_some_and(|v| v < r.lower || v > r.upper))
                .map(|(i, _)| i)
                .collect();
            assert_eq!(r.rows, expected);
            assert_eq!(r.lower, r.q1 - 1.5 * (r.q3 - r.q1));
            assert_eq!(r.upper, r.q3 + 1.5 * (r.q3 - r.q1));
        }
    }
}
