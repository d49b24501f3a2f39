//! Correlation matrix over the numeric columns.

use nalgebra::DMatrix;

use crate::domain::{Schema, Table};
use crate::error::StageError;
use crate::math::correlation_matrix;

#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    pub values: DMatrix<f64>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[(row, col)]
    }
}

pub fn correlation(table: &Table, schema: &Schema) -> Result<CorrelationMatrix, StageError> {
    let (labels, columns): (Vec<String>, Vec<&[Option<f64>]>) = schema
        .numeric()
        .filter_map(|info| {
            let values = table.column(info.index).data.as_numeric()?;
            Some((info.name.clone(), values))
        })
        .unzip();

    if columns.is_empty() {
        return Err(StageError::NoNumericColumns);
    }

    Ok(CorrelationMatrix {
        labels,
        values: correlation_matrix(&columns),
    })
}
