//! Per-stage analysis computations.
//!
//! Everything in here is pure: it reads the table and schema and returns
//! plain data. Writing files is left to `io` and `plot`.

pub mod categorical;
pub mod classify;
pub mod correlation;
pub mod describe;
pub mod distribution;
pub mod missing;
pub mod outliers;
pub mod timeseries;

pub use categorical::{FrequencyTable, frequency_tables, value_counts};
pub use classify::classify;
pub use correlation::{CorrelationMatrix, correlation};
pub use describe::{DescribeRow, describe};
pub use distribution::{Distribution, distribution};
pub use missing::{MissingRow, missing_summary};
pub use outliers::{OutlierReport, detect_outliers};
pub use timeseries::{MonthlyCounts, monthly_counts};
