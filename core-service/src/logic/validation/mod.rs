//! Validation Module - Data quality checks over record batches
//!
//! The validator describes why a batch does not conform; it never rejects or
//! mutates the input and never errors on data quality.

pub mod rules;
pub mod report;


pub use report::ValidationReport;
pub use rules::{validate_table, CONSISTENCY_TOLERANCE_PCT, REQUIRED_COLUMNS};
