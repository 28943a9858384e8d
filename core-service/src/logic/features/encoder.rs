//! Feature Encoder - raw records to the training-time column layout
//!
//! Steps, in order:
//! 1. strip whitespace from column names
//! 2. coerce the numeric fields
//! 3. map the two-valued fields to 0/1
//! 4. one-hot every remaining text column, dropping the first sorted level
//! 5. turn all-boolean columns into 0/1
//! 6. reindex to FEATURE_COLS (missing → 0, extras dropped)
//!
//! Categorical treatment must match training exactly. Unknown categories
//! are not an error: their indicator columns are not in FEATURE_COLS and
//! are dropped at step 6.

use ndarray::Array2;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;

use crate::constants::{BINARY_FIELDS, NUMERIC_FIELDS};
use crate::logic::config::{EncoderConfig, NumericPolicy};
use crate::logic::record::{FieldValue, RawRecord, RawTable};

use super::matrix::FeatureMatrix;
use super::schema::FeatureSchema;

#[derive(Debug, Error, PartialEq)]
pub enum EncodeError {
    #[error("invalid numeric value for {field} at row {row}: {value:?}")]
    InvalidNumeric {
        field: String,
        row: usize,
        value: String,
    },
}

/// How a single input column is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Numeric,
    Binary { one: &'static str },
    Boolean,
    Passthrough,
    Categorical,
}

#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    schema: Arc<FeatureSchema>,
    config: EncoderConfig,
}

impl FeatureEncoder {
    pub fn new(schema: Arc<FeatureSchema>, config: EncoderConfig) -> Self {
        Self { schema, config }
    }

    pub fn schema(&self) -> &Arc<FeatureSchema> {
        &self.schema
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    pub fn encode_record(&self, record: &RawRecord) -> Result<FeatureMatrix, EncodeError> {
        self.encode(&RawTable::from_record(record))
    }

    pub fn encode(&self, table: &RawTable) -> Result<FeatureMatrix, EncodeError> {
        let rows = table.row_count();
        let mut encoded: Vec<(String, Vec<f32>)> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();

        for (idx, raw_name) in table.columns().iter().enumerate() {
            let name = raw_name.trim();
            if !seen.insert(name) {
                log::debug!("Column '{}' appears twice after trimming; keeping the first", name);
                continue;
            }

            let cells: Vec<&FieldValue> = (0..rows).map(|r| table.cell(r, idx)).collect();

            match classify(name, &cells) {
                ColumnKind::Numeric => {
                    let values = self.coerce_numeric(name, &cells)?;
                    encoded.push((name.to_string(), values));
                }
                ColumnKind::Binary { one } => {
                    encoded.push((name.to_string(), encode_binary(&cells, one)));
                }
                ColumnKind::Boolean => {
                    let values = cells
                        .iter()
                        .map(|c| if matches!(c, FieldValue::Bool(true)) { 1.0 } else { 0.0 })
                        .collect();
                    encoded.push((name.to_string(), values));
                }
                ColumnKind::Passthrough => {
                    let values = cells
                        .iter()
                        .map(|c| c.as_number().map(|n| n as f32).unwrap_or(f32::NAN))
                        .collect();
                    encoded.push((name.to_string(), values));
                }
                ColumnKind::Categorical => {
                    encoded.extend(one_hot(name, &cells));
                }
            }
        }

        Ok(self.align(rows, encoded))
    }

    fn coerce_numeric(&self, field: &str, cells: &[&FieldValue]) -> Result<Vec<f32>, EncodeError> {
        cells
            .iter()
            .enumerate()
            .map(|(row, cell)| match cell.as_number() {
                Some(n) => Ok(n as f32),
                None => {
                    if self.config.numeric_policy == NumericPolicy::Strict {
                        if let FieldValue::Text(s) = cell {
                            if !s.trim().is_empty() && s.trim().parse::<f64>().is_err() {
                                return Err(EncodeError::InvalidNumeric {
                                    field: field.to_string(),
                                    row,
                                    value: s.clone(),
                                });
                            }
                        }
                    }
                    Ok(0.0)
                }
            })
            .collect()
    }

    /// Reindex to FEATURE_COLS: missing columns are zero, extras are dropped
    fn align(&self, rows: usize, encoded: Vec<(String, Vec<f32>)>) -> FeatureMatrix {
        let mut lookup: HashMap<&str, &[f32]> = HashMap::with_capacity(encoded.len());
        for (name, values) in &encoded {
            lookup.entry(name.as_str()).or_insert(values.as_slice());
        }

        let mut values = Array2::<f32>::zeros((rows, self.schema.len()));
        for (col, name) in self.schema.columns().iter().enumerate() {
            if let Some(column) = lookup.get(name.as_str()) {
                for (row, v) in column.iter().enumerate() {
                    values[[row, col]] = *v;
                }
            }
        }

        if log::log_enabled!(log::Level::Debug) {
            let dropped: Vec<&str> = encoded
                .iter()
                .map(|(name, _)| name.as_str())
                .filter(|name| !self.schema.contains(name))
                .collect();
            if !dropped.is_empty() {
                log::debug!("Dropped {} columns outside the feature schema: {:?}", dropped.len(), dropped);
            }
        }

        FeatureMatrix::new(Arc::clone(&self.schema), values)
    }
}

fn classify(name: &str, cells: &[&FieldValue]) -> ColumnKind {
    if NUMERIC_FIELDS.contains(&name) {
        return ColumnKind::Numeric;
    }
    if let Some(&(_, _, one)) = BINARY_FIELDS.iter().find(|(field, _, _)| *field == name) {
        return ColumnKind::Binary { one };
    }

    let has_text = cells.iter().any(|c| matches!(c, FieldValue::Text(_)));
    let bools = cells.iter().filter(|c| matches!(c, FieldValue::Bool(_))).count();
    let numbers = cells.iter().filter(|c| matches!(c, FieldValue::Number(_))).count();

    if !cells.is_empty() && bools == cells.len() {
        ColumnKind::Boolean
    } else if !has_text && bools == 0 && numbers > 0 {
        ColumnKind::Passthrough
    } else {
        // Text, bools mixed with anything else, or no values at all
        ColumnKind::Categorical
    }
}

/// Only the "one" value maps to 1; the "zero" value, unknown values and
/// nulls all map to 0.
fn encode_binary(cells: &[&FieldValue], one: &str) -> Vec<f32> {
    cells
        .iter()
        .map(|cell| match cell {
            FieldValue::Null => 0.0,
            FieldValue::Text(s) => if s.trim() == one { 1.0 } else { 0.0 },
            other => if other.to_string().trim() == one { 1.0 } else { 0.0 },
        })
        .collect()
}

/// Indicator columns `<field>_<level>` for every observed level except the
/// lexicographically first one.
fn one_hot(name: &str, cells: &[&FieldValue]) -> Vec<(String, Vec<f32>)> {
    let labels: Vec<Option<String>> = cells
        .iter()
        .map(|c| (!c.is_null()).then(|| c.to_string()))
        .collect();

    let levels: BTreeSet<&str> = labels.iter().flatten().map(String::as_str).collect();

    levels
        .into_iter()
        .skip(1)
        .map(|level| {
            let values = labels
                .iter()
                .map(|l| if l.as_deref() == Some(level) { 1.0 } else { 0.0 })
                .collect();
            (format!("{}_{}", name, level), values)
        })
        .collect()
}
