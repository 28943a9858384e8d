//! Feature Matrix - Core data structure for model input
//!
//! Rows are records, columns are exactly the schema's FEATURE_COLS.

use ndarray::{Array2, ArrayView1};
use std::sync::Arc;

use super::schema::FeatureSchema;

#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    schema: Arc<FeatureSchema>,
    values: Array2<f32>,
}

impl FeatureMatrix {
    /// Caller guarantees `values.ncols() == schema.len()`
    pub(crate) fn new(schema: Arc<FeatureSchema>, values: Array2<f32>) -> Self {
        debug_assert_eq!(values.ncols(), schema.len());
        Self { schema, values }
    }

    pub fn columns(&self) -> &[String] {
        self.schema.columns()
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn values(&self) -> &Array2<f32> {
        &self.values
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    pub fn row(&self, index: usize) -> Option<ArrayView1<'_, f32>> {
        (index < self.nrows()).then(|| self.values.row(index))
    }

    /// Get a cell by row index and column name
    pub fn get(&self, row: usize, column: &str) -> Option<f32> {
        let col = self.schema.index_of(column)?;
        self.values.get((row, col)).copied()
    }

    /// Convert a row to a JSON object keyed by column name, for logging
    pub fn row_log_entry(&self, index: usize) -> serde_json::Value {
        let Some(row) = self.row(index) else {
            return serde_json::Value::Null;
        };
        let named: serde_json::Map<String, serde_json::Value> = self
            .columns()
            .iter()
            .zip(row.iter())
            .map(|(name, value)| (name.clone(), serde_json::json!(*value)))
            .collect();
        serde_json::json!({
            "layout_hash": self.schema.layout_hash(),
            "named_values": named,
        })
    }
}
