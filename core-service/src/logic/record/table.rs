//! Raw Table - a batch of records viewed column by column

use thiserror::Error;

use super::{FieldValue, RawRecord};

static NULL: FieldValue = FieldValue::Null;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("expected a JSON array of records, got {0}")]
    NotAnArray(&'static str),

    #[error("row {index} is not a JSON object")]
    RowNotAnObject { index: usize },
}

/// Column-addressable view over a batch of raw records.
///
/// Columns are the union of record keys in first-seen order. A key missing
/// from a row reads as [`FieldValue::Null`].
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<FieldValue>>,
}

impl RawTable {
    pub fn from_records(records: &[RawRecord]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in records {
            for key in record.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.to_string());
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|c| record.get(c).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    /// Wrap a single record in a one-row table
    pub fn from_record(record: &RawRecord) -> Self {
        Self::from_records(std::slice::from_ref(record))
    }

    /// Build from a JSON array of objects. Anything else is structural misuse.
    pub fn from_json(value: serde_json::Value) -> Result<Self, TableError> {
        let items = match value {
            serde_json::Value::Array(items) => items,
            serde_json::Value::Object(_) => return Err(TableError::NotAnArray("an object")),
            serde_json::Value::String(_) => return Err(TableError::NotAnArray("a string")),
            serde_json::Value::Number(_) => return Err(TableError::NotAnArray("a number")),
            serde_json::Value::Bool(_) => return Err(TableError::NotAnArray("a boolean")),
            serde_json::Value::Null => return Err(TableError::NotAnArray("null")),
        };

        let records = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                serde_json::Value::Object(map) => Ok(RawRecord::from(map)),
                _ => Err(TableError::RowNotAnObject { index }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_records(&records))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cells of one column, top to bottom. `None` if the column does not exist.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &FieldValue> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row.get(idx).unwrap_or(&NULL)))
    }

    pub fn cell(&self, row: usize, column: usize) -> &FieldValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&NULL)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_union_of_columns() {
        let records = vec![
            RawRecord::new().with("a", 1.0).with("b", "x"),
            RawRecord::new().with("c", true).with("a", 2.0),
        ];
        let table = RawTable::from_records(&records);

        assert_eq!(table.columns(), &["a", "b", "c"]);
        assert_eq!(table.row_count(), 2);
        assert!(table.cell(1, 1).is_null());
        assert!(table.cell(0, 2).is_null());
        assert_eq!(table.cell(1, 0), &FieldValue::Number(2.0));
    }

    #[test]
    fn test_from_json_rejects_non_tabular() {
        assert!(matches!(
            RawTable::from_json(json!({"a": 1})),
            Err(TableError::NotAnArray(_))
        ));
        assert!(matches!(
            RawTable::from_json(json!([{"a": 1}, 5])),
            Err(TableError::RowNotAnObject { index: 1 })
        ));
    }

    #[test]
    fn test_missing_column() {
        let table = RawTable::from_json(json!([{"a": 1}])).unwrap();
        assert!(table.column("b").is_none());
        assert_eq!(table.column("a").unwrap().count(), 1);
    }
}
