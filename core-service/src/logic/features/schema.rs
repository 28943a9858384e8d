//! Feature Schema - the training-time column layout (FEATURE_COLS)
//!
//! **This file controls what the model sees**
//!
//! The list is persisted next to the model at training time and loaded once
//! at startup. Every encoded matrix is reindexed to exactly these columns,
//! in this order.

use crc32fast::Hasher;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read feature columns from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse feature columns in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("feature column list is empty")]
    Empty,

    #[error("duplicate feature column: {0}")]
    Duplicate(String),
}

/// Ordered, duplicate-free list of feature column names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    columns: Vec<String>,
    hash: u32,
}

impl FeatureSchema {
    pub fn new(columns: Vec<String>) -> Result<Self, SchemaError> {
        if columns.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(SchemaError::Duplicate(name.clone()));
            }
        }

        let hash = compute_layout_hash(&columns);
        Ok(Self { columns, hash })
    }

    /// Load FEATURE_COLS from a JSON array file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        log::info!("Loading feature columns from: {}", path.display());

        let raw = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let columns: Vec<String> = serde_json::from_str(&raw).map_err(|source| SchemaError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let schema = Self::new(columns)?;
        log::info!(
            "Loaded {} feature columns (layout hash: {:08x})",
            schema.len(),
            schema.layout_hash()
        );
        Ok(schema)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Get column index by name (O(n) but columns are few)
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    pub fn layout_hash(&self) -> u32 {
        self.hash
    }
}

/// CRC32 over the ordered column names. Used to spot schema swaps in logs.
fn compute_layout_hash(columns: &[String]) -> u32 {
    let mut hasher = Hasher::new();
    for name in columns {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"["tenure", "MonthlyCharges", "Contract_One year"]"#).unwrap();

        let schema = FeatureSchema::load(file.path()).unwrap();
        assert_eq!(schema.len(), 3);
        assert_eq!(schema.index_of("Contract_One year"), Some(2));
        assert_eq!(schema.index_of("nonexistent"), None);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = FeatureSchema::load(dir.path().join("feature_columns.json"));
        assert!(matches!(result, Err(SchemaError::Io { .. })));
    }

    #[test]
    fn test_unparseable_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"tenure": 0}}"#).unwrap();

        let result = FeatureSchema::load(file.path());
        assert!(matches!(result, Err(SchemaError::Parse { .. })));
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        assert!(matches!(FeatureSchema::new(vec![]), Err(SchemaError::Empty)));
        assert!(matches!(
            FeatureSchema::new(names(&["a", "b", "a"])),
            Err(SchemaError::Duplicate(name)) if name == "a"
        ));
    }

    #[test]
    fn test_layout_hash_depends_on_order() {
        let a = FeatureSchema::new(names(&["tenure", "gender"])).unwrap();
        let b = FeatureSchema::new(names(&["gender", "tenure"])).unwrap();
        let c = FeatureSchema::new(names(&["tenure", "gender"])).unwrap();

        assert_ne!(a.layout_hash(), b.layout_hash());
        assert_eq!(a.layout_hash(), c.layout_hash());
        assert_ne!(a.layout_hash(), 0);
    }
}
