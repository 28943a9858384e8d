//! Model Locator - finds the active model artifact directory
//!
//! The server never hardcodes where the model lives. It asks a locator once
//! at startup; tests hand in a fixed directory instead of a registry tree.

use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocatorError {
    #[error("invalid registry pattern: {0}")]
    InvalidPattern(#[from] glob::PatternError),

    #[error("no trained model found under {root} matching {pattern}")]
    NoModelFound { root: PathBuf, pattern: String },

    #[error("model directory does not exist: {0}")]
    NotFound(PathBuf),
}

/// Resolve the directory holding the active model's artifacts
pub trait ModelLocator: Send + Sync {
    fn resolve(&self) -> Result<PathBuf, LocatorError>;
}

/// Picks the most recently modified artifact directory in a local registry.
///
/// The default pattern matches an MLflow-style tree:
/// `<root>/<experiment>/models/<model-id>/artifacts`.
#[derive(Debug, Clone)]
pub struct RegistryLocator {
    root: PathBuf,
    pattern: String,
}

impl RegistryLocator {
    pub const DEFAULT_PATTERN: &'static str = "*/models/*/artifacts";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            pattern: Self::DEFAULT_PATTERN.to_string(),
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    fn candidates(&self) -> Result<Vec<(PathBuf, SystemTime)>, LocatorError> {
        // The root is literal; only the pattern part may contain wildcards
        let root = glob::Pattern::escape(&self.root.to_string_lossy());
        let full = format!("{}/{}", root.trim_end_matches('/'), self.pattern);

        let mut found = Vec::new();
        for entry in glob::glob(&full)? {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    log::warn!("Skipping unreadable registry entry: {}", e);
                    continue;
                }
            };
            if !path.is_dir() {
                continue;
            }
            match std::fs::metadata(&path).and_then(|m| m.modified()) {
                Ok(modified) => found.push((path, modified)),
                Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
            }
        }
        Ok(found)
    }
}

impl ModelLocator for RegistryLocator {
    fn resolve(&self) -> Result<PathBuf, LocatorError> {
        log::info!(
            "Looking for trained model under {} ({})",
            self.root.display(),
            self.pattern
        );

        let candidates = self.candidates()?;
        log::debug!("Found {} candidate model directories", candidates.len());

        let (latest, _) = candidates
            .into_iter()
            .max_by_key(|(_, modified)| *modified)
            .ok_or_else(|| LocatorError::NoModelFound {
                root: self.root.clone(),
                pattern: self.pattern.clone(),
            })?;

        log::info!("Found model at: {}", latest.display());
        Ok(latest)
    }
}

/// Always resolves to one directory
#[derive(Debug, Clone)]
pub struct FixedLocator(pub PathBuf);

impl ModelLocator for FixedLocator {
    fn resolve(&self) -> Result<PathBuf, LocatorError> {
        if self.0.is_dir() {
            Ok(self.0.clone())
        } else {
            Err(LocatorError::NotFound(self.0.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::time::Duration;

    fn make_artifacts(root: &Path, experiment: &str, model: &str, age_secs: u64) -> PathBuf {
        let dir = root.join(experiment).join("models").join(model).join("artifacts");
        fs::create_dir_all(&dir).unwrap();
        let modified = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000 - age_secs);
        File::open(&dir).unwrap().set_modified(modified).unwrap();
        dir
    }

    #[test]
    fn test_picks_most_recent_directory() {
        let root = tempfile::tempdir().unwrap();
        make_artifacts(root.path(), "0", "m-old", 3600);
        let newest = make_artifacts(root.path(), "1", "m-new", 10);
        make_artifacts(root.path(), "1", "m-mid", 600);

        let locator = RegistryLocator::new(root.path());
        assert_eq!(locator.resolve().unwrap(), newest);
    }

    #[test]
    fn test_ignores_files_matching_pattern() {
        let root = tempfile::tempdir().unwrap();
        let models = root.path().join("0").join("models").join("m-1");
        fs::create_dir_all(&models).unwrap();
        fs::write(models.join("artifacts"), b"not a directory").unwrap();

        let result = RegistryLocator::new(root.path()).resolve();
        assert!(matches!(result, Err(LocatorError::NoModelFound { .. })));
    }

    #[test]
    fn test_empty_registry() {
        let root = tempfile::tempdir().unwrap();
        let result = RegistryLocator::new(root.path().join("mlruns")).resolve();
        assert!(matches!(result, Err(LocatorError::NoModelFound { .. })));
    }

    #[test]
    fn test_invalid_pattern() {
        let root = tempfile::tempdir().unwrap();
        let result = RegistryLocator::new(root.path()).with_pattern("models/[").resolve();
        assert!(matches!(result, Err(LocatorError::InvalidPattern(_))));
    }

    #[test]
    fn test_fixed_locator() {
        let root = tempfile::tempdir().unwrap();
        assert_eq!(
            FixedLocator(root.path().to_path_buf()).resolve().unwrap(),
            root.path()
        );
        assert!(matches!(
            FixedLocator(root.path().join("missing")).resolve(),
            Err(LocatorError::NotFound(_))
        ));
    }
}
