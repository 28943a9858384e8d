//! Configuration module

use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use churn_core::{
    EncoderConfig, FixedLocator, ModelLocator, NumericPolicy, PredictorConfig, RegistryLocator,
};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: IpAddr,

    /// Server port
    pub port: u16,

    /// Root of the local model registry
    pub model_registry: PathBuf,

    /// Glob (relative to the registry root) matching artifact directories
    pub model_glob: String,

    /// Explicit artifact directory; skips the registry search when set
    pub model_dir: Option<PathBuf>,

    /// Model file inside the artifact directory
    pub model_file: String,

    /// JSON list of training-time feature columns
    pub feature_columns_path: PathBuf,

    /// What to do with unparseable numeric fields
    pub numeric_policy: NumericPolicy,

    /// Run the data validator on every /predict request (log-only)
    pub validate_requests: bool,

    /// Environment (development, production)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        let predictor = PredictorConfig::default();
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8000,
            model_registry: PathBuf::from("./mlruns"),
            model_glob: RegistryLocator::DEFAULT_PATTERN.to_string(),
            model_dir: None,
            model_file: predictor.model_file,
            feature_columns_path: predictor.feature_columns_path,
            numeric_policy: NumericPolicy::default(),
            validate_requests: false,
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: env::var("HOST")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(defaults.host),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            model_registry: env::var("MODEL_REGISTRY")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_registry),

            model_glob: env::var("MODEL_GLOB").unwrap_or(defaults.model_glob),

            model_dir: env::var("MODEL_DIR").ok().map(PathBuf::from),

            model_file: env::var("MODEL_FILE").unwrap_or(defaults.model_file),

            feature_columns_path: env::var("FEATURE_COLUMNS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.feature_columns_path),

            numeric_policy: match env::var("NUMERIC_POLICY") {
                Ok(raw) => raw.parse().unwrap_or_else(|e| {
                    tracing::warn!("{}; falling back to {:?}", e, defaults.numeric_policy);
                    defaults.numeric_policy
                }),
                Err(_) => defaults.numeric_policy,
            },

            validate_requests: env::var("VALIDATE_REQUESTS")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.validate_requests),

            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Where to look for the active model
    pub fn locator(&self) -> Box<dyn ModelLocator> {
        match &self.model_dir {
            Some(dir) => Box::new(FixedLocator(dir.clone())),
            None => Box::new(
                RegistryLocator::new(&self.model_registry).with_pattern(self.model_glob.clone()),
            ),
        }
    }

    pub fn predictor_config(&self) -> PredictorConfig {
        PredictorConfig {
            model_file: self.model_file.clone(),
            feature_columns_path: self.feature_columns_path.clone(),
            encoder: EncoderConfig {
                numeric_policy: self.numeric_policy,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.model_glob, "*/models/*/artifacts");
        assert_eq!(config.numeric_policy, NumericPolicy::Lenient);
        assert!(!config.is_production());
    }

    #[test]
    fn test_predictor_config_carries_policy() {
        let config = Config {
            numeric_policy: NumericPolicy::Strict,
            model_file: "churn.onnx".to_string(),
            ..Default::default()
        };
        let predictor = config.predictor_config();
        assert_eq!(predictor.model_file, "churn.onnx");
        assert_eq!(predictor.encoder.numeric_policy, NumericPolicy::Strict);
    }
}
