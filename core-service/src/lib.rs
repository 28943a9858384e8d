//! Churn Serving Core
//!
//! Feature encoding, data validation and model inference for the customer
//! churn classifier. The HTTP layer lives in `churn-server`.
//!
//! # Architecture
//!
//! ```text
//! RawRecord ──► (validate) ──► FeatureEncoder ──► InferenceEngine ──► ChurnLabel
//!                                   ▲                   ▲
//!                             FeatureSchema        ModelLocator
//!                         (feature_columns.json)  (model registry)
//! ```

pub mod constants;
pub mod logic;

pub use logic::config::{EncoderConfig, NumericPolicy, PredictorConfig};
pub use logic::features::{EncodeError, FeatureEncoder, FeatureMatrix, FeatureSchema, SchemaError};
pub use logic::model::{
    ChurnLabel, FixedLocator, InferenceEngine, InferenceError, LocatorError, ModelLocator,
    ModelMetadata, OnnxEngine, RegistryLocator,
};
pub use logic::record::{FieldValue, RawRecord, RawTable, TableError};
pub use logic::service::{ChurnPredictor, EngineStatus, PredictError, StartupError};
pub use logic::validation::{validate_table, ValidationReport};
