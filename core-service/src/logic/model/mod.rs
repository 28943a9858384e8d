//! Model Module - AI/ML Inference Engine
//!
//! Separates model discovery, loading and inference from the encoding
//! logic, so the engine can be swapped (or stubbed in tests).

pub mod inference;
pub mod locator;
pub mod label;

// Re-export common types
pub use inference::{InferenceEngine, InferenceError, ModelMetadata, OnnxEngine};
pub use locator::{FixedLocator, LocatorError, ModelLocator, RegistryLocator};
pub use label::ChurnLabel;
