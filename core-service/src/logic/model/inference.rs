//! Inference Engine - ONNX Runtime Integration
//!
//! Loads and runs the frozen churn classifier.
//! The engine only sees aligned feature matrices; encoding happens upstream.

use chrono::{DateTime, Utc};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::logic::features::FeatureMatrix;

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("model not found: {0}")]
    ModelNotFound(PathBuf),

    #[error("failed to load model: {0}")]
    Load(String),

    #[error("inference failed: {0}")]
    Runtime(String),

    #[error("unexpected model output: {0}")]
    Output(String),
}

// ============================================================================
// INFERENCE ENGINE TRAIT
// ============================================================================

/// A frozen binary classifier.
///
/// `predict` returns one scalar per input row. Implementations must be safe
/// to call from many request handlers at once.
pub trait InferenceEngine: Send + Sync {
    fn name(&self) -> &str;
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>, InferenceError>;
}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Model metadata, captured once at load time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_path: PathBuf,
    pub artifact_dir: PathBuf,
    pub engine: String,
    pub sha256: String,
    pub feature_count: usize,
    pub layout_hash: u32,
    pub loaded_at: DateTime<Utc>,
}

/// SHA-256 of the model file, hex encoded
pub fn file_checksum(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

/// ONNX Runtime session.
///
/// `Session::run` needs `&mut self`, so calls are serialized through a mutex.
pub struct OnnxEngine {
    session: Mutex<Session>,
    output_name: String,
}

impl OnnxEngine {
    /// Load ONNX model from file
    pub fn load(model_path: &Path) -> Result<Self, InferenceError> {
        log::info!("Loading ONNX model from: {}", model_path.display());

        if !model_path.is_file() {
            return Err(InferenceError::ModelNotFound(model_path.to_path_buf()));
        }

        let session = Session::builder()
            .map_err(|e| InferenceError::Load(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError::Load(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| InferenceError::Load(format!("Failed to load model: {}", e)))?;

        // Classifiers exported from sklearn put the label tensor first
        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| InferenceError::Load("No output defined".to_string()))?;

        log::info!("ONNX model loaded successfully (output: {})", output_name);

        Ok(Self {
            session: Mutex::new(session),
            output_name,
        })
    }
}

impl InferenceEngine for OnnxEngine {
    fn name(&self) -> &str {
        "onnx"
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>, InferenceError> {
        let input_tensor = Value::from_array(features.values().clone())
            .map_err(|e| InferenceError::Runtime(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::Runtime(e.to_string()))?;

        let output = outputs
            .get(&self.output_name)
            .ok_or_else(|| InferenceError::Output(format!("missing output '{}'", self.output_name)))?;

        // Integer class labels first, then plain float scores
        if let Ok((_, labels)) = output.try_extract_tensor::<i64>() {
            return Ok(labels.iter().map(|&v| v as f64).collect());
        }

        let (_, values) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::Output(format!("Extract error: {}", e)))?;

        Ok(values.iter().map(|&v| v as f64).collect())
    }
}
