//! Prediction Service - encode → infer → decode for one record
//!
//! `ChurnPredictor` is built once at startup and shared read-only by every
//! request handler. There is no global model state: whoever needs to
//! predict holds a handle to the predictor.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

use crate::logic::config::{EncoderConfig, PredictorConfig};
use crate::logic::features::{EncodeError, FeatureEncoder, FeatureMatrix, FeatureSchema, SchemaError};
use crate::logic::model::inference::file_checksum;
use crate::logic::model::{
    ChurnLabel, InferenceEngine, InferenceError, LocatorError, ModelLocator, ModelMetadata,
    OnnxEngine,
};
use crate::logic::record::{RawRecord, RawTable};
use crate::logic::validation::{validate_table, ValidationReport};

// ============================================================================
// ERRORS
// ============================================================================

/// Anything that keeps the predictor from being built. Fatal at startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("No trained model found: {0}")]
    Locator(#[from] LocatorError),

    #[error("Failed to load feature columns: {0}")]
    Schema(#[from] SchemaError),

    #[error("Failed to load model: {0}")]
    Model(#[from] InferenceError),

    #[error("Failed to checksum model file: {0}")]
    Checksum(#[from] std::io::Error),
}

/// Per-request failure. Never crashes the process.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("Prediction failed: {0}")]
    Inference(String),
}

// ============================================================================
// STATUS
// ============================================================================

/// Engine status for the status endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub engine: String,
    pub metadata: Option<ModelMetadata>,
    pub feature_count: usize,
    pub layout_hash: u32,
    pub inference_count: u64,
    pub avg_latency_ms: f32,
}

// ============================================================================
// PREDICTOR
// ============================================================================

pub struct ChurnPredictor {
    engine: Box<dyn InferenceEngine>,
    encoder: FeatureEncoder,
    metadata: Option<ModelMetadata>,
    latency_sum_us: AtomicU64,
    inference_count: AtomicU64,
}

impl ChurnPredictor {
    /// Build around any engine. No filesystem access.
    pub fn new(
        engine: Box<dyn InferenceEngine>,
        schema: Arc<FeatureSchema>,
        encoder_config: EncoderConfig,
    ) -> Self {
        Self {
            engine,
            encoder: FeatureEncoder::new(schema, encoder_config),
            metadata: None,
            latency_sum_us: AtomicU64::new(0),
            inference_count: AtomicU64::new(0),
        }
    }

    /// Resolve the active model, load FEATURE_COLS and the ONNX session.
    ///
    /// Blocking; meant to run once before the server accepts traffic.
    pub fn initialize(
        locator: &dyn ModelLocator,
        config: &PredictorConfig,
    ) -> Result<Self, StartupError> {
        let artifact_dir = locator.resolve()?;
        let schema = Arc::new(FeatureSchema::load(&config.feature_columns_path)?);

        let model_path = artifact_dir.join(&config.model_file);
        let engine = OnnxEngine::load(&model_path)?;
        let sha256 = file_checksum(&model_path)?;

        let metadata = ModelMetadata {
            model_path,
            artifact_dir,
            engine: engine.name().to_string(),
            sha256,
            feature_count: schema.len(),
            layout_hash: schema.layout_hash(),
            loaded_at: chrono::Utc::now(),
        };

        log::info!(
            "Predictor ready: {} ({} features, model sha256 {})",
            metadata.model_path.display(),
            metadata.feature_count,
            &metadata.sha256[..12.min(metadata.sha256.len())]
        );

        Ok(Self::new(Box::new(engine), schema, config.encoder.clone()).with_metadata(metadata))
    }

    pub fn with_metadata(mut self, metadata: ModelMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn schema(&self) -> &FeatureSchema {
        self.encoder.schema()
    }

    pub fn metadata(&self) -> Option<&ModelMetadata> {
        self.metadata.as_ref()
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    /// Encode a batch without running the model
    pub fn encode(&self, table: &RawTable) -> Result<FeatureMatrix, EncodeError> {
        self.encoder.encode(table)
    }

    /// Run the data-quality rules over a batch
    pub fn validate(&self, table: &RawTable) -> ValidationReport {
        validate_table(table)
    }

    pub fn predict(&self, record: &RawRecord) -> Result<ChurnLabel, PredictError> {
        let features = self.encoder.encode_record(record)?;
        log::trace!("Encoded features: {}", features.row_log_entry(0));

        let start = Instant::now();
        let output = self
            .engine
            .predict(&features)
            .map_err(|e| PredictError::Inference(e.to_string()))?;
        let elapsed_us = start.elapsed().as_micros() as u64;

        self.latency_sum_us.fetch_add(elapsed_us, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);

        let label = ChurnLabel::from_prediction(&output);
        log::debug!("Prediction {:?} -> {} ({} us)", output, label, elapsed_us);
        Ok(label)
    }

    pub fn status(&self) -> EngineStatus {
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.inference_count.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f32 / count as f32) / 1000.0 } else { 0.0 };

        EngineStatus {
            engine: self.engine.name().to_string(),
            metadata: self.metadata.clone(),
            feature_count: self.schema().len(),
            layout_hash: self.schema().layout_hash(),
            inference_count: count,
            avg_latency_ms: avg,
        }
    }
}
