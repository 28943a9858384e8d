//! Runtime knobs for the encoder and the predictor

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// What the encoder does with a numeric field that fails to parse.
///
/// `Lenient` turns it into 0, which is how the model was fed at training
/// time. It also hides bad input, so `Strict` exists for callers that would
/// rather reject the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericPolicy {
    #[default]
    Lenient,
    Strict,
}

impl FromStr for NumericPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(NumericPolicy::Lenient),
            "strict" => Ok(NumericPolicy::Strict),
            other => Err(format!("unknown numeric policy: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EncoderConfig {
    pub numeric_policy: NumericPolicy,
}

/// Everything `ChurnPredictor::initialize` needs besides the locator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Model file name inside the resolved artifact directory
    pub model_file: String,

    /// JSON file holding FEATURE_COLS
    pub feature_columns_path: PathBuf,

    pub encoder: EncoderConfig,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            model_file: "model.onnx".to_string(),
            feature_columns_path: PathBuf::from("artifacts").join("feature_columns.json"),
            encoder: EncoderConfig::default(),
        }
    }
}
