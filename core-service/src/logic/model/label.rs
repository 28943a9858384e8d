//! Churn label decoding

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{LABEL_CHURN, LABEL_NO_CHURN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChurnLabel {
    #[serde(rename = "Likely to churn")]
    LikelyToChurn,
    #[serde(rename = "Not likely to churn")]
    NotLikelyToChurn,
}

impl ChurnLabel {
    /// Decode raw model output for a single record.
    ///
    /// A one-element output is unwrapped to its scalar. Only an exact 1 means
    /// churn; there is no probability threshold. Any other shape can never
    /// equal 1 and decodes as no churn.
    pub fn from_prediction(output: &[f64]) -> Self {
        match output {
            [scalar] if *scalar == 1.0 => ChurnLabel::LikelyToChurn,
            _ => ChurnLabel::NotLikelyToChurn,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChurnLabel::LikelyToChurn => LABEL_CHURN,
            ChurnLabel::NotLikelyToChurn => LABEL_NO_CHURN,
        }
    }
}

impl fmt::Display for ChurnLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
