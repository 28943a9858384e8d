//! Features Module - Feature Encoding Engine
//!
//! Turns raw customer records into the matrix layout the model was trained
//! on. The schema is loaded from the artifact store; the encoding recipe is
//! fixed in code and must stay in lockstep with training.

pub mod schema;
pub mod matrix;
pub mod encoder;


// Re-export common types
pub use schema::{FeatureSchema, SchemaError};
pub use matrix::FeatureMatrix;
pub use encoder::{EncodeError, FeatureEncoder};
