//! Logic Module - Business Logic & Engines
//!
//! - `record/` - raw customer records and batches
//! - `features/` - feature schema and encoder (raw record → FEATURE_COLS)
//! - `validation/` - data quality rules over record batches
//! - `model/` - model discovery, ONNX inference, label decoding
//! - `service` - the predictor wiring it all together

pub mod config;
pub mod record;
pub mod features;
pub mod validation;
pub mod model;
pub mod service;
