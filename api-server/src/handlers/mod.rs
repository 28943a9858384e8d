//! HTTP handlers

pub mod health;
pub mod predict;
pub mod validate;
pub mod model;
pub mod ui;
