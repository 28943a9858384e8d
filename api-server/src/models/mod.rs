//! Request/response models

pub mod customer;

pub use customer::*;
