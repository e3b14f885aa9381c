//! ReviewSense Core
//!
//! Core types and error handling shared across ReviewSense components.
//!
//! This crate provides:
//! - The closed five-class sentiment label set
//! - Labeled training examples and per-class probability vectors
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{ClassProbabilities, SentimentClass, TrainingExample};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{ClassProbabilities, SentimentClass, TrainingExample};
}
