//! Error types for ReviewSense

/// Result type alias using ReviewSense's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for ReviewSense operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Prediction requested before any successful training run
    #[error("model not trained")]
    UntrainedModel,

    /// Too few labeled examples to train on
    #[error("insufficient training data: {found} examples, need at least {required}")]
    InsufficientTrainingData { found: usize, required: usize },

    /// Model load/save failures
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Labeled comment source errors
    #[error("comment source error: {0}")]
    Source(String),

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new insufficient training data error
    pub fn insufficient_data(found: usize, required: usize) -> Self {
        Self::InsufficientTrainingData { found, required }
    }

    /// Create a new persistence error
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new comment source error
    pub fn comment_source(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the error means the model has nothing to predict with
    pub fn is_untrained(&self) -> bool {
        matches!(self, Self::UntrainedModel)
    }
}
