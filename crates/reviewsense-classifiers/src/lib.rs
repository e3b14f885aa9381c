//! ReviewSense Classifiers
//!
//! Sentiment classification for free-text product comments.
//!
//! Two classifiers cooperate behind [`SentimentService`]:
//! - A multinomial Naive Bayes model trained on labeled comments, used when
//!   its confidence clears the configured threshold
//! - A lexicon scorer with phrase signals, used for everything else
//!
//! The Naive Bayes model is trained lazily, persisted as JSON and swapped
//! atomically on retrain so readers never observe a half-built model.

pub mod classifier;
pub mod config;
pub mod naive_bayes;
pub mod persistence;
pub mod rule_based;
pub mod service;
pub mod source;
pub mod tokenizer;
pub mod training_data;

pub use classifier::{AnalysisMethod, Classifier, SentimentResult};
pub use config::SentimentConfig;
pub use naive_bayes::{
    ClassCounts, ModelInfo, NaiveBayesClassifier, NaiveBayesModel, Prediction, TrainingSummary,
};
pub use persistence::ModelStore;
pub use rule_based::{RuleBasedScore, RuleBasedScorer};
pub use service::SentimentService;
pub use source::{CommentSource, InMemorySource, JsonLinesSource};
pub use tokenizer::tokenize;
pub use training_data::{assemble_training_data, balance_classes, synthetic_corpus};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::{AnalysisMethod, Classifier, SentimentResult};
    pub use crate::config::SentimentConfig;
    pub use crate::service::SentimentService;
    pub use crate::source::{CommentSource, InMemorySource, JsonLinesSource};
    pub use reviewsense_core::prelude::*;
}
