//! Classifier trait and common types

use async_trait::async_trait;
use reviewsense_core::{ClassProbabilities, Result, SentimentClass};
use serde::Serialize;
use std::fmt;

/// Trait for all sentiment classifiers
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify the given text
    async fn classify(&self, text: &str) -> Result<SentimentResult>;

    /// Get the classifier name
    fn name(&self) -> &str;
}

/// How a sentiment result was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnalysisMethod {
    /// Naive Bayes prediction
    #[serde(rename = "ML")]
    Ml,
    /// Keyword lexicon scoring
    #[serde(rename = "RuleBased")]
    RuleBased,
}

impl AnalysisMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ml => "ML",
            Self::RuleBased => "RuleBased",
        }
    }
}

impl fmt::Display for AnalysisMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of sentiment analysis
#[derive(Debug, Clone, Serialize)]
pub struct SentimentResult {
    /// Sentiment label
    pub sentiment: SentimentClass,

    /// Confidence for ML results, lexicon score for rule-based ones (0.0-1.0)
    pub score: f64,

    /// Which path produced the result
    pub method: AnalysisMethod,

    /// Per-class posterior (ML results only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<ClassProbabilities>,

    /// Latency in microseconds
    pub latency_us: u64,
}

impl SentimentResult {
    /// Create a new rule-based result
    pub fn rule_based(sentiment: SentimentClass, score: f64) -> Self {
        Self {
            sentiment,
            score,
            method: AnalysisMethod::RuleBased,
            probabilities: None,
            latency_us: 0,
        }
    }

    /// Create a new ML result from a posterior
    pub fn ml(
        sentiment: SentimentClass,
        confidence: f64,
        probabilities: ClassProbabilities,
    ) -> Self {
        Self {
            sentiment,
            score: confidence,
            method: AnalysisMethod::Ml,
            probabilities: Some(probabilities),
            latency_us: 0,
        }
    }

    /// Check if score exceeds threshold
    pub fn exceeds_threshold(&self, threshold: f64) -> bool {
        self.score > threshold
    }
}
