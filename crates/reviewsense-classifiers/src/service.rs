//! Hybrid sentiment service
//!
//! Owns one Naive Bayes classifier and one rule-based scorer. Each request
//! is answered by the ML model when it is confident enough and by the
//! lexicon otherwise. The model is trained lazily on first use, or reloaded
//! from disk when a large enough persisted model exists.

use crate::classifier::{Classifier, SentimentResult};
use crate::config::SentimentConfig;
use crate::naive_bayes::{ModelInfo, NaiveBayesClassifier, TrainingSummary};
use crate::persistence::ModelStore;
use crate::rule_based::{RuleBasedScore, RuleBasedScorer};
use crate::source::CommentSource;
use crate::training_data::assemble_training_data;
use parking_lot::Mutex;
use reviewsense_core::{Error, Result, SentimentClass, TrainingExample};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Shared sentiment analysis service.
///
/// Construct once at start-up and share behind an `Arc`.
pub struct SentimentService {
    config: SentimentConfig,
    naive_bayes: NaiveBayesClassifier,
    rule_based: RuleBasedScorer,
    source: Arc<dyn CommentSource>,
    /// When the last first-use training attempt failed
    last_bootstrap_failure: Mutex<Option<Instant>>,
}

impl SentimentService {
    /// Create a new service reading labeled comments from `source`
    pub fn new(config: SentimentConfig, source: Arc<dyn CommentSource>) -> Result<Self> {
        config.validate()?;

        let store = ModelStore::new(config.model_path.clone());
        let naive_bayes = NaiveBayesClassifier::new(store, config.smoothing_alpha);

        info!(
            "Sentiment service configured (model: {}, confidence threshold: {})",
            config.model_path.display(),
            config.confidence_threshold
        );

        Ok(Self {
            naive_bayes,
            rule_based: RuleBasedScorer::new()?,
            source,
            last_bootstrap_failure: Mutex::new(None),
            config,
        })
    }

    pub fn config(&self) -> &SentimentConfig {
        &self.config
    }

    pub fn naive_bayes(&self) -> &NaiveBayesClassifier {
        &self.naive_bayes
    }

    pub fn rule_based(&self) -> &RuleBasedScorer {
        &self.rule_based
    }

    /// Analyze one comment.
    ///
    /// Never fails: any problem with the ML path routes to the lexicon.
    pub async fn analyze_sentiment(&self, text: &str) -> SentimentResult {
        let start = Instant::now();

        self.bootstrap().await;

        let mut result = match self.naive_bayes.predict(text) {
            Ok(prediction) if prediction.confidence > self.config.confidence_threshold => {
                debug!(
                    label = %prediction.label,
                    confidence = prediction.confidence,
                    "ML prediction accepted"
                );
                SentimentResult::ml(
                    prediction.label,
                    prediction.confidence,
                    prediction.probabilities,
                )
            }
            Ok(prediction) => {
                debug!(
                    label = %prediction.label,
                    confidence = prediction.confidence,
                    "ML confidence too low, falling back to rule-based scoring"
                );
                self.score_rule_based(text)
            }
            Err(e) => {
                debug!("ML prediction failed ({}), using rule-based scoring", e);
                self.score_rule_based(text)
            }
        };

        result.latency_us = start.elapsed().as_micros() as u64;

        metrics::counter!("reviewsense_analyses_total", "method" => result.method.as_str())
            .increment(1);
        metrics::histogram!("reviewsense_analysis_latency_us").record(result.latency_us as f64);

        result
    }

    /// Train on first use. After a failure, further attempts wait for the
    /// configured retry interval.
    async fn bootstrap(&self) {
        if self.naive_bayes.is_trained() {
            return;
        }

        let last_failure = *self.last_bootstrap_failure.lock();
        if let Some(failed_at) = last_failure {
            if failed_at.elapsed() < self.config.training_retry_interval() {
                return;
            }
        }

        match self.ensure_trained().await {
            Ok(()) => *self.last_bootstrap_failure.lock() = None,
            Err(e) => {
                warn!("Naive Bayes model unavailable, using rule-based scoring: {}", e);
                *self.last_bootstrap_failure.lock() = Some(Instant::now());
            }
        }
    }

    fn score_rule_based(&self, text: &str) -> SentimentResult {
        let RuleBasedScore { label, score } = self.rule_based.score(text);
        SentimentResult::rule_based(label, score)
    }

    /// Rebuild the model from the comment source and the built-in corpus.
    ///
    /// On failure the current model stays live.
    pub async fn retrain(&self) -> Result<TrainingSummary> {
        info!("Retraining sentiment model");

        let examples = self.training_data().await?;
        let summary = self.naive_bayes.train(examples).await?;

        metrics::counter!("reviewsense_retrains_total").increment(1);
        Ok(summary)
    }

    /// Load or train a model if none is live yet
    pub async fn ensure_trained(&self) -> Result<()> {
        self.naive_bayes
            .ensure_trained(self.config.min_persisted_examples, || self.training_data())
            .await
    }

    async fn training_data(&self) -> Result<Vec<TrainingExample>> {
        let existing = self.source.labeled_comments().await?;
        let examples = assemble_training_data(existing, &self.config);

        if examples.len() < self.config.min_training_examples {
            warn!(
                "Only {} training examples assembled, need {}; skipping training",
                examples.len(),
                self.config.min_training_examples
            );
            return Err(Error::insufficient_data(
                examples.len(),
                self.config.min_training_examples,
            ));
        }

        Ok(examples)
    }

    /// Statistics of the live model
    pub fn model_info(&self) -> ModelInfo {
        self.naive_bayes.snapshot().info()
    }

    /// Most frequent tokens learned for a class
    pub fn top_words(&self, class: SentimentClass, n: usize) -> Vec<(String, u64)> {
        self.naive_bayes.snapshot().top_words(class, n)
    }
}

#[async_trait::async_trait]
impl Classifier for SentimentService {
    async fn classify(&self, text: &str) -> Result<SentimentResult> {
        Ok(self.analyze_sentiment(text).await)
    }

    fn name(&self) -> &str {
        "hybrid"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::AnalysisMethod;
    use crate::source::InMemorySource;
    use tempfile::TempDir;

    fn service_in(dir: &TempDir, config: SentimentConfig) -> SentimentService {
        let config = SentimentConfig {
            model_path: dir.path().join("model.json"),
            ..config
        };
        SentimentService::new(config, Arc::new(InMemorySource::default())).unwrap()
    }

    #[tokio::test]
    async fn test_confident_prediction_uses_ml() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir, SentimentConfig::default());

        let result = service
            .analyze_sentiment("This product is absolutely excellent and perfect")
            .await;

        assert_eq!(result.method, AnalysisMethod::Ml);
        assert_eq!(result.sentiment, SentimentClass::VeryPositive);
        assert!(result.score > 0.6);
        let probabilities = result.probabilities.unwrap();
        assert!((probabilities.total() - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_low_confidence_falls_back() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir, SentimentConfig::default());

        // Only unseen tokens, so the posterior stays close to uniform.
        let result = service.analyze_sentiment("zzz qqq xxx").await;

        assert_eq!(result.method, AnalysisMethod::RuleBased);
        assert_eq!(result.sentiment, SentimentClass::Neutral);
        assert_eq!(result.score, 0.5);
    }

    #[tokio::test]
    async fn test_threshold_of_one_always_falls_back() {
        let dir = TempDir::new().unwrap();
        let config = SentimentConfig {
            confidence_threshold: 1.0,
            ..Default::default()
        };
        let service = service_in(&dir, config);

        let result = service.analyze_sentiment("terrible awful broken").await;
        assert_eq!(result.method, AnalysisMethod::RuleBased);
        assert_eq!(result.sentiment, SentimentClass::VeryNegative);
    }

    #[tokio::test]
    async fn test_insufficient_data_uses_rule_based() {
        let dir = TempDir::new().unwrap();
        let config = SentimentConfig {
            include_synthetic: false,
            ..Default::default()
        };
        let service = service_in(&dir, config);

        let result = service.analyze_sentiment("excellent perfect best").await;
        assert_eq!(result.method, AnalysisMethod::RuleBased);
        assert_eq!(result.sentiment, SentimentClass::VeryPositive);
        assert!(!service.naive_bayes().is_trained());

        let err = service.retrain().await.unwrap_err();
        assert!(matches!(err, Error::InsufficientTrainingData { found: 0, required: 10 }));
    }

    #[tokio::test]
    async fn test_retrain_reports_summary() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir, SentimentConfig::default());

        let summary = service.retrain().await.unwrap();
        assert_eq!(summary.training_examples, 25);
        assert!(summary.vocabulary_size > 0);
        assert!(summary.class_distribution.values().all(|&n| n == 5));

        let info = service.model_info();
        assert_eq!(info.total_training_examples, 25);
        assert_eq!(info.vocabulary_size, summary.vocabulary_size);
        assert!(dir.path().join("model.json").exists());
    }

    #[tokio::test]
    async fn test_persisted_model_reused() {
        let dir = TempDir::new().unwrap();
        service_in(&dir, SentimentConfig::default())
            .retrain()
            .await
            .unwrap();

        // Second service starts cold but finds the saved model on disk.
        let service = service_in(&dir, SentimentConfig::default());
        service.ensure_trained().await.unwrap();
        assert_eq!(service.model_info().total_training_examples, 25);
    }

    #[tokio::test]
    async fn test_classifier_trait_delegates() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir, SentimentConfig::default());

        let result = service.classify("zzz qqq xxx").await.unwrap();
        assert_eq!(result.method, AnalysisMethod::RuleBased);
        assert_eq!(service.name(), "hybrid");
    }
}
