//! Multinomial Naive Bayes sentiment classifier
//!
//! [`NaiveBayesModel`] is an immutable snapshot of the trained counts. It is
//! built in one pass by [`NaiveBayesModel::fit`] and never mutated afterwards.
//! [`NaiveBayesClassifier`] owns the live snapshot behind an `Arc` and swaps
//! it atomically after each training run, so predictions never observe a
//! partially rebuilt model.

use crate::classifier::{Classifier, SentimentResult};
use crate::persistence::ModelStore;
use crate::tokenizer::tokenize;
use parking_lot::RwLock;
use reviewsense_core::{ClassProbabilities, Error, Result, SentimentClass, TrainingExample};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Default Laplace smoothing constant
pub const DEFAULT_ALPHA: f64 = 1.0;

/// Token statistics for one sentiment class
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassCounts {
    word_counts: HashMap<String, u64>,
    total_words: u64,
    doc_count: u64,
}

impl ClassCounts {
    pub(crate) fn from_parts(
        word_counts: HashMap<String, u64>,
        total_words: u64,
        doc_count: u64,
    ) -> Self {
        Self {
            word_counts,
            total_words,
            doc_count,
        }
    }

    /// Number of training documents that contained `token`
    pub fn word_count(&self, token: &str) -> u64 {
        self.word_counts.get(token).copied().unwrap_or(0)
    }

    pub fn word_counts(&self) -> &HashMap<String, u64> {
        &self.word_counts
    }

    /// Sum of all token occurrences for the class
    pub fn total_words(&self) -> u64 {
        self.total_words
    }

    /// Number of training documents labeled with the class
    pub fn doc_count(&self) -> u64 {
        self.doc_count
    }
}

/// Output of a Naive Bayes prediction
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: SentimentClass,
    pub confidence: f64,
    pub probabilities: ClassProbabilities,
}

/// Outcome of a completed training run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainingSummary {
    pub training_examples: u64,
    pub vocabulary_size: usize,
    pub class_distribution: BTreeMap<SentimentClass, u64>,
}

/// Introspection view of a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    pub total_training_examples: u64,
    pub vocabulary_size: usize,
    pub class_distribution: BTreeMap<SentimentClass, u64>,
    pub word_totals: BTreeMap<SentimentClass, u64>,
}

/// Trained Naive Bayes counts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NaiveBayesModel {
    classes: [ClassCounts; SentimentClass::COUNT],
    total_docs: u64,
    vocabulary_size: usize,
}

impl NaiveBayesModel {
    /// Create an empty, untrained model
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model from scratch over `examples`.
    ///
    /// Each example contributes its distinct tokens once to its class.
    pub fn fit(examples: &[TrainingExample]) -> Self {
        let mut model = Self::default();

        for example in examples {
            let tokens = tokenize(&example.text);
            let counts = &mut model.classes[example.label.index()];

            counts.doc_count += 1;
            counts.total_words += tokens.len() as u64;
            for token in tokens {
                *counts.word_counts.entry(token).or_insert(0) += 1;
            }

            model.total_docs += 1;
        }

        model.vocabulary_size = model.count_vocabulary();
        model
    }

    /// Reassemble a model from stored counts, checking the count invariants
    pub(crate) fn from_parts(
        classes: [ClassCounts; SentimentClass::COUNT],
        total_docs: u64,
    ) -> Result<Self> {
        let doc_sum: u64 = classes.iter().map(|c| c.doc_count).sum();
        if doc_sum != total_docs {
            return Err(Error::persistence(format!(
                "total_docs is {total_docs} but class document counts sum to {doc_sum}"
            )));
        }

        for (class, counts) in SentimentClass::ALL.iter().zip(&classes) {
            let word_sum: u64 = counts.word_counts.values().sum();
            if word_sum != counts.total_words {
                return Err(Error::persistence(format!(
                    "{class}: total_words is {} but word counts sum to {word_sum}",
                    counts.total_words
                )));
            }
        }

        let mut model = Self {
            classes,
            total_docs,
            vocabulary_size: 0,
        };
        model.vocabulary_size = model.count_vocabulary();
        Ok(model)
    }

    fn count_vocabulary(&self) -> usize {
        self.classes
            .iter()
            .flat_map(|c| c.word_counts.keys())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Counts for one class
    pub fn class_counts(&self, class: SentimentClass) -> &ClassCounts {
        &self.classes[class.index()]
    }

    pub fn total_docs(&self) -> u64 {
        self.total_docs
    }

    /// Distinct tokens across all classes
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary_size
    }

    pub fn is_trained(&self) -> bool {
        self.total_docs > 0
    }

    /// Classify `text` with Laplace smoothing constant `alpha`.
    ///
    /// Classes without training documents get probability zero. Ties on the
    /// winning probability go to the earliest class in canonical order.
    pub fn predict(&self, text: &str, alpha: f64) -> Result<Prediction> {
        if !self.is_trained() {
            return Err(Error::UntrainedModel);
        }

        let tokens = tokenize(text);
        let vocabulary = self.vocabulary_size as f64;
        let total_docs = self.total_docs as f64;

        let mut log_scores = [f64::NEG_INFINITY; SentimentClass::COUNT];
        for (slot, counts) in log_scores.iter_mut().zip(&self.classes) {
            if counts.doc_count == 0 {
                continue;
            }

            let mut score = (counts.doc_count as f64 / total_docs).ln();

            // With an empty vocabulary every denominator is zero; priors decide.
            if self.vocabulary_size > 0 {
                let denominator = counts.total_words as f64 + alpha * vocabulary;
                for token in &tokens {
                    let count = counts.word_count(token) as f64;
                    score += ((count + alpha) / denominator).ln();
                }
            }

            *slot = score;
        }

        let probabilities = softmax(&log_scores);
        let (label, confidence) = probabilities.argmax();

        Ok(Prediction {
            label,
            confidence,
            probabilities,
        })
    }

    /// Most frequent tokens for a class, highest count first
    pub fn top_words(&self, class: SentimentClass, n: usize) -> Vec<(String, u64)> {
        let mut words: Vec<(String, u64)> = self
            .class_counts(class)
            .word_counts
            .iter()
            .map(|(word, count)| (word.clone(), *count))
            .collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        words.truncate(n);
        words
    }

    pub fn summary(&self) -> TrainingSummary {
        TrainingSummary {
            training_examples: self.total_docs,
            vocabulary_size: self.vocabulary_size,
            class_distribution: self.per_class(ClassCounts::doc_count),
        }
    }

    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            total_training_examples: self.total_docs,
            vocabulary_size: self.vocabulary_size,
            class_distribution: self.per_class(ClassCounts::doc_count),
            word_totals: self.per_class(ClassCounts::total_words),
        }
    }

    fn per_class(&self, f: impl Fn(&ClassCounts) -> u64) -> BTreeMap<SentimentClass, u64> {
        SentimentClass::ALL
            .iter()
            .map(|&class| (class, f(self.class_counts(class))))
            .collect()
    }
}

/// Numerically stable softmax over log scores.
///
/// At least one entry must be finite; `-inf` entries map to zero.
fn softmax(log_scores: &[f64; SentimentClass::COUNT]) -> ClassProbabilities {
    let max = log_scores
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);

    let mut exps = [0.0; SentimentClass::COUNT];
    for (exp, &score) in exps.iter_mut().zip(log_scores) {
        *exp = (score - max).exp();
    }

    let sum: f64 = exps.iter().sum();
    for exp in exps.iter_mut() {
        *exp /= sum;
    }

    ClassProbabilities::from_array(exps)
}

/// Live Naive Bayes classifier with an atomically swapped model.
pub struct NaiveBayesClassifier {
    name: String,
    model: RwLock<Arc<NaiveBayesModel>>,
    training: tokio::sync::Mutex<()>,
    store: ModelStore,
    alpha: f64,
}

impl NaiveBayesClassifier {
    /// Create a classifier with an empty model, persisting to `store`
    pub fn new(store: ModelStore, alpha: f64) -> Self {
        Self {
            name: "naive-bayes".to_string(),
            model: RwLock::new(Arc::new(NaiveBayesModel::new())),
            training: tokio::sync::Mutex::new(()),
            store,
            alpha,
        }
    }

    /// Current model snapshot
    pub fn snapshot(&self) -> Arc<NaiveBayesModel> {
        self.model.read().clone()
    }

    pub fn is_trained(&self) -> bool {
        self.model.read().is_trained()
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    /// Predict against the current snapshot
    pub fn predict(&self, text: &str) -> Result<Prediction> {
        self.snapshot().predict(text, self.alpha)
    }

    /// Replace the model with one trained on `examples`, then persist it.
    ///
    /// An empty example set leaves the current model untouched.
    pub async fn train(&self, examples: Vec<TrainingExample>) -> Result<TrainingSummary> {
        let _guard = self.training.lock().await;
        self.train_exclusive(examples).await
    }

    /// Install the persisted model if it holds at least `min_examples`.
    ///
    /// Returns whether a model was installed.
    pub async fn load_persisted(&self, min_examples: u64) -> Result<bool> {
        let _guard = self.training.lock().await;
        self.load_exclusive(min_examples).await
    }

    /// Make sure a model is live, loading it from disk or training on the
    /// examples produced by `training_data`.
    ///
    /// Concurrent callers queue on the training lock and only the first one
    /// does any work.
    pub async fn ensure_trained<F, Fut>(&self, min_persisted: u64, training_data: F) -> Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<TrainingExample>>>,
    {
        if self.is_trained() {
            return Ok(());
        }

        let _guard = self.training.lock().await;
        if self.is_trained() {
            return Ok(());
        }

        if self.load_exclusive(min_persisted).await? {
            return Ok(());
        }

        let examples = training_data().await?;
        self.train_exclusive(examples).await.map(|_| ())
    }

    async fn train_exclusive(&self, examples: Vec<TrainingExample>) -> Result<TrainingSummary> {
        if examples.is_empty() {
            warn!("No training data provided, keeping current model");
            return Err(Error::insufficient_data(0, 1));
        }

        info!("Starting Naive Bayes training on {} examples", examples.len());
        log_distribution(&examples);

        let start = Instant::now();
        let model = tokio::task::spawn_blocking(move || NaiveBayesModel::fit(&examples))
            .await
            .map_err(|e| Error::internal(format!("training task failed: {e}")))?;
        let model = Arc::new(model);

        *self.model.write() = Arc::clone(&model);

        let summary = model.summary();
        info!(
            examples = summary.training_examples,
            vocabulary = summary.vocabulary_size,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Training completed"
        );
        for class in SentimentClass::ALL {
            let counts = model.class_counts(class);
            debug!(
                "  {class}: {} documents, {} words, top: {:?}",
                counts.doc_count(),
                counts.total_words(),
                model.top_words(class, 5)
            );
        }

        self.persist(model).await;
        Ok(summary)
    }

    async fn load_exclusive(&self, min_examples: u64) -> Result<bool> {
        let store = self.store.clone();
        let loaded = tokio::task::spawn_blocking(move || store.load())
            .await
            .map_err(|e| Error::internal(format!("model load task failed: {e}")))?;

        if loaded.total_docs() < min_examples {
            if loaded.is_trained() {
                info!(
                    "Persisted model has {} examples, need {}; retraining",
                    loaded.total_docs(),
                    min_examples
                );
            }
            return Ok(false);
        }

        info!(
            "Loaded persisted model with {} training examples",
            loaded.total_docs()
        );
        *self.model.write() = Arc::new(loaded);
        Ok(true)
    }

    /// Save a snapshot on a blocking thread; failures are logged only
    async fn persist(&self, model: Arc<NaiveBayesModel>) {
        let store = self.store.clone();
        match tokio::task::spawn_blocking(move || store.save(&model)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!("Failed to save model: {}", e),
            Err(e) => error!("Model save task failed: {}", e),
        }
    }
}

fn log_distribution(examples: &[TrainingExample]) {
    let mut counts = BTreeMap::new();
    for example in examples {
        *counts.entry(example.label).or_insert(0usize) += 1;
    }
    for (class, count) in counts {
        debug!("  {class}: {count} examples");
    }
}

#[async_trait::async_trait]
impl Classifier for NaiveBayesClassifier {
    async fn classify(&self, text: &str) -> Result<SentimentResult> {
        let start = Instant::now();

        let prediction = self.predict(text)?;

        let mut result =
            SentimentResult::ml(prediction.label, prediction.confidence, prediction.probabilities);
        result.latency_us = start.elapsed().as_micros() as u64;
        Ok(result)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
