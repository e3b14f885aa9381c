//! Configuration for the sentiment service

use crate::persistence::DEFAULT_MODEL_FILE;
use reviewsense_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Sentiment service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentConfig {
    /// Where the trained model is persisted
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// ML results at or below this confidence fall back to the lexicon
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,

    /// Laplace smoothing constant
    #[serde(default = "default_smoothing_alpha")]
    pub smoothing_alpha: f64,

    /// Comments must be longer than this many characters to train on
    #[serde(default = "default_min_text_length")]
    pub min_text_length: usize,

    /// Below this many real comments the synthetic corpus is added
    #[serde(default = "default_synthetic_threshold")]
    pub synthetic_threshold: usize,

    /// Upper bound on examples per class after balancing
    #[serde(default = "default_max_per_class")]
    pub max_per_class: usize,

    /// Training is skipped when fewer examples are assembled
    #[serde(default = "default_min_training_examples")]
    pub min_training_examples: usize,

    /// A persisted model is only reused if it saw this many examples
    #[serde(default = "default_min_persisted_examples")]
    pub min_persisted_examples: u64,

    /// Whether to top up scarce data with the built-in corpus
    #[serde(default = "default_true")]
    pub include_synthetic: bool,

    /// After a failed first-use training run, analysis requests skip the
    /// ML path for this many seconds before trying again
    #[serde(default = "default_training_retry_secs")]
    pub training_retry_secs: u64,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            confidence_threshold: default_confidence_threshold(),
            smoothing_alpha: default_smoothing_alpha(),
            min_text_length: default_min_text_length(),
            synthetic_threshold: default_synthetic_threshold(),
            max_per_class: default_max_per_class(),
            min_training_examples: default_min_training_examples(),
            min_persisted_examples: default_min_persisted_examples(),
            include_synthetic: true,
            training_retry_secs: default_training_retry_secs(),
        }
    }
}

impl SentimentConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("invalid sentiment config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_yaml(&content)
    }

    /// Wait between first-use training attempts
    pub fn training_retry_interval(&self) -> Duration {
        Duration::from_secs(self.training_retry_secs)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(Error::config(format!(
                "confidence_threshold must be within [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        if !(self.smoothing_alpha > 0.0 && self.smoothing_alpha.is_finite()) {
            return Err(Error::config(format!(
                "smoothing_alpha must be positive, got {}",
                self.smoothing_alpha
            )));
        }
        if self.max_per_class == 0 {
            return Err(Error::config("max_per_class must be at least 1"));
        }
        Ok(())
    }
}

fn default_model_path() -> PathBuf {
    PathBuf::from(DEFAULT_MODEL_FILE)
}

fn default_confidence_threshold() -> f64 {
    0.6
}

fn default_smoothing_alpha() -> f64 {
    1.0
}

fn default_min_text_length() -> usize {
    10
}

fn default_synthetic_threshold() -> usize {
    50
}

fn default_max_per_class() -> usize {
    20
}

fn default_min_training_examples() -> usize {
    10
}

fn default_min_persisted_examples() -> u64 {
    20
}

fn default_training_retry_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SentimentConfig::default();
        assert_eq!(config.confidence_threshold, 0.6);
        assert_eq!(config.smoothing_alpha, 1.0);
        assert_eq!(config.max_per_class, 20);
        assert_eq!(config.model_path, PathBuf::from("sentiment-model.json"));
        assert_eq!(config.training_retry_interval(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config = SentimentConfig::from_yaml(
            r#"
model_path: /var/lib/reviewsense/model.json
confidence_threshold: 0.75
include_synthetic: false
"#,
        )
        .unwrap();

        assert_eq!(config.model_path, PathBuf::from("/var/lib/reviewsense/model.json"));
        assert_eq!(config.confidence_threshold, 0.75);
        assert!(!config.include_synthetic);
        assert_eq!(config.synthetic_threshold, 50);
        assert_eq!(config.min_persisted_examples, 20);
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        assert!(SentimentConfig::from_yaml("confidence_threshold: 1.5").is_err());
        assert!(SentimentConfig::from_yaml("smoothing_alpha: 0").is_err());
        assert!(SentimentConfig::from_yaml("max_per_class: 0").is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sentiment.yaml");
        std::fs::write(&path, "min_text_length: 3\n").unwrap();

        let config = SentimentConfig::from_file(&path).unwrap();
        assert_eq!(config.min_text_length, 3);

        assert!(SentimentConfig::from_file(dir.path().join("missing.yaml")).is_err());
    }
}
