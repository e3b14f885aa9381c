//! Model persistence layer
//!
//! Stores the full Naive Bayes state as one pretty-printed JSON document:
//! - One entry per sentiment class with its word counts and totals
//! - A format version and the overall document count
//! - Writes go to a temp file that is renamed over the target
//!
//! Loading fails soft: a missing or corrupt file yields an empty model.

use crate::naive_bayes::{ClassCounts, NaiveBayesModel};
use reviewsense_core::{Error, Result, SentimentClass};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Current on-disk format version
const FORMAT_VERSION: u32 = 1;

/// Default model file name
pub const DEFAULT_MODEL_FILE: &str = "sentiment-model.json";

#[derive(Debug, Serialize, Deserialize)]
struct ModelDocument {
    version: u32,
    total_docs: u64,
    classes: BTreeMap<String, ClassDocument>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ClassDocument {
    doc_count: u64,
    total_words: u64,
    word_counts: BTreeMap<String, u64>,
}

impl From<&NaiveBayesModel> for ModelDocument {
    fn from(model: &NaiveBayesModel) -> Self {
        let classes = SentimentClass::ALL
            .iter()
            .map(|&class| {
                let counts = model.class_counts(class);
                let doc = ClassDocument {
                    doc_count: counts.doc_count(),
                    total_words: counts.total_words(),
                    word_counts: counts
                        .word_counts()
                        .iter()
                        .map(|(word, count)| (word.clone(), *count))
                        .collect(),
                };
                (class.as_str().to_string(), doc)
            })
            .collect();

        Self {
            version: FORMAT_VERSION,
            total_docs: model.total_docs(),
            classes,
        }
    }
}

impl TryFrom<ModelDocument> for NaiveBayesModel {
    type Error = Error;

    fn try_from(mut doc: ModelDocument) -> Result<Self> {
        if doc.version != FORMAT_VERSION {
            return Err(Error::persistence(format!(
                "unsupported model format version {}",
                doc.version
            )));
        }

        let mut classes: [ClassCounts; SentimentClass::COUNT] = Default::default();
        for class in SentimentClass::ALL {
            let entry = doc.classes.remove(class.as_str()).ok_or_else(|| {
                Error::persistence(format!("model document has no entry for {class}"))
            })?;
            classes[class.index()] = ClassCounts::from_parts(
                entry.word_counts.into_iter().collect::<HashMap<_, _>>(),
                entry.total_words,
                entry.doc_count,
            );
        }

        if let Some(unknown) = doc.classes.keys().next() {
            return Err(Error::persistence(format!(
                "model document has unknown class '{unknown}'"
            )));
        }

        NaiveBayesModel::from_parts(classes, doc.total_docs)
    }
}

/// File-backed store for the Naive Bayes model
#[derive(Debug, Clone)]
pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    /// Create a store for the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the model, replacing any previous file
    pub fn save(&self, model: &NaiveBayesModel) -> Result<()> {
        let json = serde_json::to_string_pretty(&ModelDocument::from(model))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                Error::persistence(format!("failed to create {}: {e}", parent.display()))
            })?;
        }

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, json).map_err(|e| {
            Error::persistence(format!("failed to write {}: {e}", tmp_path.display()))
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|e| {
            Error::persistence(format!("failed to replace {}: {e}", self.path.display()))
        })?;

        info!("Model saved to {}", self.path.display());
        Ok(())
    }

    /// Read the model. `Ok(None)` means no file exists yet.
    pub fn try_load(&self) -> Result<Option<NaiveBayesModel>> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::persistence(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )))
            }
        };

        let doc: ModelDocument = serde_json::from_str(&json)
            .map_err(|e| Error::persistence(format!("corrupt model file: {e}")))?;
        let model = NaiveBayesModel::try_from(doc)?;

        debug!(
            "Read model from {} ({} training examples)",
            self.path.display(),
            model.total_docs()
        );
        Ok(Some(model))
    }

    /// Read the model, falling back to an empty one on any failure
    pub fn load(&self) -> NaiveBayesModel {
        match self.try_load() {
            Ok(Some(model)) => model,
            Ok(None) => {
                warn!(
                    "No saved model found at {}, will train from scratch",
                    self.path.display()
                );
                NaiveBayesModel::new()
            }
            Err(e) => {
                warn!("Ignoring saved model at {}: {}", self.path.display(), e);
                NaiveBayesModel::new()
            }
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| DEFAULT_MODEL_FILE.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Default for ModelStore {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training_data::synthetic_corpus;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = ModelStore::new(temp_dir.path().join("model.json"));
        let model = NaiveBayesModel::fit(&synthetic_corpus());

        store.save(&model).unwrap();
        let loaded = store.load();

        assert_eq!(loaded.total_docs(), model.total_docs());
        assert_eq!(loaded.vocabulary_size(), model.vocabulary_size());
        for class in SentimentClass::ALL {
            assert_eq!(loaded.class_counts(class), model.class_counts(class));
        }
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = ModelStore::new(temp_dir.path().join("absent.json"));

        assert!(store.try_load().unwrap().is_none());
        assert!(!store.load().is_trained());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("model.json");
        fs::write(&path, "{ not json").unwrap();
        let store = ModelStore::new(&path);

        assert!(matches!(store.try_load(), Err(Error::Persistence(_))));
        assert!(!store.load().is_trained());
    }

    #[test]
    fn test_inconsistent_counts_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let store = ModelStore::new(temp_dir.path().join("model.json"));
        store.save(&NaiveBayesModel::fit(&synthetic_corpus())).unwrap();

        let json = fs::read_to_string(store.path()).unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["total_docs"] = serde_json::json!(999);
        fs::write(store.path(), value.to_string()).unwrap();

        assert!(store.try_load().is_err());
        assert!(!store.load().is_trained());
    }

    #[test]
    fn test_document_layout() {
        let temp_dir = TempDir::new().unwrap();
        let store = ModelStore::new(temp_dir.path().join("nested").join("model.json"));
        store.save(&NaiveBayesModel::fit(&synthetic_corpus())).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["total_docs"], 25);
        assert_eq!(value["classes"]["Very Positive"]["doc_count"], 5);
        assert!(value["classes"]["Very Negative"]["word_counts"].is_object());
        assert!(!temp_dir.path().join("nested").join("model.json.tmp").exists());
    }

    #[test]
    fn test_save_overwrites_previous_model() {
        let temp_dir = TempDir::new().unwrap();
        let store = ModelStore::new(temp_dir.path().join("model.json"));
        store.save(&NaiveBayesModel::fit(&synthetic_corpus())).unwrap();

        let smaller = NaiveBayesModel::fit(&synthetic_corpus()[..3]);
        store.save(&smaller).unwrap();

        assert_eq!(store.load().total_docs(), 3);
    }
}
