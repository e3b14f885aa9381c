//! Sources of previously labeled comments

use async_trait::async_trait;
use parking_lot::RwLock;
use reviewsense_core::{Error, Result, SentimentClass, TrainingExample};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Supplies `(text, label)` pairs from previously stored comments.
#[async_trait]
pub trait CommentSource: Send + Sync {
    /// Every stored comment that has both text and a label
    async fn labeled_comments(&self) -> Result<Vec<TrainingExample>>;
}

/// In-memory source, mainly for tests and embedding
#[derive(Debug, Default)]
pub struct InMemorySource {
    examples: RwLock<Vec<TrainingExample>>,
}

impl InMemorySource {
    pub fn new(examples: Vec<TrainingExample>) -> Self {
        Self {
            examples: RwLock::new(examples),
        }
    }

    /// Record a newly labeled comment
    pub fn push(&self, example: TrainingExample) {
        self.examples.write().push(example);
    }

    pub fn len(&self) -> usize {
        self.examples.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.read().is_empty()
    }
}

#[async_trait]
impl CommentSource for InMemorySource {
    async fn labeled_comments(&self) -> Result<Vec<TrainingExample>> {
        Ok(self.examples.read().clone())
    }
}

/// One exported comment row
#[derive(Debug, Deserialize)]
struct CommentRow {
    text: Option<String>,
    #[serde(alias = "label")]
    sentiment: Option<String>,
}

/// Reads comments exported as JSON lines, one object per line with
/// `text` and `sentiment` fields.
///
/// Rows missing either field, with an unknown label, or that fail to parse
/// are skipped. A missing file is an empty source.
#[derive(Debug, Clone)]
pub struct JsonLinesSource {
    path: PathBuf,
}

impl JsonLinesSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CommentSource for JsonLinesSource {
    async fn labeled_comments(&self) -> Result<Vec<TrainingExample>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(Error::comment_source(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )))
            }
        };

        let mut examples = Vec::new();
        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let row: CommentRow = match serde_json::from_str(line) {
                Ok(row) => row,
                Err(e) => {
                    debug!("Skipping comment line {}: {}", line_no + 1, e);
                    continue;
                }
            };

            let (Some(text), Some(sentiment)) = (row.text, row.sentiment) else {
                continue;
            };

            match sentiment.parse::<SentimentClass>() {
                Ok(label) => examples.push(TrainingExample::new(text, label)),
                Err(e) => debug!("Skipping comment line {}: {}", line_no + 1, e),
            }
        }

        debug!(
            "Read {} labeled comments from {}",
            examples.len(),
            self.path.display()
        );
        Ok(examples)
    }
}
