use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "reviewsense")]
#[command(author, version, about = "Five-class sentiment analysis for product comments")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Sentiment config file (YAML)
    #[arg(short, long, env = "REVIEWSENSE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Labeled comments exported as JSON lines
    #[arg(long, env = "REVIEWSENSE_COMMENTS", default_value = "comments.jsonl")]
    pub comments: PathBuf,

    /// Model file path, overrides the config file
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// ML confidence threshold, overrides the config file
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify one or more comments
    Analyze {
        /// Comment texts
        #[arg(required = true)]
        texts: Vec<String>,
    },

    /// Retrain the model from stored comments and save it
    Retrain,

    /// Show model statistics and the most frequent words per class
    Info {
        /// Words to show per class
        #[arg(long, default_value = "10")]
        top: usize,
    },
}
