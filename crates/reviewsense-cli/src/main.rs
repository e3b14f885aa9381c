//! ReviewSense CLI
//!
//! Analyzes comments, retrains the model and prints model statistics as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use reviewsense_classifiers::{JsonLinesSource, SentimentConfig, SentimentService};
use reviewsense_core::SentimentClass;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);
    describe_metrics();

    let config = load_config(&cli)?;
    let source = Arc::new(JsonLinesSource::new(&cli.comments));
    let service = SentimentService::new(config, source)?;

    match cli.command {
        Commands::Analyze { texts } => {
            let mut results = Vec::with_capacity(texts.len());
            for text in &texts {
                let result = service.analyze_sentiment(text).await;
                results.push(json!({ "text": text, "result": result }));
            }
            print_json(&results)?;
        }
        Commands::Retrain => {
            let summary = service
                .retrain()
                .await
                .context("retraining failed, previous model kept")?;
            print_json(&summary)?;
        }
        Commands::Info { top } => {
            if let Err(e) = service.ensure_trained().await {
                warn!("No usable model: {}", e);
            }

            let top_words: BTreeMap<SentimentClass, Vec<(String, u64)>> = SentimentClass::ALL
                .iter()
                .map(|&class| (class, service.top_words(class, top)))
                .collect();

            print_json(&json!({
                "model": service.model_info(),
                "top_words": top_words,
            }))?;
        }
    }

    Ok(())
}

/// Config file first, then command-line overrides
fn load_config(cli: &Cli) -> Result<SentimentConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let config = SentimentConfig::from_file(path)?;
            info!("Configuration loaded from {}", path.display());
            config
        }
        None => SentimentConfig::default(),
    };

    if let Some(model) = &cli.model {
        config.model_path = model.clone();
    }
    if let Some(threshold) = cli.threshold {
        config.confidence_threshold = threshold;
    }

    config.validate()?;
    Ok(config)
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("reviewsense=debug,reviewsense_classifiers=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("reviewsense=info,reviewsense_classifiers=info"))
    };

    // Logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn describe_metrics() {
    metrics::describe_counter!(
        "reviewsense_analyses_total",
        "Total number of analyzed comments by method"
    );
    metrics::describe_counter!("reviewsense_retrains_total", "Total number of completed retrains");
    metrics::describe_histogram!(
        "reviewsense_analysis_latency_us",
        metrics::Unit::Microseconds,
        "Per-comment analysis latency in microseconds"
    );
}
