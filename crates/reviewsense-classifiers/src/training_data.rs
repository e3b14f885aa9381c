//! Training set assembly
//!
//! Real labeled comments are topped up with a small built-in corpus when
//! scarce, then every class is oversampled to the same size.

use crate::config::SentimentConfig;
use reviewsense_core::{SentimentClass, TrainingExample};
use std::collections::BTreeMap;
use tracing::{debug, info};

const SYNTHETIC_CORPUS: &[(SentimentClass, &str)] = &[
    (SentimentClass::VeryPositive, "Absolutely excellent product, exceeded all my expectations!"),
    (SentimentClass::VeryPositive, "Perfect quality and amazing performance, I love it"),
    (SentimentClass::VeryPositive, "Outstanding purchase, absolutely perfect in every way"),
    (SentimentClass::VeryPositive, "Excellent build, fantastic value, best purchase ever"),
    (SentimentClass::VeryPositive, "Incredible product, perfect fit and superb craftsmanship"),
    (SentimentClass::Positive, "Good product, works well and arrived on time"),
    (SentimentClass::Positive, "Nice quality for the price, happy with it"),
    (SentimentClass::Positive, "Solid item, does the job and looks good"),
    (SentimentClass::Positive, "Pretty good overall, would recommend to friends"),
    (SentimentClass::Positive, "Works as described, satisfied with the purchase"),
    (SentimentClass::Neutral, "The product is okay, nothing special about it"),
    (SentimentClass::Neutral, "Average quality, it does what it says"),
    (SentimentClass::Neutral, "Arrived in standard packaging, works as expected"),
    (SentimentClass::Neutral, "Not bad not great, just an ordinary item"),
    (SentimentClass::Neutral, "It is fine for basic use, neither good nor bad"),
    (SentimentClass::Negative, "Poor quality, disappointed with this purchase"),
    (SentimentClass::Negative, "Not worth the money, stopped working after a month"),
    (SentimentClass::Negative, "Cheap materials and slow delivery, not happy"),
    (SentimentClass::Negative, "Below expectations, the product feels flimsy"),
    (SentimentClass::Negative, "Had problems from day one, customer support was unhelpful"),
    (SentimentClass::VeryNegative, "Terrible product, completely broken on arrival"),
    (SentimentClass::VeryNegative, "Worst purchase ever, absolute garbage and a total waste"),
    (SentimentClass::VeryNegative, "Awful quality, it fell apart immediately, want a refund"),
    (SentimentClass::VeryNegative, "Horrible experience, defective item and rude service"),
    (SentimentClass::VeryNegative, "Completely useless junk, I hate it, never buying again"),
];

/// The built-in labeled corpus, five examples per class
pub fn synthetic_corpus() -> Vec<TrainingExample> {
    SYNTHETIC_CORPUS
        .iter()
        .map(|&(label, text)| TrainingExample::new(text, label))
        .collect()
}

/// Number of examples per class
pub fn class_distribution(examples: &[TrainingExample]) -> BTreeMap<SentimentClass, usize> {
    let mut counts = BTreeMap::new();
    for example in examples {
        *counts.entry(example.label).or_insert(0) += 1;
    }
    counts
}

/// Oversample every non-empty class to `min(largest class, max_per_class)`.
///
/// Each class cycles through its own examples in order and is truncated at
/// the target, so larger classes are cut down and smaller ones repeat.
/// Classes with no examples stay empty. Output is grouped in canonical order.
pub fn balance_classes(
    examples: Vec<TrainingExample>,
    max_per_class: usize,
) -> Vec<TrainingExample> {
    let mut by_class: [Vec<TrainingExample>; SentimentClass::COUNT] = Default::default();
    for example in examples {
        by_class[example.label.index()].push(example);
    }

    let largest = by_class.iter().map(Vec::len).max().unwrap_or(0);
    let target = largest.min(max_per_class);

    by_class
        .iter()
        .filter(|group| !group.is_empty())
        .flat_map(|group| group.iter().cycle().take(target).cloned())
        .collect()
}

/// Build the training set from previously labeled comments.
pub fn assemble_training_data(
    existing: Vec<TrainingExample>,
    config: &SentimentConfig,
) -> Vec<TrainingExample> {
    let mut examples: Vec<TrainingExample> = existing
        .into_iter()
        .filter(|e| e.text.chars().count() > config.min_text_length)
        .collect();
    let real = examples.len();

    if config.include_synthetic && real < config.synthetic_threshold {
        debug!(
            "Only {} labeled comments, adding {} synthetic examples",
            real,
            SYNTHETIC_CORPUS.len()
        );
        examples.extend(synthetic_corpus());
    }

    let balanced = balance_classes(examples, config.max_per_class);

    info!(
        real_comments = real,
        total = balanced.len(),
        "Assembled training data"
    );
    for (class, count) in class_distribution(&balanced) {
        debug!("  {class}: {count} examples");
    }

    balanced
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_synthetic() -> SentimentConfig {
        SentimentConfig {
            include_synthetic: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_synthetic_corpus_shape() {
        let corpus = synthetic_corpus();
        assert_eq!(corpus.len(), 25);
        for count in class_distribution(&corpus).values() {
            assert_eq!(*count, 5);
        }
    }

    #[test]
    fn test_balance_oversamples_minority() {
        let examples = vec![
            TrainingExample::new("positive one", SentimentClass::Positive),
            TrainingExample::new("positive two", SentimentClass::Positive),
            TrainingExample::new("positive three", SentimentClass::Positive),
            TrainingExample::new("negative only", SentimentClass::Negative),
        ];

        let balanced = balance_classes(examples, 20);
        let dist = class_distribution(&balanced);

        assert_eq!(dist[&SentimentClass::Positive], 3);
        assert_eq!(dist[&SentimentClass::Negative], 3);
        assert!(balanced
            .iter()
            .filter(|e| e.label == SentimentClass::Negative)
            .all(|e| e.text == "negative only"));
        assert!(!dist.contains_key(&SentimentClass::Neutral));
    }

    #[test]
    fn test_balance_caps_large_classes() {
        let mut examples: Vec<_> = (0..30)
            .map(|i| TrainingExample::new(format!("great review {i}"), SentimentClass::Positive))
            .collect();
        examples.push(TrainingExample::new("meh review", SentimentClass::Neutral));

        let balanced = balance_classes(examples, 20);
        let dist = class_distribution(&balanced);

        assert_eq!(dist[&SentimentClass::Positive], 20);
        assert_eq!(dist[&SentimentClass::Neutral], 20);
        assert_eq!(balanced[0].text, "great review 0");
        assert_eq!(balanced[19].text, "great review 19");
    }

    #[test]
    fn test_balance_empty_input() {
        assert!(balance_classes(Vec::new(), 20).is_empty());
    }

    #[test]
    fn test_short_comments_are_dropped() {
        let existing = vec![
            TrainingExample::new("too short", SentimentClass::Positive),
            TrainingExample::new("exactly 10", SentimentClass::Positive),
            TrainingExample::new("long enough to keep", SentimentClass::Negative),
        ];

        let assembled = assemble_training_data(existing, &no_synthetic());
        assert_eq!(assembled.len(), 1);
        assert_eq!(assembled[0].label, SentimentClass::Negative);
    }

    #[test]
    fn test_synthetic_added_when_scarce() {
        let existing = vec![TrainingExample::new(
            "Battery lasts for days, great phone",
            SentimentClass::Positive,
        )];

        let assembled = assemble_training_data(existing, &SentimentConfig::default());
        let dist = class_distribution(&assembled);

        // 6 positives set the target; every class is oversampled to it.
        assert_eq!(dist.len(), 5);
        assert!(dist.values().all(|&count| count == 6));
    }

    #[test]
    fn test_synthetic_skipped_when_plenty() {
        let existing: Vec<_> = (0..60)
            .map(|i| {
                let label = SentimentClass::ALL[i % SentimentClass::COUNT];
                TrainingExample::new(format!("stored review number {i}"), label)
            })
            .collect();

        let assembled = assemble_training_data(existing, &SentimentConfig::default());
        assert_eq!(assembled.len(), 60);
        assert!(assembled.iter().all(|e| e.text.starts_with("stored review")));
    }
}
