//! Keyword-weighted sentiment scorer
//!
//! This is the lexicon-based fallback used when the Naive Bayes model is
//! untrained or not confident enough. It needs no trained state and never
//! fails once constructed.

use crate::classifier::{Classifier, SentimentResult};
use crate::tokenizer::split_words;
use aho_corasick::{AhoCorasick, MatchKind};
use reviewsense_core::{Error, Result, SentimentClass};
use std::collections::HashSet;
use std::time::Instant;
use tracing::trace;

const VERY_POSITIVE: &[&str] = &[
    "excellent", "amazing", "outstanding", "perfect", "fantastic", "incredible", "exceptional",
    "superb", "brilliant", "phenomenal", "flawless", "love", "loved", "awesome", "best",
    "wonderful", "magnificent", "spectacular",
];

const POSITIVE: &[&str] = &[
    "good", "great", "nice", "happy", "satisfied", "pleased", "recommend", "recommended",
    "solid", "decent", "reliable", "comfortable", "sturdy", "useful", "helpful", "worth",
    "fast", "works", "enjoy",
];

const NEGATIVE: &[&str] = &[
    "bad", "poor", "disappointed", "disappointing", "cheap", "slow", "flimsy", "mediocre",
    "uncomfortable", "unhappy", "problem", "problems", "issue", "issues", "faulty", "damaged",
    "overpriced", "annoying", "broke",
];

const VERY_NEGATIVE: &[&str] = &[
    "terrible", "awful", "horrible", "worst", "hate", "hated", "useless", "garbage", "trash",
    "junk", "broken", "defective", "disgusting", "pathetic", "scam", "waste", "worthless",
    "nightmare",
];

/// Score assigned when no lexicon word matches
const NEUTRAL_SCORE: f64 = 0.5;

/// High-signal phrases that shift the ratio score after it is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    Enthusiasm,
    Defect,
    Returns,
}

impl Signal {
    /// Order in which adjustments are applied
    const ALL: [Signal; 3] = [Self::Enthusiasm, Self::Defect, Self::Returns];

    fn index(self) -> usize {
        match self {
            Self::Enthusiasm => 0,
            Self::Defect => 1,
            Self::Returns => 2,
        }
    }

    fn adjustment(self) -> f64 {
        match self {
            Self::Enthusiasm => 0.15,
            Self::Defect => -0.25,
            Self::Returns => -0.2,
        }
    }
}

const SIGNAL_PHRASES: &[(Signal, &str)] = &[
    (Signal::Enthusiasm, "excellent"),
    (Signal::Enthusiasm, "perfect"),
    (Signal::Enthusiasm, "best"),
    (Signal::Enthusiasm, "love"),
    (Signal::Enthusiasm, "highly recommend"),
    (Signal::Defect, "broken"),
    (Signal::Defect, "broke"),
    (Signal::Defect, "defective"),
    (Signal::Defect, "stopped working"),
    (Signal::Defect, "fell apart"),
    (Signal::Returns, "refund"),
    (Signal::Returns, "return"),
    (Signal::Returns, "money back"),
];

/// Output of the rule-based scorer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleBasedScore {
    pub label: SentimentClass,
    pub score: f64,
}

/// Map a 0-1 score onto the five sentiment bands
pub fn label_for_score(score: f64) -> SentimentClass {
    if score >= 0.8 {
        SentimentClass::VeryPositive
    } else if score >= 0.6 {
        SentimentClass::Positive
    } else if score >= 0.4 {
        SentimentClass::Neutral
    } else if score >= 0.2 {
        SentimentClass::Negative
    } else {
        SentimentClass::VeryNegative
    }
}

pub struct RuleBasedScorer {
    name: String,
    very_positive: HashSet<&'static str>,
    positive: HashSet<&'static str>,
    negative: HashSet<&'static str>,
    very_negative: HashSet<&'static str>,
    signals: AhoCorasick,
}

impl RuleBasedScorer {
    pub fn new() -> Result<Self> {
        Self::with_name("rule-based")
    }

    pub fn with_name(name: impl Into<String>) -> Result<Self> {
        let signals = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(SIGNAL_PHRASES.iter().map(|(_, phrase)| *phrase))
            .map_err(|e| {
                Error::internal(format!("Failed to build sentiment signal matcher: {e}"))
            })?;

        Ok(Self {
            name: name.into(),
            very_positive: VERY_POSITIVE.iter().copied().collect(),
            positive: POSITIVE.iter().copied().collect(),
            negative: NEGATIVE.iter().copied().collect(),
            very_negative: VERY_NEGATIVE.iter().copied().collect(),
            signals,
        })
    }

    /// Score `text` against the lexicons.
    pub fn score(&self, text: &str) -> RuleBasedScore {
        let (mut very_pos, mut pos, mut neg, mut very_neg) = (0u32, 0u32, 0u32, 0u32);

        for word in split_words(text) {
            let word = word.as_str();
            if self.very_positive.contains(word) {
                very_pos += 1;
            } else if self.positive.contains(word) {
                pos += 1;
            } else if self.negative.contains(word) {
                neg += 1;
            } else if self.very_negative.contains(word) {
                very_neg += 1;
            }
        }

        let weighted_pos = f64::from(2 * very_pos + pos);
        let weighted_neg = f64::from(2 * very_neg + neg);

        let score = if weighted_pos + weighted_neg == 0.0 {
            NEUTRAL_SCORE
        } else {
            let ratio = weighted_pos / (weighted_pos + weighted_neg);
            let present = self.present_signals(text);
            Signal::ALL
                .into_iter()
                .filter(|signal| present[signal.index()])
                .fold(ratio, |score, signal| {
                    (score + signal.adjustment()).clamp(0.0, 1.0)
                })
        };

        trace!(weighted_pos, weighted_neg, score, "rule-based score");

        RuleBasedScore {
            label: label_for_score(score),
            score,
        }
    }

    /// Signal groups with a phrase matching whole words in `text`,
    /// indexed by `Signal::index`
    fn present_signals(&self, text: &str) -> [bool; 3] {
        let mut present = [false; 3];

        for m in self.signals.find_iter(text) {
            let before = text[..m.start()].chars().next_back();
            let after = text[m.end()..].chars().next();
            let inside_word = before.is_some_and(char::is_alphanumeric)
                || after.is_some_and(char::is_alphanumeric);
            if inside_word {
                continue;
            }
            present[SIGNAL_PHRASES[m.pattern().as_usize()].0.index()] = true;
        }

        present
    }
}

#[async_trait::async_trait]
impl Classifier for RuleBasedScorer {
    async fn classify(&self, text: &str) -> Result<SentimentResult> {
        let start = Instant::now();

        let RuleBasedScore { label, score } = self.score(text);

        let mut result = SentimentResult::rule_based(label, score);
        result.latency_us = start.elapsed().as_micros() as u64;
        Ok(result)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
