//! Core types for ReviewSense

use crate::error::Error;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Sentiment label attached to a review comment.
///
/// The set is closed and ordered from most to least positive. That order is
/// the canonical order used for iteration, persistence, and tie-breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SentimentClass {
    #[serde(rename = "Very Positive", alias = "VeryPositive", alias = "very_positive")]
    VeryPositive,
    #[serde(rename = "Positive", alias = "positive")]
    Positive,
    #[serde(rename = "Neutral", alias = "neutral")]
    Neutral,
    #[serde(rename = "Negative", alias = "negative")]
    Negative,
    #[serde(rename = "Very Negative", alias = "VeryNegative", alias = "very_negative")]
    VeryNegative,
}

impl SentimentClass {
    /// Number of classes
    pub const COUNT: usize = 5;

    /// All classes in canonical order
    pub const ALL: [SentimentClass; Self::COUNT] = [
        Self::VeryPositive,
        Self::Positive,
        Self::Neutral,
        Self::Negative,
        Self::VeryNegative,
    ];

    /// Position in the canonical order
    pub fn index(self) -> usize {
        match self {
            Self::VeryPositive => 0,
            Self::Positive => 1,
            Self::Neutral => 2,
            Self::Negative => 3,
            Self::VeryNegative => 4,
        }
    }

    /// Display name, as stored alongside comments
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VeryPositive => "Very Positive",
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
            Self::VeryNegative => "Very Negative",
        }
    }
}

impl fmt::Display for SentimentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "verypositive" => Ok(Self::VeryPositive),
            "positive" => Ok(Self::Positive),
            "neutral" => Ok(Self::Neutral),
            "negative" => Ok(Self::Negative),
            "verynegative" => Ok(Self::VeryNegative),
            _ => Err(Error::config(format!("unknown sentiment label '{s}'"))),
        }
    }
}

/// A labeled piece of text used for training
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    /// Raw comment text
    pub text: String,

    /// Sentiment label
    pub label: SentimentClass,
}

impl TrainingExample {
    /// Create a new training example
    pub fn new(text: impl Into<String>, label: SentimentClass) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

/// Posterior probability for each sentiment class
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClassProbabilities([f64; SentimentClass::COUNT]);

impl ClassProbabilities {
    /// Wrap raw values indexed in canonical class order
    pub fn from_array(values: [f64; SentimentClass::COUNT]) -> Self {
        Self(values)
    }

    /// Probability for a class
    pub fn get(&self, class: SentimentClass) -> f64 {
        self.0[class.index()]
    }

    /// Iterate `(class, probability)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (SentimentClass, f64)> + '_ {
        SentimentClass::ALL.iter().map(move |&c| (c, self.0[c.index()]))
    }

    /// Sum over all classes
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Most probable class; ties go to the earliest class in canonical order
    pub fn argmax(&self) -> (SentimentClass, f64) {
        let mut best = (SentimentClass::ALL[0], self.0[0]);
        for (class, p) in self.iter().skip(1) {
            if p > best.1 {
                best = (class, p);
            }
        }
        best
    }
}

impl Serialize for ClassProbabilities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(SentimentClass::COUNT))?;
        for (class, p) in self.iter() {
            map.serialize_entry(class.as_str(), &p)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_parsing_accepts_common_spellings() {
        assert_eq!(
            "Very Positive".parse::<SentimentClass>().unwrap(),
            SentimentClass::VeryPositive
        );
        assert_eq!(
            "very_negative".parse::<SentimentClass>().unwrap(),
            SentimentClass::VeryNegative
        );
        assert_eq!(
            "NEUTRAL".parse::<SentimentClass>().unwrap(),
            SentimentClass::Neutral
        );
        assert!("mixed".parse::<SentimentClass>().is_err());
    }

    #[test]
    fn test_class_serde_uses_display_names() {
        let json = serde_json::to_string(&SentimentClass::VeryPositive).unwrap();
        assert_eq!(json, "\"Very Positive\"");

        let back: SentimentClass = serde_json::from_str("\"VeryNegative\"").unwrap();
        assert_eq!(back, SentimentClass::VeryNegative);
    }

    #[test]
    fn test_canonical_order_matches_index() {
        for (i, class) in SentimentClass::ALL.iter().enumerate() {
            assert_eq!(class.index(), i);
        }
    }

    #[test]
    fn test_argmax_prefers_first_class_on_tie() {
        let probs = ClassProbabilities::from_array([0.1, 0.4, 0.4, 0.05, 0.05]);
        assert_eq!(probs.argmax(), (SentimentClass::Positive, 0.4));
    }

    #[test]
    fn test_probabilities_serialize_as_map() {
        let probs = ClassProbabilities::from_array([0.5, 0.5, 0.0, 0.0, 0.0]);
        let value = serde_json::to_value(probs).unwrap();
        assert_eq!(value["Very Positive"], 0.5);
        assert_eq!(value["Very Negative"], 0.0);
    }
}
