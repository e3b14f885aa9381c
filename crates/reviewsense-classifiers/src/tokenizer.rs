//! Word tokenizer shared by training and prediction

use std::collections::HashSet;

/// Characters that separate words, in addition to whitespace
const SEPARATORS: &[char] = &[
    '.', ',', '!', '?', ';', ':', '"', '\'', '(', ')', '[', ']', '{', '}', '-', '_', '/', '\\',
];

/// Articles, auxiliaries and conjunctions that carry no sentiment
const STOP_WORDS: &[&str] = &[
    "the", "and", "or", "but", "is", "are", "was", "were", "be", "been", "have", "has", "had",
    "do", "does", "did", "will", "would", "could", "should", "can", "may", "might", "must",
    "this", "that", "these", "those", "them", "then", "than",
];

/// Tokens of this many characters or fewer are dropped
const MIN_TOKEN_CHARS: usize = 2;

fn is_separator(c: char) -> bool {
    c.is_whitespace() || SEPARATORS.contains(&c)
}

/// Whether a word is in the stop-word list
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Lower-case `text` and split it on whitespace and punctuation.
///
/// Empty pieces are skipped; nothing else is filtered and repeats are kept.
pub fn split_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(is_separator)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_lowercase)
}

/// Normalize `text` into its set of distinct content tokens.
///
/// A token appears at most once no matter how often the word repeats, so a
/// document contributes at most one count per token during training.
pub fn tokenize(text: &str) -> HashSet<String> {
    split_words(text)
        .filter(|word| word.chars().count() > MIN_TOKEN_CHARS)
        .filter(|word| !is_stop_word(word))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t\n").is_empty());
    }

    #[test]
    fn test_only_stop_words() {
        assert!(tokenize("the AND the").is_empty());
    }

    #[test]
    fn test_case_fold_and_dedup() {
        assert_eq!(tokenize("Excellent excellent"), set(&["excellent"]));
    }

    #[test]
    fn test_punctuation_and_short_tokens() {
        let tokens = tokenize("It's (really) great-value/price; ok? no!");
        assert_eq!(tokens, set(&["really", "great", "value", "price"]));
    }

    #[test]
    fn test_backslash_and_brackets_split() {
        let tokens = tokenize("[fast]{cheap}\\sturdy");
        assert_eq!(tokens, set(&["fast", "cheap", "sturdy"]));
    }

    #[test]
    fn test_split_words_keeps_repeats_and_stop_words() {
        let words: Vec<String> = split_words("Bad, bad, the BAD!").collect();
        assert_eq!(words, vec!["bad", "bad", "the", "bad"]);
    }
}
