//! Stopword filtering
//!
//! Bags of words are built from content words only; function words would
//! otherwise dominate the TF-IDF column sums. Lists come from the `stop-words`
//! crate, and callers can supply their own.

use rustc_hash::FxHashSet;
use stop_words::{get, LANGUAGE};

/// A set of lowercase stopwords
#[derive(Debug, Clone)]
pub struct StopwordFilter {
    stopwords: FxHashSet<String>,
}

impl Default for StopwordFilter {
    fn default() -> Self {
        Self::new("en")
    }
}

impl StopwordFilter {
    /// Stopwords for a language code or name
    ///
    /// Unknown languages fall back to English.
    pub fn new(language: &str) -> Self {
        let lang = match language.to_lowercase().as_str() {
            "de" | "german" => LANGUAGE::German,
            "fr" | "french" => LANGUAGE::French,
            "es" | "spanish" => LANGUAGE::Spanish,
            "it" | "italian" => LANGUAGE::Italian,
            "pt" | "portuguese" => LANGUAGE::Portuguese,
            "nl" | "dutch" => LANGUAGE::Dutch,
            "sv" | "swedish" => LANGUAGE::Swedish,
            "ru" | "russian" => LANGUAGE::Russian,
            _ => LANGUAGE::English,
        };
        Self {
            stopwords: get(lang).iter().map(|s| s.to_lowercase()).collect(),
        }
    }

    /// A filter that keeps every word
    pub fn empty() -> Self {
        Self {
            stopwords: FxHashSet::default(),
        }
    }

    /// A filter over a custom list
    pub fn from_list(words: &[&str]) -> Self {
        Self {
            stopwords: words.iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    /// Add words to the filter
    pub fn with_extra(mut self, words: &[&str]) -> Self {
        self.stopwords.extend(words.iter().map(|w| w.to_lowercase()));
        self
    }

    /// Check a word, ignoring case
    pub fn is_stopword(&self, word: &str) -> bool {
        if self.stopwords.contains(word) {
            return true;
        }
        word.chars().any(char::is_uppercase) && self.stopwords.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.stopwords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stopwords.is_empty()
    }
}
