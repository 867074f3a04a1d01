//! Sentence splitting and word tokenization
//!
//! [`TextAnalyzer`] is the seam between the summarizers and whatever text
//! analysis a caller prefers. [`SimpleAnalyzer`] is the built-in rule-based
//! implementation:
//!
//! - paragraphs are separated by blank lines; line breaks inside a paragraph
//!   are treated as spaces
//! - a sentence ends at `.`, `!` or `?` (plus any closing quotes or brackets)
//!   followed by whitespace, unless the period belongs to a known abbreviation
//!   or an initial, or the next word starts in lowercase
//! - words are runs of alphanumeric characters, with inner apostrophes and
//!   hyphens kept

use rustc_hash::FxHashMap;

use super::stopwords::StopwordFilter;

/// Text analysis used by the summarizers
///
/// The order of [`TextAnalyzer::sentences`] defines the sentence index used
/// everywhere downstream.
pub trait TextAnalyzer {
    /// Split text into sentences, in document order
    fn sentences(&self, text: &str) -> Vec<String>;

    /// Split a sentence into word tokens, in order
    fn words(&self, sentence: &str) -> Vec<String>;

    /// Count content words (lowercased, stopwords removed)
    fn bag_of_words(&self, sentence: &str) -> FxHashMap<String, usize>;

    /// Lowercase the sentence and rejoin its words with single spaces
    fn simplify(&self, sentence: &str) -> String {
        self.words(sentence)
            .iter()
            .map(|w| w.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "inc", "ltd", "co", "corp",
    "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec", "no",
    "e.g", "i.e", "u.s", "u.k", "gen", "gov", "sen", "rep", "mt", "ft",
];

const CLOSERS: &[char] = &['"', '\'', ')', ']', '}', '\u{201d}', '\u{2019}', '\u{bb}'];

/// Rule-based analyzer with stopword filtering
#[derive(Debug, Clone, Default)]
pub struct SimpleAnalyzer {
    stopwords: StopwordFilter,
}

impl SimpleAnalyzer {
    /// Create an analyzer with English stopwords
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different stopword filter
    pub fn with_stopwords(mut self, stopwords: StopwordFilter) -> Self {
        self.stopwords = stopwords;
        self
    }

    pub fn stopwords(&self) -> &StopwordFilter {
        &self.stopwords
    }

    fn split_paragraph(paragraph: &str, out: &mut Vec<String>) {
        let chars: Vec<(usize, char)> = paragraph.char_indices().collect();
        let mut start = 0;
        let mut i = 0;

        while i < chars.len() {
            let (_, c) = chars[i];
            if !matches!(c, '.' | '!' | '?') {
                i += 1;
                continue;
            }

            // Swallow runs like "?!" or "..." and trailing closers.
            let mut end = i + 1;
            while end < chars.len() && matches!(chars[end].1, '.' | '!' | '?') {
                end += 1;
            }
            while end < chars.len() && CLOSERS.contains(&chars[end].1) {
                end += 1;
            }

            let at_end = end == chars.len();
            let followed_by_space = !at_end && chars[end].1.is_whitespace();
            if !(at_end || followed_by_space) {
                i = end;
                continue;
            }

            let byte_end = if at_end { paragraph.len() } else { chars[end].0 };
            let candidate = &paragraph[start..byte_end];

            let abbreviation =
                c == '.' && Self::ends_with_abbreviation(&paragraph[start..chars[i].0]);
            if !at_end && (abbreviation || Self::next_word_is_lowercase(&paragraph[byte_end..])) {
                i = end;
                continue;
            }

            let trimmed = candidate.trim();
            if !trimmed.is_empty() {
                out.push(trimmed.to_string());
            }
            start = byte_end;
            i = end;
        }

        let rest = paragraph[start..].trim();
        if !rest.is_empty() {
            out.push(rest.to_string());
        }
    }

    fn ends_with_abbreviation(before_period: &str) -> bool {
        let last = before_period
            .rsplit(char::is_whitespace)
            .next()
            .unwrap_or("")
            .trim_start_matches(|c: char| !c.is_alphanumeric());
        if last.is_empty() {
            return false;
        }
        let mut chars = last.chars();
        if let (Some(only), None) = (chars.next(), chars.next()) {
            // A lone capital is an initial ("J. R. R. Tolkien").
            return only.is_uppercase();
        }
        let lower = last.to_lowercase();
        ABBREVIATIONS.contains(&lower.as_str())
    }

    fn next_word_is_lowercase(after: &str) -> bool {
        after
            .trim_start()
            .chars()
            .find(|c| c.is_alphanumeric())
            .is_some_and(char::is_lowercase)
    }
}

impl TextAnalyzer for SimpleAnalyzer {
    fn sentences(&self, text: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut paragraph = String::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                if !paragraph.is_empty() {
                    Self::split_paragraph(&paragraph, &mut out);
                    paragraph.clear();
                }
                continue;
            }
            if !paragraph.is_empty() {
                paragraph.push(' ');
            }
            paragraph.push_str(line);
        }
        if !paragraph.is_empty() {
            Self::split_paragraph(&paragraph, &mut out);
        }

        out
    }

    fn words(&self, sentence: &str) -> Vec<String> {
        let mut words = Vec::new();
        let mut current = String::new();
        let mut chars = sentence.chars().peekable();

        while let Some(c) = chars.next() {
            if c.is_alphanumeric() {
                current.push(c);
                continue;
            }
            let joins = matches!(c, '\'' | '\u{2019}' | '-')
                && !current.is_empty()
                && chars.peek().is_some_and(|n| n.is_alphanumeric());
            if joins {
                current.push(c);
            } else if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            words.push(current);
        }

        words
    }

    fn bag_of_words(&self, sentence: &str) -> FxHashMap<String, usize> {
        let mut bag = FxHashMap::default();
        for word in self.words(sentence) {
            let word = word.to_lowercase();
            if self.stopwords.is_stopword(&word) {
                continue;
            }
            *bag.entry(word).or_insert(0) += 1;
        }
        bag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> SimpleAnalyzer {
        SimpleAnalyzer::new().with_stopwords(StopwordFilter::from_list(&["the", "is", "a"]))
    }

    #[test]
    fn test_basic_sentence_split() {
        let sentences = analyzer().sentences("One fish. Two fish! Red fish? Blue fish.");
        assert_eq!(sentences, vec!["One fish.", "Two fish!", "Red fish?", "Blue fish."]);
    }

    #[test]
    fn test_paragraphs_and_wrapped_lines() {
        let text = "First sentence runs\nacross two lines.\n\nSecond paragraph here.";
        let sentences = analyzer().sentences(text);
        assert_eq!(
            sentences,
            vec!["First sentence runs across two lines.", "Second paragraph here."]
        );
    }

    #[test]
    fn test_abbreviations_and_initials_do_not_split() {
        let sentences =
            analyzer().sentences("Dr. Smith met J. Doe at noon. They talked about the weather.");
        assert_eq!(
            sentences,
            vec!["Dr. Smith met J. Doe at noon.", "They talked about the weather."]
        );
    }

    #[test]
    fn test_quotes_close_sentences() {
        let sentences = analyzer().sentences("He said \"stop.\" Then he left.");
        assert_eq!(sentences, vec!["He said \"stop.\"", "Then he left."]);
    }

    #[test]
    fn test_lowercase_continuation_does_not_split() {
        let sentences = analyzer().sentences("It went on... and on. Done.");
        assert_eq!(sentences, vec!["It went on... and on.", "Done."]);
    }

    #[test]
    fn test_decimal_numbers_do_not_split() {
        let sentences = analyzer().sentences("Pi is about 3.14 today. Yes.");
        assert_eq!(sentences, vec!["Pi is about 3.14 today.", "Yes."]);
    }

    #[test]
    fn test_unterminated_tail_is_kept() {
        let sentences = analyzer().sentences("Complete sentence. Trailing fragment");
        assert_eq!(sentences, vec!["Complete sentence.", "Trailing fragment"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(analyzer().sentences("   \n\n  ").is_empty());
    }

    #[test]
    fn test_words() {
        let words = analyzer().words("Don't stop-me now, it's 2024!");
        assert_eq!(words, vec!["Don't", "stop-me", "now", "it's", "2024"]);
    }

    #[test]
    fn test_simplify() {
        assert_eq!(
            analyzer().simplify("The Quick,  brown FOX!"),
            "the quick brown fox"
        );
    }

    #[test]
    fn test_bag_of_words_drops_stopwords() {
        let bag = analyzer().bag_of_words("The cat is a cat.");
        assert_eq!(bag.len(), 1);
        assert_eq!(bag["cat"], 2);
    }
}
