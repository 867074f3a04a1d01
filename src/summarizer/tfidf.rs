//! Embedding-free summarization by TF-IDF salience mass

use rustc_hash::FxHashMap;

use super::salience::SalienceFilter;
use super::{trace_stage, Summarizer, STAGE_SALIENCE, STAGE_SELECT, STAGE_SPLIT, STAGE_WEIGHT};
use crate::errors::Result;
use crate::nlp::tfidf::{SmoothedTfIdf, TermWeighting, Vocabulary};
use crate::nlp::tokenizer::{SimpleAnalyzer, TextAnalyzer};

/// Scores each sentence by the summed salience of its words and keeps the
/// top scorers in document order.
#[derive(Debug, Clone, Default)]
pub struct TfIdfSummarizer<A = SimpleAnalyzer, W = SmoothedTfIdf> {
    analyzer: A,
    weighting: W,
}

impl TfIdfSummarizer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A, W> TfIdfSummarizer<A, W> {
    pub fn with_analyzer<B>(self, analyzer: B) -> TfIdfSummarizer<B, W> {
        TfIdfSummarizer {
            analyzer,
            weighting: self.weighting,
        }
    }

    pub fn with_weighting<V>(self, weighting: V) -> TfIdfSummarizer<A, V> {
        TfIdfSummarizer {
            analyzer: self.analyzer,
            weighting,
        }
    }
}

impl<A: TextAnalyzer, W: TermWeighting> TfIdfSummarizer<A, W> {
    /// Sentence scores in document order
    pub fn sentence_scores(&self, sentences: &[String]) -> Result<Vec<f64>> {
        let (vocab, bags, rows) = {
            trace_stage!(STAGE_WEIGHT);
            let bags: Vec<FxHashMap<String, usize>> = sentences
                .iter()
                .map(|s| self.analyzer.bag_of_words(s))
                .collect();
            let vocab = Vocabulary::from_bags(&bags);
            let counts: Vec<Vec<f64>> = bags.iter().map(|b| vocab.vectorize(b)).collect();
            let rows = self.weighting.tfidf(&counts);
            (vocab, bags, rows)
        };

        trace_stage!(STAGE_SALIENCE);
        let salience = SalienceFilter::default().salience(&rows)?;
        Ok(bags
            .iter()
            .map(|bag| {
                bag.iter()
                    .filter_map(|(term, &count)| {
                        vocab.position(term).map(|i| count as f64 * salience[i])
                    })
                    .sum()
            })
            .collect())
    }
}

impl<A: TextAnalyzer, W: TermWeighting> Summarizer for TfIdfSummarizer<A, W> {
    fn summarize(&self, text: &str, lines: usize) -> Result<String> {
        let sentences = {
            trace_stage!(STAGE_SPLIT);
            self.analyzer.sentences(text)
        };
        if sentences.is_empty() || lines == 0 {
            return Ok(String::new());
        }

        let scores = self.sentence_scores(&sentences)?;

        trace_stage!(STAGE_SELECT);
        let mut ranked: Vec<usize> = (0..sentences.len()).collect();
        ranked.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
        ranked.truncate(lines);
        ranked.sort_unstable();

        Ok(ranked
            .into_iter()
            .map(|i| sentences[i].as_str())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn sentence_count(&self, text: &str) -> usize {
        self.analyzer.sentences(text).len()
    }
}
