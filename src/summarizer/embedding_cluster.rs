//! Centroid-based summarization over word embeddings
//!
//! Salient words (by TF-IDF) are loaded from the embedding store, each
//! sentence becomes the normalized sum of its salient word vectors, and the
//! sentences closest to the document centroid are picked greedily while
//! skipping near-duplicates.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::salience::SalienceFilter;
use super::scorer::SentenceScorer;
use super::selector::{SelectionStrategy, SelectorConfig, SentenceSelector, SummaryResult};
use super::{
    trace_stage, Summarizer, STAGE_LOAD, STAGE_SALIENCE, STAGE_SCORE, STAGE_SELECT, STAGE_SPLIT,
    STAGE_WEIGHT,
};
use crate::embeddings::EmbeddingStore;
use crate::errors::Result;
use crate::nlp::tfidf::{SmoothedTfIdf, TermWeighting, Vocabulary};
use crate::nlp::tokenizer::{SimpleAnalyzer, TextAnalyzer};

/// Embedding-cluster extractive summarizer
///
/// Generic over the text analyzer and the term weighting; the defaults are
/// [`SimpleAnalyzer`] and [`SmoothedTfIdf`]. The store is shared, so many
/// summarizers (or threads) can draw on one resident-word budget.
#[derive(Debug)]
pub struct EmbeddingClusterSummarizer<A = SimpleAnalyzer, W = SmoothedTfIdf> {
    analyzer: A,
    weighting: W,
    store: Arc<EmbeddingStore>,
    salience: SalienceFilter,
    selection: SelectorConfig,
}

impl EmbeddingClusterSummarizer {
    /// Summarizer over `store` with default analysis and thresholds
    pub fn new(store: Arc<EmbeddingStore>) -> Self {
        Self {
            analyzer: SimpleAnalyzer::default(),
            weighting: SmoothedTfIdf,
            store,
            salience: SalienceFilter::default(),
            selection: SelectorConfig::default(),
        }
    }
}

impl<A, W> EmbeddingClusterSummarizer<A, W> {
    /// Replace the text analyzer
    pub fn with_analyzer<B>(self, analyzer: B) -> EmbeddingClusterSummarizer<B, W> {
        EmbeddingClusterSummarizer {
            analyzer,
            weighting: self.weighting,
            store: self.store,
            salience: self.salience,
            selection: self.selection,
        }
    }

    /// Replace the term weighting
    pub fn with_weighting<V>(self, weighting: V) -> EmbeddingClusterSummarizer<A, V> {
        EmbeddingClusterSummarizer {
            analyzer: self.analyzer,
            weighting,
            store: self.store,
            salience: self.salience,
            selection: self.selection,
        }
    }

    /// Salience threshold for words of interest
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.salience = SalienceFilter::new(threshold);
        self
    }

    /// Redundancy threshold between selected sentences
    pub fn with_sim_threshold(mut self, threshold: f64) -> Self {
        self.selection.sim_threshold = threshold;
        self
    }

    pub fn with_strategy(mut self, strategy: SelectionStrategy) -> Self {
        self.selection.strategy = strategy;
        self
    }

    pub fn store(&self) -> &Arc<EmbeddingStore> {
        &self.store
    }

    pub fn threshold(&self) -> f64 {
        self.salience.threshold()
    }

    pub fn selection(&self) -> &SelectorConfig {
        &self.selection
    }
}

impl<A: TextAnalyzer, W: TermWeighting> EmbeddingClusterSummarizer<A, W> {
    /// Run the full pipeline and return the selection with its scores
    pub fn summarize_detailed(&self, text: &str, lines: usize) -> Result<SummaryResult> {
        let sentences = {
            trace_stage!(STAGE_SPLIT);
            self.analyzer.sentences(text)
        };
        let selector = SentenceSelector::with_config(SelectorConfig {
            num_sentences: lines,
            ..self.selection.clone()
        });
        if sentences.is_empty() || lines == 0 {
            return selector.select(&[], &[]);
        }
        let simplified: Vec<String> = sentences.iter().map(|s| self.analyzer.simplify(s)).collect();

        let (vocab, rows) = {
            trace_stage!(STAGE_WEIGHT);
            let bags: Vec<FxHashMap<String, usize>> = sentences
                .iter()
                .map(|s| self.analyzer.bag_of_words(s))
                .collect();
            let vocab = Vocabulary::from_bags(&bags);
            let counts: Vec<Vec<f64>> = bags.iter().map(|b| vocab.vectorize(b)).collect();
            let rows = self.weighting.tfidf(&counts);
            (vocab, rows)
        };

        let words = {
            trace_stage!(STAGE_SALIENCE);
            self.salience.words_of_interest(&rows, &vocab)?
        };
        tracing::debug!(
            sentences = sentences.len(),
            vocabulary = vocab.len(),
            words_of_interest = words.len(),
            "salience computed"
        );

        let snapshot = {
            trace_stage!(STAGE_LOAD);
            let (report, snapshot) = self.store.ensure_snapshot(&words)?;
            tracing::debug!(loaded = report.loaded, absent = report.absent, "words of interest resident");
            snapshot
        };

        let (scored, centroid) = {
            trace_stage!(STAGE_SCORE);
            let scorer = SentenceScorer::new(&snapshot, &words, self.store.dimensions());
            let centroid = scorer.build_document_vector(&simplified)?;
            (scorer.score(&simplified, &sentences, &centroid)?, centroid)
        };

        trace_stage!(STAGE_SELECT);
        selector.select(&scored, &centroid)
    }
}

impl<A: TextAnalyzer, W: TermWeighting> Summarizer for EmbeddingClusterSummarizer<A, W> {
    fn summarize(&self, text: &str, lines: usize) -> Result<String> {
        Ok(self.summarize_detailed(text, lines)?.text())
    }

    fn sentence_count(&self, text: &str) -> usize {
        self.analyzer.sentences(text).len()
    }
}
