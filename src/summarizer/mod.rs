//! Extractive summarizers
//!
//! Every summarizer picks whole sentences from the input and returns them in
//! document order, one per line. [`EmbeddingClusterSummarizer`] scores
//! sentences against an embedding centroid; [`TfIdfSummarizer`] scores them
//! by raw TF-IDF mass.

pub mod embedding_cluster;
pub mod salience;
pub mod scorer;
pub mod selector;
pub mod tfidf;

pub use embedding_cluster::EmbeddingClusterSummarizer;
pub use salience::SalienceFilter;
pub use scorer::SentenceScorer;
pub use selector::{SelectionStrategy, SelectorConfig, SentenceSelector, SummaryResult};
pub use tfidf::TfIdfSummarizer;

use crate::errors::Result;

pub const STAGE_SPLIT: &str = "split";
pub const STAGE_WEIGHT: &str = "weight";
pub const STAGE_SALIENCE: &str = "salience";
pub const STAGE_LOAD: &str = "load";
pub const STAGE_SCORE: &str = "score";
pub const STAGE_SELECT: &str = "select";

/// Enter a tracing span for one summarization stage; it closes at the end of
/// the enclosing block.
macro_rules! trace_stage {
    ($name:expr) => {
        let _span = tracing::info_span!("summarize_stage", stage = $name).entered();
    };
}
pub(crate) use trace_stage;

/// An extractive summarizer
pub trait Summarizer {
    /// Summarize `text` into at most `lines` sentences
    ///
    /// Asking for more sentences than the text holds returns every sentence.
    fn summarize(&self, text: &str, lines: usize) -> Result<String>;

    /// Summarize `text` into roughly `ratio` of its sentences (at least one)
    fn summarize_ratio(&self, text: &str, ratio: f64) -> Result<String> {
        let count = self.sentence_count(text);
        self.summarize(text, lines_for_ratio(count, ratio))
    }

    /// Number of sentences the summarizer sees in `text`
    fn sentence_count(&self, text: &str) -> usize;
}

/// `max(1, round(count * ratio))`
pub fn lines_for_ratio(count: usize, ratio: f64) -> usize {
    let lines = (count as f64 * ratio).round();
    if lines.is_finite() && lines >= 1.0 {
        lines as usize
    } else {
        1
    }
}
