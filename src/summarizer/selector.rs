//! Diversified greedy sentence selection
//!
//! Both strategies start from the highest-scoring sentence and then fill the
//! remaining slots one at a time, never accepting a sentence whose vector is
//! more similar than `sim_threshold` to a sentence already chosen:
//!
//! - [`SelectionStrategy::FirstFit`] (Rossiello et al.) takes the first
//!   acceptable sentence in score order.
//! - [`SelectionStrategy::CentroidMaximizing`] (Ghalandari) takes the
//!   acceptable sentence that brings the summary centroid closest to the
//!   document centroid.
//!
//! A slot with no acceptable sentence stays empty, so a summary can be
//! shorter than requested.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::types::ScoredSentence;
use crate::vector::{self, Vector};

/// Greedy selection strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionStrategy {
    /// Accept the first non-redundant sentence in score order.
    #[serde(alias = "first_fit")]
    #[serde(rename = "rossiello")]
    FirstFit,
    /// Accept the non-redundant sentence that best realigns the summary
    /// centroid with the document centroid.
    #[default]
    #[serde(alias = "centroid_maximizing")]
    #[serde(rename = "ghalandari")]
    CentroidMaximizing,
}

/// Configuration for sentence selection
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    pub strategy: SelectionStrategy,
    /// Number of sentences to select
    pub num_sentences: usize,
    /// Maximum cosine similarity allowed between two selected sentences
    pub sim_threshold: f64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            strategy: SelectionStrategy::default(),
            num_sentences: 10,
            sim_threshold: 0.95,
        }
    }
}

/// Result of sentence selection
#[derive(Debug, Clone)]
pub struct SummaryResult {
    /// Selected sentences in document order
    pub sentences: Vec<ScoredSentence>,
    /// Number of sentences that were asked for
    pub requested: usize,
}

impl SummaryResult {
    fn empty(requested: usize) -> Self {
        Self {
            sentences: Vec::new(),
            requested,
        }
    }

    /// Whether every requested slot was filled
    pub fn is_complete(&self) -> bool {
        self.sentences.len() >= self.requested
    }

    /// Selected sentence texts joined by newlines
    pub fn text(&self) -> String {
        self.sentences
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Running state of one selection
struct SelectionState<'a> {
    picked: FxHashSet<usize>,
    chosen: Vec<&'a ScoredSentence>,
    /// Unnormalized sum of the chosen vectors
    summary_sum: Vector,
}

impl<'a> SelectionState<'a> {
    fn seed(first: &'a ScoredSentence) -> Self {
        let mut picked = FxHashSet::default();
        picked.insert(first.index);
        Self {
            picked,
            chosen: vec![first],
            summary_sum: first.vector.clone(),
        }
    }

    fn contains(&self, sentence: &ScoredSentence) -> bool {
        self.picked.contains(&sentence.index)
    }

    fn push(&mut self, sentence: &'a ScoredSentence) -> Result<()> {
        vector::add_assign(&mut self.summary_sum, &sentence.vector)?;
        self.picked.insert(sentence.index);
        self.chosen.push(sentence);
        Ok(())
    }
}

/// Greedy diversified sentence selector
#[derive(Debug, Default)]
pub struct SentenceSelector {
    config: SelectorConfig,
}

impl SentenceSelector {
    /// Create a new selector with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: SelectorConfig) -> Self {
        Self { config }
    }

    pub fn with_strategy(mut self, strategy: SelectionStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Set number of sentences to select
    pub fn with_num_sentences(mut self, n: usize) -> Self {
        self.config.num_sentences = n;
        self
    }

    /// Set the redundancy threshold
    pub fn with_sim_threshold(mut self, threshold: f64) -> Self {
        self.config.sim_threshold = threshold;
        self
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Select sentences from `candidates`, which must be sorted by score
    /// (best first)
    ///
    /// `centroid` is the document centroid; only the centroid-maximizing
    /// strategy reads it.
    pub fn select(&self, candidates: &[ScoredSentence], centroid: &[f32]) -> Result<SummaryResult> {
        let requested = self.config.num_sentences;
        let Some(first) = candidates.first() else {
            return Ok(SummaryResult::empty(requested));
        };
        if requested == 0 {
            return Ok(SummaryResult::empty(requested));
        }

        let mut state = SelectionState::seed(first);
        let slots = requested.min(candidates.len());

        for _ in 1..slots {
            let next = match self.config.strategy {
                SelectionStrategy::FirstFit => self.first_fit(candidates, &state)?,
                SelectionStrategy::CentroidMaximizing => {
                    self.centroid_maximizing(candidates, &state, centroid)?
                }
            };
            match next {
                Some(sentence) => state.push(sentence)?,
                // Later slots would see the same state and fail the same way.
                None => break,
            }
        }

        Ok(Self::finish(state.chosen, requested))
    }

    fn is_redundant(&self, candidate: &ScoredSentence, state: &SelectionState<'_>) -> Result<bool> {
        for chosen in &state.chosen {
            if vector::cosine(&candidate.vector, &chosen.vector)? > self.config.sim_threshold {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn first_fit<'a>(
        &self,
        candidates: &'a [ScoredSentence],
        state: &SelectionState<'a>,
    ) -> Result<Option<&'a ScoredSentence>> {
        for candidate in candidates {
            if state.contains(candidate) || self.is_redundant(candidate, state)? {
                continue;
            }
            return Ok(Some(candidate));
        }
        Ok(None)
    }

    fn centroid_maximizing<'a>(
        &self,
        candidates: &'a [ScoredSentence],
        state: &SelectionState<'a>,
        centroid: &[f32],
    ) -> Result<Option<&'a ScoredSentence>> {
        let mut best: Option<(&'a ScoredSentence, f64)> = None;

        for candidate in candidates {
            if state.contains(candidate) || self.is_redundant(candidate, state)? {
                continue;
            }
            let mut combined = vector::add(&candidate.vector, &state.summary_sum)?;
            vector::normalize_in_place(&mut combined);
            let gain = vector::cosine(centroid, &combined)?;

            if best.map_or(true, |(_, best_gain)| gain > best_gain) {
                best = Some((candidate, gain));
            }
        }

        Ok(best.map(|(sentence, _)| sentence))
    }

    fn finish(chosen: Vec<&ScoredSentence>, requested: usize) -> SummaryResult {
        let mut sentences: Vec<ScoredSentence> = chosen.into_iter().cloned().collect();
        sentences.sort_by_key(|s| s.index);
        SummaryResult {
            sentences,
            requested,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(index: usize, score: f64, v: &[f32]) -> ScoredSentence {
        ScoredSentence::new(index, format!("Sentence {index}."), score, vector::normalize(v))
    }

    /// Candidates sorted by score. Sentence 3 nearly duplicates sentence 1.
    fn candidates() -> Vec<ScoredSentence> {
        vec![
            sentence(1, 0.95, &[1.0, 0.1, 0.0]),
            sentence(3, 0.94, &[1.0, 0.11, 0.0]),
            sentence(0, 0.70, &[0.0, 1.0, 0.0]),
            sentence(4, 0.60, &[0.6, 0.0, 0.8]),
            sentence(2, 0.20, &[0.5, 0.5, 0.5]),
        ]
    }

    fn centroid() -> Vector {
        vector::normalize(&[1.0, 0.5, 0.5])
    }

    fn assert_invariants(result: &SummaryResult, threshold: f64) {
        let indices: FxHashSet<_> = result.sentences.iter().map(|s| s.index).collect();
        assert_eq!(indices.len(), result.sentences.len(), "duplicate selection");
        assert!(result.sentences.len() <= result.requested);
        for pair in result.sentences.windows(2) {
            assert!(pair[0].index < pair[1].index, "not in document order");
        }
        for (i, a) in result.sentences.iter().enumerate() {
            for b in &result.sentences[i + 1..] {
                assert!(vector::cosine(&a.vector, &b.vector).unwrap() <= threshold);
            }
        }
    }

    #[test]
    fn test_first_fit_skips_near_duplicate() {
        let selector = SentenceSelector::new()
            .with_strategy(SelectionStrategy::FirstFit)
            .with_num_sentences(2);
        let result = selector.select(&candidates(), &centroid()).unwrap();

        let indices: Vec<_> = result.sentences.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1]);
        assert_invariants(&result, 0.95);
    }

    #[test]
    fn test_centroid_maximizing_picks_best_realignment() {
        let selector = SentenceSelector::new()
            .with_strategy(SelectionStrategy::CentroidMaximizing)
            .with_num_sentences(2);
        let result = selector.select(&candidates(), &centroid()).unwrap();

        // Sentence 2 scores lowest but pulls the summary closest to the
        // document centroid.
        let indices: Vec<_> = result.sentences.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 2]);
        assert_invariants(&result, 0.95);
    }

    #[test]
    fn test_both_strategies_hold_invariants() {
        for strategy in [SelectionStrategy::FirstFit, SelectionStrategy::CentroidMaximizing] {
            for n in 0..=6 {
                let selector = SentenceSelector::new()
                    .with_strategy(strategy)
                    .with_num_sentences(n);
                let result = selector.select(&candidates(), &centroid()).unwrap();
                assert_invariants(&result, 0.95);
            }
        }
    }

    #[test]
    fn test_redundancy_can_leave_slots_unfilled() {
        let dupes = vec![
            sentence(0, 0.9, &[1.0, 0.0]),
            sentence(1, 0.8, &[1.0, 0.01]),
            sentence(2, 0.7, &[1.0, 0.02]),
        ];
        for strategy in [SelectionStrategy::FirstFit, SelectionStrategy::CentroidMaximizing] {
            let result = SentenceSelector::new()
                .with_strategy(strategy)
                .with_num_sentences(3)
                .select(&dupes, &[1.0, 0.0])
                .unwrap();
            assert_eq!(result.sentences.len(), 1);
            assert!(!result.is_complete());
        }
    }

    #[test]
    fn test_request_larger_than_pool() {
        let result = SentenceSelector::new()
            .with_num_sentences(50)
            .with_sim_threshold(1.0)
            .select(&candidates(), &centroid())
            .unwrap();
        assert_eq!(result.sentences.len(), 5);
    }

    #[test]
    fn test_top_sentence_always_first_pick() {
        let result = SentenceSelector::new()
            .with_num_sentences(1)
            .select(&candidates(), &centroid())
            .unwrap();
        assert_eq!(result.sentences.len(), 1);
        assert_eq!(result.sentences[0].index, 1);
        assert_eq!(result.text(), "Sentence 1.");
    }

    #[test]
    fn test_empty_input_and_zero_request() {
        let selector = SentenceSelector::new();
        assert!(selector.select(&[], &centroid()).unwrap().sentences.is_empty());

        let none = SentenceSelector::new()
            .with_num_sentences(0)
            .select(&candidates(), &centroid())
            .unwrap();
        assert!(none.sentences.is_empty());
    }

    #[test]
    fn test_strategy_serde_names() {
        let s: SelectionStrategy = serde_json::from_str("\"ghalandari\"").unwrap();
        assert_eq!(s, SelectionStrategy::CentroidMaximizing);
        let s: SelectionStrategy = serde_json::from_str("\"first_fit\"").unwrap();
        assert_eq!(s, SelectionStrategy::FirstFit);
        assert_eq!(
            serde_json::to_string(&SelectionStrategy::FirstFit).unwrap(),
            "\"rossiello\""
        );
    }
}
