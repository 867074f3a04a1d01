//! Shared value types

use std::hash::{Hash, Hasher};

use crate::vector::Vector;

/// A sentence scored against the document centroid
///
/// Equality and hashing look only at `index` and `score`, so two entries for
/// the same sentence compare equal regardless of their text or vector.
#[derive(Debug, Clone)]
pub struct ScoredSentence {
    /// Position in the document (0 = first sentence)
    pub index: usize,
    /// Original sentence text, as returned in the summary
    pub text: String,
    /// Cosine similarity to the document centroid
    pub score: f64,
    /// Normalized sentence vector
    pub vector: Vector,
}

impl ScoredSentence {
    pub fn new(index: usize, text: impl Into<String>, score: f64, vector: Vector) -> Self {
        Self {
            index,
            text: text.into(),
            score,
            vector,
        }
    }
}

impl PartialEq for ScoredSentence {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.score.to_bits() == other.score.to_bits()
    }
}

impl Eq for ScoredSentence {}

impl Hash for ScoredSentence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.score.to_bits().hash(state);
    }
}
