//! Sentence vectors and centroid scoring
//!
//! A sentence vector is the normalized sum of the vectors of its words of
//! interest. The document centroid is built the same way over every word in
//! the document, and each sentence is scored by its cosine similarity to it.

use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::errors::Result;
use crate::types::ScoredSentence;
use crate::vector::{self, Vector};

/// Build sentence vectors from resident word vectors
pub struct SentenceScorer<'a> {
    /// Resident word vectors
    vectors: &'a FxHashMap<String, Vector>,
    /// Words allowed to contribute
    allowed: &'a FxHashSet<String>,
    dimensions: usize,
}

impl<'a> SentenceScorer<'a> {
    pub fn new(
        vectors: &'a FxHashMap<String, Vector>,
        allowed: &'a FxHashSet<String>,
        dimensions: usize,
    ) -> Self {
        Self {
            vectors,
            allowed,
            dimensions,
        }
    }

    /// Normalized sum of the allowed words' vectors
    ///
    /// Words that are not allowed or have no vector contribute nothing; if
    /// none contribute, the zero vector is returned.
    pub fn build_vector<'w, I>(&self, words: I) -> Result<Vector>
    where
        I: IntoIterator<Item = &'w str>,
    {
        let mut sum = vec![0.0f32; self.dimensions];
        for word in words {
            if !self.allowed.contains(word) {
                continue;
            }
            if let Some(v) = self.vectors.get(word) {
                vector::add_assign(&mut sum, v)?;
            }
        }
        vector::normalize_in_place(&mut sum);
        Ok(sum)
    }

    /// Vector for one simplified (space-separated, lowercase) sentence
    pub fn build_sentence_vector(&self, sentence: &str) -> Result<Vector> {
        self.build_vector(sentence.split_whitespace())
    }

    /// Centroid over every word of every sentence
    pub fn build_document_vector(&self, sentences: &[String]) -> Result<Vector> {
        self.build_vector(sentences.iter().flat_map(|s| s.split_whitespace()))
    }

    /// Score every sentence against `centroid`, best first
    ///
    /// `simplified[i]` and `raw[i]` describe the same sentence. Equal scores
    /// keep document order.
    pub fn score(
        &self,
        simplified: &[String],
        raw: &[String],
        centroid: &[f32],
    ) -> Result<Vec<ScoredSentence>> {
        let mut scored: Vec<ScoredSentence> = simplified
            .par_iter()
            .zip(raw.par_iter())
            .enumerate()
            .map(|(index, (clean, text))| {
                let v = self.build_sentence_vector(clean)?;
                let score = vector::cosine(&v, centroid)?;
                Ok(ScoredSentence::new(index, text.clone(), score, v))
            })
            .collect::<Result<_>>()?;

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(scored)
    }
}
