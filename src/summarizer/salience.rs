//! Document-level term salience
//!
//! TF-IDF rows are summed column-wise into one salience score per term and
//! scaled by the largest score. Terms scoring strictly above the threshold are
//! the "words of interest": the only words allowed to contribute to sentence
//! and document vectors.

use rustc_hash::FxHashSet;

use crate::errors::Result;
use crate::nlp::tfidf::Vocabulary;
use crate::vector::sum_columns;

/// Thresholded salience over a TF-IDF matrix
#[derive(Debug, Clone, Copy)]
pub struct SalienceFilter {
    threshold: f64,
}

impl Default for SalienceFilter {
    fn default() -> Self {
        Self { threshold: 0.3 }
    }
}

impl SalienceFilter {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Column sums scaled by their maximum
    ///
    /// When the maximum is not positive the raw sums are returned.
    pub fn salience(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
        let mut sums = sum_columns::<f64, _>(rows)?;
        let max = sums.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max > 0.0 {
            for s in &mut sums {
                *s /= max;
            }
        }
        Ok(sums)
    }

    /// Salience paired with the vocabulary terms, in column order
    pub fn salience_vector(&self, rows: &[Vec<f64>], vocab: &Vocabulary) -> Result<Vec<(String, f64)>> {
        let scores = self.salience(rows)?;
        Ok(vocab.terms().iter().cloned().zip(scores).collect())
    }

    /// Terms whose normalized salience is strictly above the threshold
    ///
    /// An empty set is a valid outcome for short or uniform documents.
    pub fn words_of_interest(&self, rows: &[Vec<f64>], vocab: &Vocabulary) -> Result<FxHashSet<String>> {
        Ok(self
            .salience_vector(rows, vocab)?
            .into_iter()
            .filter(|(_, score)| *score > self.threshold)
            .map(|(term, _)| term)
            .collect())
    }
}
