//! TF-IDF term weighting
//!
//! Each sentence is treated as a document. Bags of words are projected onto a
//! shared [`Vocabulary`] and weighted by a [`TermWeighting`] implementation.

use rayon::prelude::*;
use rustc_hash::FxHashMap;

/// Ordered set of terms; the order fixes the matrix columns
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: FxHashMap<String, usize>,
}

impl Vocabulary {
    /// Distinct terms across all bags, sorted
    pub fn from_bags(bags: &[FxHashMap<String, usize>]) -> Self {
        let mut terms: Vec<String> = bags
            .iter()
            .flat_map(|bag| bag.keys().cloned())
            .collect::<rustc_hash::FxHashSet<_>>()
            .into_iter()
            .collect();
        terms.sort_unstable();

        let index = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();

        Self { terms, index }
    }

    /// Column of `term`
    pub fn position(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Dense count row for `bag`; terms outside the vocabulary are ignored
    pub fn vectorize(&self, bag: &FxHashMap<String, usize>) -> Vec<f64> {
        let mut row = vec![0.0; self.terms.len()];
        for (term, &count) in bag {
            if let Some(i) = self.position(term) {
                row[i] = count as f64;
            }
        }
        row
    }
}

/// Turns count rows into weighted rows of the same shape
pub trait TermWeighting {
    fn tfidf(&self, bags: &[Vec<f64>]) -> Vec<Vec<f64>>;
}

/// Smoothed TF-IDF with unit-length rows
///
/// `w(t, d) = (tf(t, d) / max_tf(d)) * ln((1 + n) / (1 + df(t)))`, after which
/// each row is L2-normalized. A term present in every document weighs zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmoothedTfIdf;

impl TermWeighting for SmoothedTfIdf {
    fn tfidf(&self, bags: &[Vec<f64>]) -> Vec<Vec<f64>> {
        let n = bags.len();
        let Some(width) = bags.first().map(Vec::len) else {
            return Vec::new();
        };

        let mut df = vec![0usize; width];
        for bag in bags {
            for (slot, &count) in df.iter_mut().zip(bag) {
                if count > 0.0 {
                    *slot += 1;
                }
            }
        }
        let idf: Vec<f64> = df
            .iter()
            .map(|&d| ((1.0 + n as f64) / (1.0 + d as f64)).ln())
            .collect();

        bags.par_iter()
            .map(|bag| {
                let max_tf = bag.iter().copied().fold(0.0, f64::max);
                if max_tf <= 0.0 {
                    return vec![0.0; width];
                }
                let mut row: Vec<f64> = bag
                    .iter()
                    .zip(&idf)
                    .map(|(&tf, &idf)| (tf / max_tf) * idf)
                    .collect();
                let norm = row.iter().map(|x| x * x).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for x in &mut row {
                        *x /= norm;
                    }
                }
                row
            })
            .collect()
    }
}
