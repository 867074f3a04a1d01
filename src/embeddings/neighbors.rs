//! Nearest-neighbor queries over word vectors
//!
//! [`top_k`] keeps a min-heap bounded to `k` entries, so scanning `M`
//! candidates costs O(M log k) regardless of vocabulary size. The word-level
//! helpers ([`distance`], [`analogy`], [`rank`]) are built on top of it and
//! work against any resident snapshot.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::errors::Result;
use crate::vector::{self, Vector};

/// A word and its similarity to the query
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub word: String,
    pub similarity: f64,
}

/// Heap entry ordered by similarity, then by arrival (earlier wins ties)
#[derive(Debug)]
struct Scored<'a> {
    similarity: f64,
    seq: usize,
    word: &'a str,
}

impl PartialEq for Scored<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scored<'_> {}

impl PartialOrd for Scored<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scored<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Higher similarity ranks higher; on a tie the earlier candidate does.
        self.similarity
            .total_cmp(&other.similarity)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Top `k` candidates by cosine similarity to `query`, best first
///
/// Candidates whose word is in `exclude` are skipped. Equal scores keep the
/// candidates' iteration order.
pub fn top_k<'a, I>(
    query: &[f32],
    candidates: I,
    exclude: &FxHashSet<String>,
    k: usize,
) -> Result<Vec<Neighbor>>
where
    I: IntoIterator<Item = (&'a str, &'a [f32])>,
{
    if k == 0 {
        return Ok(Vec::new());
    }

    let mut heap: BinaryHeap<Reverse<Scored<'a>>> = BinaryHeap::with_capacity(k + 1);

    for (seq, (word, vector)) in candidates.into_iter().enumerate() {
        if exclude.contains(word) {
            continue;
        }
        let entry = Scored {
            similarity: vector::cosine(query, vector)?,
            seq,
            word,
        };
        if heap.len() < k {
            heap.push(Reverse(entry));
        } else if let Some(Reverse(min)) = heap.peek() {
            if entry > *min {
                heap.pop();
                heap.push(Reverse(entry));
            }
        }
    }

    debug_assert!(heap.len() <= k);

    let mut best: Vec<Scored<'a>> = heap.into_iter().map(|Reverse(s)| s).collect();
    best.sort_by(|a, b| b.cmp(a));

    Ok(best
        .into_iter()
        .map(|s| Neighbor {
            word: s.word.to_string(),
            similarity: s.similarity,
        })
        .collect())
}

/// [`top_k`] over a word map, optionally restricted to `include`
///
/// Words in `include` that have no vector are ignored. Candidates are visited
/// in sorted word order so results do not depend on map layout.
pub fn nearest(
    vectors: &FxHashMap<String, Vector>,
    query: &[f32],
    include: Option<&FxHashSet<String>>,
    exclude: &FxHashSet<String>,
    k: usize,
) -> Result<Vec<Neighbor>> {
    let mut pool: Vec<(&str, &[f32])> = match include {
        Some(words) => words
            .iter()
            .filter_map(|w| vectors.get_key_value(w))
            .map(|(w, v)| (w.as_str(), v.as_slice()))
            .collect(),
        None => vectors
            .iter()
            .map(|(w, v)| (w.as_str(), v.as_slice()))
            .collect(),
    };
    pool.sort_unstable_by(|a, b| a.0.cmp(b.0));
    top_k(query, pool, exclude, k)
}

/// Vectors for every word, or `None` if any of them is missing
fn lookup<'a>(vectors: &'a FxHashMap<String, Vector>, words: &[&str]) -> Option<Vec<&'a [f32]>> {
    words
        .iter()
        .map(|w| vectors.get(*w).map(Vec::as_slice))
        .collect()
}

/// Cosine similarity between two words' vectors
pub fn cosine_words(vectors: &FxHashMap<String, Vector>, w1: &str, w2: &str) -> Result<Option<f64>> {
    match lookup(vectors, &[w1, w2]).as_deref() {
        Some([a, b]) => vector::cosine(a, b).map(Some),
        _ => Ok(None),
    }
}

/// Euclidean distance between two words' vectors
pub fn euclidean_words(
    vectors: &FxHashMap<String, Vector>,
    w1: &str,
    w2: &str,
) -> Result<Option<f64>> {
    match lookup(vectors, &[w1, w2]).as_deref() {
        Some([a, b]) => vector::euclidean(a, b).map(Some),
        _ => Ok(None),
    }
}

/// The `k` words closest to the normalized sum of `input`
///
/// Input words are excluded from the result. Returns `None` when any input
/// word has no vector, and an empty list for empty input.
pub fn distance(
    vectors: &FxHashMap<String, Vector>,
    input: &[&str],
    k: usize,
) -> Result<Option<Vec<Neighbor>>> {
    if input.is_empty() {
        return Ok(Some(Vec::new()));
    }
    let Some(found) = lookup(vectors, input) else {
        return Ok(None);
    };

    let query = vector::normalize(&vector::sum_columns::<f32, _>(&found)?);
    let exclude: FxHashSet<String> = input.iter().map(|w| w.to_string()).collect();

    nearest(vectors, &query, None, &exclude, k).map(Some)
}

/// Solve `w1 : w2 :: w3 : ?`
///
/// The answer is approximated by `vec(w2) - vec(w1) + vec(w3)`; the three
/// input words are excluded from the result.
pub fn analogy(
    vectors: &FxHashMap<String, Vector>,
    w1: &str,
    w2: &str,
    w3: &str,
    k: usize,
) -> Result<Option<Vec<Neighbor>>> {
    let Some(found) = lookup(vectors, &[w1, w2, w3]) else {
        return Ok(None);
    };
    let target = vector::add(&vector::sub(found[1], found[0])?, found[2])?;
    let query = vector::normalize(&target);
    let exclude: FxHashSet<String> = [w1, w2, w3].iter().map(|w| w.to_string()).collect();

    nearest(vectors, &query, None, &exclude, k).map(Some)
}

/// Order `set` by similarity to `word`, most similar first
///
/// Members of `set` without a vector are dropped; an unknown `word` yields an
/// empty list.
pub fn rank(
    vectors: &FxHashMap<String, Vector>,
    word: &str,
    set: &FxHashSet<String>,
) -> Result<Vec<Neighbor>> {
    match vectors.get(word) {
        Some(center) => nearest(vectors, center, Some(set), &FxHashSet::default(), set.len()),
        None => Ok(Vec::new()),
    }
}
