//! Capacity-bounded, on-demand word vector store
//!
//! The store keeps at most `capacity` resident words. Callers declare the
//! words they are about to use with [`EmbeddingStore::ensure`]; missing words
//! are streamed in from the backing file and, when room is needed, every
//! resident word that is not part of the current request is evicted.
//!
//! Writers are serialized by a mutex held for the whole of `ensure`. Readers
//! never wait on file I/O: they take an [`EmbeddingSnapshot`], an `Arc` of the
//! map as it was after the last completed `ensure`.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rustc_hash::{FxHashMap, FxHashSet};

use super::loader::EmbeddingFile;
use crate::errors::Result;
use crate::vector::Vector;

/// Immutable view of the resident vectors
pub type EmbeddingSnapshot = Arc<FxHashMap<String, Vector>>;

/// What a call to [`EmbeddingStore::ensure`] did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnsureReport {
    /// Words in the request
    pub requested: usize,
    /// Words read from the file in this call
    pub loaded: usize,
    /// Resident words dropped to make room
    pub evicted: usize,
    /// Requested words the file does not contain
    pub absent: usize,
}

/// Word vector store with a resident-word budget
#[derive(Debug)]
pub struct EmbeddingStore {
    file: EmbeddingFile,
    capacity: usize,
    /// Words already requested and kept, including ones the file lacks
    resident: Mutex<FxHashSet<String>>,
    vectors: RwLock<EmbeddingSnapshot>,
}

impl EmbeddingStore {
    /// Create an empty store over `file`. Nothing is read until `ensure`.
    pub fn new(file: EmbeddingFile, capacity: usize) -> Self {
        Self {
            file,
            capacity,
            resident: Mutex::new(FxHashSet::default()),
            vectors: RwLock::new(Arc::new(FxHashMap::default())),
        }
    }

    /// Make every word in `words` that exists in the backing file resident
    ///
    /// Requested words are never dropped to honor the capacity; if the
    /// request alone is larger than the capacity the store temporarily holds
    /// more than `capacity` words. On error the store is left unchanged.
    pub fn ensure(&self, words: &FxHashSet<String>) -> Result<EnsureReport> {
        let mut resident = self.resident.lock();
        self.ensure_locked(&mut resident, words)
    }

    /// [`ensure`](Self::ensure), then snapshot before any other writer runs
    ///
    /// The snapshot holds every requested word the file contains, even when
    /// other threads are ensuring disjoint sets concurrently.
    pub fn ensure_snapshot(&self, words: &FxHashSet<String>) -> Result<(EnsureReport, EmbeddingSnapshot)> {
        let mut resident = self.resident.lock();
        let report = self.ensure_locked(&mut resident, words)?;
        Ok((report, self.snapshot()))
    }

    fn ensure_locked(
        &self,
        resident: &mut FxHashSet<String>,
        words: &FxHashSet<String>,
    ) -> Result<EnsureReport> {
        let missing: FxHashSet<String> = words
            .iter()
            .filter(|w| !resident.contains(*w))
            .cloned()
            .collect();

        let mut report = EnsureReport {
            requested: words.len(),
            ..EnsureReport::default()
        };
        if missing.is_empty() {
            return Ok(report);
        }

        let evict: Vec<String> = if resident.len() + missing.len() > self.capacity {
            resident
                .iter()
                .filter(|w| !words.contains(*w))
                .cloned()
                .collect()
        } else {
            Vec::new()
        };

        // Read before touching any state so a failed read changes nothing.
        let outcome = self.file.load_matching(&missing)?;
        report.loaded = outcome.vectors.len();
        report.absent = missing.len() - outcome.vectors.len();
        report.evicted = evict.len();

        {
            let mut guard = self.vectors.write();
            let map = Arc::make_mut(&mut guard);
            for word in &evict {
                map.remove(word);
            }
            map.extend(outcome.vectors);
        }
        for word in &evict {
            resident.remove(word);
        }
        resident.extend(missing);

        if resident.len() > self.capacity {
            tracing::warn!(
                resident = resident.len(),
                capacity = self.capacity,
                "embedding store over capacity; request larger than budget"
            );
        }
        tracing::debug!(
            requested = report.requested,
            loaded = report.loaded,
            evicted = report.evicted,
            absent = report.absent,
            "embedding store updated"
        );

        Ok(report)
    }

    /// Current resident vectors
    pub fn snapshot(&self) -> EmbeddingSnapshot {
        Arc::clone(&self.vectors.read())
    }

    /// Copy of the vector for `word`, if resident
    pub fn vector(&self, word: &str) -> Option<Vector> {
        self.vectors.read().get(word).cloned()
    }

    /// Whether `word` has a resident vector
    pub fn contains(&self, word: &str) -> bool {
        self.vectors.read().contains_key(word)
    }

    /// Number of resident vectors
    pub fn len(&self) -> usize {
        self.vectors.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of resident keys, counting requested words the file lacks
    pub fn resident_len(&self) -> usize {
        self.resident.lock().len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn dimensions(&self) -> usize {
        self.file.dimensions()
    }

    pub fn file(&self) -> &EmbeddingFile {
        &self.file
    }

    /// Drop every resident word
    pub fn clear(&self) {
        let mut resident = self.resident.lock();
        resident.clear();
        *self.vectors.write() = Arc::new(FxHashMap::default());
    }
}
