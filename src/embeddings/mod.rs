//! Word embeddings
//!
//! This module provides the on-disk vector file reader, the capacity-bounded
//! resident store, and nearest-neighbor queries over resident vectors.

pub mod loader;
pub mod neighbors;
pub mod store;

pub use loader::EmbeddingFile;
pub use neighbors::Neighbor;
pub use store::{EmbeddingSnapshot, EmbeddingStore, EnsureReport};
