//! # rapid-summarize
//!
//! Extractive text summarization over word embeddings.
//!
//! The main entry point is [`EmbeddingClusterSummarizer`]: salient words
//! (by TF-IDF) are looked up in a capacity-bounded [`EmbeddingStore`], each
//! sentence is embedded as the normalized sum of its salient word vectors,
//! and sentences are picked greedily by closeness to the document centroid
//! while near-duplicates are skipped. [`TfIdfSummarizer`] needs no
//! embeddings at all.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rapid_summarize::{EmbeddingClusterSummarizer, EmbeddingFile, EmbeddingStore, Summarizer};
//!
//! let store = EmbeddingStore::new(EmbeddingFile::new("glove.6B.50d.txt", 50), 1000);
//! let summarizer = EmbeddingClusterSummarizer::new(Arc::new(store));
//! let summary = summarizer.summarize(text, 3)?;
//! ```
//!
//! Summarizers can also be described in JSON and built with
//! [`config::SummarizerSpec::build`].

pub mod config;
pub mod embeddings;
pub mod errors;
pub mod nlp;
pub mod summarizer;
pub mod types;
pub mod vector;

pub use config::{SummarizeVariant, SummarizerSpec};
pub use embeddings::{EmbeddingFile, EmbeddingStore, Neighbor};
pub use errors::{Result, SummarizeError};
pub use nlp::stopwords::StopwordFilter;
pub use nlp::tokenizer::{SimpleAnalyzer, TextAnalyzer};
pub use summarizer::{
    EmbeddingClusterSummarizer, SelectionStrategy, Summarizer, TfIdfSummarizer,
};
pub use types::ScoredSentence;
pub use vector::Vector;
