//! Error types
//!
//! Only conditions a caller can act on are surfaced here. Malformed lines in
//! an embedding file and words without a vector are handled where they occur
//! and never reach this enum.

use std::path::PathBuf;

use crate::config::validation::ValidationReport;

/// Errors produced by the summarization core
#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    /// Two vectors of different length were combined.
    #[error("dimension mismatch: left has {left} components, right has {right}")]
    DimensionMismatch { left: usize, right: usize },

    /// The embedding file could not be opened or read.
    #[error("embedding file {} is unavailable: {source}", path.display())]
    BackingFileUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A summarizer spec failed validation.
    #[error("invalid summarizer spec ({} error(s))", report.errors().count())]
    InvalidConfig { report: ValidationReport },

    /// A summarizer spec was not valid JSON for the schema.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, SummarizeError>;
