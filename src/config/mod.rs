//! Summarizer specification types.
//!
//! A [`SummarizerSpec`] names the summarizer variant and its parameters. It is
//! validated by [`validation::ValidationEngine`] and turned into a ready
//! summarizer by [`SummarizerSpec::build`].
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "v": 1,
//!   "language": "en",
//!   "variant": {
//!     "kind": "embedding_cluster",
//!     "threshold": 0.3,
//!     "similarity_threshold": 0.95,
//!     "strategy": "ghalandari",
//!     "embeddings": { "path": "glove.6B.50d.txt", "dimensions": 50, "capacity": 1000 }
//!   },
//!   "strict": false
//! }
//! ```

pub mod errors;
pub mod validation;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::embeddings::{EmbeddingFile, EmbeddingStore};
use crate::errors::{Result, SummarizeError};
use crate::nlp::stopwords::StopwordFilter;
use crate::nlp::tokenizer::SimpleAnalyzer;
use crate::summarizer::{
    EmbeddingClusterSummarizer, SelectionStrategy, Summarizer, TfIdfSummarizer,
};
use validation::{ValidationEngine, ValidationReport};

/// Current spec version
pub const SPEC_VERSION: u32 = 1;

/// A summarizer that can be shared across threads
pub type DynSummarizer = Box<dyn Summarizer + Send + Sync>;

/// Top-level summarizer specification (v1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizerSpec {
    /// Spec version (currently `1`).
    pub v: u32,

    /// Stopword language for sentence analysis.
    #[serde(default = "default_language")]
    pub language: String,

    pub variant: SummarizeVariant,

    /// If `true`, unrecognized fields are errors; if `false`, warnings.
    #[serde(default)]
    pub strict: bool,

    /// Captures any fields not recognized by the schema.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

/// Summarizer variant and its parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SummarizeVariant {
    TfIdf(TfIdfConfig),
    EmbeddingCluster(EmbeddingClusterConfig),
}

impl SummarizeVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TfIdf(_) => "tf_idf",
            Self::EmbeddingCluster(_) => "embedding_cluster",
        }
    }
}

/// The TF-IDF summarizer has no parameters of its own.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TfIdfConfig {
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingClusterConfig {
    /// Salience threshold for words of interest
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Sentences more similar than this to a selected one are skipped
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    #[serde(default)]
    pub strategy: SelectionStrategy,

    pub embeddings: EmbeddingsConfig,

    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

/// Embedding file layout and store budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    pub path: PathBuf,

    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Maximum number of resident words
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Normalize vectors to unit length on load
    #[serde(default = "default_normalize")]
    pub normalize: bool,

    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_threshold() -> f64 {
    0.3
}

fn default_similarity_threshold() -> f64 {
    0.95
}

fn default_dimensions() -> usize {
    50
}

fn default_delimiter() -> char {
    ' '
}

fn default_capacity() -> usize {
    1000
}

fn default_normalize() -> bool {
    true
}

impl EmbeddingsConfig {
    /// Open an empty store over the configured file
    pub fn open_store(&self) -> EmbeddingStore {
        let file = EmbeddingFile::new(&self.path, self.dimensions)
            .with_delimiter(self.delimiter)
            .with_normalize(self.normalize);
        EmbeddingStore::new(file, self.capacity)
    }
}

impl SummarizerSpec {
    /// Parse a spec from JSON without validating it
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Run the default validation rules
    pub fn validate(&self) -> ValidationReport {
        ValidationEngine::with_defaults().validate(self)
    }

    /// Validate the spec and construct the summarizer it describes
    ///
    /// Warnings are logged; any error aborts with
    /// [`SummarizeError::InvalidConfig`]. The embedding store starts empty.
    pub fn build(&self) -> Result<DynSummarizer> {
        let report = self.validate();
        if report.has_errors() {
            return Err(SummarizeError::InvalidConfig { report });
        }
        for warning in report.warnings() {
            tracing::warn!(code = %warning.code, path = %warning.path, "{}", warning.message);
        }

        let analyzer = SimpleAnalyzer::new().with_stopwords(StopwordFilter::new(&self.language));
        tracing::debug!(variant = self.variant.as_str(), language = %self.language, "building summarizer");

        let summarizer: DynSummarizer = match &self.variant {
            SummarizeVariant::TfIdf(_) => Box::new(TfIdfSummarizer::new().with_analyzer(analyzer)),
            SummarizeVariant::EmbeddingCluster(cfg) => {
                let store = Arc::new(cfg.embeddings.open_store());
                Box::new(
                    EmbeddingClusterSummarizer::new(store)
                        .with_analyzer(analyzer)
                        .with_threshold(cfg.threshold)
                        .with_sim_threshold(cfg.similarity_threshold)
                        .with_strategy(cfg.strategy),
                )
            }
        };
        Ok(summarizer)
    }
}
