//! Streaming reader for plain-text embedding files
//!
//! Each line holds one entry: `word<d>c1<d>c2 ... <d>cD`. The file is read
//! line by line and a line is only parsed when its word passes the caller's
//! filter, so a multi-gigabyte file never has to fit in memory.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::errors::{Result, SummarizeError};
use crate::vector::{normalize_in_place, Vector};

/// Location and layout of an embedding file
#[derive(Debug, Clone)]
pub struct EmbeddingFile {
    path: PathBuf,
    dimensions: usize,
    delimiter: char,
    normalize: bool,
}

/// Outcome of one pass over the file
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Parsed entries, keyed by word
    pub vectors: FxHashMap<String, Vector>,
    /// Skipped lines: matched lines that could not be parsed, and any line
    /// that is not valid UTF-8
    pub malformed: usize,
}

/// Why a line was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MalformedLine {
    EmptyWord,
    WrongFieldCount,
    BadFloat,
}

impl EmbeddingFile {
    /// Describe a file with the given vector dimensionality
    ///
    /// Defaults: space delimiter, vectors normalized to unit length on load.
    pub fn new(path: impl Into<PathBuf>, dimensions: usize) -> Self {
        Self {
            path: path.into(),
            dimensions,
            delimiter: ' ',
            normalize: true,
        }
    }

    /// Set the field delimiter
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether vectors are normalized to unit length on load
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Load the entries for every word in `words`
    ///
    /// Words not present in the file are simply absent from the result.
    pub fn load_matching(&self, words: &FxHashSet<String>) -> Result<LoadOutcome> {
        if words.is_empty() {
            return Ok(LoadOutcome::default());
        }
        self.scan(words)
    }

    fn scan(&self, words: &FxHashSet<String>) -> Result<LoadOutcome> {
        let unavailable = |source| SummarizeError::BackingFileUnavailable {
            path: self.path.clone(),
            source,
        };

        let file = File::open(&self.path).map_err(unavailable)?;
        let mut reader = BufReader::new(file);
        let mut outcome = LoadOutcome::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).map_err(unavailable)? == 0 {
                break;
            }
            let Ok(line) = std::str::from_utf8(&buf) else {
                tracing::trace!("skipping embedding line that is not UTF-8");
                outcome.malformed += 1;
                continue;
            };
            // Cheap membership test on the first field before splitting the rest.
            let word = line.split(self.delimiter).next().unwrap_or("");
            if !words.contains(word) {
                continue;
            }
            match parse_line(line, self.delimiter, self.dimensions) {
                Ok((word, mut vector)) => {
                    if self.normalize {
                        normalize_in_place(&mut vector);
                    }
                    outcome.vectors.insert(word, vector);
                }
                Err(reason) => {
                    tracing::trace!(?reason, "skipping malformed embedding line");
                    outcome.malformed += 1;
                }
            }
        }

        tracing::debug!(
            path = %self.path.display(),
            loaded = outcome.vectors.len(),
            malformed = outcome.malformed,
            "embedding file scanned"
        );
        Ok(outcome)
    }
}

/// Parse a single `word c1 ... cD` line
fn parse_line(
    line: &str,
    delimiter: char,
    dimensions: usize,
) -> std::result::Result<(String, Vector), MalformedLine> {
    // word2vec-style text files end each entry with a delimiter.
    let line = line.trim_end_matches(['\r', '\n']).trim_end_matches(delimiter);
    let mut fields = line.split(delimiter);
    let word = fields.next().unwrap_or("");
    if word.is_empty() {
        return Err(MalformedLine::EmptyWord);
    }

    let mut vector = Vec::with_capacity(dimensions);
    for field in fields {
        if vector.len() == dimensions {
            return Err(MalformedLine::WrongFieldCount);
        }
        let value: f32 = field.parse().map_err(|_| MalformedLine::BadFloat)?;
        if !value.is_finite() {
            return Err(MalformedLine::BadFloat);
        }
        vector.push(value);
    }
    if vector.len() != dimensions {
        return Err(MalformedLine::WrongFieldCount);
    }

    Ok((word.to_string(), vector))
}
