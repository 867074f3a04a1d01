//! Natural Language Processing components
//!
//! This module provides sentence splitting, tokenization, stopword filtering
//! and TF-IDF term weighting.

pub mod stopwords;
pub mod tfidf;
pub mod tokenizer;
