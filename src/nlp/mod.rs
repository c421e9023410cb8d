//! Natural Language Processing components
//!
//! This module provides tokenization, stopword filtering and brand-term
//! filtering.

pub mod brand;
pub mod stopwords;
pub mod tokenizer;
