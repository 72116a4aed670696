//! # lexitag Core
//!
//! Core library for lexitag, a dictionary-driven text annotator for tabular data.
//!
//! This crate provides the dictionaries and the two analysis engines:
//!
//! - [`SentimentDictionary`] / [`DictionarySet`] - the dictionary store
//! - [`score_text`] - lexicon sentiment score in `[-1, 1]` plus a label
//! - [`classify_text`] - per-dictionary substring matches
//! - [`Table`] - a CSV dataset, and [`apply_scorer`] / [`apply_classifier`] to annotate it
//! - [`Session`] - caller-owned dictionaries, dataset and last results
//!
//! ## Example
//!
//! ```rust
//! use lexitag_core::{apply_scorer, SentimentDictionary, Table};
//!
//! let table = Table::from_csv_bytes(b"id,text\n1,good good bad\n").unwrap();
//! let dictionary = SentimentDictionary::parse("good,positive\nbad,negative");
//!
//! let scored = apply_scorer(&table, "text", &dictionary).unwrap();
//! assert_eq!(scored.value(0, "sentiment_label"), Some("Positive"));
//! ```

pub mod error;
pub mod dictionary;
pub mod scorer;
pub mod classifier;
pub mod table;
pub mod batch;
pub mod summary;
pub mod session;

pub use error::{Error, Result};
pub use dictionary::{
    display_name, parse_terms, DictionaryPreview, DictionarySet, Polarity, SentimentDictionary,
    SentimentTerms, TermSet, DEFAULT_SENTIMENT_DICTIONARY,
};
pub use scorer::{score_text, ScoreResult, SentimentLabel, LABEL_THRESHOLD};
pub use classifier::{classify_text, Classification, ClassificationResult};
pub use table::{Column, ColumnKind, Row, Table};
pub use batch::{
    apply_classifier, apply_scorer, filter_by_label, SENTIMENT_LABEL_COLUMN,
    SENTIMENT_SCORE_COLUMN,
};
pub use summary::{ClassificationSummary, DictionarySummary, SentimentSummary};
pub use session::Session;
