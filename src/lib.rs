//! # lexitag
//!
//! Annotate the text column of a CSV dataset with a lexicon sentiment score or
//! with dictionary-match flags.
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! lexitag sentiment --input reviews.csv --column review --output scored.csv
//! lexitag classify --input ads.csv --column Statement --dict pricing=pricing.txt
//! lexitag serve --http-port 8501
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use lexitag::prelude::*;
//!
//! let table = Table::from_csv_bytes(b"ID,Statement\n1,Exclusive deal for VIP members\n").unwrap();
//!
//! let classified = apply_classifier(&table, "Statement", &DictionarySet::default()).unwrap();
//! assert_eq!(classified.value(0, "exclusive_marketing_present"), Some("True"));
//!
//! let scored = apply_scorer(&table, "Statement", &SentimentDictionary::default()).unwrap();
//! assert_eq!(scored.value(0, "sentiment_label"), Some("Neutral"));
//! ```
//!
//! ## Crate Structure
//!
//! - [`lexitag-core`](lexitag_core) - dictionaries, scorer, classifier, CSV tables, batch processing
//! - [`lexitag-api`](lexitag_api) - stateless HTTP upload/annotate/download API

// Re-export core types
pub use lexitag_core::{
    apply_classifier, apply_scorer, classify_text, filter_by_label, score_text,
    Classification, ClassificationResult, ClassificationSummary, Column, ColumnKind,
    DictionarySet, Error, Result, ScoreResult, SentimentDictionary, SentimentLabel,
    SentimentSummary, Session, Table,
};

// Re-export API
pub use lexitag_api::{AnalysisDefaults, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        apply_classifier, apply_scorer, classify_text, filter_by_label, score_text,
        ClassificationSummary, DictionarySet, Error, Result, SentimentDictionary,
        SentimentLabel, SentimentSummary, Session, Table,
    };
}
