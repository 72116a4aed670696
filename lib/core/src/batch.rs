//! Batch processing over a table's text column
//!
//! Both operations are pure: they clone the input table and add (or overwrite)
//! derived columns on the copy. The per-row work is a plain function of the
//! cell text, applied uniformly down the column.

use crate::classifier::classify_text;
use crate::dictionary::{DictionarySet, SentimentDictionary};
use crate::scorer::{score_text, SentimentLabel};
use crate::table::{format_bool, format_float, ColumnKind, Table};
use crate::{Error, Result};
use std::time::Instant;
use tracing::info;

pub const SENTIMENT_SCORE_COLUMN: &str = "sentiment_score";
pub const SENTIMENT_LABEL_COLUMN: &str = "sentiment_label";

pub fn count_column(dictionary: &str) -> String {
    format!("{}_count", dictionary)
}

pub fn present_column(dictionary: &str) -> String {
    format!("{}_present", dictionary)
}

pub fn matches_column(dictionary: &str) -> String {
    format!("{}_matches", dictionary)
}

fn text_column_index(table: &Table, column: &str) -> Result<usize> {
    table
        .column_index(column)
        .ok_or_else(|| Error::ColumnNotFound(column.to_string()))
}

/// Add `sentiment_score` and `sentiment_label` computed from `column`
pub fn apply_scorer(table: &Table, column: &str, dictionary: &SentimentDictionary) -> Result<Table> {
    let start = Instant::now();
    let index = text_column_index(table, column)?;

    let (scores, labels): (Vec<String>, Vec<String>) = (0..table.len())
        .map(|row| {
            let result = score_text(table.text_value(row, index), dictionary);
            (format_float(result.score), result.label.to_string())
        })
        .unzip();

    let mut output = table.clone();
    output.set_column(SENTIMENT_SCORE_COLUMN, ColumnKind::Float, scores)?;
    output.set_column(SENTIMENT_LABEL_COLUMN, ColumnKind::Text, labels)?;

    info!(
        rows = table.len(),
        column,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Sentiment analysis completed"
    );
    Ok(output)
}

/// Add `{d}_count`, `{d}_present` and `{d}_matches` for every dictionary `d`
pub fn apply_classifier(table: &Table, column: &str, dictionaries: &DictionarySet) -> Result<Table> {
    let start = Instant::now();
    let index = text_column_index(table, column)?;

    let classifications: Vec<_> = (0..table.len())
        .map(|row| classify_text(table.text_value(row, index), dictionaries))
        .collect();

    let mut output = table.clone();
    for name in dictionaries.names() {
        let mut counts = Vec::with_capacity(classifications.len());
        let mut present = Vec::with_capacity(classifications.len());
        let mut matches = Vec::with_capacity(classifications.len());

        for classification in &classifications {
            let result = classification.get(name).cloned().unwrap_or_default();
            counts.push(result.count.to_string());
            present.push(format_bool(result.present).to_string());
            matches.push(result.joined_matches());
        }

        output.set_column(&count_column(name), ColumnKind::Integer, counts)?;
        output.set_column(&present_column(name), ColumnKind::Boolean, present)?;
        output.set_column(&matches_column(name), ColumnKind::Text, matches)?;
    }

    info!(
        rows = table.len(),
        column,
        dictionaries = dictionaries.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Classification completed"
    );
    Ok(output)
}

/// Rows of a scored table whose `sentiment_label` equals `label`
pub fn filter_by_label(table: &Table, label: SentimentLabel) -> Result<Table> {
    let index = table
        .column_index(SENTIMENT_LABEL_COLUMN)
        .ok_or_else(|| Error::ColumnNotFound(SENTIMENT_LABEL_COLUMN.to_string()))?;
    let label = label.as_str();
    Ok(table.filter_rows(|row| row[index] == label))
}
