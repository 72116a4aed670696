//! Summary statistics over analyzed tables

use crate::batch::{present_column, SENTIMENT_LABEL_COLUMN, SENTIMENT_SCORE_COLUMN};
use crate::dictionary::{display_name, DictionarySet};
use crate::scorer::SentimentLabel;
use crate::table::{Table, TRUE_VALUES};
use crate::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Label counts and mean score of a scored table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentSummary {
    pub total: usize,
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    pub average_score: f64,
}

impl SentimentSummary {
    /// Compute from a table produced by [`crate::apply_scorer`]
    pub fn compute(table: &Table) -> Result<Self> {
        let score_index = required_column(table, SENTIMENT_SCORE_COLUMN)?;
        let label_index = required_column(table, SENTIMENT_LABEL_COLUMN)?;

        let mut summary = Self {
            total: table.len(),
            positive: 0,
            neutral: 0,
            negative: 0,
            average_score: 0.0,
        };

        let mut score_sum = 0.0;
        for row in table.rows() {
            score_sum += row[score_index].parse::<f64>().unwrap_or(0.0);
            match row[label_index].parse::<SentimentLabel>() {
                Ok(SentimentLabel::Positive) => summary.positive += 1,
                Ok(SentimentLabel::Negative) => summary.negative += 1,
                _ => summary.neutral += 1,
            }
        }

        if summary.total > 0 {
            summary.average_score = score_sum / summary.total as f64;
        }
        Ok(summary)
    }
}

impl fmt::Display for SentimentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Positive: {}  Neutral: {}  Negative: {}  Avg Score: {:.3}",
            self.positive, self.neutral, self.negative, self.average_score
        )
    }
}

/// How many rows matched one dictionary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DictionarySummary {
    pub name: String,
    pub display_name: String,
    pub present: usize,
    pub total: usize,
    pub percentage: f64,
}

/// Per-dictionary match rates of a classified table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationSummary {
    pub entries: Vec<DictionarySummary>,
}

impl ClassificationSummary {
    /// Compute from a table produced by [`crate::apply_classifier`] with `dictionaries`
    pub fn compute(table: &Table, dictionaries: &DictionarySet) -> Result<Self> {
        let total = table.len();
        let mut entries = Vec::with_capacity(dictionaries.len());

        for name in dictionaries.names() {
            let index = required_column(table, &present_column(name))?;
            let present = table
                .rows()
                .iter()
                .filter(|row| TRUE_VALUES.contains(&row[index].as_str()))
                .count();
            let percentage = if total > 0 {
                present as f64 / total as f64 * 100.0
            } else {
                0.0
            };

            entries.push(DictionarySummary {
                name: name.to_string(),
                display_name: display_name(name),
                present,
                total,
                percentage,
            });
        }

        Ok(Self { entries })
    }
}

impl fmt::Display for ClassificationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "{}: {}/{} ({:.1}%)",
                entry.display_name, entry.present, entry.total, entry.percentage
            )?;
        }
        Ok(())
    }
}

fn required_column(table: &Table, name: &str) -> Result<usize> {
    table
        .column_index(name)
        .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{apply_classifier, apply_scorer};
    use crate::dictionary::SentimentDictionary;

    fn table() -> Table {
        Table::from_csv_bytes(
            b"text\ngood day\nbad day\nplain day\ngreat vip deal\n",
        )
        .unwrap()
    }

    #[test]
    fn test_sentiment_summary() {
        let scored = apply_scorer(&table(), "text", &SentimentDictionary::default()).unwrap();
        let summary = SentimentSummary::compute(&scored).unwrap();

        assert_eq!(summary.total, 4);
        assert_eq!(summary.positive, 2);
        assert_eq!(summary.negative, 1);
        assert_eq!(summary.neutral, 1);
        assert!((summary.average_score - 0.25).abs() < 1e-12);
        assert_eq!(
            summary.to_string(),
            "Positive: 2  Neutral: 1  Negative: 1  Avg Score: 0.250"
        );
    }

    #[test]
    fn test_sentiment_summary_requires_scored_table() {
        assert!(matches!(
            SentimentSummary::compute(&table()),
            Err(Error::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_empty_table_summary() {
        let empty = Table::from_csv_bytes(b"text\n").unwrap();
        let scored = apply_scorer(&empty, "text", &SentimentDictionary::default()).unwrap();
        let summary = SentimentSummary::compute(&scored).unwrap();
        assert_eq!(summary.total, 0);
        assert_eq!(summary.average_score, 0.0);

        let dictionaries = DictionarySet::default();
        let classified = apply_classifier(&empty, "text", &dictionaries).unwrap();
        let summary = ClassificationSummary::compute(&classified, &dictionaries).unwrap();
        assert!(summary.entries.iter().all(|e| e.percentage == 0.0));
    }

    #[test]
    fn test_classification_summary() {
        let dictionaries = DictionarySet::default();
        let classified = apply_classifier(&table(), "text", &dictionaries).unwrap();
        let summary = ClassificationSummary::compute(&classified, &dictionaries).unwrap();

        assert_eq!(summary.entries.len(), 2);
        let exclusive = &summary.entries[1];
        assert_eq!(exclusive.display_name, "Exclusive Marketing");
        assert_eq!(exclusive.present, 1);
        assert_eq!(exclusive.total, 4);
        assert!((exclusive.percentage - 25.0).abs() < 1e-9);
        assert_eq!(summary.entries[0].present, 0);
        assert_eq!(
            summary.to_string(),
            "Urgency Marketing: 0/4 (0.0%)\nExclusive Marketing: 1/4 (25.0%)"
        );
    }
}
