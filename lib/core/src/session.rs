//! Caller-owned analysis session
//!
//! Bundles the dictionaries, the loaded dataset and the last result table.
//! Nothing here is global: each caller creates its own [`Session`], and a failed
//! load or analysis leaves every field exactly as it was.

use crate::batch::{apply_classifier, apply_scorer};
use crate::dictionary::{DictionarySet, SentimentDictionary};
use crate::table::Table;
use crate::{Error, Result};
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub sentiment: SentimentDictionary,
    pub dictionaries: DictionarySet,
    dataset: Option<Table>,
    results: Option<Table>,
}

impl Session {
    /// A session with the built-in dictionaries and no dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an uploaded CSV and make it the current dataset.
    ///
    /// The dataset must have at least one text column. Stale results are discarded
    /// only once the new dataset is accepted.
    pub fn load_dataset(&mut self, bytes: &[u8]) -> Result<&Table> {
        let table = Table::from_csv_bytes(bytes)?;
        table.require_text_columns()?;

        info!(
            rows = table.len(),
            columns = table.columns().len(),
            "Loaded dataset with {} rows and {} columns",
            table.len(),
            table.columns().len()
        );
        self.results = None;
        Ok(self.dataset.insert(table))
    }

    pub fn dataset(&self) -> Option<&Table> {
        self.dataset.as_ref()
    }

    pub fn results(&self) -> Option<&Table> {
        self.results.as_ref()
    }

    fn loaded(&self) -> Result<&Table> {
        self.dataset.as_ref().ok_or(Error::NoDataset)
    }

    /// Score the loaded dataset and keep the result
    pub fn analyze_sentiment(&mut self, column: &str) -> Result<&Table> {
        let results = apply_scorer(self.loaded()?, column, &self.sentiment)?;
        Ok(self.results.insert(results))
    }

    /// Classify the loaded dataset and keep the result
    pub fn classify(&mut self, column: &str) -> Result<&Table> {
        let results = apply_classifier(self.loaded()?, column, &self.dictionaries)?;
        Ok(self.results.insert(results))
    }

    pub fn set_sentiment_dictionary(&mut self, dictionary: SentimentDictionary) {
        self.sentiment = dictionary;
    }

    /// Replace the sentiment dictionary with one parsed from `term[,tag]` text
    pub fn load_sentiment_dictionary(&mut self, text: &str) -> &SentimentDictionary {
        self.sentiment = SentimentDictionary::parse(text);
        &self.sentiment
    }

    pub fn reset_sentiment_dictionary(&mut self) {
        self.sentiment = SentimentDictionary::default();
    }

    /// Add a classifier dictionary, replacing one of the same name
    pub fn add_dictionary(&mut self, name: &str, terms: &str) -> Result<()> {
        self.dictionaries.insert(name, terms)?;
        Ok(())
    }

    pub fn update_dictionary(&mut self, name: &str, terms: &str) -> Result<()> {
        self.dictionaries.update(name, terms)
    }

    pub fn reset_dictionaries(&mut self) {
        self.dictionaries.reset();
    }
}
