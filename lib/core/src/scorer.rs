//! Lexicon-based sentiment scoring
//!
//! A text is lowercased, split on whitespace and every token is looked up in the
//! [`SentimentDictionary`]. The score is the normalized difference between positive
//! and negative hits:
//!
//! ```text
//! score = (pos - neg) / (pos + neg)        0.0 when pos + neg == 0
//! ```

use crate::dictionary::{Polarity, SentimentDictionary};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scores strictly above this are positive, strictly below its negation negative
pub const LABEL_THRESHOLD: f64 = 0.1;

/// Discrete sentiment label derived from a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn from_score(score: f64) -> Self {
        if score > LABEL_THRESHOLD {
            SentimentLabel::Positive
        } else if score < -LABEL_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Negative => "Negative",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(SentimentLabel::Positive),
            "neutral" => Ok(SentimentLabel::Neutral),
            "negative" => Ok(SentimentLabel::Negative),
            other => Err(format!("unknown sentiment label: {}", other)),
        }
    }
}

/// Score and label for a single text
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: f64,
    pub label: SentimentLabel,
}

impl ScoreResult {
    pub const NEUTRAL: ScoreResult = ScoreResult {
        score: 0.0,
        label: SentimentLabel::Neutral,
    };

    fn from_counts(positive: usize, negative: usize) -> Self {
        let total = positive + negative;
        if total == 0 {
            return Self::NEUTRAL;
        }

        let score = (positive as f64 - negative as f64) / total as f64;
        Self {
            score,
            label: SentimentLabel::from_score(score),
        }
    }
}

/// Score one text. `None`, empty and whitespace-only texts are neutral.
pub fn score_text(text: Option<&str>, dictionary: &SentimentDictionary) -> ScoreResult {
    let text = match text {
        Some(text) if !text.trim().is_empty() => text.to_lowercase(),
        _ => return ScoreResult::NEUTRAL,
    };

    let (mut positive, mut negative) = (0usize, 0usize);
    for token in text.split_whitespace() {
        match dictionary.polarity(token) {
            Some(Polarity::Positive) => positive += 1,
            Some(Polarity::Negative) => negative += 1,
            None => {}
        }
    }

    ScoreResult::from_counts(positive, negative)
}
