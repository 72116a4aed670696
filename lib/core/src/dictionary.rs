//! Dictionary store
//!
//! Holds the two kinds of dictionaries the analysis engines consume:
//!
//! - [`SentimentDictionary`] - disjoint positive/negative word sets used by the scorer
//! - [`DictionarySet`] - named term sets used by the classifier
//!
//! Both are plain values owned by the caller. They are rebuilt from text on every
//! edit, upload or reset and never touched by the analysis code.

use crate::{Error, Result};
use ahash::AHashSet;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Built-in sentiment dictionary in `term,tag` form
pub const DEFAULT_SENTIMENT_DICTIONARY: &str = "good,positive
great,positive
excellent,positive
amazing,positive
wonderful,positive
fantastic,positive
awesome,positive
love,positive
like,positive
happy,positive
joy,positive
pleased,positive
satisfied,positive
delighted,positive
thrilled,positive
bad,negative
terrible,negative
awful,negative
horrible,negative
hate,negative
dislike,negative
sad,negative
angry,negative
frustrated,negative
disappointed,negative
upset,negative
annoyed,negative
disgusted,negative
furious,negative
miserable,negative";

/// Tags that put a term in the positive set
pub const POSITIVE_TAGS: &[&str] = &["positive", "pos", "1"];

/// Tags that put a term in the negative set
pub const NEGATIVE_TAGS: &[&str] = &["negative", "neg", "0", "-1"];

pub const URGENCY_MARKETING: &str = "urgency_marketing";
pub const EXCLUSIVE_MARKETING: &str = "exclusive_marketing";

const DEFAULT_URGENCY_TERMS: &[&str] = &[
    "limited", "limited time", "limited run", "limited edition", "order now",
    "last chance", "hurry", "while supplies last", "before they're gone",
    "selling out", "selling fast", "act now", "don't wait", "today only",
    "expires soon", "final hours", "almost gone",
];

const DEFAULT_EXCLUSIVE_TERMS: &[&str] = &[
    "exclusive", "exclusively", "exclusive offer", "exclusive deal",
    "members only", "vip", "special access", "invitation only",
    "premium", "privileged", "limited access", "select customers",
    "insider", "private sale", "early access",
];

/// Polarity of a sentiment term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    /// Map a normalized tag to a polarity. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        if POSITIVE_TAGS.contains(&tag) {
            Some(Polarity::Positive)
        } else if NEGATIVE_TAGS.contains(&tag) {
            Some(Polarity::Negative)
        } else {
            None
        }
    }
}

/// Parse one trimmed, lowercased dictionary line.
///
/// `term,tag` splits on the first comma only; a line without a comma is a
/// positive term. Unknown tags and empty terms yield `None`.
fn parse_sentiment_line(line: &str) -> Option<(&str, Polarity)> {
    match line.split_once(',') {
        Some((term, tag)) => {
            let term = term.trim();
            let polarity = Polarity::from_tag(tag.trim())?;
            if term.is_empty() {
                return None;
            }
            Some((term, polarity))
        }
        None => Some((line, Polarity::Positive)),
    }
}

/// Positive and negative word sets for the sentiment scorer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentimentDictionary {
    positive: AHashSet<String>,
    negative: AHashSet<String>,
}

impl SentimentDictionary {
    /// A dictionary with no words at all
    pub fn empty() -> Self {
        Self {
            positive: AHashSet::new(),
            negative: AHashSet::new(),
        }
    }

    /// Parse `term` / `term,tag` lines.
    ///
    /// Parsing is lenient: lines with an unrecognized tag are skipped, never reported
    /// as errors. If a term is tagged twice the later line wins.
    pub fn parse(text: &str) -> Self {
        let mut dictionary = Self::empty();
        dictionary.extend_from_text(text);
        dictionary
    }

    /// Add the lines of `text` to this dictionary, returning how many lines were dropped
    pub fn extend_from_text(&mut self, text: &str) -> usize {
        let mut dropped = 0;

        for line in text.lines() {
            let line = line.trim().to_lowercase();
            if line.is_empty() {
                continue;
            }

            match parse_sentiment_line(&line) {
                Some((term, polarity)) => self.insert(term, polarity),
                None => {
                    debug!("Dropping dictionary line {:?}", line);
                    dropped += 1;
                }
            }
        }

        debug!(
            positive = self.positive.len(),
            negative = self.negative.len(),
            dropped,
            "Parsed sentiment dictionary"
        );
        dropped
    }

    /// Read an uploaded dictionary fully and parse it
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let text = String::from_utf8(bytes).map_err(|e| Error::Encoding(e.to_string()))?;
        Ok(Self::parse(&text))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_reader(File::open(path)?)
    }

    /// Insert a term, moving it out of the opposite set if it was there
    pub fn insert(&mut self, term: &str, polarity: Polarity) {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return;
        }

        match polarity {
            Polarity::Positive => {
                self.negative.remove(&term);
                self.positive.insert(term);
            }
            Polarity::Negative => {
                self.positive.remove(&term);
                self.negative.insert(term);
            }
        }
    }

    /// Fold a later-loaded dictionary into this one; `other` wins on conflicts
    pub fn merge(&mut self, other: &SentimentDictionary) {
        for term in &other.positive {
            self.insert(term, Polarity::Positive);
        }
        for term in &other.negative {
            self.insert(term, Polarity::Negative);
        }
    }

    #[inline]
    pub fn contains_positive(&self, token: &str) -> bool {
        self.positive.contains(token)
    }

    #[inline]
    pub fn contains_negative(&self, token: &str) -> bool {
        self.negative.contains(token)
    }

    pub fn polarity(&self, token: &str) -> Option<Polarity> {
        if self.contains_positive(token) {
            Some(Polarity::Positive)
        } else if self.contains_negative(token) {
            Some(Polarity::Negative)
        } else {
            None
        }
    }

    pub fn positive_count(&self) -> usize {
        self.positive.len()
    }

    pub fn negative_count(&self) -> usize {
        self.negative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.negative.is_empty()
    }

    pub fn sorted_positive(&self) -> Vec<String> {
        sorted(&self.positive)
    }

    pub fn sorted_negative(&self) -> Vec<String> {
        sorted(&self.negative)
    }

    /// Sorted copy of both word lists, suitable for serialization
    pub fn to_terms(&self) -> SentimentTerms {
        SentimentTerms {
            positive: self.sorted_positive(),
            negative: self.sorted_negative(),
        }
    }

    /// The first `limit` words of each polarity plus the number left out
    pub fn preview(&self, limit: usize) -> DictionaryPreview {
        let mut positive = self.sorted_positive();
        let mut negative = self.sorted_negative();
        let positive_remaining = positive.len().saturating_sub(limit);
        let negative_remaining = negative.len().saturating_sub(limit);
        positive.truncate(limit);
        negative.truncate(limit);

        DictionaryPreview {
            positive,
            positive_remaining,
            negative,
            negative_remaining,
        }
    }
}

impl Default for SentimentDictionary {
    fn default() -> Self {
        Self::parse(DEFAULT_SENTIMENT_DICTIONARY)
    }
}

impl From<SentimentTerms> for SentimentDictionary {
    fn from(terms: SentimentTerms) -> Self {
        let mut dictionary = Self::empty();
        for term in &terms.positive {
            dictionary.insert(term, Polarity::Positive);
        }
        for term in &terms.negative {
            dictionary.insert(term, Polarity::Negative);
        }
        dictionary
    }
}

/// Serializable, sorted form of a [`SentimentDictionary`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentTerms {
    #[serde(default)]
    pub positive: Vec<String>,
    #[serde(default)]
    pub negative: Vec<String>,
}

/// Truncated word lists for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DictionaryPreview {
    pub positive: Vec<String>,
    pub positive_remaining: usize,
    pub negative: Vec<String>,
    pub negative_remaining: usize,
}

fn sorted(set: &AHashSet<String>) -> Vec<String> {
    let mut terms: Vec<String> = set.iter().cloned().collect();
    terms.sort();
    terms
}

/// A set of classifier terms, iterated in lexicographic order
pub type TermSet = BTreeSet<String>;

/// Parse a block of terms, one per line
pub fn parse_terms(text: &str) -> TermSet {
    normalize_terms(text.lines())
}

fn normalize_terms<I, S>(terms: I) -> TermSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    terms
        .into_iter()
        .map(|term| term.as_ref().trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .collect()
}

/// Named term sets for the classifier.
///
/// Names keep insertion order, which is also the order of the derived columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DictionarySet {
    dictionaries: IndexMap<String, TermSet>,
}

impl DictionarySet {
    pub fn empty() -> Self {
        Self {
            dictionaries: IndexMap::new(),
        }
    }

    /// Restore the built-in dictionaries, discarding every edit
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Add a dictionary or replace the terms of an existing one.
    ///
    /// Returns `true` when an existing dictionary was replaced.
    pub fn insert(&mut self, name: &str, text: &str) -> Result<bool> {
        self.insert_terms(name, text.lines())
    }

    pub fn insert_terms<I, S>(&mut self, name: &str, terms: I) -> Result<bool>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidDictionaryName(name.to_string()));
        }

        let terms = normalize_terms(terms);
        debug!(dictionary = name, terms = terms.len(), "Storing dictionary");
        Ok(self.dictionaries.insert(name.to_string(), terms).is_some())
    }

    /// Replace the terms of an existing dictionary
    pub fn update(&mut self, name: &str, text: &str) -> Result<()> {
        let name = name.trim();
        match self.dictionaries.get_mut(name) {
            Some(terms) => {
                *terms = parse_terms(text);
                Ok(())
            }
            None => Err(Error::DictionaryNotFound(name.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Option<&TermSet> {
        self.dictionaries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.dictionaries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.dictionaries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TermSet)> {
        self.dictionaries.iter().map(|(name, terms)| (name.as_str(), terms))
    }

    pub fn len(&self) -> usize {
        self.dictionaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dictionaries.is_empty()
    }

    /// Terms of one dictionary as editable text, one per line
    pub fn terms_text(&self, name: &str) -> Option<String> {
        self.get(name)
            .map(|terms| terms.iter().map(String::as_str).collect::<Vec<_>>().join("\n"))
    }

    /// Parse a JSON object mapping dictionary names to term lists
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: IndexMap<String, Vec<String>> = serde_json::from_str(json)?;
        let mut set = Self::empty();
        for (name, terms) in raw {
            set.insert_terms(&name, terms)?;
        }
        Ok(set)
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for DictionarySet {
    fn default() -> Self {
        let mut dictionaries = IndexMap::new();
        dictionaries.insert(URGENCY_MARKETING.to_string(), normalize_terms(DEFAULT_URGENCY_TERMS));
        dictionaries.insert(EXCLUSIVE_MARKETING.to_string(), normalize_terms(DEFAULT_EXCLUSIVE_TERMS));
        Self { dictionaries }
    }
}

/// Human readable title for a dictionary name: `urgency_marketing` -> `Urgency Marketing`
pub fn display_name(name: &str) -> String {
    let mut title = String::with_capacity(name.len());
    let mut previous_cased = false;

    for c in name.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphabetic() {
            if previous_cased {
                title.extend(c.to_lowercase());
            } else {
                title.extend(c.to_uppercase());
            }
            previous_cased = true;
        } else {
            title.push(c);
            previous_cased = false;
        }
    }

    title
}
