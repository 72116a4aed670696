//! Dictionary-match classification
//!
//! Every term of every dictionary is tested for substring containment in the
//! lowercased text. Dictionaries are independent; one text may match several.
//! Counts are distinct matched terms, not occurrences.

use crate::dictionary::{DictionarySet, TermSet};
use indexmap::IndexMap;
use serde::Serialize;

/// Separator used when matches are flattened into a single cell
pub const MATCH_SEPARATOR: &str = ", ";

/// Matches of one dictionary against one text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub count: usize,
    pub present: bool,
    pub matches: Vec<String>,
}

impl ClassificationResult {
    fn from_matches(matches: Vec<String>) -> Self {
        Self {
            count: matches.len(),
            present: !matches.is_empty(),
            matches,
        }
    }

    pub fn joined_matches(&self) -> String {
        self.matches.join(MATCH_SEPARATOR)
    }
}

/// Per-dictionary results, in the order of the [`DictionarySet`]
pub type Classification = IndexMap<String, ClassificationResult>;

fn match_terms(lowered: &str, terms: &TermSet) -> Vec<String> {
    terms
        .iter()
        .filter(|term| lowered.contains(term.as_str()))
        .cloned()
        .collect()
}

/// Classify one text against every dictionary. `None` yields no matches anywhere.
pub fn classify_text(text: Option<&str>, dictionaries: &DictionarySet) -> Classification {
    let lowered = text.map(str::to_lowercase);

    dictionaries
        .iter()
        .map(|(name, terms)| {
            let result = match &lowered {
                Some(lowered) => ClassificationResult::from_matches(match_terms(lowered, terms)),
                None => ClassificationResult::default(),
            };
            (name.to_string(), result)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{EXCLUSIVE_MARKETING, URGENCY_MARKETING};

    fn single(name: &str, terms: &str) -> DictionarySet {
        let mut set = DictionarySet::empty();
        set.insert(name, terms).unwrap();
        set
    }

    #[test]
    fn test_case_insensitive_substring() {
        let set = single("vip", "vip");
        let result = &classify_text(Some("Exclusive deal for VIP members"), &set)["vip"];
        assert_eq!(result.count, 1);
        assert!(result.present);
        assert_eq!(result.matches, vec!["vip"]);
    }

    #[test]
    fn test_substring_not_token() {
        let set = single("d", "limit");
        let result = &classify_text(Some("Unlimited refills"), &set)["d"];
        assert_eq!(result.count, 1);
    }

    #[test]
    fn test_counts_distinct_terms_not_occurrences() {
        let set = single("d", "hurry\nnow");
        let result = &classify_text(Some("hurry hurry hurry"), &set)["d"];
        assert_eq!(result.count, 1);
        assert_eq!(result.matches, vec!["hurry"]);
    }

    #[test]
    fn test_overlapping_terms_all_match() {
        let set = DictionarySet::default();
        let classification = classify_text(Some("Limited time offer - act now!"), &set);
        let urgency = &classification[URGENCY_MARKETING];

        let matched: TermSet = urgency.matches.iter().cloned().collect();
        let expected: TermSet = ["limited", "limited time", "act now"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(matched, expected);
        assert_eq!(urgency.count, 3);
        assert!(!classification[EXCLUSIVE_MARKETING].present);
    }

    #[test]
    fn test_text_may_match_several_dictionaries() {
        let set = DictionarySet::default();
        let classification = classify_text(Some("VIP early access - today only"), &set);
        assert!(classification[URGENCY_MARKETING].present);
        assert!(classification[EXCLUSIVE_MARKETING].present);
    }

    #[test]
    fn test_missing_text() {
        let set = DictionarySet::default();
        let classification = classify_text(None, &set);
        assert_eq!(classification.len(), 2);
        for result in classification.values() {
            assert_eq!(result, &ClassificationResult::default());
        }
    }

    #[test]
    fn test_present_iff_count() {
        let set = DictionarySet::default();
        let texts = ["", "hurry", "nothing here", "insider vip premium", "LAST CHANCE"];
        for text in texts {
            for result in classify_text(Some(text), &set).values() {
                assert_eq!(result.present, result.count > 0);
                assert_eq!(result.count, result.matches.len());
            }
        }
    }

    #[test]
    fn test_result_order_follows_dictionary_set() {
        let mut set = DictionarySet::empty();
        set.insert("zeta", "z").unwrap();
        set.insert("alpha", "a").unwrap();
        let names: Vec<String> = classify_text(Some("az"), &set).keys().cloned().collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_joined_matches() {
        let set = single("d", "sale\nfree");
        let result = &classify_text(Some("free gift with every sale"), &set)["d"];
        assert_eq!(result.joined_matches(), "free, sale");
    }
}
