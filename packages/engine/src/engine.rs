//! Verse matching engine
//!
//! Maps a verse key from one translation to the other by evaluating the rule
//! set in document order. The first rule producing a non-empty result wins;
//! outputs of overlapping rules are never merged.
//!
//! # Example
//!
//! ```
//! use versemap_engine::{MatchingEngine, RuleSet, Translation, VerseKey};
//!
//! let rules = RuleSet::from_yaml_str(r#"
//! translations: [kjv, rst]
//! rules:
//!   - book: Jonah
//!     type: point
//!     from: { translation: kjv, chapter: 1, verse: 17 }
//!     to: { translation: rst, chapter: 2, verse: 1 }
//! "#).unwrap();
//!
//! let engine = MatchingEngine::new(&rules);
//! let kjv = Translation::new("kjv");
//!
//! assert_eq!(
//!     engine.match_to_other(&kjv, &VerseKey::new("Jonah", 1, 17)),
//!     vec![VerseKey::new("Jonah", 2, 1)]
//! );
//! // no rule: identity fallback
//! assert_eq!(
//!     engine.match_to_other(&kjv, &VerseKey::new("John", 3, 16)),
//!     vec![VerseKey::new("John", 3, 16)]
//! );
//! ```

use crate::ruleset::RuleSet;
use crate::types::{Translation, VerseKey};

/// Evaluates a [`RuleSet`] for single-verse queries.
///
/// Cheap to construct; holds only a reference to the shared rule set.
#[derive(Debug, Clone, Copy)]
pub struct MatchingEngine<'a> {
    rules: &'a RuleSet,
}

impl<'a> MatchingEngine<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'a RuleSet {
        self.rules
    }

    /// Map `key` from `from` to the other translation.
    ///
    /// Returns the first matching rule's output, an empty vector for a
    /// title-only Psalms verse, or `[key]` (identity) otherwise.
    pub fn match_to_other(&self, from: &Translation, key: &VerseKey) -> Vec<VerseKey> {
        let key = key.canonicalized();

        if let Some(mapped) = self.first_match(from, &key) {
            return mapped;
        }

        if self.is_title_only(from, &key) {
            tracing::trace!(translation = %from, key = %key, "Title-only verse, no counterpart");
            return Vec::new();
        }

        vec![key]
    }

    /// Like [`match_to_other`](Self::match_to_other) but without identity
    /// fallback: empty unless an explicit rule matched.
    pub fn match_rule_only(&self, from: &Translation, key: &VerseKey) -> Vec<VerseKey> {
        let key = key.canonicalized();
        self.first_match(from, &key).unwrap_or_default()
    }

    /// Check if `key` has any counterpart in the other translation
    pub fn exists_in_other(&self, from: &Translation, key: &VerseKey) -> bool {
        !self.match_to_other(from, key).is_empty()
    }

    /// Check if `key` is a devotional-title verse with no counterpart.
    pub fn is_title_only(&self, from: &Translation, key: &VerseKey) -> bool {
        let key = key.canonicalized();
        self.rules
            .rules_for_book(key.book())
            .any(|rule| rule.is_title_only(self.rules.pair(), from, &key))
    }

    /// First non-empty rule output; `key` must already be canonical.
    fn first_match(&self, from: &Translation, key: &VerseKey) -> Option<Vec<VerseKey>> {
        let pair = self.rules.pair();
        for rule in self.rules.rules_for_book(key.book()) {
            let mapped = rule.map(pair, from, key);
            if !mapped.is_empty() {
                tracing::trace!(
                    translation = %from,
                    key = %key,
                    rule = %rule,
                    results = mapped.len(),
                    "Rule matched"
                );
                return Some(mapped);
            }
        }
        None
    }
}
