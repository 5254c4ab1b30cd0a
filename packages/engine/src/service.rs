//! Service layer over a loaded rule set
//!
//! [`VerseMapService`] owns the process-wide [`RuleSet`] and exposes the
//! query surface used by annotation front ends: single-verse matching,
//! existence checks and cluster lookups.
//!
//! # Example
//!
//! ```
//! use versemap_engine::{Translation, VerseKey, VerseMapService};
//!
//! let service = VerseMapService::from_yaml_str(r#"
//! translations: [kjv, rst]
//! rules:
//!   - book: Ephesians
//!     type: split
//!     from: { translation: kjv, chapter: 3, verse: 17 }
//!     to: { translation: rst, chapter: 3, start: 17, end: 18 }
//! "#).unwrap();
//!
//! let rst = Translation::new("rst");
//! let id = service.cluster_id(&rst, &VerseKey::new("Eph", 3, 18));
//! assert_eq!(id, "kjv|Ephesians|3|17");
//! ```

use crate::cluster::{ClusterEngine, ClusterId};
use crate::engine::MatchingEngine;
use crate::error::Result;
use crate::ruleset::{LoadOptions, RuleSet};
use crate::types::{Location, Translation, TranslationPair, VerseKey};
use std::path::Path;

/// Query facade owning an immutable rule set.
///
/// Every query is infallible; only construction can fail. The service is
/// `Send + Sync` and can be shared behind an `Arc` without locking.
#[derive(Debug, Clone)]
pub struct VerseMapService {
    rules: RuleSet,
}

impl VerseMapService {
    pub fn new(rules: RuleSet) -> Self {
        tracing::debug!(
            rules = rules.len(),
            fingerprint = %rules.fingerprint(),
            "Verse map service ready"
        );
        Self { rules }
    }

    /// Load rules from a YAML string with default options.
    ///
    /// # Errors
    ///
    /// Any error from [`RuleSet::from_yaml_str`].
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        RuleSet::from_yaml_str(content).map(Self::new)
    }

    /// Load rules from a YAML file.
    ///
    /// # Errors
    ///
    /// Any error from [`RuleSet::from_yaml_file`].
    pub fn from_yaml_file<P: AsRef<Path>>(path: P, options: LoadOptions) -> Result<Self> {
        RuleSet::from_yaml_file(path, options).map(Self::new)
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn pair(&self) -> &TranslationPair {
        self.rules.pair()
    }

    /// See [`RuleSet::fingerprint`].
    pub fn fingerprint(&self) -> &str {
        self.rules.fingerprint()
    }

    /// Resolve a user-supplied tag against the loaded pair.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::UnknownTranslation` for a foreign tag.
    pub fn translation(&self, tag: &str) -> Result<Translation> {
        self.rules.pair().resolve(tag)
    }

    fn matcher(&self) -> MatchingEngine<'_> {
        MatchingEngine::new(&self.rules)
    }

    fn clusters(&self) -> ClusterEngine<'_> {
        ClusterEngine::new(&self.rules)
    }

    /// Counterpart(s) of `key` in the other translation.
    pub fn match_to_other(&self, from: &Translation, key: &VerseKey) -> Vec<VerseKey> {
        self.matcher().match_to_other(from, key)
    }

    pub fn exists_in_other(&self, from: &Translation, key: &VerseKey) -> bool {
        self.matcher().exists_in_other(from, key)
    }

    /// Annotation key for `key`, rendered as `translation|book|chapter|verse`.
    pub fn cluster_id(&self, tx: &Translation, key: &VerseKey) -> String {
        self.clusters().cluster_id(tx, key).to_string()
    }

    /// Typed form of [`cluster_id`](Self::cluster_id).
    pub fn cluster(&self, tx: &Translation, key: &VerseKey) -> ClusterId {
        self.clusters().cluster_id(tx, key)
    }

    pub fn cluster_members(&self, tx: &Translation, key: &VerseKey) -> Vec<Location> {
        self.clusters().cluster_members(tx, key)
    }

    pub fn same_translation_siblings(&self, tx: &Translation, key: &VerseKey) -> Vec<VerseKey> {
        self.clusters().same_translation_siblings(tx, key)
    }
}
