//! Cross-translation verse clusters
//!
//! A cluster is the set of locations, across both translations, that share
//! one annotation. It is computed by a worklist traversal over *rule edges*
//! only; identity ("same number on the other side") is crossed under a
//! restricted policy so that numbering coincidences cannot bridge unrelated
//! verses:
//!
//! 1. A node with rule edges enqueues every edge target. Outside the Psalms
//!    its identity co-target joins the membership, without being expanded,
//!    when that co-target has no rule edges itself.
//! 2. A node without rule edges crosses identity outside the Psalms (member
//!    and enqueued). Inside the Psalms identity is never traversed; a pure
//!    co-target of a pure node is recorded as a member only.
//! 3. In the Psalms, when a node has an edge into another chapter, its
//!    same-chapter edges are dropped for that step.
//!
//! The cluster id is the first member in (translation, book, chapter, verse)
//! order and does not depend on which member seeded the traversal.
//!
//! Rules 1 and 2 are narrower than "add any identity co-target". A
//! co-target is only admitted when it is pure, and a pure member's own
//! expansion crosses identity straight back. Every member
//! therefore reaches the same membership, which is what keeps cluster ids
//! identical across members. Admitting a co-target that has rule edges of its
//! own, or crossing identity between Psalms verses, makes the membership
//! depend on the seed.

use crate::canon;
use crate::config;
use crate::engine::MatchingEngine;
use crate::error::{EngineError, Result};
use crate::ruleset::RuleSet;
use crate::types::{Location, Translation, TranslationPair, VerseKey};
use std::collections::HashSet;
use std::fmt;

/// Stable annotation key for a cluster.
///
/// Renders as `{translation}|{book}|{chapter}|{verse}` of the cluster's
/// first member.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClusterId {
    translation: Translation,
    key: VerseKey,
}

impl ClusterId {
    pub fn new(translation: Translation, key: VerseKey) -> Self {
        Self { translation, key }
    }

    /// Parse an id string produced by `Display`.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidClusterId` if the string does not have
    /// four `|`-separated parts with positive chapter and verse numbers.
    pub fn parse(id: &str) -> Result<Self> {
        let parts: Vec<&str> = id.split('|').collect();
        let [translation, book, chapter, verse] = parts.as_slice() else {
            return Err(EngineError::InvalidClusterId(format!(
                "expected translation|book|chapter|verse, got: {id}"
            )));
        };
        if translation.trim().is_empty() || book.trim().is_empty() {
            return Err(EngineError::InvalidClusterId(format!(
                "translation and book cannot be empty, got: {id}"
            )));
        }
        let number = |raw: &str| -> Result<u32> {
            match raw.parse::<u32>() {
                Ok(n) if n >= 1 => Ok(n),
                _ => Err(EngineError::InvalidClusterId(format!(
                    "'{raw}' is not a positive number in: {id}"
                ))),
            }
        };
        Ok(Self {
            translation: Translation::new(translation),
            key: VerseKey::new(book, number(*chapter)?, number(*verse)?),
        })
    }

    pub fn translation(&self) -> &Translation {
        &self.translation
    }

    pub fn key(&self) -> &VerseKey {
        &self.key
    }

    /// The representative location this id names
    pub fn location(&self) -> Location {
        Location::new(self.translation.clone(), self.key.clone())
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}",
            self.translation,
            self.key.book(),
            self.key.chapter(),
            self.key.verse()
        )
    }
}

/// Sort members by translation order, canonical book order, chapter, verse.
fn sort_locations(pair: &TranslationPair, locations: &mut [Location]) {
    locations.sort_by(|x, y| {
        let rank = |loc: &Location| {
            (
                pair.index(&loc.translation).unwrap_or(usize::MAX),
                canon::book_order(loc.key.book()).unwrap_or(usize::MAX),
            )
        };
        rank(x)
            .cmp(&rank(y))
            .then_with(|| x.key.book().cmp(y.key.book()))
            .then_with(|| x.key.chapter().cmp(&y.key.chapter()))
            .then_with(|| x.key.verse().cmp(&y.key.verse()))
            .then_with(|| x.translation.cmp(&y.translation))
    });
}

/// Membership collected during one traversal.
struct Membership {
    members: HashSet<Location>,
    stack: Vec<Location>,
    truncated: bool,
}

impl Membership {
    fn seeded(seed: Location) -> Self {
        Self {
            members: HashSet::from([seed.clone()]),
            stack: vec![seed],
            truncated: false,
        }
    }

    /// Record a member, optionally queueing it for expansion.
    fn admit(&mut self, location: Location, expand: bool) {
        if !self.members.contains(&location) {
            if self.members.len() >= config::MAX_CLUSTER_SIZE {
                self.truncated = true;
                return;
            }
            self.members.insert(location.clone());
        }
        if expand {
            self.stack.push(location);
        }
    }
}

/// Computes equivalence clusters over a [`RuleSet`].
#[derive(Debug, Clone, Copy)]
pub struct ClusterEngine<'a> {
    matcher: MatchingEngine<'a>,
}

impl<'a> ClusterEngine<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self {
            matcher: MatchingEngine::new(rules),
        }
    }

    pub fn matcher(&self) -> MatchingEngine<'a> {
        self.matcher
    }

    /// All rule outputs for `key` (forward and inverse, every rule),
    /// de-duplicated, with `key` itself removed.
    ///
    /// In the Psalms, once any edge leaves the source chapter, edges within
    /// the source chapter are dropped.
    pub fn rule_edges_only(&self, tx: &Translation, key: &VerseKey) -> Vec<VerseKey> {
        let key = key.canonicalized();
        let rules = self.matcher.rules();
        let pair = rules.pair();

        let mut edges: Vec<VerseKey> = Vec::new();
        for rule in rules.rules_for_book(key.book()) {
            let forward = rule.forward(pair, tx, &key);
            let inverse = rule.inverse(pair, tx, &key);
            for edge in forward.into_iter().chain(inverse) {
                if edge != key && !edges.contains(&edge) {
                    edges.push(edge);
                }
            }
        }

        if key.is_psalms() && edges.iter().any(|e| e.chapter() != key.chapter()) {
            edges.retain(|e| e.chapter() != key.chapter());
        }
        edges
    }

    /// Every location sharing an annotation with `(tx, key)`, sorted.
    ///
    /// Always contains the seed itself.
    pub fn cluster_members(&self, tx: &Translation, key: &VerseKey) -> Vec<Location> {
        let pair = self.matcher.rules().pair();
        let seed = Location::new(tx.clone(), key.canonicalized());
        let mut state = Membership::seeded(seed.clone());
        let mut visited: HashSet<Location> = HashSet::new();

        while let Some(node) = state.stack.pop() {
            if !visited.insert(node.clone()) {
                continue;
            }
            let Some(other) = pair.other(&node.translation) else {
                continue;
            };

            let edges = self.rule_edges_only(&node.translation, &node.key);
            let in_psalms = node.key.is_psalms();
            let co_target = Location::new(other.clone(), node.key.clone());

            tracing::trace!(node = %node, edges = edges.len(), "Expanding cluster node");

            if !edges.is_empty() {
                for edge in edges {
                    state.admit(Location::new(other.clone(), edge), true);
                }
                if !in_psalms && self.is_pure(&co_target) {
                    state.admit(co_target, false);
                }
            } else if !in_psalms {
                state.admit(co_target, true);
            } else if self.is_pure(&co_target) {
                state.admit(co_target, false);
            }
        }

        if state.truncated {
            tracing::warn!(
                seed = %seed,
                max = config::MAX_CLUSTER_SIZE,
                "Cluster size limit reached; rule set may chain unrelated verses"
            );
        }

        let mut members: Vec<Location> = state.members.into_iter().collect();
        sort_locations(pair, &mut members);
        members
    }

    /// Deterministic id of the cluster containing `(tx, key)`.
    pub fn cluster_id(&self, tx: &Translation, key: &VerseKey) -> ClusterId {
        let members = self.cluster_members(tx, key);
        match members.into_iter().next() {
            Some(first) => ClusterId::new(first.translation, first.key),
            None => ClusterId::new(tx.clone(), key.canonicalized()),
        }
    }

    /// Other members of the cluster in the seed's own translation.
    ///
    /// Non-empty when a merge or split makes several verses of the same
    /// translation share one annotation.
    pub fn same_translation_siblings(&self, tx: &Translation, key: &VerseKey) -> Vec<VerseKey> {
        let seed = key.canonicalized();
        self.cluster_members(tx, &seed)
            .into_iter()
            .filter(|loc| loc.translation == *tx && loc.key != seed)
            .map(|loc| loc.key)
            .collect()
    }

    fn is_pure(&self, location: &Location) -> bool {
        self.rule_edges_only(&location.translation, &location.key)
            .is_empty()
    }
}
