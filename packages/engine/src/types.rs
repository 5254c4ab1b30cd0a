//! Core types for the versemap engine

use crate::canon::{self, PSALMS};
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Address of a verse within one translation's numbering.
///
/// The book name is canonicalized on construction, so two keys compare equal
/// whenever they name the same verse, however the book was spelled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawVerseKey")]
pub struct VerseKey {
    book: String,
    chapter: u32,
    verse: u32,
}

/// Deserialization shape; routed through [`VerseKey::new`] for canonicalization.
#[derive(Deserialize)]
struct RawVerseKey {
    book: String,
    chapter: u32,
    verse: u32,
}

impl From<RawVerseKey> for VerseKey {
    fn from(raw: RawVerseKey) -> Self {
        VerseKey::new(&raw.book, raw.chapter, raw.verse)
    }
}

impl VerseKey {
    /// Create a key, canonicalizing the book name.
    pub fn new(book: &str, chapter: u32, verse: u32) -> Self {
        Self {
            book: canon::canonicalize(book),
            chapter,
            verse,
        }
    }

    /// Canonical book name
    pub fn book(&self) -> &str {
        &self.book
    }

    pub fn chapter(&self) -> u32 {
        self.chapter
    }

    pub fn verse(&self) -> u32 {
        self.verse
    }

    /// Same book, different chapter and verse.
    pub fn at(&self, chapter: u32, verse: u32) -> Self {
        Self {
            book: self.book.clone(),
            chapter,
            verse,
        }
    }

    /// Copy of this key with the book name re-canonicalized.
    pub fn canonicalized(&self) -> Self {
        Self::new(&self.book, self.chapter, self.verse)
    }

    /// Check if this key addresses the Psalms
    pub fn is_psalms(&self) -> bool {
        self.book == PSALMS
    }
}

impl fmt::Display for VerseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.book, self.chapter, self.verse)
    }
}

/// Opaque tag naming one textual tradition (e.g. "kjv", "rst").
///
/// Tags are trimmed and lower-cased so configuration and callers can be
/// sloppy about case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Translation(String);

impl Translation {
    pub fn new(tag: &str) -> Self {
        Self(tag.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Translation {
    fn from(tag: &str) -> Self {
        Translation::new(tag)
    }
}

impl From<String> for Translation {
    fn from(tag: String) -> Self {
        Translation::new(&tag)
    }
}

impl From<Translation> for String {
    fn from(tx: Translation) -> Self {
        tx.0
    }
}

impl fmt::Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two translations a rule set maps between.
///
/// Declaration order is significant: `a` sorts before `b` when cluster
/// members are ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationPair {
    a: Translation,
    b: Translation,
}

impl TranslationPair {
    /// Create a pair from two distinct, non-empty tags.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidTranslationSet` if a tag is empty or both
    /// tags are equal.
    pub fn new(a: Translation, b: Translation) -> Result<Self> {
        if a.as_str().is_empty() || b.as_str().is_empty() {
            return Err(EngineError::InvalidTranslationSet(
                "translation tags cannot be empty".to_string(),
            ));
        }
        if a == b {
            return Err(EngineError::InvalidTranslationSet(format!(
                "translations must differ, got '{a}' twice"
            )));
        }
        Ok(Self { a, b })
    }

    pub fn a(&self) -> &Translation {
        &self.a
    }

    pub fn b(&self) -> &Translation {
        &self.b
    }

    pub fn contains(&self, tx: &Translation) -> bool {
        *tx == self.a || *tx == self.b
    }

    /// The translation that is not `tx`, or `None` if `tx` is not in the pair.
    pub fn other(&self, tx: &Translation) -> Option<&Translation> {
        if *tx == self.a {
            Some(&self.b)
        } else if *tx == self.b {
            Some(&self.a)
        } else {
            None
        }
    }

    /// Sort position of `tx` (0 for `a`, 1 for `b`).
    pub fn index(&self, tx: &Translation) -> Option<usize> {
        if *tx == self.a {
            Some(0)
        } else if *tx == self.b {
            Some(1)
        } else {
            None
        }
    }

    /// Look up a tag, failing if it is not one of the pair.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::UnknownTranslation` for a foreign tag.
    pub fn resolve(&self, tag: &str) -> Result<Translation> {
        let tx = Translation::new(tag);
        if self.contains(&tx) {
            Ok(tx)
        } else {
            Err(EngineError::UnknownTranslation(tag.to_string()))
        }
    }
}

/// Which source translation may trigger a rule's forward application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Forward from `a`, inverse from `b`
    AToB,
    /// Forward from `b`, inverse from `a`
    BToA,
    /// Forward and inverse from either side
    Both,
}

impl Direction {
    /// Check if a query from `tx` may apply the rule forward
    pub fn allows_forward(&self, pair: &TranslationPair, tx: &Translation) -> bool {
        match self {
            Direction::AToB => tx == pair.a(),
            Direction::BToA => tx == pair.b(),
            Direction::Both => pair.contains(tx),
        }
    }

    /// Check if a query from `tx` may apply the rule inverted
    pub fn allows_inverse(&self, pair: &TranslationPair, tx: &Translation) -> bool {
        match self {
            Direction::AToB => tx == pair.b(),
            Direction::BToA => tx == pair.a(),
            Direction::Both => pair.contains(tx),
        }
    }
}

/// A verse in a specific translation; the unit of cluster membership.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    pub translation: Translation,
    pub key: VerseKey,
}

impl Location {
    pub fn new(translation: Translation, key: VerseKey) -> Self {
        Self { translation, key }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.translation, self.key)
    }
}
