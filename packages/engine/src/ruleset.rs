//! Rule document loader
//!
//! Parses the YAML rule document once at startup into an immutable
//! [`RuleSet`]. Any malformed or unrecognized entry fails the whole load, so
//! a process never starts serving queries against a partial rule set.
//!
//! # Document format
//!
//! ```yaml
//! translations: [kjv, rst]
//! rules:
//!   - book: Jonah
//!     type: point
//!     from: { translation: kjv, chapter: 1, verse: 17 }
//!     to: { translation: rst, chapter: 2, verse: 1 }
//!   - book: Psalms
//!     type: title_offset
//!     from: { translation: kjv }
//!     to: { translation: rst }
//!     chapters: [3, 4, 5]
//!     verse1_extra: 1
//!     rest_offset: 1
//! ```
//!
//! The order of `translations` is the cluster sort order. A rule whose
//! `from.translation` is the first tag runs A to B, otherwise B to A;
//! `direction: both` lets either side trigger it forward.
//!
//! # Security Considerations
//!
//! Document size, rule count, range width and title offsets are capped (see
//! [`crate::config`]), so no single query can produce an unbounded result.

use crate::canon::{self, PSALMS};
use crate::config;
use crate::error::{EngineError, Result};
use crate::rule::{Rule, RuleKind};
use crate::types::{Direction, Translation, TranslationPair};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

/// Top-level rule document
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDocument {
    pub translations: Vec<String>,
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
}

/// Variant tag of a rule entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    Point,
    Span,
    ChapterRemap,
    Merge,
    Split,
    TitleOffset,
}

/// Explicit direction override in a rule entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionSpec {
    Forward,
    Both,
}

/// One side of a rule entry.
///
/// Which of `verse` / `start`+`end` must be present depends on the variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Descriptor {
    pub translation: String,
    #[serde(default)]
    pub chapter: Option<u32>,
    #[serde(default)]
    pub verse: Option<u32>,
    #[serde(default)]
    pub start: Option<u32>,
    #[serde(default)]
    pub end: Option<u32>,
}

/// Untyped rule entry as it appears in the document
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleEntry {
    pub book: String,
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    pub from: Descriptor,
    pub to: Descriptor,
    #[serde(default)]
    pub direction: Option<DirectionSpec>,
    #[serde(default)]
    pub chapters: Option<Vec<u32>>,
    #[serde(default)]
    pub verse1_extra: Option<u32>,
    #[serde(default)]
    pub rest_offset: Option<u32>,
}

/// Descriptor shape a variant expects on one side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// translation only
    Bare,
    /// chapter only
    Chapter,
    /// chapter + verse
    Verse,
    /// chapter + start + end
    Range,
}

/// Validation context for one entry; carries position and book for errors.
struct EntryCheck<'a> {
    index: usize,
    book: &'a str,
}

impl EntryCheck<'_> {
    fn invalid(&self, reason: impl Into<String>) -> EngineError {
        EngineError::InvalidRule {
            index: self.index,
            book: self.book.to_string(),
            reason: reason.into(),
        }
    }

    /// Check a descriptor against the expected shape, returning
    /// `(chapter, verse-or-start, end)`; absent parts are 0.
    fn shape(&self, side: &str, d: &Descriptor, shape: Shape) -> Result<(u32, u32, u32)> {
        let present = (
            d.chapter.is_some(),
            d.verse.is_some(),
            d.start.is_some() || d.end.is_some(),
        );
        let expected = match shape {
            Shape::Bare => (false, false, false),
            Shape::Chapter => (true, false, false),
            Shape::Verse => (true, true, false),
            Shape::Range => (true, false, true),
        };
        if present != expected {
            let wanted = match shape {
                Shape::Bare => "only a translation",
                Shape::Chapter => "chapter only",
                Shape::Verse => "chapter and verse",
                Shape::Range => "chapter, start and end",
            };
            return Err(self.invalid(format!("'{side}' must specify {wanted}")));
        }
        for (name, value) in [
            ("chapter", d.chapter),
            ("verse", d.verse),
            ("start", d.start),
            ("end", d.end),
        ] {
            if value == Some(0) {
                return Err(self.invalid(format!("'{side}.{name}' must be at least 1")));
            }
        }
        let chapter = d.chapter.unwrap_or(0);
        match shape {
            Shape::Range => {
                let (start, end) = match (d.start, d.end) {
                    (Some(start), Some(end)) => (start, end),
                    _ => return Err(self.invalid(format!("'{side}' needs both start and end"))),
                };
                if start > end {
                    return Err(self.invalid(format!(
                        "'{side}' range {start}-{end} is reversed"
                    )));
                }
                if end - start >= config::MAX_RANGE_LEN {
                    return Err(self.invalid(format!(
                        "'{side}' range {start}-{end} is wider than {} verses",
                        config::MAX_RANGE_LEN
                    )));
                }
                Ok((chapter, start, end))
            }
            _ => Ok((chapter, d.verse.unwrap_or(0), 0)),
        }
    }
}

impl RuleEntry {
    /// Validate this entry and convert it to a typed rule.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidRule` for a shape or range violation and
    /// `EngineError::UnknownTranslation` for a tag outside `pair`.
    pub fn into_rule(self, pair: &TranslationPair, index: usize) -> Result<Rule> {
        let book = canon::canonicalize(&self.book);
        let check = EntryCheck {
            index,
            book: &book,
        };

        let from_tx = pair.resolve(&self.from.translation)?;
        let to_tx = pair.resolve(&self.to.translation)?;
        if from_tx == to_tx {
            return Err(check.invalid(format!(
                "'from' and 'to' both use translation '{from_tx}'"
            )));
        }
        let direction = match self.direction {
            Some(DirectionSpec::Both) => Direction::Both,
            Some(DirectionSpec::Forward) | None if from_tx == *pair.a() => Direction::AToB,
            Some(DirectionSpec::Forward) | None => Direction::BToA,
        };

        if self.rule_type != RuleType::TitleOffset
            && (self.chapters.is_some()
                || self.verse1_extra.is_some()
                || self.rest_offset.is_some())
        {
            return Err(check.invalid(
                "chapters, verse1_extra and rest_offset only apply to title_offset rules",
            ));
        }

        let kind = match self.rule_type {
            RuleType::Point => {
                let (from_chapter, from_verse, _) = check.shape("from", &self.from, Shape::Verse)?;
                let (to_chapter, to_verse, _) = check.shape("to", &self.to, Shape::Verse)?;
                RuleKind::Point {
                    from_chapter,
                    from_verse,
                    to_chapter,
                    to_verse,
                }
            }
            RuleType::Span => {
                let (from_chapter, start, end) = check.shape("from", &self.from, Shape::Range)?;
                let (to_chapter, to_start, to_end) = check.shape("to", &self.to, Shape::Range)?;
                if end - start != to_end - to_start {
                    return Err(check.invalid(format!(
                        "span lengths differ ({start}-{end} vs {to_start}-{to_end})"
                    )));
                }
                RuleKind::Span {
                    from_chapter,
                    start,
                    end,
                    to_chapter,
                    to_start,
                    to_end,
                }
            }
            RuleType::ChapterRemap => {
                let (from_chapter, _, _) = check.shape("from", &self.from, Shape::Chapter)?;
                let (to_chapter, _, _) = check.shape("to", &self.to, Shape::Chapter)?;
                RuleKind::ChapterRemap {
                    from_chapter,
                    to_chapter,
                }
            }
            RuleType::Merge => {
                let (from_chapter, start, end) = check.shape("from", &self.from, Shape::Range)?;
                let (to_chapter, to_verse, _) = check.shape("to", &self.to, Shape::Verse)?;
                RuleKind::Merge {
                    from_chapter,
                    start,
                    end,
                    to_chapter,
                    to_verse,
                }
            }
            RuleType::Split => {
                let (from_chapter, from_verse, _) = check.shape("from", &self.from, Shape::Verse)?;
                let (to_chapter, to_start, to_end) = check.shape("to", &self.to, Shape::Range)?;
                RuleKind::Split {
                    from_chapter,
                    from_verse,
                    to_chapter,
                    to_start,
                    to_end,
                }
            }
            RuleType::TitleOffset => {
                check.shape("from", &self.from, Shape::Bare)?;
                check.shape("to", &self.to, Shape::Bare)?;
                if book != PSALMS {
                    return Err(check.invalid("title_offset rules apply to Psalms only"));
                }
                let chapters: BTreeSet<u32> =
                    self.chapters.unwrap_or_default().into_iter().collect();
                if chapters.is_empty() {
                    return Err(check.invalid("title_offset needs a non-empty 'chapters' list"));
                }
                if chapters.contains(&0) {
                    return Err(check.invalid("title_offset chapters must be at least 1"));
                }
                let (verse1_extra, rest_offset) = match (self.verse1_extra, self.rest_offset) {
                    (Some(extra), Some(rest)) => (extra, rest),
                    _ => {
                        return Err(
                            check.invalid("title_offset needs verse1_extra and rest_offset")
                        )
                    }
                };
                if verse1_extra > config::MAX_VERSE_OFFSET
                    || rest_offset > config::MAX_VERSE_OFFSET
                {
                    return Err(check.invalid(format!(
                        "title_offset verse1_extra and rest_offset must not exceed {}",
                        config::MAX_VERSE_OFFSET
                    )));
                }
                RuleKind::TitleOffset {
                    chapters,
                    verse1_extra,
                    rest_offset,
                }
            }
        };

        Ok(Rule {
            book,
            direction,
            kind,
        })
    }
}

/// Options for [`RuleSet`] loading
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Reject documents in which two rules claim the same source verse
    pub strict: bool,
}

/// Two rules whose forward domains share at least one source verse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overlap {
    /// Position of the rule that wins (first match)
    pub first: usize,
    /// Position of the shadowed rule
    pub second: usize,
    pub translation: Translation,
    pub book: String,
    pub chapter: u32,
}

/// Ordered, immutable rule set for one translation pair.
///
/// Built once at startup and shared read-only by every query.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pair: TranslationPair,
    rules: Vec<Rule>,
    /// Canonical book -> ascending rule positions
    book_index: HashMap<String, Vec<usize>>,
    fingerprint: String,
}

impl RuleSet {
    /// Build a rule set from already-typed rules.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::LoadError` if the rule count limit is exceeded.
    pub fn new(pair: TranslationPair, rules: Vec<Rule>) -> Result<Self> {
        if rules.len() > config::MAX_RULES {
            tracing::warn!(
                count = rules.len(),
                max = config::MAX_RULES,
                "Rule count exceeds limit"
            );
            return Err(EngineError::LoadError(format!(
                "Rule document exceeds maximum rule count ({} rules)",
                config::MAX_RULES
            )));
        }

        let mut book_index: HashMap<String, Vec<usize>> = HashMap::new();
        for (position, rule) in rules.iter().enumerate() {
            book_index.entry(rule.book.clone()).or_default().push(position);
        }

        let fingerprint = Self::compute_fingerprint(&pair, &rules)?;

        Ok(Self {
            pair,
            rules,
            book_index,
            fingerprint,
        })
    }

    /// Parse a rule set from a YAML string.
    ///
    /// # Errors
    ///
    /// Fails on oversized content, YAML syntax errors, unknown keys, and any
    /// entry rejected by validation.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Self::from_yaml_str_with(content, LoadOptions::default())
    }

    /// Parse a rule set from a YAML string with explicit options.
    ///
    /// # Errors
    ///
    /// See [`RuleSet::from_yaml_str`]; additionally fails with
    /// `EngineError::OverlappingRules` under `strict` loading.
    pub fn from_yaml_str_with(content: &str, options: LoadOptions) -> Result<Self> {
        if content.len() > config::MAX_DOCUMENT_SIZE {
            tracing::warn!(
                size = content.len(),
                max = config::MAX_DOCUMENT_SIZE,
                "Rule document exceeds size limit"
            );
            return Err(EngineError::LoadError(format!(
                "Rule document exceeds maximum size limit ({} bytes)",
                config::MAX_DOCUMENT_SIZE
            )));
        }

        let document: RuleDocument = serde_yaml::from_str(content)?;
        Self::from_document(document, options)
    }

    /// Load a rule set from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::IoError` if the file cannot be read, otherwise
    /// as [`RuleSet::from_yaml_str_with`].
    pub fn from_yaml_file<P: AsRef<Path>>(path: P, options: LoadOptions) -> Result<Self> {
        let path_ref = path.as_ref();
        tracing::debug!(path = %path_ref.display(), "Loading rules from YAML file");

        let metadata = fs::metadata(path_ref)?;
        if metadata.len() > config::MAX_DOCUMENT_SIZE as u64 {
            tracing::warn!(
                path = %path_ref.display(),
                size = metadata.len(),
                "Rule file exceeds size limit"
            );
            return Err(EngineError::LoadError(format!(
                "Rule file exceeds maximum size limit ({} bytes)",
                config::MAX_DOCUMENT_SIZE
            )));
        }

        let content = fs::read_to_string(path_ref)?;
        Self::from_yaml_str_with(&content, options)
    }

    /// Validate a parsed document into a rule set.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidTranslationSet` unless exactly two
    /// distinct translations are declared, or the first entry error.
    pub fn from_document(document: RuleDocument, options: LoadOptions) -> Result<Self> {
        if document.translations.len() != config::TRANSLATION_COUNT {
            return Err(EngineError::InvalidTranslationSet(format!(
                "expected {} translations, got {}",
                config::TRANSLATION_COUNT,
                document.translations.len()
            )));
        }
        let pair = TranslationPair::new(
            Translation::new(&document.translations[0]),
            Translation::new(&document.translations[1]),
        )?;

        let rules = document
            .rules
            .into_iter()
            .enumerate()
            .map(|(index, entry)| entry.into_rule(&pair, index))
            .collect::<Result<Vec<_>>>()?;

        let rule_set = Self::new(pair, rules)?;

        let overlaps = rule_set.overlaps();
        for overlap in &overlaps {
            tracing::warn!(
                first = overlap.first,
                second = overlap.second,
                translation = %overlap.translation,
                book = %overlap.book,
                chapter = overlap.chapter,
                "Rules overlap; first match wins"
            );
        }
        if options.strict {
            if let Some(overlap) = overlaps.first() {
                return Err(EngineError::OverlappingRules(format!(
                    "rules #{} and #{} both cover {} {} chapter {}",
                    overlap.first,
                    overlap.second,
                    overlap.translation,
                    overlap.book,
                    overlap.chapter
                )));
            }
        }

        tracing::debug!(
            a = %rule_set.pair.a(),
            b = %rule_set.pair.b(),
            rules = rule_set.rules.len(),
            books = rule_set.book_index.len(),
            "Parsed rule set successfully"
        );

        Ok(rule_set)
    }

    fn compute_fingerprint(pair: &TranslationPair, rules: &[Rule]) -> Result<String> {
        let canonical = serde_json::to_vec(&(pair, rules))?;
        Ok(hex::encode(Sha256::digest(&canonical)))
    }

    pub fn pair(&self) -> &TranslationPair {
        &self.pair
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules for a canonical book, in document order.
    pub fn rules_for_book<'s>(&'s self, book: &str) -> impl Iterator<Item = &'s Rule> + 's {
        self.book_index
            .get(book)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(move |position| &self.rules[*position])
    }

    /// SHA-256 (hex) over the translation pair and ordered rules.
    ///
    /// Changes whenever a rule changes, so annotation stores keyed by
    /// cluster id can detect that ids may have moved.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Pairs of rules whose forward domains share a source verse.
    pub fn overlaps(&self) -> Vec<Overlap> {
        let mut overlaps = Vec::new();
        for positions in self.book_index.values() {
            for (i, &first) in positions.iter().enumerate() {
                for &second in &positions[i + 1..] {
                    self.collect_overlaps(first, second, &mut overlaps);
                }
            }
        }
        overlaps.sort_by_key(|o| (o.first, o.second, o.chapter));
        overlaps
    }

    fn collect_overlaps(&self, first: usize, second: usize, out: &mut Vec<Overlap>) {
        let (a, b) = (&self.rules[first], &self.rules[second]);
        let b_sources = b.forward_sources(&self.pair);
        for tx in a.forward_sources(&self.pair) {
            if !b_sources.contains(&tx) {
                continue;
            }
            let b_scopes = b.kind.source_scopes();
            for (chapter, scope) in a.kind.source_scopes() {
                let hit = b_scopes
                    .iter()
                    .any(|(ch, other)| *ch == chapter && scope.intersects(other));
                if hit {
                    out.push(Overlap {
                        first,
                        second,
                        translation: tx.clone(),
                        book: a.book.clone(),
                        chapter,
                    });
                }
            }
        }
    }
}
