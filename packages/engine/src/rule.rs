//! Verse numbering rules
//!
//! A [`Rule`] describes one numbering difference between the two
//! translations of a [`TranslationPair`]. Every rule is bidirectional: it is
//! applied *forward* when queried from its source translation and *inverted*
//! when queried from the opposite translation with a key inside its target
//! range, so a configuration never needs mirrored rule pairs.
//!
//! | Variant | Forward | Inverse |
//! |---|---|---|
//! | `Point` | one verse to one verse | one verse to one verse |
//! | `Span` | positional alignment of equal-length ranges | same, reversed |
//! | `ChapterRemap` | whole chapter, verse kept | whole chapter, verse kept |
//! | `Merge` | range to one verse | one verse to the full range |
//! | `Split` | one verse to a range | any verse of the range to one verse |
//! | `TitleOffset` | Psalms title shift | title shift undone, title verses dropped |
//!
//! A rule that does not cover a key yields an empty vector, never an error;
//! the matching engine then tries the next rule.

use crate::types::{Direction, Translation, TranslationPair, VerseKey};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// One numbering transform between the two translations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    /// Canonical book name the rule applies to
    pub book: String,
    /// Which side may trigger forward application
    pub direction: Direction,
    /// Variant-specific chapter/verse descriptors
    pub kind: RuleKind,
}

/// The closed set of numbering transforms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleKind {
    /// Exact (chapter, verse) substitution
    Point {
        from_chapter: u32,
        from_verse: u32,
        to_chapter: u32,
        to_verse: u32,
    },
    /// Index alignment between `start..=end` and `to_start..=to_end`
    Span {
        from_chapter: u32,
        start: u32,
        end: u32,
        to_chapter: u32,
        to_start: u32,
        to_end: u32,
    },
    /// Whole-chapter renumbering, verse number preserved
    ChapterRemap { from_chapter: u32, to_chapter: u32 },
    /// `start..=end` collapses onto a single verse
    Merge {
        from_chapter: u32,
        start: u32,
        end: u32,
        to_chapter: u32,
        to_verse: u32,
    },
    /// A single verse expands onto `to_start..=to_end`
    Split {
        from_chapter: u32,
        from_verse: u32,
        to_chapter: u32,
        to_start: u32,
        to_end: u32,
    },
    /// Psalms whose devotional title is counted as verse 1 on the target side.
    ///
    /// Verse 1 maps to `1 + verse1_extra`, every later verse `v` maps to
    /// `v + rest_offset`.
    TitleOffset {
        chapters: BTreeSet<u32>,
        verse1_extra: u32,
        rest_offset: u32,
    },
}

/// Source-side scope of a rule within one chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerseScope {
    /// Every verse of the chapter
    Chapter,
    /// Inclusive verse range
    Range(u32, u32),
}

impl VerseScope {
    /// Check if two scopes in the same chapter share a verse
    pub fn intersects(&self, other: &VerseScope) -> bool {
        match (self, other) {
            (VerseScope::Chapter, _) | (_, VerseScope::Chapter) => true,
            (VerseScope::Range(s1, e1), VerseScope::Range(s2, e2)) => s1 <= e2 && s2 <= e1,
        }
    }
}

/// Shift a verse number, rejecting results below 1.
fn shift(verse: u32, delta: i64) -> Option<u32> {
    let shifted = i64::from(verse) + delta;
    if shifted < 1 {
        return None;
    }
    u32::try_from(shifted).ok()
}

fn in_range(verse: u32, start: u32, end: u32) -> bool {
    start <= verse && verse <= end
}

impl RuleKind {
    /// Short variant name used in logs and reports
    pub fn name(&self) -> &'static str {
        match self {
            RuleKind::Point { .. } => "point",
            RuleKind::Span { .. } => "span",
            RuleKind::ChapterRemap { .. } => "chapter_remap",
            RuleKind::Merge { .. } => "merge",
            RuleKind::Split { .. } => "split",
            RuleKind::TitleOffset { .. } => "title_offset",
        }
    }

    /// Check if `key` lies in the source ("from") range.
    pub fn covers_source(&self, key: &VerseKey) -> bool {
        let (ch, v) = (key.chapter(), key.verse());
        match self {
            RuleKind::Point {
                from_chapter,
                from_verse,
                ..
            }
            | RuleKind::Split {
                from_chapter,
                from_verse,
                ..
            } => ch == *from_chapter && v == *from_verse,
            RuleKind::Span {
                from_chapter,
                start,
                end,
                ..
            }
            | RuleKind::Merge {
                from_chapter,
                start,
                end,
                ..
            } => ch == *from_chapter && in_range(v, *start, *end),
            RuleKind::ChapterRemap { from_chapter, .. } => ch == *from_chapter,
            RuleKind::TitleOffset { chapters, .. } => chapters.contains(&ch) && v >= 1,
        }
    }

    /// Apply the transform to a source key.
    pub fn apply(&self, key: &VerseKey) -> Vec<VerseKey> {
        if !self.covers_source(key) {
            return Vec::new();
        }
        let v = key.verse();
        match self {
            RuleKind::Point {
                to_chapter,
                to_verse,
                ..
            }
            | RuleKind::Merge {
                to_chapter,
                to_verse,
                ..
            } => vec![key.at(*to_chapter, *to_verse)],
            RuleKind::Span {
                start,
                to_chapter,
                to_start,
                to_end,
                ..
            } => shift(*to_start, i64::from(v) - i64::from(*start))
                .filter(|mapped| in_range(*mapped, *to_start, *to_end))
                .map(|mapped| key.at(*to_chapter, mapped))
                .into_iter()
                .collect(),
            RuleKind::ChapterRemap { to_chapter, .. } => vec![key.at(*to_chapter, v)],
            RuleKind::Split {
                to_chapter,
                to_start,
                to_end,
                ..
            } => (*to_start..=*to_end)
                .map(|verse| key.at(*to_chapter, verse))
                .collect(),
            RuleKind::TitleOffset {
                verse1_extra,
                rest_offset,
                ..
            } => {
                let delta = if v == 1 { *verse1_extra } else { *rest_offset };
                shift(v, i64::from(delta))
                    .map(|mapped| key.at(key.chapter(), mapped))
                    .into_iter()
                    .collect()
            }
        }
    }

    /// Map a target-side key back to its source key(s).
    pub fn invert(&self, key: &VerseKey) -> Vec<VerseKey> {
        let (ch, v) = (key.chapter(), key.verse());
        match self {
            RuleKind::Point {
                from_chapter,
                from_verse,
                to_chapter,
                to_verse,
            } => {
                if ch == *to_chapter && v == *to_verse {
                    vec![key.at(*from_chapter, *from_verse)]
                } else {
                    Vec::new()
                }
            }
            RuleKind::Span {
                from_chapter,
                start,
                end,
                to_chapter,
                to_start,
                to_end,
            } => {
                if ch != *to_chapter || !in_range(v, *to_start, *to_end) {
                    return Vec::new();
                }
                shift(*start, i64::from(v) - i64::from(*to_start))
                    .filter(|orig| in_range(*orig, *start, *end))
                    .map(|orig| key.at(*from_chapter, orig))
                    .into_iter()
                    .collect()
            }
            RuleKind::ChapterRemap {
                from_chapter,
                to_chapter,
            } => {
                if ch == *to_chapter {
                    vec![key.at(*from_chapter, v)]
                } else {
                    Vec::new()
                }
            }
            RuleKind::Merge {
                from_chapter,
                start,
                end,
                to_chapter,
                to_verse,
            } => {
                if ch == *to_chapter && v == *to_verse {
                    (*start..=*end)
                        .map(|verse| key.at(*from_chapter, verse))
                        .collect()
                } else {
                    Vec::new()
                }
            }
            RuleKind::Split {
                from_chapter,
                from_verse,
                to_chapter,
                to_start,
                to_end,
            } => {
                if ch == *to_chapter && in_range(v, *to_start, *to_end) {
                    vec![key.at(*from_chapter, *from_verse)]
                } else {
                    Vec::new()
                }
            }
            RuleKind::TitleOffset {
                chapters,
                verse1_extra,
                rest_offset,
            } => {
                if !chapters.contains(&ch) {
                    return Vec::new();
                }
                let Some(first) = verse1_extra.checked_add(1) else {
                    return Vec::new();
                };
                if v == first {
                    return vec![key.at(ch, 1)];
                }
                if v < first {
                    // title verse, no counterpart
                    return Vec::new();
                }
                shift(v, -i64::from(*rest_offset))
                    .map(|orig| key.at(ch, orig))
                    .into_iter()
                    .collect()
            }
        }
    }

    /// Source-side (chapter, scope) pairs this transform covers.
    pub fn source_scopes(&self) -> Vec<(u32, VerseScope)> {
        match self {
            RuleKind::Point {
                from_chapter,
                from_verse,
                ..
            }
            | RuleKind::Split {
                from_chapter,
                from_verse,
                ..
            } => vec![(*from_chapter, VerseScope::Range(*from_verse, *from_verse))],
            RuleKind::Span {
                from_chapter,
                start,
                end,
                ..
            }
            | RuleKind::Merge {
                from_chapter,
                start,
                end,
                ..
            } => vec![(*from_chapter, VerseScope::Range(*start, *end))],
            RuleKind::ChapterRemap { from_chapter, .. } => {
                vec![(*from_chapter, VerseScope::Chapter)]
            }
            RuleKind::TitleOffset { chapters, .. } => chapters
                .iter()
                .map(|ch| (*ch, VerseScope::Chapter))
                .collect(),
        }
    }
}

impl Rule {
    pub fn new(book: &str, direction: Direction, kind: RuleKind) -> Self {
        Self {
            book: crate::canon::canonicalize(book),
            direction,
            kind,
        }
    }

    /// Check if a query from `tx` would apply this rule forward to `key`.
    pub fn applies_forward(
        &self,
        pair: &TranslationPair,
        tx: &Translation,
        key: &VerseKey,
    ) -> bool {
        self.direction.allows_forward(pair, tx)
            && key.book() == self.book
            && self.kind.covers_source(key)
    }

    /// Forward contribution for a query from `tx`.
    pub fn forward(
        &self,
        pair: &TranslationPair,
        tx: &Translation,
        key: &VerseKey,
    ) -> Vec<VerseKey> {
        if self.applies_forward(pair, tx, key) {
            self.kind.apply(key)
        } else {
            Vec::new()
        }
    }

    /// Inverse contribution for a query from `tx`.
    pub fn inverse(
        &self,
        pair: &TranslationPair,
        tx: &Translation,
        key: &VerseKey,
    ) -> Vec<VerseKey> {
        if self.direction.allows_inverse(pair, tx) && key.book() == self.book {
            self.kind.invert(key)
        } else {
            Vec::new()
        }
    }

    /// Map `key` as seen from `tx`: forward if that yields anything,
    /// otherwise inverted.
    pub fn map(&self, pair: &TranslationPair, tx: &Translation, key: &VerseKey) -> Vec<VerseKey> {
        let forward = self.forward(pair, tx, key);
        if !forward.is_empty() {
            return forward;
        }
        self.inverse(pair, tx, key)
    }

    /// Check if `key` is a devotional-title verse with no counterpart on the
    /// other side (target side of a `TitleOffset` rule).
    pub fn is_title_only(&self, pair: &TranslationPair, tx: &Translation, key: &VerseKey) -> bool {
        match &self.kind {
            RuleKind::TitleOffset {
                chapters,
                verse1_extra,
                ..
            } => {
                self.direction.allows_inverse(pair, tx)
                    && key.book() == self.book
                    && chapters.contains(&key.chapter())
                    && key.verse() >= 1
                    && key.verse() <= *verse1_extra
            }
            _ => false,
        }
    }

    /// Translations from which this rule can fire forward.
    pub fn forward_sources<'p>(&self, pair: &'p TranslationPair) -> Vec<&'p Translation> {
        [pair.a(), pair.b()]
            .into_iter()
            .filter(|tx| self.direction.allows_forward(pair, tx))
            .collect()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.book, self.kind.name())?;
        match &self.kind {
            RuleKind::Point {
                from_chapter,
                from_verse,
                to_chapter,
                to_verse,
            } => write!(f, " {from_chapter}:{from_verse} -> {to_chapter}:{to_verse}"),
            RuleKind::Span {
                from_chapter,
                start,
                end,
                to_chapter,
                to_start,
                to_end,
            } => write!(
                f,
                " {from_chapter}:{start}-{end} -> {to_chapter}:{to_start}-{to_end}"
            ),
            RuleKind::ChapterRemap {
                from_chapter,
                to_chapter,
            } => write!(f, " {from_chapter} -> {to_chapter}"),
            RuleKind::Merge {
                from_chapter,
                start,
                end,
                to_chapter,
                to_verse,
            } => write!(f, " {from_chapter}:{start}-{end} -> {to_chapter}:{to_verse}"),
            RuleKind::Split {
                from_chapter,
                from_verse,
                to_chapter,
                to_start,
                to_end,
            } => write!(
                f,
                " {from_chapter}:{from_verse} -> {to_chapter}:{to_start}-{to_end}"
            ),
            RuleKind::TitleOffset { chapters, .. } => write!(f, " ({} chapters)", chapters.len()),
        }
    }
}
