//! Book name canonicalization
//!
//! Every book name is run through [`canonicalize`] before it is compared or
//! emitted. Matching is insensitive to case, periods and runs of whitespace:
//!
//! ```
//! use versemap_engine::canon::canonicalize;
//!
//! assert_eq!(canonicalize("PSALM."), "Psalms");
//! assert_eq!(canonicalize("  1   john "), "1 John");
//! assert_eq!(canonicalize("Ephesians"), "Ephesians");
//!
//! // Unknown names pass through trimmed
//! assert_eq!(canonicalize(" Enoch "), "Enoch");
//! ```

use std::collections::HashMap;
use std::sync::LazyLock;

/// Canonical name of the book that carries devotional-title numbering.
pub const PSALMS: &str = "Psalms";

/// The 66 canonical book names, in canonical order.
pub const BOOKS: [&str; 66] = [
    "Genesis",
    "Exodus",
    "Leviticus",
    "Numbers",
    "Deuteronomy",
    "Joshua",
    "Judges",
    "Ruth",
    "1 Samuel",
    "2 Samuel",
    "1 Kings",
    "2 Kings",
    "1 Chronicles",
    "2 Chronicles",
    "Ezra",
    "Nehemiah",
    "Esther",
    "Job",
    "Psalms",
    "Proverbs",
    "Ecclesiastes",
    "Song of Solomon",
    "Isaiah",
    "Jeremiah",
    "Lamentations",
    "Ezekiel",
    "Daniel",
    "Hosea",
    "Joel",
    "Amos",
    "Obadiah",
    "Jonah",
    "Micah",
    "Nahum",
    "Habakkuk",
    "Zephaniah",
    "Haggai",
    "Zechariah",
    "Malachi",
    "Matthew",
    "Mark",
    "Luke",
    "John",
    "Acts",
    "Romans",
    "1 Corinthians",
    "2 Corinthians",
    "Galatians",
    "Ephesians",
    "Philippians",
    "Colossians",
    "1 Thessalonians",
    "2 Thessalonians",
    "1 Timothy",
    "2 Timothy",
    "Titus",
    "Philemon",
    "Hebrews",
    "James",
    "1 Peter",
    "2 Peter",
    "1 John",
    "2 John",
    "3 John",
    "Jude",
    "Revelation",
];

/// Alternate spellings and abbreviations, keyed by normalized form.
const ALIASES: &[(&str, &str)] = &[
    ("psalm", "Psalms"),
    ("ps", "Psalms"),
    ("psa", "Psalms"),
    ("pss", "Psalms"),
    ("song of songs", "Song of Solomon"),
    ("canticles", "Song of Solomon"),
    ("revelations", "Revelation"),
    ("rev", "Revelation"),
    ("gen", "Genesis"),
    ("exod", "Exodus"),
    ("matt", "Matthew"),
    ("rom", "Romans"),
    ("eph", "Ephesians"),
    ("phil", "Philippians"),
    ("heb", "Hebrews"),
    ("jon", "Jonah"),
    ("num", "Numbers"),
    ("dan", "Daniel"),
    ("mal", "Malachi"),
    ("1 kgs", "1 Kings"),
    ("2 cor", "2 Corinthians"),
    ("3 jn", "3 John"),
];

/// Normalized form -> canonical name, covering both the book list and aliases.
static LOOKUP: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
    let mut lookup: HashMap<String, &'static str> = BOOKS
        .iter()
        .map(|book| (normalize(book), *book))
        .collect();
    for (alias, book) in ALIASES.iter().copied() {
        lookup.insert(alias.to_string(), book);
    }
    lookup
});

/// Strip periods, collapse whitespace, trim and lower-case.
fn normalize(raw: &str) -> String {
    raw.replace('.', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Resolve a raw book name to its canonical form.
///
/// Best effort: a name that matches neither the alias table nor the
/// canonical list is returned trimmed but otherwise unchanged.
pub fn canonicalize(raw: &str) -> String {
    match LOOKUP.get(&normalize(raw)) {
        Some(book) => (*book).to_string(),
        None => raw.trim().to_string(),
    }
}

/// Position of a canonical book name in [`BOOKS`].
pub fn book_order(book: &str) -> Option<usize> {
    BOOKS.iter().position(|b| *b == book)
}

/// Check whether a name is one of the 66 canonical names (exact match).
pub fn is_canonical(book: &str) -> bool {
    book_order(book).is_some()
}
