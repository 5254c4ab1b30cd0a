//! Human-readable verse references
//!
//! Parses strings such as `"1 John 3:16"` or `"Ps. 23:1"` into a canonical
//! [`VerseKey`]. The book part goes through the canonicalizer, so any alias
//! it knows is accepted; unknown book names pass through unchanged.

use crate::error::{EngineError, Result};
use crate::types::VerseKey;
use regex::Regex;
use std::sync::LazyLock;

/// `<book> <chapter>:<verse>`, where the book may start with a digit and
/// is written in any script.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static REFERENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<book>.*?\p{L}.*?)\s*(?P<chapter>\d+)\s*:\s*(?P<verse>\d+)\s*$")
        .expect("valid regex")
});

/// Parse a reference into a canonical verse key.
///
/// # Errors
///
/// Returns `EngineError::InvalidReference` if the text does not have the
/// `<book> <chapter>:<verse>` shape or a number is zero or out of range.
///
/// # Example
///
/// ```
/// use versemap_engine::reference::parse_reference;
///
/// let key = parse_reference("Ps. 23:1").unwrap();
/// assert_eq!(key.to_string(), "Psalms 23:1");
/// ```
pub fn parse_reference(text: &str) -> Result<VerseKey> {
    let caps = REFERENCE_PATTERN
        .captures(text)
        .ok_or_else(|| EngineError::InvalidReference(format!("expected 'Book C:V', got '{text}'")))?;

    let book = &caps["book"];
    let number = |name: &str| -> Result<u32> {
        let raw = &caps[name];
        match raw.parse::<u32>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(EngineError::InvalidReference(format!(
                "{name} '{raw}' must be a positive number in '{text}'"
            ))),
        }
    };

    Ok(VerseKey::new(book, number("chapter")?, number("verse")?))
}
