//! Conversion helpers for Gherkin values and data tables
//!
//! Converts reference strings and location tables from feature files to
//! engine types.

use versemap_engine::{parse_reference, Location, Translation, VerseKey};

/// Parse a comma-separated reference list.
///
/// `nothing` (or an empty string) is the empty list.
pub fn parse_reference_list(text: &str) -> Vec<VerseKey> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == "nothing" {
        return Vec::new();
    }
    trimmed
        .split(',')
        .map(|part| {
            parse_reference(part)
                .unwrap_or_else(|e| panic!("Invalid reference '{part}' in feature file: {e}"))
        })
        .collect()
}

/// Parse a location table.
///
/// The table format is:
/// ```text
/// | translation | reference  |
/// | kjv         | Jonah 1:17 |
/// ```
/// The header row is skipped.
pub fn parse_location_table(table: &cucumber::gherkin::Table) -> Vec<Location> {
    table
        .rows
        .iter()
        .skip(1)
        .filter(|row| row.len() >= 2)
        .map(|row| {
            let key = parse_reference(&row[1])
                .unwrap_or_else(|e| panic!("Invalid reference '{}' in table: {e}", row[1]));
            Location::new(Translation::new(&row[0]), key)
        })
        .collect()
}

