//! Configuration constants for the versemap engine
//!
//! Centralized limits used while loading rule documents and while
//! traversing clusters:
//! - Document size and rule count (guards the one-time load)
//! - Range width and verse offsets (guards per-query output size)
//! - Cluster size (guards traversal over a misconfigured, cyclic rule set)
//!
//! These are compile-time constants. The rule document itself is the only
//! runtime configuration the engine consumes.

/// Number of translations a rule document must declare.
///
/// Directions are modelled pairwise (A to B, B to A, both), so any other
/// count is rejected at load time.
pub const TRANSLATION_COUNT: usize = 2;

/// Maximum rule document size in bytes (1 MB).
///
/// A complete two-tradition versification table is a few hundred rules,
/// well under 100 KB of YAML.
pub const MAX_DOCUMENT_SIZE: usize = 1_000_000;

/// Maximum number of rules in one document.
pub const MAX_RULES: usize = 10_000;

/// Maximum number of verses in one `start..=end` range of a rule.
///
/// The longest chapter (Psalm 119) has 176 verses; a split or merge never
/// needs more than one chapter's worth of verses on either side.
pub const MAX_RANGE_LEN: u32 = 200;

/// Maximum `verse1_extra` / `rest_offset` of a title offset rule.
///
/// Psalm titles occupy at most two verses in any known tradition.
pub const MAX_VERSE_OFFSET: u32 = 16;

/// Maximum number of locations collected into a single cluster.
///
/// Real clusters hold a handful of verses (the largest merges span a few
/// verses per side). Reaching this limit means the rule set chains
/// unrelated verses together; traversal stops expanding and logs a warning.
pub const MAX_CLUSTER_SIZE: usize = 256;
