//! Versemap Engine
//!
//! Maps Bible verse references between two versification traditions (for
//! example KJV and the Russian Synodal Translation) and groups equivalent
//! verses into clusters so that one annotation is visible from either side.
//! This library provides functionality for:
//! - Loading and validating a declarative YAML rule document
//! - Mapping a verse to the other translation (first match wins, identity fallback)
//! - Computing deterministic cross-translation cluster ids
//!
//! # Example
//!
//! ```
//! use versemap_engine::{Translation, VerseKey, VerseMapService};
//!
//! let service = VerseMapService::from_yaml_str(r#"
//! translations: [kjv, rst]
//! rules:
//!   - book: Jonah
//!     type: point
//!     from: { translation: kjv, chapter: 1, verse: 17 }
//!     to: { translation: rst, chapter: 2, verse: 1 }
//! "#)?;
//!
//! let kjv = Translation::new("kjv");
//! assert_eq!(
//!     service.match_to_other(&kjv, &VerseKey::new("Jonah", 1, 17)),
//!     vec![VerseKey::new("Jonah", 2, 1)]
//! );
//! # Ok::<(), versemap_engine::EngineError>(())
//! ```

pub mod canon;
pub mod cli;
pub mod cluster;
pub mod config;
pub mod engine;
pub mod error;
pub mod reference;
pub mod rule;
pub mod ruleset;
pub mod service;
pub mod types;

// Re-export commonly used items
pub use canon::canonicalize;
pub use cluster::{ClusterEngine, ClusterId};
pub use engine::MatchingEngine;
pub use error::{EngineError, Result};
pub use reference::parse_reference;
pub use rule::{Rule, RuleKind};
pub use ruleset::{LoadOptions, Overlap, RuleSet};
pub use service::VerseMapService;
pub use types::{Direction, Location, Translation, TranslationPair, VerseKey};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
