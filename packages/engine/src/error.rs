//! Error types for the versemap engine
//!
//! Only rule-set loading and string parsing can fail. Per-query non-matches
//! are never errors: they surface as empty result vectors.

use thiserror::Error;

/// Main error type for engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to load a rule document (size/count limits, unreadable source)
    #[error("Failed to load rules: {0}")]
    LoadError(String),

    /// YAML parsing error
    #[error("YAML parse error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// A rule entry has the wrong shape or an out-of-range value
    #[error("Invalid rule #{index} ({book}): {reason}")]
    InvalidRule {
        index: usize,
        book: String,
        reason: String,
    },

    /// Translation tag is not one of the two declared translations
    #[error("Unknown translation: {0}")]
    UnknownTranslation(String),

    /// The document does not declare exactly two distinct translations
    #[error("Invalid translation set: {0}")]
    InvalidTranslationSet(String),

    /// Two rules claim the same source verse (strict loading only)
    #[error("Overlapping rules: {0}")]
    OverlappingRules(String),

    /// Verse reference string could not be parsed
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// Cluster id string could not be parsed
    #[error("Invalid cluster id: {0}")]
    InvalidClusterId(String),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
