//! Error types for the validation engine

use thiserror::Error;

/// Result type for registry, compilation and rule-file operations
pub type Result<T> = std::result::Result<T, CheckError>;

/// Configuration errors.
///
/// These describe mistakes in how rules were declared or registered. An object
/// that fails validation is not an error: it yields a non-empty
/// [`Violations`](crate::Violations) instead.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("Unknown rule type: {name}")]
    UnknownRuleType { name: String },

    #[error("Invalid rule definition at index {index}: {reason}")]
    InvalidRuleDefinition { index: usize, reason: String },

    #[error("Rule type already registered: {name}")]
    DuplicateRuleType { name: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid document {path}: {reason}")]
    InvalidDocument { path: String, reason: String },

    #[error("Unsupported rule file format: {0}")]
    UnsupportedFormat(String),
}

impl CheckError {
    pub(crate) fn invalid(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidRuleDefinition {
            index,
            reason: reason.into(),
        }
    }
}
