//! errors.rs - Custom error types for the wordswap-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// This enum represents all possible error types in the `wordswap-core` library.
///
/// Marked `#[non_exhaustive]` so new variants can be added without breaking
/// downstream matches.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum WordswapError {
    #[error("Failed to compile the {0} matcher: {1}")]
    MatcherCompilationError(&'static str, regex::Error),

    #[error("Rule keys must not be empty")]
    EmptyKey,

    #[error("A rule for '{0}' already exists")]
    DuplicateKey(String),

    #[error("No rule exists for '{0}'")]
    UnknownKey(String),

    #[error("Cannot rename '{0}' to '{1}': keys differing only by letter case are ambiguous")]
    CaseOnlyRename(String, String),

    #[error("Rule set holds {0} rules, exceeding the maximum of {1}")]
    RuleLimitExceeded(usize, usize),

    #[error("Store would grow to {0} bytes, exceeding the quota of {1}")]
    QuotaExceeded(usize, usize),

    #[error("Failed to (de)serialize stored value '{0}': {1}")]
    SerializationError(String, serde_json::Error),

    #[error("Failed to parse settings: {0}")]
    SettingsParseError(#[from] serde_yml::Error),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T, E = WordswapError> = std::result::Result<T, E>;
