//! Fault localization errors
//!
//! Error types for the scoring core and the coverage loader.

use thiserror::Error;

use crate::localization::LineId;

/// Errors returned by the scoring and ranking core.
///
/// Both kinds are deterministic input-validity failures. They are never
/// mapped to a sentinel score.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocalizationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown line: {0} was not covered by any test")]
    UnknownLine(LineId),
}

/// Errors raised while reading a coverage document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoverageError {
    #[error("Malformed coverage XML: {0}")]
    Xml(String),

    #[error("Test #{position} has no name element")]
    MissingTestName { position: usize },
}

/// Result alias for the scoring core.
pub type Result<T> = std::result::Result<T, LocalizationError>;
