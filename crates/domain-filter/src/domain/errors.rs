//! Domain Errors for the Domain Filter
//!
//! Filtering itself never fails: a refused message or member is a routine
//! outcome, not an error. The only errors in this crate come from
//! configuration entry points.

use thiserror::Error;

/// Errors produced while parsing the textual form of a [`Domain`].
///
/// [`Domain`]: super::Domain
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainParseError {
    /// Literal array form must be wrapped in braces, e.g. `{1,2,3}`.
    #[error("byte arrays must be represented as {{1,3,4,5,6}}, got {0:?}")]
    MissingBraces(String),

    /// A token inside the literal array is not a byte value.
    #[error("invalid byte value {token:?} in domain literal")]
    InvalidByte {
        /// The offending token, trimmed.
        token: String,
    },

    /// Plain-text domains are encoded as Latin-1; this character has no encoding.
    #[error("character {ch:?} cannot be encoded as a single byte")]
    UnencodableChar {
        /// The offending character.
        ch: char,
    },
}

/// Errors from loading or validating filter configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// File I/O error.
    #[error("failed to read {path}: {error}")]
    Io {
        /// Path of the file that failed to load.
        path: String,
        /// Error message from the I/O operation.
        error: String,
    },

    /// TOML parsing error.
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// The configured domain could not be parsed.
    #[error("invalid domain: {0}")]
    InvalidDomain(#[from] DomainParseError),

    /// The log interval must be positive.
    #[error("log interval must be positive, got {0}")]
    InvalidLogInterval(u32),
}
