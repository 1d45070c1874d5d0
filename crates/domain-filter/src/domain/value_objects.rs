//! Value Objects for the Domain Filter
//!
//! - [`Domain`]: byte-exact partition tag with its two textual encodings
//! - [`FilterConfig`]: the filter's in-process settings

use std::fmt;
use std::str::FromStr;

use super::{ConfigError, DomainParseError};

/// Default number of suppressed messages between two refusal warnings.
pub const DEFAULT_LOG_INTERVAL: u32 = 100;

/// A partition tag identifying which logical sub-cluster a node belongs to.
///
/// Domains are opaque byte sequences compared element-wise. Two domains are
/// equal iff their bytes are equal, so `{1,2}` and `{1,2,0}` are different
/// domains. The empty domain is a valid domain like any other.
///
/// # Textual forms
///
/// - Literal array: `{1,2,3}` (values `-128..=255`, negatives are two's complement)
/// - Plain text: `east`, encoded as Latin-1, one byte per character
///
/// [`Display`](fmt::Display) always renders the literal array form, which
/// parses back to the same bytes.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Domain(Vec<u8>);

impl Domain {
    /// Create a domain from raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The empty domain (the default for an unconfigured filter).
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Parse either textual form.
    ///
    /// Text starting with `{` is read as a literal array, anything else as
    /// plain Latin-1 text.
    pub fn parse(text: &str) -> Result<Self, DomainParseError> {
        if text.starts_with('{') {
            Self::from_literal_array(text)
        } else {
            Self::from_latin1(text)
        }
    }

    /// Parse the literal array form, e.g. `{1,2,3}`.
    ///
    /// Braces and commas are all separators, so empty tokens are skipped and
    /// `{}` is the empty domain.
    pub fn from_literal_array(text: &str) -> Result<Self, DomainParseError> {
        let inner = text
            .trim()
            .strip_prefix('{')
            .ok_or_else(|| DomainParseError::MissingBraces(text.to_string()))?;

        inner
            .split(['{', ',', '}'])
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(parse_byte)
            .collect::<Result<Vec<u8>, _>>()
            .map(Self)
    }

    /// Encode plain text as Latin-1.
    pub fn from_latin1(text: &str) -> Result<Self, DomainParseError> {
        text.chars()
            .map(|ch| u8::try_from(ch).map_err(|_| DomainParseError::UnencodableChar { ch }))
            .collect::<Result<Vec<u8>, _>>()
            .map(Self)
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Byte-exact comparison against a raw tag.
    pub fn matches(&self, other: &[u8]) -> bool {
        self.0 == other
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

fn parse_byte(token: &str) -> Result<u8, DomainParseError> {
    let invalid = || DomainParseError::InvalidByte {
        token: token.to_string(),
    };
    let value: i16 = token.parse().map_err(|_| invalid())?;
    match value {
        0..=255 => Ok(value as u8),
        -128..=-1 => Ok(value as i8 as u8),
        _ => Err(invalid()),
    }
}

impl FromStr for Domain {
    type Err = DomainParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Vec<u8>> for Domain {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Domain {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl AsRef<[u8]> for Domain {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", byte)?;
        }
        f.write_str("}")
    }
}

impl fmt::Debug for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Domain({})", self)
    }
}

/// Filter configuration.
///
/// Passed to the filter at construction. Both fields can be changed later
/// through the filter's explicit setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// The domain this node belongs to (default: empty)
    pub domain: Domain,
    /// Suppressed messages between two refusal warnings (default: 100).
    ///
    /// The first refusal always logs; after that one line is logged per
    /// `log_interval + 1` refusals, so `1` logs every other refusal.
    pub log_interval: u32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            domain: Domain::empty(),
            log_interval: DEFAULT_LOG_INTERVAL,
        }
    }
}

impl FilterConfig {
    /// Create a config for `domain` with the default log interval.
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_log_interval(mut self, log_interval: u32) -> Self {
        self.log_interval = log_interval;
        self
    }

    /// Reject settings the filter cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_interval == 0 {
            return Err(ConfigError::InvalidLogInterval(self.log_interval));
        }
        Ok(())
    }
}
