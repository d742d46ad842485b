//! Identifier newtypes for the two sides of an identity link.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A user id on the messaging platform (the side being queried).
///
/// Opaque snowflake-style string; the pipeline never interprets it beyond
/// equality comparison.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformUserId(String);

impl PlatformUserId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlatformUserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PlatformUserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PlatformUserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A username on the external identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExternalUsername(String);

impl ExternalUsername {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExternalUsername {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ExternalUsername {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ExternalUsername {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A stable short identifier for one public key: lowercase hex of the
/// Blake2b-256 digest of the key bytes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Wrap an already hex-encoded digest. Normalized to lowercase so that
    /// fingerprint comparison is case-insensitive.
    pub fn new(hex_digest: impl Into<String>) -> Self {
        Self(hex_digest.into().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
