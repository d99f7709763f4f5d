//! Content digest value produced by the hasher.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of every digest string, in hex characters (256-bit digest space).
pub const DIGEST_HEX_LEN: usize = 64;

/// Which hashing path produced a digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigestPath {
    /// SHA-256 over the whole content.
    Primary,
    /// Windowed rolling hash used when SHA-256 is unavailable.
    Degraded,
    /// Error marker plus nonce; content was not digested.
    Sentinel,
}

impl fmt::Display for DigestPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestPath::Primary => write!(f, "primary"),
            DigestPath::Degraded => write!(f, "degraded"),
            DigestPath::Sentinel => write!(f, "sentinel"),
        }
    }
}

/// A 64-character lowercase hex digest and the path that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DigestResult {
    pub value: String,
    pub path: DigestPath,
}

impl DigestResult {
    pub fn new(value: String, path: DigestPath) -> Self {
        Self { value, path }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn is_sentinel(&self) -> bool {
        self.path == DigestPath::Sentinel
    }

    /// Prefix used when logging digests.
    pub fn short(&self) -> &str {
        self.value.get(..16).unwrap_or(&self.value)
    }

    /// True when the value is exactly 64 lowercase hex characters.
    pub fn is_well_formed(&self) -> bool {
        self.value.len() == DIGEST_HEX_LEN
            && self
                .value
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    }
}

impl fmt::Display for DigestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
