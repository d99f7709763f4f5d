//! Content hashing for file-integrity digests.
//!
//! The hasher resolves every input to a 64-character lowercase hex digest:
//!
//! - primary: SHA-256 over the whole content;
//! - degraded: a windowed rolling hash, used when the primary digester is
//!   missing or fails. Best-effort integrity only, not collision resistant;
//! - sentinel: an error marker plus a time nonce, used when digesting faults
//!   outright (the worker panicked or could not be joined).
//!
//! Hashing faults never escape this module.

use crate::core::digest::{DigestPath, DigestResult, DIGEST_HEX_LEN};
use bytes::Bytes;
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Bytes digested between progress notifications.
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

/// Window size of the degraded rolling hash.
pub const ROLLING_WINDOW: usize = 64;

/// Leading marker of a sentinel digest.
pub const SENTINEL_MARKER: &str = "badc0de0";

/// Errors raised by a digester. The hasher converts these to a fallback.
#[derive(Debug, Error)]
pub enum DigestError {
    #[error("digest primitive unavailable: {0}")]
    Unavailable(String),

    #[error("digest computation failed: {0}")]
    Failed(String),
}

/// Advisory progress of a digest computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashProgress {
    pub processed: u64,
    pub total: u64,
}

impl HashProgress {
    /// Rounded percentage; an empty input counts as complete.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.processed as f64 / self.total as f64) * 100.0).round().min(100.0) as u8
    }
}

/// Shared progress callback.
pub type ProgressFn = Arc<dyn Fn(HashProgress) + Send + Sync>;

/// A secure-hash capability. Implementations must return 64 lowercase hex
/// characters computed over the entire content.
pub trait ContentDigester: Send + Sync {
    fn algorithm(&self) -> &'static str;

    fn digest(
        &self,
        content: &[u8],
        progress: &mut dyn FnMut(HashProgress),
    ) -> Result<String, DigestError>;
}

/// SHA-256 digester, processing content in chunks to report progress.
#[derive(Debug, Clone)]
pub struct Sha256Digester {
    chunk_size: usize,
}

impl Default for Sha256Digester {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl Sha256Digester {
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }
}

impl ContentDigester for Sha256Digester {
    fn algorithm(&self) -> &'static str {
        "sha256"
    }

    fn digest(
        &self,
        content: &[u8],
        progress: &mut dyn FnMut(HashProgress),
    ) -> Result<String, DigestError> {
        let total = content.len() as u64;
        let mut hasher = Sha256::new();
        let mut processed = 0u64;
        for chunk in content.chunks(self.chunk_size) {
            hasher.update(chunk);
            processed += chunk.len() as u64;
            progress(HashProgress { processed, total });
        }
        if content.is_empty() {
            progress(HashProgress { processed: 0, total: 0 });
        }
        Ok(hex::encode(hasher.finalize()))
    }
}

/// Computes the SHA-256 digest of the given data and returns it as a hex string.
pub fn sha256_digest(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Degraded digest: fold each 64-byte window into a 32-bit accumulator
/// (`acc = acc * 31 + byte`, wrapping), emit 8 hex digits per window, then
/// truncate or zero-pad to 64 characters. Depends on content bytes only.
pub fn rolling_digest(content: &[u8]) -> String {
    let mut out = String::with_capacity(DIGEST_HEX_LEN + 8);
    for window in content.chunks(ROLLING_WINDOW) {
        // Later windows would be truncated away.
        if out.len() >= DIGEST_HEX_LEN {
            break;
        }
        let acc = window
            .iter()
            .fold(0u32, |acc, &b| acc.wrapping_mul(31).wrapping_add(u32::from(b)));
        let _ = write!(out, "{:08x}", acc);
    }
    pad_to_digest_len(out)
}

/// Sentinel digest embedding the error marker and a distinguishing nonce.
pub fn sentinel_digest(nonce: u64) -> String {
    pad_to_digest_len(format!("{}{:016x}", SENTINEL_MARKER, nonce))
}

fn pad_to_digest_len(mut s: String) -> String {
    s.truncate(DIGEST_HEX_LEN);
    while s.len() < DIGEST_HEX_LEN {
        s.push('0');
    }
    s
}

fn is_hex_digest(s: &str) -> bool {
    s.len() == DIGEST_HEX_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Resolves content to a digest, degrading gracefully.
#[derive(Clone)]
pub struct Hasher {
    primary: Option<Arc<dyn ContentDigester>>,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Hasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hasher")
            .field("primary", &self.primary.as_ref().map(|d| d.algorithm()))
            .finish()
    }
}

impl Hasher {
    /// Hasher backed by SHA-256.
    pub fn new() -> Self {
        Self::with_primary(Arc::new(Sha256Digester::default()))
    }

    pub fn with_primary(primary: Arc<dyn ContentDigester>) -> Self {
        Self {
            primary: Some(primary),
        }
    }

    /// Hasher with no secure primitive; every digest takes the degraded path.
    pub fn degraded_only() -> Self {
        Self { primary: None }
    }

    /// Digest `content` on a blocking worker. Always resolves to a
    /// well-formed digest; see the module docs for the fallback order.
    pub async fn digest(&self, content: Bytes, progress: Option<ProgressFn>) -> DigestResult {
        let primary = self.primary.clone();
        let size = content.len();
        debug!(size_bytes = size, "Digesting content");

        let worker =
            tokio::task::spawn_blocking(move || compute(primary.as_deref(), &content, progress));

        match worker.await {
            Ok(result) => {
                info!(path = %result.path, digest = %result.short(), "Digest computed");
                result
            }
            Err(join_error) => {
                let nonce = Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64;
                error!(error = %join_error, size_bytes = size, "Digest computation faulted; emitting sentinel");
                DigestResult::new(sentinel_digest(nonce), DigestPath::Sentinel)
            }
        }
    }
}

fn compute(
    primary: Option<&dyn ContentDigester>,
    content: &[u8],
    progress: Option<ProgressFn>,
) -> DigestResult {
    let mut notify = |p: HashProgress| {
        if let Some(cb) = &progress {
            cb(p);
        }
    };

    match primary {
        Some(digester) => match digester.digest(content, &mut notify) {
            Ok(value) if is_hex_digest(&value) => {
                return DigestResult::new(value, DigestPath::Primary);
            }
            Ok(value) => warn!(
                algorithm = digester.algorithm(),
                len = value.len(),
                "Primary digester returned a malformed digest; using fallback"
            ),
            Err(e) => warn!(
                algorithm = digester.algorithm(),
                error = %e,
                "Primary digester failed; using fallback"
            ),
        },
        None => warn!("No secure digest primitive available; using fallback"),
    }

    let value = rolling_digest(content);
    let total = content.len() as u64;
    notify(HashProgress {
        processed: total,
        total,
    });
    DigestResult::new(value, DigestPath::Degraded)
}
