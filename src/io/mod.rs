//! Bounded, asynchronous file reading.
//!
//! Files are read to completion into a single buffer, in fixed-size chunks so
//! callers can observe progress. The size limit is checked against metadata
//! before any content is read.

pub mod error;

use crate::core::file::FileDescriptor;
use crate::io::error::{IoError, Result};
use bytes::{Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::{debug, trace, warn};

/// Defines the resource limits for reading a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IOLimits {
    /// The absolute maximum file size that can be read.
    pub max_file_size: u64,
    /// Bytes read between progress notifications.
    pub chunk_size: usize,
}

impl Default for IOLimits {
    fn default() -> Self {
        Self {
            max_file_size: 2 * 1024 * 1024 * 1024, // 2GB
            chunk_size: 1024 * 1024,               // 1MB
        }
    }
}

/// Advisory progress of a file read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadProgress {
    pub loaded: u64,
    pub total: u64,
}

/// Shared read-progress callback.
pub type ReadProgressFn = Arc<dyn Fn(ReadProgress) + Send + Sync>;

/// Guess a mime type from the file extension, the way a browser fills in
/// `File.type`. Unknown extensions yield an empty string.
pub fn guess_mime(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| mime_guess::from_ext(ext).first())
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_default()
}

/// Read a whole file into a [`FileDescriptor`].
///
/// The mime type is `mime_override` when given, otherwise guessed from the
/// extension.
pub async fn read_file_descriptor(
    path: &Path,
    mime_override: Option<&str>,
    limits: &IOLimits,
    progress: Option<ReadProgressFn>,
) -> Result<FileDescriptor> {
    let metadata = tokio::fs::metadata(path).await?;
    if !metadata.is_file() {
        return Err(IoError::NotAFile(path.display().to_string()));
    }
    let total = metadata.len();

    debug!(
        path = %path.display(),
        size = total,
        limits.max_file_size = limits.max_file_size,
        "Opening file for reading"
    );

    if total > limits.max_file_size {
        warn!(
            path = %path.display(),
            size = total,
            limit = limits.max_file_size,
            "File is too large"
        );
        return Err(IoError::FileTooLarge {
            limit: limits.max_file_size,
            found: total,
        });
    }

    let mut file = tokio::fs::File::open(path).await?;
    let mut buffer = BytesMut::with_capacity(total as usize);
    let mut chunk = vec![0u8; limits.chunk_size.max(1)];
    let mut loaded = 0u64;

    loop {
        let n = file.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        // The file may grow while we read; the limit still holds.
        if loaded + n as u64 > limits.max_file_size {
            return Err(IoError::FileTooLarge {
                limit: limits.max_file_size,
                found: loaded + n as u64,
            });
        }
        buffer.extend_from_slice(&chunk[..n]);
        loaded += n as u64;
        trace!(path = %path.display(), loaded, total, "Read chunk");
        if let Some(cb) = &progress {
            cb(ReadProgress {
                loaded,
                total: total.max(loaded),
            });
        }
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mime = match mime_override {
        Some(m) => m.trim().to_string(),
        None => guess_mime(path),
    };

    Ok(FileDescriptor::new(name, mime, Bytes::from(buffer)))
}
