//! File descriptor and report-facing file summary.

use bytes::Bytes;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Bytes per megabyte, as used for every size threshold.
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Mime label shown when the type is unknown.
pub const UNIDENTIFIED_MIME: &str = "unidentified";

/// Extension label shown when the name has no extension.
pub const NO_EXTENSION: &str = "N/A";

/// Localized timestamp layout used throughout reports.
pub const LOCAL_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// A file read for analysis. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    name: String,
    mime_type: String,
    size_bytes: u64,
    content: Bytes,
}

impl FileDescriptor {
    /// Build a descriptor whose size is taken from the content.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, content: Bytes) -> Self {
        let size_bytes = content.len() as u64;
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes,
            content,
        }
    }

    /// Build a descriptor with an explicit size, for callers that only know
    /// the file's metadata (scoring never reads the content).
    pub fn with_size(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        size_bytes: u64,
        content: Bytes,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes,
            content,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mime type; empty when unknown.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Cheap, reference-counted view of the content.
    pub fn content(&self) -> Bytes {
        self.content.clone()
    }

    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / BYTES_PER_MB
    }

    /// Uppercase last dot-segment of the name, or `N/A`.
    pub fn extension(&self) -> String {
        match self.name.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => ext.to_uppercase(),
            _ => NO_EXTENSION.to_string(),
        }
    }

    /// Summary of this file as shown in a report, stamped with `now`.
    pub fn summarize(&self, now: DateTime<Local>) -> FileSummary {
        let mime_type = if self.mime_type.is_empty() {
            UNIDENTIFIED_MIME.to_string()
        } else {
            self.mime_type.clone()
        };
        FileSummary {
            name: self.name.clone(),
            size_formatted: format_size_mb(self.size_bytes),
            mime_type,
            extension: self.extension(),
            analyzed_at: now.format(LOCAL_TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// Format a byte count as `X.XX MB`.
pub fn format_size_mb(size_bytes: u64) -> String {
    format!("{:.2} MB", size_bytes as f64 / BYTES_PER_MB)
}

/// File fields shown in the free-tier report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    pub name: String,
    pub size_formatted: String,
    pub mime_type: String,
    pub extension: String,
    pub analyzed_at: String,
}
