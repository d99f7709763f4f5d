//! The record persisted remotely for each analysis.

use super::digest::DigestResult;
use super::environment::EnvironmentSnapshot;
use super::file::FileDescriptor;
use super::id::AnalysisId;
use super::origin::OriginTag;
use super::report::CompatibilityReport;
use crate::error::ForensizerError;
use serde::{Deserialize, Serialize};

/// Who requested the analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientIdentity {
    pub name: String,
    pub email: String,
}

/// File fields stored in the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub digest: DigestResult,
}

impl FileRecord {
    pub fn from_descriptor(file: &FileDescriptor, digest: DigestResult) -> Self {
        Self {
            name: file.name().to_string(),
            mime_type: file.mime_type().to_string(),
            size_bytes: file.size_bytes(),
            digest,
        }
    }
}

/// Lifecycle status of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    FreeAnalysisCompleted,
}

/// Everything known about one analysis, sent once to the remote logger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: AnalysisId,
    pub client: ClientIdentity,
    pub file: FileRecord,
    pub report: CompatibilityReport,
    pub environment: EnvironmentSnapshot,
    pub declared_origin: OriginTag,
    /// UTC, RFC 3339
    pub timestamp: String,
    pub timestamp_local: String,
    pub status: RecordStatus,
}

impl AnalysisRecord {
    pub fn to_json_string(&self) -> Result<String, ForensizerError> {
        serde_json::to_string(self)
            .map_err(|e| ForensizerError::Serialization(format!("JSON serialization error: {}", e)))
    }

    pub fn from_json_str(json_str: &str) -> Result<Self, ForensizerError> {
        serde_json::from_str(json_str).map_err(|e| {
            ForensizerError::Serialization(format!("JSON deserialization error: {}", e))
        })
    }
}
