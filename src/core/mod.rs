//! Core data types for Forensizer.
//!
//! Plain, serializable values passed between the pipeline stages: the file
//! being analyzed, its digest, the declared origin, the resulting report and
//! the record persisted remotely.

pub mod digest;
pub mod environment;
pub mod file;
pub mod id;
pub mod origin;
pub mod record;
pub mod report;

pub use digest::{DigestPath, DigestResult, DIGEST_HEX_LEN};
pub use environment::{DeviceClass, EnvironmentSnapshot};
pub use file::{FileDescriptor, FileSummary};
pub use id::AnalysisId;
pub use origin::OriginTag;
pub use record::{AnalysisRecord, ClientIdentity, FileRecord, RecordStatus};
pub use report::{CompatibilityReport, StatusTier};
