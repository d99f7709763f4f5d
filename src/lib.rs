//! Forensizer: file compatibility analysis.
//!
//! Reads a file, fingerprints its content, scores how likely it is to travel
//! intact through a declared delivery channel, and records the analysis with
//! a remote logger.

pub mod compat;
pub mod config;
/// Core data types module
pub mod core;
pub mod environment;
pub mod error;
pub mod hashing;
pub mod io;
pub mod logging;
pub mod payment;
pub mod remote;
pub mod session;
pub mod timeout;

pub use crate::compat::score::score;
pub use crate::config::ForensizerConfig;
pub use crate::core::{AnalysisId, CompatibilityReport, DigestResult, OriginTag, StatusTier};
pub use crate::error::{ForensizerError, Result};
pub use crate::hashing::Hasher;
pub use crate::session::{AnalysisRequest, AnalysisSession, Analyzer};
