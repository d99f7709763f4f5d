//! Analysis identifiers.
//!
//! Every completed free analysis gets an identifier of the form
//! `FS_<unix millis>_<9 lowercase alphanumerics>`. The identifier is the key
//! the remote record is stored under and the reference embedded in the
//! paid-tier checkout URL.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Prefix shared by all analysis identifiers.
pub const ID_PREFIX: &str = "FS_";

/// Length of the random suffix.
pub const SUFFIX_LEN: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisId(String);

impl AnalysisId {
    /// Generate a fresh identifier stamped with `now`.
    pub fn generate(now: DateTime<Utc>) -> Self {
        let uuid = Uuid::new_v4().simple().to_string();
        let suffix = &uuid[..SUFFIX_LEN];
        AnalysisId(format!("{}{}_{}", ID_PREFIX, now.timestamp_millis(), suffix))
    }

    /// Validate and wrap an identifier supplied by a caller.
    pub fn parse(raw: &str) -> Option<Self> {
        let rest = raw.trim().strip_prefix(ID_PREFIX)?;
        let (millis, suffix) = rest.split_once('_')?;
        let millis_ok = !millis.is_empty() && millis.bytes().all(|b| b.is_ascii_digit());
        let suffix_ok = suffix.len() == SUFFIX_LEN
            && suffix
                .bytes()
                .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase());
        if millis_ok && suffix_ok {
            Some(AnalysisId(raw.trim().to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnalysisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
