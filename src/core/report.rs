//! Compatibility report and status tiers.

use super::digest::DigestResult;
use super::file::FileSummary;
use super::origin::OriginTag;
use crate::error::ForensizerError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse classification derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusTier {
    Compatible,
    PartiallyCompatible,
    Incompatible,
}

impl StatusTier {
    /// Classify a (pre-clamp) score using the default 80/60 boundaries.
    pub fn from_score(score: i32) -> Self {
        Self::from_score_with(score, 80, 60)
    }

    /// Classify with explicit boundaries: `>= compatible` is compatible,
    /// `>= partial` is partially compatible, anything lower is incompatible.
    pub fn from_score_with(score: i32, compatible: i32, partial: i32) -> Self {
        if score >= compatible {
            StatusTier::Compatible
        } else if score >= partial {
            StatusTier::PartiallyCompatible
        } else {
            StatusTier::Incompatible
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusTier::Compatible => "COMPATIBLE",
            StatusTier::PartiallyCompatible => "PARTIALLY COMPATIBLE",
            StatusTier::Incompatible => "INCOMPATIBLE",
        }
    }

    /// Compatibility level badge.
    pub fn level(&self) -> &'static str {
        match self {
            StatusTier::Compatible => "high",
            StatusTier::PartiallyCompatible => "medium",
            StatusTier::Incompatible => "low",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            StatusTier::Compatible => "✅",
            StatusTier::PartiallyCompatible => "⚠️",
            StatusTier::Incompatible => "❌",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            StatusTier::Compatible => {
                "File shows good technical compatibility with the declared origin"
            }
            StatusTier::PartiallyCompatible => {
                "Some incompatibilities detected - complementary analysis recommended"
            }
            StatusTier::Incompatible => {
                "Serious incompatibilities detected - declared origin is questionable"
            }
        }
    }
}

impl fmt::Display for StatusTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Free-tier compatibility report. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityReport {
    score: u8,
    status_tier: StatusTier,
    incompatibilities: Vec<String>,
    observations: Vec<String>,
    recommendation: String,
    digest: DigestResult,
    declared_origin: OriginTag,
    file_summary: FileSummary,
}

impl CompatibilityReport {
    pub fn new(
        score: u8,
        status_tier: StatusTier,
        incompatibilities: Vec<String>,
        observations: Vec<String>,
        digest: DigestResult,
        declared_origin: OriginTag,
        file_summary: FileSummary,
    ) -> Self {
        Self {
            score: score.min(100),
            status_tier,
            incompatibilities,
            observations,
            recommendation: status_tier.recommendation().to_string(),
            digest,
            declared_origin,
            file_summary,
        }
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn status_tier(&self) -> StatusTier {
        self.status_tier
    }

    pub fn incompatibilities(&self) -> &[String] {
        &self.incompatibilities
    }

    pub fn observations(&self) -> &[String] {
        &self.observations
    }

    pub fn recommendation(&self) -> &str {
        &self.recommendation
    }

    pub fn digest(&self) -> &DigestResult {
        &self.digest
    }

    pub fn declared_origin(&self) -> OriginTag {
        self.declared_origin
    }

    pub fn file_summary(&self) -> &FileSummary {
        &self.file_summary
    }

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
