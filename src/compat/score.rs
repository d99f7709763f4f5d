//! Compatibility scoring and tier classification.

use super::config::ScoringConfig;
use super::heuristics::apply_integrity_rules;
use super::rules::{apply_origin_rules, Findings};
use super::signals::{apply_signal_checks, RngSignals, SignalSource};
use crate::core::digest::DigestResult;
use crate::core::file::FileDescriptor;
use crate::core::origin::OriginTag;
use crate::core::report::{CompatibilityReport, StatusTier};
use chrono::{DateTime, Local};
use tracing::info;

/// Scoring engine combining origin rules, integrity heuristics and the
/// simulated signal checks into a report.
#[derive(Debug, Clone, Default)]
pub struct ScoreEngine {
    config: ScoringConfig,
}

impl ScoreEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// The deterministic part of scoring: origin rules then integrity rules.
    pub fn base_findings(&self, file: &FileDescriptor, origin: OriginTag) -> Findings {
        let mut findings = apply_origin_rules(file, origin, &self.config);
        findings.merge(apply_integrity_rules(file, &self.config.integrity));
        findings
    }

    /// Score before any simulated signal is applied, clamped to [0, 100].
    pub fn base_score(&self, file: &FileDescriptor, origin: OriginTag) -> u8 {
        let raw = self.raw_score(self.base_findings(file, origin).penalty);
        clamp_score(raw)
    }

    /// Produce the report, stamping the file summary with the current time.
    pub fn score(
        &self,
        file: &FileDescriptor,
        origin: OriginTag,
        digest: DigestResult,
        signals: &mut dyn SignalSource,
    ) -> CompatibilityReport {
        self.score_at(file, origin, digest, signals, Local::now())
    }

    /// Same as [`ScoreEngine::score`] with an explicit analysis time.
    pub fn score_at(
        &self,
        file: &FileDescriptor,
        origin: OriginTag,
        digest: DigestResult,
        signals: &mut dyn SignalSource,
        now: DateTime<Local>,
    ) -> CompatibilityReport {
        let mut findings = self.base_findings(file, origin);
        findings.merge(apply_signal_checks(&self.config.signals, signals));

        let raw = self.raw_score(findings.penalty);
        // Tiers are assigned from the unclamped score.
        let tier = StatusTier::from_score_with(
            raw,
            self.config.tiers.compatible,
            self.config.tiers.partially_compatible,
        );
        let score = clamp_score(raw);

        info!(
            file = %file.name(),
            origin = %origin,
            score,
            tier = %tier,
            penalty = findings.penalty,
            "Compatibility scored"
        );

        CompatibilityReport::new(
            score,
            tier,
            findings.incompatibilities,
            findings.observations,
            digest,
            origin,
            file.summarize(now),
        )
    }

    fn raw_score(&self, penalty: u32) -> i32 {
        let base = i64::from(self.config.base_score);
        let raw = base - i64::from(penalty);
        raw.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }
}

fn clamp_score(raw: i32) -> u8 {
    raw.clamp(0, 100) as u8
}

/// Public API: score with the default configuration and an entropy-seeded
/// signal source.
pub fn score(file: &FileDescriptor, origin: OriginTag, digest: DigestResult) -> CompatibilityReport {
    let engine = ScoreEngine::default();
    let mut signals = RngSignals::from_entropy();
    engine.score(file, origin, digest, &mut signals)
}
