//! Origin-specific classifier rules.
//!
//! Exactly one branch runs per analysis, selected by the declared origin.

use super::config::ScoringConfig;
use crate::core::file::FileDescriptor;
use crate::core::origin::OriginTag;

/// Penalties and messages produced by a group of rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Findings {
    pub penalty: u32,
    pub incompatibilities: Vec<String>,
    pub observations: Vec<String>,
}

impl Findings {
    pub fn penalize(&mut self, points: u32, incompatibility: impl Into<String>) {
        self.penalty = self.penalty.saturating_add(points);
        self.incompatibilities.push(incompatibility.into());
    }

    pub fn observe(&mut self, observation: impl Into<String>) {
        self.observations.push(observation.into());
    }

    /// Append another group's findings, preserving order.
    pub fn merge(&mut self, other: Findings) {
        self.penalty = self.penalty.saturating_add(other.penalty);
        self.incompatibilities.extend(other.incompatibilities);
        self.observations.extend(other.observations);
    }
}

/// Apply the rule set for `origin`. `Other` yields no findings.
pub fn apply_origin_rules(
    file: &FileDescriptor,
    origin: OriginTag,
    config: &ScoringConfig,
) -> Findings {
    let mut f = Findings::default();
    let size_mb = file.size_mb();
    let mime = file.mime_type();

    match origin {
        OriginTag::WhatsApp => {
            f.observe("WhatsApp-specific analysis applied");
            let limits = &config.whatsapp;
            if mime.starts_with("image/") {
                if limits.image.exceeded_by(size_mb) {
                    f.penalize(
                        limits.image.penalty,
                        format!("Image too large for WhatsApp (>{}MB)", limits.image.max_mb),
                    );
                } else {
                    f.observe("Image size compatible with WhatsApp");
                }
            } else if mime.starts_with("video/") {
                if limits.video.exceeded_by(size_mb) {
                    f.penalize(
                        limits.video.penalty,
                        format!("Video too large for WhatsApp (>{}MB)", limits.video.max_mb),
                    );
                } else {
                    f.observe("Video size compatible with WhatsApp");
                }
            } else if limits.document.exceeded_by(size_mb) {
                f.penalize(
                    limits.document.penalty,
                    format!(
                        "Document too large for WhatsApp (>{}MB)",
                        limits.document.max_mb
                    ),
                );
            }
        }
        OriginTag::Email => {
            f.observe("Email-specific analysis applied");
            if config.email.exceeded_by(size_mb) {
                f.penalize(
                    config.email.penalty,
                    format!(
                        "File too large for regular email (>{}MB)",
                        config.email.max_mb
                    ),
                );
            } else {
                f.observe("Size compatible with email delivery");
            }
        }
        OriginTag::SocialNetworks => {
            f.observe("Social-network-specific analysis applied");
            if config.social_networks.exceeded_by(size_mb) {
                f.penalize(
                    config.social_networks.penalty,
                    format!(
                        "File too large for social networks (>{}MB)",
                        config.social_networks.max_mb
                    ),
                );
            }
        }
        OriginTag::Other => {}
    }

    f
}
