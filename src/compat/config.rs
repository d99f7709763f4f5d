//! Configuration for the compatibility scoring engine.
//!
//! Every threshold, penalty and probability used by the rules lives here with
//! its production default. Penalties are unsigned: rules can only subtract.

use serde::{Deserialize, Deserializer, Serialize};

pub const WHATSAPP_IMAGE_RULE: SizeRule = SizeRule {
    max_mb: 5.0,
    penalty: 40,
};
pub const WHATSAPP_VIDEO_RULE: SizeRule = SizeRule {
    max_mb: 16.0,
    penalty: 50,
};
pub const WHATSAPP_DOCUMENT_RULE: SizeRule = SizeRule {
    max_mb: 100.0,
    penalty: 25,
};
pub const EMAIL_RULE: SizeRule = SizeRule {
    max_mb: 25.0,
    penalty: 30,
};
pub const SOCIAL_NETWORKS_RULE: SizeRule = SizeRule {
    max_mb: 100.0,
    penalty: 35,
};

/// Highest score an analysis can start from.
pub const MAX_SCORE: u32 = 100;

/// Master configuration for scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Score every analysis starts from; at most [`MAX_SCORE`].
    pub base_score: u32,
    pub whatsapp: WhatsAppLimits,
    #[serde(deserialize_with = "email_rule")]
    pub email: SizeRule,
    #[serde(deserialize_with = "social_networks_rule")]
    pub social_networks: SizeRule,
    pub integrity: IntegrityConfig,
    pub signals: SignalConfig,
    pub tiers: TierThresholds,
}

impl ScoringConfig {
    /// Reject configurations that could lift a score above the maximum or
    /// invert the tier order.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_score > MAX_SCORE {
            return Err(format!(
                "base_score {} exceeds the maximum of {}",
                self.base_score, MAX_SCORE
            ));
        }
        let t = &self.tiers;
        if t.compatible > MAX_SCORE as i32 || t.partially_compatible > t.compatible {
            return Err(format!(
                "tier thresholds must satisfy partially_compatible <= compatible <= {} (got {} / {})",
                MAX_SCORE, t.partially_compatible, t.compatible
            ));
        }
        Ok(())
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_score: MAX_SCORE,
            whatsapp: WhatsAppLimits::default(),
            email: EMAIL_RULE,
            social_networks: SOCIAL_NETWORKS_RULE,
            integrity: IntegrityConfig::default(),
            signals: SignalConfig::default(),
            tiers: TierThresholds::default(),
        }
    }
}

/// A single "larger than N MB costs P points" rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeRule {
    pub max_mb: f64,
    pub penalty: u32,
}

impl SizeRule {
    pub fn exceeded_by(&self, size_mb: f64) -> bool {
        size_mb > self.max_mb
    }
}

/// A size rule as written in a config file; absent fields keep the
/// owning rule's default.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SizeRuleOverride {
    max_mb: Option<f64>,
    penalty: Option<u32>,
}

impl SizeRuleOverride {
    fn over(self, base: SizeRule) -> SizeRule {
        SizeRule {
            max_mb: self.max_mb.unwrap_or(base.max_mb),
            penalty: self.penalty.unwrap_or(base.penalty),
        }
    }
}

fn merged_rule<'de, D>(deserializer: D, base: SizeRule) -> Result<SizeRule, D::Error>
where
    D: Deserializer<'de>,
{
    SizeRuleOverride::deserialize(deserializer).map(|o| o.over(base))
}

fn email_rule<'de, D: Deserializer<'de>>(d: D) -> Result<SizeRule, D::Error> {
    merged_rule(d, EMAIL_RULE)
}

fn social_networks_rule<'de, D: Deserializer<'de>>(d: D) -> Result<SizeRule, D::Error> {
    merged_rule(d, SOCIAL_NETWORKS_RULE)
}

fn whatsapp_image_rule<'de, D: Deserializer<'de>>(d: D) -> Result<SizeRule, D::Error> {
    merged_rule(d, WHATSAPP_IMAGE_RULE)
}

fn whatsapp_video_rule<'de, D: Deserializer<'de>>(d: D) -> Result<SizeRule, D::Error> {
    merged_rule(d, WHATSAPP_VIDEO_RULE)
}

fn whatsapp_document_rule<'de, D: Deserializer<'de>>(d: D) -> Result<SizeRule, D::Error> {
    merged_rule(d, WHATSAPP_DOCUMENT_RULE)
}

/// WhatsApp media limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhatsAppLimits {
    #[serde(deserialize_with = "whatsapp_image_rule")]
    pub image: SizeRule,
    #[serde(deserialize_with = "whatsapp_video_rule")]
    pub video: SizeRule,
    #[serde(deserialize_with = "whatsapp_document_rule")]
    pub document: SizeRule,
}

impl Default for WhatsAppLimits {
    fn default() -> Self {
        Self {
            image: WHATSAPP_IMAGE_RULE,
            video: WHATSAPP_VIDEO_RULE,
            document: WHATSAPP_DOCUMENT_RULE,
        }
    }
}

/// Origin-independent integrity rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrityConfig {
    /// Files strictly smaller than this are suspected corrupt (1 KB).
    pub min_size_mb: f64,
    pub tiny_file_penalty: u32,
    pub missing_mime_penalty: u32,
    pub uncommon_mime_penalty: u32,
    pub common_mime_types: Vec<String>,
}

impl Default for IntegrityConfig {
    fn default() -> Self {
        Self {
            min_size_mb: 0.001,
            tiny_file_penalty: 40,
            missing_mime_penalty: 15,
            uncommon_mime_penalty: 10,
            common_mime_types: [
                "image/jpeg",
                "image/png",
                "image/gif",
                "video/mp4",
                "application/pdf",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Simulated signal checks: each fires independently with its probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    pub metadata_probability: f64,
    pub metadata_penalty: u32,
    pub temporal_probability: f64,
    pub temporal_penalty: u32,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            metadata_probability: 0.3,
            metadata_penalty: 25,
            temporal_probability: 0.2,
            temporal_penalty: 30,
        }
    }
}

/// Lower bounds of the two upper status tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    pub compatible: i32,
    pub partially_compatible: i32,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            compatible: 80,
            partially_compatible: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_published_limits() {
        let c = ScoringConfig::default();
        assert_eq!(c.base_score, 100);
        assert_eq!(c.whatsapp.image.max_mb, 5.0);
        assert_eq!(c.whatsapp.video.penalty, 50);
        assert_eq!(c.email.max_mb, 25.0);
        assert_eq!(c.social_networks.penalty, 35);
        assert_eq!(c.integrity.common_mime_types.len(), 5);
        assert_eq!(c.signals.metadata_probability, 0.3);
        assert_eq!(c.tiers.compatible, 80);
    }

    #[test]
    fn size_rule_is_strictly_greater() {
        let rule = SizeRule {
            max_mb: 5.0,
            penalty: 40,
        };
        assert!(!rule.exceeded_by(5.0));
        assert!(rule.exceeded_by(5.01));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c: ScoringConfig =
            serde_json::from_str(r#"{"signals": {"metadata_probability": 0.0}}"#).unwrap();
        assert_eq!(c.signals.metadata_probability, 0.0);
        assert_eq!(c.signals.temporal_probability, 0.2);
        assert_eq!(c.email.penalty, 30);
    }

    #[test]
    fn size_rule_override_keeps_other_field() {
        let c: ScoringConfig = serde_json::from_str(
            r#"{"email": {"max_mb": 30}, "whatsapp": {"video": {"penalty": 45}}}"#,
        )
        .unwrap();
        assert_eq!(c.email, SizeRule { max_mb: 30.0, penalty: 30 });
        assert_eq!(c.whatsapp.video, SizeRule { max_mb: 16.0, penalty: 45 });
        assert_eq!(c.whatsapp.image, WHATSAPP_IMAGE_RULE);
        assert_eq!(c.social_networks, SOCIAL_NETWORKS_RULE);
    }

    #[test]
    fn validate_rejects_inflated_base_score() {
        let c = ScoringConfig {
            base_score: 101,
            ..ScoringConfig::default()
        };
        assert!(c.validate().is_err());
        assert!(ScoringConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_inverted_tiers() {
        let c = ScoringConfig {
            tiers: TierThresholds {
                compatible: 50,
                partially_compatible: 70,
            },
            ..ScoringConfig::default()
        };
        assert!(c.validate().is_err());
    }
}
