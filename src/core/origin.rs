//! Declared origin of a file.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Channel through which the user claims the file was transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OriginTag {
    #[serde(rename = "whatsapp")]
    WhatsApp,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "redes_sociais")]
    SocialNetworks,
    #[serde(rename = "other")]
    Other,
}

impl OriginTag {
    /// Wire name, as submitted by the input form.
    pub fn as_str(&self) -> &'static str {
        match self {
            OriginTag::WhatsApp => "whatsapp",
            OriginTag::Email => "email",
            OriginTag::SocialNetworks => "redes_sociais",
            OriginTag::Other => "other",
        }
    }

    /// Human readable channel name.
    pub fn label(&self) -> &'static str {
        match self {
            OriginTag::WhatsApp => "WhatsApp",
            OriginTag::Email => "email",
            OriginTag::SocialNetworks => "social networks",
            OriginTag::Other => "other",
        }
    }

    /// Strict parse of a wire name. `social_networks` is accepted as an
    /// alias of `redes_sociais`.
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "whatsapp" => Some(OriginTag::WhatsApp),
            "email" => Some(OriginTag::Email),
            "redes_sociais" | "social_networks" => Some(OriginTag::SocialNetworks),
            "other" => Some(OriginTag::Other),
            _ => None,
        }
    }

    /// Lenient parse: known wire names map to their variant, anything else
    /// falls back to `Other`.
    pub fn parse_lenient(raw: &str) -> Self {
        Self::from_wire(raw).unwrap_or(OriginTag::Other)
    }
}

impl FromStr for OriginTag {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

impl fmt::Display for OriginTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
