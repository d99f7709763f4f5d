//! Application configuration.
//!
//! Nested serde structs with production defaults, one per concern. A JSON
//! file may override any subset of fields, and a handful of environment
//! variables override the remote endpoints last.

use crate::compat::config::ScoringConfig;
use crate::error::{ForensizerError, Result};
use crate::io::IOLimits;
use crate::timeout::DEFAULT_LOOKUP_TIMEOUT_SECONDS;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Default IP-echo service.
pub const DEFAULT_IP_LOOKUP_URL: &str = "https://api.ipify.org?format=json";

/// Default paid-tier checkout prefix; the `FORENSIZER-<id>` reference is appended.
pub const DEFAULT_CHECKOUT_URL_BASE: &str =
    "https://www.mercadopago.com.br/checkout/v1/redirect?preference-id=";

pub const ENV_SUBMIT_URL: &str = "FORENSIZER_SUBMIT_URL";
pub const ENV_IP_LOOKUP_URL: &str = "FORENSIZER_IP_LOOKUP_URL";
pub const ENV_CHECKOUT_URL: &str = "FORENSIZER_CHECKOUT_URL";
pub const ENV_USER_AGENT: &str = "FORENSIZER_USER_AGENT";

/// Master configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForensizerConfig {
    pub remote: RemoteConfig,
    pub scoring: ScoringConfig,
    pub io: IOLimits,
}

/// Remote endpoints and lookup behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Logging endpoint. Records are not submitted when unset.
    pub submit_url: Option<String>,
    pub ip_lookup_url: String,
    pub checkout_url_base: String,
    /// Upper bound on the IP lookup, in milliseconds.
    pub lookup_timeout_ms: u64,
    /// User agent recorded in environment snapshots; a native agent string
    /// is used when unset.
    pub user_agent: Option<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            submit_url: None,
            ip_lookup_url: DEFAULT_IP_LOOKUP_URL.to_string(),
            checkout_url_base: DEFAULT_CHECKOUT_URL_BASE.to_string(),
            lookup_timeout_ms: DEFAULT_LOOKUP_TIMEOUT_SECONDS * 1000,
            user_agent: None,
        }
    }
}

impl ForensizerConfig {
    /// Parse a JSON configuration; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            ForensizerError::Serialization(format!("invalid configuration: {}", e))
        })?;
        config
            .scoring
            .validate()
            .map_err(|e| ForensizerError::InvalidInput(format!("invalid configuration: {}", e)))?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "Loaded configuration file");
        Self::from_json_str(&raw)
    }

    /// Defaults or the given file, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(p) => Self::from_json_file(p)?,
            None => Self::default(),
        };
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Apply overrides from a key lookup (normally the process environment).
    /// Blank values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = get(ENV_SUBMIT_URL) {
            self.remote.submit_url = Some(v);
        }
        if let Some(v) = get(ENV_IP_LOOKUP_URL) {
            self.remote.ip_lookup_url = v;
        }
        if let Some(v) = get(ENV_CHECKOUT_URL) {
            self.remote.checkout_url_base = v;
        }
        if let Some(v) = get(ENV_USER_AGENT) {
            self.remote.user_agent = Some(v);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn defaults() {
        let c = ForensizerConfig::default();
        assert!(c.remote.submit_url.is_none());
        assert_eq!(c.remote.ip_lookup_url, DEFAULT_IP_LOOKUP_URL);
        assert_eq!(c.remote.lookup_timeout_ms, 5_000);
        assert_eq!(c.scoring.base_score, 100);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let c = ForensizerConfig::from_json_str(
            r#"{"remote": {"submit_url": "https://logs.example/exec"}, "io": {"max_file_size": 10}}"#,
        )
        .unwrap();
        assert_eq!(c.remote.submit_url.as_deref(), Some("https://logs.example/exec"));
        assert_eq!(c.remote.checkout_url_base, DEFAULT_CHECKOUT_URL_BASE);
        assert_eq!(c.io.max_file_size, 10);
        assert_eq!(c.io.chunk_size, IOLimits::default().chunk_size);
    }

    #[test]
    fn single_size_rule_field_can_be_overridden() {
        let c = ForensizerConfig::from_json_str(r#"{"scoring": {"email": {"max_mb": 30}}}"#)
            .unwrap();
        assert_eq!(c.scoring.email.max_mb, 30.0);
        assert_eq!(c.scoring.email.penalty, 30);
    }

    #[test]
    fn base_score_above_maximum_is_rejected() {
        let err = ForensizerConfig::from_json_str(r#"{"scoring": {"base_score": 150}}"#)
            .unwrap_err();
        assert!(matches!(err, ForensizerError::InvalidInput(_)));
    }

    #[test]
    fn invalid_json_is_serialization_error() {
        let err = ForensizerConfig::from_json_str("{").unwrap_err();
        assert!(matches!(err, ForensizerError::Serialization(_)));
    }

    #[test]
    fn overrides_replace_remote_fields() {
        let env: HashMap<&str, &str> = [
            (ENV_SUBMIT_URL, "https://submit.example"),
            (ENV_IP_LOOKUP_URL, "  "),
            (ENV_USER_AGENT, "TestAgent/1.0"),
        ]
        .into_iter()
        .collect();
        let c = ForensizerConfig::default()
            .with_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(c.remote.submit_url.as_deref(), Some("https://submit.example"));
        assert_eq!(c.remote.ip_lookup_url, DEFAULT_IP_LOOKUP_URL);
        assert_eq!(c.remote.user_agent.as_deref(), Some("TestAgent/1.0"));
    }

    #[test]
    fn load_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(br#"{"scoring": {"base_score": 90}}"#).unwrap();
        let c = ForensizerConfig::from_json_file(f.path()).unwrap();
        assert_eq!(c.scoring.base_score, 90);
    }
}
