//! Environment snapshot collection.
//!
//! Gathers client attributes stored alongside each analysis. Nothing here can
//! fail the pipeline: the IP lookup is bounded by a timeout and any failure
//! is recorded as "not detected".

use crate::core::environment::{
    detect_browser, detect_device, detect_os, truncate_user_agent, EnvironmentSnapshot,
    NOT_DETECTED, UNKNOWN,
};
use crate::core::file::LOCAL_TIMESTAMP_FORMAT;
use crate::remote::NetworkInfoProvider;
use crate::timeout::{with_timeout, TimeoutConfig, DEFAULT_LOOKUP_TIMEOUT_SECONDS};
use chrono::{DateTime, Local, SecondsFormat};
use std::sync::Arc;
use tracing::{debug, warn};

/// Native agent string used when no user agent is configured.
pub fn native_user_agent() -> String {
    format!(
        "forensizer/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Language from the usual locale variables, without encoding suffix.
fn detect_language() -> String {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .map(|v| v.split('.').next().unwrap_or_default().replace('_', "-"))
        .find(|v| !v.is_empty() && v != "C" && v != "POSIX")
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn detect_cpu_cores() -> String {
    std::thread::available_parallelism()
        .map(|n| n.get().to_string())
        .unwrap_or_else(|_| NOT_DETECTED.to_string())
}

/// Collects [`EnvironmentSnapshot`]s.
#[derive(Clone)]
pub struct EnvironmentCollector {
    network: Arc<dyn NetworkInfoProvider>,
    user_agent: Option<String>,
    lookup_timeout_ms: u64,
}

impl std::fmt::Debug for EnvironmentCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvironmentCollector")
            .field("user_agent", &self.user_agent)
            .field("lookup_timeout_ms", &self.lookup_timeout_ms)
            .finish_non_exhaustive()
    }
}

impl EnvironmentCollector {
    pub fn new(network: Arc<dyn NetworkInfoProvider>) -> Self {
        Self {
            network,
            user_agent: None,
            lookup_timeout_ms: DEFAULT_LOOKUP_TIMEOUT_SECONDS * 1000,
        }
    }

    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn with_lookup_timeout_ms(mut self, millis: u64) -> Self {
        self.lookup_timeout_ms = millis;
        self
    }

    /// Public IP, or "not detected" on any failure.
    pub async fn lookup_ip(&self) -> Option<String> {
        let config = TimeoutConfig::from_millis(self.lookup_timeout_ms, "public_ip_lookup");
        match with_timeout(config, self.network.public_ip()).await {
            Ok(ip) if !ip.trim().is_empty() => Some(ip.trim().to_string()),
            Ok(_) => {
                warn!("IP lookup returned an empty address");
                None
            }
            Err(e) => {
                warn!(error = %e, "IP lookup failed");
                None
            }
        }
    }

    pub async fn collect(&self) -> EnvironmentSnapshot {
        self.collect_at(Local::now()).await
    }

    /// Collect a snapshot stamped with `now`.
    pub async fn collect_at(&self, now: DateTime<Local>) -> EnvironmentSnapshot {
        let user_agent = self.user_agent.clone().unwrap_or_else(native_user_agent);
        let ip = self.lookup_ip().await;
        let online = ip.is_some();

        let snapshot = EnvironmentSnapshot {
            device: detect_device(&user_agent),
            browser: detect_browser(&user_agent).to_string(),
            operating_system: detect_os(&user_agent).to_string(),
            user_agent: truncate_user_agent(&user_agent),
            ip: ip.unwrap_or_else(|| NOT_DETECTED.to_string()),
            online,
            time_zone: now.format("UTC%:z").to_string(),
            timestamp: now
                .with_timezone(&chrono::Utc)
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            timestamp_local: now.format(LOCAL_TIMESTAMP_FORMAT).to_string(),
            long_date: now.format("%A, %e %B %Y").to_string(),
            language: detect_language(),
            platform: format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH),
            cpu_cores: detect_cpu_cores(),
            error: (!online).then(|| "Some data could not be collected".to_string()),
        };
        debug!(device = ?snapshot.device, os = %snapshot.operating_system, online, "Environment collected");
        snapshot
    }
}
