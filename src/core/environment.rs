//! Client environment snapshot and user-agent classifiers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Value recorded when an attribute could not be determined.
pub const NOT_DETECTED: &str = "not detected";

/// Value recorded when a classifier does not recognize the agent.
pub const UNKNOWN: &str = "unknown";

/// Maximum user-agent characters kept in a snapshot.
pub const USER_AGENT_KEEP: usize = 100;

static RE_MOBILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Mobile|Android|iPhone|iPad|iPod|BlackBerry|IEMobile|Opera Mini")
        .expect("valid mobile regex")
});
static RE_TABLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Tablet|iPad|Nexus 7|Nexus 10").expect("valid tablet regex"));
static RE_IOS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"iOS|iPhone|iPad|iPod").expect("valid ios regex"));

/// Device class derived from a user agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceClass {
    Mobile,
    Tablet,
    Desktop,
}

pub fn detect_device(user_agent: &str) -> DeviceClass {
    if RE_MOBILE.is_match(user_agent) {
        DeviceClass::Mobile
    } else if RE_TABLET.is_match(user_agent) {
        DeviceClass::Tablet
    } else {
        DeviceClass::Desktop
    }
}

pub fn detect_browser(user_agent: &str) -> &'static str {
    let has = |needle: &str| user_agent.contains(needle);
    if has("Chrome") && !has("Edg") {
        "Chrome"
    } else if has("Firefox") {
        "Firefox"
    } else if has("Safari") && !has("Chrome") {
        "Safari"
    } else if has("Edg") {
        "Edge"
    } else {
        UNKNOWN
    }
}

/// Operating system from a user agent. Checks run in a fixed order, so an
/// Android agent that also says "Linux" classifies as Linux.
pub fn detect_os(user_agent: &str) -> &'static str {
    if user_agent.contains("Windows") {
        "Windows"
    } else if user_agent.contains("Mac OS") {
        "macOS"
    } else if user_agent.contains("Linux") {
        "Linux"
    } else if user_agent.contains("Android") {
        "Android"
    } else if RE_IOS.is_match(user_agent) {
        "iOS"
    } else {
        UNKNOWN
    }
}

/// Keep the first 100 characters of a user agent, marking truncation.
pub fn truncate_user_agent(user_agent: &str) -> String {
    let mut out: String = user_agent.chars().take(USER_AGENT_KEEP).collect();
    out.push_str("...");
    out
}

/// Client/device attributes stored alongside an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSnapshot {
    pub device: DeviceClass,
    pub browser: String,
    pub operating_system: String,
    pub user_agent: String,
    pub ip: String,
    pub online: bool,
    pub time_zone: String,
    pub timestamp: String,
    pub timestamp_local: String,
    pub long_date: String,
    pub language: String,
    pub platform: String,
    pub cpu_cores: String,
    /// Set when some attributes could not be collected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
