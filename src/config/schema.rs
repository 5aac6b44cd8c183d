//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Port implied by an `https://` URL without an explicit port.
pub const DEFAULT_HTTPS_PORT: u16 = 443;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address, scheme handling).
    pub listener: ListenerConfig,

    /// Secure scheme policy.
    pub guard: GuardConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Honour `X-Forwarded-Proto` from an upstream terminator.
    pub trust_forwarded_proto: bool,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            trust_forwarded_proto: false,
        }
    }
}

/// Policy applied to requests that did not arrive over https.
///
/// Accepts both the snake_case field names and the `Force401` /
/// `RedirectToHttpsPath` / `HttpsPortNumber` spellings. Fixed once the
/// guard is built.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Reject insecure requests with 401 instead of redirecting.
    #[serde(alias = "Force401")]
    pub force_401: bool,

    /// Fixed redirect target; empty or whitespace-only counts as unset.
    #[serde(alias = "RedirectToHttpsPath")]
    pub redirect_to_https_path: Option<String>,

    /// Port written into computed redirects (omitted when 443).
    #[serde(alias = "HttpsPortNumber")]
    pub https_port_number: u16,
}

impl GuardConfig {
    /// The fixed redirect target, if one is meaningfully set.
    pub fn fixed_redirect_target(&self) -> Option<&str> {
        self.redirect_to_https_path
            .as_deref()
            .filter(|target| !target.trim().is_empty())
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            force_401: false,
            redirect_to_https_path: None,
            https_port_number: DEFAULT_HTTPS_PORT,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
