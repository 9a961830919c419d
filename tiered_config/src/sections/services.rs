//! Pass-through sections for downstream integrations.
//!
//! None of these are interpreted here; they are resolved alongside the rest
//! of the configuration and handed to whichever client the program wires up.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Crash and error reporting client settings.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct ErrorReportingConfig {
    /// Project API key.
    pub api_key: String,
    /// Release stage reported with each event.
    pub environment: String,
    /// Package prefix used to mark in-project stack frames.
    pub project_package: String,
    /// Forward error-level log lines to the reporter.
    pub log_hook: bool,
}

/// Metrics exporter settings. Disabled by default.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Whether metrics are exported.
    pub enabled: bool,
    /// Agent host; empty means the client's own default.
    pub host: String,
    /// Agent port; `0` means the client's own default.
    pub port: u16,
    /// Tags attached to every metric.
    pub tags: BTreeMap<String, String>,
}

/// Trace exporter settings. Disabled by default.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct TracingConfig {
    /// Whether traces are exported.
    pub enabled: bool,
    /// Agent host.
    pub host: String,
    /// Agent port, kept as text so named ports survive.
    pub port: String,
    /// Tags attached to every span.
    pub tags: BTreeMap<String, String>,
    /// Verbose exporter diagnostics.
    pub enable_debug: bool,
}

/// Feature-flag client settings.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct FeatureFlagConfig {
    /// SDK key.
    pub key: String,
    /// Whether the client is started at all.
    pub enabled: bool,
    /// Timeout for flag evaluation requests, written as e.g. `"10s"`.
    /// Defaults to five seconds.
    #[serde(with = "super::duration")]
    pub request_timeout: Duration,
    /// Suppress analytics events.
    pub disable_events: bool,
    /// Relay proxy host, if one is used.
    pub relay_host: String,
}

impl Default for FeatureFlagConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            enabled: false,
            request_timeout: Duration::from_secs(5),
            disable_events: false,
            relay_host: String::new(),
        }
    }
}
