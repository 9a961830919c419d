//! Standard configuration sections and their defaults.
//!
//! Every section implements [`Default`] with the values documented on its
//! fields, and carries `#[serde(default)]` so a document that mentions only
//! some of its keys still decodes.

mod duration;
mod logging;
mod services;

pub use logging::LoggingConfig;
pub use services::{ErrorReportingConfig, FeatureFlagConfig, MetricsConfig, TracingConfig};

use serde::{Deserialize, Serialize};

use crate::TieredConfig;

/// Top-level configuration shared by every program using this crate.
///
/// Configuration files address the sections by their serialised names:
/// `log`, `bugsnag`, `metrics`, `tracing` and `featureflag`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct RootConfig {
    /// Logging section used to build the [`crate::Logger`].
    pub log: LoggingConfig,
    /// Error reporting; absent until a layer provides it.
    #[serde(rename = "bugsnag")]
    pub error_reporting: Option<ErrorReportingConfig>,
    /// Metrics exporter settings.
    pub metrics: MetricsConfig,
    /// Trace exporter settings.
    pub tracing: TracingConfig,
    /// Feature-flag client settings.
    #[serde(rename = "featureflag")]
    pub feature_flag: FeatureFlagConfig,
}

impl TieredConfig for RootConfig {
    fn replaced_maps() -> &'static [&'static str] {
        &["log.fields", "metrics.tags", "tracing.tags"]
    }
}
