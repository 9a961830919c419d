//! Layered configuration loading for command-line programs.
//!
//! A program describes its settings as plain `serde` structs. At startup,
//! [`RootArgs::setup`] resolves them from three sources in a fixed order:
//!
//! 1. the struct's own defaults,
//! 2. an optional JSON, YAML or dotenv configuration file, and
//! 3. environment variables named `<PREFIX>_<FIELD_PATH>`.
//!
//! Later sources only overwrite the fields they mention. The resolved
//! [`LoggingConfig`] is then turned into a [`Logger`], a `tracing`
//! dispatcher the caller installs or scopes as it sees fit.
//!
//! ```rust,no_run
//! use serde::{Deserialize, Serialize};
//! use tiered_config::{ConfigResult, RootArgs, TieredConfig};
//!
//! #[derive(Debug, Default, Deserialize, Serialize)]
//! struct AppConfig {
//!     workers: u16,
//! }
//!
//! impl TieredConfig for AppConfig {
//!     fn replaced_maps() -> &'static [&'static str] {
//!         &[]
//!     }
//! }
//!
//! # fn main() -> ConfigResult<()> {
//! let args = RootArgs::default();
//! let mut app = AppConfig { workers: 4 };
//! let configured = args.setup(&mut app, "app", None)?;
//! configured.logger.with_default(|| tracing::info!(workers = app.workers, "ready"));
//! # Ok(())
//! # }
//! ```

mod args;
mod env;
mod error;
pub mod file;
mod logging;
pub mod merge;
mod sections;

pub use args::{Configured, RootArgs};
pub use env::EnvOverlay;
pub use error::{ConfigError, ConfigResult};
pub use file::{FileLayer, load_config_file, load_into};
pub use logging::{LogFormat, Logger};
pub use sections::{
    ErrorReportingConfig, FeatureFlagConfig, LoggingConfig, MetricsConfig, RootConfig,
    TracingConfig,
};

use serde::{Serialize, de::DeserializeOwned};

/// Normalize an environment prefix by trimming trailing underscores and
/// converting to uppercase ASCII.
///
/// # Examples
///
/// ```
/// assert_eq!(tiered_config::normalize_prefix("pf_"), "PF");
/// assert_eq!(tiered_config::normalize_prefix("My_App"), "MY_APP");
/// ```
#[must_use]
pub fn normalize_prefix(prefix: &str) -> String {
    prefix.trim().trim_end_matches('_').to_ascii_uppercase()
}

/// Trait implemented by every struct that can be resolved from layers.
///
/// Any `serde` round-trippable struct qualifies. Each implementation states
/// which of its fields hold free-form maps, since a serialised map and a
/// nested struct look the same once encoded. A layer that names a listed
/// field replaces the whole map, while every other nested object is merged
/// key by key.
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use std::collections::BTreeMap;
/// use tiered_config::TieredConfig;
///
/// #[derive(Default, Deserialize, Serialize)]
/// struct Upstreams {
///     retries: u8,
///     hosts: BTreeMap<String, String>,
/// }
///
/// impl TieredConfig for Upstreams {
///     fn replaced_maps() -> &'static [&'static str] {
///         &["hosts"]
///     }
/// }
/// ```
pub trait TieredConfig: Serialize + DeserializeOwned {
    /// Dotted field paths whose values are maps replaced wholesale.
    ///
    /// Return an empty slice when the type holds no maps.
    #[must_use]
    fn replaced_maps() -> &'static [&'static str];
}
