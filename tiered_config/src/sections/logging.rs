//! Logging section.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::TieredConfig;

/// Settings consumed by [`crate::Logger::from_config`].
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum level emitted: `trace`, `debug`, `info`, `warn` or `error`.
    /// Defaults to `info`.
    pub level: String,
    /// File receiving log lines, opened for append. Standard output when
    /// unset or empty.
    pub file: Option<PathBuf>,
    /// Disable ANSI colours on terminal output.
    pub disable_colors: bool,
    /// Render empty values as `""` rather than leaving them bare. Defaults
    /// to `true`.
    pub quote_empty_fields: bool,
    /// `strftime` pattern for timestamps; RFC 3339 when empty.
    pub ts_format: String,
    /// Static fields attached to every log line.
    pub fields: BTreeMap<String, Value>,
    /// Emit one JSON object per line instead of `key=value` text.
    pub use_new_logger: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            file: None,
            disable_colors: false,
            quote_empty_fields: true,
            ts_format: String::new(),
            fields: BTreeMap::new(),
            use_new_logger: false,
        }
    }
}

impl TieredConfig for LoggingConfig {
    fn replaced_maps() -> &'static [&'static str] {
        &["fields"]
    }
}
