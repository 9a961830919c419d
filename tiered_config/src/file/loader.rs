//! Runtime loading entrypoints for configuration files.

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value as JsonValue;
use tracing::debug;

use std::path::Path;

use super::parser::parse_config_by_format;
use crate::merge::apply_document;
use crate::{ConfigError, ConfigResult, TieredConfig};

/// A configuration file after decoding.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum FileLayer {
    /// A JSON or YAML mapping, overlaid onto destination structs.
    Document {
        /// File the document was read from.
        path: Utf8PathBuf,
        /// Decoded top-level mapping.
        value: JsonValue,
    },
    /// `KEY=VALUE` entries from a dotenv file.
    ///
    /// These never touch a struct directly; they feed the environment
    /// overlay as fallbacks beneath the real process environment.
    Dotenv {
        /// File the entries were read from.
        path: Utf8PathBuf,
        /// Entries in file order.
        vars: Vec<(String, String)>,
    },
}

impl FileLayer {
    /// Returns the path the layer was read from.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        match self {
            Self::Document { path, .. } | Self::Dotenv { path, .. } => path,
        }
    }

    /// Returns the dotenv entries, or nothing for a structured document.
    #[must_use]
    pub fn env_fallbacks(&self) -> &[(String, String)] {
        match self {
            Self::Document { .. } => &[],
            Self::Dotenv { vars, .. } => vars,
        }
    }

    /// Overlay the layer onto `dest`, overwriting only the fields it names.
    ///
    /// A dotenv layer leaves `dest` unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Decode`] when a value in the document does not
    /// fit its field, or [`ConfigError::Encode`] when `dest` cannot be
    /// serialised.
    pub fn apply<T: TieredConfig>(&self, dest: &mut T) -> ConfigResult<()> {
        match self {
            Self::Document { path, value } => apply_document(dest, value.clone(), |err| {
                ConfigError::decode(path.as_std_path(), err)
            }),
            Self::Dotenv { .. } => Ok(()),
        }
    }
}

/// Load configuration from a file, selecting the parser based on extension.
///
/// Returns `Ok(None)` when the path is empty, does not name a regular file,
/// or names a file holding nothing but whitespace.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
/// use tiered_config::{RootConfig, load_config_file};
///
/// # fn run() -> tiered_config::ConfigResult<()> {
/// let mut config = RootConfig::default();
/// if let Some(layer) = load_config_file(Path::new("app.yaml"))? {
///     layer.apply(&mut config)?;
/// }
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`ConfigError::FileRead`] if the file cannot be read and
/// [`ConfigError::Decode`] if it cannot be parsed.
pub fn load_config_file(path: &Path) -> ConfigResult<Option<FileLayer>> {
    if path.as_os_str().is_empty() {
        return Ok(None);
    }
    if !path.is_file() {
        debug!(path = %path.display(), "configuration file not found");
        return Ok(None);
    }
    let bytes = std::fs::read(path).map_err(|err| ConfigError::file_read(path, err))?;
    let data = String::from_utf8(bytes).map_err(|err| ConfigError::decode(path, err))?;
    if data.trim().is_empty() {
        debug!(path = %path.display(), "configuration file is empty");
        return Ok(None);
    }
    let layer = parse_config_by_format(path, &data)?;
    debug!(path = %path.display(), "loaded configuration file");
    Ok(Some(layer))
}

/// Decode the file at `path` onto `dest`, keeping every field the file does
/// not mention.
///
/// A `None` path, a missing file and an empty file all leave `dest` as it
/// was. Dotenv files contribute nothing here; see [`crate::EnvOverlay`].
///
/// # Errors
///
/// Propagates the errors of [`load_config_file`] and [`FileLayer::apply`].
pub fn load_into<T: TieredConfig>(path: Option<&Path>, dest: &mut T) -> ConfigResult<()> {
    let Some(path) = path else {
        return Ok(());
    };
    match load_config_file(path)? {
        Some(layer) => layer.apply(dest),
        None => Ok(()),
    }
}
