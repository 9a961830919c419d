//! Format-specific parsing utilities for configuration files.

use camino::Utf8PathBuf;
use figment::{
    Figment,
    providers::{Format, Json},
};
use serde_json::Value as JsonValue;

use std::path::Path;

use super::error::{not_a_mapping, unsupported_format};
use super::loader::FileLayer;
use super::yaml::SaphyrYaml;
use crate::{ConfigError, ConfigResult};

/// Parse configuration data according to the file extension.
///
/// # Errors
///
/// Returns [`ConfigError::Decode`] when the extension is not recognised or
/// the contents fail to parse.
pub(super) fn parse_config_by_format(path: &Path, data: &str) -> ConfigResult<FileLayer> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let figment = match ext.as_deref() {
        Some("json") => Figment::from(Json::string(data)),
        Some("yaml" | "yml") => Figment::from(SaphyrYaml::string(path, data)),
        Some("env") => {
            return Ok(FileLayer::Dotenv {
                path: to_utf8_path(path),
                vars: parse_dotenv(path, data)?,
            });
        }
        _ => return Err(unsupported_format(path)),
    };

    let value: JsonValue = figment
        .extract()
        .map_err(|err| ConfigError::decode(path, err))?;
    if !value.is_object() {
        return Err(not_a_mapping(path));
    }
    Ok(FileLayer::Document {
        path: to_utf8_path(path),
        value,
    })
}

fn parse_dotenv(path: &Path, data: &str) -> ConfigResult<Vec<(String, String)>> {
    dotenvy::from_read_iter(data.as_bytes())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| ConfigError::decode(path, err))
}

/// Convert a path to a UTF-8 path, falling back to lossy conversion.
fn to_utf8_path(path: &Path) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(path.to_path_buf())
        .unwrap_or_else(|p| Utf8PathBuf::from(p.to_string_lossy().into_owned()))
}
