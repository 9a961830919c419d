//! Error constructors shared by file loading helpers.

use crate::ConfigError;

use std::path::Path;

/// Construct a [`ConfigError::Decode`] for a file whose extension has no
/// decoder.
pub(super) fn unsupported_format(path: &Path) -> ConfigError {
    let ext = path
        .extension()
        .map_or_else(String::new, |ext| ext.to_string_lossy().into_owned());
    let message = if ext.is_empty() {
        String::from("configuration files need a .json, .yaml, .yml or .env extension")
    } else {
        format!("unsupported configuration format '.{ext}': expected .json, .yaml, .yml or .env")
    };
    ConfigError::decode(path, std::io::Error::other(message))
}

/// Construct a [`ConfigError::Decode`] for a document that is not a mapping.
pub(super) fn not_a_mapping(path: &Path) -> ConfigError {
    ConfigError::decode(
        path,
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "top-level configuration document must be a mapping",
        ),
    )
}
