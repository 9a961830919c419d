//! Constructors shared by the file loader and the environment overlay.

use std::error::Error;
use std::path::Path;

use super::ConfigError;

impl ConfigError {
    /// Construct a [`ConfigError::Decode`] for `path`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tiered_config::ConfigError;
    /// use std::path::Path;
    ///
    /// let err = ConfigError::decode(Path::new("app.json"), "expected value");
    /// assert!(matches!(err, ConfigError::Decode { .. }));
    /// assert!(err.to_string().contains("app.json"));
    /// ```
    #[must_use]
    pub fn decode(path: &Path, source: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self::Decode {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }

    /// Construct a [`ConfigError::FileRead`] for `path`.
    #[must_use]
    pub fn file_read(path: &Path, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Construct a [`ConfigError::TypeMismatch`] for `variable`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tiered_config::ConfigError;
    ///
    /// let err = ConfigError::type_mismatch("PF_PORT", "integer");
    /// assert_eq!(
    ///     err.to_string(),
    ///     "environment variable 'PF_PORT' has the wrong type: expected integer"
    /// );
    /// ```
    #[must_use]
    pub fn type_mismatch(variable: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::TypeMismatch {
            variable: variable.into(),
            expected: expected.into(),
        }
    }
}
