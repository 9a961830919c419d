//! Primary error enum for configuration loading flows.

use std::path::PathBuf;

use thiserror::Error;
use tracing::dispatcher::SetGlobalDefaultError;

/// Result alias used throughout the crate.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading configuration or building a logger.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("failed to read configuration file '{path}': {source}")]
    FileRead {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file could not be decoded.
    ///
    /// Raised for malformed content, for an extension with no decoder, and
    /// for values whose type does not fit the destination field.
    #[error("failed to decode configuration file '{path}': {source}")]
    Decode {
        /// Path of the offending file.
        path: PathBuf,
        /// Parser or deserialiser error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An environment variable could not be converted to its field's type.
    #[error("environment variable '{variable}' has the wrong type: expected {expected}")]
    TypeMismatch {
        /// Full name of the variable, prefix included.
        variable: String,
        /// Description of the expected type.
        expected: String,
    },

    /// The logging section names a level the logger does not know.
    #[error("unknown log level '{level}'")]
    LogLevel {
        /// Level string as configured.
        level: String,
    },

    /// The configured log output could not be opened for writing.
    #[error("failed to open log output '{path}': {source}")]
    LogOutput {
        /// Path of the log file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The configured timestamp format is not a valid strftime string.
    #[error("invalid timestamp format '{format}'")]
    TimestampFormat {
        /// Format string as configured.
        format: String,
    },

    /// A destination value could not be represented as a document.
    #[error("failed to encode configuration: {0}")]
    Encode(#[source] serde_json::Error),

    /// A process-wide logger was already installed.
    #[error("failed to install logger: {0}")]
    InstallLogger(#[from] SetGlobalDefaultError),
}
