//! Building a structured logger from the resolved logging section.

mod format;

use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::format::{Item, StrftimeItems};
use tracing::{Dispatch, Level};
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::{ConfigError, ConfigResult, LoggingConfig};

use format::EventFormat;

/// Line format produced by a [`Logger`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum LogFormat {
    /// `key=value` text, one event per line.
    Text,
    /// One JSON object per line.
    Json,
}

/// A configured `tracing` dispatcher together with the settings it was
/// built from.
///
/// The logger is not installed anywhere on construction. Call
/// [`Logger::install`] to make it the process-wide default, or
/// [`Logger::with_default`] to use it for a scope.
#[derive(Clone, Debug)]
pub struct Logger {
    dispatch: Dispatch,
    level: Level,
    format: LogFormat,
    quote_empty_fields: bool,
    colors: bool,
    output: Option<PathBuf>,
}

impl Logger {
    /// Build a logger from `config`.
    ///
    /// When `config.file` is set the file is opened for appending (and
    /// created if needed); the handle stays open for as long as any clone
    /// of the logger's dispatcher is alive.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::LogLevel`] for an unknown level name,
    /// [`ConfigError::TimestampFormat`] for an invalid `ts_format`, and
    /// [`ConfigError::LogOutput`] when the log file cannot be opened.
    pub fn from_config(config: &LoggingConfig) -> ConfigResult<Self> {
        let level = parse_level(&config.level)?;
        validate_timestamp_format(&config.ts_format)?;
        match config.file.as_deref().filter(|path| !path.as_os_str().is_empty()) {
            Some(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|source| ConfigError::LogOutput {
                        path: path.to_path_buf(),
                        source,
                    })?;
                Ok(Self::build(
                    config,
                    level,
                    BoxMakeWriter::new(Mutex::new(file)),
                    false,
                    Some(path.to_path_buf()),
                ))
            }
            None => {
                let colors = !config.disable_colors && std::io::stdout().is_terminal();
                Ok(Self::build(
                    config,
                    level,
                    BoxMakeWriter::new(std::io::stdout),
                    colors,
                    None,
                ))
            }
        }
    }

    fn build(
        config: &LoggingConfig,
        level: Level,
        writer: BoxMakeWriter,
        colors: bool,
        output: Option<PathBuf>,
    ) -> Self {
        let format = if config.use_new_logger {
            LogFormat::Json
        } else {
            LogFormat::Text
        };
        let event_format = EventFormat::new(format, config);
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(colors)
            .with_writer(writer)
            .event_format(event_format)
            .finish();
        Self {
            dispatch: Dispatch::new(subscriber),
            level,
            format,
            quote_empty_fields: config.quote_empty_fields,
            colors,
            output,
        }
    }

    /// Most verbose level this logger emits.
    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }

    /// Line format in use.
    #[must_use]
    pub const fn format(&self) -> LogFormat {
        self.format
    }

    /// Whether empty values are rendered as `""`.
    #[must_use]
    pub const fn quote_empty_fields(&self) -> bool {
        self.quote_empty_fields
    }

    /// Whether the level is coloured with ANSI escapes.
    #[must_use]
    pub const fn colors(&self) -> bool {
        self.colors
    }

    /// Log file, or `None` when writing to standard output.
    #[must_use]
    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    /// The underlying dispatcher.
    #[must_use]
    pub const fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Run `f` with this logger as the thread's default.
    pub fn with_default<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Install this logger as the process-wide default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InstallLogger`] if a global default has
    /// already been set.
    pub fn install(&self) -> ConfigResult<()> {
        tracing::dispatcher::set_global_default(self.dispatch.clone())?;
        Ok(())
    }
}

/// Parse a level name. `warning` is accepted for `warn`, and `fatal` and
/// `panic` collapse to `error`.
fn parse_level(name: &str) -> ConfigResult<Level> {
    match name.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" | "fatal" | "panic" => Ok(Level::ERROR),
        _ => Err(ConfigError::LogLevel {
            level: name.to_owned(),
        }),
    }
}

fn validate_timestamp_format(pattern: &str) -> ConfigResult<()> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(ConfigError::TimestampFormat {
            format: pattern.to_owned(),
        });
    }
    Ok(())
}
