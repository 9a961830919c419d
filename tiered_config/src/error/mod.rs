//! Error types produced while loading configuration and building loggers.

mod constructors;
mod types;

pub use types::{ConfigError, ConfigResult};
