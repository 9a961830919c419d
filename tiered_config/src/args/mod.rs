//! Command-line arguments shared by every program and the setup sequence
//! that turns them into resolved configuration and a logger.

use std::path::{Path, PathBuf};

use clap::Args;
use clap::builder::{NonEmptyStringValueParser, TypedValueParser};
use tracing::debug;

use crate::file::load_config_file;
use crate::{ConfigResult, EnvOverlay, Logger, RootConfig, TieredConfig, normalize_prefix};

/// Where configuration comes from.
///
/// Flatten into a `clap::Parser` to expose `--config` and `--prefix`, or
/// build one directly.
#[derive(Args, Clone, Debug, Default, Eq, PartialEq)]
pub struct RootArgs {
    /// Configuration file to load (`.json`, `.yaml`, `.yml` or `.env`).
    #[arg(long = "config", value_name = "PATH")]
    pub config_file: Option<PathBuf>,
    /// Prefix of the environment variables that override configuration.
    #[arg(
        long,
        value_name = "PREFIX",
        value_parser = NonEmptyStringValueParser::new().map(|raw| normalize_prefix(&raw))
    )]
    pub prefix: Option<String>,
}

/// Resolved standard configuration and the logger built from it.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct Configured {
    /// The standard sections after every layer was applied.
    pub config: RootConfig,
    /// Logger described by `config.log`.
    pub logger: Logger,
}

impl RootArgs {
    /// The prefix to use, falling back to `default` when none was given.
    #[must_use]
    pub fn resolved_prefix(&self, default: &str) -> String {
        normalize_prefix(self.prefix.as_deref().unwrap_or(default))
    }

    /// The config file to load, falling back to `default` when none was
    /// given. An empty path counts as none.
    #[must_use]
    pub fn resolved_config_file<'a>(&'a self, default: Option<&'a Path>) -> Option<&'a Path> {
        self.config_file
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
            .or(default)
            .filter(|path| !path.as_os_str().is_empty())
    }

    /// Resolve the standard sections, then overlay `custom` from the same
    /// sources and build the logger.
    ///
    /// Layers apply in order: defaults, then the config file, then
    /// environment variables. Both `RootConfig` and `custom` see the same
    /// file and the same variables; keys unknown to one of them are
    /// ignored by it. Each layer is applied to `custom` as a whole or not at
    /// all, but an error in a later step leaves earlier layers in place.
    ///
    /// # Errors
    ///
    /// Returns the first failure among reading or decoding the file,
    /// converting an environment variable, and building the logger.
    pub fn setup<T: TieredConfig>(
        &self,
        custom: &mut T,
        default_prefix: &str,
        default_config_file: Option<&Path>,
    ) -> ConfigResult<Configured> {
        let prefix = self.resolved_prefix(default_prefix);
        let config_file = self.resolved_config_file(default_config_file);
        debug!(prefix = %prefix, config_file = ?config_file, "resolving configuration");

        let mut config = RootConfig::default();

        let layer = match config_file {
            Some(path) => load_config_file(path)?,
            None => None,
        };
        if let Some(file) = &layer {
            file.apply(&mut config)?;
            file.apply(custom)?;
            debug!(path = %file.path(), "applied configuration file");
        }

        let fallbacks = layer
            .iter()
            .flat_map(|file| file.env_fallbacks())
            .map(|(name, value)| (name.as_str(), value.as_str()));
        let overlay = EnvOverlay::from_process(&prefix).with_fallbacks(fallbacks);
        overlay.apply(&mut config)?;
        overlay.apply(custom)?;
        debug!(variables = overlay.len(), "applied environment overlay");

        let logger = Logger::from_config(&config.log)?;
        Ok(Configured { config, logger })
    }
}
