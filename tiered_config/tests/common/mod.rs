//! Shared helpers for integration tests that rely on `figment::Jail`.

use std::cell::RefCell;

use anyhow::{Result, anyhow};
use figment::Jail;
use serde::{Deserialize, Serialize};
use tiered_config::TieredConfig;

/// Runs `f` inside a `figment::Jail`, returning any propagated error as an
/// [`anyhow::Result`].
///
/// The jail starts with an empty environment so stray variables on the host
/// cannot leak into the overlay.
///
/// # Errors
///
/// Returns an error when either the inner closure fails or when the jailed
/// execution cannot be initialised.
pub fn with_jail<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut Jail) -> Result<T>,
{
    let output = RefCell::new(None);
    let error: RefCell<Option<anyhow::Error>> = RefCell::new(None);
    Jail::try_with(|j| {
        j.clear_env();
        match f(j) {
            Ok(result) => {
                output.replace(Some(result));
            }
            Err(err) => {
                error.replace(Some(err));
            }
        }
        Ok(())
    })
    .map_err(|err| anyhow!(err))?;

    error.into_inner().map_or_else(
        || {
            output
                .into_inner()
                .ok_or_else(|| anyhow!("jail closure did not produce a result"))
        },
        Err,
    )
}

/// Program-specific settings resolved next to the standard sections.
#[derive(Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub something: String,
    pub other: i32,
    pub overridden: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            something: String::from("default"),
            other: 0,
            overridden: String::from("this should change"),
        }
    }
}

impl TieredConfig for ServiceConfig {
    fn replaced_maps() -> &'static [&'static str] {
        &[]
    }
}
