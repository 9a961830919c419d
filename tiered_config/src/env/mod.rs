//! Environment-variable overlay.
//!
//! Variables named `<PREFIX>_<FIELD_PATH>` override fields of a destination
//! struct. The field path is resolved against the destination's own
//! serialised field names, so a variable such as
//! `PF_LOG_QUOTE_EMPTY_FIELDS` reaches `log.quote_empty_fields` without any
//! per-field registration. Variables that resolve to no field are ignored.

mod convert;
mod resolve;

use std::collections::BTreeMap;

use figment::providers::Env;
use serde_json::Value;
use tracing::debug;
use uncased::{Uncased, UncasedStr};

use crate::merge::to_document;
use crate::{ConfigError, ConfigResult, TieredConfig, normalize_prefix};

/// Snapshot of the prefixed variables applied after the file layer.
///
/// Keys are stored without the prefix and compared case-insensitively.
///
/// # Examples
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use tiered_config::{EnvOverlay, TieredConfig};
///
/// #[derive(Default, Deserialize, Serialize)]
/// struct Limits {
///     max_conns: u32,
/// }
///
/// impl TieredConfig for Limits {
///     fn replaced_maps() -> &'static [&'static str] {
///         &[]
///     }
/// }
///
/// let overlay = EnvOverlay::from_vars("app", [("APP_MAX_CONNS", "64"), ("HOME", "/root")]);
/// let mut limits = Limits::default();
/// overlay.apply(&mut limits)?;
/// assert_eq!(limits.max_conns, 64);
/// # Ok::<_, tiered_config::ConfigError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct EnvOverlay {
    prefix: String,
    vars: BTreeMap<Uncased<'static>, String>,
}

impl EnvOverlay {
    /// Capture the process environment for `prefix`.
    ///
    /// An empty prefix captures every variable.
    #[must_use]
    pub fn from_process(prefix: &str) -> Self {
        let prefix = normalize_prefix(prefix);
        let env = if prefix.is_empty() {
            Env::raw()
        } else {
            Env::prefixed(&format!("{prefix}_"))
        };
        let vars = env.lowercase(false).iter().collect();
        Self { prefix, vars }
    }

    /// Build an overlay from explicit `(name, value)` pairs, keeping those
    /// that carry `prefix`.
    #[must_use]
    pub fn from_vars<I, K, V>(prefix: &str, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            prefix: normalize_prefix(prefix),
            vars: BTreeMap::new(),
        }
        .with_fallbacks(vars)
    }

    /// Add `(name, value)` pairs that apply only where no variable of the
    /// same name was captured already.
    #[must_use]
    pub fn with_fallbacks<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (name, value) in vars {
            if let Some(key) = self.strip_prefix(name.as_ref()) {
                self.vars
                    .entry(Uncased::from_owned(key.to_owned()))
                    .or_insert_with(|| value.into());
            }
        }
        self
    }

    /// Returns the normalised prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the captured value for `key`, given without the prefix.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(UncasedStr::new(key)).map(String::as_str)
    }

    /// Number of captured variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether no variables were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Override the fields of `dest` named by the captured variables.
    ///
    /// Variables are applied in name order. Each one is checked against `T`
    /// as it is applied, so a failure names the offending variable. On
    /// failure `dest` is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TypeMismatch`] when a value cannot be converted
    /// to its field's type, or [`ConfigError::Encode`] when `dest` cannot be
    /// serialised.
    pub fn apply<T: TieredConfig>(&self, dest: &mut T) -> ConfigResult<()> {
        if self.vars.is_empty() {
            return Ok(());
        }
        let mut tree = to_document(dest)?;
        let mut resolved = None;
        for (key, raw) in &self.vars {
            if let Some(checked) = self.apply_variable::<T>(&mut tree, key.as_str(), raw)? {
                resolved = Some(checked);
            }
        }
        if let Some(value) = resolved {
            *dest = value;
        }
        Ok(())
    }

    /// Apply one variable to `tree`, returning the re-decoded destination or
    /// `None` when the variable names no field.
    fn apply_variable<T: TieredConfig>(
        &self,
        tree: &mut Value,
        key: &str,
        raw: &str,
    ) -> ConfigResult<Option<T>> {
        let replaced = T::replaced_maps();
        let variable = self.variable_name(key);
        let segments: Vec<&str> = key.split('_').collect();
        let Some(path) = resolve::field_path(tree, &segments, replaced) else {
            debug!(variable = %variable, "environment variable matches no field");
            return Ok(None);
        };
        let field = path.join(".");
        let Some(slot) = resolve::lookup_mut(tree, &path) else {
            return Ok(None);
        };
        if slot.is_object() && !replaced.contains(&field.as_str()) {
            debug!(
                variable = %variable,
                field = %field,
                "environment variable names a section"
            );
            return Ok(None);
        }
        let was_null = slot.is_null();
        convert::assign(slot, raw)
            .map_err(|expected| ConfigError::type_mismatch(&variable, expected))?;
        let checked = match serde_json::from_value::<T>(tree.clone()) {
            // An absent optional field guessed the wrong scalar type; try it as text.
            Err(_) if was_null => {
                if let Some(retry) = resolve::lookup_mut(tree, &path) {
                    *retry = Value::String(raw.to_owned());
                }
                serde_json::from_value::<T>(tree.clone())
            }
            other => other,
        }
        .map_err(|err| ConfigError::type_mismatch(&variable, err.to_string()))?;
        debug!(variable = %variable, field = %field, "applied environment override");
        Ok(Some(checked))
    }

    fn strip_prefix<'n>(&self, name: &'n str) -> Option<&'n str> {
        let rest = if self.prefix.is_empty() {
            name
        } else {
            let head = name.get(..self.prefix.len())?;
            if !head.eq_ignore_ascii_case(&self.prefix) {
                return None;
            }
            name.get(self.prefix.len()..)?.strip_prefix('_')?
        };
        Some(rest).filter(|rest| !rest.is_empty())
    }

    fn variable_name(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_owned()
        } else {
            format!("{}_{key}", self.prefix)
        }
    }
}

#[cfg(test)]
mod tests;
