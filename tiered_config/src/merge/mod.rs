//! Overlaying decoded documents onto pre-populated configuration values.
//!
//! Destinations are serialised to a [`serde_json::Value`] tree, the layer is
//! overlaid onto that tree, and the result is deserialised back. Keys absent
//! from the layer therefore keep whatever the destination held, which is
//! what makes `defaults < file < environment` work without a per-type merge
//! implementation.

use serde_json::{Map, Value};

use crate::{ConfigError, ConfigResult, TieredConfig};

/// Overlay `layer` onto `target`, updating `target` in place.
///
/// Behaviour:
/// - When merging an object into a non-object target, target is replaced by
///   an empty object first.
/// - Objects are merged recursively, except at the dotted paths listed in
///   `replaced`, where the layer's value replaces the target wholesale.
/// - Arrays and scalars replace `target` (no deep merge for arrays).
///
/// # Examples
///
/// ```rust
/// use tiered_config::merge::merge_value;
/// use serde_json::json;
///
/// let mut acc = json!({"log": {"level": "info", "fields": {"a": 1}}});
/// merge_value(
///     &mut acc,
///     json!({"log": {"fields": {"b": 2}}}),
///     &["log.fields"],
/// );
/// assert_eq!(acc, json!({"log": {"level": "info", "fields": {"b": 2}}}));
/// ```
pub fn merge_value(target: &mut Value, layer: Value, replaced: &[&str]) {
    merge_at(target, layer, "", replaced);
}

fn merge_at(target: &mut Value, layer: Value, path: &str, replaced: &[&str]) {
    match layer {
        Value::Object(map) if !replaced.contains(&path) => {
            merge_object(target, map, path, replaced);
        }
        _ => *target = layer,
    }
}

fn merge_object(target: &mut Value, map: Map<String, Value>, path: &str, replaced: &[&str]) {
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }

    let Some(target_map) = target.as_object_mut() else {
        return;
    };

    for (key, value) in map {
        let child = child_path(path, &key);
        match target_map.get_mut(&key) {
            Some(existing) => merge_at(existing, value, &child, replaced),
            None => {
                target_map.insert(key, value);
            }
        }
    }
}

/// Join a dotted field path with one more key.
pub(crate) fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_owned()
    } else {
        format!("{parent}.{key}")
    }
}

/// Serialise `value` into the tree the merge and overlay steps operate on.
///
/// # Errors
///
/// Returns [`ConfigError::Encode`] when the value has no JSON representation,
/// for example a map with non-string keys.
pub fn to_document<T: TieredConfig>(value: &T) -> ConfigResult<Value> {
    serde_json::to_value(value).map_err(ConfigError::Encode)
}

/// Overlay `layer` onto `dest`, keeping every field the layer does not name.
///
/// `on_mismatch` turns a failure to decode the merged tree back into `T`
/// into an error carrying the caller's context (a file path or a variable
/// name). On failure `dest` is left untouched.
///
/// # Errors
///
/// Returns [`ConfigError::Encode`] when `dest` cannot be serialised, or the
/// error produced by `on_mismatch` when the merged tree no longer fits `T`.
pub fn apply_document<T, F>(dest: &mut T, layer: Value, on_mismatch: F) -> ConfigResult<()>
where
    T: TieredConfig,
    F: FnOnce(serde_json::Error) -> ConfigError,
{
    let mut tree = to_document(dest)?;
    merge_value(&mut tree, layer, T::replaced_maps());
    *dest = serde_json::from_value(tree).map_err(on_mismatch)?;
    Ok(())
}

#[cfg(test)]
mod tests;
