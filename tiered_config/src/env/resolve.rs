//! Mapping underscore-separated variable names onto nested field paths.

use std::cmp::Reverse;

use serde_json::Value;

use crate::merge::child_path;

/// Resolve `segments` to the keys of a field inside `tree`.
///
/// Field names are matched case-insensitively and may themselves contain
/// underscores, so `["LOG", "QUOTE", "EMPTY", "FIELDS"]` resolves to
/// `["log", "quote_empty_fields"]`. Keys made of more segments are tried
/// first. Resolution does not descend into `null` values or into the maps
/// listed in `replaced`.
pub(super) fn field_path(
    tree: &Value,
    segments: &[&str],
    replaced: &[&str],
) -> Option<Vec<String>> {
    resolve_from(tree, segments, "", replaced)
}

fn resolve_from(
    node: &Value,
    segments: &[&str],
    parent: &str,
    replaced: &[&str],
) -> Option<Vec<String>> {
    let Value::Object(map) = node else {
        return None;
    };
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort_by_key(|key| Reverse(key.split('_').count()));

    for key in keys {
        let Some(rest) = strip_key(segments, key) else {
            continue;
        };
        if rest.is_empty() {
            return Some(vec![key.clone()]);
        }
        let path = child_path(parent, key);
        if replaced.contains(&path.as_str()) {
            continue;
        }
        let Some(child) = map.get(key) else {
            continue;
        };
        if let Some(mut tail) = resolve_from(child, rest, &path, replaced) {
            tail.insert(0, key.clone());
            return Some(tail);
        }
    }
    None
}

/// Remove the segments spelling `key` from the front of `segments`.
fn strip_key<'s, 'a>(segments: &'s [&'a str], key: &str) -> Option<&'s [&'a str]> {
    let parts: Vec<&str> = key.split('_').collect();
    if parts.len() > segments.len() {
        return None;
    }
    let (head, rest) = segments.split_at(parts.len());
    head.iter()
        .zip(&parts)
        .all(|(segment, part)| segment.eq_ignore_ascii_case(part))
        .then_some(rest)
}

/// Borrow the value at `path` mutably.
pub(super) fn lookup_mut<'v>(tree: &'v mut Value, path: &[String]) -> Option<&'v mut Value> {
    path.iter()
        .try_fold(tree, |node, key| node.get_mut(key.as_str()))
}
