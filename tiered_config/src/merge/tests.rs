//! Merge semantics for layered documents.

use rstest::rstest;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;

use super::{apply_document, merge_value};
use crate::{ConfigError, LoggingConfig, RootConfig, TieredConfig};

#[derive(Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
struct Upstream {
    name: String,
    retries: u8,
    labels: BTreeMap<String, String>,
}

impl TieredConfig for Upstream {
    fn replaced_maps() -> &'static [&'static str] {
        &["labels"]
    }
}

#[rstest]
#[case(json!({"a": 1}), json!({"b": 2}), json!({"a": 1, "b": 2}))]
#[case(json!({"a": {"x": 1}}), json!({"a": {"y": 2}}), json!({"a": {"x": 1, "y": 2}}))]
#[case(json!({"a": [1, 2]}), json!({"a": [3]}), json!({"a": [3]}))]
#[case(json!({"a": null}), json!({"a": {"k": true}}), json!({"a": {"k": true}}))]
#[case(json!({"a": "text"}), json!({"a": {"k": 1}}), json!({"a": {"k": 1}}))]
fn merges_objects_and_replaces_leaves(
    #[case] mut target: Value,
    #[case] layer: Value,
    #[case] expected: Value,
) {
    merge_value(&mut target, layer, &[]);
    assert_eq!(target, expected);
}

#[rstest]
fn declared_maps_are_replaced_not_merged() {
    let mut target = json!({"metrics": {"enabled": true, "tags": {"env": "dev", "team": "core"}}});
    merge_value(
        &mut target,
        json!({"metrics": {"tags": {"env": "prod"}}}),
        &["metrics.tags"],
    );
    assert_eq!(target, json!({"metrics": {"enabled": true, "tags": {"env": "prod"}}}));
}

#[rstest]
fn declared_maps_are_replaced_whole() {
    let mut upstream = Upstream {
        labels: BTreeMap::from([(String::from("tier"), String::from("edge"))]),
        ..Upstream::default()
    };
    apply_document(&mut upstream, json!({"labels": {"zone": "b"}}), ConfigError::Encode)
        .expect("merge");
    assert_eq!(
        upstream.labels,
        BTreeMap::from([(String::from("zone"), String::from("b"))])
    );
}

#[rstest]
fn absent_keys_keep_prepopulated_values() {
    let mut log = LoggingConfig {
        quote_empty_fields: true,
        ts_format: String::from("%H:%M"),
        ..LoggingConfig::default()
    };
    apply_document(&mut log, json!({"level": "debug"}), ConfigError::Encode)
        .expect("merge");
    assert_eq!(log.level, "debug");
    assert!(log.quote_empty_fields);
    assert_eq!(log.ts_format, "%H:%M");
}

#[rstest]
fn root_fields_map_is_replaced_wholesale() {
    let mut root = RootConfig::default();
    root.log.fields.insert(String::from("service"), json!("api"));
    apply_document(
        &mut root,
        json!({"log": {"fields": {"region": "eu"}}}),
        ConfigError::Encode,
    )
        .expect("merge");
    assert_eq!(root.log.fields.len(), 1);
    assert_eq!(root.log.fields.get("region"), Some(&json!("eu")));
}

#[rstest]
fn unknown_keys_are_ignored_by_the_target() {
    let mut root = RootConfig::default();
    apply_document(
        &mut root,
        json!({"something": "custom", "metrics": {"port": 8125}}),
        ConfigError::Encode,
    )
        .expect("merge");
    assert_eq!(root.metrics.port, 8125);
}

#[rstest]
fn mistyped_value_leaves_destination_untouched() {
    let mut upstream = Upstream {
        name: String::from("primary"),
        ..Upstream::default()
    };
    let err = apply_document(
        &mut upstream,
        json!({"name": "other", "retries": "many"}),
        |source| ConfigError::type_mismatch("UPSTREAM_RETRIES", source.to_string()),
    )
    .expect_err("string retries should not decode");
    assert!(matches!(err, ConfigError::TypeMismatch { .. }), "got {err:?}");
    assert_eq!(upstream.name, "primary");
}
