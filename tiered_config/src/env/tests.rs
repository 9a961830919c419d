//! Environment overlay behaviour against standard and custom destinations.

use anyhow::{Result, anyhow};
use rstest::{fixture, rstest};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use super::EnvOverlay;
use crate::{ConfigError, RootConfig, TieredConfig};

#[derive(Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
struct Custom {
    something: String,
    other: i32,
    overridden: String,
    limit: Option<u32>,
    label: Option<String>,
}

impl Default for Custom {
    fn default() -> Self {
        Self {
            something: String::from("default"),
            other: 0,
            overridden: String::from("this should change"),
            limit: None,
            label: None,
        }
    }
}

impl TieredConfig for Custom {
    fn replaced_maps() -> &'static [&'static str] {
        &[]
    }
}

#[fixture]
fn root() -> RootConfig {
    RootConfig::default()
}

#[rstest]
fn overrides_custom_fields_and_keeps_the_rest() {
    let overlay = EnvOverlay::from_vars("pf", [("PF_OTHER", "10"), ("PF_OVERRIDDEN", "not-that")]);
    let mut custom = Custom::default();
    overlay.apply(&mut custom).expect("overlay applies");
    assert_eq!(custom.something, "default");
    assert_eq!(custom.other, 10);
    assert_eq!(custom.overridden, "not-that");
}

#[rstest]
fn nested_names_with_underscores_resolve(mut root: RootConfig) {
    let overlay = EnvOverlay::from_vars(
        "PF",
        [
            ("PF_LOG_LEVEL", "debug"),
            ("PF_LOG_QUOTE_EMPTY_FIELDS", "false"),
            ("PF_FEATUREFLAG_REQUEST_TIMEOUT", "10s"),
            ("PF_METRICS_PORT", "8125"),
        ],
    );
    overlay.apply(&mut root).expect("overlay applies");
    assert_eq!(root.log.level, "debug");
    assert!(!root.log.quote_empty_fields);
    assert_eq!(root.feature_flag.request_timeout, Duration::from_secs(10));
    assert_eq!(root.metrics.port, 8125);
}

#[rstest]
fn matching_is_case_insensitive(mut root: RootConfig) {
    let overlay = EnvOverlay::from_vars("Pf_", [("pf_Log_Level", "warn")]);
    overlay.apply(&mut root).expect("overlay applies");
    assert_eq!(root.log.level, "warn");
    assert_eq!(overlay.prefix(), "PF");
}

#[rstest]
#[case::unknown_field("PF_NOT_A_FIELD")]
#[case::prefix_only("PF_")]
#[case::other_prefix("PFX_LOG_LEVEL")]
#[case::map_key("PF_METRICS_TAGS_ENV")]
#[case::absent_section("PF_BUGSNAG_API_KEY")]
#[case::whole_section("PF_LOG")]
#[case::whole_nested_section("PF_FEATUREFLAG")]
fn unresolved_variables_are_ignored(mut root: RootConfig, #[case] name: &str) {
    let overlay = EnvOverlay::from_vars("PF", [(name, "/var/log/app.log")]);
    overlay.apply(&mut root).expect("unknown variables are not errors");
    assert_eq!(root, RootConfig::default());
}

#[rstest]
fn whole_map_can_be_replaced_with_json(mut root: RootConfig) {
    root.metrics.tags.insert(String::from("team"), String::from("core"));
    let overlay = EnvOverlay::from_vars("PF", [("PF_METRICS_TAGS", r#"{"env": "prod"}"#)]);
    overlay.apply(&mut root).expect("overlay applies");
    assert_eq!(root.metrics.tags.len(), 1);
    assert_eq!(root.metrics.tags.get("env").map(String::as_str), Some("prod"));
}

#[rstest]
fn present_section_accepts_nested_overrides(mut root: RootConfig) {
    root.error_reporting = Some(crate::ErrorReportingConfig::default());
    let overlay = EnvOverlay::from_vars("PF", [("PF_BUGSNAG_API_KEY", "secret")]);
    overlay.apply(&mut root).expect("overlay applies");
    let key = root.error_reporting.map(|reporting| reporting.api_key);
    assert_eq!(key.as_deref(), Some("secret"));
}

#[rstest]
fn absent_optional_fields_take_scalars() {
    let overlay = EnvOverlay::from_vars("PF", [("PF_LIMIT", "32"), ("PF_LABEL", "1234")]);
    let mut custom = Custom::default();
    overlay.apply(&mut custom).expect("overlay applies");
    assert_eq!(custom.limit, Some(32));
    assert_eq!(custom.label.as_deref(), Some("1234"));
}

#[rstest]
fn null_text_is_kept_for_optional_strings() {
    let overlay = EnvOverlay::from_vars("PF", [("PF_LABEL", "null")]);
    let mut custom = Custom::default();
    overlay.apply(&mut custom).expect("overlay applies");
    assert_eq!(custom.label.as_deref(), Some("null"));
}

#[rstest]
fn section_names_are_ignored_beside_field_overrides(mut root: RootConfig) {
    let overlay = EnvOverlay::from_vars(
        "PF",
        [("PF_LOG", "/var/log/app.log"), ("PF_LOG_LEVEL", "debug")],
    );
    overlay.apply(&mut root).expect("overlay applies");
    assert_eq!(root.log.level, "debug");
    assert_eq!(root.log.file, None);
}

#[rstest]
#[case("PF_OTHER", "ten", "integer")]
#[case("PF_LIMIT", "-1", "u32")]
fn conversion_failures_name_the_variable(
    #[case] name: &str,
    #[case] value: &str,
    #[case] expected: &str,
) {
    let overlay = EnvOverlay::from_vars("PF", [(name, value)]);
    let mut custom = Custom::default();
    let err = overlay
        .apply(&mut custom)
        .expect_err("conversion should fail");
    let ConfigError::TypeMismatch {
        ref variable,
        expected: ref found,
    } = err
    else {
        panic!("expected TypeMismatch, got {err:?}");
    };
    assert_eq!(variable, name);
    assert!(found.contains(expected), "expected '{expected}' in '{found}'");
    assert_eq!(custom, Custom::default());
}

#[rstest]
fn bad_duration_is_a_type_mismatch(mut root: RootConfig) {
    let overlay = EnvOverlay::from_vars("PF", [("PF_FEATUREFLAG_REQUEST_TIMEOUT", "soon")]);
    let err = overlay.apply(&mut root).expect_err("duration should fail");
    assert!(matches!(err, ConfigError::TypeMismatch { .. }), "got {err:?}");
}

#[rstest]
fn fallbacks_lose_to_captured_values() {
    let overlay = EnvOverlay::from_vars("PF", [("PF_OTHER", "1")])
        .with_fallbacks([("PF_OTHER", "2"), ("PF_OVERRIDDEN", "from-file")]);
    assert_eq!(overlay.get("other"), Some("1"));
    assert_eq!(overlay.get("OVERRIDDEN"), Some("from-file"));
    assert_eq!(overlay.len(), 2);
    assert!(!overlay.is_empty());
    assert!(EnvOverlay::from_vars("PF", [("OTHER_KEY", "1")]).is_empty());
}

#[rstest]
fn process_environment_is_captured_by_prefix() -> Result<()> {
    figment::Jail::try_with(|jail| {
        jail.clear_env();
        jail.set_env("PF_LOG_LEVEL", "error");
        jail.set_env("OTHER_LOG_LEVEL", "trace");
        let overlay = EnvOverlay::from_process("pf");
        let mut root = RootConfig::default();
        overlay
            .apply(&mut root)
            .map_err(|err| figment::Error::from(err.to_string()))?;
        if overlay.len() != 1 || root.log.level != "error" {
            return Err(figment::Error::from(format!(
                "unexpected overlay {overlay:?} -> level {}",
                root.log.level
            )));
        }
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))
}

#[rstest]
fn empty_overlay_is_a_no_op(mut root: RootConfig) {
    root.log.fields.insert(String::from("app"), json!("demo"));
    let before = root.clone();
    EnvOverlay::default().apply(&mut root).expect("no-op");
    assert_eq!(root, before);
}
