//! YAML provider support backed by `serde-saphyr`.

use figment::{
    Metadata, Profile, Provider,
    error::Kind,
    value::{Dict, Value as FigmentValue},
};
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Number, Value as JsonValue};
use serde_saphyr::Options;

use std::fmt;
use std::path::PathBuf;

/// Figment provider that reads in-memory YAML using `serde-saphyr`.
///
/// Booleans follow YAML 1.2, so `yes` and `on` stay strings. Plain `~`,
/// `null` and empty values are nulls, matching JSON `null`. A document
/// holding only comments or `null` yields an empty mapping.
#[derive(Debug, Clone)]
pub struct SaphyrYaml {
    path: PathBuf,
    contents: String,
}

impl SaphyrYaml {
    /// Construct a provider from YAML text; `path` is used for diagnostics.
    #[must_use]
    pub fn string<P, S>(path: P, contents: S) -> Self
    where
        P: Into<PathBuf>,
        S: Into<String>,
    {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }

    /// Parse YAML contents with strict boolean semantics.
    fn parse_value(contents: &str) -> Result<JsonValue, serde_saphyr::Error> {
        serde_saphyr::from_str_with_options::<YamlNode>(
            contents,
            Options {
                strict_booleans: true,
                ..Options::default()
            },
        )
        .map(|node| node.0)
    }
}

/// A YAML node decoded as JSON.
///
/// Every node is first requested as an option so the parser reports null
/// scalars as absent instead of handing back their text.
struct YamlNode(JsonValue);

impl<'de> Deserialize<'de> for YamlNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_option(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = YamlNode;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a YAML value")
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(YamlNode(JsonValue::Null))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(YamlNode(JsonValue::Null))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
        Ok(YamlNode(JsonValue::Bool(value)))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(YamlNode(JsonValue::from(value)))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(YamlNode(JsonValue::from(value)))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        Number::from_f64(value)
            .map(|number| YamlNode(JsonValue::Number(number)))
            .ok_or_else(|| E::custom(format!("{value} has no JSON representation")))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(YamlNode(JsonValue::String(value.to_owned())))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(YamlNode(JsonValue::String(value)))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut items = Vec::new();
        while let Some(YamlNode(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(YamlNode(JsonValue::Array(items)))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = Map::new();
        while let Some((key, YamlNode(value))) = map.next_entry::<String, YamlNode>()? {
            entries.insert(key, value);
        }
        Ok(YamlNode(JsonValue::Object(entries)))
    }
}

impl Provider for SaphyrYaml {
    fn metadata(&self) -> Metadata {
        Metadata::from("Saphyr YAML", self.path.as_path())
    }

    fn data(&self) -> Result<std::collections::BTreeMap<Profile, Dict>, figment::Error> {
        let value = Self::parse_value(&self.contents).map_err(|err| {
            figment::Error::from(Kind::Message(format!(
                "failed to parse {}: {err}",
                self.path.display()
            )))
        })?;
        if value.is_null() {
            return Ok(Profile::Default.collect(Dict::new()));
        }
        let converted = FigmentValue::serialize(&value)?;
        let actual = converted.to_actual();
        let dict = converted
            .into_dict()
            .ok_or_else(|| figment::Error::from(Kind::InvalidType(actual, "map".into())))?;
        Ok(Profile::Default.collect(dict))
    }
}
