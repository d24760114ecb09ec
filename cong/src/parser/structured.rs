//! Parsers backed by serde-based format crates.
//!
//! Each parser is gated on the cargo feature of the same name and reports a
//! diagnostic naming the feature when it is compiled out.

use super::Parser;
#[cfg(any(feature = "toml", feature = "yaml", feature = "hcl"))]
use super::text;
#[cfg(not(all(feature = "json", feature = "toml", feature = "yaml", feature = "hcl")))]
use super::disabled;
use crate::error::BoxError;
use crate::value::Value;

/// JSON documents via `serde_json`.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonParser;

/// TOML documents via `toml`. Datetimes are read as strings.
#[derive(Clone, Copy, Debug, Default)]
pub struct TomlParser;

/// YAML 1.2 documents via `serde-saphyr`.
///
/// Only `true` and `false` are booleans; YAML 1.1 spellings such as `yes`
/// stay strings.
#[derive(Clone, Copy, Debug, Default)]
pub struct YamlParser;

/// HCL and Terraform variable files via `hcl-rs`.
#[derive(Clone, Copy, Debug, Default)]
pub struct HclParser;

impl Parser for JsonParser {
    #[cfg(feature = "json")]
    fn parse(&self, data: &[u8]) -> Result<Value, BoxError> {
        Ok(serde_json::from_slice(data)?)
    }

    #[cfg(not(feature = "json"))]
    fn parse(&self, _data: &[u8]) -> Result<Value, BoxError> {
        Err(disabled("json"))
    }
}

impl Parser for TomlParser {
    #[cfg(feature = "toml")]
    fn parse(&self, data: &[u8]) -> Result<Value, BoxError> {
        let table: toml::Table = toml::from_str(text(data)?)?;
        Ok(from_toml(toml::Value::Table(table)))
    }

    #[cfg(not(feature = "toml"))]
    fn parse(&self, _data: &[u8]) -> Result<Value, BoxError> {
        Err(disabled("toml"))
    }
}

#[cfg(feature = "toml")]
fn from_toml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::from(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(x) => Value::from(x),
        toml::Value::Boolean(b) => Value::from(b),
        toml::Value::Datetime(dt) => Value::from(dt.to_string()),
        toml::Value::Array(items) => Value::Sequence(items.into_iter().map(from_toml).collect()),
        toml::Value::Table(table) => Value::Mapping(
            table
                .into_iter()
                .map(|(key, item)| (key, from_toml(item)))
                .collect(),
        ),
    }
}

impl Parser for YamlParser {
    #[cfg(feature = "yaml")]
    fn parse(&self, data: &[u8]) -> Result<Value, BoxError> {
        let value = serde_saphyr::from_str_with_options(
            text(data)?,
            serde_saphyr::Options {
                strict_booleans: true,
                ..serde_saphyr::Options::default()
            },
        )?;
        Ok(value)
    }

    #[cfg(not(feature = "yaml"))]
    fn parse(&self, _data: &[u8]) -> Result<Value, BoxError> {
        Err(disabled("yaml"))
    }
}

impl Parser for HclParser {
    #[cfg(feature = "hcl")]
    fn parse(&self, data: &[u8]) -> Result<Value, BoxError> {
        Ok(hcl::from_str(text(data)?)?)
    }

    #[cfg(not(feature = "hcl"))]
    fn parse(&self, _data: &[u8]) -> Result<Value, BoxError> {
        Err(disabled("hcl"))
    }
}
