//! Parser registry turning document bytes into a [`Value`] tree.
//!
//! Each [`Format`] tag selects one [`Parser`]. The default registry knows
//! every built-in format; formats whose parser crate is behind a disabled
//! cargo feature report a parse error naming the feature.

mod dotenv;
mod ini;
mod properties;
mod structured;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use camino::Utf8Path;
use tracing::trace;

use crate::error::{BoxError, CongError, CongResult};
use crate::format::Format;
use crate::value::Value;

pub use dotenv::DotenvParser;
pub use ini::IniParser;
pub use properties::PropertiesParser;
pub use structured::{HclParser, JsonParser, TomlParser, YamlParser};

/// Converts raw document bytes into a value tree.
///
/// Parsers must not touch the filesystem or the environment. Closures of the
/// right shape implement the trait, so ad hoc formats can be registered
/// without a named type.
pub trait Parser: Send + Sync {
    /// Parse `data` into a value tree.
    ///
    /// # Errors
    ///
    /// Returns the parser's diagnostic when `data` is malformed.
    fn parse(&self, data: &[u8]) -> Result<Value, BoxError>;
}

impl<F> Parser for F
where
    F: Fn(&[u8]) -> Result<Value, BoxError> + Send + Sync,
{
    fn parse(&self, data: &[u8]) -> Result<Value, BoxError> {
        self(data)
    }
}

/// Decode `data` as UTF-8 text.
pub(crate) fn text(data: &[u8]) -> Result<&str, BoxError> {
    Ok(std::str::from_utf8(data)?)
}

/// Diagnostic returned by parsers whose backing crate was compiled out.
#[cfg_attr(
    all(
        feature = "json",
        feature = "toml",
        feature = "yaml",
        feature = "hcl",
        feature = "dotenv"
    ),
    expect(dead_code, reason = "every optional parser is enabled")
)]
pub(crate) fn disabled(feature: &str) -> BoxError {
    format!("{feature} support disabled: enable the '{feature}' feature of cong").into()
}

/// Lookup table from format tag to parser.
#[derive(Clone)]
pub struct ParserRegistry {
    parsers: BTreeMap<Format, Arc<dyn Parser>>,
}

impl fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("formats", &self.parsers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register(Format::Json, Arc::new(JsonParser))
            .register(Format::Toml, Arc::new(TomlParser))
            .register(Format::Yaml, Arc::new(YamlParser))
            .register(Format::Yml, Arc::new(YamlParser))
            .register(Format::Hcl, Arc::new(HclParser))
            .register(Format::Tfvars, Arc::new(HclParser))
            .register(Format::Dotenv, Arc::new(DotenvParser))
            .register(Format::Env, Arc::new(DotenvParser))
            .register(Format::Properties, Arc::new(PropertiesParser))
            .register(Format::Props, Arc::new(PropertiesParser))
            .register(Format::Prop, Arc::new(PropertiesParser))
            .register(Format::Ini, Arc::new(IniParser));
        registry
    }
}

impl ParserRegistry {
    /// A registry with no parsers.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            parsers: BTreeMap::new(),
        }
    }

    /// Register `parser` for `format`, replacing any previous parser.
    pub fn register(&mut self, format: Format, parser: Arc<dyn Parser>) -> &mut Self {
        self.parsers.insert(format, parser);
        self
    }

    /// Builder-style variant of [`ParserRegistry::register`].
    ///
    /// # Examples
    ///
    /// ```
    /// use cong::{BoxError, Format, ParserRegistry, Value};
    ///
    /// let registry = ParserRegistry::default()
    ///     .with(Format::Env, |_: &[u8]| -> Result<Value, BoxError> { Ok(Value::mapping()) });
    /// assert!(registry.contains(Format::Env));
    /// ```
    #[must_use]
    pub fn with(mut self, format: Format, parser: impl Parser + 'static) -> Self {
        self.register(format, Arc::new(parser));
        self
    }

    /// Returns `true` when a parser is registered for `format`.
    #[must_use]
    pub fn contains(&self, format: Format) -> bool {
        self.parsers.contains_key(&format)
    }

    /// Parse `data` read from `path` as `format`.
    ///
    /// Blank documents yield [`Value::Null`]. Mapping keys are lowercased.
    ///
    /// # Errors
    ///
    /// Returns [`CongError::Parse`] when no parser is registered for
    /// `format` or the parser rejects `data`.
    pub fn parse(&self, format: Format, path: &Utf8Path, data: &[u8]) -> CongResult<Value> {
        let parser = self
            .parsers
            .get(&format)
            .ok_or_else(|| CongError::parse(path, format, "no parser registered for this format"))?;
        if data.iter().all(u8::is_ascii_whitespace) {
            trace!(%path, "document is blank");
            return Ok(Value::Null);
        }
        let value = parser
            .parse(data)
            .map_err(|err| CongError::parse(path, format, err))?;
        Ok(value.normalise_keys())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(format: Format, input: &str) -> CongResult<Value> {
        ParserRegistry::default().parse(format, Utf8Path::new("cfg/app"), input.as_bytes())
    }

    #[rstest]
    #[case(Format::Json, r#"{"Server": {"Port": 80}}"#)]
    #[case(Format::Toml, "[Server]\nPort = 80\n")]
    #[case(Format::Yaml, "Server:\n  Port: 80\n")]
    #[case(Format::Yml, "server: {port: 80}")]
    #[case(Format::Hcl, "server {\n  port = 80\n}\n")]
    #[case(Format::Tfvars, "server = { port = 80 }\n")]
    #[case(Format::Properties, "server.port = 80\n")]
    #[case(Format::Ini, "[Server]\nport = 80\n")]
    fn formats_produce_lowercase_trees(#[case] format: Format, #[case] input: &str) {
        let value = parse(format, input);
        let port = value.as_ref().ok().and_then(|tree| tree.lookup("server.port"));
        assert!(
            matches!(port, Some(Value::Scalar(s)) if s.to_string() == "80"),
            "{format}: {value:?}"
        );
    }

    #[rstest]
    #[case(Format::Json)]
    #[case(Format::Yaml)]
    #[case(Format::Ini)]
    fn blank_documents_are_null(#[case] format: Format) {
        assert_eq!(parse(format, " \n\t").ok(), Some(Value::Null));
    }

    #[rstest]
    #[case(Format::Json, "{")]
    #[case(Format::Toml, "a = ")]
    #[case(Format::Yaml, "a: [1, 2")]
    #[case(Format::Ini, "[open\n")]
    fn malformed_documents_report_path_and_format(#[case] format: Format, #[case] input: &str) {
        let err = parse(format, input).err();
        assert!(
            matches!(
                &err,
                Some(CongError::Parse { path, format: f, .. }) if path == "cfg/app" && *f == format
            ),
            "unexpected result: {err:?}"
        );
    }

    #[test]
    fn yaml_keeps_yes_as_text() {
        let value = parse(Format::Yaml, "enabled: yes");
        assert_eq!(
            value.ok().as_ref().and_then(|tree| tree.lookup("enabled")).cloned(),
            Some(Value::from("yes"))
        );
    }

    #[test]
    fn registered_parsers_override_built_ins() {
        let registry = ParserRegistry::default()
            .with(Format::Json, |_: &[u8]| -> Result<Value, BoxError> {
                Ok(Value::from("custom"))
            });
        let value = registry.parse(Format::Json, Utf8Path::new("x.json"), b"{}");
        assert_eq!(value.ok(), Some(Value::from("custom")));
    }

    #[test]
    fn missing_parsers_are_parse_errors() {
        let err = ParserRegistry::empty().parse(Format::Ini, Utf8Path::new("x.ini"), b"a=1").err();
        assert!(matches!(err, Some(CongError::Parse { .. })));
    }
}
