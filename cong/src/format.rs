//! Closed set of document formats understood by the loader.

use std::fmt;
use std::str::FromStr;

/// Tag identifying a configuration document format.
///
/// The lowercase name of each tag doubles as the file extension searched for
/// on disk and selects the parser used to read the document. Several tags
/// share a parser (`yaml` and `yml`, for example).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum Format {
    /// JSON documents (`.json`).
    Json,
    /// TOML documents (`.toml`).
    Toml,
    /// YAML documents (`.yaml`).
    Yaml,
    /// YAML documents (`.yml`).
    Yml,
    /// Java-style properties (`.properties`).
    Properties,
    /// Java-style properties (`.props`).
    Props,
    /// Java-style properties (`.prop`).
    Prop,
    /// HashiCorp configuration language (`.hcl`).
    Hcl,
    /// Terraform variable files (`.tfvars`).
    Tfvars,
    /// Dotenv files (`.dotenv`).
    Dotenv,
    /// Dotenv files (`.env`).
    Env,
    /// INI files (`.ini`).
    Ini,
}

impl Format {
    /// Every supported tag, in declaration order.
    pub const ALL: [Self; 12] = [
        Self::Json,
        Self::Toml,
        Self::Yaml,
        Self::Yml,
        Self::Properties,
        Self::Props,
        Self::Prop,
        Self::Hcl,
        Self::Tfvars,
        Self::Dotenv,
        Self::Env,
        Self::Ini,
    ];

    /// File extension for the tag, without a leading dot.
    ///
    /// # Examples
    ///
    /// ```
    /// use cong::Format;
    /// assert_eq!(Format::Yml.extension(), "yml");
    /// ```
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Toml => "toml",
            Self::Yaml => "yaml",
            Self::Yml => "yml",
            Self::Properties => "properties",
            Self::Props => "props",
            Self::Prop => "prop",
            Self::Hcl => "hcl",
            Self::Tfvars => "tfvars",
            Self::Dotenv => "dotenv",
            Self::Env => "env",
            Self::Ini => "ini",
        }
    }

    /// Returns `true` when `file_name` ends with `.<extension>`.
    ///
    /// The comparison is exact: `app.YAML` does not match [`Format::Yaml`].
    /// Dotfiles count, so `.env` matches [`Format::Env`].
    #[must_use]
    pub fn matches_file_name(self, file_name: &str) -> bool {
        file_name
            .rsplit_once('.')
            .is_some_and(|(_, ext)| ext == self.extension())
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Error returned when a string names no known [`Format`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported configuration format '{0}'")]
pub struct UnknownFormat(pub String);

impl FromStr for Format {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim_start_matches('.').to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extension() == wanted)
            .ok_or_else(|| UnknownFormat(s.to_owned()))
    }
}
