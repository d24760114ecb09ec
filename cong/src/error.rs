//! Error types produced by the configuration loader.

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

use crate::Format;
use crate::store::StoreState;

/// Result alias used throughout the crate.
pub type CongResult<T> = Result<T, CongError>;

/// Boxed parser diagnostic.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while loading configuration.
///
/// Every variant aborts the load that produced it; partially populated
/// configuration values are never returned alongside an error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CongError {
    /// No file with the requested name exists in any search directory.
    #[error("no configuration file named '{file_name}' found in {}", join_paths(.searched))]
    NotFound {
        /// File name that was searched for, extension included.
        file_name: String,
        /// Directories scanned, in search order.
        searched: Vec<Utf8PathBuf>,
    },

    /// A configuration file or embedded asset could not be read.
    #[error("failed to read configuration source '{path}': {source}")]
    Io {
        /// Path of the file or directory that failed.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },

    /// A parser rejected a document.
    #[error("failed to parse '{path}' as {format}: {source}")]
    Parse {
        /// Path of the rejected document.
        path: Utf8PathBuf,
        /// Format the document was parsed as.
        format: Format,
        /// Diagnostic reported by the parser.
        #[source]
        source: BoxError,
    },

    /// An environment binding could not be registered.
    #[error("failed to bind environment variable for '{key}': {message}")]
    Binding {
        /// Field path or canonical key whose binding failed.
        key: String,
        /// Human-readable explanation of the failure.
        message: String,
    },

    /// A value could not be converted into the declared field type.
    #[error("cannot convert value for '{key}' into {type_name}: {reason}")]
    Coercion {
        /// Canonical key of the offending leaf.
        key: String,
        /// Declared Rust type of the leaf.
        type_name: String,
        /// Why the conversion failed.
        reason: String,
    },

    /// A store operation was invoked in the wrong lifecycle state.
    #[error("cannot {operation} while the store is {state}")]
    State {
        /// State the store was in.
        state: StoreState,
        /// Operation that was refused.
        operation: &'static str,
    },
}

impl CongError {
    /// Construct a [`CongError::Io`] for `path`.
    #[must_use]
    pub fn io(path: &Utf8Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_owned(),
            source,
        }
    }

    /// Construct a [`CongError::Parse`] for `path`.
    #[must_use]
    pub fn parse(path: &Utf8Path, format: Format, source: impl Into<BoxError>) -> Self {
        Self::Parse {
            path: path.to_owned(),
            format,
            source: source.into(),
        }
    }

    /// Construct a [`CongError::Binding`] for `key`.
    #[must_use]
    pub fn binding(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Binding {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Construct a [`CongError::Coercion`] for `key`.
    #[must_use]
    pub fn coercion(
        key: impl Into<String>,
        type_name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Coercion {
            key: key.into(),
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    /// Canonical key associated with the error, when there is one.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Binding { key, .. } | Self::Coercion { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Source path associated with the error, when there is one.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8Path> {
        match self {
            Self::Io { path, .. } | Self::Parse { path, .. } => Some(path),
            _ => None,
        }
    }
}

fn join_paths(paths: &[Utf8PathBuf]) -> String {
    let mut out = String::new();
    for (idx, path) in paths.iter().enumerate() {
        if idx > 0 {
            out.push_str(", ");
        }
        out.push('\'');
        out.push_str(path.as_str());
        out.push('\'');
    }
    if out.is_empty() {
        out.push_str("no directories");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn not_found_lists_searched_directories() {
        let err = CongError::NotFound {
            file_name: "hello.yaml".into(),
            searched: vec![Utf8PathBuf::from("."), Utf8PathBuf::from("./config")],
        };
        assert_eq!(
            err.to_string(),
            "no configuration file named 'hello.yaml' found in '.', './config'"
        );
    }

    #[test]
    fn parse_error_mentions_path_and_format() {
        let err = CongError::parse(Utf8Path::new("cfg/app.yaml"), Format::Yaml, "bad indent");
        let text = err.to_string();
        assert!(text.contains("cfg/app.yaml"), "missing path: {text}");
        assert!(text.contains("as yaml"), "missing format: {text}");
        assert!(text.contains("bad indent"), "missing diagnostic: {text}");
        assert_eq!(err.path(), Some(Utf8Path::new("cfg/app.yaml")));
    }

    #[rstest]
    #[case(CongError::binding("server.port", "duplicate"), Some("server.port"))]
    #[case(CongError::coercion("db.port", "u16", "invalid digit"), Some("db.port"))]
    #[case(
        CongError::State { state: StoreState::Materialized, operation: "merge a document" },
        None
    )]
    fn exposes_keys(#[case] err: CongError, #[case] expected: Option<&str>) {
        assert_eq!(err.key(), expected);
    }

    #[test]
    fn state_error_names_the_state() {
        let err = CongError::State {
            state: StoreState::Materialized,
            operation: "merge a document",
        };
        assert_eq!(
            err.to_string(),
            "cannot merge a document while the store is materialized"
        );
    }
}
