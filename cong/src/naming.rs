//! Mapping between field names, canonical keys and environment variables.
//!
//! Canonical keys are dotted, lowercase paths such as `server.port`. The
//! environment variable bound to a key is derived from the prefix and the
//! snake-cased key: prefix `hello` and key `server.port` yield
//! `HELLO_SERVER_PORT`.

/// Convert `name` to `snake_case`.
///
/// Characters that are neither letters nor digits become `_`. An uppercase
/// letter that follows a lowercase letter or a digit starts a new word;
/// consecutive capitals are folded without separators, so acronym runs stay
/// glued together.
///
/// # Examples
///
/// ```
/// use cong::to_snake;
/// assert_eq!(to_snake("ServerName"), "server_name");
/// assert_eq!(to_snake("HTTPPort"), "httpport");
/// assert_eq!(to_snake("clientID"), "client_id");
/// assert_eq!(to_snake("server.port"), "server_port");
/// ```
#[must_use]
pub fn to_snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev = '_';
    for (idx, ch) in name.chars().enumerate() {
        if !ch.is_alphanumeric() {
            out.push('_');
        } else if ch.is_uppercase() && idx > 0 {
            if (prev.is_alphabetic() && !prev.is_uppercase()) || prev.is_numeric() {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.extend(ch.to_lowercase());
        }
        prev = ch;
    }
    out
}

/// Normalize a prefix by trimming trailing underscores.
///
/// The environment variable separator is inserted by [`env_var_name`], so a
/// caller passing `APP_` and one passing `APP` bind the same variables.
#[must_use]
pub fn normalize_prefix(prefix: &str) -> &str {
    prefix.trim_end_matches('_')
}

/// Build the canonical key for a dotted field path.
#[must_use]
pub fn canonical_key(path: &str) -> String {
    path.to_lowercase()
}

/// Derive the environment variable bound to `path` under `prefix`.
///
/// Dots are replaced with underscores before snake-casing and the result is
/// uppercased. An empty prefix produces the bare key.
///
/// # Examples
///
/// ```
/// use cong::env_var_name;
/// assert_eq!(env_var_name("hello", "server.port"), "HELLO_SERVER_PORT");
/// assert_eq!(env_var_name("hello", "app.metadata.anotherKey"), "HELLO_APP_METADATA_ANOTHER_KEY");
/// ```
#[must_use]
pub fn env_var_name(prefix: &str, path: &str) -> String {
    let key = to_snake(&path.replace('.', "_"));
    let trimmed = normalize_prefix(prefix);
    if trimmed.is_empty() {
        key.to_uppercase()
    } else {
        format!("{trimmed}_{key}").to_uppercase()
    }
}
