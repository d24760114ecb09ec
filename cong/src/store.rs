//! Merged document tree plus environment bindings.
//!
//! A [`Store`] lives for a single load: bindings are registered while it is
//! [`StoreState::Configuring`], documents are merged while it is
//! [`StoreState::Merging`], and [`Store::materialize`] moves it to the
//! terminal [`StoreState::Materialized`] state.

use std::collections::BTreeMap;
use std::fmt;

use figment::Figment;
use figment::providers::Serialized;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::coerce::{Origin, Resolved, coerce_scalar, coerce_sequence};
use crate::error::{CongError, CongResult};
use crate::introspect::{self, LeafBinding, LeafShape};
use crate::naming::{canonical_key, normalize_prefix};
use crate::schema::Schema;
use crate::value::Value;

/// Lifecycle state of a [`Store`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreState {
    /// Bindings and toggles are accepted; no document has been merged.
    Configuring,
    /// Documents are being merged; bindings are frozen.
    Merging,
    /// The store has produced its value and accepts no further changes.
    Materialized,
}

impl fmt::Display for StoreState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Configuring => "configuring",
            Self::Merging => "merging",
            Self::Materialized => "materialized",
        })
    }
}

/// Ordered substitutions applied to a key before deriving an automatic
/// environment variable name.
///
/// # Examples
///
/// ```
/// use cong::EnvKeyReplacer;
///
/// let replacer = EnvKeyReplacer::new([(".", "_"), ("-", "_")]);
/// assert_eq!(replacer.apply("server.max-conns"), "server_max_conns");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvKeyReplacer {
    pairs: Vec<(String, String)>,
}

impl EnvKeyReplacer {
    /// Build a replacer from `(from, to)` pairs applied in order.
    pub fn new<I, F, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (F, T)>,
        F: Into<String>,
        T: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(from, to)| (from.into(), to.into()))
                .filter(|(from, _)| !from.is_empty())
                .collect(),
        }
    }

    /// The replacer used by every load: dots become underscores.
    #[must_use]
    pub fn dots_to_underscores() -> Self {
        Self::new([(".", "_")])
    }

    /// Apply every substitution to `key`.
    #[must_use]
    pub fn apply(&self, key: &str) -> String {
        self.pairs
            .iter()
            .fold(key.to_owned(), |acc, (from, to)| acc.replace(from.as_str(), to))
    }
}

/// Hierarchical key-value store for a single load.
#[derive(Debug)]
pub struct Store {
    state: StoreState,
    tree: Value,
    bindings: BTreeMap<String, Vec<String>>,
    prefix: String,
    replacer: EnvKeyReplacer,
    auto_env: bool,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Create an empty store in the [`StoreState::Configuring`] state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: StoreState::Configuring,
            tree: Value::Null,
            bindings: BTreeMap::new(),
            prefix: String::new(),
            replacer: EnvKeyReplacer { pairs: Vec::new() },
            auto_env: false,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> StoreState {
        self.state
    }

    /// Merged document tree.
    #[must_use]
    pub const fn tree(&self) -> &Value {
        &self.tree
    }

    /// Environment prefix used for automatic lookups.
    #[must_use]
    pub fn env_prefix(&self) -> &str {
        &self.prefix
    }

    fn ensure_configuring(&self, operation: &'static str) -> CongResult<()> {
        if self.state == StoreState::Configuring {
            Ok(())
        } else {
            Err(CongError::State {
                state: self.state,
                operation,
            })
        }
    }

    /// Set the environment prefix. Trailing underscores are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CongError::State`] once a document has been merged.
    pub fn set_env_prefix(&mut self, prefix: &str) -> CongResult<()> {
        self.ensure_configuring("set the environment prefix")?;
        normalize_prefix(prefix).clone_into(&mut self.prefix);
        Ok(())
    }

    /// Set the key replacer used for automatic environment lookups.
    ///
    /// # Errors
    ///
    /// Returns [`CongError::State`] once a document has been merged.
    pub fn set_env_key_replacer(&mut self, replacer: EnvKeyReplacer) -> CongResult<()> {
        self.ensure_configuring("set the environment key replacer")?;
        self.replacer = replacer;
        Ok(())
    }

    /// Enable or disable automatic environment lookups for keys without an
    /// explicit binding.
    ///
    /// # Errors
    ///
    /// Returns [`CongError::State`] once a document has been merged.
    pub fn auto_env(&mut self, enable: bool) -> CongResult<()> {
        self.ensure_configuring("toggle automatic environment lookups")?;
        self.auto_env = enable;
        Ok(())
    }

    /// Append `env_var` to the binding list of `key`.
    ///
    /// Variables bound first are consulted first.
    ///
    /// # Errors
    ///
    /// Returns [`CongError::Binding`] when the key or variable is empty or the
    /// pair is already bound, and [`CongError::State`] once a document has
    /// been merged.
    pub fn bind_env(&mut self, key: &str, env_var: &str) -> CongResult<()> {
        self.ensure_configuring("bind an environment variable")?;
        if key.is_empty() {
            return Err(CongError::binding(key, "key must not be empty"));
        }
        if env_var.is_empty() {
            return Err(CongError::binding(key, "environment variable name must not be empty"));
        }
        let canonical = canonical_key(key);
        let vars = self.bindings.entry(canonical.clone()).or_default();
        if vars.iter().any(|existing| existing == env_var) {
            return Err(CongError::binding(
                canonical,
                format!("'{env_var}' is already bound"),
            ));
        }
        debug!(key = %canonical, env_var, "bound environment variable");
        vars.push(env_var.to_owned());
        Ok(())
    }

    /// Environment variables bound to `key`, in lookup order.
    #[must_use]
    pub fn bindings(&self, key: &str) -> &[String] {
        self.bindings
            .get(&canonical_key(key))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Merge a parsed document on top of the stored tree.
    ///
    /// Mapping keys are lowercased first, so lookups stay case-insensitive
    /// for documents built by hand.
    ///
    /// # Errors
    ///
    /// Returns [`CongError::State`] after materialization.
    pub fn merge_document(&mut self, document: Value) -> CongResult<()> {
        if self.state == StoreState::Materialized {
            return Err(CongError::State {
                state: self.state,
                operation: "merge a document",
            });
        }
        self.state = StoreState::Merging;
        if document.is_null() {
            trace!("skipping empty document");
            return Ok(());
        }
        debug!(kind = document.kind_name(), "merging document");
        self.tree.merge(document.normalise_keys());
        Ok(())
    }

    /// Resolve the raw candidate for `key`: bound environment variables in
    /// order, then the automatic variable when enabled, then the tree.
    ///
    /// Environment variables set to an empty string count as unset.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Resolved> {
        self.env_candidate(key).or_else(|| self.tree_candidate(key))
    }

    fn env_candidate(&self, key: &str) -> Option<Resolved> {
        let bound = self.bindings(key);
        let automatic = (bound.is_empty() && self.auto_env).then(|| self.automatic_var(key));
        bound
            .iter()
            .cloned()
            .chain(automatic)
            .find_map(|var| match std::env::var(&var) {
                Ok(value) if !value.is_empty() => Some(Resolved {
                    value: Value::from(value),
                    origin: Origin::Env(var),
                }),
                _ => None,
            })
    }

    fn tree_candidate(&self, key: &str) -> Option<Resolved> {
        self.tree
            .lookup(key)
            .filter(|value| !value.is_null())
            .map(|value| Resolved {
                value: value.clone(),
                origin: Origin::Document,
            })
    }

    fn automatic_var(&self, key: &str) -> String {
        let replaced = self.replacer.apply(&canonical_key(key));
        if self.prefix.is_empty() {
            replaced.to_uppercase()
        } else {
            format!("{}_{replaced}", self.prefix).to_uppercase()
        }
    }

    /// Populate a fresh `T` from the environment, the merged tree and
    /// `T::default()`, in that order of priority.
    ///
    /// # Errors
    ///
    /// Returns [`CongError::State`] when called twice,
    /// [`CongError::Binding`] when a leaf of `T` has no binding and automatic
    /// lookups are disabled, and [`CongError::Coercion`] when a value cannot
    /// be converted into its field type.
    pub fn materialize<T>(&mut self) -> CongResult<T>
    where
        T: Schema + DeserializeOwned + Serialize + Default,
    {
        if self.state == StoreState::Materialized {
            return Err(CongError::State {
                state: self.state,
                operation: "materialize",
            });
        }
        self.state = StoreState::Materialized;

        let leaves = introspect::leaves::<T>(&self.prefix);
        let mut resolved = Value::mapping();
        for leaf in &leaves {
            if let Some(value) = self.resolve_leaf(leaf)? {
                resolved.insert_path(&leaf.serde_path, value);
            }
        }

        Figment::from(Serialized::defaults(T::default()))
            .merge(Serialized::defaults(&resolved))
            .extract::<T>()
            .map_err(|err| extraction_error(&leaves, &err))
    }

    fn resolve_leaf(&self, leaf: &LeafBinding) -> CongResult<Option<Value>> {
        if self.bindings(&leaf.key).is_empty() && !self.auto_env {
            return Err(CongError::binding(
                leaf.key.as_str(),
                "no environment variable bound to this key",
            ));
        }
        match leaf.shape {
            LeafShape::Scalar(ty) => self
                .get(&leaf.key)
                .map(|candidate| {
                    trace!(key = %leaf.key, origin = ?candidate.origin, "resolved leaf");
                    coerce_scalar(&leaf.key, ty, &candidate)
                })
                .transpose(),
            LeafShape::Sequence(ty) => {
                if let Some(Resolved {
                    origin: Origin::Env(var),
                    ..
                }) = self.env_candidate(&leaf.key)
                {
                    debug!(
                        key = %leaf.key,
                        env_var = %var,
                        "ignoring environment value for sequence"
                    );
                }
                self.tree_candidate(&leaf.key)
                    .map(|candidate| coerce_sequence(&leaf.key, ty, &candidate.value))
                    .transpose()
            }
        }
    }
}

fn extraction_error(leaves: &[LeafBinding], err: &figment::Error) -> CongError {
    let serde_path = err.path.join(".");
    let leaf = leaves
        .iter()
        .find(|leaf| leaf.serde_path.join(".") == serde_path);
    let key = leaf.map_or_else(|| serde_path.clone(), |found| found.key.clone());
    let type_name = leaf.map_or("value", |found| found.shape.type_name());
    CongError::coercion(key, type_name, err.kind.to_string())
}
