//! Walks a target type's [`Schema`] and binds every leaf to an environment
//! variable.
//!
//! The walk is depth-first in declaration order and keeps its own stack, so
//! deeply nested records do not consume native stack. Re-entering a type that
//! is already on the descent path ends that branch without binding it.

use std::any::TypeId;
use std::vec;

use tracing::{debug, warn};

use crate::error::{CongError, CongResult};
use crate::naming::{canonical_key, env_var_name};
use crate::schema::{FieldKind, FieldSchema, LeafType, Schema};
use crate::store::Store;

/// Shape of a bindable leaf.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeafShape {
    /// Single scalar.
    Scalar(LeafType),
    /// Sequence of scalars; populated from documents only.
    Sequence(LeafType),
}

impl LeafShape {
    /// Declared Rust type of the leaf (the element type for sequences).
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Scalar(ty) | Self::Sequence(ty) => ty.type_name,
        }
    }
}

/// A leaf of the target type together with its derived names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeafBinding {
    /// Dotted path built from binding names, original case.
    pub path: String,
    /// Canonical (lowercase) key.
    pub key: String,
    /// Environment variable bound to the key.
    pub env_var: String,
    /// Field names as seen by `serde`, root first.
    pub serde_path: Vec<&'static str>,
    /// Leaf shape.
    pub shape: LeafShape,
}

struct Frame {
    fields: vec::IntoIter<FieldSchema>,
    path: Vec<&'static str>,
    serde_path: Vec<&'static str>,
    type_id: TypeId,
}

/// List every bindable leaf of `T` under `prefix`.
///
/// # Examples
///
/// ```
/// use cong::{Schema, leaves};
///
/// #[derive(Schema)]
/// struct Server {
///     #[cong(map_name = "serverName")]
///     name: String,
///     port: u16,
/// }
///
/// let keys: Vec<_> = leaves::<Server>("hello").into_iter().map(|l| l.env_var).collect();
/// assert_eq!(keys, ["HELLO_SERVER_NAME", "HELLO_PORT"]);
/// ```
#[must_use]
pub fn leaves<T: Schema>(prefix: &str) -> Vec<LeafBinding> {
    let mut out = Vec::new();
    let mut stack = vec![Frame {
        fields: T::fields().into_iter(),
        path: Vec::new(),
        serde_path: Vec::new(),
        type_id: TypeId::of::<T>(),
    }];

    while let Some(frame) = stack.last_mut() {
        let Some(field) = frame.fields.next() else {
            stack.pop();
            continue;
        };
        let mut path = frame.path.clone();
        let mut serde_path = frame.serde_path.clone();
        // Flattened fields contribute no path segment of their own.
        if !field.name.is_empty() {
            path.push(field.name);
        }
        if !field.serde_name.is_empty() {
            serde_path.push(field.serde_name);
        }
        let full = path.join(".");

        match field.kind {
            FieldKind::Scalar(ty) => {
                out.push(leaf(prefix, full, serde_path, LeafShape::Scalar(ty)));
            }
            FieldKind::Sequence(ty) => {
                out.push(leaf(prefix, full, serde_path, LeafShape::Sequence(ty)));
            }
            FieldKind::Nested(schema) => {
                let type_id = schema.type_id();
                if stack.iter().any(|active| active.type_id == type_id) {
                    debug!(path = %full, ty = schema.type_name(), "skipping recursive field");
                    continue;
                }
                stack.push(Frame {
                    fields: schema.fields().into_iter(),
                    path,
                    serde_path,
                    type_id,
                });
            }
            FieldKind::Unsupported(ty) => {
                warn!(path = %full, ty, "skipping field of unsupported type");
            }
        }
    }
    out
}

fn leaf(
    prefix: &str,
    full: String,
    serde_path: Vec<&'static str>,
    shape: LeafShape,
) -> LeafBinding {
    LeafBinding {
        key: canonical_key(&full),
        env_var: env_var_name(prefix, &full),
        path: full,
        serde_path,
        shape,
    }
}

/// Register the environment binding of every leaf of `T` with `store`.
///
/// # Errors
///
/// Returns [`CongError::Binding`] tagged with the field path when the store
/// refuses a binding, for instance because two fields share a name.
pub fn bind<T: Schema>(store: &mut Store, prefix: &str) -> CongResult<Vec<LeafBinding>> {
    let bound = leaves::<T>(prefix);
    for leaf in &bound {
        store
            .bind_env(&leaf.key, &leaf.env_var)
            .map_err(|err| match err {
                CongError::Binding { message, .. } => {
                    CongError::binding(leaf.path.as_str(), message)
                }
                other => other,
            })?;
    }
    debug!(count = bound.len(), "bound configuration leaves");
    Ok(bound)
}
