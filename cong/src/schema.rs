//! Declarative description of a target configuration type.
//!
//! Rust offers no runtime reflection, so target types describe their fields
//! through the [`Schema`] trait. `#[derive(Schema)]` generates the
//! implementation from the struct definition; hand-written implementations
//! work equally well.
//!
//! ```
//! use cong::{FieldKind, FieldSchema, LeafKind, LeafType, Schema};
//!
//! struct Server {
//!     port: u16,
//! }
//!
//! impl Schema for Server {
//!     fn fields() -> Vec<FieldSchema> {
//!         vec![FieldSchema::new(
//!             "port",
//!             "port",
//!             FieldKind::Scalar(LeafType::new(LeafKind::Integer, "u16")),
//!         )]
//!     }
//! }
//!
//! assert_eq!(Server::fields().len(), 1);
//! ```

use std::any::TypeId;
use std::fmt;

/// Types that can describe their configuration fields.
pub trait Schema: 'static {
    /// Describe the fields of `Self` in declaration order.
    fn fields() -> Vec<FieldSchema>;
}

/// Description of a single field of a target type.
#[derive(Clone, Copy, Debug)]
pub struct FieldSchema {
    /// Name used to build canonical keys and environment variable names.
    pub name: &'static str,
    /// Name under which `serde` reads the field.
    ///
    /// Empty for fields marked `#[serde(flatten)]`, whose own fields are
    /// read at the parent level. Such fields also carry an empty `name`.
    pub serde_name: &'static str,
    /// Shape of the field.
    pub kind: FieldKind,
}

impl FieldSchema {
    /// Describe a field.
    #[must_use]
    pub const fn new(name: &'static str, serde_name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            serde_name,
            kind,
        }
    }
}

/// Shape of a field.
#[derive(Clone, Copy, Debug)]
pub enum FieldKind {
    /// A single scalar value.
    Scalar(LeafType),
    /// A sequence of scalar values.
    Sequence(LeafType),
    /// Another aggregate described by its own schema.
    Nested(NestedSchema),
    /// A field the loader cannot populate, such as a function pointer or a
    /// trait object. The string is the declared type, used in diagnostics.
    Unsupported(&'static str),
}

/// Scalar category a leaf value is coerced into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeafKind {
    /// Text; taken verbatim.
    String,
    /// Signed or unsigned integer.
    Integer,
    /// Floating point number.
    Float,
    /// Boolean flag.
    Boolean,
}

impl fmt::Display for LeafKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
        })
    }
}

/// Scalar category plus the declared Rust type, for error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LeafType {
    /// Category used for coercion.
    pub kind: LeafKind,
    /// Declared type as written in the source.
    pub type_name: &'static str,
}

impl LeafType {
    /// Describe a leaf of `kind` declared as `type_name`.
    #[must_use]
    pub const fn new(kind: LeafKind, type_name: &'static str) -> Self {
        Self { kind, type_name }
    }
}

/// Lazily evaluated schema of a nested aggregate.
///
/// Evaluation goes through function pointers so a type may refer to itself
/// (through `Box` or `Option`) without the description recursing forever.
#[derive(Clone, Copy)]
pub struct NestedSchema {
    type_id: fn() -> TypeId,
    type_name: fn() -> &'static str,
    fields: fn() -> Vec<FieldSchema>,
}

impl NestedSchema {
    /// Schema of `T`.
    #[must_use]
    pub fn of<T: Schema>() -> Self {
        Self {
            type_id: TypeId::of::<T>,
            type_name: std::any::type_name::<T>,
            fields: T::fields,
        }
    }

    /// Identity of the described type, used for cycle detection.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Fully qualified name of the described type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Fields of the described type.
    #[must_use]
    pub fn fields(&self) -> Vec<FieldSchema> {
        (self.fields)()
    }
}

impl fmt::Debug for NestedSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NestedSchema")
            .field(&self.type_name())
            .finish()
    }
}
