//! Sorts field types into scalars, scalar sequences, nested records and types
//! the loader cannot populate.
//!
//! Classification is syntactic: the macro only sees the tokens of the type,
//! so a user-defined type named like a scalar (`struct Duration`) is nested
//! unless marked `#[cong(leaf)]`.

use syn::Type;

use super::parse::{bare_ident, last_ident, strip_transparent, vec_inner};

/// Scalar category, mirroring `cong::LeafKind`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Leaf {
    String,
    Integer,
    Float,
    Boolean,
}

/// Classification of a field type.
#[derive(Clone, Copy)]
pub(crate) enum Class<'a> {
    /// A scalar; the type is the one left after peeling wrappers.
    Scalar(Leaf, &'a Type),
    /// `Vec` of a scalar; the type is the element type.
    Sequence(Leaf, &'a Type),
    /// Another `Schema` type.
    Nested(&'a Type),
    /// Anything else.
    Unsupported(&'a Type),
}

const CONTAINERS: &[&str] = &[
    "HashMap",
    "BTreeMap",
    "HashSet",
    "BTreeSet",
    "VecDeque",
    "Rc",
    "Arc",
    "Cell",
    "RefCell",
    "PhantomData",
];

fn scalar(ty: &Type) -> Option<Leaf> {
    let ident = bare_ident(ty)?;
    match ident.as_str() {
        "String" | "str" | "char" | "PathBuf" | "Utf8PathBuf" => Some(Leaf::String),
        "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64"
        | "u128" | "usize" => Some(Leaf::Integer),
        "f32" | "f64" => Some(Leaf::Float),
        "bool" => Some(Leaf::Boolean),
        _ => None,
    }
}

/// Classify `ty`. `force_leaf` is set by `#[cong(leaf)]`.
pub(crate) fn classify(ty: &Type, force_leaf: bool) -> Class<'_> {
    let inner = strip_transparent(ty);
    if force_leaf {
        return Class::Scalar(scalar(inner).unwrap_or(Leaf::String), inner);
    }
    if let Some(kind) = scalar(inner) {
        return Class::Scalar(kind, inner);
    }
    if let Some(declared) = vec_inner(inner) {
        let element = strip_transparent(declared);
        return scalar(element).map_or(Class::Unsupported(inner), |kind| {
            Class::Sequence(kind, element)
        });
    }
    match last_ident(inner) {
        Some(name) if CONTAINERS.contains(&name.as_str()) => Class::Unsupported(inner),
        Some(_) => Class::Nested(inner),
        None => Class::Unsupported(inner),
    }
}
