//! Type introspection helpers.
//!
//! These utilities perform shallow inspection of `syn::Type` values to
//! recognise wrapper types such as `Option<T>` and `Box<T>` and containers
//! such as `Vec<T>`.

use syn::{GenericArgument, PathArguments, Type};

/// Extract the first type argument from a `PathArguments` container.
fn extract_first_type_argument(args: &PathArguments) -> Option<&Type> {
    let PathArguments::AngleBracketed(angle_args) = args else {
        return None;
    };
    let first = angle_args.args.first()?;
    let GenericArgument::Type(inner) = first else {
        return None;
    };
    Some(inner)
}

/// Returns the generic parameter if `ty` is the provided wrapper.
///
/// The check is shallow: it inspects only the final path segment, so
/// `std::option::Option<T>` matches as well as `Option<T>`.
fn type_inner<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(p) = ty else {
        return None;
    };
    let last = p.path.segments.last()?;
    if last.ident != wrapper {
        return None;
    }
    extract_first_type_argument(&last.arguments)
}

/// Returns the inner type if `ty` is `Option<T>`.
pub(crate) fn option_inner(ty: &Type) -> Option<&Type> {
    type_inner(ty, "Option")
}

/// Returns the inner type if `ty` is `Box<T>`.
pub(crate) fn box_inner(ty: &Type) -> Option<&Type> {
    type_inner(ty, "Box")
}

/// Extracts the element type `T` if `ty` is `Vec<T>`.
pub(crate) fn vec_inner(ty: &Type) -> Option<&Type> {
    type_inner(ty, "Vec")
}

/// Peel `Option`, `Box`, parentheses and invisible groups until none remain.
///
/// `Option<Box<Option<T>>>` yields `T`.
pub(crate) fn strip_transparent(ty: &Type) -> &Type {
    let mut current = ty;
    loop {
        current = match current {
            Type::Paren(paren) => &paren.elem,
            Type::Group(group) => &group.elem,
            other => match option_inner(other).or_else(|| box_inner(other)) {
                Some(inner) => inner,
                None => return other,
            },
        };
    }
}

/// Final path segment identifier when `ty` is a plain path with no generic
/// arguments, such as `u16` or `std::string::String`.
pub(crate) fn bare_ident(ty: &Type) -> Option<String> {
    let Type::Path(p) = ty else {
        return None;
    };
    if p.qself.is_some() {
        return None;
    }
    let last = p.path.segments.last()?;
    matches!(last.arguments, PathArguments::None).then(|| last.ident.to_string())
}

/// Final path segment identifier of any path type, ignoring generic
/// arguments.
pub(crate) fn last_ident(ty: &Type) -> Option<String> {
    let Type::Path(p) = ty else {
        return None;
    };
    p.path.segments.last().map(|segment| segment.ident.to_string())
}
