//! Parsing utilities for the `Schema` derive macro.

use syn::parenthesized;
use syn::{Attribute, Data, DeriveInput, Fields, Token};

mod literals;
mod serde_attrs;
#[cfg(test)]
mod tests;
mod type_utils;

use literals::{flag, lit_str};
use serde_attrs::{serde_field_flags, serde_field_key, serde_rename_all};
pub(crate) use serde_attrs::SerdeFieldFlags;
pub(crate) use type_utils::{bare_ident, last_ident, strip_transparent, vec_inner};

/// Struct-level `#[cong(...)]` attributes.
#[derive(Default, Clone)]
pub(crate) struct StructAttrs {
    /// Overrides the generated crate path for dependency aliasing.
    ///
    /// When set via `#[cong(crate = "my_alias")]`, generated code references
    /// types through `my_alias::` instead of `cong::`.
    pub crate_path: Option<syn::Path>,
}

/// Field-level attributes recognised by `#[derive(Schema)]`.
///
/// - `map_name` replaces the field name when building keys and environment
///   variable names.
/// - `skip` leaves the field out of the schema.
/// - `leaf` treats the field as a string leaf whatever its type.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub(crate) struct FieldAttrs {
    pub map_name: Option<String>,
    pub skip: bool,
    pub leaf: bool,
}

/// A named field with everything the generator needs.
pub(crate) struct ParsedField {
    pub field: syn::Field,
    pub attrs: FieldAttrs,
    pub serde_name: String,
    pub serde: SerdeFieldFlags,
}

/// Everything gathered from the derive input.
pub(crate) struct ParsedInput {
    pub struct_attrs: StructAttrs,
    pub fields: Vec<ParsedField>,
}

/// Iterate all `#[cong(...)]` attributes once and apply a callback.
fn parse_cong<F>(attrs: &[Attribute], mut f: F) -> syn::Result<()>
where
    F: FnMut(&syn::meta::ParseNestedMeta) -> syn::Result<()>,
{
    for attr in attrs.iter().filter(|a| a.path().is_ident("cong")) {
        attr.parse_nested_meta(|meta| f(&meta))?;
    }
    Ok(())
}

/// Consumes an unrecognised key-value or list without recording it.
fn discard_unknown(meta: &syn::meta::ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<syn::Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        parenthesized!(content in meta.input);
        content.parse::<proc_macro2::TokenStream>()?;
    }
    Ok(())
}

/// Field name as written, without a raw identifier prefix.
pub(crate) fn unraw(ident: &syn::Ident) -> String {
    let name = ident.to_string();
    name.strip_prefix("r#").map_or_else(|| name.clone(), str::to_owned)
}

/// Extracts `#[cong(...)]` metadata applied to a struct.
///
/// Only `crate` is recognised; other keys are rejected so typos surface at
/// compile time.
pub(crate) fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<StructAttrs> {
    let mut out = StructAttrs::default();
    parse_cong(attrs, |meta| {
        if meta.path.is_ident("crate") {
            let s = lit_str(meta, "crate")?;
            let path: syn::Path =
                syn::parse_str(&s.value()).map_err(|e| syn::Error::new(s.span(), e))?;
            out.crate_path = Some(path);
            Ok(())
        } else {
            Err(meta.error("unknown cong struct attribute; expected `crate`"))
        }
    })?;
    Ok(out)
}

/// Parses field-level `#[cong(...)]` attributes.
pub(crate) fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    parse_cong(attrs, |meta| {
        let Some(ident) = meta.path.get_ident() else {
            return Err(meta.error("unknown cong field attribute"));
        };
        match ident.to_string().as_str() {
            "map_name" => {
                let s = lit_str(meta, "map_name")?;
                if s.value().is_empty() {
                    return Err(syn::Error::new(s.span(), "map_name must not be empty"));
                }
                out.map_name = Some(s.value());
            }
            "skip" => out.skip = flag(meta)?,
            "leaf" => out.leaf = flag(meta)?,
            _ => {
                return Err(meta.error(
                    "unknown cong field attribute; expected `map_name`, `skip` or `leaf`",
                ));
            }
        }
        Ok(())
    })?;
    Ok(out)
}

/// Gathers the struct attributes and named fields of the derive input.
///
/// Fields skipped through `#[cong(skip)]`, `#[serde(skip)]` or
/// `#[serde(skip_deserializing)]` are dropped here.
pub(crate) fn parse_input(input: &DeriveInput) -> syn::Result<ParsedInput> {
    let struct_attrs = parse_struct_attrs(&input.attrs)?;
    let rename_all = serde_rename_all(&input.attrs)?;
    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            Fields::Unit => {
                return Ok(ParsedInput {
                    struct_attrs,
                    fields: Vec::new(),
                });
            }
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    data.struct_token,
                    "Schema requires named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Schema can only be derived for structs",
            ));
        }
    };

    let mut fields = Vec::new();
    for field in named {
        let attrs = parse_field_attrs(&field.attrs)?;
        let serde = serde_field_flags(&field.attrs)?;
        if attrs.skip || serde.skip {
            continue;
        }
        fields.push(ParsedField {
            serde_name: serde_field_key(field, rename_all)?,
            field: field.clone(),
            attrs,
            serde,
        });
    }
    Ok(ParsedInput {
        struct_attrs,
        fields,
    })
}
