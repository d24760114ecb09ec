//! Serde attribute parsing helpers.
//!
//! Materialization writes resolved values under the keys serde expects when
//! deserializing the target, so those keys must respect
//! `#[serde(rename = "...")]` and `#[serde(rename_all = "...")]`.

use heck::{
    ToKebabCase, ToLowerCamelCase, ToShoutyKebabCase, ToShoutySnakeCase, ToSnakeCase,
    ToUpperCamelCase,
};
use syn::meta::ParseNestedMeta;
use syn::{Attribute, Field, LitStr, Token};

/// Supported `#[serde(rename_all = "...")]` rules for struct fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SerdeRenameAll {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl SerdeRenameAll {
    fn parse(value: &LitStr) -> syn::Result<Self> {
        match value.value().as_str() {
            "lowercase" => Ok(Self::Lower),
            "UPPERCASE" => Ok(Self::Upper),
            "PascalCase" => Ok(Self::Pascal),
            "camelCase" => Ok(Self::Camel),
            "snake_case" => Ok(Self::Snake),
            "SCREAMING_SNAKE_CASE" => Ok(Self::ScreamingSnake),
            "kebab-case" => Ok(Self::Kebab),
            "SCREAMING-KEBAB-CASE" => Ok(Self::ScreamingKebab),
            other => Err(syn::Error::new(
                value.span(),
                format!(
                    "unsupported serde rename_all value '{other}'; expected one of \
\"lowercase\", \"UPPERCASE\", \"PascalCase\", \"camelCase\", \"snake_case\", \
\"SCREAMING_SNAKE_CASE\", \"kebab-case\", or \"SCREAMING-KEBAB-CASE\""
                ),
            )),
        }
    }

    pub(crate) fn apply(self, field_name: &str) -> String {
        match self {
            Self::Lower => field_name.to_ascii_lowercase(),
            Self::Upper => field_name.to_ascii_uppercase(),
            Self::Pascal => field_name.to_upper_camel_case(),
            Self::Camel => field_name.to_lower_camel_case(),
            Self::Snake => field_name.to_snake_case(),
            Self::ScreamingSnake => field_name.to_shouty_snake_case(),
            Self::Kebab => field_name.to_kebab_case(),
            Self::ScreamingKebab => field_name.to_shouty_kebab_case(),
        }
    }
}

/// Parse `#[serde(rename_all = "...")]` (or its `deserialize` half) from
/// struct attributes.
pub(crate) fn serde_rename_all(attrs: &[Attribute]) -> syn::Result<Option<SerdeRenameAll>> {
    let mut out = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("rename_all") {
                return super::discard_unknown(&meta);
            }
            if let Some(value) = deserialize_name(&meta)? {
                out = Some(SerdeRenameAll::parse(&value)?);
            }
            Ok(())
        })?;
    }
    Ok(out)
}

/// Parse `#[serde(rename = "...")]` (and `rename(deserialize = "...")`)
/// from field attributes.
pub(crate) fn serde_field_rename(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut out = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("rename") {
                return super::discard_unknown(&meta);
            }
            if let Some(value) = deserialize_name(&meta)? {
                out = Some(value.value());
            }
            Ok(())
        })?;
    }
    Ok(out)
}

/// Read `= "name"` or `(deserialize = "name", ...)` after a rename key.
fn deserialize_name(meta: &ParseNestedMeta) -> syn::Result<Option<LitStr>> {
    if meta.input.peek(Token![=]) {
        return Ok(Some(meta.value()?.parse::<LitStr>()?));
    }
    if !meta.input.peek(syn::token::Paren) {
        return Ok(None);
    }
    let mut out = None;
    meta.parse_nested_meta(|nested| {
        if nested.path.is_ident("deserialize") {
            out = Some(nested.value()?.parse::<LitStr>()?);
            Ok(())
        } else {
            super::discard_unknown(&nested)
        }
    })?;
    Ok(out)
}

/// Serde field flags relevant to loading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SerdeFieldFlags {
    /// `skip` or `skip_deserializing`: serde never reads the field.
    pub skip: bool,
    /// `flatten`: the field's own fields appear at the parent level.
    pub flatten: bool,
}

/// Collect the [`SerdeFieldFlags`] of a field.
pub(crate) fn serde_field_flags(attrs: &[Attribute]) -> syn::Result<SerdeFieldFlags> {
    let mut flags = SerdeFieldFlags::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") || meta.path.is_ident("skip_deserializing") {
                flags.skip = true;
            } else if meta.path.is_ident("flatten") {
                flags.flatten = true;
            } else {
                super::discard_unknown(&meta)?;
            }
            Ok(())
        })?;
    }
    Ok(flags)
}

/// Compute the key serde reads for `field` given an optional container-level
/// rename rule.
pub(crate) fn serde_field_key(
    field: &Field,
    rename_all: Option<SerdeRenameAll>,
) -> syn::Result<String> {
    let Some(ident) = field.ident.as_ref() else {
        return Err(syn::Error::new_spanned(
            field,
            "unnamed fields are not supported",
        ));
    };
    if let Some(rename) = serde_field_rename(&field.attrs)? {
        return Ok(rename);
    }
    let field_name = super::unraw(ident);
    Ok(rename_all.map_or_else(|| field_name.clone(), |rule| rule.apply(&field_name)))
}
