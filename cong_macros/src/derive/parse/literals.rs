//! Literal parsing helpers for derive attributes.

use syn::{Lit, LitStr};

/// Parses a string literal following `key =` in a `#[cong(...)]` attribute.
///
/// ```rust,ignore
/// let attr: syn::Attribute = syn::parse_quote!(#[cong(map_name = "serverName")]);
/// attr.parse_nested_meta(|meta| {
///     assert_eq!(lit_str(&meta, "map_name")?.value(), "serverName");
///     Ok(())
/// })?;
/// ```
pub(crate) fn lit_str(meta: &syn::meta::ParseNestedMeta, key: &str) -> Result<LitStr, syn::Error> {
    let literal = meta.value()?.parse::<Lit>()?;
    match literal {
        Lit::Str(s) => Ok(s),
        other => Err(syn::Error::new(other.span(), format!("{key} must be a string"))),
    }
}

/// Parses an optional `= true`/`= false` after a flag, defaulting to `true`.
pub(crate) fn flag(meta: &syn::meta::ParseNestedMeta) -> Result<bool, syn::Error> {
    if meta.input.peek(syn::Token![=]) {
        Ok(meta.value()?.parse::<syn::LitBool>()?.value)
    } else {
        Ok(true)
    }
}
