//! Crate path resolution for dependency aliasing support.
//!
//! Converts the optional `#[cong(crate = "...")]` attribute value into a
//! `TokenStream` that replaces hardcoded `cong::` paths in generated code.

use proc_macro2::TokenStream;
use quote::quote;

/// Resolve the crate path from the parsed struct attribute.
///
/// Defaults to `cong` when no override is present.
///
/// ```rust,ignore
/// assert_eq!(resolve(None).to_string(), "cong");
/// ```
pub(crate) fn resolve(crate_path: Option<&syn::Path>) -> TokenStream {
    crate_path.map_or_else(|| quote! { cong }, |path| quote! { #path })
}
