//! Expansion of `#[derive(Schema)]`.

use proc_macro2::TokenStream;
use syn::DeriveInput;

mod classify;
mod crate_path;
mod generate;
mod parse;

/// Expand the derive input into a `Schema` implementation.
pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let parsed = parse::parse_input(input)?;
    let krate = crate_path::resolve(parsed.struct_attrs.crate_path.as_ref());
    generate::generate_schema_impl(input, &parsed, &krate)
}
