//! Procedural macros for `cong`.
//!
//! [`macro@Schema`] describes the fields of a configuration struct so the
//! loader can bind each leaf to an environment variable and materialize the
//! struct from merged documents. Field names become keys as written; the
//! `#[cong(map_name = "...")]` attribute substitutes another name.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive `cong::Schema` for a struct with named fields.
///
/// Field attributes:
///
/// - `#[cong(map_name = "serverName")]` binds the field under another name.
/// - `#[cong(skip)]` leaves the field out; `#[serde(skip)]` does the same.
/// - `#[cong(leaf)]` treats a field of any type as a single string value.
///
/// The struct attribute `#[cong(crate = "path")]` points generated code at a
/// renamed dependency.
#[proc_macro_derive(Schema, attributes(cong))]
pub fn derive_schema(input: TokenStream) -> TokenStream {
    let derive_input = parse_macro_input!(input as DeriveInput);
    derive::expand(&derive_input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[cfg(test)]
mod tests;
