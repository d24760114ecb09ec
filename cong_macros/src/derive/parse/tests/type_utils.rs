//! Tests for type introspection helpers.

use super::super::*;
use anyhow::{Result, anyhow, ensure};
use quote::ToTokens;
use rstest::rstest;
use syn::{Type, parse_quote};

fn tokens(ty: &Type) -> String {
    ty.to_token_stream().to_string()
}

#[rstest]
#[case(parse_quote!(Vec<u8>))]
#[case(parse_quote!(std::vec::Vec<u8>))]
#[case(parse_quote!(alloc::vec::Vec<u8>))]
fn vec_inner_matches_various_prefixes(#[case] ty: Type) -> Result<()> {
    let inner = vec_inner(&ty).ok_or_else(|| anyhow!("expected Vec"))?;
    ensure!(tokens(inner) == "u8", "got {}", tokens(inner));
    Ok(())
}

#[rstest]
#[case(parse_quote!(Option<Box<Option<Server>>>), "Server")]
#[case(parse_quote!(std::option::Option<u32>), "u32")]
#[case(parse_quote!(Box<(u16)>), "u16")]
#[case(parse_quote!(Vec<Option<u8>>), "Vec < Option < u8 > >")]
fn strip_transparent_peels_wrappers(#[case] ty: Type, #[case] expected: &str) -> Result<()> {
    let stripped = strip_transparent(&ty);
    ensure!(tokens(stripped) == expected, "got {}", tokens(stripped));
    Ok(())
}

#[rstest]
#[case(parse_quote!(u16), Some("u16"))]
#[case(parse_quote!(std::string::String), Some("String"))]
#[case(parse_quote!(Vec<u8>), None)]
#[case(parse_quote!(&str), None)]
#[case(parse_quote!(<T as Trait>::Assoc), None)]
fn bare_ident_requires_a_plain_path(#[case] ty: Type, #[case] expected: Option<&str>) -> Result<()> {
    let ident = bare_ident(&ty);
    ensure!(ident.as_deref() == expected, "got {ident:?}");
    Ok(())
}

#[rstest]
fn last_ident_ignores_generic_arguments() -> Result<()> {
    let ty: Type = parse_quote!(std::collections::HashMap<String, u8>);
    ensure!(last_ident(&ty).as_deref() == Some("HashMap"));
    Ok(())
}
