//! Unit tests for the `Schema` expansion.

use crate::derive::expand;
use anyhow::{Result, anyhow, ensure};
use quote::quote;
use rstest::rstest;
use syn::{DeriveInput, parse_quote};

fn expanded(input: &DeriveInput) -> Result<String> {
    expand(input)
        .map(|tokens| tokens.to_string())
        .map_err(|err| anyhow!(err))
}

fn compact(tokens: &proc_macro2::TokenStream) -> String {
    tokens.to_string().replace(' ', "")
}

#[test]
fn generates_one_entry_per_field() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct Server {
            #[cong(map_name = "serverName")]
            name: String,
            port: Option<u16>,
            tags: Vec<String>,
            tls: Tls,
            extra: std::collections::HashMap<String, String>,
        }
    };
    let tokens = compact(&expand(&input).map_err(|err| anyhow!(err))?);
    let expected = [
        quote!(cong::FieldSchema::new(
            "serverName",
            "name",
            cong::FieldKind::Scalar(cong::LeafType::new(cong::LeafKind::String, "String"))
        )),
        quote!(cong::FieldSchema::new(
            "port",
            "port",
            cong::FieldKind::Scalar(cong::LeafType::new(cong::LeafKind::Integer, "u16"))
        )),
        quote!(cong::FieldSchema::new(
            "tags",
            "tags",
            cong::FieldKind::Sequence(cong::LeafType::new(cong::LeafKind::String, "String"))
        )),
        quote!(cong::FieldSchema::new(
            "tls",
            "tls",
            cong::FieldKind::Nested(cong::NestedSchema::of::<Tls>())
        )),
        quote!(cong::FieldSchema::new(
            "extra",
            "extra",
            cong::FieldKind::Unsupported("std::collections::HashMap<String,String>")
        )),
    ];
    for entry in &expected {
        let needle = compact(entry);
        ensure!(tokens.contains(&needle), "missing {needle} in {tokens}");
    }
    ensure!(tokens.starts_with("implcong::SchemaforServer"), "{tokens}");
    Ok(())
}

#[test]
fn crate_attribute_redirects_paths() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        #[cong(crate = "deps::config")]
        struct Empty {}
    };
    let tokens = expanded(&input)?;
    ensure!(tokens.contains("deps :: config :: Schema"), "{tokens}");
    ensure!(!tokens.contains("cong ::"), "{tokens}");
    Ok(())
}

#[test]
fn flattened_fields_have_empty_names() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct Outer {
            #[serde(flatten)]
            common: Common,
        }
    };
    let tokens = compact(&expand(&input).map_err(|err| anyhow!(err))?);
    ensure!(
        tokens.contains(r#"cong::FieldSchema::new("","",cong::FieldKind::Nested"#),
        "{tokens}"
    );
    Ok(())
}

#[rstest]
#[case::scalar(parse_quote! { struct Bad { #[serde(flatten)] port: u16 } })]
#[case::unsupported(
    parse_quote! { struct Bad { #[serde(flatten)] rest: HashMap<String, String> } }
)]
fn flatten_requires_a_nested_type(#[case] input: DeriveInput) -> Result<()> {
    ensure!(expand(&input).is_err(), "flatten was accepted");
    Ok(())
}

#[test]
fn generic_nested_fields_are_bounded() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct Wrapper<T> {
            inner: T,
            next: Option<Box<Wrapper<T>>>,
            name: String,
        }
    };
    let tokens = compact(&expand(&input).map_err(|err| anyhow!(err))?);
    ensure!(tokens.contains("T:'static"), "{tokens}");
    ensure!(tokens.contains("T:cong::Schema"), "{tokens}");
    ensure!(!tokens.contains("Wrapper<T>:cong::Schema"), "{tokens}");
    Ok(())
}
