//! Tests for serde attribute handling.

use super::super::*;
use anyhow::{Result, anyhow, ensure};
use rstest::rstest;
use syn::{DeriveInput, parse_quote};

fn serde_names(input: &DeriveInput) -> Result<Vec<String>> {
    let parsed = parse_input(input).map_err(|err| anyhow!(err))?;
    Ok(parsed.fields.into_iter().map(|field| field.serde_name).collect())
}

#[rstest]
#[case::camel("camelCase", "serverName")]
#[case::pascal("PascalCase", "ServerName")]
#[case::kebab("kebab-case", "server-name")]
#[case::screaming("SCREAMING_SNAKE_CASE", "SERVER_NAME")]
#[case::lower("lowercase", "server_name")]
fn rename_all_rules(#[case] rule: &str, #[case] expected: &str) -> Result<()> {
    let input: DeriveInput = syn::parse_str(&format!(
        r#"
        #[serde(rename_all = "{rule}")]
        struct Demo {{
            server_name: String,
        }}
        "#
    ))?;
    let names = serde_names(&input)?;
    ensure!(names == [expected], "got {names:?}");
    Ok(())
}

#[test]
fn field_rename_beats_rename_all() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        #[serde(deny_unknown_fields, rename_all = "camelCase")]
        struct Demo {
            #[serde(rename = "listen")]
            bind_address: String,
            #[serde(rename(serialize = "out", deserialize = "in"))]
            direction: String,
            #[serde(default, alias = "max")]
            max_connections: u32,
            #[serde(alias = "p", default = "default_port", rename = "port_number")]
            port: u16,
        }
    };
    let names = serde_names(&input)?;
    ensure!(
        names == ["listen", "in", "maxConnections", "port_number"],
        "got {names:?}"
    );
    Ok(())
}

#[test]
fn skipped_fields_are_dropped_and_flatten_is_recorded() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct Demo {
            #[serde(skip)]
            cache: Cache,
            #[serde(skip_deserializing)]
            computed: u8,
            #[serde(flatten)]
            common: Common,
        }
    };
    let parsed = parse_input(&input).map_err(|err| anyhow!(err))?;
    ensure!(parsed.fields.len() == 1, "skipped fields were kept");
    ensure!(
        parsed.fields.first().is_some_and(|field| field.serde.flatten),
        "flatten not recorded"
    );
    Ok(())
}

#[test]
fn rejects_unknown_rename_rule() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        #[serde(rename_all = "Train-Case")]
        struct Demo {
            field: String,
        }
    };
    ensure!(parse_input(&input).is_err(), "rule was accepted");
    Ok(())
}
