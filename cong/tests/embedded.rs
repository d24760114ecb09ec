//! Loading from files compiled into the binary.

use anyhow::{Result, ensure};
use cong::{CongError, EmbeddedDir, Format, Schema};
use rstest::{fixture, rstest};
use serde::{Deserialize, Serialize};
use test_helpers::figment::in_jail;

static ASSETS: EmbeddedDir = cong::embedded_dir!(
    "tests/data/embedded" => [
        "README.md",
        "hello.yaml",
        "static/app.yaml",
        "static/nested/db.yaml",
        "static/server.yaml",
    ]
);

#[derive(Debug, Default, PartialEq, Deserialize, Serialize, Schema)]
struct Layered {
    app: App,
    db: Db,
    server: Server,
}

#[derive(Debug, Default, PartialEq, Deserialize, Serialize, Schema)]
struct App {
    name: String,
    description: String,
}

#[derive(Debug, Default, PartialEq, Deserialize, Serialize, Schema)]
struct Db {
    port: u16,
    timeout: u32,
}

#[derive(Debug, Default, PartialEq, Deserialize, Serialize, Schema)]
struct Server {
    name: String,
    port: u16,
    timeout: u32,
}

#[derive(Debug, Default, PartialEq, Deserialize, Serialize, Schema)]
struct Hello {
    server_name: String,
    port: u16,
    timeout: u32,
}

#[fixture]
fn expected() -> Layered {
    Layered {
        app: App {
            name: "embedded-app".into(),
            description: "served from the binary".into(),
        },
        db: Db {
            port: 5432,
            timeout: 10,
        },
        server: Server {
            name: "embedded-server".into(),
            port: 9090,
            timeout: 30,
        },
    }
}

#[rstest]
fn root_walk_merges_every_matching_file(expected: Layered) -> Result<()> {
    in_jail(|_| {
        let cfg: Layered = cong::load_from_embedded("hello", &ASSETS, Format::Yaml)?;
        ensure!(cfg == expected, "unexpected config: {cfg:?}");
        let hello: Hello = cong::load_from_embedded("hello", &ASSETS, Format::Yaml)?;
        ensure!(hello.server_name == "Embedded", "hello: {hello:?}");
        ensure!(hello.port == 7000, "hello: {hello:?}");
        Ok(())
    })
}

#[rstest]
#[case::bare("static")]
#[case::dotted("./static")]
#[case::trailing_slash("static/")]
fn rooted_walk_reads_only_the_subtree(expected: Layered, #[case] root: &str) -> Result<()> {
    in_jail(|_| {
        let cfg: Layered = cong::load_from_embedded_by_path("hello", &ASSETS, root, Format::Yaml)?;
        ensure!(cfg == expected, "unexpected config: {cfg:?}");
        let hello: Hello = cong::load_from_embedded_by_path("hello", &ASSETS, root, Format::Yaml)?;
        ensure!(hello == Hello::default(), "hello.yaml is outside the subtree: {hello:?}");
        Ok(())
    })
}

#[rstest]
fn rooted_walk_binds_environment_variables() -> Result<()> {
    in_jail(|j| {
        j.set_env("EMBED_SERVER_PORT", "1234");
        let cfg: Layered =
            cong::load_from_embedded_by_path("embed", &ASSETS, "static", Format::Yaml)?;
        ensure!(cfg.server.port == 1234, "port: {}", cfg.server.port);
        ensure!(cfg.server.name == "embedded-server", "{cfg:?}");
        Ok(())
    })
}

#[rstest]
fn missing_subtree_is_an_io_error() -> Result<()> {
    in_jail(|_| {
        let err = cong::load_from_embedded_by_path::<Layered, _>(
            "hello",
            &ASSETS,
            "absent",
            Format::Yaml,
        )
        .err();
        ensure!(
            matches!(&err, Some(CongError::Io { path, .. }) if path == "absent"),
            "unexpected result: {err:?}"
        );
        Ok(())
    })
}

#[rstest]
fn other_formats_find_nothing() -> Result<()> {
    in_jail(|_| {
        let cfg: Layered = cong::load_from_embedded("hello", &ASSETS, Format::Json)?;
        ensure!(cfg == Layered::default(), "unexpected config: {cfg:?}");
        Ok(())
    })
}
