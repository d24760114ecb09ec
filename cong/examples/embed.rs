//! Loads configuration compiled into the binary.
#![expect(clippy::print_stdout, reason = "demo output")]

use cong::{EmbeddedDir, Format, Schema};
use serde::{Deserialize, Serialize};

static ASSETS: EmbeddedDir =
    cong::embedded_dir!("examples" => ["static/app.yaml", "static/server.yaml"]);

#[derive(Debug, Default, Deserialize, Serialize, Schema)]
struct Settings {
    app: App,
    server: Server,
}

#[derive(Debug, Default, Deserialize, Serialize, Schema)]
struct App {
    name: String,
    description: String,
}

#[derive(Debug, Default, Deserialize, Serialize, Schema)]
struct Server {
    name: String,
    port: u16,
    timeout: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let everything: Settings = cong::load_from_embedded("hello", &ASSETS, Format::Yaml)?;
    println!("{}", serde_json::to_string_pretty(&everything)?);
    let rooted: Settings =
        cong::load_from_embedded_by_path("hello", &ASSETS, "static", Format::Yaml)?;
    println!("{}", serde_json::to_string_pretty(&rooted)?);
    Ok(())
}
