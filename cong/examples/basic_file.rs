//! Loads `hello.yaml` from the demo `cfg` directory.
//!
//! Run with `HELLO_PORT=8080 cargo run --example basic_file` to see an
//! environment variable override the file.
#![expect(clippy::print_stdout, reason = "demo output")]

use cong::{CongError, Format, Schema};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize, Serialize, Schema)]
struct Hello {
    server_name: String,
    port: u16,
    timeout: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/examples/cfg");
    let hello: Hello = cong::load("hello", Format::Yaml, &[dir])?;
    println!("{}", serde_json::to_string_pretty(&hello)?);
    let missing = cong::load::<Hello>("hello", Format::Toml, &[dir]).err();
    if let Some(err @ CongError::NotFound { .. }) = missing {
        println!("as expected: {err}");
    }
    Ok(())
}
