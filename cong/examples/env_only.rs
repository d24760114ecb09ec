//! Populates a configuration from environment variables alone.
//!
//! ```text
//! HELLO_SERVER_NAME=pam-pam HELLO_PORT=8080 HELLO_TIMEOUT=45 \
//!     cargo run --example env_only
//! ```
#![expect(clippy::print_stdout, reason = "demo output")]

use cong::{Schema, leaves};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize, Serialize, Schema)]
struct Hello {
    server_name: String,
    port: u16,
    timeout: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    for leaf in leaves::<Hello>("hello") {
        println!("{} <- {}", leaf.key, leaf.env_var);
    }
    let hello: Hello = cong::load_from_env("hello")?;
    println!("{}", serde_json::to_string_pretty(&hello)?);
    Ok(())
}
