//! Dotenv documents. Keys stay flat: `SERVER_PORT=80` yields the key
//! `server_port`, not a nested mapping.

use super::Parser;
use crate::error::BoxError;
use crate::value::Value;

/// `KEY=value` files via `dotenvy`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DotenvParser;

impl Parser for DotenvParser {
    #[cfg(feature = "dotenv")]
    fn parse(&self, data: &[u8]) -> Result<Value, BoxError> {
        let mut map = crate::value::Mapping::new();
        for entry in dotenvy::from_read_iter(data) {
            let (key, value) = entry?;
            map.insert(key, Value::from(value));
        }
        Ok(Value::Mapping(map))
    }

    #[cfg(not(feature = "dotenv"))]
    fn parse(&self, _data: &[u8]) -> Result<Value, BoxError> {
        Err(super::disabled("dotenv"))
    }
}
