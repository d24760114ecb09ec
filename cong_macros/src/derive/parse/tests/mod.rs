//! Unit tests for derive input parsing.

mod serde_attrs;
mod type_utils;
