//! Test helpers shared across crates in the workspace.
//!
//! Loader tests run inside a [`figment::Jail`] so that working directory
//! changes and injected environment variables are undone afterwards.

pub mod figment;
