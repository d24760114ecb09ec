//! Shared helpers for working with `figment::Jail` in tests.
//!
//! A jail gives each test a fresh temporary working directory and restores
//! any environment variables it sets. These helpers run a closure inside a
//! jail and lay out configuration trees on disk.

use std::cell::RefCell;
use std::fs;

use anyhow::{Result, anyhow};

/// Executes `f` inside a [`figment::Jail`], returning the closure's output.
///
/// The jail is torn down once the closure completes, even when the closure
/// returns an error. That error is returned unchanged rather than flattened
/// into a string, so callers can downcast it.
///
/// # Errors
///
/// Returns the closure's error, or an error when the jail cannot be set up.
pub fn in_jail<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut figment::Jail) -> Result<T>,
{
    let output = RefCell::new(None);
    let error: RefCell<Option<anyhow::Error>> = RefCell::new(None);
    figment::Jail::try_with(|j| {
        match f(j) {
            Ok(result) => {
                output.replace(Some(result));
            }
            Err(err) => {
                error.replace(Some(err));
            }
        }
        Ok(())
    })
    .map_err(|err| anyhow!(err))?;

    error.into_inner().map_or_else(
        || {
            output
                .into_inner()
                .ok_or_else(|| anyhow!("jail closure did not produce a result"))
        },
        Err,
    )
}

/// Writes each `(relative path, contents)` pair below the jail directory,
/// creating parent directories as needed.
///
/// # Errors
///
/// Returns an error when a directory or file cannot be created.
///
/// # Examples
///
/// ```
/// use test_helpers::figment::{in_jail, write_tree};
///
/// let written = in_jail(|jail| {
///     write_tree(jail, &[("cfg/app.yaml", "app:\n  name: demo\n")])?;
///     Ok(jail.directory().join("cfg/app.yaml").is_file())
/// });
/// assert!(matches!(written, Ok(true)));
/// ```
pub fn write_tree(jail: &figment::Jail, files: &[(&str, &str)]) -> figment::error::Result<()> {
    for (relative, contents) in files {
        let path = jail.directory().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(figment_error)?;
        }
        fs::write(&path, contents).map_err(figment_error)?;
    }
    Ok(())
}

/// Converts any error implementing [`ToString`] into a [`figment::Error`].
#[expect(
    clippy::needless_pass_by_value,
    reason = "callers often own the error and passing by value avoids extra clones"
)]
pub fn figment_error<E: ToString>(err: E) -> figment::Error {
    figment::Error::from(err.to_string())
}
