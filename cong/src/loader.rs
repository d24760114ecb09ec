//! Loader facade: the four entry modes plus environment-only loading.
//!
//! Every mode runs the same pipeline: create a [`Store`], configure the
//! prefix and key replacer, bind every leaf of the target type, discover and
//! merge documents, then materialize.

use std::marker::PhantomData;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{CongError, CongResult};
use crate::format::Format;
use crate::introspect;
use crate::parser::ParserRegistry;
use crate::schema::Schema;
use crate::source::{ByteReader, DirWalker, FsSource, sort_entries};
use crate::store::{EnvKeyReplacer, Store};

/// Directories searched by [`Loader::load`] when none are given.
pub const DEFAULT_SEARCH_PATHS: [&str; 3] = [".", "./config", "./static"];

/// Types a [`Loader`] can produce.
///
/// Implemented for every type that describes its fields with [`Schema`], can
/// be written and read through `serde`, and has a [`Default`] standing in for
/// its zero value.
pub trait Target: Schema + Serialize + DeserializeOwned + Default {}

impl<T> Target for T where T: Schema + Serialize + DeserializeOwned + Default {}

/// Loads configuration values of type `T`.
///
/// # Examples
///
/// ```no_run
/// use cong::{Format, Loader, Schema};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Default, Deserialize, Serialize, Schema)]
/// struct Hello {
///     server_name: String,
///     port: u16,
///     timeout: u32,
/// }
///
/// let hello: Hello = Loader::new().load("hello", Format::Yaml, &["./cfg"])?;
/// # Ok::<(), cong::CongError>(())
/// ```
pub struct Loader<T> {
    parsers: ParserRegistry,
    target: PhantomData<fn() -> T>,
}

impl<T> Default for Loader<T> {
    fn default() -> Self {
        Self::with_parsers(ParserRegistry::default())
    }
}

impl<T> std::fmt::Debug for Loader<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader")
            .field("target", &std::any::type_name::<T>())
            .field("parsers", &self.parsers)
            .finish()
    }
}

impl<T> Loader<T> {
    /// Loader with the built-in parsers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader using `parsers` instead of the built-in registry.
    #[must_use]
    pub const fn with_parsers(parsers: ParserRegistry) -> Self {
        Self {
            parsers,
            target: PhantomData,
        }
    }

    /// Registry used to parse documents.
    #[must_use]
    pub const fn parsers(&self) -> &ParserRegistry {
        &self.parsers
    }
}

impl<T: Target> Loader<T> {
    /// Load `<prefix>.<extension>` from the first search directory that
    /// contains it.
    ///
    /// An empty `search_paths` means [`DEFAULT_SEARCH_PATHS`].
    ///
    /// # Errors
    ///
    /// Returns [`CongError::NotFound`] when no directory holds the file, and
    /// any read, parse, binding or coercion failure.
    pub fn load(&self, prefix: &str, format: Format, search_paths: &[&str]) -> CongResult<T> {
        let mut store = prepare::<T>(prefix)?;
        let file_name = format!("{prefix}.{}", format.extension());
        let dirs = if search_paths.is_empty() {
            DEFAULT_SEARCH_PATHS.as_slice()
        } else {
            search_paths
        };
        let found = dirs
            .iter()
            .map(|dir| Utf8Path::new(dir).join(&file_name))
            .find(|candidate| FsSource.is_file(candidate));
        let Some(path) = found else {
            return Err(CongError::NotFound {
                file_name,
                searched: dirs.iter().map(Utf8PathBuf::from).collect(),
            });
        };
        self.merge_file(&mut store, &FsSource, &path, format)?;
        store.materialize()
    }

    /// Merge every `*.<extension>` file below `dir`, in lexicographic path
    /// order.
    ///
    /// `prefix` only affects environment variable names.
    ///
    /// # Errors
    ///
    /// Returns [`CongError::Io`] when `dir` cannot be walked, and any read,
    /// parse, binding or coercion failure.
    pub fn load_from_dir(
        &self,
        prefix: &str,
        dir: impl AsRef<Utf8Path>,
        format: Format,
    ) -> CongResult<T> {
        let mut store = prepare::<T>(prefix)?;
        self.merge_tree(&mut store, &FsSource, dir.as_ref(), format)?;
        store.materialize()
    }

    /// Like [`Loader::load_from_dir`], reading from an embedded file tree
    /// rooted at its top level.
    ///
    /// # Errors
    ///
    /// As for [`Loader::load_from_dir`].
    pub fn load_from_embedded<S>(&self, prefix: &str, assets: &S, format: Format) -> CongResult<T>
    where
        S: DirWalker + ByteReader,
    {
        self.load_from_embedded_by_path(prefix, assets, ".", format)
    }

    /// Like [`Loader::load_from_embedded`], rooted at `path`.
    ///
    /// # Errors
    ///
    /// As for [`Loader::load_from_dir`].
    pub fn load_from_embedded_by_path<S>(
        &self,
        prefix: &str,
        assets: &S,
        path: impl AsRef<Utf8Path>,
        format: Format,
    ) -> CongResult<T>
    where
        S: DirWalker + ByteReader,
    {
        let mut store = prepare::<T>(prefix)?;
        self.merge_tree(&mut store, assets, path.as_ref(), format)?;
        store.materialize()
    }

    /// Populate `T` from environment variables alone.
    ///
    /// # Errors
    ///
    /// Returns binding and coercion failures.
    pub fn load_from_env(&self, prefix: &str) -> CongResult<T> {
        let mut store = prepare::<T>(prefix)?;
        store.materialize()
    }

    fn merge_tree<S>(
        &self,
        store: &mut Store,
        source: &S,
        root: &Utf8Path,
        format: Format,
    ) -> CongResult<()>
    where
        S: DirWalker + ByteReader,
    {
        let mut entries = source.walk(root).map_err(|err| CongError::io(root, err))?;
        sort_entries(&mut entries);
        let matching: Vec<_> = entries
            .into_iter()
            .filter(|entry| {
                !entry.is_dir
                    && entry
                        .path
                        .file_name()
                        .is_some_and(|name| format.matches_file_name(name))
            })
            .collect();
        debug!(%root, %format, count = matching.len(), "discovered configuration documents");
        for entry in matching {
            self.merge_file(store, source, &root.join(&entry.path), format)?;
        }
        Ok(())
    }

    fn merge_file<R>(
        &self,
        store: &mut Store,
        reader: &R,
        path: &Utf8Path,
        format: Format,
    ) -> CongResult<()>
    where
        R: ByteReader,
    {
        let bytes = reader.read(path).map_err(|err| CongError::io(path, err))?;
        let document = self.parsers.parse(format, path, &bytes)?;
        debug!(%path, "merging configuration document");
        store.merge_document(document)
    }
}

fn prepare<T: Schema>(prefix: &str) -> CongResult<Store> {
    let mut store = Store::new();
    store.set_env_prefix(prefix)?;
    store.set_env_key_replacer(EnvKeyReplacer::dots_to_underscores())?;
    store.auto_env(true)?;
    introspect::bind::<T>(&mut store, prefix)?;
    Ok(store)
}

/// Load `<prefix>.<extension>` with the built-in parsers.
///
/// # Errors
///
/// See [`Loader::load`].
pub fn load<T: Target>(prefix: &str, format: Format, search_paths: &[&str]) -> CongResult<T> {
    Loader::new().load(prefix, format, search_paths)
}

/// Merge every matching file below `dir` with the built-in parsers.
///
/// # Errors
///
/// See [`Loader::load_from_dir`].
pub fn load_from_dir<T: Target>(
    prefix: &str,
    dir: impl AsRef<Utf8Path>,
    format: Format,
) -> CongResult<T> {
    Loader::new().load_from_dir(prefix, dir, format)
}

/// Merge every matching embedded file with the built-in parsers.
///
/// # Errors
///
/// See [`Loader::load_from_embedded`].
pub fn load_from_embedded<T, S>(prefix: &str, assets: &S, format: Format) -> CongResult<T>
where
    T: Target,
    S: DirWalker + ByteReader,
{
    Loader::new().load_from_embedded(prefix, assets, format)
}

/// Merge every matching embedded file below `path` with the built-in parsers.
///
/// # Errors
///
/// See [`Loader::load_from_embedded_by_path`].
pub fn load_from_embedded_by_path<T, S>(
    prefix: &str,
    assets: &S,
    path: impl AsRef<Utf8Path>,
    format: Format,
) -> CongResult<T>
where
    T: Target,
    S: DirWalker + ByteReader,
{
    Loader::new().load_from_embedded_by_path(prefix, assets, path, format)
}

/// Populate `T` from environment variables alone.
///
/// # Errors
///
/// See [`Loader::load_from_env`].
pub fn load_from_env<T: Target>(prefix: &str) -> CongResult<T> {
    Loader::new().load_from_env(prefix)
}
