//! IO collaborators: directory walking and byte reading.
//!
//! The loader never touches the filesystem directly. It asks a
//! [`DirWalker`] for the entries under a root and a [`ByteReader`] for the
//! contents of each selected entry. [`FsSource`] implements both over the
//! real filesystem and [`EmbeddedDir`] over files compiled into the binary.

mod embedded;
mod fs;

use std::io;

use camino::{Utf8Path, Utf8PathBuf};

pub use embedded::{EmbeddedDir, EmbeddedFile};
pub use fs::FsSource;

/// One entry produced by a [`DirWalker`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalkEntry {
    /// Path relative to the walked root.
    pub path: Utf8PathBuf,
    /// Whether the entry is a directory.
    pub is_dir: bool,
}

impl WalkEntry {
    /// Entry for a regular file.
    #[must_use]
    pub fn file(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_dir: false,
        }
    }

    /// Entry for a directory.
    #[must_use]
    pub fn dir(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_dir: true,
        }
    }
}

/// Recursively lists the entries below a root.
pub trait DirWalker {
    /// Every entry below `root`, descending into subdirectories, sorted
    /// lexicographically by path.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] when `root` or one of its subdirectories
    /// cannot be listed.
    fn walk(&self, root: &Utf8Path) -> io::Result<Vec<WalkEntry>>;
}

/// Reads the full contents of a file.
pub trait ByteReader {
    /// Bytes stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] when `path` cannot be read.
    fn read(&self, path: &Utf8Path) -> io::Result<Vec<u8>>;
}

/// Sort entries by their full path, compared as plain strings.
pub(crate) fn sort_entries(entries: &mut [WalkEntry]) {
    entries.sort_by(|a, b| a.path.as_str().cmp(b.path.as_str()));
}
