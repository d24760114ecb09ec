//! Files compiled into the binary.

use std::collections::BTreeSet;
use std::io;

use camino::Utf8Path;

use super::{ByteReader, DirWalker, WalkEntry, sort_entries};

/// A single embedded file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmbeddedFile {
    /// Path of the file inside the embedded tree, `/`-separated.
    pub path: &'static str,
    /// File contents.
    pub contents: &'static [u8],
}

/// A read-only tree of files embedded with `include_bytes!`.
///
/// Build one with [`embedded_dir!`](crate::embedded_dir), or by hand from a
/// static table. The root is `.` (or the empty string); walking a
/// subdirectory lists paths relative to it.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use cong::{ByteReader, DirWalker, EmbeddedDir, EmbeddedFile};
///
/// static FILES: &[EmbeddedFile] = &[
///     EmbeddedFile { path: "config/app.yaml", contents: b"app: {name: demo}" },
///     EmbeddedFile { path: "config/db.yaml", contents: b"db: {port: 5432}" },
/// ];
/// let assets = EmbeddedDir::new(FILES);
///
/// let entries = assets.walk(Utf8Path::new("config"))?;
/// assert_eq!(entries.len(), 2);
/// assert_eq!(assets.read(Utf8Path::new("./config/db.yaml"))?, b"db: {port: 5432}");
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct EmbeddedDir {
    files: &'static [EmbeddedFile],
}

impl EmbeddedDir {
    /// Wrap a static file table.
    #[must_use]
    pub const fn new(files: &'static [EmbeddedFile]) -> Self {
        Self { files }
    }

    /// Every embedded file.
    #[must_use]
    pub const fn files(&self) -> &'static [EmbeddedFile] {
        self.files
    }
}

/// Strip `./` prefixes and surrounding slashes; `.` means the root.
fn normalise(path: &str) -> &str {
    let trimmed = path.trim_start_matches("./").trim_matches('/');
    if trimmed == "." { "" } else { trimmed }
}

impl DirWalker for EmbeddedDir {
    fn walk(&self, root: &Utf8Path) -> io::Result<Vec<WalkEntry>> {
        let base = normalise(root.as_str());
        let mut dirs = BTreeSet::new();
        let mut entries = Vec::new();
        for file in self.files {
            let path = normalise(file.path);
            if path == base {
                return Err(io::Error::new(
                    io::ErrorKind::NotADirectory,
                    format!("embedded path '{base}' is a file"),
                ));
            }
            let relative = if base.is_empty() {
                path
            } else {
                match path.strip_prefix(base).and_then(|rest| rest.strip_prefix('/')) {
                    Some(rest) => rest,
                    None => continue,
                }
            };
            let mut parent = Utf8Path::new(relative).parent();
            while let Some(dir) = parent.filter(|dir| !dir.as_str().is_empty()) {
                dirs.insert(dir.to_owned());
                parent = dir.parent();
            }
            entries.push(WalkEntry::file(relative));
        }
        if entries.is_empty() && !base.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no embedded directory '{base}'"),
            ));
        }
        entries.extend(dirs.into_iter().map(WalkEntry::dir));
        sort_entries(&mut entries);
        Ok(entries)
    }
}

impl ByteReader for EmbeddedDir {
    fn read(&self, path: &Utf8Path) -> io::Result<Vec<u8>> {
        let wanted = normalise(path.as_str());
        self.files
            .iter()
            .find(|file| normalise(file.path) == wanted)
            .map(|file| file.contents.to_vec())
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, format!("no embedded file '{wanted}'"))
            })
    }
}

/// Build an [`EmbeddedDir`] from files under the crate's manifest directory.
///
/// Paths are relative to `CARGO_MANIFEST_DIR`. With a `base => [...]` form,
/// the listed paths are relative to `base` and are stored without it.
///
/// ```ignore
/// static ASSETS: cong::EmbeddedDir = cong::embedded_dir!("config" => ["app.yaml", "db.yaml"]);
/// ```
#[macro_export]
macro_rules! embedded_dir {
    ($base:literal => [$($path:literal),* $(,)?]) => {{
        static FILES: &[$crate::EmbeddedFile] = &[$(
            $crate::EmbeddedFile {
                path: $path,
                contents: include_bytes!(concat!(
                    env!("CARGO_MANIFEST_DIR"), "/", $base, "/", $path
                )),
            }
        ),*];
        $crate::EmbeddedDir::new(FILES)
    }};
    ($($path:literal),* $(,)?) => {{
        static FILES: &[$crate::EmbeddedFile] = &[$(
            $crate::EmbeddedFile {
                path: $path,
                contents: include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/", $path)),
            }
        ),*];
        $crate::EmbeddedDir::new(FILES)
    }};
}
