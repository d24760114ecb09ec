//! Filesystem collaborator: `walkdir` lists trees, `cap-std` reads files.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use walkdir::WalkDir;

use super::{ByteReader, DirWalker, WalkEntry, sort_entries};

/// Reads configuration from the real filesystem.
///
/// Relative paths resolve against the current working directory.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsSource;

impl FsSource {
    /// Returns `true` when `path` names an existing regular file.
    #[must_use]
    pub fn is_file(&self, path: &Utf8Path) -> bool {
        open_parent_dir_and_name(path).is_ok_and(|(dir, name)| dir.is_file(name))
    }
}

impl DirWalker for FsSource {
    fn walk(&self, root: &Utf8Path) -> io::Result<Vec<WalkEntry>> {
        let mut entries = Vec::new();
        for item in WalkDir::new(root).min_depth(1) {
            let entry = item?;
            let path = relative_utf8(root, entry.path())?;
            entries.push(if entry.file_type().is_dir() {
                WalkEntry::dir(path)
            } else {
                WalkEntry::file(path)
            });
        }
        sort_entries(&mut entries);
        Ok(entries)
    }
}

impl ByteReader for FsSource {
    fn read(&self, path: &Utf8Path) -> io::Result<Vec<u8>> {
        let (dir, name) = open_parent_dir_and_name(path)?;
        dir.read(name)
    }
}

/// `path` relative to `root`, as a UTF-8 path.
fn relative_utf8(root: &Utf8Path, path: &std::path::Path) -> io::Result<Utf8PathBuf> {
    let relative = path
        .strip_prefix(root)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    Utf8PathBuf::try_from(relative.to_path_buf())
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}

/// Parent directory of `path`, or `.` when it has none.
fn parent_or_dot(path: &Utf8Path) -> &Utf8Path {
    path.parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."))
}

/// Open the parent directory of `path` and return it with the file name.
fn open_parent_dir_and_name(path: &Utf8Path) -> io::Result<(Dir, String)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("'{path}' has no file name"))
        })?;
    let dir = Dir::open_ambient_dir(parent_or_dot(path), ambient_authority())?;
    Ok((dir, file_name.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result, anyhow, ensure};
    use tempfile::TempDir;

    fn utf8(dir: &TempDir) -> Result<Utf8PathBuf> {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .map_err(|path| anyhow!("temporary directory is not UTF-8: {path:?}"))
    }

    #[test]
    fn walk_descends_and_sorts() -> Result<()> {
        let temp = TempDir::new().context("create temp dir")?;
        let root = utf8(&temp)?;
        std::fs::create_dir_all(root.join("nested/deeper"))?;
        std::fs::write(root.join("b.yaml"), "b: 1")?;
        std::fs::write(root.join("a.yaml"), "a: 1")?;
        std::fs::write(root.join("nested/deeper/c.yaml"), "c: 1")?;
        std::fs::create_dir_all(root.join("a"))?;
        std::fs::write(root.join("a/z.yaml"), "z: 1")?;

        let entries = FsSource.walk(&root)?;
        let expected = vec![
            WalkEntry::dir("a"),
            WalkEntry::file("a.yaml"),
            WalkEntry::file("a/z.yaml"),
            WalkEntry::file("b.yaml"),
            WalkEntry::dir("nested"),
            WalkEntry::dir("nested/deeper"),
            WalkEntry::file("nested/deeper/c.yaml"),
        ];
        ensure!(entries == expected, "unexpected entries: {entries:?}");

        let bytes = FsSource.read(&root.join("nested/deeper/c.yaml"))?;
        ensure!(bytes == b"c: 1", "unexpected contents");
        ensure!(FsSource.is_file(&root.join("a.yaml")), "a.yaml should exist");
        ensure!(!FsSource.is_file(&root.join("nested")), "directories are not files");
        Ok(())
    }

    #[test]
    fn missing_root_is_an_error() -> Result<()> {
        let temp = TempDir::new().context("create temp dir")?;
        let root = utf8(&temp)?;
        let err = FsSource.walk(&root.join("absent")).err();
        ensure!(
            err.as_ref().map(io::Error::kind) == Some(io::ErrorKind::NotFound),
            "unexpected result: {err:?}"
        );
        Ok(())
    }
}
