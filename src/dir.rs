use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::entry::{self, Entry, SortOrder};

/// Why a directory could not be listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryErrorKind {
    NotFound,
    PermissionDenied,
    Other(String),
}

/// A failed directory read. Always recovered by the caller: the view keeps
/// its last good listing and shows this message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryError {
    pub kind: DirectoryErrorKind,
    pub path: PathBuf,
}

impl DirectoryError {
    pub fn new(kind: DirectoryErrorKind, path: &Path) -> Self {
        Self {
            kind,
            path: path.to_path_buf(),
        }
    }

    pub fn from_io(path: &Path, err: &io::Error) -> Self {
        let kind = match err.kind() {
            io::ErrorKind::NotFound => DirectoryErrorKind::NotFound,
            io::ErrorKind::PermissionDenied => DirectoryErrorKind::PermissionDenied,
            _ => DirectoryErrorKind::Other(err.to_string()),
        };
        Self::new(kind, path)
    }
}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path.display();
        match &self.kind {
            DirectoryErrorKind::NotFound => write!(f, "{path}: no such directory"),
            DirectoryErrorKind::PermissionDenied => write!(f, "{path}: permission denied"),
            DirectoryErrorKind::Other(reason) => write!(f, "{path}: {reason}"),
        }
    }
}

impl std::error::Error for DirectoryError {}

/// Source of raw directory contents. Implemented over the real filesystem
/// by [`FsReader`]; tests substitute an in-memory map.
pub trait DirReader {
    /// List the entries of `path` in no particular order.
    fn list(&self, path: &Path) -> Result<Vec<Entry>, DirectoryError>;
}

/// Reads directories from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl DirReader for FsReader {
    fn list(&self, path: &Path) -> Result<Vec<Entry>, DirectoryError> {
        let read_dir = fs::read_dir(path).map_err(|e| DirectoryError::from_io(path, &e))?;

        let mut entries = Vec::new();
        for item in read_dir {
            match item {
                Ok(item) => {
                    entries.push(Entry::from_os(item.file_name(), is_directory(&item)));
                }
                Err(e) => log::warn!("skipping unreadable entry in {}: {e}", path.display()),
            }
        }
        Ok(entries)
    }
}

/// Follows symlinks, so a link to a directory can be entered. Falls back to
/// the link's own type when the target can't be stat'ed.
fn is_directory(item: &fs::DirEntry) -> bool {
    match fs::metadata(item.path()) {
        Ok(meta) => meta.is_dir(),
        Err(_) => item.file_type().map(|t| t.is_dir()).unwrap_or(false),
    }
}

/// A reader paired with the ordering applied to everything it returns.
pub struct DirSource<R> {
    reader: R,
    sort: SortOrder,
}

impl<R: DirReader> DirSource<R> {
    pub fn new(reader: R, sort: SortOrder) -> Self {
        Self { reader, sort }
    }

    /// Produce the full listing for `path`, parent-marker included.
    pub fn read(&self, path: &Path) -> Result<Vec<Entry>, DirectoryError> {
        let raw = self.reader.list(path)?;
        Ok(entry::build_listing(raw, path.parent().is_some(), self.sort))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryKind;

    #[test]
    fn fs_reader_lists_files_and_directories() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("a.txt"), "x").unwrap();
        fs::create_dir(tmp.path().join("b")).unwrap();

        let mut entries = FsReader.list(tmp.path()).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(
            entries,
            vec![Entry::new("a.txt", false), Entry::new("b", true)]
        );
    }

    #[cfg(unix)]
    #[test]
    fn fs_reader_follows_directory_symlinks() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("real")).unwrap();
        std::os::unix::fs::symlink(tmp.path().join("real"), tmp.path().join("link")).unwrap();
        std::os::unix::fs::symlink(tmp.path().join("gone"), tmp.path().join("dangling")).unwrap();

        let entries = FsReader.list(tmp.path()).unwrap();
        let kind_of = |name: &str| entries.iter().find(|e| e.name == name).map(|e| e.kind);

        assert_eq!(kind_of("link"), Some(EntryKind::Directory));
        assert_eq!(kind_of("dangling"), Some(EntryKind::File));
    }

    #[test]
    fn missing_directory_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope");

        let err = FsReader.list(&missing).unwrap_err();
        assert_eq!(err.kind, DirectoryErrorKind::NotFound);
        assert_eq!(err.path, missing);
    }

    #[test]
    fn io_error_kinds_map_to_directory_errors() {
        let path = Path::new("/x");
        let denied = io::Error::from(io::ErrorKind::PermissionDenied);
        assert_eq!(
            DirectoryError::from_io(path, &denied).kind,
            DirectoryErrorKind::PermissionDenied
        );

        let other = io::Error::other("disk on fire");
        let err = DirectoryError::from_io(path, &other);
        assert_eq!(err.kind, DirectoryErrorKind::Other("disk on fire".into()));
        assert_eq!(err.to_string(), "/x: disk on fire");
    }

    #[test]
    fn source_sorts_and_adds_parent_marker() {
        let source = DirSource::new(
            fake::FakeReader::new().dir("/tmp", &[("c", true), ("a.txt", false), ("b", true)]),
            SortOrder::Alphabetical,
        );

        let names: Vec<String> = source
            .read(Path::new("/tmp"))
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, ["..", "a.txt", "b", "c"]);
    }

    #[test]
    fn source_at_root_has_no_parent_marker() {
        let source = DirSource::new(
            fake::FakeReader::new().dir("/", &[("etc", true)]),
            SortOrder::Alphabetical,
        );

        let entries = source.read(Path::new("/")).unwrap();
        assert_eq!(entries, vec![Entry::new("etc", true)]);
    }
}
