use std::cmp::Ordering;
use std::ffi::OsString;

/// What an entry in the listing points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// The synthetic `..` row leading to the containing directory.
    Parent,
    Directory,
    File,
}

/// One row of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Lossy UTF-8 form, for display and sorting only.
    pub name: String,
    /// The name exactly as the filesystem reported it. Paths are built
    /// from this, never from `name`.
    pub raw: OsString,
    pub kind: EntryKind,
}

impl Entry {
    pub fn parent() -> Self {
        Self {
            name: String::from(".."),
            raw: OsString::from(".."),
            kind: EntryKind::Parent,
        }
    }

    pub fn new(name: impl Into<String>, is_directory: bool) -> Self {
        let name = name.into();
        Self::from_os(OsString::from(name), is_directory)
    }

    pub fn from_os(raw: OsString, is_directory: bool) -> Self {
        Self {
            name: raw.to_string_lossy().into_owned(),
            raw,
            kind: if is_directory {
                EntryKind::Directory
            } else {
                EntryKind::File
            },
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, EntryKind::Directory)
    }

    /// Name with control characters replaced so a hostile file name can't
    /// move the cursor or break the row.
    pub fn display_name(&self) -> String {
        self.name
            .chars()
            .map(|c| if c.is_control() { '?' } else { c })
            .collect()
    }
}

/// How the entries below the parent-marker are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Case-insensitive by name, directories and files interleaved.
    #[default]
    Alphabetical,
    /// Directories first, each group case-insensitive by name.
    DirectoriesFirst,
}

impl SortOrder {
    fn compare(self, a: &Entry, b: &Entry) -> Ordering {
        // Raw name as tie-break keeps `Foo` and `foo` in a stable order and
        // separates names that only collide after lossy conversion.
        let by_name = || {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.raw.cmp(&b.raw))
        };
        match self {
            SortOrder::Alphabetical => by_name(),
            SortOrder::DirectoriesFirst => b.is_dir().cmp(&a.is_dir()).then_with(by_name),
        }
    }
}

/// Turn raw directory contents into the ordered listing shown to the user:
/// parent-marker first (when there is a parent), then the entries sorted by
/// `order` and unique by name.
pub fn build_listing(
    raw: impl IntoIterator<Item = Entry>,
    has_parent: bool,
    order: SortOrder,
) -> Vec<Entry> {
    let mut entries: Vec<Entry> = raw
        .into_iter()
        .filter(|e| e.kind != EntryKind::Parent && e.raw != "." && e.raw != "..")
        .collect();
    entries.sort_by(|a, b| order.compare(a, b));
    entries.dedup_by(|a, b| a.raw == b.raw);

    if has_parent {
        entries.insert(0, Entry::parent());
    }
    entries
}
