use std::path::{Path, PathBuf};

use crate::dir::{DirReader, DirSource, DirectoryError};
use crate::entry::{Entry, EntryKind};

/// Result of `enter_selected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterOutcome {
    /// The view now shows a different directory.
    Changed,
    /// The target could not be read; the old listing stays, error recorded.
    Failed,
    /// Nothing to enter (plain file, or empty listing).
    Ignored,
}

/// Where the directory pane is: path, listing, cursor and scroll.
///
/// Owned by the event loop and only changed through the methods below.
#[derive(Debug, Clone)]
pub struct NavigationState {
    path: PathBuf,
    entries: Vec<Entry>,
    selected: usize,
    scroll: usize,
    error: Option<DirectoryError>,
}

impl NavigationState {
    /// Read `path` into a fresh state with the cursor on the first row.
    pub fn load<R: DirReader>(source: &DirSource<R>, path: &Path) -> Result<Self, DirectoryError> {
        let entries = source.read(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            entries,
            selected: 0,
            scroll: 0,
            error: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&Entry> {
        self.entries.get(self.selected)
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll
    }

    pub fn error(&self) -> Option<&DirectoryError> {
        self.error.as_ref()
    }

    /// Replace the whole state with a listing of `path`. On failure the
    /// current listing is kept and the error recorded for display.
    pub fn change_dir<R: DirReader>(&mut self, source: &DirSource<R>, path: &Path) -> bool {
        match Self::load(source, path) {
            Ok(next) => {
                log::info!("chdir {}", path.display());
                *self = next;
                true
            }
            Err(e) => {
                log::warn!("{e}");
                self.error = Some(e);
                false
            }
        }
    }

    /// Re-read the current directory, keeping the cursor on the same name
    /// when it still exists.
    pub fn reload<R: DirReader>(&mut self, source: &DirSource<R>) -> bool {
        let path = self.path.clone();
        match Self::load(source, &path) {
            Ok(mut next) => {
                let raw = self.selected().map(|e| e.raw.as_os_str());
                next.selected = raw
                    .and_then(|r| next.entries.iter().position(|e| e.raw.as_os_str() == r))
                    .unwrap_or_else(|| self.selected.min(next.entries.len().saturating_sub(1)));
                next.scroll = self.scroll;
                log::debug!("reloaded {} ({} entries)", path.display(), next.entries.len());
                *self = next;
                true
            }
            Err(e) => {
                log::warn!("reload failed: {e}");
                self.error = Some(e);
                false
            }
        }
    }

    /// Move the cursor by `delta` rows, clamped to the listing.
    pub fn move_selection(&mut self, delta: isize) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        let last = self.entries.len() - 1;
        let target = self.selected.saturating_add_signed(delta).min(last);
        if target == self.selected {
            log::debug!("selection stays at {} of {}", self.selected, self.entries.len());
            return false;
        }
        self.selected = target;
        log::debug!("select {} scroll {}", self.selected, self.scroll);
        true
    }

    /// Follow the selected entry: `..` goes up, a directory goes down, a
    /// plain file is left alone.
    pub fn enter_selected<R: DirReader>(&mut self, source: &DirSource<R>) -> EnterOutcome {
        let Some(entry) = self.selected() else {
            return EnterOutcome::Ignored;
        };
        let target = match entry.kind {
            EntryKind::Parent => match self.path.parent() {
                Some(parent) => parent.to_path_buf(),
                None => return EnterOutcome::Ignored,
            },
            EntryKind::Directory => self.path.join(&entry.raw),
            EntryKind::File => {
                log::debug!("not a directory: {}", self.path.join(&entry.raw).display());
                return EnterOutcome::Ignored;
            }
        };

        if self.change_dir(source, &target) {
            EnterOutcome::Changed
        } else {
            EnterOutcome::Failed
        }
    }

    /// Adjust the scroll offset so the cursor sits inside a window of
    /// `visible` rows, and return it. Must not log: the renderer calls it
    /// while holding the debug log.
    pub fn scroll_into_view(&mut self, visible: usize) -> usize {
        if visible == 0 {
            return self.scroll;
        }
        self.scroll = self.scroll.min(self.entries.len().saturating_sub(visible));
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + visible {
            self.scroll = self.selected + 1 - visible;
        }
        self.scroll
    }
}
