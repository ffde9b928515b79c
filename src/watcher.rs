use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};

use crate::event::AppEvent;

/// Watches the directory currently on screen, non-recursively.
///
/// Dropping it stops watching.
pub struct DirWatcher {
    debouncer: Debouncer<RecommendedWatcher>,
    watched: PathBuf,
}

/// Start watching `dir`; each debounced batch of changes sends one
/// `AppEvent::FsChange`.
pub fn spawn(dir: &Path, debounce: Duration, tx: Sender<AppEvent>) -> Result<DirWatcher> {
    let mut debouncer = new_debouncer(debounce, move |res: DebounceEventResult| match res {
        Ok(events) if !events.is_empty() => {
            let _ = tx.send(AppEvent::FsChange);
        }
        Ok(_) => {}
        Err(e) => log::warn!("watch error: {e}"),
    })
    .context("failed to create directory watcher")?;

    debouncer
        .watcher()
        .watch(dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("failed to watch {}", dir.display()))?;

    Ok(DirWatcher {
        debouncer,
        watched: dir.to_path_buf(),
    })
}

impl DirWatcher {
    /// Move the watch to `dir` if the view changed directory.
    pub fn follow(&mut self, dir: &Path) -> Result<()> {
        if dir == self.watched {
            return Ok(());
        }
        // Watch the new path first so a failure leaves the old watch intact.
        self.debouncer
            .watcher()
            .watch(dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("failed to watch {}", dir.display()))?;
        if let Err(e) = self.debouncer.watcher().unwatch(&self.watched) {
            log::debug!("unwatch {}: {e}", self.watched.display());
        }
        self.watched = dir.to_path_buf();
        Ok(())
    }

    pub fn watched(&self) -> &Path {
        &self.watched
    }
}
