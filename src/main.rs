mod app;
mod config;
mod dir;
mod entry;
mod event;
mod input;
mod layout;
mod logger;
mod nav;
mod ui;
mod watcher;

use std::io::{self, Stdout};
use std::sync::{mpsc, Arc};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::app::{App, LoopState};
use crate::config::{Cli, Settings};
use crate::dir::{DirSource, FsReader};
use crate::event::AppEvent;
use crate::nav::NavigationState;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::default();

    // ── Initial directory ───────────────────────────────────────
    let start = cli
        .dir
        .canonicalize()
        .with_context(|| format!("cannot open {}", cli.dir.display()))?;
    let source = DirSource::new(FsReader, settings.sort);
    let nav = NavigationState::load(&source, &start)?;

    let log = logger::shared(settings.log_capacity);
    logger::init(Arc::clone(&log), settings.log_level)?;
    log::info!("dirpane {} in {}", env!("CARGO_PKG_VERSION"), start.display());
    let mut app = App::new(nav, source, log);

    // ── Terminal setup ──────────────────────────────────────────
    let mut guard = RawModeGuard::enter().context("failed to set up the terminal")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    // Panic hook: restore terminal before printing the panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    // ── Run ─────────────────────────────────────────────────────
    let result = run(&mut terminal, &mut app, &settings);

    // ── Terminal teardown ───────────────────────────────────────
    let restored = guard.release();

    first_error(result, restored)
}

/// Report the run's own failure ahead of a teardown failure; the run
/// error is usually the cause of both.
fn first_error(result: Result<()>, restored: Result<()>) -> Result<()> {
    result.and(restored)
}

/// Raw mode and the alternate screen, held for as long as the value
/// lives. Dropping it restores the terminal on every exit path.
struct RawModeGuard {
    active: bool,
}

impl RawModeGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        // From here on, Drop undoes whatever part of setup succeeded.
        let guard = Self { active: true };
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        Ok(guard)
    }

    /// Restore the terminal now, reporting failures.
    fn release(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        restore_terminal().context("failed to restore the terminal")
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.active {
            let _ = restore_terminal();
        }
    }
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, Show)
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App<FsReader>,
    settings: &Settings,
) -> Result<()> {
    let (tx, rx) = mpsc::channel::<AppEvent>();

    // ── Keyboard + resize thread ────────────────────────────────
    event::spawn_terminal_reader(tx.clone());

    // ── Directory watcher ───────────────────────────────────────
    let mut dir_watcher = match watcher::spawn(app.nav.path(), settings.watch_debounce, tx) {
        Ok(w) => Some(w),
        Err(e) => {
            log::warn!("live refresh disabled: {e:#}");
            None
        }
    };

    // ── Main event loop ─────────────────────────────────────────
    redraw(terminal, app);

    while let Ok(event) = rx.recv() {
        if app.handle_event(event)? == LoopState::Terminated {
            break;
        }

        if let Some(w) = dir_watcher.as_mut() {
            if let Err(e) = w.follow(app.nav.path()) {
                log::warn!("{e:#} (still watching {})", w.watched().display());
            }
        }

        redraw(terminal, app);
    }

    Ok(())
}

/// Draw one frame. A failed write is logged to the debug pane and the
/// loop carries on; the next event triggers another attempt.
fn redraw(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App<FsReader>) {
    if let Err(e) = terminal.draw(|frame| app.draw(frame)) {
        log::error!("redraw failed: {e}");
    }
}
