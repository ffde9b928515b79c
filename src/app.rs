use anyhow::{anyhow, Result};
use ratatui::Frame;

use crate::dir::{DirReader, DirSource};
use crate::event::AppEvent;
use crate::input::{self, Dispatch};
use crate::logger::{self, SharedLog};
use crate::nav::NavigationState;
use crate::ui;

/// Event loop state. `Terminated` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Terminated,
}

/// Central application state, owned exclusively by the main thread.
pub struct App<R> {
    /// What the directory pane shows.
    pub nav: NavigationState,
    /// Where listings come from.
    pub source: DirSource<R>,
    /// Lines for the debug pane; also written by the logger.
    pub log: SharedLog,
    pub state: LoopState,
}

impl<R: DirReader> App<R> {
    pub fn new(nav: NavigationState, source: DirSource<R>, log: SharedLog) -> Self {
        Self {
            nav,
            source,
            log,
            state: LoopState::Running,
        }
    }

    /// Apply one event. The caller redraws afterwards unless the result is
    /// `Terminated`. Lost terminal input is the only error: the loop can't
    /// go on without it.
    pub fn handle_event(&mut self, event: AppEvent) -> Result<LoopState> {
        if self.state == LoopState::Terminated {
            return Ok(self.state);
        }

        match event {
            AppEvent::Key(key) => {
                if input::dispatch(key, &mut self.nav, &self.source) == Dispatch::Quit {
                    log::info!("quit");
                    self.state = LoopState::Terminated;
                }
            }
            AppEvent::Resize(cols, rows) => {
                // Layout is recomputed from the frame on the next draw.
                log::debug!("resize {cols}x{rows} scroll {}", self.nav.scroll_offset());
            }
            AppEvent::FsChange => {
                self.nav.reload(&self.source);
            }
            AppEvent::InputError(e) => {
                self.state = LoopState::Terminated;
                return Err(anyhow!("terminal input failed: {e}"));
            }
        }
        Ok(self.state)
    }

    /// Render the current state into `frame`.
    pub fn draw(&mut self, frame: &mut Frame) {
        // Held for the whole draw; nothing below may log.
        let log = logger::lock(&self.log);
        ui::draw(frame, &mut self.nav, &log);
    }
}
