use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use simplelog::LevelFilter;

use crate::entry::SortOrder;

#[derive(Parser, Debug)]
#[command(name = "dirpane", about = "Dual-pane terminal directory browser")]
pub struct Cli {
    /// Directory to start in (defaults to cwd)
    #[arg(default_value = ".")]
    pub dir: PathBuf,
}

/// Behaviour knobs that have no command-line flag.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Order of entries below the parent-marker.
    pub sort: SortOrder,
    /// Quiet period before a burst of filesystem events triggers a reload.
    pub watch_debounce: Duration,
    /// Most verbose level written to the debug pane.
    pub log_level: LevelFilter,
    /// Lines of history kept for the debug pane.
    pub log_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sort: SortOrder::Alphabetical,
            watch_debounce: Duration::from_millis(200),
            log_level: LevelFilter::Debug,
            log_capacity: 1000,
        }
    }
}
