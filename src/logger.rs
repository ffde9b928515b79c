use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

/// Bounded history of lines shown in the debug pane. Oldest lines are
/// dropped once `capacity` is reached.
#[derive(Debug)]
pub struct DebugLog {
    lines: VecDeque<String>,
    capacity: usize,
}

impl DebugLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line.into());
    }

    /// The newest `n` lines, oldest first.
    pub fn tail(&self, n: usize) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .skip(self.lines.len().saturating_sub(n))
            .map(String::as_str)
    }
}

/// Debug log shared between the logger (any thread) and the renderer.
pub type SharedLog = Arc<Mutex<DebugLog>>;

pub fn shared(capacity: usize) -> SharedLog {
    Arc::new(Mutex::new(DebugLog::new(capacity)))
}

/// Lock the log, ignoring poisoning: a panic mid-push leaves at worst a
/// missing line.
pub fn lock(log: &SharedLog) -> MutexGuard<'_, DebugLog> {
    log.lock().unwrap_or_else(PoisonError::into_inner)
}

/// `io::Write` sink that turns the logger's byte stream into pane lines.
/// Partial writes are held until their newline arrives.
pub struct PaneWriter {
    log: SharedLog,
    pending: String,
}

impl PaneWriter {
    pub fn new(log: SharedLog) -> Self {
        Self {
            log,
            pending: String::new(),
        }
    }
}

impl Write for PaneWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.push_str(&String::from_utf8_lossy(buf));
        while let Some(pos) = self.pending.find('\n') {
            let line: String = self.pending.drain(..=pos).collect();
            lock(&self.log).push(line.trim_end());
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Route the `log` facade into the debug pane. Times, targets and thread
/// ids are left out; the pane is too narrow for them.
pub fn init(log: SharedLog, level: LevelFilter) -> Result<()> {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .set_location_level(LevelFilter::Off)
        .build();
    WriteLogger::init(level, config, PaneWriter::new(log))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oldest_lines_fall_off() {
        let mut log = DebugLog::new(3);
        for i in 0..5 {
            log.push(format!("line {i}"));
        }
        assert_eq!(log.tail(usize::MAX).count(), 3);
        assert_eq!(log.tail(10).collect::<Vec<_>>(), ["line 2", "line 3", "line 4"]);
    }

    #[test]
    fn tail_returns_newest_in_order() {
        let mut log = DebugLog::new(10);
        for line in ["a", "b", "c", "d"] {
            log.push(line);
        }
        assert_eq!(log.tail(2).collect::<Vec<_>>(), ["c", "d"]);
        assert_eq!(log.tail(0).count(), 0);
    }

    #[test]
    fn writer_buffers_until_newline() {
        let log = shared(10);
        let mut writer = PaneWriter::new(Arc::clone(&log));

        write!(writer, "[INFO] ").unwrap();
        write!(writer, "chdir /tmp").unwrap();
        assert_eq!(lock(&log).tail(10).count(), 0);

        write!(writer, "\n[WARN] one\r\n[DEBUG] two\npartial").unwrap();
        let lines: Vec<String> = lock(&log).tail(10).map(String::from).collect();
        assert_eq!(lines, ["[INFO] chdir /tmp", "[WARN] one", "[DEBUG] two"]);
    }
}
