use std::sync::mpsc::Sender;
use std::thread;

use crossterm::event::{self as ct_event, Event, KeyEvent};

/// All events funnelled through the main loop's mpsc channel.
#[derive(Debug)]
pub enum AppEvent {
    /// A keypress from the terminal-reading thread.
    Key(KeyEvent),
    /// The terminal was resized to the given columns and rows.
    Resize(u16, u16),
    /// The watched directory changed on disk (debounced).
    FsChange,
    /// Reading terminal input failed; nothing more will arrive.
    InputError(String),
}

/// Read key and resize events on a dedicated thread. The thread exits when
/// the receiver is gone or the terminal stops delivering events.
pub fn spawn_terminal_reader(tx: Sender<AppEvent>) -> thread::JoinHandle<()> {
    thread::spawn(move || loop {
        let event = match ct_event::read() {
            Ok(Event::Key(key)) => AppEvent::Key(key),
            Ok(Event::Resize(cols, rows)) => AppEvent::Resize(cols, rows),
            Ok(_) => continue,
            Err(e) => {
                let _ = tx.send(AppEvent::InputError(e.to_string()));
                break;
            }
        };
        if tx.send(event).is_err() {
            break;
        }
    })
}
