use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::dir::{DirReader, DirSource};
use crate::nav::NavigationState;

/// What a key asks the browser to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveSelection(isize),
    EnterSelected,
    Quit,
    Ignore,
}

/// Whether the event loop keeps going after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Continue,
    Quit,
}

/// Map a key to an action. Only presses count; repeats and releases
/// (reported by some terminals) are ignored.
pub fn action_for(key: KeyEvent) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::Ignore;
    }
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => Action::Quit,
        (KeyCode::Up, _) => Action::MoveSelection(-1),
        (KeyCode::Down, _) => Action::MoveSelection(1),
        (KeyCode::Enter, _) => Action::EnterSelected,
        _ => Action::Ignore,
    }
}

/// Apply a key to the navigation state.
pub fn dispatch<R: DirReader>(
    key: KeyEvent,
    nav: &mut NavigationState,
    source: &DirSource<R>,
) -> Dispatch {
    let action = action_for(key);
    if action != Action::Ignore {
        log::debug!("key {:?} -> {action:?}", key.code);
    }

    match action {
        Action::MoveSelection(delta) => {
            nav.move_selection(delta);
        }
        Action::EnterSelected => {
            nav.enter_selected(source);
        }
        Action::Quit => return Dispatch::Quit,
        Action::Ignore => {}
    }
    Dispatch::Continue
}
