use ratatui::layout::Rect;

/// Below this many columns the screen can't hold two panes.
pub const MIN_WIDTH: u16 = 2;
pub const MIN_HEIGHT: u16 = 1;

/// The two fixed panes of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneLayout {
    /// Left half: debug log and error line.
    pub debug: Rect,
    /// Right half: path header and directory listing.
    pub directory: Rect,
}

/// Split a `width` x `height` screen into debug (left) and directory
/// (right) panes. An odd column goes to the directory pane. Screens too
/// small to split yield two zero-area rects, which the renderer skips.
pub fn compute(width: u16, height: u16) -> PaneLayout {
    if width < MIN_WIDTH || height < MIN_HEIGHT {
        return PaneLayout {
            debug: Rect::ZERO,
            directory: Rect::ZERO,
        };
    }

    let left = width / 2;
    PaneLayout {
        debug: Rect::new(0, 0, left, height),
        directory: Rect::new(left, 0, width - left, height),
    }
}
