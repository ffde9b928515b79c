use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::dir::DirectoryError;
use crate::entry::{Entry, EntryKind};
use crate::layout;
use crate::logger::DebugLog;
use crate::nav::NavigationState;

const ELLIPSIS: char = '…';

/// Render the full TUI frame: debug pane on the left, directory on the
/// right. Only touches the frame buffer and the scroll offset.
pub fn draw(frame: &mut Frame, nav: &mut NavigationState, log: &DebugLog) {
    let area = frame.area();
    let panes = layout::compute(area.width, area.height);

    draw_debug_pane(frame, panes.debug, nav.error(), log);
    draw_directory_pane(frame, panes.directory, nav);
}

// ── Debug pane ──────────────────────────────────────────────────

fn draw_debug_pane(frame: &mut Frame, area: Rect, error: Option<&DirectoryError>, log: &DebugLog) {
    if area.is_empty() {
        return;
    }
    let width = usize::from(area.width);

    let mut lines = Vec::new();
    if let Some(err) = error {
        lines.push(Line::styled(
            truncate_end(&format!("error: {err}"), width),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    let room = usize::from(area.height).saturating_sub(lines.len());
    lines.extend(log.tail(room).map(|l| Line::raw(truncate_end(&sanitize(l), width))));

    frame.render_widget(Paragraph::new(lines), area);
}

// ── Directory pane ──────────────────────────────────────────────

fn draw_directory_pane(frame: &mut Frame, area: Rect, nav: &mut NavigationState) {
    if area.is_empty() {
        return;
    }
    let width = usize::from(area.width);

    let header = Rect { height: 1, ..area };
    let path = nav.path().display().to_string();
    let header_line = Line::from(Span::styled(
        truncate_start(&sanitize(&path), width),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(header_line), header);

    let list = Rect {
        y: area.y + 1,
        height: area.height - 1,
        ..area
    };
    if list.is_empty() {
        return;
    }

    let rows = usize::from(list.height);
    let offset = nav.scroll_into_view(rows);
    let selected = nav.selected_index();
    let lines: Vec<Line> = nav
        .entries()
        .iter()
        .enumerate()
        .skip(offset)
        .take(rows)
        .map(|(i, entry)| entry_line(entry, i == selected, width))
        .collect();

    frame.render_widget(Paragraph::new(lines), list);
}

fn entry_line(entry: &Entry, selected: bool, width: usize) -> Line<'static> {
    let mut style = match entry.kind {
        EntryKind::Parent => Style::default().fg(Color::DarkGray),
        EntryKind::Directory => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::BOLD),
        EntryKind::File => Style::default(),
    };
    if selected {
        style = style.add_modifier(Modifier::REVERSED);
    }

    let mut text = truncate_end(&entry.display_name(), width);
    // Pad so the highlight spans the whole row.
    if selected {
        let pad = width.saturating_sub(text.width());
        text.extend(std::iter::repeat(' ').take(pad));
    }
    Line::from(Span::styled(text, style))
}

// ── Text fitting ────────────────────────────────────────────────

fn sanitize(s: &str) -> String {
    s.chars().map(|c| if c.is_control() { '?' } else { c }).collect()
}

/// Cut `s` to `width` columns, marking the cut with a trailing ellipsis.
fn truncate_end(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push(ELLIPSIS);
    out
}

/// Cut `s` to `width` columns from the left, so the end of a long path
/// stays visible.
fn truncate_start(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut kept = Vec::new();
    let mut used = 0;
    for c in s.chars().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        kept.push(c);
        used += w;
    }
    std::iter::once(ELLIPSIS).chain(kept.into_iter().rev()).collect()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::Terminal;

    use super::*;
    use crate::dir::fake::FakeReader;
    use crate::dir::DirSource;
    use crate::entry::SortOrder;

    fn row(buf: &Buffer, x: u16, y: u16, width: u16) -> String {
        (x..x + width)
            .map(|col| buf[(col, y)].symbol())
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    fn render(width: u16, height: u16, nav: &mut NavigationState, log: &DebugLog) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw(f, nav, log)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn tmp_source() -> DirSource<FakeReader> {
        DirSource::new(
            FakeReader::new().dir("/tmp", &[("c", true), ("a.txt", false), ("b", true)]),
            SortOrder::Alphabetical,
        )
    }

    #[test]
    fn directory_pane_shows_path_then_entries() {
        let mut nav = NavigationState::load(&tmp_source(), Path::new("/tmp")).unwrap();
        let buf = render(80, 24, &mut nav, &DebugLog::new(10));

        assert_eq!(row(&buf, 40, 0, 40), "/tmp");
        assert_eq!(row(&buf, 40, 1, 40), "..");
        assert_eq!(row(&buf, 40, 2, 40), "a.txt");
        assert_eq!(row(&buf, 40, 3, 40), "b");
        assert_eq!(row(&buf, 40, 4, 40), "c");
        assert_eq!(row(&buf, 40, 5, 40), "");
    }

    #[test]
    fn selected_row_is_reversed_across_the_pane() {
        let mut nav = NavigationState::load(&tmp_source(), Path::new("/tmp")).unwrap();
        nav.move_selection(2);
        let buf = render(80, 24, &mut nav, &DebugLog::new(10));

        for x in 40..80 {
            assert!(buf[(x, 3)].modifier.contains(Modifier::REVERSED), "col {x}");
        }
        assert!(!buf[(40, 2)].modifier.contains(Modifier::REVERSED));
        assert!(!buf[(40, 4)].modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn debug_pane_shows_newest_lines_that_fit() {
        let mut nav = NavigationState::load(&tmp_source(), Path::new("/tmp")).unwrap();
        let mut log = DebugLog::new(100);
        for i in 0..10 {
            log.push(format!("msg {i}"));
        }
        let buf = render(40, 4, &mut nav, &log);

        let lines: Vec<String> = (0..4).map(|y| row(&buf, 0, y, 20)).collect();
        assert_eq!(lines, ["msg 6", "msg 7", "msg 8", "msg 9"]);
    }

    #[test]
    fn error_is_pinned_to_top_of_debug_pane() {
        let source = DirSource::new(
            FakeReader::new()
                .dir("/srv", &[("locked", true)])
                .denied("/srv/locked"),
            SortOrder::Alphabetical,
        );
        let mut nav = NavigationState::load(&source, Path::new("/srv")).unwrap();
        nav.move_selection(1);
        nav.enter_selected(&source);

        let mut log = DebugLog::new(10);
        log.push("older");
        log.push("newest");
        let buf = render(100, 3, &mut nav, &log);

        assert_eq!(row(&buf, 0, 0, 50), "error: /srv/locked: permission denied");
        assert_eq!(buf[(0, 0)].fg, Color::Red);
        assert_eq!(row(&buf, 0, 1, 50), "older");
        assert_eq!(row(&buf, 0, 2, 50), "newest");
        assert_eq!(row(&buf, 50, 0, 50), "/srv");
    }

    #[test]
    fn long_listing_scrolls_selection_into_view() {
        let names: Vec<String> = (0..30).map(|i| format!("f{i:02}")).collect();
        let listing: Vec<(&str, bool)> = names.iter().map(|n| (n.as_str(), false)).collect();
        let source = DirSource::new(FakeReader::new().dir("/d", &listing), SortOrder::Alphabetical);
        let mut nav = NavigationState::load(&source, Path::new("/d")).unwrap();
        nav.move_selection(12);

        // 6 rows: header + 5 entries.
        let buf = render(40, 6, &mut nav, &DebugLog::new(1));
        assert_eq!(nav.scroll_offset(), 8);
        assert_eq!(row(&buf, 20, 1, 20), "f07");
        assert_eq!(row(&buf, 20, 5, 20), "f11");
        assert!(buf[(20, 5)].modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn tiny_terminals_draw_nothing() {
        let mut nav = NavigationState::load(&tmp_source(), Path::new("/tmp")).unwrap();
        let buf = render(1, 5, &mut nav, &DebugLog::new(1));
        assert_eq!(row(&buf, 0, 0, 1), "");

        let buf = render(10, 1, &mut nav, &DebugLog::new(1));
        assert_eq!(row(&buf, 5, 0, 5), "/tmp");
    }

    #[test]
    fn truncation_respects_display_width() {
        assert_eq!(truncate_end("short", 10), "short");
        assert_eq!(truncate_end("very_long_filename.txt", 8), "very_lo…");
        assert_eq!(truncate_end("日本語ファイル", 6), "日本…");
        assert_eq!(truncate_end("abc", 0), "");

        assert_eq!(truncate_start("/home/user/projects/deep", 10), "…ects/deep");
        assert_eq!(truncate_start("/tmp", 10), "/tmp");
        assert_eq!(truncate_start("/x/y", 1), "…");
    }
}
