pub mod form_popup;
pub mod group_columns;
pub mod status_row;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use unicode_width::UnicodeWidthChar;

use super::app::{App, Mode};

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    let hint_rows = if app.show_key_hints { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),         // title
            Constraint::Min(1),            // group columns
            Constraint::Length(1),         // status row
            Constraint::Length(hint_rows), // key hints
        ])
        .split(area);

    render_title(frame, app, chunks[0]);
    group_columns::render_group_columns(frame, app, chunks[1]);
    status_row::render_status_row(frame, app, chunks[2]);
    if app.show_key_hints {
        status_row::render_key_hints(frame, app, chunks[3]);
    }

    // Form popup (rendered on top of everything)
    if app.mode == Mode::Form {
        form_popup::render_form_popup(frame, app, area);
    }
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let path = app.view.store().path().display().to_string();
    let count = app.view.task_count();
    let noun = if count == 1 { "task" } else { "tasks" };

    let title = " tasktray ";
    let right = format!("{} {}  {} ", count, noun, path);
    let width = area.width as usize;
    let right = truncate_to_width(&right, width.saturating_sub(title.len()));
    let pad = width.saturating_sub(title.len() + display_width(&right));

    let line = Line::from(vec![
        Span::styled(
            title,
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ".repeat(pad), Style::default().bg(bg)),
        Span::styled(right, Style::default().fg(app.theme.dim).bg(bg)),
    ]);
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
}

pub(super) fn display_width(s: &str) -> usize {
    s.chars().map(|c| c.width().unwrap_or(0)).sum()
}

/// Cut `s` to at most `max` display columns, ending in `…` when shortened.
pub(super) fn truncate_to_width(s: &str, max: usize) -> String {
    if display_width(s) <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('\u{2026}');
    out
}
