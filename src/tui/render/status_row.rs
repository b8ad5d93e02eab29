use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode, StatusKind};

use super::truncate_to_width;

/// Render the status row: the last message, and the selection on the right
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans = Vec::new();
    let mut used = 0;
    if let Some(status) = &app.status {
        let color = match status.kind {
            StatusKind::Info => app.theme.green,
            StatusKind::Error => app.theme.red,
        };
        let text = truncate_to_width(&format!(" {}", status.text), width);
        used = super::display_width(&text);
        spans.push(Span::styled(text, Style::default().fg(color).bg(bg)));
    }

    if let Some(sel) = app.view.selection() {
        let right = format!("{} / {} ", sel.group_name, sel.taskname);
        let right_width = super::display_width(&right);
        if used + right_width < width {
            spans.push(Span::styled(
                " ".repeat(width - used - right_width),
                Style::default().bg(bg),
            ));
            spans.push(Span::styled(right, Style::default().fg(app.theme.dim).bg(bg)));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

/// Render the key hints for the current mode
pub fn render_key_hints(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let keys = match app.mode {
        Mode::Navigate => &app.navigate_keys,
        Mode::Form => &app.form_keys,
    };
    let text = format!(" {}", keys.hints().join("  "));
    let line = Line::from(Span::styled(
        truncate_to_width(&text, area.width as usize),
        Style::default().fg(app.theme.dim).bg(bg),
    ));
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
}
