use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::model::task::{DraftField, NO_DUE_DATE};
use crate::tui::app::{App, FormFocus, FormState};

use super::{display_width, truncate_to_width};

const LABEL_WIDTH: usize = 14;
const POPUP_WIDTH: u16 = 64;
const POPUP_HEIGHT: u16 = 11;

/// Render the add-task form as a centered popup
pub fn render_form_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(form) = app.form.as_ref() else {
        return;
    };
    let bg = app.theme.background;

    let popup = centered(area, POPUP_WIDTH, POPUP_HEIGHT);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .title(Span::styled(
            " Add Task ",
            Style::default()
                .fg(app.theme.text_bright)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(bg));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let value_width = (inner.width as usize).saturating_sub(LABEL_WIDTH + 1);
    let mut lines: Vec<Line> = DraftField::ALL
        .iter()
        .map(|&field| field_line(app, form, field, value_width))
        .collect();

    let toggle_focused = form.focus == FormFocus::NoDueToggle;
    let mark = if form.draft.no_due_date { "[x]" } else { "[ ]" };
    lines.push(Line::from(vec![
        Span::raw(" ".repeat(LABEL_WIDTH)),
        Span::styled(
            format!("{} No due date (^N)", mark),
            label_style(app, toggle_focused),
        ),
    ]));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Due date format: YYYY-MM-DD or YYYY-MM-DD HH:MM:SS",
        Style::default().fg(app.theme.dim),
    )));
    if let Some(warning) = &form.warning {
        lines.push(Line::from(Span::styled(
            warning.clone(),
            Style::default().fg(app.theme.red),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, inner);

    // Terminal cursor sits in the focused text field
    if let FormFocus::Field(field) = form.focus
        && !(field == DraftField::DueDate && form.draft.no_due_date)
    {
        let row = DraftField::ALL.iter().position(|f| *f == field).unwrap_or(0) as u16;
        let before = &form.draft.field(field)[..form.cursor];
        let col = (LABEL_WIDTH + display_width(before)).min(inner.width.saturating_sub(1) as usize);
        frame.set_cursor_position(Position::new(inner.x + col as u16, inner.y + row));
    }
}

fn field_line<'a>(app: &App, form: &FormState, field: DraftField, width: usize) -> Line<'a> {
    let focused = form.focus == FormFocus::Field(field);
    let label = format!("{:<w$}", format!("{}:", field.label()), w = LABEL_WIDTH);

    let (value, style) = if field == DraftField::DueDate && form.draft.no_due_date {
        (NO_DUE_DATE.to_string(), Style::default().fg(app.theme.dim))
    } else {
        (
            form.draft.field(field).to_string(),
            Style::default().fg(app.theme.text_bright),
        )
    };

    Line::from(vec![
        Span::styled(label, label_style(app, focused)),
        Span::styled(truncate_to_width(&value, width), style),
    ])
}

fn label_style(app: &App, focused: bool) -> Style {
    if focused {
        Style::default()
            .fg(app.theme.highlight)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text)
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
