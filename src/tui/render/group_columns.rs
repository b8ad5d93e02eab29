use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::model::task::{DueDate, Task};
use crate::ops::task_list::GroupView;
use crate::tui::app::App;

use super::truncate_to_width;

pub const EMPTY_MESSAGE: &str = "No tasks yet. Press Enter to add one.";

/// Render one bordered column per group, side by side
pub fn render_group_columns(frame: &mut Frame, app: &App, area: Rect) {
    let groups = app.view.groups();
    if groups.is_empty() {
        let bg = app.theme.background;
        let text = Paragraph::new(Line::from(Span::styled(
            EMPTY_MESSAGE,
            Style::default().fg(app.theme.dim).bg(bg),
        )))
        .alignment(Alignment::Center)
        .style(Style::default().bg(bg));
        let middle = Rect {
            y: area.y + area.height / 2,
            height: area.height.min(1),
            ..area
        };
        frame.render_widget(text, middle);
        return;
    }

    let n = groups.len() as u32;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints((0..n).map(|_| Constraint::Ratio(1, n)))
        .split(area);

    let selection = app.view.selection();
    for (gi, (group, col)) in groups.iter().zip(columns.iter()).enumerate() {
        let selected = selection.filter(|s| s.group == gi).map(|s| s.task);
        render_group(frame, app, group, selected, *col);
    }
}

fn render_group(
    frame: &mut Frame,
    app: &App,
    group: &GroupView,
    selected: Option<usize>,
    area: Rect,
) {
    let bg = app.theme.background;
    let border = if selected.is_some() {
        app.theme.selection_border
    } else {
        app.theme.dim
    };
    let inner_width = area.width.saturating_sub(2) as usize;

    let title = truncate_to_width(&format!(" {} ", group.name), inner_width);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border).bg(bg))
        .title(Span::styled(
            title,
            Style::default()
                .fg(app.theme.text_bright)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(bg));

    let items: Vec<ListItem> = group
        .tasks
        .iter()
        .map(|task| task_item(app, task, inner_width))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(app.theme.selection_bg));
    let mut state = ListState::default().with_selected(selected);
    frame.render_stateful_widget(list, area, &mut state);
}

fn task_item<'a>(app: &App, task: &Task, width: usize) -> ListItem<'a> {
    let due_style = match task.due() {
        Some(DueDate::At(_)) => Style::default().fg(app.theme.yellow),
        Some(DueDate::Undated) => Style::default().fg(app.theme.dim),
        // Unparseable, shown as-is
        None => Style::default().fg(app.theme.red),
    };
    let due = if task.has_due_date() {
        format!("  due {}", task.duedate)
    } else {
        "  no due date".to_string()
    };
    ListItem::new(vec![
        Line::from(Span::styled(
            truncate_to_width(&task.taskname, width),
            Style::default().fg(app.theme.text_bright),
        )),
        Line::from(Span::styled(
            truncate_to_width(&format!("  {}", task.description), width),
            Style::default().fg(app.theme.text),
        )),
        Line::from(Span::styled(truncate_to_width(&due, width), due_style)),
    ])
}
