use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use tempfile::TempDir;

use crate::io::store_io::TaskStore;
use crate::model::Task;
use crate::ops::task_list::TaskListView;
use crate::tui::app::App;
use crate::tui::theme::Theme;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An app over a fresh task file holding `(group, taskname, duedate)` entries.
/// Keep the returned TempDir alive for as long as the app is used.
pub fn app_with_tasks(tasks: &[(&str, &str, &str)]) -> (TempDir, App) {
    let tmp = TempDir::new().unwrap();
    let store = TaskStore::new(tmp.path().join("tasks.json"));
    for (group, name, due) in tasks {
        store
            .add(Task {
                taskname: name.to_string(),
                description: format!("about {}", name),
                group: group.to_string(),
                setdate: "2024-01-01 08:00:00".into(),
                duedate: due.to_string(),
            })
            .unwrap();
    }
    let view = TaskListView::open(store).unwrap();
    (tmp, App::new(view, Theme::default(), true))
}

/// Render the whole screen at the default test size.
pub fn render_app(app: &mut App) -> String {
    render_to_string(TERM_W, TERM_H, |frame, _area| super::render(frame, app))
}
