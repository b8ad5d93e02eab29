use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode};
use super::keymap::Action;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Form => handle_form(app, key),
    }
}

fn handle_navigate(app: &mut App, key: KeyEvent) {
    let Some(action) = app.navigate_keys.lookup(&key) else {
        return;
    };
    match action {
        Action::Quit => app.should_quit = true,
        Action::OpenForm => app.open_form(),
        Action::DeleteSelected => app.delete_selected(),
        Action::Reload => {
            if app.reload() {
                app.info("Reloaded");
            }
        }
        Action::ToggleHints => app.show_key_hints = !app.show_key_hints,
        Action::Up => app.view.select_prev(),
        Action::Down => app.view.select_next(),
        Action::Left => app.view.select_prev_group(),
        Action::Right => app.view.select_next_group(),
        _ => {}
    }
}

fn handle_form(app: &mut App, key: KeyEvent) {
    if let Some(action) = app.form_keys.lookup(&key) {
        match action {
            Action::Quit => app.should_quit = true,
            Action::Submit => app.submit_form(),
            Action::Cancel => app.close_form(),
            Action::NextField => with_form(app, |f| f.focus_next()),
            Action::PrevField => with_form(app, |f| f.focus_prev()),
            Action::ToggleNoDue => with_form(app, |f| f.toggle_no_due()),
            _ => {}
        }
        return;
    }

    // Everything else edits the focused field
    match key.code {
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            with_form(app, |f| f.insert_char(c))
        }
        KeyCode::Backspace => with_form(app, |f| f.backspace()),
        KeyCode::Delete => with_form(app, |f| f.delete()),
        KeyCode::Left => with_form(app, |f| f.cursor_left()),
        KeyCode::Right => with_form(app, |f| f.cursor_right()),
        KeyCode::Home => with_form(app, |f| f.cursor_home()),
        KeyCode::End => with_form(app, |f| f.cursor_end()),
        _ => {}
    }
}

fn with_form(app: &mut App, f: impl FnOnce(&mut super::app::FormState)) {
    if let Some(form) = app.form.as_mut() {
        f(form);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::store_io::TaskStore;
    use crate::model::task::DraftField;
    use crate::ops::task_list::TaskListView;
    use crate::tui::app::{FormFocus, StatusKind};
    use crate::tui::theme::Theme;
    use std::fs;
    use tempfile::TempDir;

    fn app_in(tmp: &TempDir) -> App {
        let store = TaskStore::new(tmp.path().join("tasks.json"));
        App::new(TaskListView::open(store).unwrap(), Theme::default(), true)
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl(app: &mut App, c: char) {
        handle_key(app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn fill_form(app: &mut App, name: &str, desc: &str, group: &str, due: &str) {
        press(app, KeyCode::Enter);
        type_text(app, name);
        press(app, KeyCode::Tab);
        type_text(app, desc);
        press(app, KeyCode::Tab);
        type_text(app, group);
        press(app, KeyCode::Tab);
        type_text(app, due);
    }

    #[test]
    fn test_add_task_through_form() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_in(&tmp);
        fill_form(&mut app, "Report", "Quarterly numbers", "Work", "2024-04-01 09:00:00");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.form.is_none());
        assert_eq!(app.view.groups()[0].name, "Work");
        assert_eq!(app.view.groups()[0].tasks[0].taskname, "Report");
        assert_eq!(app.status.as_ref().unwrap().kind, StatusKind::Info);
    }

    #[test]
    fn test_empty_field_blocks_submit_with_warning() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_in(&tmp);
        fill_form(&mut app, "Report", "", "Work", "2024-04-01");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::Form);
        let warning = app.form.as_ref().unwrap().warning.clone().unwrap();
        assert!(warning.contains("Description"), "{}", warning);
        assert!(app.view.is_empty());
        assert!(!tmp.path().join("tasks.json").exists());
    }

    #[test]
    fn test_no_due_date_toggle() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_in(&tmp);
        fill_form(&mut app, "Someday", "Maybe", "Ideas", "");
        ctrl(&mut app, 'n');
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.view.groups()[0].tasks[0].duedate, "N/A");
    }

    #[test]
    fn test_escape_cancels_form() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_in(&tmp);
        fill_form(&mut app, "A", "B", "C", "2024-01-01");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.view.is_empty());
    }

    #[test]
    fn test_form_prefills_selected_group() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_in(&tmp);
        fill_form(&mut app, "A", "B", "Work", "2024-01-01");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        let form = app.form.as_ref().unwrap();
        assert_eq!(form.draft.group, "Work");
        assert_eq!(form.focus, FormFocus::Field(DraftField::TaskName));
    }

    #[test]
    fn test_typing_hjkl_in_form_edits_text() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_in(&tmp);
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "hjkl r?");
        assert_eq!(app.form.as_ref().unwrap().draft.taskname, "hjkl r?");
    }

    #[test]
    fn test_delete_selected_task() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_in(&tmp);
        fill_form(&mut app, "A", "first", "Work", "2024-01-01");
        press(&mut app, KeyCode::Enter);
        fill_form(&mut app, "B", "second", "Work", "2024-01-02");
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.view.selected_task().unwrap().taskname, "B");
        press(&mut app, KeyCode::Delete);

        assert!(app.view.selection().is_none());
        assert_eq!(app.view.task_count(), 1);
        let text = fs::read_to_string(tmp.path().join("tasks.json")).unwrap();
        assert!(!text.contains("\"B\""));
    }

    #[test]
    fn test_delete_without_selection_does_nothing() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_in(&tmp);
        fill_form(&mut app, "A", "first", "Work", "2024-01-01");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Delete);
        assert_eq!(app.view.task_count(), 1);
        assert_eq!(app.status.as_ref().unwrap().text, "No task selected");
    }

    #[test]
    fn test_ctrl_w_quits_from_either_mode() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_in(&tmp);
        ctrl(&mut app, 'w');
        assert!(app.should_quit);

        let mut app = app_in(&tmp);
        press(&mut app, KeyCode::Enter);
        ctrl(&mut app, 'w');
        assert!(app.should_quit);
    }

    #[test]
    fn test_corrupt_file_surfaces_error_and_keeps_running() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_in(&tmp);
        fs::write(tmp.path().join("tasks.json"), "{not valid json").unwrap();

        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.status.as_ref().unwrap().kind, StatusKind::Error);

        fill_form(&mut app, "A", "B", "Work", "2024-01-01");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::Form);
        let warning = app.form.as_ref().unwrap().warning.clone().unwrap();
        assert!(warning.contains("not a valid task file"), "{}", warning);
        assert_eq!(
            fs::read_to_string(tmp.path().join("tasks.json")).unwrap(),
            "{not valid json"
        );
    }
}
