use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::cli::handlers::Context;
use crate::io::watcher::StoreWatcher;
use crate::model::task::{DraftField, TaskDraft};
use crate::ops::task_list::{TaskListView, ViewError};

use super::input;
use super::keymap::Keymap;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Form,
}

/// Which control of the add-task form has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    Field(DraftField),
    NoDueToggle,
}

impl FormFocus {
    const ORDER: [FormFocus; 5] = [
        FormFocus::Field(DraftField::TaskName),
        FormFocus::Field(DraftField::Description),
        FormFocus::Field(DraftField::Group),
        FormFocus::Field(DraftField::DueDate),
        FormFocus::NoDueToggle,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let n = Self::ORDER.len();
        Self::ORDER[(self.index() + n - 1) % n]
    }
}

/// State of the open add-task form
#[derive(Debug, Clone)]
pub struct FormState {
    pub draft: TaskDraft,
    pub focus: FormFocus,
    /// Byte offset of the cursor in the focused field
    pub cursor: usize,
    /// Shown under the fields after a rejected submit
    pub warning: Option<String>,
}

impl FormState {
    pub fn new(group: Option<&str>) -> Self {
        let draft = TaskDraft {
            group: group.unwrap_or_default().to_string(),
            ..Default::default()
        };
        FormState {
            draft,
            focus: FormFocus::Field(DraftField::TaskName),
            cursor: 0,
            warning: None,
        }
    }

    fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            FormFocus::Field(DraftField::DueDate) if self.draft.no_due_date => None,
            FormFocus::Field(f) => Some(self.draft.field_mut(f)),
            FormFocus::NoDueToggle => None,
        }
    }

    pub fn focus_next(&mut self) {
        self.set_focus(self.focus.next());
    }

    pub fn focus_prev(&mut self) {
        self.set_focus(self.focus.prev());
    }

    fn set_focus(&mut self, focus: FormFocus) {
        self.focus = focus;
        self.cursor = match focus {
            FormFocus::Field(f) => self.draft.field(f).len(),
            FormFocus::NoDueToggle => 0,
        };
    }

    pub fn toggle_no_due(&mut self) {
        self.draft.no_due_date = !self.draft.no_due_date;
        if self.draft.no_due_date && self.focus == FormFocus::Field(DraftField::DueDate) {
            self.set_focus(FormFocus::NoDueToggle);
        }
    }

    pub fn insert_char(&mut self, c: char) {
        let cursor = self.cursor;
        if let Some(text) = self.focused_text() {
            text.insert(cursor, c);
            self.cursor = cursor + c.len_utf8();
        } else if self.focus == FormFocus::NoDueToggle && c == ' ' {
            self.toggle_no_due();
        }
    }

    pub fn backspace(&mut self) {
        let cursor = self.cursor;
        if let Some(text) = self.focused_text()
            && let Some((idx, _)) = text[..cursor].char_indices().next_back()
        {
            text.remove(idx);
            self.cursor = idx;
        }
    }

    pub fn delete(&mut self) {
        let cursor = self.cursor;
        if let Some(text) = self.focused_text()
            && cursor < text.len()
        {
            text.remove(cursor);
        }
    }

    pub fn cursor_left(&mut self) {
        let cursor = self.cursor;
        if let Some(text) = self.focused_text()
            && let Some((idx, _)) = text[..cursor].char_indices().next_back()
        {
            self.cursor = idx;
        }
    }

    pub fn cursor_right(&mut self) {
        let cursor = self.cursor;
        if let Some(text) = self.focused_text()
            && let Some(c) = text[cursor..].chars().next()
        {
            self.cursor = cursor + c.len_utf8();
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        if let Some(text) = self.focused_text() {
            let len = text.len();
            self.cursor = len;
        }
    }
}

/// Severity of the status row message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

/// Main application state
pub struct App {
    pub view: TaskListView,
    pub mode: Mode,
    pub form: Option<FormState>,
    pub status: Option<StatusMessage>,
    pub should_quit: bool,
    pub theme: Theme,
    pub show_key_hints: bool,
    pub navigate_keys: Keymap,
    pub form_keys: Keymap,
}

impl App {
    pub fn new(view: TaskListView, theme: Theme, show_key_hints: bool) -> Self {
        App {
            view,
            mode: Mode::Navigate,
            form: None,
            status: None,
            should_quit: false,
            theme,
            show_key_hints,
            navigate_keys: Keymap::navigate(),
            form_keys: Keymap::form(),
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind: StatusKind::Info,
        });
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind: StatusKind::Error,
        });
    }

    /// Open the add-task form, pre-filling the selected task's group.
    pub fn open_form(&mut self) {
        let group = self.view.selection().map(|s| s.group_name.clone());
        self.form = Some(FormState::new(group.as_deref()));
        self.mode = Mode::Form;
    }

    pub fn close_form(&mut self) {
        self.form = None;
        self.mode = Mode::Navigate;
    }

    /// Submit the form. It stays open with a warning if the task was not added.
    pub fn submit_form(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        match self.view.submit_task(&form.draft) {
            Ok(task) => {
                self.close_form();
                self.info(format!("Added '{}' to {}", task.taskname, task.group));
            }
            Err(ViewError::Validation(e)) => {
                form.warning = Some(e.to_string());
            }
            Err(ViewError::Store(e)) => {
                tracing::warn!("add failed: {}", e);
                form.warning = Some(e.to_string());
            }
        }
    }

    pub fn delete_selected(&mut self) {
        let name = self.view.selection().map(|s| s.taskname.clone());
        match self.view.request_delete() {
            Ok(true) => self.info(format!("Deleted '{}'", name.unwrap_or_default())),
            Ok(false) => self.info("No task selected"),
            Err(e) => {
                tracing::warn!("delete failed: {}", e);
                self.error(e.to_string());
            }
        }
    }

    /// Re-read the task file after an outside change or on request.
    /// Returns false if the file could not be loaded.
    pub fn reload(&mut self) -> bool {
        match self.view.refresh() {
            Ok(()) => {
                if self.status.as_ref().is_some_and(|s| s.kind == StatusKind::Error) {
                    self.status = None;
                }
                true
            }
            Err(e) => {
                self.error(e.to_string());
                false
            }
        }
    }
}

/// Launch the TUI over the task file named by `ctx`.
pub fn run(ctx: &Context, verbosity: u8) -> Result<(), Box<dyn std::error::Error>> {
    crate::logging::init_file(verbosity, &ctx.store_path)?;

    let ui = &ctx.config.config.ui;
    let theme = Theme::from_config(ui);
    let store = ctx.store();
    let mut app = match TaskListView::open(store.clone()) {
        Ok(view) => App::new(view, theme, ui.show_key_hints),
        Err(e) => {
            // Stay up so the user can read the error and fix the file
            tracing::warn!("initial load failed: {}", e);
            let mut app = App::new(TaskListView::empty(store), theme, ui.show_key_hints);
            app.error(e.to_string());
            app
        }
    };

    let watcher = match StoreWatcher::start(&ctx.store_path) {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!("not watching {}: {}", ctx.store_path.display(), e);
            None
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&StoreWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if let Some(w) = watcher
            && !w.poll().is_empty()
        {
            tracing::debug!("task file changed on disk, reloading");
            let _ = app.reload();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
