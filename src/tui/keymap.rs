use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Something a key press asks the TUI to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    OpenForm,
    DeleteSelected,
    Reload,
    ToggleHints,
    Up,
    Down,
    Left,
    Right,
    // Add-task form
    Submit,
    Cancel,
    NextField,
    PrevField,
    ToggleNoDue,
}

/// A single (key, modifiers) → action entry
#[derive(Debug, Clone, Copy)]
pub struct Binding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
    pub action: Action,
    /// Shown in the key-hint row
    pub hint: Option<&'static str>,
}

const fn bind(
    code: KeyCode,
    modifiers: KeyModifiers,
    action: Action,
    hint: Option<&'static str>,
) -> Binding {
    Binding {
        code,
        modifiers,
        action,
        hint,
    }
}

const NONE: KeyModifiers = KeyModifiers::NONE;
const CTRL: KeyModifiers = KeyModifiers::CONTROL;

/// Command table consulted by the event loop.
///
/// Lookup is an exact match on code and modifiers, except that Shift is
/// ignored for characters (the character already carries it).
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: Vec<Binding>,
}

impl Keymap {
    /// Bindings for browsing the task list
    pub fn navigate() -> Self {
        Keymap {
            bindings: vec![
                bind(KeyCode::Enter, NONE, Action::OpenForm, Some("Enter add")),
                bind(KeyCode::Delete, NONE, Action::DeleteSelected, Some("Del delete")),
                bind(KeyCode::Char('w'), CTRL, Action::Quit, Some("^W close")),
                bind(KeyCode::Char('r'), NONE, Action::Reload, Some("r reload")),
                bind(KeyCode::Char('?'), NONE, Action::ToggleHints, Some("? hints")),
                bind(KeyCode::Up, NONE, Action::Up, None),
                bind(KeyCode::Char('k'), NONE, Action::Up, None),
                bind(KeyCode::Down, NONE, Action::Down, None),
                bind(KeyCode::Char('j'), NONE, Action::Down, None),
                bind(KeyCode::Left, NONE, Action::Left, None),
                bind(KeyCode::Char('h'), NONE, Action::Left, None),
                bind(KeyCode::Right, NONE, Action::Right, None),
                bind(KeyCode::Char('l'), NONE, Action::Right, None),
            ],
        }
    }

    /// Bindings inside the add-task form. Unbound keys edit the focused field.
    pub fn form() -> Self {
        Keymap {
            bindings: vec![
                bind(KeyCode::Enter, NONE, Action::Submit, Some("Enter add")),
                bind(KeyCode::Esc, NONE, Action::Cancel, Some("Esc cancel")),
                bind(KeyCode::Tab, NONE, Action::NextField, Some("Tab next")),
                bind(KeyCode::BackTab, NONE, Action::PrevField, None),
                bind(KeyCode::Char('n'), CTRL, Action::ToggleNoDue, Some("^N no due date")),
                bind(KeyCode::Char('w'), CTRL, Action::Quit, Some("^W close")),
            ],
        }
    }

    pub fn lookup(&self, key: &KeyEvent) -> Option<Action> {
        let modifiers = match key.code {
            KeyCode::Char(_) | KeyCode::BackTab => key.modifiers.difference(KeyModifiers::SHIFT),
            _ => key.modifiers,
        };
        self.bindings
            .iter()
            .find(|b| b.code == key.code && b.modifiers == modifiers)
            .map(|b| b.action)
    }

    /// Hint labels in table order
    pub fn hints(&self) -> Vec<&'static str> {
        self.bindings.iter().filter_map(|b| b.hint).collect()
    }
}
