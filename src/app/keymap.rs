use super::action::Action;
use super::state::AppMode;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Fixed bindings per mode. Keys that are not bound fall through to text input.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyMap {
    pub global: HashMap<KeyEvent, Action>,
    pub compose: HashMap<KeyEvent, Action>,
    pub browse: HashMap<KeyEvent, Action>,
    pub edit: HashMap<KeyEvent, Action>,
}

impl Default for KeyMap {
    fn default() -> Self {
        let mut global = HashMap::new();
        let mut compose = HashMap::new();
        let mut browse = HashMap::new();
        let mut edit = HashMap::new();

        global.insert(ctrl('c'), Action::Quit);

        // --- Compose ---
        compose.insert(key(KeyCode::Enter), Action::Submit);
        compose.insert(key(KeyCode::Esc), Action::Escape);
        compose.insert(key(KeyCode::Tab), Action::EnterBrowse);

        // --- Browse ---
        browse.insert(key(KeyCode::Down), Action::BrowseNext);
        browse.insert(key(KeyCode::Char('j')), Action::BrowseNext);
        browse.insert(key(KeyCode::Up), Action::BrowsePrev);
        browse.insert(key(KeyCode::Char('k')), Action::BrowsePrev);
        browse.insert(key(KeyCode::Enter), Action::EditSelected);
        browse.insert(key(KeyCode::Char('d')), Action::DeleteSelected);
        browse.insert(key(KeyCode::Esc), Action::Escape);

        // --- Edit ---
        edit.insert(key(KeyCode::Down), Action::FieldNext);
        edit.insert(key(KeyCode::Tab), Action::FieldNext);
        edit.insert(key(KeyCode::Up), Action::FieldPrev);
        edit.insert(
            KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT),
            Action::FieldPrev,
        );
        edit.insert(key(KeyCode::Right), Action::CycleOption(true));
        edit.insert(key(KeyCode::Left), Action::CycleOption(false));
        edit.insert(ctrl('s'), Action::SaveEdit);
        edit.insert(ctrl('d'), Action::DeleteEdit);
        edit.insert(key(KeyCode::Esc), Action::CancelEdit);

        Self {
            global,
            compose,
            browse,
            edit,
        }
    }
}

impl KeyMap {
    #[must_use]
    pub fn get_action(&self, event: KeyEvent, mode: AppMode) -> Option<Action> {
        let event = normalize(event);
        if let Some(action) = self.global.get(&event) {
            return Some(action.clone());
        }
        let bindings = match mode {
            AppMode::Compose => &self.compose,
            AppMode::Browse => &self.browse,
            AppMode::Edit => &self.edit,
        };
        bindings.get(&event).cloned()
    }
}

// Only code and modifiers take part in lookups
fn normalize(event: KeyEvent) -> KeyEvent {
    KeyEvent::new(event.code, event.modifiers)
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::empty())
}

fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}
