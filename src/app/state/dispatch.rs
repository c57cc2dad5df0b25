use crate::app::command_palette::{CommandRegistry, TRIGGER};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Palette state for the line being composed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DispatchState {
    pub input_text: String,
    pub is_palette_open: bool,
    pub matches: Vec<usize>, // Indices into the command registry
    pub selected_index: usize,
}

impl DispatchState {
    /// Re-filter after every keystroke; the selection resets to the top.
    pub fn update_input(&mut self, text: &str, registry: &CommandRegistry) {
        self.input_text = text.to_string();
        if text.starts_with(TRIGGER) {
            self.is_palette_open = true;
            self.matches = registry.filter(text);
            self.selected_index = 0;
        } else {
            self.close();
        }
    }

    /// Wraps around; no-op while closed or empty.
    pub fn navigate(&mut self, direction: Direction) {
        if !self.is_palette_open || self.matches.is_empty() {
            return;
        }
        let len = self.matches.len();
        let current = self.selected_index.min(len - 1);
        self.selected_index = match direction {
            Direction::Down => (current + 1) % len,
            Direction::Up => (current + len - 1) % len,
        };
    }

    /// Registry index of the highlighted command.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        if !self.is_palette_open || self.matches.is_empty() {
            return None;
        }
        let index = self.selected_index.min(self.matches.len() - 1);
        self.matches.get(index).copied()
    }

    pub fn close(&mut self) {
        self.is_palette_open = false;
        self.matches.clear();
        self.selected_index = 0;
    }

    pub fn reset(&mut self) {
        self.input_text.clear();
        self.close();
    }
}
