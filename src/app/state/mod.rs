use super::command_palette::CommandRegistry;
use super::keymap::KeyMap;
use crate::theme::{Theme, ThemeMode};
use std::sync::Arc;

pub mod conversation;
pub mod dispatch;
pub mod editor;
pub mod input;

// Re-exports
pub use conversation::{Conversation, Message, MessageBody, MessageId, RecordBubble};
pub use dispatch::{Direction, DispatchState};
pub use editor::EditorState;
pub use input::AppTextArea;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum AppMode {
    Compose, // Typing into the composer
    Browse,  // Moving between record bubbles
    Edit,    // Editing the fields of one bubble
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState<'a> {
    pub should_quit: bool,
    pub mode: AppMode,

    // --- Composer & Palette ---
    pub composer: AppTextArea<'a>,
    pub dispatch: DispatchState,
    pub registry: Arc<CommandRegistry>,

    // --- Conversation ---
    pub conversation: Conversation,
    pub selected_bubble: Option<MessageId>,
    pub editing: Option<MessageId>,

    // --- In-flight effects ---
    pub in_flight: usize,
    pub busy_label: Option<String>,
    pub frame_count: u64,

    // --- Config ---
    pub keymap: Arc<KeyMap>,
    pub database_label: String,
    pub theme_mode: ThemeMode,
    pub theme: Theme,
}

impl AppState<'_> {
    #[must_use]
    pub fn new(theme_mode: ThemeMode, database_label: impl Into<String>) -> Self {
        Self {
            theme_mode,
            theme: Theme::from_mode(theme_mode),
            database_label: database_label.into(),
            ..Default::default()
        }
    }

    pub fn set_theme(&mut self, mode: ThemeMode) {
        self.theme_mode = mode;
        self.theme = Theme::from_mode(mode);
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    #[must_use]
    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[(self.frame_count as usize) % SPINNER_FRAMES.len()]
    }

    #[must_use]
    pub fn composer_text(&self) -> String {
        self.composer.lines().join("\n")
    }

    pub fn clear_composer(&mut self) {
        self.composer = AppTextArea::default();
        self.dispatch.reset();
    }

    /// The editor of the bubble currently being edited.
    pub fn active_editor_mut(&mut self) -> Option<&mut EditorState> {
        let id = self.editing?;
        self.conversation
            .bubble_mut(id)
            .and_then(|b| b.editor.as_mut())
    }

    #[must_use]
    pub fn active_editor(&self) -> Option<&EditorState> {
        let id = self.editing?;
        self.conversation
            .messages
            .iter()
            .find(|m| m.id == id)
            .and_then(Message::bubble)
            .and_then(|b| b.editor.as_ref())
    }
}

impl Default for AppState<'_> {
    fn default() -> Self {
        Self {
            should_quit: false,
            mode: AppMode::Compose,
            composer: AppTextArea::default(),
            dispatch: DispatchState::default(),
            registry: Arc::new(CommandRegistry::builtin()),
            conversation: Conversation::default(),
            selected_bubble: None,
            editing: None,
            in_flight: 0,
            busy_label: None,
            frame_count: 0,
            keymap: Arc::new(KeyMap::default()),
            database_label: String::new(),
            theme_mode: ThemeMode::Dark,
            theme: Theme::default(),
        }
    }
}
