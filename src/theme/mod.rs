use ratatui::style::{Modifier, Style};
use serde::{Deserialize, Serialize};

pub mod dark;
pub mod glyphs;
pub mod light;
pub mod palette;

pub use palette::{dim_color, Palette};

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub border: Style,
    pub border_focus: Style,

    pub header_logo: Style,
    pub header_database: Style,
    pub header_busy: Style,
    pub header: Style,

    pub footer_segment_key: Style,
    pub footer_segment_val: Style,
    pub footer: Style,

    pub message_sent: Style,
    pub message_received: Style,
    pub message_error: Style,
    pub timestamp: Style,

    pub bubble_border: Style,
    pub bubble_selected: Style,
    pub bubble_editing: Style,
    pub bubble_title: Style,
    pub field_label: Style,
    pub field_value: Style,
    pub field_active: Style,
    pub option_selected: Style,

    pub list_selected: Style,
    pub list_item: Style,
    pub dimmed: Style,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            ThemeMode::Dark => "Dark",
            ThemeMode::Light => "Light",
        }
    }
}

impl Theme {
    #[must_use]
    pub fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::from_palette(&dark::DARK),
            ThemeMode::Light => Self::from_palette(&light::LIGHT),
        }
    }

    #[must_use]
    pub fn from_palette(p: &Palette) -> Self {
        Self {
            border: Style::default().fg(p.surface2),
            border_focus: Style::default().fg(p.blue),

            header_logo: Style::default()
                .bg(p.blue)
                .fg(p.crust)
                .add_modifier(Modifier::BOLD),
            header_database: Style::default().bg(p.surface1).fg(p.text),
            header_busy: Style::default()
                .bg(p.yellow)
                .fg(p.crust)
                .add_modifier(Modifier::BOLD),
            header: Style::default().bg(p.base).fg(p.text),

            footer_segment_key: Style::default()
                .bg(p.surface0)
                .fg(p.blue)
                .add_modifier(Modifier::BOLD),
            footer_segment_val: Style::default().bg(p.base).fg(p.text),
            footer: Style::default().bg(p.crust).fg(p.subtext0),

            message_sent: Style::default().fg(p.blue),
            message_received: Style::default().fg(p.text),
            message_error: Style::default().fg(p.red),
            timestamp: Style::default().fg(p.overlay0).add_modifier(Modifier::DIM),

            bubble_border: Style::default().fg(p.surface2),
            bubble_selected: Style::default().fg(p.mauve),
            bubble_editing: Style::default().fg(p.green),
            bubble_title: Style::default().fg(p.peach).add_modifier(Modifier::BOLD),
            field_label: Style::default().fg(p.subtext0),
            field_value: Style::default().fg(p.text),
            field_active: Style::default()
                .bg(p.surface0)
                .fg(p.teal)
                .add_modifier(Modifier::BOLD),
            option_selected: Style::default()
                .bg(dim_color(p.green, 0.35))
                .fg(p.text),

            list_selected: Style::default()
                .bg(p.blue)
                .fg(p.crust)
                .add_modifier(Modifier::BOLD),
            list_item: Style::default().fg(p.text).bg(p.mantle),
            dimmed: Style::default().fg(p.overlay0).add_modifier(Modifier::DIM),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_mode(ThemeMode::Dark)
    }
}
