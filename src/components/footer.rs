use crate::app::state::{AppMode, AppState};
use crate::domain::codec::FormValue;
use crate::theme::Theme;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

pub struct FooterItem {
    pub key: &'static str,
    pub desc: &'static str,
}

pub struct FooterGroup {
    pub name: &'static str,
    pub items: Vec<FooterItem>,
}

fn item(key: &'static str, desc: &'static str) -> FooterItem {
    FooterItem { key, desc }
}

/// Key hints for the current mode, most important first.
#[must_use]
pub fn get_groups(state: &AppState) -> Vec<FooterGroup> {
    match state.mode {
        AppMode::Compose if state.dispatch.is_palette_open => vec![FooterGroup {
            name: "PALETTE",
            items: vec![
                item("↑/↓", "select"),
                item("Enter", "run"),
                item("Esc", "close"),
            ],
        }],
        AppMode::Compose => {
            let mut items = vec![item("Enter", "send"), item("/", "commands")];
            if !state.conversation.bubble_ids().is_empty() {
                items.push(item("Tab", "browse"));
            }
            items.push(item("^C", "quit"));
            vec![FooterGroup {
                name: "COMPOSE",
                items,
            }]
        }
        AppMode::Browse => vec![FooterGroup {
            name: "BROWSE",
            items: vec![
                item("j/k", "move"),
                item("Enter", "edit"),
                item("d", "delete"),
                item("Esc", "back"),
            ],
        }],
        AppMode::Edit => {
            let value_hint = match state
                .active_editor()
                .and_then(|e| e.current_field())
                .map(|f| &f.value)
            {
                Some(FormValue::Choice(_)) => Some(item("←/→", "choose")),
                Some(FormValue::Choices(_)) => Some(item("←/→ Space", "pick")),
                Some(FormValue::Flag(_)) => Some(item("Space", "toggle")),
                _ => None,
            };
            let mut items = vec![item("Tab/↑↓", "field")];
            items.extend(value_hint);
            items.extend([item("^S", "save"), item("^D", "delete"), item("Esc", "close")]);
            vec![FooterGroup {
                name: "EDIT",
                items,
            }]
        }
    }
}

pub struct Footer<'a> {
    pub state: &'a AppState<'a>,
    pub theme: &'a Theme,
}

impl Widget for Footer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let theme = self.theme;
        let available_width = area.width.saturating_sub(2) as usize;
        let mut spans = Vec::new();
        let mut current_width = 0;

        for group in get_groups(self.state) {
            // Group label only when there's plenty of space
            if area.width > 80 {
                let label = Span::styled(format!(" {}: ", group.name), theme.dimmed);
                current_width += label.width();
                spans.push(label);
            }

            for item in group.items {
                let key_str = format!(" {} ", item.key);
                let desc_str = format!(" {} ", item.desc);
                let key_span = Span::styled(key_str, theme.footer_segment_key);
                let desc_span = Span::styled(desc_str, theme.footer_segment_val);

                let item_width = key_span.width() + desc_span.width() + 1;
                if current_width + item_width > available_width {
                    break;
                }
                spans.push(key_span);
                spans.push(desc_span);
                spans.push(Span::raw(" "));
                current_width += item_width;
            }
        }

        Paragraph::new(Line::from(spans))
            .style(theme.footer)
            .render(area, buf);
    }
}
