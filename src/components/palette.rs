use crate::app::command_palette::CommandRegistry;
use crate::app::state::DispatchState;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, StatefulWidget, Widget},
};

use super::popup::draw_drop_shadow;

/// Suggestion list shown while the composed line starts with the trigger.
pub struct CommandPalette<'a> {
    pub theme: &'a Theme,
    pub state: &'a DispatchState,
    pub registry: &'a CommandRegistry,
    pub bounds: Rect,
}

impl CommandPalette<'_> {
    /// Rows needed to show every match plus the borders.
    #[must_use]
    pub fn height(state: &DispatchState) -> u16 {
        u16::try_from(state.matches.len().max(1)).unwrap_or(u16::MAX).saturating_add(2)
    }
}

impl Widget for CommandPalette<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        draw_drop_shadow(buf, area, self.bounds);
        Clear.render(area, buf);

        let block = Block::default()
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(" COMMANDS ", self.theme.header_logo),
                Span::raw(" "),
            ]))
            .title_bottom(Line::from(vec![
                Span::raw(" "),
                Span::styled("↑/↓", self.theme.footer_segment_key),
                Span::raw(": select "),
                Span::styled("Enter", self.theme.footer_segment_key),
                Span::raw(": run "),
            ]))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.theme.border_focus);

        let inner = block.inner(area);
        block.render(area, buf);

        let selected = self.state.selected_index.min(self.state.matches.len().saturating_sub(1));
        let items: Vec<ListItem> = self
            .state
            .matches
            .iter()
            .enumerate()
            .filter_map(|(i, &index)| {
                let command = self.registry.get(index)?;
                let style = if i == selected {
                    self.theme.list_selected
                } else {
                    self.theme.list_item
                };
                let prefix = if i == selected { "> " } else { "  " };

                Some(ListItem::new(Line::from(vec![
                    Span::styled(prefix, style),
                    Span::styled(format!("{:<12}", command.name), style),
                    Span::styled(
                        format!(" - {}", command.description),
                        self.theme.list_item.add_modifier(Modifier::DIM),
                    ),
                ])))
            })
            .collect();

        if items.is_empty() {
            let no_results = Line::from(vec![Span::styled(
                "  No matching commands.",
                self.theme.list_item.add_modifier(Modifier::DIM),
            )]);
            buf.set_line(inner.x, inner.y, &no_results, inner.width);
        } else {
            let mut list_state = ListState::default().with_selected(Some(selected));
            StatefulWidget::render(List::new(items), inner, buf, &mut list_state);
        }
    }
}
