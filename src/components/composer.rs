use crate::app::state::{AppMode, AppState};
use crate::theme::Theme;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Widget},
};

pub struct Composer<'a> {
    pub state: &'a AppState<'a>,
    pub theme: &'a Theme,
}

impl Widget for Composer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let focused = self.state.mode == AppMode::Compose;
        let border = if focused {
            self.theme.border_focus
        } else {
            self.theme.border
        };

        let title = match self.state.mode {
            AppMode::Compose => " MESSAGE ",
            AppMode::Browse => " BROWSING ",
            AppMode::Edit => " EDITING ",
        };
        let block = Block::default()
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(title, self.theme.field_label),
                Span::raw(" "),
            ]))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);

        let inner = block.inner(area);
        block.render(area, buf);

        if self.state.composer_text().is_empty() && focused {
            buf.set_line(
                inner.x,
                inner.y,
                &Line::from(Span::styled(
                    "Type a message or / for commands",
                    self.theme.dimmed,
                )),
                inner.width,
            );
            return;
        }
        Widget::render(&self.state.composer, inner, buf);
    }
}
