use crate::app::state::AppState;
use crate::theme::{glyphs, Theme};

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

pub struct Header<'a> {
    pub state: &'a AppState<'a>,
    pub theme: &'a Theme,
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let theme = self.theme;
        let state = self.state;

        // Segment background colors for separator transitions
        let logo_bg = theme.header_logo.bg.unwrap_or(Color::Reset);
        let database_bg = theme.header_database.bg.unwrap_or(Color::Reset);
        let busy_bg = theme.header_busy.bg.unwrap_or(Color::Reset);
        let base_bg = theme.header.bg.unwrap_or(Color::Reset);

        let database = if state.database_label.is_empty() {
            "no database"
        } else {
            state.database_label.as_str()
        };

        let mut spans = vec![
            Span::styled(format!(" {} PAGECHAT ", glyphs::LOGO), theme.header_logo),
            Span::styled(glyphs::SEP_RIGHT, Style::default().fg(logo_bg).bg(database_bg)),
            Span::styled(
                format!(" {} {database} ", glyphs::DATABASE),
                theme.header_database,
            ),
        ];

        if state.is_busy() {
            let label = state.busy_label.as_deref().unwrap_or("Working...");
            spans.push(Span::styled(
                glyphs::SEP_RIGHT,
                Style::default().fg(database_bg).bg(busy_bg),
            ));
            spans.push(Span::styled(
                format!(" {} {label} ", state.spinner()),
                theme.header_busy,
            ));
            spans.push(Span::styled(
                glyphs::SEP_RIGHT,
                Style::default().fg(busy_bg).bg(base_bg),
            ));
        } else {
            spans.push(Span::styled(
                glyphs::SEP_RIGHT,
                Style::default().fg(database_bg).bg(base_bg),
            ));
        }

        // Theme name on the right edge
        let mode = format!(" {} ", state.theme_mode.label());
        let used: usize = spans.iter().map(Span::width).sum();
        let padding = (area.width as usize).saturating_sub(used + mode.len());
        spans.push(Span::styled(" ".repeat(padding), theme.header));
        spans.push(Span::styled(mode, theme.dimmed));

        Paragraph::new(Line::from(spans))
            .style(theme.header)
            .render(area, buf);
    }
}
