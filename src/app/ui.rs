use crate::app::state::{AppMode, AppState};
use crate::components::{
    chat_log::ChatLog, composer::Composer, footer::Footer, header::Header,
    palette::CommandPalette, popup,
};

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

pub struct AppLayout {
    pub header: Rect,
    pub log: Rect,
    pub composer: Rect,
    pub footer: Rect,
}

pub fn get_layout(area: Rect) -> AppLayout {
    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Conversation
            Constraint::Length(3), // Composer
            Constraint::Length(1), // Footer
        ])
        .split(area);

    AppLayout {
        header: main[0],
        log: main[1],
        composer: main[2],
        footer: main[3],
    }
}

pub fn draw(f: &mut Frame, app_state: &AppState) {
    let area = f.area();
    if area.width == 0 || area.height == 0 {
        return;
    }

    let theme = &app_state.theme;
    let layout = get_layout(area);

    // --- Header ---
    if layout.header.height > 0 {
        f.render_widget(
            Header {
                state: app_state,
                theme,
            },
            layout.header,
        );
    }

    // --- Conversation ---
    if layout.log.height > 0 {
        f.render_widget(
            ChatLog {
                state: app_state,
                theme,
            },
            layout.log,
        );
    }

    // --- Composer ---
    if layout.composer.height > 0 {
        f.render_widget(
            Composer {
                state: app_state,
                theme,
            },
            layout.composer,
        );
    }

    // --- Palette (over the conversation) ---
    if app_state.mode == AppMode::Compose && app_state.dispatch.is_palette_open {
        let height = CommandPalette::height(&app_state.dispatch);
        let palette_area = popup::above(layout.composer, height, layout.log);
        f.render_widget(
            CommandPalette {
                theme,
                state: &app_state.dispatch,
                registry: &app_state.registry,
                bounds: area,
            },
            palette_area,
        );
    }

    // --- Footer ---
    if layout.footer.height > 0 {
        f.render_widget(
            Footer {
                state: app_state,
                theme,
            },
            layout.footer,
        );
    }
}
