use crate::app::{
    action::Action,
    state::{AppMode, AppState},
};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub fn map_event_to_action(event: Event, app_state: &AppState<'_>) -> Option<Action> {
    match event {
        Event::Resize(w, h) => Some(Action::Resize(w, h)),
        Event::Key(key) if key.kind == KeyEventKind::Release => None,
        Event::Key(key) => map_key(key, app_state),
        _ => None,
    }
}

fn map_key(key: KeyEvent, app_state: &AppState<'_>) -> Option<Action> {
    // Palette navigation only while the palette is showing
    if app_state.mode == AppMode::Compose && app_state.dispatch.is_palette_open {
        match key.code {
            KeyCode::Up => return Some(Action::PalettePrev),
            KeyCode::Down => return Some(Action::PaletteNext),
            _ => {}
        }
    }

    if let Some(action) = app_state.keymap.get_action(key, app_state.mode) {
        return Some(action);
    }

    match app_state.mode {
        AppMode::Compose => match key.code {
            // The composer is single-line
            KeyCode::Enter => Some(Action::Submit),
            _ => Some(Action::ComposerInput(key)),
        },
        AppMode::Browse => None,
        AppMode::Edit => match key.code {
            KeyCode::Char(' ') => {
                let accepts_text = app_state
                    .active_editor()
                    .is_some_and(|editor| editor.accepts_text());
                if accepts_text {
                    Some(Action::FieldInput(key))
                } else {
                    Some(Action::ToggleOption)
                }
            }
            KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => None,
            KeyCode::Char(_) | KeyCode::Backspace => Some(Action::FieldInput(key)),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_compose_keys() {
        let state = AppState::default();
        assert_eq!(
            map_event_to_action(press(KeyCode::Enter), &state),
            Some(Action::Submit)
        );
        assert_eq!(
            map_event_to_action(press(KeyCode::Tab), &state),
            Some(Action::EnterBrowse)
        );
        assert!(matches!(
            map_event_to_action(press(KeyCode::Char('x')), &state),
            Some(Action::ComposerInput(_))
        ));
        // Closed palette: arrows go to the text area
        assert!(matches!(
            map_event_to_action(press(KeyCode::Down), &state),
            Some(Action::ComposerInput(_))
        ));
    }

    #[test]
    fn test_open_palette_captures_arrows() {
        let mut state = AppState::default();
        state.dispatch.is_palette_open = true;
        assert_eq!(
            map_event_to_action(press(KeyCode::Down), &state),
            Some(Action::PaletteNext)
        );
        assert_eq!(
            map_event_to_action(press(KeyCode::Up), &state),
            Some(Action::PalettePrev)
        );
    }

    #[test]
    fn test_release_events_are_ignored() {
        let state = AppState::default();
        let release = Event::Key(KeyEvent::new_with_kind(
            KeyCode::Enter,
            KeyModifiers::NONE,
            KeyEventKind::Release,
        ));
        assert_eq!(map_event_to_action(release, &state), None);
    }

    #[test]
    fn test_edit_mode_without_editor_toggles_on_space() {
        let mut state = AppState::default();
        state.mode = AppMode::Edit;
        assert_eq!(
            map_event_to_action(press(KeyCode::Char(' ')), &state),
            Some(Action::ToggleOption)
        );
        assert_eq!(
            map_event_to_action(press(KeyCode::Esc), &state),
            Some(Action::CancelEdit)
        );
        assert!(matches!(
            map_event_to_action(press(KeyCode::Char('a')), &state),
            Some(Action::FieldInput(_))
        ));
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let mut state = AppState::default();
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        for mode in [AppMode::Compose, AppMode::Browse, AppMode::Edit] {
            state.mode = mode;
            assert_eq!(map_event_to_action(ctrl_c.clone(), &state), Some(Action::Quit));
        }
    }
}
