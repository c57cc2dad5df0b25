use crate::app::{
    action::{Action, UpdateResult},
    command::Command,
    command_palette::SlashAction,
    slash::{self, CommandContext, Effect},
    state::{AppMode, AppState, Direction},
};
use chrono::Local;
use std::sync::Arc;

pub fn update(state: &mut AppState, action: &Action) -> UpdateResult {
    if state.mode != AppMode::Compose {
        return UpdateResult::NotHandled;
    }

    match action {
        Action::ComposerInput(key) => {
            state.composer.input(*key);
            let text = state.composer_text();
            let registry = Arc::clone(&state.registry);
            state.dispatch.update_input(&text, &registry);
            UpdateResult::Handled(None)
        }
        Action::PaletteNext => {
            state.dispatch.navigate(Direction::Down);
            UpdateResult::Handled(None)
        }
        Action::PalettePrev => {
            state.dispatch.navigate(Direction::Up);
            UpdateResult::Handled(None)
        }
        Action::Submit => UpdateResult::Handled(submit(state)),
        Action::Escape => {
            state.dispatch.close();
            UpdateResult::Handled(None)
        }
        _ => UpdateResult::NotHandled,
    }
}

/// Enter: run the highlighted palette entry, otherwise dispatch the full line.
fn submit(state: &mut AppState) -> Option<Command> {
    let input = state.composer_text();

    if let Some(index) = state.dispatch.selected() {
        let definition = state.registry.get(index)?.clone();
        state.conversation.push_sent(definition.name);
        state.clear_composer();
        return run(state, definition.action, &input, None);
    }

    let line = input.trim();
    if line.is_empty() {
        return None;
    }
    state.conversation.push_sent(line);
    state.clear_composer();

    match state.registry.resolve_for_execution(line) {
        Ok(Some(resolved)) => {
            let action = state.registry.get(resolved.index)?.action;
            run(state, action, line, resolved.argument.as_deref())
        }
        // Plain chat text
        Ok(None) => None,
        Err(e) => {
            state.conversation.push_received(e.to_string());
            None
        }
    }
}

fn run(
    state: &mut AppState,
    action: SlashAction,
    input: &str,
    argument: Option<&str>,
) -> Option<Command> {
    let registry = Arc::clone(&state.registry);
    let ctx = CommandContext {
        input,
        argument,
        registry: &registry,
        today: Local::now().date_naive(),
    };

    match slash::execute(action, &ctx) {
        Ok(Effect::ClearLog) => {
            state.conversation.clear();
            state.selected_bubble = None;
            state.editing = None;
            None
        }
        Ok(Effect::Reply(text)) => {
            state.conversation.push_received(text);
            None
        }
        Ok(Effect::SetTheme(mode)) => {
            state.set_theme(mode);
            None
        }
        Ok(Effect::Run(command)) => Some(command),
        Err(e) => {
            state.conversation.push_received(e.to_string());
            None
        }
    }
}
