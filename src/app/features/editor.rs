use crate::app::{
    action::{Action, UpdateResult},
    command::Command,
    features::browse::delete_bubble,
    state::{AppMode, AppState},
};
use crossterm::event::KeyCode;

pub fn update(state: &mut AppState, action: &Action) -> UpdateResult {
    if state.mode != AppMode::Edit {
        return UpdateResult::NotHandled;
    }

    match action {
        Action::FieldNext => with_editor(state, |e| e.next_field()),
        Action::FieldPrev => with_editor(state, |e| e.prev_field()),
        Action::FieldInput(key) => match key.code {
            KeyCode::Char(c) => with_editor(state, |e| e.input_char(c)),
            KeyCode::Backspace => with_editor(state, |e| e.backspace()),
            _ => UpdateResult::Handled(None),
        },
        Action::CycleOption(forward) => {
            let forward = *forward;
            with_editor(state, |e| e.cycle(forward))
        }
        Action::ToggleOption => with_editor(state, |e| e.toggle()),
        Action::SaveEdit => {
            let (Some(message_id), Some(editor)) = (state.editing, state.active_editor()) else {
                return UpdateResult::Handled(None);
            };
            UpdateResult::Handled(Some(Command::SaveRecord {
                message_id,
                form: editor.form.clone(),
                schema: editor.schema.clone(),
            }))
        }
        Action::DeleteEdit => {
            let Some(id) = state.editing else {
                return UpdateResult::Handled(None);
            };
            let command = delete_bubble(state, id);
            leave(state);
            UpdateResult::Handled(command)
        }
        Action::CancelEdit => {
            if let Some(id) = state.editing {
                if let Some(bubble) = state.conversation.bubble_mut(id) {
                    // Drafts keep their form open
                    if !bubble.is_new {
                        bubble.editor = None;
                    }
                }
            }
            leave(state);
            UpdateResult::Handled(None)
        }
        _ => UpdateResult::NotHandled,
    }
}

fn with_editor(
    state: &mut AppState,
    f: impl FnOnce(&mut crate::app::state::EditorState),
) -> UpdateResult {
    if let Some(editor) = state.active_editor_mut() {
        f(editor);
    }
    UpdateResult::Handled(None)
}

fn leave(state: &mut AppState) {
    state.editing = None;
    state.mode = AppMode::Compose;
}
