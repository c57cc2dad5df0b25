use crate::app::{
    action::{Action, UpdateResult},
    state::AppState,
};

pub fn update(state: &mut AppState, action: &Action) -> UpdateResult {
    match action {
        Action::Tick => {
            if state.is_busy() {
                state.frame_count = state.frame_count.wrapping_add(1);
            }
            UpdateResult::Handled(None)
        }
        // Layout is recomputed on every draw
        Action::Resize(_, _) => UpdateResult::Handled(None),
        Action::Quit => {
            state.should_quit = true;
            UpdateResult::Handled(None)
        }
        _ => UpdateResult::NotHandled,
    }
}
