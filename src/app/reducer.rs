use super::{
    action::{Action, UpdateResult},
    command::Command,
    features,
    state::AppState,
};

type Feature = fn(&mut AppState, &Action) -> UpdateResult;

// Order matters: mode-specific features run before the mode-agnostic ones.
const FEATURES: [Feature; 5] = [
    features::ui::update,
    features::composer::update,
    features::browse::update,
    features::editor::update,
    features::conversation::update,
];

pub fn update(state: &mut AppState, action: Action) -> Option<Command> {
    for feature in FEATURES {
        if let UpdateResult::Handled(command) = feature(state, &action) {
            return command;
        }
    }
    None
}
