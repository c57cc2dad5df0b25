use crate::app::{
    action::{Action, UpdateResult},
    command::Command,
    state::{AppMode, AppState, MessageId},
};

pub fn update(state: &mut AppState, action: &Action) -> UpdateResult {
    match action {
        Action::EnterBrowse => {
            if let Some(last) = state.conversation.bubble_ids().last() {
                state.selected_bubble = Some(*last);
                state.mode = AppMode::Browse;
                state.dispatch.close();
            }
            UpdateResult::Handled(None)
        }
        _ if state.mode != AppMode::Browse => UpdateResult::NotHandled,
        Action::BrowseNext => {
            move_selection(state, true);
            UpdateResult::Handled(None)
        }
        Action::BrowsePrev => {
            move_selection(state, false);
            UpdateResult::Handled(None)
        }
        Action::EditSelected => {
            let Some(id) = state.selected_bubble else {
                return UpdateResult::Handled(None);
            };
            UpdateResult::Handled(begin_edit(state, id))
        }
        Action::DeleteSelected => {
            let Some(id) = state.selected_bubble else {
                return UpdateResult::Handled(None);
            };
            let command = delete_bubble(state, id);
            if state.conversation.bubble_ids().is_empty() {
                state.mode = AppMode::Compose;
            }
            UpdateResult::Handled(command)
        }
        Action::Escape => {
            state.mode = AppMode::Compose;
            state.selected_bubble = None;
            UpdateResult::Handled(None)
        }
        _ => UpdateResult::NotHandled,
    }
}

fn move_selection(state: &mut AppState, forward: bool) {
    let ids = state.conversation.bubble_ids();
    if ids.is_empty() {
        state.selected_bubble = None;
        return;
    }
    let len = ids.len();
    let current = state
        .selected_bubble
        .and_then(|id| ids.iter().position(|i| *i == id));
    let next = match current {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None => len - 1,
    };
    state.selected_bubble = Some(ids[next]);
}

/// Focus an open editor, or fetch the schema to open one.
fn begin_edit(state: &mut AppState, id: MessageId) -> Option<Command> {
    let bubble = state.conversation.bubble_mut(id)?;
    if bubble.is_editing() {
        state.editing = Some(id);
        state.mode = AppMode::Edit;
        return None;
    }
    Some(Command::EditRecord {
        message_id: id,
        record: bubble.record.clone(),
    })
}

/// Drafts are discarded locally; persisted records are archived.
pub(crate) fn delete_bubble(state: &mut AppState, id: MessageId) -> Option<Command> {
    let bubble = state.conversation.bubble_mut(id)?;
    let persisted_id = if bubble.is_new {
        None
    } else {
        bubble.record.id.clone()
    };

    if let Some(record_id) = persisted_id {
        return Some(Command::ArchiveRecord {
            message_id: id,
            record_id,
        });
    }
    forget_bubble(state, id);
    None
}

/// Drop a bubble from the log and from any selection pointing at it.
pub(crate) fn forget_bubble(state: &mut AppState, id: MessageId) {
    state.conversation.remove(id);
    if state.selected_bubble == Some(id) {
        state.selected_bubble = state.conversation.bubble_ids().last().copied();
    }
    if state.editing == Some(id) {
        state.editing = None;
    }
}
