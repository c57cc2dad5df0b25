use crate::app::{
    action::{Action, UpdateResult},
    features::browse::forget_bubble,
    state::{AppMode, AppState, EditorState},
};

pub fn update(state: &mut AppState, action: &Action) -> UpdateResult {
    match action {
        Action::OperationStarted(label) => {
            state.in_flight += 1;
            state.busy_label = Some(label.clone());
        }
        Action::Notice(text) => {
            state.conversation.push_received(text.clone());
        }
        Action::Reply(text) | Action::ErrorOccurred(text) => {
            finish_operation(state);
            state.conversation.push_received(text.clone());
        }
        Action::RecordsLoaded(records) => {
            finish_operation(state);
            for record in records {
                state.conversation.push_record(record.clone(), None);
            }
        }
        Action::DraftReady { form, schema } => {
            finish_operation(state);
            let record = crate::domain::models::Record::draft();
            let editor = EditorState::new(form.clone(), schema.clone());
            let id = state.conversation.push_record(record, Some(editor));
            state.editing = Some(id);
            state.selected_bubble = Some(id);
            state.mode = AppMode::Edit;
            state.dispatch.close();
        }
        Action::EditorReady {
            message_id,
            form,
            schema,
        } => {
            finish_operation(state);
            if let Some(bubble) = state.conversation.bubble_mut(*message_id) {
                bubble.editor = Some(EditorState::new(form.clone(), schema.clone()));
                state.editing = Some(*message_id);
                state.selected_bubble = Some(*message_id);
                state.mode = AppMode::Edit;
            }
        }
        Action::RecordSaved {
            message_id,
            record,
            created,
        } => {
            finish_operation(state);
            if let Some(bubble) = state.conversation.bubble_mut(*message_id) {
                bubble.record = record.clone();
                bubble.is_new = false;
                bubble.editor = None;
            }
            if state.editing == Some(*message_id) {
                state.editing = None;
                state.mode = AppMode::Compose;
            }
            let verb = if *created { "created" } else { "updated" };
            state
                .conversation
                .push_received(format!("Successfully {verb} entry"));
        }
        Action::RecordArchived(message_id) => {
            finish_operation(state);
            forget_bubble(state, *message_id);
            if state.mode == AppMode::Browse && state.selected_bubble.is_none() {
                state.mode = AppMode::Compose;
            }
            state.conversation.push_received("Entry deleted successfully");
        }
        _ => return UpdateResult::NotHandled,
    }
    UpdateResult::Handled(None)
}

fn finish_operation(state: &mut AppState) {
    state.in_flight = state.in_flight.saturating_sub(1);
    if state.in_flight == 0 {
        state.busy_label = None;
    }
}
