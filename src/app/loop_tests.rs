use super::*;
use crate::app::action::Action;
use crate::app::command::Command;
use crate::app::slash::TASKS_USAGE;
use crate::app::state::{AppMode, AppState, MessageBody};
use crate::domain::models::{
    CalendarEvent, ChoiceKind, DateValue, PropertyDescriptor, PropertyKind, PropertyValue, Record,
    RecordFilter, RecordQuery, Schema, SelectOption,
};
use crate::domain::store::{
    EventRange, MockRecordStore, MockStoreConnector, Properties, RecordStore,
};
use crate::error::Error;
use chrono::{Datelike, Weekday};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use indexmap::IndexMap;
use rand::{Rng, SeedableRng};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::mpsc;

fn task_schema() -> Schema {
    Schema::new([
        (
            "Name".to_string(),
            PropertyDescriptor::new(PropertyKind::Title),
        ),
        (
            "Status".to_string(),
            PropertyDescriptor::with_options(
                PropertyKind::Status,
                vec![
                    SelectOption::new("s1", "Not started"),
                    SelectOption::new("s2", "Done"),
                ],
            ),
        ),
        ("Due".to_string(), PropertyDescriptor::new(PropertyKind::Date)),
    ])
}

fn session_with(store: MockRecordStore) -> Arc<Session> {
    let store: Arc<dyn RecordStore> = Arc::new(store);
    let mut connector = MockStoreConnector::new();
    connector
        .expect_connect()
        .returning(move || Ok(Arc::clone(&store)));
    Arc::new(Session::new(Arc::new(connector)))
}

fn type_line(state: &mut AppState<'_>, line: &str) {
    for c in line.chars() {
        let key = KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
        reducer::update(state, Action::ComposerInput(key));
    }
}

/// Feed effect results into the reducer until the finishing action arrives.
async fn settle(state: &mut AppState<'_>, rx: &mut mpsc::Receiver<Action>) {
    loop {
        let action = rx.recv().await.unwrap();
        let finished = !matches!(action, Action::OperationStarted(_) | Action::Notice(_));
        assert_eq!(reducer::update(state, action), None);
        if finished {
            break;
        }
    }
    assert!(!state.is_busy());
}

#[tokio::test]
async fn test_tasks_without_status_shows_usage() {
    let mut state = AppState::default();
    type_line(&mut state, "/tasks");
    assert!(state.dispatch.is_palette_open);

    let command = reducer::update(&mut state, Action::Submit);

    assert_eq!(command, None);
    assert_eq!(state.conversation.last_text(), Some(TASKS_USAGE));
    assert!(state.composer_text().is_empty());
    assert!(!state.dispatch.is_palette_open);
}

#[tokio::test]
async fn test_tasks_filters_on_resolved_status_property() {
    let mut store = MockRecordStore::new();
    store.expect_get_schema().returning(|| Ok(task_schema()));
    store
        .expect_query_records()
        .withf(|query: &RecordQuery| {
            query.filter
                == Some(RecordFilter::Equals {
                    property: "Status".to_string(),
                    kind: ChoiceKind::Status,
                    value: "Done".to_string(),
                })
        })
        .times(1)
        .returning(|_| {
            let mut properties = IndexMap::new();
            properties.insert("Name".to_string(), PropertyValue::title("Write report"));
            properties.insert(
                "Due".to_string(),
                PropertyValue::Date {
                    date: Some(DateValue {
                        start: "2025-01-15".to_string(),
                        end: None,
                        time_zone: None,
                    }),
                },
            );
            Ok(vec![Record::persisted("page-1", properties)])
        });
    let session = session_with(store);

    let mut state = AppState::default();
    type_line(&mut state, "/tasks done");
    let command = reducer::update(&mut state, Action::Submit);
    assert_eq!(command, Some(Command::QueryTasks("done".to_string())));

    let (tx, mut rx) = mpsc::channel(10);
    handle_command(command.unwrap(), session, tx).unwrap();
    settle(&mut state, &mut rx).await;

    assert_eq!(
        state.conversation.last_text(),
        Some("Tasks with status \"done\":\n• Write report (Due: 1/15/2025)")
    );
}

#[tokio::test]
async fn test_store_error_becomes_chat_message() {
    let mut store = MockRecordStore::new();
    store.expect_get_schema().returning(|| {
        Ok(Schema::new([(
            "Name".to_string(),
            PropertyDescriptor::new(PropertyKind::Title),
        )]))
    });
    store.expect_query_records().never();
    let session = session_with(store);

    let mut state = AppState::default();
    type_line(&mut state, "/tasks done");
    let command = reducer::update(&mut state, Action::Submit).unwrap();

    let (tx, mut rx) = mpsc::channel(10);
    handle_command(command, session, tx).unwrap();

    let started = rx.recv().await.unwrap();
    assert_eq!(started, Action::OperationStarted("Fetching tasks...".to_string()));
    reducer::update(&mut state, started);
    assert!(state.is_busy());

    settle(&mut state, &mut rx).await;
    assert_eq!(
        state.conversation.last_text(),
        Some("Error fetching tasks: No status/state property found in database")
    );
    assert!(!state.should_quit);
}

#[tokio::test]
async fn test_new_with_title_creates_directly() {
    let mut store = MockRecordStore::new();
    store.expect_get_schema().returning(|| Ok(task_schema()));
    store
        .expect_create_record()
        .withf(|properties| {
            properties.get("Name") == Some(&PropertyValue::title("buy milk"))
                && properties.get("Status").is_none()
        })
        .times(1)
        .returning(|properties| Ok(Record::persisted("page-2", properties)));
    let session = session_with(store);

    let mut state = AppState::default();
    type_line(&mut state, "/new buy milk");
    let command = reducer::update(&mut state, Action::Submit);
    assert_eq!(command, Some(Command::CreateTitled("buy milk".to_string())));

    let (tx, mut rx) = mpsc::channel(10);
    handle_command(command.unwrap(), session, tx).unwrap();
    settle(&mut state, &mut rx).await;

    assert_eq!(state.conversation.last_text(), Some("✓ Created: buy milk"));
}

#[tokio::test]
async fn test_draft_with_empty_title_is_saved_as_untitled() {
    let mut store = MockRecordStore::new();
    store.expect_get_schema().returning(|| Ok(task_schema()));
    store
        .expect_create_record()
        .withf(|properties| properties.get("Name") == Some(&PropertyValue::title("Untitled")))
        .times(1)
        .returning(|properties| Ok(Record::persisted("page-3", properties)));
    let session = session_with(store);
    let (tx, mut rx) = mpsc::channel(10);

    let mut state = AppState::default();
    type_line(&mut state, "/new");
    let command = reducer::update(&mut state, Action::Submit);
    assert_eq!(command, Some(Command::OpenDraft));

    handle_command(command.unwrap(), session.clone(), tx.clone()).unwrap();
    settle(&mut state, &mut rx).await;
    assert_eq!(state.mode, AppMode::Edit);
    let editor = state.active_editor().unwrap();
    assert_eq!(editor.form.fields.len(), 3);

    let save = reducer::update(&mut state, Action::SaveEdit).unwrap();
    assert!(matches!(save, Command::SaveRecord { .. }));
    handle_command(save, session, tx).unwrap();
    settle(&mut state, &mut rx).await;

    assert_eq!(state.mode, AppMode::Compose);
    assert_eq!(state.conversation.last_text(), Some("Successfully created entry"));
    let saved = state
        .conversation
        .messages
        .iter()
        .find_map(|m| match &m.body {
            MessageBody::Record(bubble) => Some(bubble),
            MessageBody::Text(_) => None,
        })
        .unwrap();
    assert_eq!(saved.record.id.as_deref(), Some("page-3"));
    assert!(!saved.is_new);
    assert!(saved.editor.is_none());
}

#[tokio::test]
async fn test_free_time_counts_events_on_the_queried_week() {
    let mut state = AppState::default();
    type_line(&mut state, "/freetime");
    let command = reducer::update(&mut state, Action::Submit).unwrap();
    let Command::LoadFreeTime { start, end } = command.clone() else {
        panic!("expected LoadFreeTime, got {command:?}");
    };
    assert_eq!(start.weekday(), Weekday::Mon);
    assert_eq!((end - start).num_days(), 4);

    let mut store = MockRecordStore::new();
    store
        .expect_query_events_in_range()
        .withf(move |from, to| *from == start && *to == end)
        .times(1)
        .returning(move |_, _| {
            Ok(EventRange {
                events: vec![CalendarEvent {
                    id: "page-7".to_string(),
                    title: "Planning".to_string(),
                    start: start.and_hms_opt(9, 0, 0).unwrap(),
                    end: start.and_hms_opt(12, 0, 0).unwrap(),
                    description: None,
                    location: None,
                    attendees: BTreeSet::new(),
                }],
                date_property: "Due".to_string(),
            })
        });
    let session = session_with(store);

    let (tx, mut rx) = mpsc::channel(10);
    handle_command(command, session, tx).unwrap();
    settle(&mut state, &mut rx).await;

    assert_eq!(
        state.conversation.last_text(),
        Some(
            "Free time for next week:\nM - 5 hours\nT - 8 hours\nW - 8 hours\nTh - 8 hours\nF - 8 hours"
        )
    );
}

fn editable_schema() -> Schema {
    let mut properties: Vec<(String, PropertyDescriptor)> = task_schema()
        .iter()
        .map(|(name, descriptor)| (name.clone(), descriptor.clone()))
        .collect();
    properties.push((
        "Created".to_string(),
        PropertyDescriptor::new(PropertyKind::CreatedTime),
    ));
    Schema::new(properties)
}

fn stored_record() -> Record {
    let mut properties = IndexMap::new();
    properties.insert("Name".to_string(), PropertyValue::title("Draft report"));
    properties.insert(
        "Status".to_string(),
        PropertyValue::Status {
            status: Some(SelectOption::new("s1", "Not started")),
        },
    );
    properties.insert(
        "Created".to_string(),
        PropertyValue::CreatedTime {
            created_time: "2024-01-02T10:00:00.000Z".to_string(),
        },
    );
    Record::persisted("page-9", properties)
}

#[tokio::test]
async fn test_viewed_record_is_updated_then_archived() {
    let mut store = MockRecordStore::new();
    store.expect_get_schema().returning(|| Ok(editable_schema()));
    store
        .expect_query_records()
        .withf(|query: &RecordQuery| query.filter.is_none() && query.limit == Some(10))
        .times(1)
        .returning(|_| Ok(vec![stored_record()]));
    store.expect_create_record().never();
    store
        .expect_update_record()
        .withf(|id: &str, properties: &Properties| {
            id == "page-9"
                && properties.get("Name") == Some(&PropertyValue::title("Draft report v2"))
                && !properties.contains_key("Created")
        })
        .times(1)
        .returning(|id, properties| Ok(Record::persisted(id, properties)));
    store
        .expect_archive_record()
        .withf(|id: &str| id == "page-9")
        .times(1)
        .returning(|_| Ok(()));
    let session = session_with(store);
    let (tx, mut rx) = mpsc::channel(10);

    let mut state = AppState::default();
    type_line(&mut state, "/view");
    let command = reducer::update(&mut state, Action::Submit);
    assert_eq!(command, Some(Command::LoadRecent));
    handle_command(command.unwrap(), session.clone(), tx.clone()).unwrap();
    settle(&mut state, &mut rx).await;
    assert_eq!(state.conversation.bubble_ids().len(), 1);

    // Browse to the bubble and open its editor
    reducer::update(&mut state, Action::EnterBrowse);
    assert_eq!(state.mode, AppMode::Browse);
    let edit = reducer::update(&mut state, Action::EditSelected).unwrap();
    assert!(matches!(edit, Command::EditRecord { .. }));
    handle_command(edit, session.clone(), tx.clone()).unwrap();
    settle(&mut state, &mut rx).await;
    assert_eq!(state.mode, AppMode::Edit);
    let editor = state.active_editor().unwrap();
    assert!(editor.form.field("Created").is_none());
    assert_eq!(editor.current_field().unwrap().name, "Name");

    for c in " v2".chars() {
        let key = KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
        reducer::update(&mut state, Action::FieldInput(key));
    }
    let save = reducer::update(&mut state, Action::SaveEdit).unwrap();
    handle_command(save, session.clone(), tx.clone()).unwrap();
    settle(&mut state, &mut rx).await;
    assert_eq!(state.mode, AppMode::Compose);
    assert_eq!(state.conversation.last_text(), Some("Successfully updated entry"));

    reducer::update(&mut state, Action::EnterBrowse);
    let delete = reducer::update(&mut state, Action::DeleteSelected).unwrap();
    assert!(matches!(
        &delete,
        Command::ArchiveRecord { record_id, .. } if record_id == "page-9"
    ));
    handle_command(delete, session, tx).unwrap();
    settle(&mut state, &mut rx).await;

    assert_eq!(state.conversation.last_text(), Some("Entry deleted successfully"));
    assert!(state.conversation.bubble_ids().is_empty());
    assert_eq!(state.mode, AppMode::Compose);
}

#[tokio::test]
async fn test_uppercase_command_line_still_dispatches() {
    let mut state = AppState::default();
    type_line(&mut state, "/TASKS done");
    let command = reducer::update(&mut state, Action::Submit);
    assert_eq!(command, Some(Command::QueryTasks("done".to_string())));
}

#[tokio::test]
async fn test_keystroke_fuzzing() {
    let mut connector = MockStoreConnector::new();
    connector
        .expect_connect()
        .returning(|| Err(Error::Connection("offline".to_string())));
    let session = Arc::new(Session::new(Arc::new(connector)));

    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    let app_state = AppState::default();

    let (event_tx, event_rx) = mpsc::channel(100);

    // Spawn a task to feed random events
    let fuzzer_handle = tokio::spawn(async move {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        for _ in 0..5000 {
            let event = match rng.gen_range(0..100) {
                0..=5 => {
                    let w = rng.gen_range(10..200);
                    let h = rng.gen_range(5..100);
                    Event::Resize(w, h)
                }
                _ => generate_random_key(&mut rng),
            };
            if event_tx.send(Ok(event)).await.is_err() {
                break;
            }
            // Yield to allow the loop to process events
            if rng.gen_bool(0.1) {
                tokio::task::yield_now().await;
            }
        }
        let _ = event_tx
            .send(Ok(Event::Key(KeyEvent::new(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL,
            ))))
            .await;
    });

    let result = tokio::time::timeout(
        std::time::Duration::from_secs(30),
        run_loop_with_events(&mut terminal, app_state, session, event_rx),
    )
    .await;

    match result {
        Ok(res) => res.unwrap(),
        Err(_) => panic!("Fuzzer timed out - possible deadlock or too slow"),
    }

    fuzzer_handle.await.unwrap();
}

fn generate_random_key<R: Rng>(rng: &mut R) -> Event {
    let code = match rng.gen_range(0..20) {
        0 => KeyCode::Esc,
        1 => KeyCode::Enter,
        2 => KeyCode::Left,
        3 => KeyCode::Right,
        4 => KeyCode::Up,
        5 => KeyCode::Down,
        6 => KeyCode::Home,
        7 => KeyCode::End,
        8 => KeyCode::Char('/'),
        9 => KeyCode::Char(' '),
        10 => KeyCode::Tab,
        11 => KeyCode::BackTab,
        12 => KeyCode::Delete,
        13 => KeyCode::Backspace,
        _ => {
            let c = rng.gen_range(b' '..=b'~') as char;
            KeyCode::Char(c)
        }
    };

    let mut modifiers = KeyModifiers::empty();
    if rng.gen_bool(0.05) {
        modifiers.insert(KeyModifiers::CONTROL);
    }
    if rng.gen_bool(0.1) {
        modifiers.insert(KeyModifiers::SHIFT);
    }

    Event::Key(KeyEvent::new(code, modifiers))
}
