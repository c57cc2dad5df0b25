use crate::app::command::Command;
use crate::app::state::MessageId;
use crate::domain::codec::RecordForm;
use crate::domain::models::{Record, Schema};
use crossterm::event::KeyEvent;

#[derive(Debug, Clone)]
pub enum UpdateResult {
    Handled(Option<Command>),
    NotHandled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // --- System / Terminal ---
    Tick,
    Resize(u16, u16),
    Quit,

    // --- Composer & Palette ---
    ComposerInput(KeyEvent),
    PaletteNext,
    PalettePrev,
    Submit,  // Enter: run the highlighted command or the full line
    Escape,  // Close the palette, or leave browse mode
    EnterBrowse,

    // --- Browse ---
    BrowseNext,
    BrowsePrev,
    EditSelected,
    DeleteSelected,

    // --- Editor ---
    FieldNext,
    FieldPrev,
    FieldInput(KeyEvent),
    CycleOption(bool), // forward?
    ToggleOption,
    SaveEdit,
    DeleteEdit,
    CancelEdit,

    // --- Async Results ---
    OperationStarted(String),
    Notice(String), // Informational reply that does not finish an operation
    Reply(String),
    ErrorOccurred(String),
    RecordsLoaded(Vec<Record>),
    DraftReady {
        form: RecordForm,
        schema: Schema,
    },
    EditorReady {
        message_id: MessageId,
        form: RecordForm,
        schema: Schema,
    },
    RecordSaved {
        message_id: MessageId,
        record: Record,
        created: bool,
    },
    RecordArchived(MessageId),
}
