use crate::app::state::MessageId;
use crate::domain::codec::RecordForm;
use crate::domain::models::{Record, Schema};
use chrono::NaiveDate;

/// Effects returned by the reducer and run by the store handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    LoadFreeTime {
        start: NaiveDate,
        end: NaiveDate,
    },
    QueryTasks(String),
    CreateTitled(String),
    OpenDraft,
    LoadRecent,
    EditRecord {
        message_id: MessageId,
        record: Record,
    },
    SaveRecord {
        message_id: MessageId,
        form: RecordForm,
        schema: Schema,
    },
    ArchiveRecord {
        message_id: MessageId,
        record_id: String,
    },
}
