use crate::domain::models::{CalendarEvent, PropertyValue, Record, RecordQuery, Schema};
use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use indexmap::IndexMap;
use std::sync::Arc;

pub type Properties = IndexMap<String, PropertyValue>;

/// Events for a date range plus the schema property used to resolve it.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRange {
    pub events: Vec<CalendarEvent>,
    pub date_property: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    // Fetched fresh for every edit; callers must not cache it
    async fn get_schema(&self) -> Result<Schema>;

    async fn query_records(&self, query: RecordQuery) -> Result<Vec<Record>>;

    async fn create_record(&self, properties: Properties) -> Result<Record>;
    async fn update_record(&self, id: &str, properties: Properties) -> Result<Record>;

    // Soft delete
    async fn archive_record(&self, id: &str) -> Result<()>;

    async fn query_events_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<EventRange>;
}

/// Establishes a store session (credentials, connection test).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreConnector: Send + Sync {
    async fn connect(&self) -> Result<Arc<dyn RecordStore>>;
}
