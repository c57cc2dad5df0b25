use crate::domain::{
    calendar::event_from_record,
    models::{
        PropertyDescriptor, PropertyKind, PropertyValue, Record, RecordFilter, RecordQuery,
        RecordSort, Schema, SelectOption, SortDirection, SortKey,
    },
    query::date_range_filter,
    store::{EventRange, Properties, RecordStore, StoreConnector},
};
use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Method, StatusCode};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_API_BASE_URL: &str = "https://api.notion.com/v1";
pub const NOTION_VERSION: &str = "2022-06-28";

// Largest page the query endpoint returns
const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotionConfig {
    pub api_key: Option<String>,
    pub database_id: Option<String>,
    pub base_url: String,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            database_id: None,
            base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

pub struct NotionAdapter {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    database_id: String,
}

impl NotionAdapter {
    /// Validate credentials and test the connection by retrieving the database.
    pub async fn connect(config: &NotionConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::Connection("Notion API key is not configured".to_string()))?;
        let database_id = config
            .database_id
            .clone()
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| Error::Connection("Notion database id is not configured".to_string()))?;

        let adapter = Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            database_id,
        };

        adapter
            .send(Method::GET, &adapter.database_path(), None)
            .await
            .map_err(|e| match e {
                Error::StoreOperation(msg) => {
                    Error::Connection(format!("Failed to connect to Notion: {msg}"))
                }
                other => other,
            })?;
        info!(database = %adapter.database_id, "connected to notion");
        Ok(adapter)
    }

    fn database_path(&self) -> String {
        format!("databases/{}", self.database_id)
    }

    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%method, %url, "notion request");

        let mut request = self
            .client
            .request(method, &url)
            .bearer_auth(&self.api_key)
            .header("Notion-Version", NOTION_VERSION);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                Error::Connection(format!("Notion is unreachable: {e}"))
            } else {
                Error::StoreOperation(format!("Notion request failed: {e}"))
            }
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::StoreOperation(format!("Failed to read Notion response: {e}")))?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(%status, "notion rejected credentials");
            return Err(Error::Connection(format!(
                "Notion rejected the credentials ({status}): {text}"
            )));
        }
        if !status.is_success() {
            warn!(%status, "notion request failed");
            return Err(Error::StoreOperation(format!(
                "Notion API error ({status}): {text}"
            )));
        }

        serde_json::from_str(&text)
            .map_err(|e| Error::StoreOperation(format!("Invalid Notion response: {e}")))
    }
}

#[async_trait]
impl RecordStore for NotionAdapter {
    async fn get_schema(&self) -> Result<Schema> {
        let database = self.send(Method::GET, &self.database_path(), None).await?;
        Ok(parse_schema(&database))
    }

    async fn query_records(&self, query: RecordQuery) -> Result<Vec<Record>> {
        let path = format!("{}/query", self.database_path());
        let mut records = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page_size = match query.limit {
                Some(limit) if limit <= records.len() => break,
                Some(limit) => (limit - records.len()).min(MAX_PAGE_SIZE),
                None => MAX_PAGE_SIZE,
            };
            let body = query_body(&query, page_size, cursor.as_deref());
            let response = self.send(Method::POST, &path, Some(body)).await?;

            for page in response["results"].as_array().into_iter().flatten() {
                records.push(parse_page(page)?);
            }

            match response["next_cursor"].as_str() {
                Some(next) if response["has_more"].as_bool().unwrap_or(false) => {
                    cursor = Some(next.to_string());
                }
                _ => break,
            }
        }

        if let Some(limit) = query.limit {
            records.truncate(limit);
        }
        debug!(count = records.len(), "queried records");
        Ok(records)
    }

    async fn create_record(&self, properties: Properties) -> Result<Record> {
        let body = json!({
            "parent": { "database_id": self.database_id },
            "properties": properties_json(&properties)?,
        });
        let page = self.send(Method::POST, "pages", Some(body)).await?;
        let record = parse_page(&page)?;
        info!(id = ?record.id, "created record");
        Ok(record)
    }

    async fn update_record(&self, id: &str, properties: Properties) -> Result<Record> {
        let body = json!({ "properties": properties_json(&properties)? });
        let page = self
            .send(Method::PATCH, &format!("pages/{id}"), Some(body))
            .await?;
        info!(%id, "updated record");
        parse_page(&page)
    }

    async fn archive_record(&self, id: &str) -> Result<()> {
        self.send(
            Method::PATCH,
            &format!("pages/{id}"),
            Some(json!({ "archived": true })),
        )
        .await?;
        info!(%id, "archived record");
        Ok(())
    }

    async fn query_events_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<EventRange> {
        let schema = self.get_schema().await?;
        let filter = date_range_filter(&schema, start, end)?;
        let date_property = match &filter {
            RecordFilter::DateRange { property, .. } => property.clone(),
            RecordFilter::Equals { property, .. } => property.clone(),
        };

        let records = self
            .query_records(RecordQuery {
                filter: Some(filter),
                sort: Some(RecordSort {
                    key: SortKey::Property(date_property.clone()),
                    direction: SortDirection::Ascending,
                }),
                limit: None,
            })
            .await?;

        let events = records
            .iter()
            .filter_map(|r| event_from_record(r, &date_property))
            .collect();
        Ok(EventRange {
            events,
            date_property,
        })
    }
}

/// Connects a fresh [`NotionAdapter`] on every call.
pub struct NotionConnector {
    config: NotionConfig,
}

impl NotionConnector {
    #[must_use]
    pub fn new(config: NotionConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl StoreConnector for NotionConnector {
    async fn connect(&self) -> Result<Arc<dyn RecordStore>> {
        Ok(Arc::new(NotionAdapter::connect(&self.config).await?))
    }
}

// --- Wire helpers ---

pub(crate) fn parse_schema(database: &Value) -> Schema {
    let mut schema = Schema::default();
    let Some(properties) = database["properties"].as_object() else {
        return schema;
    };

    for (name, property) in properties {
        let type_name = property["type"].as_str().unwrap_or_default();
        let kind = PropertyKind::from_type_name(type_name);
        let options = match kind {
            PropertyKind::Select | PropertyKind::Status | PropertyKind::MultiSelect => {
                parse_options(&property[type_name]["options"])
            }
            _ => Vec::new(),
        };
        schema
            .properties
            .insert(name.clone(), PropertyDescriptor::with_options(kind, options));
    }
    schema
}

fn parse_options(options: &Value) -> Vec<SelectOption> {
    options
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|o| serde_json::from_value(o.clone()).ok())
        .collect()
}

pub(crate) fn parse_page(page: &Value) -> Result<Record> {
    let id = page["id"]
        .as_str()
        .ok_or_else(|| Error::StoreOperation("Notion page has no id".to_string()))?;

    let mut properties = Properties::new();
    for (name, value) in page["properties"].as_object().into_iter().flatten() {
        let value: PropertyValue = serde_json::from_value(value.clone()).map_err(|e| {
            Error::StoreOperation(format!("Invalid value for property \"{name}\": {e}"))
        })?;
        properties.insert(name.clone(), value);
    }
    Ok(Record::persisted(id, properties))
}

pub(crate) fn properties_json(properties: &Properties) -> Result<Value> {
    let mut out = Map::new();
    for (name, value) in properties {
        if value.kind().is_read_only() || matches!(value, PropertyValue::Unsupported) {
            continue;
        }
        let encoded = serde_json::to_value(value)
            .map_err(|e| Error::StoreOperation(format!("Failed to encode \"{name}\": {e}")))?;
        out.insert(name.clone(), encoded);
    }
    Ok(Value::Object(out))
}

pub(crate) fn filter_json(filter: &RecordFilter) -> Value {
    match filter {
        RecordFilter::Equals {
            property,
            kind,
            value,
        } => {
            let kind = match kind {
                crate::domain::models::ChoiceKind::Select => "select",
                crate::domain::models::ChoiceKind::Status => "status",
            };
            let mut condition = Map::new();
            condition.insert("property".to_string(), json!(property));
            condition.insert(kind.to_string(), json!({ "equals": value }));
            Value::Object(condition)
        }
        RecordFilter::DateRange {
            property,
            on_or_after,
            on_or_before,
        } => json!({
            "and": [
                { "property": property, "date": { "on_or_after": on_or_after.to_string() } },
                { "property": property, "date": { "on_or_before": on_or_before.to_string() } },
            ]
        }),
    }
}

pub(crate) fn sort_json(sort: &RecordSort) -> Value {
    let direction = match sort.direction {
        SortDirection::Ascending => "ascending",
        SortDirection::Descending => "descending",
    };
    match &sort.key {
        SortKey::Property(name) => json!({ "property": name, "direction": direction }),
        SortKey::CreatedTime => json!({ "timestamp": "created_time", "direction": direction }),
        SortKey::LastEditedTime => {
            json!({ "timestamp": "last_edited_time", "direction": direction })
        }
    }
}

pub(crate) fn query_body(query: &RecordQuery, page_size: usize, cursor: Option<&str>) -> Value {
    let mut body = Map::new();
    body.insert("page_size".to_string(), json!(page_size));
    if let Some(filter) = &query.filter {
        body.insert("filter".to_string(), filter_json(filter));
    }
    if let Some(sort) = &query.sort {
        body.insert("sorts".to_string(), json!([sort_json(sort)]));
    }
    if let Some(cursor) = cursor {
        body.insert("start_cursor".to_string(), json!(cursor));
    }
    Value::Object(body)
}
