use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

pub const UNTITLED: &str = "Untitled";

/// The enumerated type of a schema column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Title,
    RichText,
    Select,
    Status,
    Date,
    Checkbox,
    Url,
    Email,
    PhoneNumber,
    MultiSelect,
    CreatedTime,
    LastEditedTime,
    Other(String),
}

impl PropertyKind {
    #[must_use]
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "title" => PropertyKind::Title,
            "rich_text" => PropertyKind::RichText,
            "select" => PropertyKind::Select,
            "status" => PropertyKind::Status,
            "date" => PropertyKind::Date,
            "checkbox" => PropertyKind::Checkbox,
            "url" => PropertyKind::Url,
            "email" => PropertyKind::Email,
            "phone_number" => PropertyKind::PhoneNumber,
            "multi_select" => PropertyKind::MultiSelect,
            "created_time" => PropertyKind::CreatedTime,
            "last_edited_time" => PropertyKind::LastEditedTime,
            other => PropertyKind::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            PropertyKind::Title => "title",
            PropertyKind::RichText => "rich_text",
            PropertyKind::Select => "select",
            PropertyKind::Status => "status",
            PropertyKind::Date => "date",
            PropertyKind::Checkbox => "checkbox",
            PropertyKind::Url => "url",
            PropertyKind::Email => "email",
            PropertyKind::PhoneNumber => "phone_number",
            PropertyKind::MultiSelect => "multi_select",
            PropertyKind::CreatedTime => "created_time",
            PropertyKind::LastEditedTime => "last_edited_time",
            PropertyKind::Other(name) => name,
        }
    }

    /// Timestamps are maintained by the store and never shown in a form.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        matches!(self, PropertyKind::CreatedTime | PropertyKind::LastEditedTime)
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl SelectOption {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
            color: None,
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            color: None,
        }
    }
}

/// One column of the external schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub kind: PropertyKind,
    pub options: Vec<SelectOption>,
}

impl PropertyDescriptor {
    #[must_use]
    pub fn new(kind: PropertyKind) -> Self {
        Self {
            kind,
            options: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_options(kind: PropertyKind, options: Vec<SelectOption>) -> Self {
        Self { kind, options }
    }

    #[must_use]
    pub fn option_named(&self, name: &str) -> Option<&SelectOption> {
        self.options.iter().find(|o| o.name == name)
    }
}

/// Property name -> descriptor, in the store's column order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    pub properties: IndexMap<String, PropertyDescriptor>,
}

impl Schema {
    pub fn new(properties: impl IntoIterator<Item = (String, PropertyDescriptor)>) -> Self {
        Self {
            properties: properties.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(name)
    }

    /// Name of the first property of the given kind.
    #[must_use]
    pub fn first_of_kind(&self, kind: &PropertyKind) -> Option<&str> {
        self.properties
            .iter()
            .find(|(_, d)| &d.kind == kind)
            .map(|(name, _)| name.as_str())
    }

    /// The designated name field.
    #[must_use]
    pub fn title_property(&self) -> Option<&str> {
        self.first_of_kind(&PropertyKind::Title)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropertyDescriptor)> {
        self.properties.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    pub content: String,
}

/// A single rich-text run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichText {
    #[serde(rename = "type", default = "text_run_kind")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plain_text: Option<String>,
}

fn text_run_kind() -> String {
    "text".to_string()
}

impl RichText {
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            kind: text_run_kind(),
            text: Some(TextContent {
                content: content.into(),
            }),
            plain_text: None,
        }
    }

    #[must_use]
    pub fn as_plain(&self) -> &str {
        self.plain_text
            .as_deref()
            .or_else(|| self.text.as_ref().map(|t| t.content.as_str()))
            .unwrap_or("")
    }
}

pub fn plain_text(runs: &[RichText]) -> String {
    runs.iter().map(RichText::as_plain).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateValue {
    pub start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

/// A property value in the store's wire shape, tagged with its own type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title {
        title: Vec<RichText>,
    },
    RichText {
        rich_text: Vec<RichText>,
    },
    Select {
        select: Option<SelectOption>,
    },
    Status {
        status: Option<SelectOption>,
    },
    Date {
        date: Option<DateValue>,
    },
    Checkbox {
        checkbox: bool,
    },
    Url {
        url: Option<String>,
    },
    Email {
        email: Option<String>,
    },
    PhoneNumber {
        phone_number: Option<String>,
    },
    MultiSelect {
        multi_select: Vec<SelectOption>,
    },
    CreatedTime {
        created_time: String,
    },
    LastEditedTime {
        last_edited_time: String,
    },
    #[serde(other)]
    Unsupported,
}

impl PropertyValue {
    #[must_use]
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::Title { .. } => PropertyKind::Title,
            PropertyValue::RichText { .. } => PropertyKind::RichText,
            PropertyValue::Select { .. } => PropertyKind::Select,
            PropertyValue::Status { .. } => PropertyKind::Status,
            PropertyValue::Date { .. } => PropertyKind::Date,
            PropertyValue::Checkbox { .. } => PropertyKind::Checkbox,
            PropertyValue::Url { .. } => PropertyKind::Url,
            PropertyValue::Email { .. } => PropertyKind::Email,
            PropertyValue::PhoneNumber { .. } => PropertyKind::PhoneNumber,
            PropertyValue::MultiSelect { .. } => PropertyKind::MultiSelect,
            PropertyValue::CreatedTime { .. } => PropertyKind::CreatedTime,
            PropertyValue::LastEditedTime { .. } => PropertyKind::LastEditedTime,
            PropertyValue::Unsupported => PropertyKind::Other("unsupported".to_string()),
        }
    }

    pub fn title(text: impl Into<String>) -> Self {
        PropertyValue::Title {
            title: vec![RichText::plain(text)],
        }
    }

    /// Plain text of a title or rich-text value.
    #[must_use]
    pub fn as_plain_text(&self) -> Option<String> {
        match self {
            PropertyValue::Title { title } => Some(plain_text(title)),
            PropertyValue::RichText { rich_text } => Some(plain_text(rich_text)),
            _ => None,
        }
    }
}

/// One page of the store.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    pub id: Option<String>,
    pub properties: IndexMap<String, PropertyValue>,
    pub is_new: bool,
}

impl Record {
    /// An empty, not yet created record.
    #[must_use]
    pub fn draft() -> Self {
        Self {
            id: None,
            properties: IndexMap::new(),
            is_new: true,
        }
    }

    #[must_use]
    pub fn persisted(id: impl Into<String>, properties: IndexMap<String, PropertyValue>) -> Self {
        Self {
            id: Some(id.into()),
            properties,
            is_new: false,
        }
    }

    /// Text of the first title-typed property, if it is non-empty.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        self.properties
            .values()
            .find(|v| matches!(v, PropertyValue::Title { .. }))
            .and_then(PropertyValue::as_plain_text)
            .filter(|t| !t.trim().is_empty())
    }

    #[must_use]
    pub fn display_title(&self) -> String {
        self.title().unwrap_or_else(|| UNTITLED.to_string())
    }

    /// Start date of the first populated date-typed property.
    #[must_use]
    pub fn first_date(&self) -> Option<&str> {
        self.properties.values().find_map(|v| match v {
            PropertyValue::Date { date: Some(d) } => Some(d.start.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub description: Option<String>,
    pub location: Option<String>,
    pub attendees: BTreeSet<String>,
}

/// Which kind of choice property an equality filter targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceKind {
    Select,
    Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordFilter {
    Equals {
        property: String,
        kind: ChoiceKind,
        value: String,
    },
    DateRange {
        property: String,
        on_or_after: NaiveDate,
        on_or_before: NaiveDate,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    Property(String),
    CreatedTime,
    LastEditedTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSort {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl RecordSort {
    #[must_use]
    pub fn newest_first() -> Self {
        Self {
            key: SortKey::CreatedTime,
            direction: SortDirection::Descending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordQuery {
    pub filter: Option<RecordFilter>,
    pub sort: Option<RecordSort>,
    pub limit: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_property_value_keeps_type_tag() {
        let value = PropertyValue::Status {
            status: Some(SelectOption::new("s1", "Inbox")),
        };
        let wire = serde_json::to_value(&value).unwrap();
        assert_eq!(
            wire,
            json!({"type": "status", "status": {"id": "s1", "name": "Inbox"}})
        );
    }

    #[test]
    fn test_unknown_property_types_deserialize_as_unsupported() {
        let value: PropertyValue =
            serde_json::from_value(json!({"id": "x", "type": "formula", "formula": {}})).unwrap();
        assert_eq!(value, PropertyValue::Unsupported);
    }

    #[test]
    fn test_record_title_concatenates_runs() {
        let title: PropertyValue = serde_json::from_value(json!({
            "id": "title",
            "type": "title",
            "title": [
                {"type": "text", "text": {"content": "Buy "}, "plain_text": "Buy "},
                {"type": "text", "text": {"content": "milk"}, "plain_text": "milk"}
            ]
        }))
        .unwrap();
        let mut record = Record::draft();
        record.properties.insert("Name".to_string(), title);
        assert_eq!(record.title().as_deref(), Some("Buy milk"));
    }

    #[test]
    fn test_empty_title_displays_placeholder() {
        let mut record = Record::draft();
        record
            .properties
            .insert("Name".to_string(), PropertyValue::title(""));
        assert_eq!(record.display_title(), UNTITLED);
    }
}
