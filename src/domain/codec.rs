//! Translation between the store's typed property values and editable form state.
//!
//! Every editable [`PropertyKind`] has exactly one decode/encode pair below.
//! Timestamps are maintained by the store and rejected here; the form layer
//! skips them before they ever reach the codec.

use crate::domain::models::{
    DateValue, PropertyDescriptor, PropertyKind, PropertyValue, Record, RichText, Schema,
    SelectOption, UNTITLED,
};
use crate::error::{Error, Result};
use indexmap::IndexMap;

pub const DEFAULT_INITIAL_STATUS: &str = "Inbox";

/// Fallback name of the title field when the schema has none.
pub const DEFAULT_TITLE_PROPERTY: &str = "Name";

/// The human-editable representation of one property.
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    /// title, rich_text, url, email, phone_number
    Text(String),
    /// select, status
    Choice(Option<String>),
    /// multi_select
    Choices(Vec<String>),
    Date(Option<DateValue>),
    Flag(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyCodec {
    initial_status: String,
}

impl Default for PropertyCodec {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_STATUS)
    }
}

impl PropertyCodec {
    pub fn new(initial_status: impl Into<String>) -> Self {
        Self {
            initial_status: initial_status.into(),
        }
    }

    #[must_use]
    pub fn initial_status(&self) -> &str {
        &self.initial_status
    }

    pub fn decode(
        &self,
        name: &str,
        value: &PropertyValue,
        descriptor: &PropertyDescriptor,
    ) -> Result<FormValue> {
        ensure_editable(name, descriptor)?;
        if value.kind() != descriptor.kind {
            return Err(mismatch(name, descriptor, &value.kind()));
        }

        let decoded = match value {
            PropertyValue::Title { title: runs } | PropertyValue::RichText { rich_text: runs } => {
                FormValue::Text(crate::domain::models::plain_text(runs))
            }
            PropertyValue::Select { select: option } | PropertyValue::Status { status: option } => {
                FormValue::Choice(option.as_ref().map(|o| o.name.clone()))
            }
            PropertyValue::MultiSelect { multi_select } => {
                FormValue::Choices(multi_select.iter().map(|o| o.name.clone()).collect())
            }
            PropertyValue::Date { date } => FormValue::Date(date.clone()),
            PropertyValue::Checkbox { checkbox } => FormValue::Flag(*checkbox),
            PropertyValue::Url { url: text }
            | PropertyValue::Email { email: text }
            | PropertyValue::PhoneNumber { phone_number: text } => {
                FormValue::Text(text.clone().unwrap_or_default())
            }
            PropertyValue::CreatedTime { .. }
            | PropertyValue::LastEditedTime { .. }
            | PropertyValue::Unsupported => return Err(unsupported(name, &descriptor.kind)),
        };
        Ok(decoded)
    }

    pub fn encode(
        &self,
        name: &str,
        value: &FormValue,
        descriptor: &PropertyDescriptor,
    ) -> Result<PropertyValue> {
        ensure_editable(name, descriptor)?;

        let encoded = match (&descriptor.kind, value) {
            (PropertyKind::Title, FormValue::Text(text)) => PropertyValue::Title {
                title: vec![RichText::plain(text.clone())],
            },
            (PropertyKind::RichText, FormValue::Text(text)) => PropertyValue::RichText {
                rich_text: vec![RichText::plain(text.clone())],
            },
            (PropertyKind::Url, FormValue::Text(text)) => PropertyValue::Url {
                url: non_empty(text),
            },
            (PropertyKind::Email, FormValue::Text(text)) => PropertyValue::Email {
                email: non_empty(text),
            },
            (PropertyKind::PhoneNumber, FormValue::Text(text)) => PropertyValue::PhoneNumber {
                phone_number: non_empty(text),
            },
            (PropertyKind::Select, FormValue::Choice(choice)) => PropertyValue::Select {
                select: choice
                    .as_deref()
                    .filter(|n| !n.is_empty())
                    .map(|n| lookup_or_named(descriptor, n)),
            },
            (PropertyKind::Status, FormValue::Choice(choice)) => PropertyValue::Status {
                status: match choice.as_deref().filter(|n| !n.is_empty()) {
                    None => None,
                    Some(n) => descriptor
                        .option_named(n)
                        .or_else(|| descriptor.option_named(&self.initial_status))
                        .cloned(),
                },
            },
            (PropertyKind::MultiSelect, FormValue::Choices(names)) => PropertyValue::MultiSelect {
                multi_select: names
                    .iter()
                    .map(|n| lookup_or_named(descriptor, n))
                    .collect(),
            },
            (PropertyKind::Date, FormValue::Date(date)) => PropertyValue::Date {
                date: date.clone().filter(|d| !d.start.trim().is_empty()),
            },
            (PropertyKind::Checkbox, FormValue::Flag(flag)) => {
                PropertyValue::Checkbox { checkbox: *flag }
            }
            (kind, _) => {
                return Err(Error::SchemaMismatch(format!(
                    "Property \"{name}\" expects a {kind} value"
                )))
            }
        };
        Ok(encoded)
    }

    /// The value a brand-new record starts with.
    pub fn initial_value(
        &self,
        name: &str,
        descriptor: &PropertyDescriptor,
    ) -> Result<PropertyValue> {
        ensure_editable(name, descriptor)?;

        let value = match &descriptor.kind {
            PropertyKind::Title => PropertyValue::Title {
                title: vec![RichText::plain("")],
            },
            PropertyKind::RichText => PropertyValue::RichText {
                rich_text: vec![RichText::plain("")],
            },
            PropertyKind::Status => PropertyValue::Status {
                status: descriptor.option_named(&self.initial_status).cloned(),
            },
            PropertyKind::Select => PropertyValue::Select { select: None },
            PropertyKind::Date => PropertyValue::Date { date: None },
            PropertyKind::Checkbox => PropertyValue::Checkbox { checkbox: false },
            PropertyKind::Url => PropertyValue::Url {
                url: Some(String::new()),
            },
            PropertyKind::Email => PropertyValue::Email { email: None },
            PropertyKind::PhoneNumber => PropertyValue::PhoneNumber { phone_number: None },
            PropertyKind::MultiSelect => PropertyValue::MultiSelect {
                multi_select: Vec::new(),
            },
            kind @ (PropertyKind::CreatedTime
            | PropertyKind::LastEditedTime
            | PropertyKind::Other(_)) => return Err(unsupported(name, kind)),
        };
        Ok(value)
    }

    /// Properties for a record created directly from a title: the title plus
    /// the initial status when the schema has one.
    #[must_use]
    pub fn titled(&self, schema: &Schema, title: &str) -> Record {
        let mut record = Record::draft();
        let title_name = schema.title_property().unwrap_or(DEFAULT_TITLE_PROPERTY);
        record
            .properties
            .insert(title_name.to_string(), PropertyValue::title(title));

        if let Some(status_name) = schema.first_of_kind(&PropertyKind::Status) {
            if let Some(descriptor) = schema.get(status_name) {
                if let Some(option) = descriptor.option_named(&self.initial_status) {
                    record.properties.insert(
                        status_name.to_string(),
                        PropertyValue::Status {
                            status: Some(option.clone()),
                        },
                    );
                }
            }
        }
        record
    }
}

/// Guarantee a non-empty title on every outgoing record.
#[must_use]
pub fn validate_for_submit(mut record: Record, schema: &Schema) -> Record {
    let title_name = schema
        .title_property()
        .unwrap_or(DEFAULT_TITLE_PROPERTY)
        .to_string();

    let has_title = record
        .properties
        .get(&title_name)
        .and_then(|v| match v {
            PropertyValue::Title { .. } => v.as_plain_text(),
            _ => None,
        })
        .is_some_and(|t| !t.trim().is_empty());

    if !has_title {
        record
            .properties
            .insert(title_name, PropertyValue::title(UNTITLED));
    }
    record
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    pub descriptor: PropertyDescriptor,
    pub value: FormValue,
}

/// Editable state of one record bubble.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordForm {
    pub record_id: Option<String>,
    pub is_new: bool,
    pub fields: Vec<FormField>,
    /// Schema properties the codec cannot edit, by name.
    pub unsupported: Vec<String>,
}

impl RecordForm {
    pub fn hydrate(codec: &PropertyCodec, record: &Record, schema: &Schema) -> Result<Self> {
        let mut fields = Vec::new();
        let mut unsupported = Vec::new();

        for (name, descriptor) in schema.iter() {
            if descriptor.kind.is_read_only() {
                continue;
            }
            if let PropertyKind::Other(_) = descriptor.kind {
                unsupported.push(name.clone());
                continue;
            }

            let value = match record.properties.get(name) {
                Some(v) => v.clone(),
                None => codec.initial_value(name, descriptor)?,
            };
            fields.push(FormField {
                name: name.clone(),
                descriptor: descriptor.clone(),
                value: codec.decode(name, &value, descriptor)?,
            });
        }

        Ok(Self {
            record_id: record.id.clone(),
            is_new: record.is_new,
            fields,
            unsupported,
        })
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    pub fn to_record(&self, codec: &PropertyCodec) -> Result<Record> {
        let mut properties = IndexMap::new();
        for field in &self.fields {
            properties.insert(
                field.name.clone(),
                codec.encode(&field.name, &field.value, &field.descriptor)?,
            );
        }
        Ok(Record {
            id: self.record_id.clone(),
            properties,
            is_new: self.is_new,
        })
    }

    /// Encode and apply the submit rules.
    pub fn submit(&self, codec: &PropertyCodec, schema: &Schema) -> Result<Record> {
        Ok(validate_for_submit(self.to_record(codec)?, schema))
    }
}

fn ensure_editable(name: &str, descriptor: &PropertyDescriptor) -> Result<()> {
    match descriptor.kind {
        PropertyKind::CreatedTime | PropertyKind::LastEditedTime | PropertyKind::Other(_) => {
            Err(unsupported(name, &descriptor.kind))
        }
        _ => Ok(()),
    }
}

fn unsupported(name: &str, kind: &PropertyKind) -> Error {
    Error::UnsupportedPropertyType {
        property: name.to_string(),
        kind: kind.to_string(),
    }
}

fn mismatch(name: &str, descriptor: &PropertyDescriptor, found: &PropertyKind) -> Error {
    Error::SchemaMismatch(format!(
        "Property \"{name}\" holds a {found} value but the schema declares {}",
        descriptor.kind
    ))
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn lookup_or_named(descriptor: &PropertyDescriptor, name: &str) -> SelectOption {
    descriptor
        .option_named(name)
        .cloned()
        .unwrap_or_else(|| SelectOption::named(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn status_descriptor() -> PropertyDescriptor {
        PropertyDescriptor::with_options(
            PropertyKind::Status,
            vec![SelectOption::new("s1", "Inbox"), SelectOption::new("s2", "Done")],
        )
    }

    fn sample_schema() -> Schema {
        Schema::new([
            ("Name".to_string(), PropertyDescriptor::new(PropertyKind::Title)),
            ("Status".to_string(), status_descriptor()),
            ("Notes".to_string(), PropertyDescriptor::new(PropertyKind::RichText)),
            ("Done".to_string(), PropertyDescriptor::new(PropertyKind::Checkbox)),
            ("Created".to_string(), PropertyDescriptor::new(PropertyKind::CreatedTime)),
            (
                "Points".to_string(),
                PropertyDescriptor::new(PropertyKind::Other("number".to_string())),
            ),
        ])
    }

    fn assert_round_trip(descriptor: &PropertyDescriptor, value: FormValue) {
        let codec = PropertyCodec::default();
        let encoded = codec.encode("field", &value, descriptor).unwrap();
        assert_eq!(encoded.kind(), descriptor.kind);
        let decoded = codec.decode("field", &encoded, descriptor).unwrap();
        assert_eq!(decoded, value, "round trip through {encoded:?}");
    }

    #[test]
    fn test_round_trip_text_kinds() {
        for kind in [
            PropertyKind::Title,
            PropertyKind::RichText,
            PropertyKind::Url,
            PropertyKind::Email,
            PropertyKind::PhoneNumber,
        ] {
            let descriptor = PropertyDescriptor::new(kind);
            assert_round_trip(&descriptor, FormValue::Text(String::new()));
            assert_round_trip(&descriptor, FormValue::Text("hello world".to_string()));
        }
    }

    #[test]
    fn test_round_trip_choices() {
        let status = status_descriptor();
        assert_round_trip(&status, FormValue::Choice(None));
        assert_round_trip(&status, FormValue::Choice(Some("Done".to_string())));

        let select = PropertyDescriptor::with_options(
            PropertyKind::Select,
            vec![SelectOption::new("a", "High")],
        );
        assert_round_trip(&select, FormValue::Choice(None));
        assert_round_trip(&select, FormValue::Choice(Some("High".to_string())));
        assert_round_trip(&select, FormValue::Choice(Some("Brand new".to_string())));

        let multi = PropertyDescriptor::new(PropertyKind::MultiSelect);
        assert_round_trip(&multi, FormValue::Choices(vec![]));
        assert_round_trip(
            &multi,
            FormValue::Choices(vec!["alice".to_string(), "bob".to_string()]),
        );
    }

    #[test]
    fn test_round_trip_date_and_checkbox() {
        let date = PropertyDescriptor::new(PropertyKind::Date);
        assert_round_trip(&date, FormValue::Date(None));
        assert_round_trip(
            &date,
            FormValue::Date(Some(DateValue {
                start: "2024-01-08".to_string(),
                end: Some("2024-01-09".to_string()),
                time_zone: None,
            })),
        );

        let checkbox = PropertyDescriptor::new(PropertyKind::Checkbox);
        assert_round_trip(&checkbox, FormValue::Flag(true));
        assert_round_trip(&checkbox, FormValue::Flag(false));
    }

    #[test]
    fn test_reencoding_server_value_is_equivalent() {
        let codec = PropertyCodec::default();
        let descriptor = status_descriptor();
        let api: PropertyValue = serde_json::from_value(json!({
            "id": "abc",
            "type": "status",
            "status": {"id": "s2", "name": "Done"}
        }))
        .unwrap();
        let form = codec.decode("Status", &api, &descriptor).unwrap();
        assert_eq!(codec.encode("Status", &form, &descriptor).unwrap(), api);

        let title: PropertyValue = serde_json::from_value(json!({
            "type": "title",
            "title": [{"type": "text", "text": {"content": "Plan"}, "plain_text": "Plan"}]
        }))
        .unwrap();
        let title_descriptor = PropertyDescriptor::new(PropertyKind::Title);
        let form = codec.decode("Name", &title, &title_descriptor).unwrap();
        let reencoded = codec.encode("Name", &form, &title_descriptor).unwrap();
        assert_eq!(reencoded.as_plain_text(), title.as_plain_text());
    }

    #[test]
    fn test_initial_status_selects_configured_option() {
        let codec = PropertyCodec::default();
        let value = codec.initial_value("Status", &status_descriptor()).unwrap();
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!({"type": "status", "status": {"id": "s1", "name": "Inbox"}})
        );
    }

    #[test]
    fn test_initial_status_is_null_without_matching_option() {
        let codec = PropertyCodec::new("Backlog");
        let value = codec.initial_value("Status", &status_descriptor()).unwrap();
        assert_eq!(value, PropertyValue::Status { status: None });
    }

    #[test]
    fn test_initial_values_per_kind() {
        let codec = PropertyCodec::default();
        let initial = |kind| {
            codec
                .initial_value("p", &PropertyDescriptor::new(kind))
                .unwrap()
        };
        assert_eq!(initial(PropertyKind::Title), PropertyValue::title(""));
        assert_eq!(initial(PropertyKind::Select), PropertyValue::Select { select: None });
        assert_eq!(initial(PropertyKind::Date), PropertyValue::Date { date: None });
        assert_eq!(
            initial(PropertyKind::Checkbox),
            PropertyValue::Checkbox { checkbox: false }
        );
        assert_eq!(
            initial(PropertyKind::Url),
            PropertyValue::Url {
                url: Some(String::new())
            }
        );
    }

    #[test]
    fn test_unknown_status_falls_back_to_initial_option() {
        let codec = PropertyCodec::default();
        let encoded = codec
            .encode(
                "Status",
                &FormValue::Choice(Some("Nope".to_string())),
                &status_descriptor(),
            )
            .unwrap();
        assert_eq!(
            encoded,
            PropertyValue::Status {
                status: Some(SelectOption::new("s1", "Inbox"))
            }
        );
    }

    #[test]
    fn test_timestamps_and_unknown_kinds_are_unsupported() {
        let codec = PropertyCodec::default();
        let created = PropertyDescriptor::new(PropertyKind::CreatedTime);
        let err = codec
            .decode(
                "Created",
                &PropertyValue::CreatedTime {
                    created_time: "2024-01-01T00:00:00.000Z".to_string(),
                },
                &created,
            )
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedPropertyType { .. }));

        let number = PropertyDescriptor::new(PropertyKind::Other("number".to_string()));
        let err = codec
            .encode("Points", &FormValue::Text("3".to_string()), &number)
            .unwrap_err();
        assert_eq!(
            err,
            Error::UnsupportedPropertyType {
                property: "Points".to_string(),
                kind: "number".to_string()
            }
        );
    }

    #[test]
    fn test_decode_rejects_mismatched_tag() {
        let codec = PropertyCodec::default();
        let err = codec
            .decode(
                "Name",
                &PropertyValue::Checkbox { checkbox: true },
                &PropertyDescriptor::new(PropertyKind::Title),
            )
            .unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch(_)));
    }

    #[test]
    fn test_hydrate_new_record_skips_timestamps_and_reports_unsupported() {
        let codec = PropertyCodec::default();
        let form = RecordForm::hydrate(&codec, &Record::draft(), &sample_schema()).unwrap();

        let names: Vec<_> = form.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Name", "Status", "Notes", "Done"]);
        assert_eq!(form.unsupported, vec!["Points".to_string()]);
        assert_eq!(
            form.field("Status").unwrap().value,
            FormValue::Choice(Some("Inbox".to_string()))
        );
        assert!(form.is_new);
    }

    #[test]
    fn test_empty_title_is_submitted_as_untitled() {
        let codec = PropertyCodec::default();
        let schema = sample_schema();
        let form = RecordForm::hydrate(&codec, &Record::draft(), &schema).unwrap();

        let record = form.submit(&codec, &schema).unwrap();
        assert_eq!(record.properties["Name"], PropertyValue::title(UNTITLED));
        assert!(record.is_new);
    }

    #[test]
    fn test_validate_inserts_title_when_missing() {
        let schema = Schema::new([(
            "Task".to_string(),
            PropertyDescriptor::new(PropertyKind::Title),
        )]);
        let record = validate_for_submit(Record::draft(), &schema);
        assert_eq!(record.properties["Task"], PropertyValue::title(UNTITLED));

        let mut titled = Record::draft();
        titled
            .properties
            .insert("Task".to_string(), PropertyValue::title("Keep me"));
        let record = validate_for_submit(titled, &schema);
        assert_eq!(record.properties["Task"], PropertyValue::title("Keep me"));
    }

    #[test]
    fn test_titled_record_carries_initial_status() {
        let codec = PropertyCodec::default();
        let record = codec.titled(&sample_schema(), "buy milk");
        assert_eq!(record.properties["Name"], PropertyValue::title("buy milk"));
        assert_eq!(
            record.properties["Status"],
            PropertyValue::Status {
                status: Some(SelectOption::new("s1", "Inbox"))
            }
        );
        assert_eq!(record.properties.len(), 2);
    }
}
