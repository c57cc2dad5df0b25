use crate::domain::models::{ChoiceKind, PropertyKind, RecordFilter, Schema};
use crate::error::{Error, Result};
use chrono::NaiveDate;

/// Property names recognised as the workflow state column.
const STATUS_PROPERTY_NAMES: [&str; 2] = ["status", "state"];

/// Equality filter on the schema's status column.
///
/// The column is found by name (`status` or `state`, any case) and must be a
/// `status` or `select` property. The requested value is matched against the
/// column's options case-insensitively; unknown values are sent lowercased.
pub fn status_filter(schema: &Schema, status: &str) -> Result<RecordFilter> {
    let (name, descriptor) = schema
        .iter()
        .find(|(name, _)| {
            STATUS_PROPERTY_NAMES
                .iter()
                .any(|candidate| name.eq_ignore_ascii_case(candidate))
        })
        .ok_or_else(|| {
            Error::SchemaMismatch("No status/state property found in database".to_string())
        })?;

    let kind = match descriptor.kind {
        PropertyKind::Status => ChoiceKind::Status,
        PropertyKind::Select => ChoiceKind::Select,
        ref other => {
            return Err(Error::UnsupportedPropertyType {
                property: name.clone(),
                kind: other.to_string(),
            })
        }
    };

    let value = descriptor
        .options
        .iter()
        .find(|o| o.name.eq_ignore_ascii_case(status))
        .map_or_else(|| status.to_lowercase(), |o| o.name.clone());

    Ok(RecordFilter::Equals {
        property: name.clone(),
        kind,
        value,
    })
}

/// The first date-typed property, used to place records on a calendar.
pub fn date_property(schema: &Schema) -> Result<String> {
    schema
        .first_of_kind(&PropertyKind::Date)
        .map(str::to_string)
        .ok_or_else(|| Error::SchemaMismatch("No date property found in database".to_string()))
}

/// Inclusive date range filter on the resolved date property.
pub fn date_range_filter(
    schema: &Schema,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<RecordFilter> {
    Ok(RecordFilter::DateRange {
        property: date_property(schema)?,
        on_or_after: start,
        on_or_before: end,
    })
}
