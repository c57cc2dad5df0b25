use crate::domain::models::{CalendarEvent, PropertyValue, Record};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};

const DESCRIPTION_PROPERTY: &str = "Description";
const LOCATION_PROPERTY: &str = "Location";
const ATTENDEES_PROPERTY: &str = "Attendees";

/// Parse a store date string into local wall time.
///
/// Date-only values land on local midnight; values with an offset are
/// converted to the local zone.
#[must_use]
pub fn parse_local(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Build an event from a record placed on the calendar by `date_property`.
/// Records without a parseable start are skipped.
#[must_use]
pub fn event_from_record(record: &Record, date_property: &str) -> Option<CalendarEvent> {
    let date = match record.properties.get(date_property) {
        Some(PropertyValue::Date { date: Some(date) }) => date,
        _ => return None,
    };
    let start = parse_local(&date.start)?;
    let end = date
        .end
        .as_deref()
        .and_then(parse_local)
        .unwrap_or(start);

    let text = |name: &str| {
        record
            .properties
            .get(name)
            .and_then(PropertyValue::as_plain_text)
            .filter(|t| !t.is_empty())
    };

    let attendees = match record.properties.get(ATTENDEES_PROPERTY) {
        Some(PropertyValue::MultiSelect { multi_select }) => {
            multi_select.iter().map(|o| o.name.clone()).collect()
        }
        _ => Default::default(),
    };

    Some(CalendarEvent {
        id: record.id.clone().unwrap_or_default(),
        title: record.display_title(),
        start,
        end,
        description: text(DESCRIPTION_PROPERTY),
        location: text(LOCATION_PROPERTY),
        attendees,
    })
}
