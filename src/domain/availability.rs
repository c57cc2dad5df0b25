//! Free time per working day of the coming week.

use crate::domain::models::CalendarEvent;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

pub const DAY_LABELS: [&str; 5] = ["M", "T", "W", "Th", "F"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingHours {
    pub start: u32,
    pub end: u32,
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self { start: 9, end: 17 }
    }
}

impl WorkingHours {
    /// `None` unless `start < end <= 24`.
    #[must_use]
    pub fn new(start: u32, end: u32) -> Option<Self> {
        (start < end && end <= 24).then_some(Self { start, end })
    }

    #[must_use]
    pub fn total_minutes(&self) -> f64 {
        f64::from((self.end - self.start) * 60)
    }

    fn bounds(&self, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        let start = date.and_time(NaiveTime::MIN) + Duration::hours(i64::from(self.start));
        let end = date.and_time(NaiveTime::MIN) + Duration::hours(i64::from(self.end));
        (start, end)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyAvailability {
    pub date: NaiveDate,
    /// Rounded to one decimal, within `[0, end - start]`.
    pub free_hours: f64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

/// The Monday after `reference`, always 1 to 7 days ahead.
#[must_use]
pub fn next_monday(reference: NaiveDate) -> NaiveDate {
    let weekday = i64::from(reference.weekday().num_days_from_sunday());
    let days = match (8 - weekday) % 7 {
        0 => 7,
        d => d,
    };
    reference + Duration::days(days)
}

/// Monday and Friday of the week following `reference`.
#[must_use]
pub fn next_work_week(reference: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = next_monday(reference);
    (monday, monday + Duration::days(4))
}

/// Free time for the work week following `reference`.
pub fn weekly_free_time(
    reference: NaiveDate,
    events: &[CalendarEvent],
    hours: WorkingHours,
) -> Vec<DailyAvailability> {
    free_time_from(next_monday(reference), events, hours)
}

/// Free time for the five days starting at `monday`.
pub fn free_time_from(
    monday: NaiveDate,
    events: &[CalendarEvent],
    hours: WorkingHours,
) -> Vec<DailyAvailability> {
    (0..5)
        .map(|offset| {
            let date = monday + Duration::days(offset);
            let daily: Vec<&CalendarEvent> = events
                .iter()
                .filter(|e| e.start.date() == date)
                .collect();
            daily_free_time(date, &daily, hours)
        })
        .collect()
}

fn daily_free_time(
    date: NaiveDate,
    events: &[&CalendarEvent],
    hours: WorkingHours,
) -> DailyAvailability {
    let (start_time, end_time) = hours.bounds(date);

    // Overlapping events are counted twice; no interval merge.
    let busy_minutes: f64 = events
        .iter()
        .map(|event| {
            let start = event.start.max(start_time);
            let end = event.end.min(end_time);
            if end > start {
                (end - start).num_milliseconds() as f64 / 60_000.0
            } else {
                0.0
            }
        })
        .sum();

    let free = ((hours.total_minutes() - busy_minutes) / 60.0 * 10.0).round() / 10.0;
    DailyAvailability {
        date,
        // also folds -0.0 into 0.0
        free_hours: if free > 0.0 { free } else { 0.0 },
        start_time,
        end_time,
    }
}

#[must_use]
pub fn format_weekly_free_time(analysis: &[DailyAvailability]) -> String {
    analysis
        .iter()
        .zip(DAY_LABELS)
        .map(|(day, label)| format!("{label} - {} hours", day.free_hours))
        .collect::<Vec<_>>()
        .join("\n")
}
