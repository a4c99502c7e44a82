//! Event types for the digest pipeline.
//!
//! This module provides the two event representations the pipeline works
//! with:
//! - [`RawEvent`]: a calendar entry as it arrives from the API, read-only
//! - [`Event`]: the canonical value the renderer consumes, constructed once
//!   during normalization and immutable thereafter

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// The time specification of a raw calendar entry.
///
/// Google returns either a date-only value (all-day events) or an RFC3339
/// datetime carrying the calendar's UTC offset. A timed value resolves to
/// the date portion as written in the calendar's own offset, never the UTC
/// date, so a late-evening event does not drift to the next day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum RawEventTime {
    /// An all-day event date (no specific time).
    Date(NaiveDate),
    /// A timed value with its original offset preserved.
    DateTime(DateTime<FixedOffset>),
}

impl RawEventTime {
    /// Creates a RawEventTime from a date (all-day event).
    pub fn from_date(date: NaiveDate) -> Self {
        Self::Date(date)
    }

    /// Creates a RawEventTime from an offset-preserving datetime.
    pub fn from_datetime(dt: DateTime<FixedOffset>) -> Self {
        Self::DateTime(dt)
    }

    /// Returns true if this is an all-day event time.
    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::Date(_))
    }

    /// The calendar date this value falls on: all-day dates verbatim, timed
    /// values truncated to their local date portion.
    pub fn to_date(&self) -> NaiveDate {
        match self {
            Self::Date(date) => *date,
            Self::DateTime(dt) => dt.date_naive(),
        }
    }
}

/// A raw calendar event as fetched from the API.
///
/// The core treats this as read-only input; it arrives once per digest run
/// and is consumed by [`normalize_event`](crate::normalize::normalize_event).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    /// When the event starts.
    pub start: RawEventTime,

    /// When the event ends.
    pub end: RawEventTime,

    /// The event title. Absence is a normalization error.
    pub summary: Option<String>,

    /// Free-text description, possibly multi-line.
    pub description: Option<String>,

    /// Link to view the event in the calendar UI. Always present in API
    /// responses; serves as the fallback URL when no preferred link is
    /// found in the description.
    pub html_link: String,
}

impl RawEvent {
    /// Creates a new raw event with the required fields.
    pub fn new(start: RawEventTime, end: RawEventTime, html_link: impl Into<String>) -> Self {
        Self {
            start,
            end,
            summary: None,
            description: None,
            html_link: html_link.into(),
        }
    }

    /// Builder method to set the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A canonical calendar event.
///
/// Invariants established by normalization: `start` and `end` are always
/// well-formed dates, and `url` is never empty (it falls back to the raw
/// event's `html_link`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Start date.
    pub start: NaiveDate,
    /// End date.
    pub end: NaiveDate,
    /// Trimmed event title.
    pub title: String,
    /// First line of the trimmed description, or empty.
    pub summary: String,
    /// Full trimmed description.
    pub description: String,
    /// Resolved canonical link.
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn raw_event_time_variants() {
        let all_day = RawEventTime::from_date(date(2024, 5, 1));
        assert!(all_day.is_all_day());
        assert_eq!(all_day.to_date(), date(2024, 5, 1));

        let timed = RawEventTime::from_datetime(
            DateTime::parse_from_rfc3339("2024-05-01T10:00:00+02:00").unwrap(),
        );
        assert!(!timed.is_all_day());
        assert_eq!(timed.to_date(), date(2024, 5, 1));
    }

    #[test]
    fn timed_value_keeps_its_local_date() {
        // 23:30 in UTC-7 is already May 2nd in UTC; the calendar date as
        // written must win.
        let timed = RawEventTime::from_datetime(
            DateTime::parse_from_rfc3339("2024-05-01T23:30:00-07:00").unwrap(),
        );
        assert_eq!(timed.to_date(), date(2024, 5, 1));
    }

    #[test]
    fn raw_event_builder() {
        let start = RawEventTime::from_date(date(2024, 5, 1));
        let end = RawEventTime::from_date(date(2024, 5, 2));
        let event = RawEvent::new(start, end, "https://calendar.google.com/event/abc")
            .with_summary("Spring Meetup")
            .with_description("Homepage: https://example.org");

        assert_eq!(event.summary, Some("Spring Meetup".to_string()));
        assert_eq!(
            event.description,
            Some("Homepage: https://example.org".to_string())
        );
        assert_eq!(event.html_link, "https://calendar.google.com/event/abc");
    }

    #[test]
    fn serde_roundtrip() {
        let event = RawEvent::new(
            RawEventTime::from_date(date(2024, 5, 1)),
            RawEventTime::from_datetime(
                DateTime::parse_from_rfc3339("2024-05-01T18:00:00+00:00").unwrap(),
            ),
            "https://calendar.google.com/event/abc",
        )
        .with_summary("Test Event");

        let json = serde_json::to_string(&event).unwrap();
        let parsed: RawEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, parsed);
    }
}
