//! RawEvent to Event conversion.
//!
//! Normalization is a pure function of its inputs: dates are resolved to
//! their calendar-date portion, free text is trimmed, and the canonical
//! link is delegated to [`extract_link`].

use thiserror::Error;

use crate::event::{Event, RawEvent};
use crate::links::extract_link;

/// A raw event is missing a field the digest cannot do without.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NormalizeError {
    /// The raw event carries no title field.
    #[error("calendar event has no title")]
    MissingTitle,
}

/// Converts a [`RawEvent`] into a canonical [`Event`].
///
/// `linkprefs` is the ordered list of link preference terms, descending
/// priority. When no term matches, `url` falls back to the event's
/// `html_link`, so the result always carries a non-empty URL.
///
/// # Errors
///
/// Returns [`NormalizeError::MissingTitle`] when the raw event has no
/// summary field. The caller aborts the whole digest build; a digest is
/// never rendered from a partially normalized list.
pub fn normalize_event(raw: &RawEvent, linkprefs: &[String]) -> Result<Event, NormalizeError> {
    let title = raw
        .summary
        .as_deref()
        .ok_or(NormalizeError::MissingTitle)?
        .trim()
        .to_string();

    let description = raw.description.as_deref().unwrap_or("").trim().to_string();
    let summary = description.lines().next().unwrap_or("").to_string();
    let url = extract_link(&description, linkprefs).unwrap_or_else(|| raw.html_link.clone());

    Ok(Event {
        start: raw.start.to_date(),
        end: raw.end.to_date(),
        title,
        summary,
        description,
        url,
    })
}

/// Normalizes a batch of raw events, failing on the first malformed one.
pub fn normalize_events(
    raw_events: &[RawEvent],
    linkprefs: &[String],
) -> Result<Vec<Event>, NormalizeError> {
    raw_events
        .iter()
        .map(|raw| normalize_event(raw, linkprefs))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::RawEventTime;
    use chrono::{DateTime, NaiveDate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn prefs(terms: &[&str]) -> Vec<String> {
        terms.iter().map(|s| s.to_string()).collect()
    }

    fn sample_raw() -> RawEvent {
        RawEvent::new(
            RawEventTime::from_date(date(2024, 5, 1)),
            RawEventTime::from_date(date(2024, 5, 1)),
            "https://calendar.google.com/event/abc",
        )
        .with_summary("  Spring Meetup  ")
    }

    #[test]
    fn normalizes_minimal_event() {
        let event = normalize_event(&sample_raw(), &prefs(&["homepage"])).unwrap();

        assert_eq!(event.title, "Spring Meetup");
        assert_eq!(event.start, date(2024, 5, 1));
        assert_eq!(event.end, date(2024, 5, 1));
        assert_eq!(event.summary, "");
        assert_eq!(event.description, "");
        assert_eq!(event.url, "https://calendar.google.com/event/abc");
    }

    #[test]
    fn missing_title_is_an_error() {
        let raw = RawEvent::new(
            RawEventTime::from_date(date(2024, 5, 1)),
            RawEventTime::from_date(date(2024, 5, 1)),
            "https://calendar.google.com/event/abc",
        );

        assert_eq!(
            normalize_event(&raw, &prefs(&[])),
            Err(NormalizeError::MissingTitle)
        );
    }

    #[test]
    fn summary_is_first_line_of_trimmed_description() {
        let raw = sample_raw().with_description("\n\n  First line here\nSecond line\n");
        let event = normalize_event(&raw, &prefs(&[])).unwrap();

        assert_eq!(event.summary, "First line here");
        assert_eq!(event.description, "First line here\nSecond line");
    }

    #[test]
    fn timed_values_truncate_to_dates() {
        let raw = RawEvent::new(
            RawEventTime::from_datetime(
                DateTime::parse_from_rfc3339("2024-05-01T18:00:00+02:00").unwrap(),
            ),
            RawEventTime::from_datetime(
                DateTime::parse_from_rfc3339("2024-05-03T01:00:00+02:00").unwrap(),
            ),
            "https://calendar.google.com/event/abc",
        )
        .with_summary("Festival");

        let event = normalize_event(&raw, &prefs(&[])).unwrap();
        assert_eq!(event.start, date(2024, 5, 1));
        assert_eq!(event.end, date(2024, 5, 3));
    }

    #[test]
    fn preferred_link_wins_over_html_link() {
        let raw = sample_raw().with_description("Homepage: https://example.org/party");
        let event = normalize_event(&raw, &prefs(&["homepage"])).unwrap();
        assert_eq!(event.url, "https://example.org/party");
    }

    #[test]
    fn url_is_never_empty() {
        let raw = sample_raw().with_description("Notes: nothing here");
        let event = normalize_event(&raw, &prefs(&["homepage", "wiki"])).unwrap();
        assert_eq!(event.url, "https://calendar.google.com/event/abc");
        assert!(!event.url.is_empty());
    }

    #[test]
    fn batch_fails_fast_on_malformed_event() {
        let good = sample_raw();
        let bad = RawEvent::new(
            RawEventTime::from_date(date(2024, 5, 2)),
            RawEventTime::from_date(date(2024, 5, 2)),
            "https://calendar.google.com/event/def",
        );

        let result = normalize_events(&[good, bad], &prefs(&[]));
        assert_eq!(result, Err(NormalizeError::MissingTitle));
    }

    #[test]
    fn batch_preserves_order() {
        let mut second = sample_raw();
        second.summary = Some("Second".to_string());
        let events = normalize_events(&[sample_raw(), second], &prefs(&[])).unwrap();
        assert_eq!(events[0].title, "Spring Meetup");
        assert_eq!(events[1].title, "Second");
    }
}
