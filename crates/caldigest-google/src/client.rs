//! Google Calendar API client.
//!
//! A low-level HTTP client for the Google Calendar API events list endpoint,
//! authenticating with an API key and paginating until the listing is
//! exhausted.

use std::time::Duration;

use caldigest_core::{RawEvent, RawEventTime};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};

/// Base URL for Google Calendar API v3.
const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Google Calendar API client.
#[derive(Debug)]
pub struct GoogleCalendarClient {
    http_client: reqwest::Client,
    api_key: String,
}

impl GoogleCalendarClient {
    /// Creates a new client authenticating with the given API key.
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ProviderError::configuration("failed to create HTTP client").with_source(e)
            })?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
        })
    }

    /// Lists upcoming events from a calendar, starting now.
    ///
    /// Recurring events are expanded into their individual occurrences and
    /// the listing is ordered by start time.
    pub async fn upcoming_events(&self, calendar_id: &str) -> ProviderResult<Vec<RawEvent>> {
        self.events_since(calendar_id, Utc::now()).await
    }

    /// Lists events from a calendar starting at the given lower bound.
    pub async fn events_since(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
    ) -> ProviderResult<Vec<RawEvent>> {
        let mut all_events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let result = self
                .events_page(calendar_id, time_min, page_token.as_deref())
                .await?;

            for event in result.items {
                all_events.push(convert_event(event)?);
            }

            match result.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(
            "fetched {} events from calendar {}",
            all_events.len(),
            calendar_id
        );
        Ok(all_events)
    }

    /// Fetches a single page of events.
    async fn events_page(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        page_token: Option<&str>,
    ) -> ProviderResult<EventListResponse> {
        let url = format!(
            "{}/calendars/{}/events",
            CALENDAR_API_BASE,
            urlencoding::encode(calendar_id)
        );

        let mut request = self.http_client.get(&url).query(&[
            ("key", self.api_key.clone()),
            ("timeMin", time_min.to_rfc3339()),
            ("singleEvents", "true".to_string()),
            ("orderBy", "startTime".to_string()),
        ]);

        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token.to_string())]);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::network("request timeout")
            } else if e.is_connect() {
                ProviderError::network(format!("connection failed: {}", e))
            } else {
                ProviderError::network(format!("request failed: {}", e))
            }
        })?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok());
            return Err(ProviderError::rate_limited(format!(
                "rate limit exceeded{}",
                retry_after
                    .map(|s| format!(", retry after {} seconds", s))
                    .unwrap_or_default()
            )));
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ProviderError::authorization(
                "API key rejected or calendar not shared publicly",
            ));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::not_found(format!(
                "calendar {} not found",
                calendar_id
            )));
        }

        if status == reqwest::StatusCode::BAD_REQUEST {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::bad_request(format!(
                "invalid request: {}",
                body
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::server(format!(
                "API error ({}): {}",
                status, body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

        serde_json::from_str(&body)
            .map_err(|e| ProviderError::invalid_response(format!("failed to parse response: {}", e)))
    }
}

/// Converts a Google Calendar API event to a [`RawEvent`].
fn convert_event(event: ApiEvent) -> ProviderResult<RawEvent> {
    let html_link = event
        .html_link
        .ok_or_else(|| ProviderError::invalid_response("event has no htmlLink"))?;
    let start = convert_time(event.start, "start")?;
    let end = convert_time(event.end, "end")?;

    let mut raw = RawEvent::new(start, end, html_link);
    if let Some(summary) = event.summary {
        raw = raw.with_summary(summary);
    }
    if let Some(description) = event.description {
        raw = raw.with_description(description);
    }
    Ok(raw)
}

fn convert_time(time: ApiEventTime, which: &str) -> ProviderResult<RawEventTime> {
    match (time.date, time.date_time) {
        (Some(date), _) => Ok(RawEventTime::Date(date)),
        (None, Some(date_time)) => Ok(RawEventTime::DateTime(date_time)),
        (None, None) => Err(ProviderError::invalid_response(format!(
            "event {} time has neither date nor dateTime",
            which
        ))),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventListResponse {
    #[serde(default)]
    items: Vec<ApiEvent>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEvent {
    start: ApiEventTime,
    end: ApiEventTime,
    summary: Option<String>,
    description: Option<String>,
    html_link: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEventTime {
    date: Option<NaiveDate>,
    date_time: Option<DateTime<FixedOffset>>,
}
