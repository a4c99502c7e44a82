//! Plaintext and HTML document rendering.
//!
//! Both formats run the same three-layer substitution: per-event detail and
//! summary templates stamped once per event, then the joined results placed
//! into the outer document template. Event ordering, indices, and content
//! are identical across formats for one input list.

use std::sync::LazyLock;

use chrono::{Local, NaiveDate};
use regex::{Captures, Regex};
use thiserror::Error;

use crate::event::Event;
use crate::links::{URL_PATTERN, trim_trailing_period};
use crate::template::{TemplateError, TemplateSet, TemplateVars, render_template};

/// Date-range separator in plaintext output.
pub const PLAINTEXT_DATE_SEPARATOR: &str = " -- ";
/// Date-range separator in HTML output.
pub const HTML_DATE_SEPARATOR: &str = " &ndash; ";
/// Width of the horizontal rule between plaintext detail blocks.
pub const DETAIL_RULE_WIDTH: usize = 75;

static AUTOLINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)(?P<url>{URL_PATTERN})|(?P<email>[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]+)"
    ))
    .expect("invalid autolink regex")
});

/// A template failed during rendering, tagged with the layer it came from.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{layer} template: {source}")]
pub struct RenderError {
    pub layer: &'static str,
    #[source]
    pub source: TemplateError,
}

fn layer(layer: &'static str) -> impl Fn(TemplateError) -> RenderError {
    move |source| RenderError { layer, source }
}

/// Formats an event's date range, collapsing single-day events to one date.
fn datespec(event: &Event, separator: &str) -> String {
    let start = event.start.format("%Y-%m-%d").to_string();
    if event.start == event.end {
        start
    } else {
        format!("{start}{separator}{}", event.end.format("%Y-%m-%d"))
    }
}

/// The variables shared by the summary and detail templates of one event.
fn event_vars(event: &Event, index: usize, separator: &str) -> TemplateVars {
    let mut vars = TemplateVars::new();
    vars.insert("index", index.to_string());
    vars.insert("title", event.title.clone());
    vars.insert("summary", event.summary.clone());
    vars.insert("description", event.description.clone());
    vars.insert("url", event.url.clone());
    vars.insert("start", event.start.format("%Y-%m-%d").to_string());
    vars.insert("end", event.end.format("%Y-%m-%d").to_string());
    vars.insert("datespec", datespec(event, separator));
    vars
}

fn document_vars(date: NaiveDate, summary: String, details: String) -> TemplateVars {
    let mut vars = TemplateVars::new();
    vars.insert("date", date.format("%Y-%m-%d").to_string());
    vars.insert("summary", summary);
    vars.insert("details", details);
    vars
}

/// Wraps bare URLs and email addresses in anchor tags.
///
/// A single pass, so a URL inside an already-produced anchor is never
/// rewritten twice. A trailing period stays outside the URL.
fn autolink(text: &str) -> String {
    AUTOLINK_REGEX
        .replace_all(text, |caps: &Captures<'_>| {
            if let Some(m) = caps.name("url") {
                let url = trim_trailing_period(m.as_str());
                let tail = &m.as_str()[url.len()..];
                format!("<a href=\"{url}\">{url}</a>{tail}")
            } else {
                let email = &caps["email"];
                format!("<a href=\"mailto:{email}\">{email}</a>")
            }
        })
        .into_owned()
}

/// Renders the plaintext digest document dated today.
pub fn render_plaintext(events: &[Event], templates: &TemplateSet) -> Result<String, RenderError> {
    render_plaintext_at(events, templates, Local::now().date_naive())
}

/// Renders the plaintext digest document with an explicit generation date.
pub fn render_plaintext_at(
    events: &[Event],
    templates: &TemplateSet,
    today: NaiveDate,
) -> Result<String, RenderError> {
    let mut summaries = Vec::with_capacity(events.len());
    let mut details = Vec::with_capacity(events.len());

    for (position, event) in events.iter().enumerate() {
        let index = position + 1;
        let mut vars = event_vars(event, index, PLAINTEXT_DATE_SEPARATOR);
        details.push(
            render_template(&templates.plaintext_detail, &vars)
                .map_err(layer("plaintext detail"))?,
        );
        // Wide enough to clear the "N. " prefix of the summary line above.
        vars.insert("indent", " ".repeat(index.to_string().len() + 2));
        summaries.push(
            render_template(&templates.plaintext_summary, &vars)
                .map_err(layer("plaintext summary"))?,
        );
    }

    let rule = format!("\n\n{}\n\n", "-".repeat(DETAIL_RULE_WIDTH));
    let vars = document_vars(today, summaries.join("\n"), details.join(&rule));
    render_template(&templates.plaintext_document, &vars).map_err(layer("plaintext document"))
}

/// Renders the HTML digest document dated today.
pub fn render_html(events: &[Event], templates: &TemplateSet) -> Result<String, RenderError> {
    render_html_at(events, templates, Local::now().date_naive())
}

/// Renders the HTML digest document with an explicit generation date.
pub fn render_html_at(
    events: &[Event],
    templates: &TemplateSet,
    today: NaiveDate,
) -> Result<String, RenderError> {
    let mut summaries = Vec::with_capacity(events.len());
    let mut details = Vec::with_capacity(events.len());

    for (position, event) in events.iter().enumerate() {
        let index = position + 1;
        let mut vars = event_vars(event, index, HTML_DATE_SEPARATOR);
        summaries.push(
            render_template(&templates.html_summary, &vars).map_err(layer("html summary"))?,
        );
        // Detail bodies get live links and explicit line breaks.
        vars.insert(
            "description",
            autolink(&event.description).replace('\n', "<br>\n"),
        );
        details
            .push(render_template(&templates.html_detail, &vars).map_err(layer("html detail"))?);
    }

    let vars = document_vars(today, summaries.join("\n"), details.join("\n"));
    render_template(&templates.html_document, &vars).map_err(layer("html document"))
}
