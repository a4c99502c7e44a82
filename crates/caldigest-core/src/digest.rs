//! Digest assembly: raw events in, a rendered plaintext + HTML pair out.

use chrono::{Local, NaiveDate};
use thiserror::Error;
use tracing::debug;

use crate::event::RawEvent;
use crate::normalize::{NormalizeError, normalize_events};
use crate::render::{RenderError, render_html_at, render_plaintext_at};
use crate::template::TemplateSet;

/// One fully rendered digest in both output formats.
///
/// Both documents were rendered from the same normalized event list, so
/// event ordering and numbering agree between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub plaintext: String,
    pub html: String,
}

/// A digest build aborted; no partial output is produced.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DigestError {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Builds digests from raw calendar events.
#[derive(Debug, Clone)]
pub struct DigestBuilder {
    linkprefs: Vec<String>,
    templates: TemplateSet,
}

impl DigestBuilder {
    pub fn new(linkprefs: Vec<String>, templates: TemplateSet) -> Self {
        Self {
            linkprefs,
            templates,
        }
    }

    /// Builds a digest dated today. `Ok(None)` means there was nothing to
    /// digest; callers decide whether that skips delivery.
    pub fn build(&self, raw_events: &[RawEvent]) -> Result<Option<Digest>, DigestError> {
        self.build_at(raw_events, Local::now().date_naive())
    }

    /// Builds a digest with an explicit generation date.
    pub fn build_at(
        &self,
        raw_events: &[RawEvent],
        today: NaiveDate,
    ) -> Result<Option<Digest>, DigestError> {
        if raw_events.is_empty() {
            debug!("no upcoming events, skipping digest");
            return Ok(None);
        }

        let events = normalize_events(raw_events, &self.linkprefs)?;
        let plaintext = render_plaintext_at(&events, &self.templates, today)?;
        let html = render_html_at(&events, &self.templates, today)?;
        Ok(Some(Digest { plaintext, html }))
    }
}
