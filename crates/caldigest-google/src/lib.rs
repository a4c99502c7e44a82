//! Google Calendar event fetching for caldigest.
//!
//! Wraps the Google Calendar API v3 events listing behind a small client
//! that yields [`caldigest_core::RawEvent`] values ready for digest
//! assembly.

pub mod client;
pub mod error;

pub use client::GoogleCalendarClient;
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
