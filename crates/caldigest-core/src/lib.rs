//! Core types: events, link extraction, templates, digest rendering

pub mod digest;
pub mod event;
pub mod links;
pub mod normalize;
pub mod render;
pub mod template;
pub mod tracing;

pub use digest::{Digest, DigestBuilder, DigestError};
pub use event::{Event, RawEvent, RawEventTime};
pub use links::extract_link;
pub use normalize::{NormalizeError, normalize_event, normalize_events};
pub use render::{
    RenderError, render_html, render_html_at, render_plaintext, render_plaintext_at,
};
pub use template::{TemplateError, TemplateSet, TemplateVars, render_template};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
