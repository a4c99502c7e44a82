//! Named-placeholder template substitution.
//!
//! Templates are opaque strings with `{name}` placeholders, e.g.:
//!
//! ```text
//! {index}. {title} ({datespec})
//! {indent}{url}
//! ```
//!
//! Substitution takes a key-value mapping per invocation; a placeholder with
//! no entry in the map is a fatal configuration error, never silently
//! dropped. `{{` and `}}` emit literal braces.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The variables available to one substitution call.
pub type TemplateVars = BTreeMap<&'static str, String>;

/// A template references something the current rendering cannot supply.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TemplateError {
    /// The template names a placeholder with no value in the map.
    #[error("template references unknown placeholder {{{name}}}")]
    UnknownPlaceholder { name: String },
    /// A `{` was never closed.
    #[error("unclosed placeholder starting at byte {position}")]
    UnclosedPlaceholder { position: usize },
}

/// Substitutes `{name}` placeholders from `vars` into `template`.
///
/// # Errors
///
/// Fails on the first placeholder absent from `vars` and on an unterminated
/// placeholder. Callers treat either as misconfiguration and abort the
/// digest build.
pub fn render_template(template: &str, vars: &TemplateVars) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((position, c)) = chars.next() {
        match c {
            '{' => {
                if let Some((_, '{')) = chars.peek() {
                    chars.next();
                    out.push('{');
                    continue;
                }
                let mut name = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if !closed {
                    return Err(TemplateError::UnclosedPlaceholder { position });
                }
                match vars.get(name.as_str()) {
                    Some(value) => out.push_str(value),
                    None => return Err(TemplateError::UnknownPlaceholder { name }),
                }
            }
            '}' => {
                if let Some((_, '}')) = chars.peek() {
                    chars.next();
                }
                out.push('}');
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}

/// The six templates a digest run needs: document, per-event summary and
/// per-event detail, for each of the two output formats.
///
/// Owned by configuration; the core only reads them. Missing templates are
/// a configuration error detected before the core runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSet {
    /// Outer plaintext document; receives `date`, `summary`, `details`.
    pub plaintext_document: String,
    /// Per-event plaintext listing entry.
    pub plaintext_summary: String,
    /// Per-event plaintext detail block.
    pub plaintext_detail: String,
    /// Outer HTML document; receives `date`, `summary`, `details`.
    pub html_document: String,
    /// Per-event HTML listing entry.
    pub html_summary: String,
    /// Per-event HTML detail block.
    pub html_detail: String,
}

impl TemplateSet {
    /// A plain built-in set, used when configuration supplies none.
    pub fn builtin() -> Self {
        Self {
            plaintext_document: "\
Upcoming events, generated on {date}.

{summary}

===========================================================================

{details}
"
            .to_string(),
            plaintext_summary: "{index}. {title} ({datespec})\n{indent}{url}".to_string(),
            plaintext_detail: "\
{index}. {title}
{datespec}
{url}

{description}"
                .to_string(),
            html_document: "\
<html>
<head><title>Upcoming events</title></head>
<body>
<h1>Upcoming events</h1>
<p>Generated on {date}.</p>
<ol>
{summary}
</ol>
{details}
</body>
</html>
"
            .to_string(),
            html_summary: "<li><a href=\"#event-{index}\">{title}</a> ({datespec})</li>"
                .to_string(),
            html_detail: "\
<h2 id=\"event-{index}\">{index}. <a href=\"{url}\">{title}</a></h2>
<p>{datespec}</p>
<p>{description}</p>"
                .to_string(),
        }
    }
}
