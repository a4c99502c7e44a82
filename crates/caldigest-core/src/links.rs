//! Canonical link extraction from event descriptions.
//!
//! Event descriptions often carry labelled links such as:
//!
//! ```text
//! Homepage: https://example.org/party
//! Wiki: https://wiki.example.org/Party
//! ```
//!
//! [`extract_link`] scans the description for the first URL under the
//! highest-priority label. The preference order is supplied by the caller
//! in descending priority.

use std::sync::LazyLock;

use regex::Regex;

/// URL pattern shared with the HTML auto-linker: scheme plus one or more
/// non-whitespace characters. A single trailing period is stripped after
/// matching, so sentence punctuation never ends up inside a link.
pub(crate) const URL_PATTERN: &str = r"https?://\S+";

static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("(?i){URL_PATTERN}")).expect("invalid URL regex")
});

/// Strips the single trailing period a greedy match picked up from the
/// surrounding sentence.
pub(crate) fn trim_trailing_period(url: &str) -> &str {
    url.strip_suffix('.').unwrap_or(url)
}

/// Extracts the preferred link from an event description.
///
/// The scan is an explicit two-level iteration: preference terms outer (in
/// caller priority order), lines inner (in original order), returning on the
/// first hit. Term priority strictly dominates line position, so a
/// lower-priority label on an earlier line never wins. A line matches a term
/// when its text up to the first `:`, trimmed and lowercased, equals the
/// term; a matching line without an extractable URL is skipped, not a
/// terminal failure.
///
/// Returns `None` when no preference term yields a URL; the caller falls
/// back to the event's native calendar link.
pub fn extract_link(description: &str, linkprefs: &[String]) -> Option<String> {
    let lines: Vec<&str> = description.lines().map(str::trim).collect();

    for pref in linkprefs {
        let pref = pref.trim().to_lowercase();
        for line in &lines {
            let Some((label, rest)) = line.split_once(':') else {
                continue;
            };
            if label.trim().to_lowercase() != pref {
                continue;
            }
            if let Some(found) = URL_REGEX.find(rest) {
                return Some(trim_trailing_period(found.as_str()).to_string());
            }
        }
    }

    None
}
