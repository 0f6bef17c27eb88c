//! Venue and location for a recording.
//!
//! Structured metadata wins when present. Otherwise a best-effort pass over
//! the free-text title pulls out `Live at <venue>` and the text after a
//! comma. The title heuristics live in their own functions so they can
//! be swapped out without touching selection.

use std::sync::OnceLock;

use regex::Regex;

pub const UNKNOWN_VENUE: &str = "Unknown Venue";
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

fn venue_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"Live at ([^,]+?)(?:,|\s+on\s+|$)").ok())
        .as_ref()
}

fn location_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r",\s*([^,]+?)(?:\s+on\s+|$)").ok())
        .as_ref()
}

pub fn extract_venue(structured: Option<&str>, title: &str) -> String {
    pick(structured, || venue_from_title(title), UNKNOWN_VENUE)
}

pub fn extract_location(structured: Option<&str>, title: &str) -> String {
    pick(structured, || location_from_title(title), UNKNOWN_LOCATION)
}

/// Text between "Live at" and the next comma or " on ".
pub fn venue_from_title(title: &str) -> Option<String> {
    capture_first(venue_pattern()?, title)
}

/// Text after a comma that runs to " on " or the end of the title.
pub fn location_from_title(title: &str) -> Option<String> {
    capture_first(location_pattern()?, title)
}

fn capture_first(pattern: &Regex, text: &str) -> Option<String> {
    let found = pattern.captures(text)?.get(1)?.as_str();
    non_blank(Some(found))
}

fn pick(
    structured: Option<&str>,
    from_title: impl FnOnce() -> Option<String>,
    placeholder: &str,
) -> String {
    non_blank(structured)
        .or_else(from_title)
        .unwrap_or_else(|| placeholder.to_string())
}

fn non_blank(text: Option<&str>) -> Option<String> {
    text.map(collapse_whitespace).filter(|t| !t.is_empty())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
