//! clipwatch - Pattern matcher module
//!
//! Wraps a change subscriber so only text matching a pattern is
//! forwarded, reduced to the matched substring

use regex::Regex;

/// Build a change subscriber that forwards only pattern matches
///
/// The callback receives the overall matched substring, not the full
/// text and not individual capture groups. Text without a match is
/// dropped silently. Each call builds an independent subscriber; two
/// registrations with the same pattern both fire.
pub fn filtered<F>(pattern: Regex, callback: F) -> impl Fn(&str) + Send + Sync + 'static
where
    F: Fn(&str) + Send + Sync + 'static,
{
    move |text| {
        if let Some(found) = pattern.find(text) {
            callback(found.as_str());
        }
    }
}
