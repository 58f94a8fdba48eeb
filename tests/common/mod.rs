// Common test utilities shared across test files

use urimatch::{Capture, MatchMode, UriTemplate};

/// Compile a template that is known to be valid
#[allow(dead_code)]
pub fn template(text: &str) -> UriTemplate {
    UriTemplate::compile(text).unwrap_or_else(|err| panic!("{} failed to compile: {}", text, err))
}

/// Captures of the successful attempt, honoring resets, or `None` on no match
#[allow(dead_code)]
pub fn captures(template: &UriTemplate, uri: &str) -> Option<Vec<(String, String)>> {
    captures_with(template, uri, MatchMode::Unrooted)
}

#[allow(dead_code)]
pub fn captures_with(template: &UriTemplate, uri: &str, mode: MatchMode) -> Option<Vec<(String, String)>> {
    let mut found = Vec::new();
    let matched = template.parse_uri_with(uri, mode, |event| match event {
        Capture::Parameter { name, value } => found.push((name.to_string(), value.to_string())),
        Capture::Reset => found.clear(),
    });
    matched.then_some(found)
}

/// Build owned pairs from string literals
#[allow(dead_code)]
pub fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}
