//! Literal extraction from step text
//!
//! Every extractor is total: when the sentence carries no usable literal the
//! documented fallback is returned instead. Matching is case-insensitive.
//! `extract_value` returns the first quoted literal even when it is empty;
//! the targeting extractors skip empty literals, since an empty element,
//! field or expected text yields no usable selector or assertion.

use once_cell::sync::Lazy;
use regex::Regex;

pub const ELEMENT_FALLBACK: &str = "button";
pub const VALUE_FALLBACK: &str = "test value";
pub const FIELD_FALLBACK: &str = "input";
pub const EXPECTED_TEXT_FALLBACK: &str = "text";
pub const EXPECTED_CONTENT_FALLBACK: &str = "content";

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("extraction pattern compiles")
}

static QUOTED: Lazy<Regex> = Lazy::new(|| compile(r#""([^"]*)""#));
static ELEMENT: Lazy<Regex> = Lazy::new(|| compile(r#"(?i)click "([^"]*)""#));
static FIELD: Lazy<Regex> = Lazy::new(|| compile(r#"(?i)\b(?:into|in) "([^"]*)""#));
static EXPECTED_TEXT: Lazy<Regex> = Lazy::new(|| compile(r#"(?i)see "([^"]*)""#));
static EXPECTED_CONTENT: Lazy<Regex> = Lazy::new(|| compile(r#"(?i)contain "([^"]*)""#));

fn first_capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .find(|literal| !literal.is_empty())
}

/// Target of a `click "<X>"` phrase
pub fn extract_element(text: &str) -> &str {
    first_capture(&ELEMENT, text).unwrap_or(ELEMENT_FALLBACK)
}

/// First double-quoted literal anywhere in the text, empty or not
pub fn extract_value(text: &str) -> &str {
    QUOTED
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map_or(VALUE_FALLBACK, |m| m.as_str())
}

/// Target of an `in "<X>"` / `into "<X>"` phrase
pub fn extract_field(text: &str) -> &str {
    first_capture(&FIELD, text).unwrap_or(FIELD_FALLBACK)
}

/// Literal of a `see "<X>"` phrase
pub fn extract_expected_text(text: &str) -> &str {
    first_capture(&EXPECTED_TEXT, text).unwrap_or(EXPECTED_TEXT_FALLBACK)
}

/// Literal of a `contain "<X>"` phrase
pub fn extract_expected_content(text: &str) -> &str {
    first_capture(&EXPECTED_CONTENT, text).unwrap_or(EXPECTED_CONTENT_FALLBACK)
}

/// All double-quoted literals in order, empty ones included
pub fn quoted_literals(text: &str) -> Vec<&str> {
    QUOTED
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// The `index`-th quoted literal, or `fallback`
pub fn quoted_literal<'t>(text: &'t str, index: usize, fallback: &'t str) -> &'t str {
    quoted_literals(text).get(index).copied().unwrap_or(fallback)
}
