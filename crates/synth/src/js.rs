//! JavaScript rendering primitives shared by every generator
//!
//! All text that reaches the generated module from the analysis input passes
//! through one of these functions so the module always parses.

use once_cell::sync::Lazy;
use regex::Regex;

use stepforge_common::input::LINE_TERMINATORS;
use stepforge_common::{Step, TechnicalArchitecture};

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern compiles"));

/// Indentation of statements inside a step body
pub const INDENT: &str = "  ";

/// Quote `value` as a single-quoted JavaScript string literal
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Escape Cucumber-expression syntax so the step text binds literally
pub fn cucumber_expression(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '(' | ')' | '{' | '}' | '/') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Flatten text so it can sit inside a `//` comment
pub fn comment_text(text: &str) -> String {
    text.replace(LINE_TERMINATORS, " ")
}

/// Selector token for a literal: lower-cased, whitespace runs become hyphens
pub fn selector_token(literal: &str) -> String {
    WHITESPACE.replace_all(&literal.to_lowercase(), "-").into_owned()
}

/// Attribute selector for a literal, e.g. `[data-testid="save-btn"]`
pub fn attribute_selector(architecture: &TechnicalArchitecture, literal: &str, suffix: &str) -> String {
    format!(
        "[{}=\"{}{}\"]",
        architecture.selector_attribute(),
        selector_token(literal).replace('"', ""),
        suffix
    )
}

/// Identifier fragment in PascalCase, keeping ASCII alphanumerics only
pub fn pascal_case(text: &str) -> String {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// File-name slug: lower-case ASCII alphanumerics joined by single hyphens
pub fn slug(text: &str) -> String {
    let joined = text
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| word.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-");
    if joined.is_empty() {
        "feature".to_string()
    } else {
        joined
    }
}

/// Render one complete step implementation: binding clause plus body
pub fn step_block<S: AsRef<str>>(step: &Step, body: &[S]) -> String {
    let argument = step.data.as_ref().map(|d| d.argument_name()).unwrap_or("");
    let mut block = format!(
        "{}({}, async function ({}) {{\n",
        step.category.keyword(),
        string_literal(&cucumber_expression(&step.text)),
        argument
    );
    for line in body {
        let line = line.as_ref();
        if line.is_empty() {
            block.push('\n');
        } else {
            block.push_str(INDENT);
            block.push_str(line);
            block.push('\n');
        }
    }
    block.push_str("});");
    block
}
