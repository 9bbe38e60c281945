//! Placeholder scanning and substitution
//!
//! Placeholders are identifiers in single braces: `{name}`. Doubled braces
//! (`{{`, `}}`) are escapes for literal braces, and brace groups that are not
//! identifiers are left as text.

use crate::parameter::{Params, display_value};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{|\}\}|\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern must compile")
});

/// Distinct placeholder names in `text`
pub fn placeholders(text: &str) -> BTreeSet<String> {
    PLACEHOLDER
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Replace every placeholder in `text` with its value from `params`
///
/// Returns the name of the first placeholder with no value as the error.
pub fn substitute(text: &str, params: &Params) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(&text[last..whole.start()]);
        last = whole.end();

        match caps.get(1) {
            Some(name) => {
                let value = params
                    .get(name.as_str())
                    .ok_or_else(|| name.as_str().to_string())?;
                out.push_str(&display_value(value));
            }
            // Escaped brace: emit a single one
            None => out.push_str(&whole.as_str()[..1]),
        }
    }

    out.push_str(&text[last..]);
    Ok(out)
}
