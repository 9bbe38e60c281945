//! Input sanitization
//!
//! [`InputSanitizer`] cleans or rejects single string values before they are
//! substituted into a template. How aggressive it is depends on the
//! [`SanitizationLevel`]:
//!
//! - `None`: trim surrounding whitespace
//! - `Basic`: also drop control characters other than `\n`, `\r`, `\t`
//! - `Strict`: also reject anything matching the [dangerous pattern
//!   catalog](crate::patterns), then HTML-escape `& < > " '` and remove
//!   any markup tags left over
//!
//! Strict mode rejects rather than strips matched content. Escaping happens
//! before tag removal, so removal can never join fragments into new text.

use crate::error::SanitizationIssue;
use crate::parameter::{Params, value_type_name};
use crate::patterns::{self, CompiledPattern};
use crate::{PromptError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::debug;

#[allow(clippy::expect_used)]
static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern must compile"));

/// Entities produced by escaping; left alone so escaping is idempotent
const ENTITIES: &[&str] = &["&amp;", "&lt;", "&gt;", "&quot;", "&#x27;", "&#39;"];

/// How aggressively values are cleaned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SanitizationLevel {
    None,
    #[default]
    Basic,
    Strict,
}

impl SanitizationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SanitizationLevel::None => "none",
            SanitizationLevel::Basic => "basic",
            SanitizationLevel::Strict => "strict",
        }
    }
}

impl fmt::Display for SanitizationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SanitizationLevel {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(SanitizationLevel::None),
            "basic" => Ok(SanitizationLevel::Basic),
            "strict" => Ok(SanitizationLevel::Strict),
            other => Err(PromptError::Config(format!(
                "unknown sanitization level '{other}'"
            ))),
        }
    }
}

/// Cleans or rejects string values at a fixed [`SanitizationLevel`]
///
/// # Examples
///
/// ```
/// use prompt_kit::{InputSanitizer, SanitizationLevel};
///
/// let strict = InputSanitizer::new(SanitizationLevel::Strict);
/// assert_eq!(strict.sanitize("  Fish & chips ").unwrap(), "Fish &amp; chips");
/// assert_eq!(strict.sanitize("a<b and c>d").unwrap(), "a&lt;b and c&gt;d");
/// assert!(strict.sanitize("<script>alert('x')</script>").is_err());
///
/// let basic = InputSanitizer::new(SanitizationLevel::Basic);
/// assert_eq!(basic.sanitize("a\u{0}b\n").unwrap(), "ab");
/// ```
#[derive(Debug, Clone, Default)]
pub struct InputSanitizer {
    level: SanitizationLevel,
    max_length: Option<usize>,
    extra_patterns: Vec<CompiledPattern>,
}

impl InputSanitizer {
    /// Create a sanitizer with no length limit
    pub fn new(level: SanitizationLevel) -> Self {
        Self {
            level,
            max_length: None,
            extra_patterns: Vec::new(),
        }
    }

    /// Reject inputs longer than `max_length` characters, at any level
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Set or clear the length limit
    pub fn max_length(mut self, max_length: Option<usize>) -> Self {
        self.max_length = max_length;
        self
    }

    /// Add a case-insensitive pattern to the strict-mode catalog
    ///
    /// Only consulted at [`SanitizationLevel::Strict`].
    pub fn with_pattern(mut self, name: impl Into<String>, pattern: &str) -> Result<Self> {
        self.extra_patterns.push(CompiledPattern::new(name, pattern)?);
        Ok(self)
    }

    pub fn level(&self) -> SanitizationLevel {
        self.level
    }

    pub fn limit(&self) -> Option<usize> {
        self.max_length
    }

    /// Sanitize one string
    pub fn sanitize(&self, input: &str) -> Result<String> {
        self.clean(input).map_err(|issue| reject("input", issue))
    }

    /// Sanitize a JSON value, which must be a string
    pub fn sanitize_value(&self, value: &Value) -> Result<String> {
        match value {
            Value::String(s) => self.sanitize(s),
            other => Err(reject(
                "input",
                SanitizationIssue::NotAString(value_type_name(other).to_string()),
            )),
        }
    }

    /// Sanitize every string value in `params`
    ///
    /// Non-string values are copied unchanged. The input map is not modified.
    pub fn validate_parameters(&self, params: &Params) -> Result<Params> {
        params
            .iter()
            .map(|(name, value)| {
                let value = match value {
                    Value::String(s) => Value::String(
                        self.clean(s)
                            .map_err(|issue| reject(&format!("parameter '{name}'"), issue))?,
                    ),
                    other => other.clone(),
                };
                Ok::<_, PromptError>((name.clone(), value))
            })
            .collect()
    }

    /// Name of the first strict-mode pattern matching `text`, if any
    pub fn find_dangerous<'a>(&'a self, text: &str) -> Option<&'a str> {
        patterns::first_match(text).or_else(|| {
            self.extra_patterns
                .iter()
                .find(|p| p.is_match(text))
                .map(CompiledPattern::name)
        })
    }

    fn clean(&self, input: &str) -> std::result::Result<String, SanitizationIssue> {
        if let Some(max_length) = self.max_length {
            let length = input.chars().count();
            if length > max_length {
                return Err(SanitizationIssue::TooLong { length, max_length });
            }
        }

        match self.level {
            SanitizationLevel::None => Ok(input.trim().to_string()),
            SanitizationLevel::Basic => Ok(strip_control(input.trim())),
            SanitizationLevel::Strict => {
                let basic = strip_control(input.trim());
                if let Some(pattern) = self.find_dangerous(&basic) {
                    return Err(SanitizationIssue::DangerousPattern(pattern.to_string()));
                }
                let escaped = escape_html(&basic);
                Ok(MARKUP_TAG.replace_all(&escaped, "").into_owned())
            }
        }
    }
}

fn reject(subject: &str, issue: SanitizationIssue) -> PromptError {
    debug!(subject, %issue, "sanitizer rejected value");
    PromptError::Sanitization {
        subject: subject.to_string(),
        issue,
    }
}

/// Drop code points below 32 except newline, carriage return and tab
fn strip_control(input: &str) -> String {
    input
        .chars()
        .filter(|&c| c >= ' ' || matches!(c, '\n' | '\r' | '\t'))
        .collect()
}

/// Escape `& < > " '`, leaving existing escape entities intact
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for (i, c) in input.char_indices() {
        match c {
            '&' if ENTITIES.iter().any(|e| input[i..].starts_with(e)) => out.push('&'),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}
