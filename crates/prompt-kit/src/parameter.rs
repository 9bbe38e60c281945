//! Parameter maps and declared parameter types

use crate::{PromptError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Parameter values supplied for rendering, keyed by placeholder name
///
/// Keys iterate in sorted order, so anything derived from a map
/// (error lists, sanitized copies) is deterministic.
pub type Params = serde_json::Map<String, Value>;

/// Expected type of a parameter value
///
/// Declared types are an optional overlay: only parameters that appear in a
/// template's declared set are type-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    #[serde(alias = "str")]
    String,
    #[serde(alias = "int")]
    Integer,
    /// Any JSON number
    #[serde(alias = "number")]
    Float,
    #[serde(alias = "bool")]
    Boolean,
    #[serde(alias = "array")]
    List,
    #[serde(alias = "dict")]
    Object,
}

impl ParameterType {
    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::String => "string",
            ParameterType::Integer => "integer",
            ParameterType::Float => "float",
            ParameterType::Boolean => "boolean",
            ParameterType::List => "list",
            ParameterType::Object => "object",
        }
    }

    /// Check whether a runtime value satisfies this type
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ParameterType::String => value.is_string(),
            ParameterType::Integer => value.is_i64() || value.is_u64(),
            ParameterType::Float => value.is_number(),
            ParameterType::Boolean => value.is_boolean(),
            ParameterType::List => value.is_array(),
            ParameterType::Object => value.is_object(),
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterType {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "string" | "str" => Ok(ParameterType::String),
            "integer" | "int" => Ok(ParameterType::Integer),
            "float" | "number" => Ok(ParameterType::Float),
            "boolean" | "bool" => Ok(ParameterType::Boolean),
            "list" | "array" => Ok(ParameterType::List),
            "object" | "dict" => Ok(ParameterType::Object),
            _ => Err(PromptError::UnknownParameterType(s.to_string())),
        }
    }
}

/// Name of a value's runtime type, using the same vocabulary as [`ParameterType`]
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Text substituted for a value: strings verbatim, everything else as compact JSON
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
