//! Environment variable helpers used by configuration loaders

use std::str::FromStr;
use thiserror::Error;

/// Error raised when an environment variable is present but unusable
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid value for environment variable {name}: '{value}' ({detail})")]
pub struct EnvError {
    pub name: String,
    pub value: String,
    pub detail: String,
}

/// Read a non-empty, trimmed string variable
pub fn env_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a variable with [`FromStr`]
///
/// Returns `Ok(None)` when the variable is unset or empty.
pub fn env_parse<T>(name: &str) -> Result<Option<T>, EnvError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_string(name)
        .map(|value| parse_value(name, value))
        .transpose()
}

/// Parse a boolean flag (`1/0`, `true/false`, `yes/no`, `on/off`)
pub fn env_flag(name: &str) -> Result<Option<bool>, EnvError> {
    env_string(name)
        .map(|value| parse_flag(name, value))
        .transpose()
}

/// Parse `value`, read from variable `name`, with [`FromStr`]
pub fn parse_value<T>(name: &str, value: String) -> Result<T, EnvError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| EnvError {
        name: name.to_string(),
        detail: e.to_string(),
        value,
    })
}

/// Parse `value`, read from variable `name`, as a boolean flag
pub fn parse_flag(name: &str, value: String) -> Result<bool, EnvError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(EnvError {
            name: name.to_string(),
            value,
            detail: "expected a boolean".to_string(),
        }),
    }
}
