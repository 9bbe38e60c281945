//! Configuration for rendering and persistence

use crate::sanitizer::{InputSanitizer, SanitizationLevel};
use crate::store::DEFAULT_EXTENSION;
use crate::{PromptError, Result};
use prompt_kit_utils::{EnvError, env_string, parse_flag, parse_value};
use serde::{Deserialize, Serialize};

/// Environment variable toggling sanitization
pub const ENV_SANITIZE: &str = "PROMPT_KIT_SANITIZE";
/// Environment variable selecting the sanitization level
pub const ENV_SANITIZATION_LEVEL: &str = "PROMPT_KIT_SANITIZATION_LEVEL";
/// Environment variable setting the per-value length limit
pub const ENV_MAX_LENGTH: &str = "PROMPT_KIT_MAX_LENGTH";
/// Environment variable setting the document file extension
pub const ENV_DOCUMENT_EXTENSION: &str = "PROMPT_KIT_DOCUMENT_EXTENSION";

/// Options for a single registry render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Run string parameters through the sanitizer first
    pub sanitize: bool,
    /// Sanitizer level used when `sanitize` is set
    pub level: SanitizationLevel,
    /// Per-value character limit used when `sanitize` is set
    pub max_length: Option<usize>,
    /// Check the parameter contract before substituting
    pub validate: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            sanitize: true,
            level: SanitizationLevel::Basic,
            max_length: None,
            validate: true,
        }
    }
}

impl RenderOptions {
    /// Render without sanitizing
    pub fn unsanitized() -> Self {
        Self {
            sanitize: false,
            ..Self::default()
        }
    }

    /// Sanitize at the given level
    pub fn with_level(level: SanitizationLevel) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    /// Sanitizer described by these options, or `None` if sanitization is off
    pub fn sanitizer(&self) -> Option<InputSanitizer> {
        self.sanitize
            .then(|| InputSanitizer::new(self.level).max_length(self.max_length))
    }
}

/// Registry-wide configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Defaults for [`TemplateRegistry::render_template`](crate::TemplateRegistry::render_template)
    pub render: RenderOptions,
    /// File extension for persisted documents, without the dot
    pub document_extension: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            document_extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl RegistryConfig {
    /// Create a new configuration builder
    pub fn builder() -> RegistryConfigBuilder {
        RegistryConfigBuilder::default()
    }

    /// Defaults overridden by `PROMPT_KIT_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_string)
    }

    /// Defaults overridden by `PROMPT_KIT_*` values from `lookup`
    ///
    /// `lookup` returns the value for a variable name, or `None` if unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        let env_err = |e: EnvError| PromptError::Config(e.to_string());

        if let Some(value) = lookup(ENV_SANITIZE) {
            config.render.sanitize = parse_flag(ENV_SANITIZE, value).map_err(env_err)?;
        }
        if let Some(value) = lookup(ENV_SANITIZATION_LEVEL) {
            config.render.level = value.trim().parse()?;
        }
        if let Some(value) = lookup(ENV_MAX_LENGTH) {
            config.render.max_length = Some(parse_value(ENV_MAX_LENGTH, value).map_err(env_err)?);
        }
        if let Some(value) = lookup(ENV_DOCUMENT_EXTENSION) {
            config.document_extension = value.trim().to_string();
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.render.max_length == Some(0) {
            return Err(PromptError::Config(
                "max_length must be greater than 0".to_string(),
            ));
        }

        if self.document_extension.trim_start_matches('.').is_empty() {
            return Err(PromptError::Config(
                "document_extension must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for RegistryConfig
#[derive(Debug, Default)]
pub struct RegistryConfigBuilder {
    sanitize: Option<bool>,
    level: Option<SanitizationLevel>,
    max_length: Option<usize>,
    validate: Option<bool>,
    document_extension: Option<String>,
}

impl RegistryConfigBuilder {
    /// Enable or disable sanitization by default
    pub fn sanitize(mut self, sanitize: bool) -> Self {
        self.sanitize = Some(sanitize);
        self
    }

    /// Set the default sanitization level
    pub fn level(mut self, level: SanitizationLevel) -> Self {
        self.level = Some(level);
        self
    }

    /// Set the per-value length limit
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Enable or disable the parameter contract check by default
    pub fn validate(mut self, validate: bool) -> Self {
        self.validate = Some(validate);
        self
    }

    /// Set the document file extension
    pub fn document_extension(mut self, extension: impl Into<String>) -> Self {
        self.document_extension = Some(extension.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<RegistryConfig> {
        let defaults = RegistryConfig::default();

        let config = RegistryConfig {
            render: RenderOptions {
                sanitize: self.sanitize.unwrap_or(defaults.render.sanitize),
                level: self.level.unwrap_or(defaults.render.level),
                max_length: self.max_length.or(defaults.render.max_length),
                validate: self.validate.unwrap_or(defaults.render.validate),
            },
            document_extension: self
                .document_extension
                .unwrap_or(defaults.document_extension),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::default();
        assert!(config.render.sanitize);
        assert_eq!(config.render.level, SanitizationLevel::Basic);
        assert_eq!(config.render.max_length, None);
        assert!(config.render.validate);
        assert_eq!(config.document_extension, "json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = RegistryConfig::builder()
            .level(SanitizationLevel::Strict)
            .max_length(500)
            .document_extension("tmpl")
            .build()
            .unwrap();

        assert_eq!(config.render.level, SanitizationLevel::Strict);
        assert_eq!(config.render.max_length, Some(500));
        assert_eq!(config.document_extension, "tmpl");
        assert!(config.render.sanitize);
    }

    #[test]
    fn test_validation() {
        assert!(RegistryConfig::builder().max_length(0).build().is_err());
        assert!(
            RegistryConfig::builder()
                .document_extension(".")
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_render_options_sanitizer() {
        assert!(RenderOptions::unsanitized().sanitizer().is_none());

        let options = RenderOptions {
            max_length: Some(10),
            ..RenderOptions::with_level(SanitizationLevel::Strict)
        };
        let sanitizer = options.sanitizer().unwrap();
        assert_eq!(sanitizer.level(), SanitizationLevel::Strict);
        assert_eq!(sanitizer.limit(), Some(10));
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_from_lookup_empty_is_default() {
        let config = RegistryConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, RegistryConfig::default());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = RegistryConfig::from_lookup(lookup(&[
            (ENV_SANITIZE, "yes"),
            (ENV_SANITIZATION_LEVEL, "strict"),
            (ENV_MAX_LENGTH, "200"),
            (ENV_DOCUMENT_EXTENSION, "tmpl"),
        ]))
        .unwrap();

        assert!(config.render.sanitize);
        assert_eq!(config.render.level, SanitizationLevel::Strict);
        assert_eq!(config.render.max_length, Some(200));
        assert_eq!(config.document_extension, "tmpl");

        let sanitizer = config.render.sanitizer().unwrap();
        assert_eq!(sanitizer.level(), SanitizationLevel::Strict);
    }

    #[test]
    fn test_from_lookup_sanitize_off() {
        let config = RegistryConfig::from_lookup(lookup(&[(ENV_SANITIZE, "off")])).unwrap();
        assert!(!config.render.sanitize);
        assert!(config.render.sanitizer().is_none());
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let cases = [
            (ENV_SANITIZE, "maybe"),
            (ENV_MAX_LENGTH, "abc"),
            (ENV_MAX_LENGTH, "0"),
            (ENV_DOCUMENT_EXTENSION, "."),
        ];

        for (name, value) in cases {
            let err = RegistryConfig::from_lookup(lookup(&[(name, value)])).unwrap_err();
            assert!(matches!(err, PromptError::Config(_)), "{name}={value}: {err}");
        }
    }

    #[test]
    fn test_from_lookup_rejects_unknown_level() {
        assert!(
            RegistryConfig::from_lookup(lookup(&[(ENV_SANITIZATION_LEVEL, "paranoid")])).is_err()
        );
    }

    #[test]
    fn test_serde() {
        let config = RegistryConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: RegistryConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
