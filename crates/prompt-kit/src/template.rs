//! Template entity and parameter contract
//!
//! A [`Template`] pairs a system prompt with a user prompt. The placeholders in
//! both texts form the template's required parameters; callers supply a
//! [`Params`] map which is checked against that set (and against any declared
//! types) before substitution.

use crate::error::ValidationIssue;
use crate::parameter::{ParameterType, Params, value_type_name};
use crate::{Category, PromptError, Result, placeholder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Default version string for new templates
pub const DEFAULT_VERSION: &str = "1.0";

/// The two rendered halves of a prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedPrompt {
    pub system: String,
    pub user: String,
}

/// A named, reusable system/user prompt pair
///
/// Templates are immutable once built. Use [`Template::builder`] to construct one.
///
/// # Examples
///
/// ```
/// use prompt_kit::{Category, Template};
/// use serde_json::json;
///
/// let template = Template::builder("helper")
///     .category(Category::Assistant)
///     .system("You are a {role} assistant.")
///     .user("Help with {task}.")
///     .build()
///     .unwrap();
///
/// let params = json!({ "role": "helpful", "task": "coding" });
/// let prompt = template.render(params.as_object().unwrap()).unwrap();
/// assert_eq!(prompt.system, "You are a helpful assistant.");
/// assert_eq!(prompt.user, "Help with coding.");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    name: String,
    category: Category,
    system_text: String,
    user_text: String,
    description: String,
    declared_parameters: BTreeMap<String, ParameterType>,
    example_inputs: Vec<Params>,
    tags: BTreeSet<String>,
    version: String,
    created_at: DateTime<Utc>,
}

impl Template {
    /// Create a new template builder
    pub fn builder(name: impl Into<String>) -> TemplateBuilder {
        TemplateBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn system_text(&self) -> &str {
        &self.system_text
    }

    pub fn user_text(&self) -> &str {
        &self.user_text
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn declared_parameters(&self) -> &BTreeMap<String, ParameterType> {
        &self.declared_parameters
    }

    pub fn example_inputs(&self) -> &[Params] {
        &self.example_inputs
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Placeholder names used in the system and user texts
    ///
    /// Derived on every call; this is the authoritative set of names a
    /// parameter map must supply.
    pub fn required_parameters(&self) -> BTreeSet<String> {
        let mut names = placeholder::placeholders(&self.system_text);
        names.extend(placeholder::placeholders(&self.user_text));
        names
    }

    /// Check `params` against this template's contract
    ///
    /// All problems are collected; an empty list means the map is acceptable.
    pub fn validate(&self, params: &Params) -> Vec<ValidationIssue> {
        let required = self.required_parameters();
        let mut issues = Vec::new();

        let missing: Vec<String> = required
            .iter()
            .filter(|name| !params.contains_key(name.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            issues.push(ValidationIssue::MissingParameters(missing));
        }

        let unexpected: Vec<String> = params
            .keys()
            .filter(|name| !required.contains(name.as_str()))
            .cloned()
            .collect();
        if !unexpected.is_empty() {
            issues.push(ValidationIssue::UnexpectedParameters(unexpected));
        }

        for (name, value) in params {
            let Some(expected) = self.declared_parameters.get(name) else {
                continue;
            };
            if !expected.matches(value) {
                issues.push(ValidationIssue::TypeMismatch {
                    name: name.clone(),
                    expected: expected.to_string(),
                    actual: value_type_name(value).to_string(),
                });
            }
        }

        issues
    }

    /// Validate `params`, then substitute them into both texts
    pub fn render(&self, params: &Params) -> Result<RenderedPrompt> {
        self.render_with(params, true)
    }

    /// Substitute without the contract check
    ///
    /// Extra parameters are ignored, but a placeholder with no value is still
    /// an error.
    pub fn render_unchecked(&self, params: &Params) -> Result<RenderedPrompt> {
        self.render_with(params, false)
    }

    /// Render, optionally running [`Template::validate`] first
    pub fn render_with(&self, params: &Params, validate: bool) -> Result<RenderedPrompt> {
        if validate {
            let issues = self.validate(params);
            if !issues.is_empty() {
                debug!(template = %self.name, issues = issues.len(), "parameter validation failed");
                return Err(PromptError::Validation {
                    template: self.name.clone(),
                    issues,
                });
            }
        }

        let system = self.substitute(&self.system_text, params)?;
        let user = self.substitute(&self.user_text, params)?;
        Ok(RenderedPrompt { system, user })
    }

    /// Validate every stored example input
    ///
    /// Returns `(index, issues)` for each example that does not satisfy the contract.
    pub fn validate_examples(&self) -> Vec<(usize, Vec<ValidationIssue>)> {
        self.example_inputs
            .iter()
            .enumerate()
            .filter_map(|(i, example)| {
                let issues = self.validate(example);
                (!issues.is_empty()).then_some((i, issues))
            })
            .collect()
    }

    fn substitute(&self, text: &str, params: &Params) -> Result<String> {
        placeholder::substitute(text, params).map_err(|name| PromptError::Validation {
            template: self.name.clone(),
            issues: vec![ValidationIssue::UnresolvedPlaceholder(name)],
        })
    }
}

/// Builder for [`Template`]
#[derive(Debug, Clone)]
pub struct TemplateBuilder {
    name: String,
    category: Category,
    system_text: String,
    user_text: String,
    description: String,
    declared_parameters: BTreeMap<String, ParameterType>,
    example_inputs: Vec<Params>,
    tags: BTreeSet<String>,
    version: String,
    created_at: Option<DateTime<Utc>>,
}

impl TemplateBuilder {
    /// Create a new builder with the given template name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: Category::default(),
            system_text: String::new(),
            user_text: String::new(),
            description: String::new(),
            declared_parameters: BTreeMap::new(),
            example_inputs: Vec::new(),
            tags: BTreeSet::new(),
            version: DEFAULT_VERSION.to_string(),
            created_at: None,
        }
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the system prompt text
    pub fn system(mut self, text: impl Into<String>) -> Self {
        self.system_text = text.into();
        self
    }

    /// Set the user prompt text
    pub fn user(mut self, text: impl Into<String>) -> Self {
        self.user_text = text.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Declare the expected type of a parameter
    pub fn parameter(mut self, name: impl Into<String>, ty: ParameterType) -> Self {
        self.declared_parameters.insert(name.into(), ty);
        self
    }

    /// Declare several parameter types at once
    pub fn parameters<I, S>(mut self, declared: I) -> Self
    where
        I: IntoIterator<Item = (S, ParameterType)>,
        S: Into<String>,
    {
        self.declared_parameters
            .extend(declared.into_iter().map(|(n, t)| (n.into(), t)));
        self
    }

    /// Add an example parameter map
    pub fn example(mut self, example: Params) -> Self {
        self.example_inputs.push(example);
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Override the creation timestamp (defaults to the build time)
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Build the template
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank.
    pub fn build(self) -> Result<Template> {
        if self.name.trim().is_empty() {
            return Err(PromptError::InvalidTemplate {
                name: self.name,
                detail: "name must not be empty".to_string(),
            });
        }

        Ok(Template {
            name: self.name,
            category: self.category,
            system_text: self.system_text,
            user_text: self.user_text,
            description: self.description,
            declared_parameters: self.declared_parameters,
            example_inputs: self.example_inputs,
            tags: self.tags,
            version: self.version,
            created_at: self.created_at.unwrap_or_else(Utc::now),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: serde_json::Value) -> Params {
        value.as_object().cloned().unwrap()
    }

    fn helper() -> Template {
        Template::builder("helper")
            .category(Category::Assistant)
            .system("You are a {role} assistant.")
            .user("Help with {task}.")
            .build()
            .unwrap()
    }

    #[test]
    fn test_required_parameters_union() {
        let template = Template::builder("t")
            .system("{a} and {b}")
            .user("{b} and {c} {{not_me}}")
            .build()
            .unwrap();

        let required: Vec<_> = template.required_parameters().into_iter().collect();
        assert_eq!(required, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_render_basic() {
        let prompt = helper()
            .render(&params(json!({ "role": "helpful", "task": "coding" })))
            .unwrap();
        assert_eq!(prompt.system, "You are a helpful assistant.");
        assert_eq!(prompt.user, "Help with coding.");
    }

    #[test]
    fn test_validate_missing() {
        let issues = helper().validate(&params(json!({ "role": "helpful" })));
        assert_eq!(issues.len(), 1);
        assert!(issues[0].to_string().contains("task"));
    }

    #[test]
    fn test_validate_missing_and_unexpected_together() {
        let issues = helper().validate(&params(json!({ "role": "x", "mood": "calm" })));
        assert_eq!(
            issues,
            vec![
                ValidationIssue::MissingParameters(vec!["task".to_string()]),
                ValidationIssue::UnexpectedParameters(vec!["mood".to_string()]),
            ]
        );
    }

    #[test]
    fn test_validate_lists_every_missing_name() {
        let issues = helper().validate(&Params::new());
        assert_eq!(
            issues[0].to_string(),
            "missing required parameters: role, task"
        );
    }

    #[test]
    fn test_validate_type_mismatch() {
        let template = Template::builder("count")
            .user("List {n} ideas about {topic}")
            .parameter("n", ParameterType::Integer)
            .parameter("topic", ParameterType::String)
            .build()
            .unwrap();

        let issues = template.validate(&params(json!({ "n": "five", "topic": "cats" })));
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].to_string(),
            "parameter 'n' should be integer, got string"
        );

        assert!(
            template
                .validate(&params(json!({ "n": 5, "topic": "cats" })))
                .is_empty()
        );
    }

    #[test]
    fn test_render_validation_error_no_partial_output() {
        let err = helper()
            .render(&params(json!({ "role": "helpful" })))
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Validation);
        assert!(err.to_string().contains("task"));
    }

    #[test]
    fn test_render_unchecked_still_requires_values() {
        let err = helper()
            .render_unchecked(&params(json!({ "role": "helpful" })))
            .unwrap_err();
        assert_eq!(
            err.issues(),
            &[ValidationIssue::UnresolvedPlaceholder("task".to_string())]
        );
    }

    #[test]
    fn test_render_unchecked_ignores_extras() {
        let prompt = helper()
            .render_unchecked(&params(json!({ "role": "a", "task": "b", "extra": 1 })))
            .unwrap();
        assert_eq!(prompt.user, "Help with b.");
    }

    #[test]
    fn test_render_is_deterministic() {
        let template = helper();
        let p = params(json!({ "role": "helpful", "task": "coding" }));
        assert_eq!(template.render(&p).unwrap(), template.render(&p).unwrap());
    }

    #[test]
    fn test_validate_examples() {
        let template = Template::builder("ex")
            .user("Say {word}")
            .example(params(json!({ "word": "hi" })))
            .example(params(json!({ "other": "hi" })))
            .build()
            .unwrap();

        let failing = template.validate_examples();
        assert_eq!(failing.len(), 1);
        assert_eq!(failing[0].0, 1);
        assert_eq!(failing[0].1.len(), 2);
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = Template::builder("  ").build().unwrap_err();
        assert!(matches!(err, PromptError::InvalidTemplate { .. }));
    }

    #[test]
    fn test_builder_defaults() {
        let template = Template::builder("plain").build().unwrap();
        assert_eq!(template.category(), Category::Custom);
        assert_eq!(template.version(), DEFAULT_VERSION);
        assert!(template.tags().is_empty());
        assert!(template.required_parameters().is_empty());
    }
}
