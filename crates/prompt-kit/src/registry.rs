//! Template registry
//!
//! This module provides [`TemplateRegistry`], an in-memory collection of
//! templates keyed by unique name.
//!
//! The registry has no interior locking. Mutating operations take `&mut self`;
//! wrap it in a `Mutex` or `RwLock` to share it between threads.

use crate::config::{RegistryConfig, RenderOptions};
use crate::parameter::Params;
use crate::store::{self, DirectoryStore, DocumentStore};
use crate::{Category, PromptError, RenderedPrompt, Result, Template, defaults};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;
use tracing::{debug, info, warn};

/// Template fields consulted by [`TemplateRegistry::search_in`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    Name,
    Description,
    Tags,
    Category,
}

/// Fields used by [`TemplateRegistry::search`]
pub const DEFAULT_SEARCH_FIELDS: &[SearchField] =
    &[SearchField::Name, SearchField::Description, SearchField::Tags];

/// An in-memory collection of templates keyed by name
///
/// # Examples
///
/// ```
/// use prompt_kit::{Category, Template, TemplateRegistry};
/// use serde_json::json;
///
/// let mut registry = TemplateRegistry::new();
/// registry
///     .add(
///         Template::builder("greeting")
///             .category(Category::Conversation)
///             .system("You are friendly.")
///             .user("Say hello to {name}.")
///             .build()
///             .unwrap(),
///     )
///     .unwrap();
///
/// let params = json!({ "name": "Ada" });
/// let prompt = registry
///     .render_template("greeting", params.as_object().unwrap())
///     .unwrap();
/// assert_eq!(prompt.user, "Say hello to Ada.");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, Template>,
    config: RegistryConfig,
}

impl TemplateRegistry {
    /// Create a new empty registry with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry with the given configuration
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            templates: BTreeMap::new(),
            config,
        }
    }

    /// Create a registry holding the built-in templates
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for template in defaults::builtin_templates() {
            registry.templates.insert(template.name().to_string(), template);
        }
        registry
    }

    /// Create a registry from every template document in `dir`
    pub fn from_directory(dir: impl AsRef<Path>) -> Result<Self> {
        let mut registry = Self::new();
        registry.load_all(dir)?;
        Ok(registry)
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Add a template
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::DuplicateTemplate`] if the name is already taken.
    pub fn add(&mut self, template: Template) -> Result<()> {
        if self.templates.contains_key(template.name()) {
            return Err(PromptError::DuplicateTemplate(template.name().to_string()));
        }
        debug!(template = %template.name(), category = %template.category(), "registered template");
        self.templates.insert(template.name().to_string(), template);
        Ok(())
    }

    /// Get a template by name
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Check if a template is registered
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Remove a template by name
    ///
    /// Returns the removed template if it existed.
    pub fn remove(&mut self, name: &str) -> Option<Template> {
        self.templates.remove(name)
    }

    /// Get the number of registered templates
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Iterate over templates in name order
    pub fn templates(&self) -> impl Iterator<Item = &Template> {
        self.templates.values()
    }

    /// Distinct categories in use
    pub fn categories(&self) -> BTreeSet<Category> {
        self.templates.values().map(Template::category).collect()
    }

    /// Template names in sorted order, optionally restricted to one category
    pub fn list(&self, category: Option<Category>) -> Vec<String> {
        self.templates
            .values()
            .filter(|t| category.is_none_or(|c| t.category() == c))
            .map(|t| t.name().to_string())
            .collect()
    }

    /// Case-insensitive substring search over name, description and tags
    pub fn search(&self, query: &str) -> Vec<String> {
        self.search_in(query, DEFAULT_SEARCH_FIELDS)
    }

    /// Case-insensitive substring search over the selected fields
    ///
    /// Each matching template appears once, in name order.
    pub fn search_in(&self, query: &str, fields: &[SearchField]) -> Vec<String> {
        let query = query.to_lowercase();
        self.templates
            .values()
            .filter(|t| fields.iter().any(|field| field_matches(t, *field, &query)))
            .map(|t| t.name().to_string())
            .collect()
    }

    /// Render a template using the registry's default [`RenderOptions`]
    pub fn render_template(&self, name: &str, params: &Params) -> Result<RenderedPrompt> {
        let options = self.config.render;
        self.render_template_with(name, params, &options)
    }

    /// Render a template, sanitizing parameters first when `options.sanitize` is set
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The template is not registered
    /// - A parameter value is rejected by the sanitizer
    /// - The parameters fail validation
    pub fn render_template_with(
        &self,
        name: &str,
        params: &Params,
        options: &RenderOptions,
    ) -> Result<RenderedPrompt> {
        let template = self
            .get(name)
            .ok_or_else(|| PromptError::TemplateNotRegistered(name.to_string()))?;

        match options.sanitizer() {
            Some(sanitizer) => {
                let cleaned = sanitizer.validate_parameters(params)?;
                template.render_with(&cleaned, options.validate)
            }
            None => template.render_with(params, options.validate),
        }
    }

    /// Load every template document in `dir`
    ///
    /// Documents that fail to load, or whose name is already registered, are
    /// logged and skipped. Returns the number of templates added.
    pub fn load_all(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let store = DirectoryStore::with_extension(dir.as_ref(), &self.config.document_extension);
        self.load_from(&store)
    }

    /// Load every document in `store`, skipping failures
    ///
    /// # Errors
    ///
    /// Fails only if the store cannot list its documents.
    pub fn load_from(&mut self, store: &dyn DocumentStore) -> Result<usize> {
        let mut loaded = 0;

        for key in store.keys()? {
            let result = store
                .read(&key)
                .and_then(|contents| store::from_document_str(&contents, &key))
                .and_then(|template| self.add(template));

            match result {
                Ok(()) => loaded += 1,
                Err(e) => warn!(document = %key, error = %e, "skipping template document"),
            }
        }

        info!(loaded, "loaded templates");
        Ok(loaded)
    }

    /// Write one document per template into `dir`, optionally for one category only
    ///
    /// Returns the number of documents written; failures are logged and skipped.
    pub fn export_all(&self, dir: impl AsRef<Path>, category: Option<Category>) -> Result<usize> {
        let store = DirectoryStore::with_extension(dir.as_ref(), &self.config.document_extension);
        self.export_to(&store, category)
    }

    /// Write templates into `store`, skipping failures
    pub fn export_to(
        &self,
        store: &dyn DocumentStore,
        category: Option<Category>,
    ) -> Result<usize> {
        let mut written = 0;
        let mut keys = HashSet::new();

        for template in self
            .templates
            .values()
            .filter(|t| category.is_none_or(|c| t.category() == c))
        {
            let key = store::document_key(template.name());
            if !keys.insert(key.clone()) {
                warn!(
                    template = %template.name(),
                    document = %key,
                    "document key collision, skipping"
                );
                continue;
            }

            let result = store::to_document_string(template)
                .and_then(|contents| store.write(&key, &contents));

            match result {
                Ok(()) => written += 1,
                Err(e) => {
                    warn!(template = %template.name(), error = %e, "failed to export template");
                }
            }
        }

        info!(written, "exported templates");
        Ok(written)
    }
}

fn field_matches(template: &Template, field: SearchField, query: &str) -> bool {
    let contains = |text: &str| text.to_lowercase().contains(query);
    match field {
        SearchField::Name => contains(template.name()),
        SearchField::Description => contains(template.description()),
        SearchField::Tags => template.tags().iter().any(|tag| contains(tag.as_str())),
        SearchField::Category => contains(template.category().as_str()),
    }
}
