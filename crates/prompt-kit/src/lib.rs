//! Prompt template management
//!
//! This crate builds the two halves of an LLM prompt (a system instruction and
//! a user instruction) from named, reusable templates. Callers supply a map of
//! parameter values; the crate checks the map against the placeholders the
//! template actually uses, optionally sanitizes the values, and substitutes them.
//!
//! # Features
//!
//! - **Parameter contract**: required names are derived from `{placeholder}`s in the
//!   template text; missing, unexpected and mistyped parameters are all reported at once
//! - **Input sanitization**: three levels (`none`, `basic`, `strict`), with strict mode
//!   rejecting values that match a catalog of script, shell and SQL injection patterns
//! - **Template registry**: add, look up, list, search and render templates by name
//! - **Persistence**: templates round-trip through JSON documents, one per file
//!
//! # Quick Start
//!
//! ```
//! use prompt_kit::{Category, Template};
//! use serde_json::json;
//!
//! let template = Template::builder("helper")
//!     .category(Category::Assistant)
//!     .system("You are a {role} assistant.")
//!     .user("Help with {task}.")
//!     .build()
//!     .unwrap();
//!
//! let params = json!({ "role": "helpful", "task": "coding" });
//! let prompt = template.render(params.as_object().unwrap()).unwrap();
//! assert_eq!(prompt.system, "You are a helpful assistant.");
//! assert_eq!(prompt.user, "Help with coding.");
//! ```
//!
//! # Using the Registry
//!
//! ```
//! use prompt_kit::{RenderOptions, SanitizationLevel, TemplateRegistry};
//! use serde_json::json;
//!
//! let registry = TemplateRegistry::with_defaults();
//!
//! let params = json!({ "language": "Rust", "code": "let x = 1;" });
//! let prompt = registry
//!     .render_template_with(
//!         "code_reviewer",
//!         params.as_object().unwrap(),
//!         &RenderOptions::with_level(SanitizationLevel::Strict),
//!     )
//!     .unwrap();
//! assert!(prompt.user.contains("let x = 1;"));
//! ```

mod category;
mod config;
mod error;
mod parameter;
mod placeholder;
mod registry;
mod sanitizer;
mod template;

pub mod defaults;
pub mod patterns;
pub mod store;

// Re-export core types
pub use category::Category;
pub use config::{RegistryConfig, RegistryConfigBuilder, RenderOptions};
pub use error::{ErrorKind, PromptError, Result, SanitizationIssue, ValidationIssue};
pub use parameter::{ParameterType, Params, value_type_name};
pub use placeholder::placeholders;
pub use registry::{DEFAULT_SEARCH_FIELDS, SearchField, TemplateRegistry};
pub use sanitizer::{InputSanitizer, SanitizationLevel};
pub use store::{DirectoryStore, DocumentStore, TemplateDocument, load_template, save_template};
pub use template::{RenderedPrompt, Template, TemplateBuilder};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::category::Category;
    pub use crate::config::RenderOptions;
    pub use crate::error::{PromptError, Result};
    pub use crate::parameter::{ParameterType, Params};
    pub use crate::registry::TemplateRegistry;
    pub use crate::sanitizer::{InputSanitizer, SanitizationLevel};
    pub use crate::template::{RenderedPrompt, Template};
}
