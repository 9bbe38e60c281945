//! Template persistence
//!
//! Templates are persisted one per JSON document using the
//! [`TemplateDocument`] schema. [`DocumentStore`] is the narrow key/value
//! seam used by bulk operations; [`DirectoryStore`] implements it over a
//! directory of files.
//!
//! # Document format
//!
//! ```json
//! {
//!   "name": "code_reviewer",
//!   "category": "technical",
//!   "system_prompt": "You are a {language} reviewer.",
//!   "user_template": "Review:\n{code}",
//!   "description": "Reviews code",
//!   "parameters": { "language": "string", "code": "string" },
//!   "example_inputs": [{ "language": "Rust", "code": "fn main() {}" }],
//!   "tags": ["code", "review"],
//!   "version": "1.0"
//! }
//! ```

use crate::parameter::{ParameterType, Params};
use crate::template::DEFAULT_VERSION;
use crate::{Category, PromptError, Result, Template};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default file extension for template documents
pub const DEFAULT_EXTENSION: &str = "json";

/// On-disk representation of a [`Template`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDocument {
    pub name: String,
    /// Kept as a string so unknown categories surface as a load error
    /// naming the value
    pub category: String,
    pub system_prompt: String,
    pub user_template: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub example_inputs: Vec<Params>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

impl From<&Template> for TemplateDocument {
    fn from(template: &Template) -> Self {
        Self {
            name: template.name().to_string(),
            category: template.category().as_str().to_string(),
            system_prompt: template.system_text().to_string(),
            user_template: template.user_text().to_string(),
            description: template.description().to_string(),
            parameters: template
                .declared_parameters()
                .iter()
                .map(|(name, ty)| (name.clone(), ty.as_str().to_string()))
                .collect(),
            example_inputs: template.example_inputs().to_vec(),
            tags: template.tags().iter().cloned().collect(),
            version: template.version().to_string(),
            created_at: Some(template.created_at()),
        }
    }
}

impl TryFrom<TemplateDocument> for Template {
    type Error = PromptError;

    fn try_from(doc: TemplateDocument) -> Result<Self> {
        let category = Category::parse(&doc.category)?;
        let parameters = doc
            .parameters
            .iter()
            .map(|(name, ty)| {
                let ty = ty.parse::<ParameterType>()?;
                Ok::<_, PromptError>((name.clone(), ty))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut builder = Template::builder(doc.name)
            .category(category)
            .system(doc.system_prompt)
            .user(doc.user_template)
            .description(doc.description)
            .parameters(parameters)
            .tags(doc.tags)
            .version(doc.version);
        for example in doc.example_inputs {
            builder = builder.example(example);
        }
        if let Some(created_at) = doc.created_at {
            builder = builder.created_at(created_at);
        }
        builder.build()
    }
}

/// Serialize a template to document text
pub fn to_document_string(template: &Template) -> Result<String> {
    serde_json::to_string_pretty(&TemplateDocument::from(template))
        .map_err(|e| PromptError::persistence(template.name(), e))
}

/// Parse document text into a template
///
/// `location` is only used in error messages.
pub fn from_document_str(contents: &str, location: &str) -> Result<Template> {
    let doc: TemplateDocument =
        serde_json::from_str(contents).map_err(|e| PromptError::persistence(location, e))?;
    Template::try_from(doc).map_err(|e| PromptError::persistence(location, e))
}

/// Write one template to `path`
pub fn save_template(template: &Template, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let contents = to_document_string(template)?;
    std::fs::write(path, contents).map_err(|e| PromptError::persistence(path.display(), e))?;
    debug!(template = %template.name(), path = %path.display(), "saved template");
    Ok(())
}

/// Read one template from `path`
pub fn load_template(path: impl AsRef<Path>) -> Result<Template> {
    let path = path.as_ref();
    let contents =
        std::fs::read_to_string(path).map_err(|e| PromptError::persistence(path.display(), e))?;
    from_document_str(&contents, &path.display().to_string())
}

/// Key/value access to persisted template documents
#[cfg_attr(test, mockall::automock)]
pub trait DocumentStore {
    /// Keys of every document in the store
    fn keys(&self) -> Result<Vec<String>>;

    /// Read the document stored under `key`
    fn read(&self, key: &str) -> Result<String>;

    /// Create or replace the document stored under `key`
    fn write(&self, key: &str, contents: &str) -> Result<()>;
}

/// A [`DocumentStore`] backed by a directory, one file per document
///
/// Keys are file stems; only files with the configured extension are listed.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
    extension: String,
}

impl DirectoryStore {
    /// Create a store over `root` using the default `json` extension
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_extension(root, DEFAULT_EXTENSION)
    }

    pub fn with_extension(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into().trim_start_matches('.').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.{}", self.extension))
    }

    /// Check if the root directory exists
    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }
}

impl DocumentStore for DirectoryStore {
    fn keys(&self) -> Result<Vec<String>> {
        let entries = std::fs::read_dir(&self.root)
            .map_err(|e| PromptError::persistence(self.root.display(), e))?;

        let mut keys = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| PromptError::persistence(self.root.display(), e))?
                .path();

            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(self.extension.as_str()) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }

        keys.sort();
        Ok(keys)
    }

    fn read(&self, key: &str) -> Result<String> {
        let path = self.path_for(key);
        std::fs::read_to_string(&path).map_err(|e| PromptError::persistence(path.display(), e))
    }

    fn write(&self, key: &str, contents: &str) -> Result<()> {
        std::fs::create_dir_all(&self.root)
            .map_err(|e| PromptError::persistence(self.root.display(), e))?;
        let path = self.path_for(key);
        std::fs::write(&path, contents).map_err(|e| PromptError::persistence(path.display(), e))
    }
}

/// Document key for a template name: characters outside `[A-Za-z0-9_-]` become `_`
pub fn document_key(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn sample() -> Template {
        Template::builder("code_reviewer")
            .category(Category::Technical)
            .system("You are a {language} reviewer.")
            .user("Review:\n{code}")
            .description("Reviews code")
            .parameter("language", ParameterType::String)
            .parameter("code", ParameterType::String)
            .example(
                json!({ "language": "Rust", "code": "fn main() {}" })
                    .as_object()
                    .cloned()
                    .unwrap(),
            )
            .tags(["code", "review"])
            .version("2.1")
            .build()
            .unwrap()
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.json");
        let template = sample();

        save_template(&template, &path).unwrap();
        let loaded = load_template(&path).unwrap();

        assert_eq!(loaded, template);
    }

    #[test]
    fn test_minimal_document_defaults() {
        let template = from_document_str(
            r#"{"name":"m","category":"custom","system_prompt":"s","user_template":"u"}"#,
            "inline",
        )
        .unwrap();

        assert_eq!(template.version(), "1.0");
        assert!(template.description().is_empty());
        assert!(template.declared_parameters().is_empty());
    }

    #[test]
    fn test_unknown_category_is_persistence_error() {
        let err = from_document_str(
            r#"{"name":"m","category":"poetry","system_prompt":"s","user_template":"u"}"#,
            "bad.json",
        )
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Persistence);
        assert!(err.to_string().contains("bad.json"));
        assert!(err.to_string().contains("poetry"));
    }

    #[test]
    fn test_unknown_parameter_type_rejected() {
        let err = from_document_str(
            r#"{"name":"m","category":"custom","system_prompt":"{x}","user_template":"",
                "parameters":{"x":"tuple"}}"#,
            "bad.json",
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Persistence);
    }

    #[test]
    fn test_malformed_json() {
        let err = from_document_str("{not json", "broken.json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Persistence);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = load_template(dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Persistence);
    }

    #[test]
    fn test_directory_store_keys_filter_extension() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.json"), "{}").unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        fs::create_dir(dir.path().join("nested.json")).unwrap();

        let store = DirectoryStore::new(dir.path());
        assert_eq!(store.keys().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_directory_store_write_creates_root() {
        let dir = tempdir().unwrap();
        let store = DirectoryStore::with_extension(dir.path().join("out"), ".tmpl");

        assert!(!store.exists());
        store.write("x", "contents").unwrap();
        assert!(store.exists());
        assert_eq!(store.read("x").unwrap(), "contents");
        assert!(store.path_for("x").ends_with("x.tmpl"));
    }

    #[test]
    fn test_document_key() {
        assert_eq!(document_key("code_reviewer"), "code_reviewer");
        assert_eq!(document_key("../etc/passwd"), "___etc_passwd");
        assert_eq!(document_key("a b-c"), "a_b-c");
    }
}
