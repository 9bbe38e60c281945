//! Catalog of dangerous lexical patterns for strict sanitization
//!
//! The catalog is plain data: each entry is a name and a regular expression,
//! matched case-insensitively. It is a best-effort heuristic, not a parser,
//! so it will reject some benign prose and miss obfuscated payloads.

use crate::{PromptError, Result};
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

/// Bumped whenever an entry is added, removed, or changed
pub const CATALOG_VERSION: u32 = 1;

/// One catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DangerousPattern {
    pub name: &'static str,
    pub pattern: &'static str,
}

/// Built-in entries, checked in order
pub const CATALOG: &[DangerousPattern] = &[
    // Markup and script injection
    DangerousPattern {
        name: "script_block",
        pattern: r"<\s*/?\s*script\b",
    },
    DangerousPattern {
        name: "javascript_uri",
        pattern: r"javascript\s*:",
    },
    DangerousPattern {
        name: "vbscript_uri",
        pattern: r"vbscript\s*:",
    },
    DangerousPattern {
        name: "data_html_uri",
        pattern: r"data\s*:\s*text/html",
    },
    DangerousPattern {
        name: "event_handler",
        pattern: r"\bon[a-z]+\s*=",
    },
    // Code execution
    DangerousPattern {
        name: "eval_call",
        pattern: r"\beval\s*\(",
    },
    DangerousPattern {
        name: "exec_call",
        pattern: r"\bexec\s*\(",
    },
    DangerousPattern {
        name: "dynamic_import",
        pattern: r"__import__|\bimport\s*\(",
    },
    DangerousPattern {
        name: "os_command",
        pattern: r"\bos\s*\.\s*(system|popen|exec\w*|spawn\w*)\b",
    },
    DangerousPattern {
        name: "subprocess",
        pattern: r"\bsubprocess\b",
    },
    // SQL
    DangerousPattern {
        name: "sql_union_select",
        pattern: r"\bunion\s+(all\s+)?select\b",
    },
    DangerousPattern {
        name: "sql_drop_table",
        pattern: r"\bdrop\s+table\b",
    },
    DangerousPattern {
        name: "sql_delete_from",
        pattern: r"\bdelete\s+from\b",
    },
    DangerousPattern {
        name: "sql_insert_into",
        pattern: r"\binsert\s+into\b",
    },
    DangerousPattern {
        name: "sql_update_set",
        pattern: r"\bupdate\s+\S+\s+set\b",
    },
    DangerousPattern {
        name: "sql_line_comment",
        pattern: r"--(\s|$)",
    },
    DangerousPattern {
        name: "sql_block_comment",
        pattern: r"/\*|\*/",
    },
];

/// A catalog entry compiled for matching
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    name: String,
    regex: Regex,
}

impl CompiledPattern {
    /// Compile a case-insensitive pattern
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self> {
        let name = name.into();
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| PromptError::InvalidPattern {
                name: name.clone(),
                detail: e.to_string(),
            })?;
        Ok(Self { name, regex })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

#[allow(clippy::expect_used)]
static COMPILED: LazyLock<Vec<CompiledPattern>> = LazyLock::new(|| {
    CATALOG
        .iter()
        .map(|p| CompiledPattern::new(p.name, p.pattern).expect("catalog patterns must compile"))
        .collect()
});

/// The built-in catalog, compiled once per process
pub fn builtin() -> &'static [CompiledPattern] {
    &COMPILED
}

/// Name of the first built-in entry matching `text`
pub fn first_match(text: &str) -> Option<&'static str> {
    builtin()
        .iter()
        .find(|p| p.is_match(text))
        .map(CompiledPattern::name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_compiles() {
        assert_eq!(builtin().len(), CATALOG.len());
    }

    #[test]
    fn test_catalog_names_unique() {
        let mut names: Vec<_> = CATALOG.iter().map(|p| p.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), CATALOG.len());
    }

    #[test]
    fn test_detects_each_family() {
        let cases = [
            ("<SCRIPT>alert(1)</SCRIPT>", "script_block"),
            ("click JavaScript:void(0)", "javascript_uri"),
            ("<img src=x onerror=alert(1)>", "event_handler"),
            ("eval (code)", "eval_call"),
            ("exec('ls')", "exec_call"),
            ("__import__('os')", "dynamic_import"),
            ("import('mod')", "dynamic_import"),
            ("os.system('rm')", "os_command"),
            ("use subprocess here", "subprocess"),
            ("1 UNION SELECT password", "sql_union_select"),
            ("'; DROP TABLE users", "sql_drop_table"),
            ("delete  from accounts", "sql_delete_from"),
            ("INSERT INTO t VALUES", "sql_insert_into"),
            ("update users set admin=1", "sql_update_set"),
            ("admin' -- ", "sql_line_comment"),
            ("a /* b", "sql_block_comment"),
        ];

        for (text, expected) in cases {
            assert_eq!(first_match(text), Some(expected), "input: {text}");
        }
    }

    #[test]
    fn test_benign_text_passes() {
        assert_eq!(first_match("Write a poem about the ocean at dawn."), None);
        assert_eq!(first_match("Tom & Jerry's \"best\" episode"), None);
        assert_eq!(first_match("a well-known fact"), None);
    }

    #[test]
    fn test_custom_pattern() {
        let pattern = CompiledPattern::new("secret", r"\bapi[_-]?key\b").unwrap();
        assert!(pattern.is_match("my API_KEY is"));
        assert_eq!(pattern.name(), "secret");

        assert!(CompiledPattern::new("broken", r"(unclosed").is_err());
    }
}
