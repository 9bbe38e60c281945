//! Template categories
//!
//! Every template belongs to exactly one [`Category`] from a closed set.
//! Unknown category names are rejected when parsed.

use crate::{PromptError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of template categories
///
/// # Examples
///
/// ```
/// use prompt_kit::Category;
///
/// let category: Category = "technical".parse().unwrap();
/// assert_eq!(category, Category::Technical);
/// assert_eq!(category.as_str(), "technical");
///
/// assert!("poetry".parse::<Category>().is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// General-purpose assistant
    Assistant,
    /// Stories, poetry, and other creative writing
    Creative,
    /// Code and engineering work
    Technical,
    /// Teaching and explanation
    Educational,
    /// Data and text analysis
    Analysis,
    /// Open-ended dialogue
    Conversation,
    /// Anything else
    #[default]
    Custom,
}

impl Category {
    /// All categories, in declaration order
    pub const ALL: [Category; 7] = [
        Category::Assistant,
        Category::Creative,
        Category::Technical,
        Category::Educational,
        Category::Analysis,
        Category::Conversation,
        Category::Custom,
    ];

    /// Lowercase identifier used in persisted documents
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Assistant => "assistant",
            Category::Creative => "creative",
            Category::Technical => "technical",
            Category::Educational => "educational",
            Category::Analysis => "analysis",
            Category::Conversation => "conversation",
            Category::Custom => "custom",
        }
    }

    /// Parse a category name, case-insensitively
    pub fn parse(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| PromptError::UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self> {
        Category::parse(s)
    }
}

impl TryFrom<&str> for Category {
    type Error = PromptError;

    fn try_from(s: &str) -> Result<Self> {
        Category::parse(s)
    }
}
