//! Note model

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::category::{Category, CategoryId};
use super::validate::{bounded_text, MAX_TITLE_CHARS};
use crate::error::Result;

/// A unique identifier for a note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(Uuid);

impl NoteId {
    /// Create a new random note ID
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoteId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A note as represented by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier
    pub id: NoteId,
    /// Short title
    pub title: String,
    /// Plain text body
    pub content: String,
    /// Whether the note has been archived
    pub is_archived: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
    /// Attached categories, unique by id
    #[serde(default, deserialize_with = "deserialize_unique_categories")]
    pub categories: Vec<Category>,
}

impl Note {
    /// Whether the note is tagged with the given category
    #[must_use]
    pub fn has_category(&self, category_id: &CategoryId) -> bool {
        self.categories.iter().any(|category| category.id == *category_id)
    }

    /// First line of the content, truncated to `max_len` characters
    #[must_use]
    pub fn content_preview(&self, max_len: usize) -> String {
        self.content
            .lines()
            .next()
            .unwrap_or("")
            .chars()
            .take(max_len)
            .collect()
    }
}

/// Collapse duplicate category ids, keeping the first occurrence.
fn deserialize_unique_categories<'de, D>(deserializer: D) -> std::result::Result<Vec<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    let categories = Vec::<Category>::deserialize(deserializer)?;
    let mut seen = HashSet::new();
    Ok(categories
        .into_iter()
        .filter(|category| seen.insert(category.id))
        .collect())
}

/// Which notes a list request should return.
///
/// `archived: None` asks for every note regardless of archive state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NoteFilter {
    pub archived: Option<bool>,
    pub category_id: Option<CategoryId>,
}

impl NoteFilter {
    /// Notes that have not been archived
    #[must_use]
    pub const fn active() -> Self {
        Self {
            archived: Some(false),
            category_id: None,
        }
    }

    /// Notes that have been archived
    #[must_use]
    pub const fn archived() -> Self {
        Self {
            archived: Some(true),
            category_id: None,
        }
    }

    #[must_use]
    pub const fn with_category(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }

    /// Whether `note` belongs in a view built with this filter
    #[must_use]
    pub fn matches(&self, note: &Note) -> bool {
        let archived_ok = self
            .archived
            .map_or(true, |archived| note.is_archived == archived);
        let category_ok = self
            .category_id
            .map_or(true, |category_id| note.has_category(&category_id));
        archived_ok && category_ok
    }

    /// Query string pairs; unset filters are omitted
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(archived) = self.archived {
            pairs.push(("archived", archived.to_string()));
        }
        if let Some(category_id) = self.category_id {
            pairs.push(("category_id", category_id.to_string()));
        }
        pairs
    }
}

/// Payload for creating a note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    pub title: String,
    pub content: String,
}

impl NewNote {
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Check the payload against the service's field rules.
    pub fn validate(&self) -> Result<()> {
        bounded_text("title", &self.title, Some(MAX_TITLE_CHARS))?;
        bounded_text("content", &self.content, None)
    }
}

/// Partial update for a note; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl NoteChanges {
    /// Whether the update would change nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            bounded_text("title", title, Some(MAX_TITLE_CHARS))?;
        }
        if let Some(content) = &self.content {
            bounded_text("content", content, None)?;
        }
        Ok(())
    }
}
