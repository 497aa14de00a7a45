//! The snippet entity.
//!
//! A snippet is a titled block of code tagged with a language and a category,
//! optionally carrying long-form markdown (which enables the detail view) and an
//! external link. Snippets are created outside the read service and never
//! change once stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use utoipa::ToSchema;

pub mod filter;

pub use filter::SnippetCriteria;

/// Maximum length (in characters) of a snippet title.
pub const MAX_TITLE_LEN: usize = 100;
/// Maximum length (in characters) of the language and category tags.
pub const MAX_TAG_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    /// Opaque identifier: a UUID for stored snippets, a small integer for fixtures.
    pub id: String,
    pub title: String,
    pub language: String,
    pub category: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_link: Option<String>,
    /// Long-form explanation. Its presence is what enables the detail view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown_content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Snippet {
    /// Returns true when the snippet carries markdown worth a detail page.
    pub fn has_details(&self) -> bool {
        self.markdown_content
            .as_deref()
            .is_some_and(|md| !md.trim().is_empty())
    }

    pub fn tag(&self, field: TagField) -> &str {
        match field {
            TagField::Category => &self.category,
            TagField::Language => &self.language,
        }
    }
}

/// The two tag fields a distinct-values listing can be taken over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagField {
    Category,
    Language,
}

impl TagField {
    pub fn column_name(self) -> &'static str {
        match self {
            TagField::Category => "category",
            TagField::Language => "language",
        }
    }
}

/// Collapses tag values into a sorted list where each value appears once.
pub fn distinct_sorted<I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    values
        .into_iter()
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{field} cannot be more than {max} characters")]
    TooLong { field: &'static str, max: usize },
}

/// A snippet that has not been persisted yet.
///
/// The store assigns `id`, `created_at` and `updated_at`; everything else comes
/// from the draft after [`SnippetDraft::validate`] has normalised it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SnippetDraft {
    pub title: String,
    pub language: String,
    pub category: String,
    pub code: String,
    pub github_link: Option<String>,
    pub markdown_content: Option<String>,
}

impl SnippetDraft {
    pub fn new(
        title: impl Into<String>,
        language: impl Into<String>,
        category: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            language: language.into(),
            category: category.into(),
            code: code.into(),
            github_link: None,
            markdown_content: None,
        }
    }

    pub fn with_github_link(mut self, link: impl Into<String>) -> Self {
        self.github_link = Some(link.into());
        self
    }

    pub fn with_markdown(mut self, markdown: impl Into<String>) -> Self {
        self.markdown_content = Some(markdown.into());
        self
    }

    /// Trims every textual field and enforces the required/length rules.
    ///
    /// Optional fields that are blank after trimming become `None`.
    pub fn validate(self) -> Result<Self, ValidationError> {
        let title = required("title", &self.title, Some(MAX_TITLE_LEN))?;
        let language = required("language", &self.language, Some(MAX_TAG_LEN))?;
        let category = required("category", &self.category, Some(MAX_TAG_LEN))?;
        let code = required("code", &self.code, None)?;

        Ok(Self {
            title,
            language,
            category,
            code,
            github_link: optional(self.github_link),
            markdown_content: optional(self.markdown_content),
        })
    }

    /// Materialises the draft with an identifier and timestamps.
    pub fn into_snippet(self, id: impl Into<String>, at: DateTime<Utc>) -> Snippet {
        Snippet {
            id: id.into(),
            title: self.title,
            language: self.language,
            category: self.category,
            code: self.code,
            github_link: self.github_link,
            markdown_content: self.markdown_content,
            created_at: at,
            updated_at: at,
        }
    }
}

fn required(field: &'static str, value: &str, max: Option<usize>) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Missing(field));
    }
    if let Some(max) = max {
        if trimmed.chars().count() > max {
            return Err(ValidationError::TooLong { field, max });
        }
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
