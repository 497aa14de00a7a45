//! In-memory filtering over a snippet collection.
//!
//! Used on the fixture path; the Postgres store translates the same criteria
//! into SQL so both paths agree on what matches.

use super::Snippet;

/// Filter criteria for listing snippets.
///
/// Empty strings count as "not supplied". A `limit` of zero or below means no cap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetCriteria {
    /// Free text matched against title, code, category and language.
    pub query: Option<String>,
    pub category: Option<String>,
    pub language: Option<String>,
    pub limit: Option<i64>,
}

impl SnippetCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn query(&self) -> Option<&str> {
        non_empty(&self.query)
    }

    pub fn category(&self) -> Option<&str> {
        non_empty(&self.category)
    }

    pub fn language(&self) -> Option<&str> {
        non_empty(&self.language)
    }

    /// The effective result cap, if any.
    pub fn cap(&self) -> Option<usize> {
        self.limit
            .filter(|limit| *limit > 0)
            .map(|limit| usize::try_from(limit).unwrap_or(usize::MAX))
    }

    /// Returns true if `snippet` satisfies every supplied criterion.
    pub fn matches(&self, snippet: &Snippet) -> bool {
        if let Some(query) = self.query() {
            let needle = query.to_lowercase();
            let hit = [
                &snippet.title,
                &snippet.code,
                &snippet.category,
                &snippet.language,
            ]
            .iter()
            .any(|field| contains_ignore_case(field, &needle));
            if !hit {
                return false;
            }
        }

        if let Some(category) = self.category() {
            if !contains_ignore_case(&snippet.category, &category.to_lowercase()) {
                return false;
            }
        }

        if let Some(language) = self.language() {
            if !contains_ignore_case(&snippet.language, &language.to_lowercase()) {
                return false;
            }
        }

        true
    }

    /// Selects the matching snippets, keeping their original order, then applies the cap.
    pub fn apply(&self, snippets: &[Snippet]) -> Vec<Snippet> {
        let matching = snippets.iter().filter(|s| self.matches(s)).cloned();
        match self.cap() {
            Some(cap) => matching.take(cap).collect(),
            None => matching.collect(),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn contains_ignore_case(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}
