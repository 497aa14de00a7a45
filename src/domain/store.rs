//! Contract for the external snippet store.

use async_trait::async_trait;
use thiserror::Error;

use super::snippet::{Snippet, SnippetCriteria, TagField, ValidationError};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no database configured (DATABASE_URL is unset)")]
    NotConfigured,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The id is not syntactically valid for the store's key format.
    #[error("'{0}' is not a valid snippet id")]
    MalformedId(String),

    #[error("invalid snippet: {0}")]
    Invalid(#[from] ValidationError),
}

/// Operations the repository needs from an external store.
///
/// Implementations push filtering into the store itself and return snippets
/// newest first.
#[async_trait]
pub trait SnippetStore: Send + Sync {
    async fn find_snippets(&self, criteria: &SnippetCriteria) -> Result<Vec<Snippet>, StoreError>;

    /// Looks a snippet up by id. A well-formed id with no record yields `Ok(None)`.
    async fn find_snippet(&self, id: &str) -> Result<Option<Snippet>, StoreError>;

    /// Distinct values of a tag field, in no particular order.
    async fn distinct_values(&self, field: TagField) -> Result<Vec<String>, StoreError>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
