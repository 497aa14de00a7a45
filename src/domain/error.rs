//! Errors surfaced by the snippet repository.

use thiserror::Error;

use super::store::StoreError;

#[derive(Error, Debug)]
pub enum SnippetError {
    /// The store could not be reached and fixture fallback is disabled.
    #[error("snippet store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),

    #[error("malformed snippet id: {0}")]
    MalformedIdentifier(String),

    #[error("snippet not found: {0}")]
    NotFound(String),

    #[error("unexpected failure: {0}")]
    UnexpectedFailure(#[from] anyhow::Error),
}
