//! Domain types: the snippet entity, its filter criteria, and the store contract.

pub mod error;
pub mod snippet;
pub mod store;

pub use error::SnippetError;
pub use snippet::{Snippet, SnippetCriteria, SnippetDraft, TagField};
pub use store::{SnippetStore, StoreError};
