pub mod app;
pub mod client;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::repository::{SnippetRepository, StoreStatus};
pub use client::{SnippetClient, SnippetQuery};
pub use domain::{Snippet, SnippetCriteria, SnippetDraft, SnippetError, SnippetStore, StoreError, TagField};
pub use infra::config::AppConfig;
pub use storage::{FixtureStore, PostgresSnippetStore};
