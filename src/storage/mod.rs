//! Snippet sources: the Postgres store and the built-in fixture set.

pub mod fixtures;
pub mod postgres;

pub use fixtures::FixtureStore;
pub use postgres::PostgresSnippetStore;
