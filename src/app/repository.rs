//! The Snippet Repository.
//!
//! Single entry point the HTTP layer uses to read snippets. Every call goes to
//! the external store first; if the store cannot answer, the call is served from
//! the fixture set instead and the failure is only logged. Nothing about a
//! failure is remembered, so the next call tries the store again.

use std::sync::Arc;
use tracing::{instrument, warn};

use crate::domain::error::SnippetError;
use crate::domain::snippet::{distinct_sorted, Snippet, SnippetCriteria, TagField};
use crate::domain::store::{SnippetStore, StoreError};
use crate::infra::config::AppConfig;
use crate::storage::{FixtureStore, PostgresSnippetStore};

/// Where the repository's answers currently come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreStatus {
    Connected,
    Unavailable,
}

impl StoreStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreStatus::Connected => "connected",
            StoreStatus::Unavailable => "unavailable",
        }
    }
}

pub struct SnippetRepository {
    store: Arc<dyn SnippetStore>,
    fixtures: FixtureStore,
    fixture_fallback: bool,
}

impl SnippetRepository {
    pub fn new(store: Arc<dyn SnippetStore>, fixtures: FixtureStore) -> Self {
        Self {
            store,
            fixtures,
            fixture_fallback: true,
        }
    }

    /// Builds the production repository: Postgres store plus the built-in fixtures.
    pub fn from_config(config: &AppConfig) -> Self {
        let store = PostgresSnippetStore::from_config(config);
        Self::new(Arc::new(store), FixtureStore::builtin()).with_fixture_fallback(config.fixture_fallback)
    }

    pub fn with_fixture_fallback(mut self, enabled: bool) -> Self {
        self.fixture_fallback = enabled;
        self
    }

    pub fn fixture_fallback(&self) -> bool {
        self.fixture_fallback
    }

    #[instrument(skip(self))]
    pub async fn list_snippets(&self, criteria: &SnippetCriteria) -> Result<Vec<Snippet>, SnippetError> {
        match self.store.find_snippets(criteria).await {
            Ok(snippets) => Ok(snippets),
            Err(err) => Ok(self.fall_back("list_snippets", err)?.filter(criteria)),
        }
    }

    #[instrument(skip(self))]
    pub async fn get_snippet_by_id(&self, id: &str) -> Result<Snippet, SnippetError> {
        match self.store.find_snippet(id).await {
            Ok(Some(snippet)) => Ok(snippet),
            Ok(None) => Err(SnippetError::NotFound(id.to_string())),
            Err(StoreError::MalformedId(id)) => Err(SnippetError::MalformedIdentifier(id)),
            Err(err) => self
                .fall_back("get_snippet_by_id", err)?
                .find(id)
                .ok_or_else(|| SnippetError::NotFound(id.to_string())),
        }
    }

    pub async fn list_distinct_categories(&self) -> Result<Vec<String>, SnippetError> {
        self.distinct(TagField::Category).await
    }

    pub async fn list_distinct_languages(&self) -> Result<Vec<String>, SnippetError> {
        self.distinct(TagField::Language).await
    }

    /// Probes the store without touching any data.
    pub async fn store_status(&self) -> StoreStatus {
        match self.store.ping().await {
            Ok(()) => StoreStatus::Connected,
            Err(_) => StoreStatus::Unavailable,
        }
    }

    #[instrument(skip(self))]
    async fn distinct(&self, field: TagField) -> Result<Vec<String>, SnippetError> {
        match self.store.distinct_values(field).await {
            Ok(values) => Ok(distinct_sorted(values)),
            Err(err) => Ok(self.fall_back("distinct_values", err)?.distinct(field)),
        }
    }

    /// Absorbs a store failure: hands back the fixtures, or surfaces the failure
    /// when fallback is turned off.
    fn fall_back(&self, operation: &'static str, err: StoreError) -> Result<&FixtureStore, SnippetError> {
        if !self.fixture_fallback {
            return Err(SnippetError::StoreUnavailable(err));
        }
        warn!(
            operation,
            error = %err,
            "Snippet store not available, serving fixture data"
        );
        Ok(&self.fixtures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::snippet::SnippetDraft;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store that is never reachable and counts how often it was asked.
    #[derive(Default)]
    struct UnreachableStore {
        calls: AtomicUsize,
    }

    impl UnreachableStore {
        fn fail(&self) -> StoreError {
            self.calls.fetch_add(1, Ordering::SeqCst);
            StoreError::Database(sqlx::Error::PoolTimedOut)
        }
    }

    #[async_trait]
    impl SnippetStore for UnreachableStore {
        async fn find_snippets(&self, _: &SnippetCriteria) -> Result<Vec<Snippet>, StoreError> {
            Err(self.fail())
        }
        async fn find_snippet(&self, _: &str) -> Result<Option<Snippet>, StoreError> {
            Err(self.fail())
        }
        async fn distinct_values(&self, _: TagField) -> Result<Vec<String>, StoreError> {
            Err(self.fail())
        }
        async fn ping(&self) -> Result<(), StoreError> {
            Err(self.fail())
        }
    }

    /// Reachable store with UUID-shaped ids, mirroring the Postgres key rules.
    struct InMemoryStore {
        snippets: Vec<Snippet>,
    }

    #[async_trait]
    impl SnippetStore for InMemoryStore {
        async fn find_snippets(&self, criteria: &SnippetCriteria) -> Result<Vec<Snippet>, StoreError> {
            Ok(criteria.apply(&self.snippets))
        }
        async fn find_snippet(&self, id: &str) -> Result<Option<Snippet>, StoreError> {
            uuid::Uuid::parse_str(id).map_err(|_| StoreError::MalformedId(id.to_string()))?;
            Ok(self.snippets.iter().find(|s| s.id == id).cloned())
        }
        async fn distinct_values(&self, field: TagField) -> Result<Vec<String>, StoreError> {
            Ok(self.snippets.iter().map(|s| s.tag(field).to_string()).collect())
        }
        async fn ping(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    const STORED_ID: &str = "6f1c2b1e-4a8e-4d53-9a3c-2b7f0a1d9e11";
    const MISSING_ID: &str = "0b0e2f7e-95d1-4c7a-8f0a-5b2d1c3e4f50";

    fn stored_snippets() -> Vec<Snippet> {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        vec![
            SnippetDraft::new("Rust Result Chain", "rust", "errors", "x?")
                .into_snippet(STORED_ID, base + Duration::minutes(5)),
            SnippetDraft::new("Go Channels", "go", "concurrency", "ch <- v")
                .into_snippet("a3bb189e-8bf9-3888-9912-ace4e6543002", base),
            SnippetDraft::new("Rust Iterators", "rust", "iterators", "iter().map()")
                .into_snippet("c2d8a1f0-1234-4bcd-8ef0-0123456789ab", base),
        ]
    }

    fn offline_repository() -> (Arc<UnreachableStore>, SnippetRepository) {
        let store = Arc::new(UnreachableStore::default());
        let repo = SnippetRepository::new(store.clone(), FixtureStore::builtin());
        (store, repo)
    }

    fn online_repository() -> SnippetRepository {
        let store = InMemoryStore {
            snippets: stored_snippets(),
        };
        SnippetRepository::new(Arc::new(store), FixtureStore::builtin())
    }

    #[tokio::test]
    async fn list_falls_back_to_filtered_fixtures_when_store_is_down() {
        let (_, repo) = offline_repository();

        let snippets = repo
            .list_snippets(&SnippetCriteria::new().with_category("react"))
            .await
            .expect("fixture fallback");

        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].id, "1");
        assert_eq!(snippets[0].title, "React useState Hook Example");
    }

    #[tokio::test]
    async fn every_call_retries_the_store() {
        let (store, repo) = offline_repository();

        repo.list_snippets(&SnippetCriteria::new()).await.expect("first call");
        repo.list_snippets(&SnippetCriteria::new()).await.expect("second call");
        repo.list_distinct_languages().await.expect("third call");

        assert_eq!(store.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn fixture_lookup_by_id_needs_literal_match() {
        let (_, repo) = offline_repository();

        let found = repo.get_snippet_by_id("3").await.expect("fixture 3");
        assert_eq!(found.title, "CSS Flexbox Center");

        // Not a UUID, but the store was never reached, so this is a plain miss.
        let err = repo.get_snippet_by_id("not-an-id").await.unwrap_err();
        assert!(matches!(err, SnippetError::NotFound(_)));
    }

    #[tokio::test]
    async fn store_path_distinguishes_malformed_from_missing_ids() {
        let repo = online_repository();

        let err = repo.get_snippet_by_id("1").await.unwrap_err();
        assert!(matches!(err, SnippetError::MalformedIdentifier(ref id) if id == "1"));

        let err = repo.get_snippet_by_id(MISSING_ID).await.unwrap_err();
        assert!(matches!(err, SnippetError::NotFound(_)));

        let found = repo.get_snippet_by_id(STORED_ID).await.expect("stored snippet");
        assert_eq!(found.title, "Rust Result Chain");
    }

    #[tokio::test]
    async fn store_path_results_are_not_replaced_by_fixtures() {
        let repo = online_repository();

        let snippets = repo
            .list_snippets(&SnippetCriteria::new().with_category("react"))
            .await
            .expect("store results");
        assert!(snippets.is_empty());

        let rust = repo
            .list_snippets(&SnippetCriteria::new().with_language("RUST").with_limit(1))
            .await
            .expect("store results");
        assert_eq!(rust.len(), 1);
        assert_eq!(rust[0].id, STORED_ID);
    }

    #[tokio::test]
    async fn distinct_values_are_sorted_and_unique_on_both_paths() {
        let repo = online_repository();
        assert_eq!(
            repo.list_distinct_languages().await.expect("languages"),
            vec!["go", "rust"]
        );
        assert_eq!(
            repo.list_distinct_categories().await.expect("categories"),
            vec!["concurrency", "errors", "iterators"]
        );

        let (_, offline) = offline_repository();
        assert_eq!(
            offline.list_distinct_categories().await.expect("fixture categories"),
            vec!["automation", "css", "python", "react", "setup", "utils"]
        );
    }

    #[tokio::test]
    async fn disabled_fallback_surfaces_store_failures() {
        let (_, repo) = offline_repository();
        let repo = repo.with_fixture_fallback(false);

        let err = repo.list_snippets(&SnippetCriteria::new()).await.unwrap_err();
        assert!(matches!(err, SnippetError::StoreUnavailable(_)));

        let err = repo.get_snippet_by_id("1").await.unwrap_err();
        assert!(matches!(err, SnippetError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn store_status_reflects_reachability() {
        let (_, offline) = offline_repository();
        assert_eq!(offline.store_status().await, StoreStatus::Unavailable);
        assert_eq!(online_repository().store_status().await, StoreStatus::Connected);
    }
}
