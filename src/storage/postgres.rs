//! Snippet store backed by PostgreSQL.
//!
//! The connection pool is opened on first use and then reused for the rest of
//! the process. A failed open is not remembered: the next call tries again.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::domain::snippet::{Snippet, SnippetCriteria, SnippetDraft, TagField};
use crate::domain::store::{SnippetStore, StoreError};
use crate::infra::config::AppConfig;

const SELECT_SNIPPETS: &str = "SELECT id, title, language, category, code, github_link, \
     markdown_content, created_at, updated_at FROM snippets";

/// Columns the free-text query is matched against.
const QUERY_COLUMNS: [&str; 4] = ["title", "code", "category", "language"];

#[derive(sqlx::FromRow)]
struct SnippetRow {
    id: Uuid,
    title: String,
    language: String,
    category: String,
    code: String,
    github_link: Option<String>,
    markdown_content: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SnippetRow> for Snippet {
    fn from(row: SnippetRow) -> Self {
        Snippet {
            id: row.id.to_string(),
            title: row.title,
            language: row.language,
            category: row.category,
            code: row.code,
            github_link: row.github_link,
            markdown_content: row.markdown_content,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct PostgresSnippetStore {
    database_url: Option<String>,
    max_connections: u32,
    acquire_timeout: Duration,
    pool: OnceCell<PgPool>,
}

impl PostgresSnippetStore {
    pub fn new(database_url: Option<String>, max_connections: u32, acquire_timeout: Duration) -> Self {
        Self {
            database_url,
            max_connections,
            acquire_timeout,
            pool: OnceCell::new(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.database_url.clone(),
            config.store_max_connections,
            config.store_connect_timeout,
        )
    }

    pub fn is_configured(&self) -> bool {
        self.database_url.is_some()
    }

    /// Returns the shared pool, opening it if this is the first successful call.
    async fn pool(&self) -> Result<&PgPool, StoreError> {
        let url = self.database_url.as_deref().ok_or(StoreError::NotConfigured)?;
        self.pool
            .get_or_try_init(|| async {
                debug!("Opening Postgres pool (max_connections={})", self.max_connections);
                let pool = PgPoolOptions::new()
                    .max_connections(self.max_connections)
                    .acquire_timeout(self.acquire_timeout)
                    .connect(url)
                    .await?;
                info!("Connected to snippet store");
                Ok::<PgPool, StoreError>(pool)
            })
            .await
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        let pool = self.pool().await?;
        sqlx::migrate!("./migrations").run(pool).await?;
        Ok(())
    }

    pub async fn server_version(&self) -> Result<String, StoreError> {
        let pool = self.pool().await?;
        let version: String = sqlx::query_scalar("SELECT version()")
            .fetch_one(pool)
            .await?;
        Ok(version)
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        let pool = self.pool().await?;
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM snippets")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Validates and stores a draft; the database assigns id and timestamps.
    pub async fn insert(&self, draft: SnippetDraft) -> Result<Snippet, StoreError> {
        let draft = draft.validate()?;
        let pool = self.pool().await?;

        let row = sqlx::query_as::<_, SnippetRow>(
            "INSERT INTO snippets (title, language, category, code, github_link, markdown_content)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id, title, language, category, code, github_link, markdown_content, created_at, updated_at",
        )
        .bind(&draft.title)
        .bind(&draft.language)
        .bind(&draft.category)
        .bind(&draft.code)
        .bind(&draft.github_link)
        .bind(&draft.markdown_content)
        .fetch_one(pool)
        .await?;

        Ok(row.into())
    }
}

/// Builds the list query: AND across supplied criteria, case-insensitive substring
/// predicates, newest first, optional LIMIT.
fn build_list_query(criteria: &SnippetCriteria) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::<Postgres>::new(SELECT_SNIPPETS);
    qb.push(" WHERE TRUE");

    if let Some(query) = criteria.query() {
        let needle = query.to_lowercase();
        qb.push(" AND (");
        for (idx, column) in QUERY_COLUMNS.iter().enumerate() {
            if idx > 0 {
                qb.push(" OR ");
            }
            push_contains(&mut qb, column, needle.clone());
        }
        qb.push(")");
    }

    if let Some(category) = criteria.category() {
        qb.push(" AND ");
        push_contains(&mut qb, "category", category.to_lowercase());
    }

    if let Some(language) = criteria.language() {
        qb.push(" AND ");
        push_contains(&mut qb, "language", language.to_lowercase());
    }

    qb.push(" ORDER BY created_at DESC");

    if let Some(cap) = criteria.cap() {
        qb.push(" LIMIT ");
        qb.push_bind(i64::try_from(cap).unwrap_or(i64::MAX));
    }

    qb
}

// `column` is always one of our own static column names, never user input.
fn push_contains(qb: &mut QueryBuilder<'static, Postgres>, column: &str, lowered_needle: String) {
    qb.push("strpos(lower(")
        .push(column)
        .push("), ")
        .push_bind(lowered_needle)
        .push(") > 0");
}

#[async_trait]
impl SnippetStore for PostgresSnippetStore {
    #[instrument(skip(self))]
    async fn find_snippets(&self, criteria: &SnippetCriteria) -> Result<Vec<Snippet>, StoreError> {
        let pool = self.pool().await?;
        let mut qb = build_list_query(criteria);
        let rows = qb.build_query_as::<SnippetRow>().fetch_all(pool).await?;
        debug!("Store returned {} snippets", rows.len());
        Ok(rows.into_iter().map(Snippet::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_snippet(&self, id: &str) -> Result<Option<Snippet>, StoreError> {
        // Reach the store before judging the id, so an unreachable store still
        // falls back to fixtures (whose ids are not UUIDs).
        let pool = self.pool().await?;
        let key = Uuid::parse_str(id).map_err(|_| StoreError::MalformedId(id.to_string()))?;

        let row = sqlx::query_as::<_, SnippetRow>(&format!("{} WHERE id = $1", SELECT_SNIPPETS))
            .bind(key)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(Snippet::from))
    }

    #[instrument(skip(self))]
    async fn distinct_values(&self, field: TagField) -> Result<Vec<String>, StoreError> {
        let pool = self.pool().await?;
        let sql = format!("SELECT DISTINCT {} FROM snippets", field.column_name());
        let values: Vec<String> = sqlx::query_scalar(&sql).fetch_all(pool).await?;
        Ok(values)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let pool = self.pool().await?;
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_without_criteria_orders_newest_first() {
        let qb = build_list_query(&SnippetCriteria::new());
        assert_eq!(
            qb.sql(),
            format!("{} WHERE TRUE ORDER BY created_at DESC", SELECT_SNIPPETS)
        );
    }

    #[test]
    fn list_query_ors_free_text_and_ands_tags() {
        let criteria = SnippetCriteria::new()
            .with_query("Hook")
            .with_category("react")
            .with_limit(5);
        let qb = build_list_query(&criteria);
        let sql = qb.sql();

        assert!(sql.contains(
            "(strpos(lower(title), $1) > 0 OR strpos(lower(code), $2) > 0 \
             OR strpos(lower(category), $3) > 0 OR strpos(lower(language), $4) > 0)"
        ));
        assert!(sql.contains(" AND strpos(lower(category), $5) > 0"));
        assert!(sql.ends_with("ORDER BY created_at DESC LIMIT $6"));
    }

    #[test]
    fn list_query_skips_limit_when_not_positive() {
        let qb = build_list_query(&SnippetCriteria::new().with_limit(0));
        assert!(!qb.sql().contains("LIMIT"));
    }

    #[tokio::test]
    async fn unconfigured_store_reports_not_configured() {
        let store = PostgresSnippetStore::new(None, 1, Duration::from_secs(1));

        assert!(!store.is_configured());
        assert!(matches!(store.ping().await, Err(StoreError::NotConfigured)));
        assert!(matches!(
            store.find_snippet("not-a-uuid").await,
            Err(StoreError::NotConfigured)
        ));
    }
}
