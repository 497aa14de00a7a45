//! Typed client for the snippet API.
//!
//! Every accessor degrades instead of failing: list calls return an empty
//! `Vec` and the single-snippet call returns `None` when the request, the
//! decoding, or the envelope itself reports a problem. Problems are logged.

use anyhow::{anyhow, Context, Result};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error};

use crate::domain::snippet::Snippet;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T> Envelope<T> {
    fn into_data(self) -> Result<T> {
        if !self.success {
            return Err(anyhow!(self
                .error
                .unwrap_or_else(|| "request was not successful".to_string())));
        }
        self.data.context("successful response without data")
    }
}

/// Options for [`SnippetClient::fetch_snippets`]. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub language: Option<String>,
    pub limit: Option<u32>,
}

impl SnippetQuery {
    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        for (key, value) in [
            ("search", &self.search),
            ("category", &self.category),
            ("language", &self.language),
        ] {
            if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
                pairs.push((key, v.to_string()));
            }
        }
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone)]
pub struct SnippetClient {
    http: reqwest::Client,
    base_url: Url,
}

impl SnippetClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .context("build HTTP client")?;
        Self::with_http_client(http, base_url)
    }

    pub fn with_http_client(http: reqwest::Client, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).with_context(|| format!("parse API base URL '{}'", base_url))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("API base URL '{}' cannot carry a path", base_url));
        }
        Ok(Self { http, base_url })
    }

    pub async fn fetch_snippets(&self, query: &SnippetQuery) -> Vec<Snippet> {
        match self.try_fetch_snippets(query).await {
            Ok(snippets) => snippets,
            Err(e) => {
                error!("Error fetching snippets: {:#}", e);
                Vec::new()
            }
        }
    }

    pub async fn fetch_snippet_by_id(&self, id: &str) -> Option<Snippet> {
        let url = match self.endpoint(&["api", "snippets", id]) {
            Ok(url) => url,
            Err(e) => {
                error!("Error fetching snippet: {:#}", e);
                return None;
            }
        };
        match self.get_envelope::<Snippet>(url).await {
            Ok(envelope) => match envelope.into_data() {
                Ok(snippet) => Some(snippet),
                Err(e) => {
                    debug!("Snippet {} not available: {}", id, e);
                    None
                }
            },
            Err(e) => {
                error!("Error fetching snippet: {:#}", e);
                None
            }
        }
    }

    pub async fn fetch_categories(&self) -> Vec<String> {
        match self.fetch_strings(&["api", "categories"]).await {
            Ok(categories) => categories,
            Err(e) => {
                error!("Error fetching categories: {:#}", e);
                Vec::new()
            }
        }
    }

    pub async fn fetch_languages(&self) -> Vec<String> {
        match self.fetch_strings(&["api", "languages"]).await {
            Ok(languages) => languages,
            Err(e) => {
                error!("Error fetching languages: {:#}", e);
                Vec::new()
            }
        }
    }

    async fn try_fetch_snippets(&self, query: &SnippetQuery) -> Result<Vec<Snippet>> {
        let mut url = self.endpoint(&["api", "snippets"])?;
        let pairs = query.pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        self.get_envelope(url).await?.into_data()
    }

    async fn fetch_strings(&self, segments: &[&str]) -> Result<Vec<String>> {
        let url = self.endpoint(segments)?;
        self.get_envelope(url).await?.into_data()
    }

    /// Sends a GET and decodes the envelope, whatever the status code.
    async fn get_envelope<T: DeserializeOwned>(&self, url: Url) -> Result<Envelope<T>> {
        debug!("GET {}", url);
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("send request to {}", url))?;
        let status = response.status();
        response
            .json::<Envelope<T>>()
            .await
            .with_context(|| format!("decode response from {} ({})", url, status))
    }

    /// Joins path segments onto the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("API base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_handles_trailing_slashes_and_encodes_ids() {
        let client = SnippetClient::new("http://localhost:3000/").expect("client");
        assert_eq!(
            client.endpoint(&["api", "snippets"]).expect("url").as_str(),
            "http://localhost:3000/api/snippets"
        );
        assert_eq!(
            client.endpoint(&["api", "snippets", "a b/c"]).expect("url").as_str(),
            "http://localhost:3000/api/snippets/a%20b%2Fc"
        );

        let prefixed = SnippetClient::new("http://example.com/catalog").expect("client");
        assert_eq!(
            prefixed.endpoint(&["api", "languages"]).expect("url").as_str(),
            "http://example.com/catalog/api/languages"
        );
    }

    #[test]
    fn query_only_sends_what_is_set() {
        assert!(SnippetQuery::default().pairs().is_empty());

        let query = SnippetQuery {
            search: Some("hook".into()),
            category: Some(String::new()),
            language: None,
            limit: Some(0),
        };
        assert_eq!(query.pairs(), vec![("search", "hook".to_string())]);

        let query = SnippetQuery {
            language: Some("python".into()),
            limit: Some(3),
            ..Default::default()
        };
        assert_eq!(
            query.pairs(),
            vec![("language", "python".to_string()), ("limit", "3".to_string())]
        );
    }

    #[test]
    fn envelope_failure_carries_server_message() {
        let envelope: Envelope<Vec<String>> =
            serde_json::from_str(r#"{"success":false,"error":"Failed to fetch categories"}"#)
                .expect("json");
        let err = envelope.into_data().unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch categories");
    }

    #[test]
    fn rejects_base_urls_without_a_path() {
        assert!(SnippetClient::new("mailto:someone@example.com").is_err());
        assert!(SnippetClient::new("not a url").is_err());
    }
}
