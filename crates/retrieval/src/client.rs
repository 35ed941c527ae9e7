//! HTTP client for the knowledge-search backend.
//!
//! Issues one POST per query and shapes the response into a
//! [`SearchResult`]. Transport, status, and body faults are absorbed into an
//! empty result unless strict mode is enabled, so a failed search is
//! indistinguishable from "nothing found" downstream.

use crate::types::{SearchOptions, SearchResult};
use async_trait::async_trait;
use recall_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Request timeout for search calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for retrieval backends.
///
/// Abstracts the remote search service so the orchestrator can be exercised
/// against in-memory implementations.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Search for items relevant to `query`.
    async fn search(&self, query: &str, options: &SearchOptions) -> AppResult<SearchResult>;
}

/// Search request payload: the query merged with all provided options.
#[derive(Debug, Serialize)]
struct SearchRequestBody<'a> {
    query: &'a str,
    #[serde(flatten)]
    options: &'a SearchOptions,
}

/// Raw response body from the search backend.
///
/// Canonical backends expose `episodes` and `facts`; older ones expose a
/// generic `results` array instead.
#[derive(Debug, Deserialize)]
struct RawSearchResponse {
    episodes: Option<Vec<String>>,
    facts: Option<Vec<crate::types::Fact>>,
    results: Option<Vec<String>>,
}

impl RawSearchResponse {
    /// Shape the raw body into a well-formed result.
    ///
    /// When neither canonical field is present the primary result list (if
    /// any) is treated as the episode sequence.
    fn into_result(self) -> SearchResult {
        if self.episodes.is_none() && self.facts.is_none() {
            return SearchResult {
                episodes: self.results.unwrap_or_default(),
                facts: Vec::new(),
            };
        }

        SearchResult {
            episodes: self.episodes.unwrap_or_default(),
            facts: self.facts.unwrap_or_default(),
        }
    }
}

/// Client for the remote knowledge-search service.
///
/// Holds only immutable connection configuration, so one instance is safe
/// to share across concurrent pipeline invocations.
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    degrade_on_fault: bool,
}

impl SearchClient {
    /// Create a client for the given endpoint and optional credential.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Retrieval(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key,
            degrade_on_fault: true,
        })
    }

    /// Disable fault absorption: search faults propagate as errors instead
    /// of degrading to an empty result.
    pub fn strict(mut self) -> Self {
        self.degrade_on_fault = false;
        self
    }

    /// Get the configured endpoint.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch(&self, query: &str, options: &SearchOptions) -> AppResult<SearchResult> {
        let url = format!("{}/api/v1/search", self.base_url);
        let body = SearchRequestBody { query, options };

        let mut request = self.client.post(&url).json(&body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Retrieval(format!("Failed to reach search backend: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Retrieval(format!(
                "Search API error ({}): {}",
                status, error_text
            )));
        }

        let raw: RawSearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::Retrieval(format!("Failed to parse search response: {}", e)))?;

        Ok(raw.into_result())
    }
}

#[async_trait]
impl Retriever for SearchClient {
    async fn search(&self, query: &str, options: &SearchOptions) -> AppResult<SearchResult> {
        tracing::info!("Searching for: \"{}\"", query);

        match self.fetch(query, options).await {
            Ok(result) => {
                tracing::debug!(
                    "Retrieved {} episodes and {} facts",
                    result.episodes.len(),
                    result.facts.len()
                );
                Ok(result)
            }
            Err(e) if self.degrade_on_fault => {
                tracing::error!("Search API error: {}", e);
                Ok(SearchResult::default())
            }
            Err(e) => Err(e),
        }
    }
}
