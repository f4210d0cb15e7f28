//! Exa neural search provider.
//!
//! Wraps the Exa `/search` endpoint with page text requested inline so
//! snippets come back in one round trip. Supports several API keys handed
//! out round-robin; requests spread across them via [`KeyRing`].

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::SearchError;
use crate::keyring::KeyRing;
use crate::provider::SearchProvider;
use crate::types::{ProviderQuality, SearchResult};

use super::{source_domain, window_start};

const ENDPOINT: &str = "https://api.exa.ai/search";

/// Snippet budget per result; Exa page text is cut to this many characters.
const SNIPPET_MAX_CHARS: usize = 500;

/// Exa search API adapter.
///
/// Treated as a high-quality source by the score-based merge strategy.
#[derive(Debug)]
pub struct ExaProvider {
    client: reqwest::Client,
    keys: KeyRing,
}

impl ExaProvider {
    /// Build a provider from an explicit key ring.
    pub fn new(client: reqwest::Client, keys: KeyRing) -> Self {
        Self { client, keys }
    }

    /// Build a provider from the environment: `EXA_API_KEYS` (comma
    /// separated) or `EXA_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::NotConfigured`] when neither variable holds
    /// a usable key.
    pub fn from_env(client: reqwest::Client) -> Result<Self, SearchError> {
        let keys = match std::env::var("EXA_API_KEYS") {
            Ok(list) if !list.trim().is_empty() => KeyRing::from_list(&list),
            _ => KeyRing::new(vec![std::env::var("EXA_API_KEY").unwrap_or_default()]),
        };
        if keys.is_empty() {
            return Err(SearchError::NotConfigured(
                "missing EXA_API_KEYS (or EXA_API_KEY)".into(),
            ));
        }
        Ok(Self::new(client, keys))
    }
}

#[async_trait]
impl SearchProvider for ExaProvider {
    fn name(&self) -> &str {
        "exa"
    }

    fn is_available(&self) -> bool {
        !self.keys.is_empty()
    }

    fn quality(&self) -> ProviderQuality {
        ProviderQuality::High
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
        time_window_days: u32,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let key = self.keys.next_key().ok_or_else(|| {
            SearchError::NotConfigured("no Exa API key configured".into())
        })?;

        let body = serde_json::json!({
            "query": query,
            "numResults": max_results,
            "type": "neural",
            "useAutoprompt": true,
            "startPublishedDate": window_start(time_window_days),
            "contents": { "text": { "maxCharacters": SNIPPET_MAX_CHARS } },
        });

        tracing::trace!(query, max_results, "Exa search");

        let response = self
            .client
            .post(ENDPOINT)
            .bearer_auth(key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("Exa request failed: {e}")))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SearchError::Http("Exa rate limit exceeded (HTTP 429)".into()));
        }
        let response = response
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("Exa HTTP error: {e}")))?;

        let parsed: ExaSearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(format!("Exa response: {e}")))?;

        Ok(results_from(parsed, max_results))
    }
}

#[derive(Debug, Deserialize)]
struct ExaSearchResponse {
    results: Option<Vec<ExaResult>>,
}

#[derive(Debug, Deserialize)]
struct ExaResult {
    url: String,
    title: Option<String>,
    #[serde(rename = "publishedDate")]
    published_date: Option<String>,
    text: Option<String>,
}

/// Convert a parsed Exa response into normalised results.
fn results_from(parsed: ExaSearchResponse, max_results: usize) -> Vec<SearchResult> {
    let mut out = Vec::new();
    for item in parsed.results.unwrap_or_default().into_iter().take(max_results) {
        let snippet: String = item
            .text
            .as_deref()
            .unwrap_or_default()
            .trim()
            .chars()
            .take(SNIPPET_MAX_CHARS)
            .collect();
        out.push(SearchResult {
            title: item.title.unwrap_or_default(),
            snippet,
            source_domain: source_domain(&item.url),
            url: item.url,
            published_date: item.published_date,
        });
    }
    tracing::debug!(count = out.len(), "Exa results parsed");
    out
}
