//! Tavily news search provider.
//!
//! Wraps the Tavily `/search` endpoint in news mode with a day-based
//! look-back window. Basic search depth, no answer synthesis, no raw page
//! content.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::SearchError;
use crate::provider::SearchProvider;
use crate::types::{ProviderQuality, SearchResult};

use super::source_domain;

const ENDPOINT: &str = "https://api.tavily.com/search";

/// Tavily search API adapter.
///
/// Treated as a high-quality source by the score-based merge strategy.
#[derive(Debug)]
pub struct TavilyProvider {
    client: reqwest::Client,
    api_key: String,
}

impl TavilyProvider {
    /// Build a provider with an explicit API key.
    pub fn new(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
        }
    }

    /// Build a provider from the `TAVILY_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::NotConfigured`] when the variable is unset
    /// or blank.
    pub fn from_env(client: reqwest::Client) -> Result<Self, SearchError> {
        let api_key = std::env::var("TAVILY_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| SearchError::NotConfigured("missing TAVILY_API_KEY".into()))?;
        Ok(Self::new(client, api_key))
    }
}

#[async_trait]
impl SearchProvider for TavilyProvider {
    fn name(&self) -> &str {
        "tavily"
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
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
        let body = serde_json::json!({
            "query": query,
            "max_results": max_results,
            "topic": "news",
            "days": time_window_days,
            "search_depth": "basic",
            "include_answer": false,
            "include_raw_content": false,
        });

        tracing::trace!(query, max_results, "Tavily search");

        let response = self
            .client
            .post(ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("Tavily request failed: {e}")))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SearchError::Http(
                "Tavily rate limit exceeded (HTTP 429)".into(),
            ));
        }
        let response = response
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("Tavily HTTP error: {e}")))?;

        let parsed: TavilySearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(format!("Tavily response: {e}")))?;

        Ok(results_from(parsed, max_results))
    }
}

#[derive(Debug, Deserialize)]
struct TavilySearchResponse {
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    url: String,
    title: Option<String>,
    content: Option<String>,
    published_date: Option<String>,
}

/// Convert a parsed Tavily response into normalised results.
fn results_from(parsed: TavilySearchResponse, max_results: usize) -> Vec<SearchResult> {
    let out: Vec<SearchResult> = parsed
        .results
        .into_iter()
        .take(max_results)
        .map(|item| SearchResult {
            title: item.title.unwrap_or_default(),
            snippet: item.content.unwrap_or_default().trim().to_string(),
            source_domain: source_domain(&item.url),
            url: item.url,
            published_date: item.published_date,
        })
        .collect();
    tracing::debug!(count = out.len(), "Tavily results parsed");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::EnvGuard;

    const MOCK_TAVILY_JSON: &str = r#"
    {
      "results": [
        {
          "url": "https://www.reuters.com/markets/story",
          "title": "Markets Story",
          "content": " Market summary. ",
          "published_date": "2026-08-05"
        },
        {
          "url": "https://bloomberg.com/news/item",
          "title": null,
          "content": null
        }
      ]
    }
    "#;

    #[test]
    fn parses_minimal_shape() {
        let parsed: TavilySearchResponse =
            serde_json::from_str(MOCK_TAVILY_JSON).expect("parse");
        let results = results_from(parsed, 10);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Markets Story");
        assert_eq!(results[0].snippet, "Market summary.");
        assert_eq!(results[0].source_domain, "reuters.com");
        assert_eq!(results[0].published_date.as_deref(), Some("2026-08-05"));
        assert_eq!(results[1].title, "");
        assert_eq!(results[1].source_domain, "bloomberg.com");
    }

    #[test]
    fn respects_max_results() {
        let parsed: TavilySearchResponse =
            serde_json::from_str(MOCK_TAVILY_JSON).expect("parse");
        assert_eq!(results_from(parsed, 1).len(), 1);
    }

    // One test covers every from_env case: parallel test threads mutating
    // the same variable would race if these were split up.
    #[test]
    fn from_env_behaviour() {
        let client = reqwest::Client::new();

        {
            let _g = EnvGuard::unset("TAVILY_API_KEY");
            let err = TavilyProvider::from_env(client.clone()).unwrap_err();
            assert!(err.to_string().contains("TAVILY_API_KEY"));
        }

        {
            let _g = EnvGuard::set("TAVILY_API_KEY", "   ");
            assert!(TavilyProvider::from_env(client.clone()).is_err());
        }

        {
            let _g = EnvGuard::set("TAVILY_API_KEY", "tvly-test");
            let provider = TavilyProvider::from_env(client).expect("configured");
            assert!(provider.is_available());
            assert_eq!(provider.name(), "tavily");
            assert_eq!(provider.quality(), ProviderQuality::High);
        }
    }
}
