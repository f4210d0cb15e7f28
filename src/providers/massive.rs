//! Massive financial-news search provider.
//!
//! Wraps the Massive `/news/search` endpoint. Results are news articles
//! with a summary and source attribution; the look-back window maps to the
//! `published_after` filter.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::SearchError;
use crate::provider::SearchProvider;
use crate::types::SearchResult;

use super::{source_domain, window_start};

const ENDPOINT: &str = "https://api.massive.com/v1/news/search";

/// Massive news API adapter. Standard quality tier.
#[derive(Debug)]
pub struct MassiveProvider {
    client: reqwest::Client,
    api_key: String,
}

impl MassiveProvider {
    /// Build a provider with an explicit API key.
    pub fn new(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
        }
    }

    /// Build a provider from the `MASSIVE_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::NotConfigured`] when the variable is unset
    /// or blank.
    pub fn from_env(client: reqwest::Client) -> Result<Self, SearchError> {
        let api_key = std::env::var("MASSIVE_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| SearchError::NotConfigured("missing MASSIVE_API_KEY".into()))?;
        Ok(Self::new(client, api_key))
    }
}

#[async_trait]
impl SearchProvider for MassiveProvider {
    fn name(&self) -> &str {
        "massive"
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
        time_window_days: u32,
    ) -> Result<Vec<SearchResult>, SearchError> {
        tracing::trace!(query, max_results, "Massive search");

        let limit = max_results.to_string();
        let published_after = window_start(time_window_days);
        let response = self
            .client
            .get(ENDPOINT)
            .bearer_auth(&self.api_key)
            .query(&[
                ("q", query),
                ("limit", limit.as_str()),
                ("published_after", published_after.as_str()),
                ("sort", "published_at:desc"),
            ])
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("Massive request failed: {e}")))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SearchError::Http(
                "Massive rate limit exceeded (HTTP 429)".into(),
            ));
        }
        let response = response
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("Massive HTTP error: {e}")))?;

        let parsed: MassiveNewsResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(format!("Massive response: {e}")))?;

        Ok(results_from(parsed, max_results))
    }
}

#[derive(Debug, Deserialize)]
struct MassiveNewsResponse {
    articles: Option<Vec<MassiveArticle>>,
}

#[derive(Debug, Deserialize)]
struct MassiveArticle {
    url: String,
    title: Option<String>,
    summary: Option<String>,
    source: Option<MassiveSource>,
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MassiveSource {
    name: Option<String>,
}

/// Convert a parsed Massive response into normalised results.
///
/// The article's own source name wins over the URL host when present,
/// since Massive aggregates syndicated content.
fn results_from(parsed: MassiveNewsResponse, max_results: usize) -> Vec<SearchResult> {
    let mut out = Vec::new();
    for article in parsed.articles.unwrap_or_default().into_iter().take(max_results) {
        let domain = article
            .source
            .and_then(|s| s.name)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| source_domain(&article.url));
        out.push(SearchResult {
            title: article.title.unwrap_or_default(),
            snippet: article.summary.unwrap_or_default().trim().to_string(),
            source_domain: domain,
            url: article.url,
            published_date: article.published_at,
        });
    }
    tracing::debug!(count = out.len(), "Massive results parsed");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::EnvGuard;
    use crate::types::ProviderQuality;

    const MOCK_MASSIVE_JSON: &str = r#"
    {
      "articles": [
        {
          "url": "https://www.caixin.com/finance/article",
          "title": "Finance Article",
          "summary": "A summary. ",
          "source": { "name": "Caixin" },
          "published_at": "2026-08-06T09:00:00Z"
        },
        {
          "url": "https://yicai.com/news/item",
          "title": "Second",
          "summary": null,
          "source": null
        }
      ]
    }
    "#;

    #[test]
    fn parses_minimal_shape() {
        let parsed: MassiveNewsResponse =
            serde_json::from_str(MOCK_MASSIVE_JSON).expect("parse");
        let results = results_from(parsed, 10);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Finance Article");
        assert_eq!(results[0].snippet, "A summary.");
        assert_eq!(results[0].source_domain, "Caixin");
        assert_eq!(
            results[0].published_date.as_deref(),
            Some("2026-08-06T09:00:00Z")
        );
        // Missing source name falls back to the URL host.
        assert_eq!(results[1].source_domain, "yicai.com");
    }

    #[test]
    fn respects_max_results() {
        let parsed: MassiveNewsResponse =
            serde_json::from_str(MOCK_MASSIVE_JSON).expect("parse");
        assert_eq!(results_from(parsed, 1).len(), 1);
    }

    #[test]
    fn missing_articles_field_yields_empty() {
        let parsed: MassiveNewsResponse = serde_json::from_str("{}").expect("parse");
        assert!(results_from(parsed, 10).is_empty());
    }

    // One test covers every from_env case: parallel test threads mutating
    // the same variable would race if these were split up.
    #[test]
    fn from_env_behaviour() {
        let client = reqwest::Client::new();

        {
            let _g = EnvGuard::unset("MASSIVE_API_KEY");
            let err = MassiveProvider::from_env(client.clone()).unwrap_err();
            assert!(err.to_string().contains("MASSIVE_API_KEY"));
        }

        {
            let _g = EnvGuard::set("MASSIVE_API_KEY", "mk-test");
            let provider = MassiveProvider::from_env(client).expect("configured");
            assert!(provider.is_available());
            assert_eq!(provider.name(), "massive");
            // Default tier: not one of the preferred sources.
            assert_eq!(provider.quality(), ProviderQuality::Standard);
        }
    }
}
