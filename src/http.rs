//! Shared HTTP client for provider REST requests.
//!
//! Provides a configured [`reqwest::Client`] with a stable User-Agent,
//! response decompression, and a request timeout derived from the
//! aggregator deadline. One client is shared across all providers so
//! connection pools are reused.

use std::time::Duration;

use crate::error::SearchError;

/// User-Agent sent with every provider request.
const USER_AGENT: &str = concat!("fanout-search/", env!("CARGO_PKG_VERSION"));

/// Slack added on top of the aggregator deadline for the per-request HTTP
/// timeout. The shared deadline is the authoritative cut-off; the HTTP
/// timeout only reclaims sockets from detached stragglers.
const HTTP_TIMEOUT_SLACK: Duration = Duration::from_secs(5);

/// Build a [`reqwest::Client`] configured for provider API calls.
///
/// The client has:
/// - Timeout of `deadline` plus a fixed slack
/// - A stable crate User-Agent
/// - Brotli and gzip decompression
/// - A bounded redirect policy
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(deadline: Duration) -> Result<reqwest::Client, SearchError> {
    reqwest::Client::builder()
        .timeout(deadline + HTTP_TIMEOUT_SLACK)
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_client_succeeds() {
        let client = build_client(Duration::from_secs(10));
        assert!(client.is_ok());
    }

    #[test]
    fn user_agent_names_the_crate() {
        assert!(USER_AGENT.starts_with("fanout-search/"));
    }
}
