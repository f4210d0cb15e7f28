//! Error types for the fanout-search crate.
//!
//! Provider-level errors never cross the aggregate boundary as `Err`: the
//! orchestrator recovers them into per-provider outcomes. Callers see `Err`
//! only for invalid configuration or a blocking runtime that failed to
//! start. All errors use stable string messages; no API keys or other
//! sensitive data appear in error messages.

/// Errors that can occur during search aggregation.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// No provider in the injected set is currently available.
    #[error("no search providers available: {0}")]
    NoProvidersAvailable(String),

    /// Every dispatched provider ended Failed or TimedOut.
    #[error("all search providers failed: {0}")]
    AllProvidersFailed(String),

    /// A provider call did not settle before the shared deadline.
    #[error("provider timed out after {0} ms")]
    Timeout(u64),

    /// An HTTP request to a provider failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Failed to parse a provider response body.
    #[error("parse error: {0}")]
    Parse(String),

    /// A provider is missing credentials or endpoint configuration.
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// Invalid aggregator configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The blocking entry point could not start an async runtime.
    #[error("runtime error: {0}")]
    Runtime(String),
}

/// Convenience type alias for fanout-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
