//! Trait definition for pluggable search provider backends.
//!
//! Each provider (Exa, Tavily, Massive) implements [`SearchProvider`] to
//! give the orchestrator a uniform interface. The trait is object-safe so
//! the aggregator can hold a heterogeneous `Vec<Arc<dyn SearchProvider>>`
//! injected at construction.

use async_trait::async_trait;

use crate::error::SearchError;
use crate::types::{ProviderQuality, SearchResult};

/// A pluggable search provider backend.
///
/// Implementors wrap one vendor's REST API and own their JSON shaping,
/// authentication, and rate-limit detection. Each provider must convert
/// any internal failure into an `Err(SearchError)` return; nothing may
/// panic across this boundary, so one misbehaving provider can never
/// corrupt sibling state.
///
/// All implementations must be `Send + Sync` for concurrent dispatch.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Stable provider name used in outcomes, stats, and logs.
    fn name(&self) -> &str;

    /// Cheap, non-blocking availability check (credentials configured,
    /// endpoint known). Checked by the dispatcher before fan-out;
    /// unavailable providers are skipped, not failed.
    fn is_available(&self) -> bool {
        true
    }

    /// Quality tier used by the score-based merge strategy.
    fn quality(&self) -> ProviderQuality {
        ProviderQuality::Standard
    }

    /// Perform a search and return parsed results.
    ///
    /// # Arguments
    ///
    /// * `query` - The query text (the implementation handles encoding).
    /// * `max_results` - Upper bound on returned results.
    /// * `time_window_days` - Look-back window for date-filtering providers;
    ///   implementations without date support may ignore it.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the HTTP request fails, the provider is
    /// rate-limiting, or the response cannot be parsed. An empty `Ok` vec
    /// is a valid answer and is not an error.
    async fn search(
        &self,
        query: &str,
        max_results: usize,
        time_window_days: u32,
    ) -> Result<Vec<SearchResult>, SearchError>;
}
