//! # fanout-search
//!
//! Parallel multi-provider search aggregation.
//!
//! This crate queries several independent search/data providers behind one
//! call: it fans out to every available provider concurrently, isolates
//! per-provider failures, enforces one shared deadline, and merges the
//! heterogeneous result sets into a single deduplicated sequence with full
//! per-provider bookkeeping.
//!
//! ## Design
//!
//! - One task per provider under a bounded worker budget; excess providers
//!   queue rather than being dropped
//! - A provider that errors, panics, or hangs never affects its siblings;
//!   its outcome is recorded and the rest of the query proceeds
//! - Outcomes are collected in completion order, so merged output reflects
//!   race outcome, not dispatch order
//! - Three merge strategies: URL deduplication (default), quality-tier
//!   scoring, and raw concatenation
//! - Degraded operation is reported in-band on [`AggregateResponse`];
//!   entry points return `Err` only for invalid configuration
//!
//! ## Example
//!
//! ```no_run
//! # async fn example() -> fanout_search::Result<()> {
//! use fanout_search::{AggregatorConfig, SearchAggregator};
//!
//! let aggregator = SearchAggregator::from_env(AggregatorConfig::default())?;
//! let response = aggregator.search("quarterly earnings guidance").await;
//! for result in &response.merged_results {
//!     println!("{} [{}] {}", result.title, result.source_domain, result.url);
//! }
//! println!("used: {:?}, failed: {:?}", response.providers_used, response.providers_failed);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod keyring;
pub mod orchestrator;
pub mod provider;
pub mod providers;
pub mod types;

pub use config::AggregatorConfig;
pub use error::{Result, SearchError};
pub use keyring::KeyRing;
pub use provider::SearchProvider;
pub use types::{
    AggregateResponse, MergeStrategy, OutcomeStatus, ProviderOutcome, ProviderQuality, Query,
    SearchResult,
};

use std::sync::Arc;

/// Multi-provider search aggregator.
///
/// Holds a fixed provider list injected at construction together with the
/// aggregation configuration. The provider set cannot be mutated after
/// construction; changing it means building a new aggregator. Instances
/// are cheap to share (`Arc` the aggregator, not its internals) and safe
/// to use from overlapping queries: each call owns its own outcome map
/// and worker allocation.
pub struct SearchAggregator {
    providers: Vec<Arc<dyn SearchProvider>>,
    config: AggregatorConfig,
}

impl SearchAggregator {
    /// Build an aggregator over an explicit provider list.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the configuration is invalid.
    pub fn new(
        providers: Vec<Arc<dyn SearchProvider>>,
        config: AggregatorConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self { providers, config })
    }

    /// Build an aggregator with every provider that can be configured from
    /// the environment (Exa, Tavily, Massive).
    ///
    /// Providers with missing credentials are skipped, not failed; an
    /// aggregator with zero providers is still valid and short-circuits at
    /// query time.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] for an invalid configuration or
    /// [`SearchError::Http`] if the shared HTTP client cannot be built.
    pub fn from_env(config: AggregatorConfig) -> Result<Self> {
        config.validate()?;
        let client = http::build_client(config.deadline)?;

        let mut providers: Vec<Arc<dyn SearchProvider>> = Vec::new();
        match providers::ExaProvider::from_env(client.clone()) {
            Ok(p) => providers.push(Arc::new(p)),
            Err(e) => tracing::debug!(error = %e, "Exa not configured"),
        }
        match providers::TavilyProvider::from_env(client.clone()) {
            Ok(p) => providers.push(Arc::new(p)),
            Err(e) => tracing::debug!(error = %e, "Tavily not configured"),
        }
        match providers::MassiveProvider::from_env(client) {
            Ok(p) => providers.push(Arc::new(p)),
            Err(e) => tracing::debug!(error = %e, "Massive not configured"),
        }

        tracing::debug!(count = providers.len(), "aggregator built from environment");
        Ok(Self { providers, config })
    }

    /// Names of the injected providers, in injection order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// The aggregation configuration.
    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Run one aggregated search with limits taken from the configuration.
    ///
    /// Always returns a well-formed [`AggregateResponse`]; inspect
    /// [`AggregateResponse::success`] and the per-provider outcomes to
    /// detect degraded operation.
    pub async fn search(&self, text: &str) -> AggregateResponse {
        let query = Query {
            text: text.to_string(),
            max_results_per_provider: self.config.max_results_per_provider,
            time_window_days: self.config.time_window_days,
            deadline: self.config.deadline,
        };
        self.search_query(query).await
    }

    /// Run one aggregated search with explicit per-call limits.
    pub async fn search_query(&self, query: Query) -> AggregateResponse {
        orchestrator::search::orchestrate(&self.providers, query, &self.config).await
    }

    /// Run one aggregated search with a per-call merge strategy, overriding
    /// the configured default for this call only.
    pub async fn search_with_strategy(
        &self,
        text: &str,
        strategy: MergeStrategy,
    ) -> AggregateResponse {
        let mut config = self.config.clone();
        config.merge_strategy = strategy;
        let query = Query {
            text: text.to_string(),
            max_results_per_provider: config.max_results_per_provider,
            time_window_days: config.time_window_days,
            deadline: config.deadline,
        };
        orchestrator::search::orchestrate(&self.providers, query, &config).await
    }

    /// Blocking form of [`SearchAggregator::search`] for callers outside an
    /// async runtime. Spins up a throwaway current-thread runtime; the
    /// dispatch, timeout, and isolation behaviour is identical to the
    /// async form.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Runtime`] if the runtime cannot be started.
    /// Must not be called from within an async context.
    pub fn search_blocking(&self, text: &str) -> Result<AggregateResponse> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SearchError::Runtime(e.to_string()))?;
        Ok(runtime.block_on(self.search(text)))
    }
}
