//! Aggregator configuration with sensible defaults.
//!
//! [`AggregatorConfig`] controls concurrency, the shared deadline, result
//! limits, and the merge strategy. Defaults mirror a polite multi-provider
//! setup: four workers, ten-second deadline, URL deduplication.

use std::time::Duration;

use crate::error::SearchError;
use crate::types::MergeStrategy;

/// Configuration for a search aggregator instance.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Per-provider result limit passed to each `search` call.
    pub max_results_per_provider: usize,
    /// Look-back window in days for providers that filter by date.
    pub time_window_days: u32,
    /// Shared deadline for the whole fan-out. Any provider not settled by
    /// this point is recorded as timed out.
    pub deadline: Duration,
    /// Upper bound on concurrently running provider calls. The effective
    /// worker budget is `min(max_concurrency, available providers)`;
    /// excess providers queue for a free worker.
    pub max_concurrency: usize,
    /// How providers' results are combined.
    pub merge_strategy: MergeStrategy,
    /// Cap on the merged result sequence, applied by every strategy.
    pub max_results: usize,
    /// Extra pool cut for [`MergeStrategy::ScoreBased`]: after sorting,
    /// keep at most this many entries before `max_results` applies.
    /// `None` disables the cut.
    pub score_pool_cap: Option<usize>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            max_results_per_provider: 5,
            time_window_days: 7,
            deadline: Duration::from_secs(10),
            max_concurrency: 4,
            merge_strategy: MergeStrategy::DedupeByUrl,
            max_results: 20,
            score_pool_cap: None,
        }
    }
}

impl AggregatorConfig {
    /// Validates this configuration, returning an error if any field is
    /// invalid.
    ///
    /// Checks:
    /// - `max_results` and `max_results_per_provider` must be greater than 0
    /// - `max_concurrency` must be greater than 0
    /// - `deadline` must be non-zero
    /// - `score_pool_cap`, when set, must be greater than 0
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_results == 0 {
            return Err(SearchError::Config(
                "max_results must be greater than 0".into(),
            ));
        }
        if self.max_results_per_provider == 0 {
            return Err(SearchError::Config(
                "max_results_per_provider must be greater than 0".into(),
            ));
        }
        if self.max_concurrency == 0 {
            return Err(SearchError::Config(
                "max_concurrency must be greater than 0".into(),
            ));
        }
        if self.deadline.is_zero() {
            return Err(SearchError::Config("deadline must be non-zero".into()));
        }
        if self.score_pool_cap == Some(0) {
            return Err(SearchError::Config(
                "score_pool_cap must be greater than 0 when set".into(),
            ));
        }
        Ok(())
    }
}
