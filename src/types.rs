//! Core types for queries, provider outcomes, and the aggregate response.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::SearchError;

/// A single search query, created once per call and never mutated.
///
/// The query is embedded in the [`AggregateResponse`] so callers can see
/// exactly what was asked of the providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    /// The query text forwarded to every provider.
    pub text: String,
    /// Per-provider result limit passed to each `search` call.
    pub max_results_per_provider: usize,
    /// Look-back window in days for providers that support date filtering.
    pub time_window_days: u32,
    /// Shared deadline for the whole fan-out. Tasks not settled by this
    /// point are recorded as timed out.
    pub deadline: Duration,
}

impl Query {
    /// Build a query with default limits (5 results per provider, 7-day
    /// window, 10-second deadline).
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            max_results_per_provider: 5,
            time_window_days: 7,
            deadline: Duration::from_secs(10),
        }
    }
}

/// A single search result as produced by a provider.
///
/// Providers are not required to normalise fields; URL/title normalisation
/// happens only inside the merge engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The title of the result page or article.
    pub title: String,
    /// A text snippet summarising the content.
    pub snippet: String,
    /// The URL of the result. May be empty for providers that return
    /// un-linked items; such entries are deduplicated by title instead.
    pub url: String,
    /// Domain the result came from (host with `www.` stripped).
    pub source_domain: String,
    /// Publication date as reported by the provider, if any.
    pub published_date: Option<String>,
}

/// How a single provider's dispatch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeStatus {
    /// The provider returned one or more results.
    Success,
    /// The provider completed without error but returned zero results.
    /// Distinct from [`OutcomeStatus::Failed`]: an empty answer is still
    /// an answer.
    EmptySuccess,
    /// The provider call returned an error. Isolated to this provider.
    Failed,
    /// The provider did not settle before the shared deadline.
    TimedOut,
}

impl OutcomeStatus {
    /// Whether this outcome contributes to the merged result set and to
    /// `providers_used`.
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Success | Self::EmptySuccess)
    }
}

/// Quality tier used by the score-based merge strategy.
///
/// High-tier providers sort ahead of standard-tier providers; the ordering
/// of the variants matters (`Standard < High`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ProviderQuality {
    /// Default tier.
    #[default]
    Standard,
    /// Providers whose results are preferred when ranking by score.
    High,
}

/// The settled outcome of one provider's dispatch.
///
/// Exactly one outcome exists per dispatched provider per query. Created by
/// the outcome collector, consumed by the merge engine, and surfaced to the
/// caller via [`AggregateResponse::outcomes`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderOutcome {
    /// Stable provider name.
    pub provider: String,
    /// How the dispatch ended.
    pub status: OutcomeStatus,
    /// Results in the provider's own order. Empty unless `status` is
    /// [`OutcomeStatus::Success`].
    pub results: Vec<SearchResult>,
    /// Error description for Failed/TimedOut outcomes.
    pub error_detail: Option<String>,
    /// Wall-clock time from task start to settlement.
    pub elapsed: Duration,
    /// Quality tier of the provider, carried for the merge engine.
    pub quality: ProviderQuality,
}

impl ProviderOutcome {
    /// Outcome for a provider that returned results.
    pub fn success(
        provider: impl Into<String>,
        results: Vec<SearchResult>,
        elapsed: Duration,
        quality: ProviderQuality,
    ) -> Self {
        let status = if results.is_empty() {
            OutcomeStatus::EmptySuccess
        } else {
            OutcomeStatus::Success
        };
        Self {
            provider: provider.into(),
            status,
            results,
            error_detail: None,
            elapsed,
            quality,
        }
    }

    /// Outcome for a provider whose call returned an error.
    pub fn failed(
        provider: impl Into<String>,
        error_detail: impl Into<String>,
        elapsed: Duration,
        quality: ProviderQuality,
    ) -> Self {
        Self {
            provider: provider.into(),
            status: OutcomeStatus::Failed,
            results: Vec::new(),
            error_detail: Some(error_detail.into()),
            elapsed,
            quality,
        }
    }

    /// Outcome for a provider that did not settle before the deadline.
    pub fn timed_out(provider: impl Into<String>, deadline: Duration, quality: ProviderQuality) -> Self {
        Self {
            provider: provider.into(),
            status: OutcomeStatus::TimedOut,
            results: Vec::new(),
            error_detail: Some(
                SearchError::Timeout(deadline.as_millis() as u64).to_string(),
            ),
            elapsed: deadline,
            quality,
        }
    }
}

/// Policy for combining multiple providers' results into one sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Keep the first sighting of each normalised URL, in provider
    /// completion order. Entries without a URL are keyed by normalised
    /// title. The default.
    #[default]
    DedupeByUrl,
    /// Sort by provider quality tier, then snippet length, ties in
    /// original order; optionally truncated to a configured pool size.
    ScoreBased,
    /// Raw concatenation in provider completion order.
    KeepAll,
}

impl MergeStrategy {
    /// Stable name used in configuration and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DedupeByUrl => "dedupe_by_url",
            Self::ScoreBased => "score_based",
            Self::KeepAll => "keep_all",
        }
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MergeStrategy {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dedupe_by_url" => Ok(Self::DedupeByUrl),
            "score_based" => Ok(Self::ScoreBased),
            "keep_all" => Ok(Self::KeepAll),
            other => Err(SearchError::Config(format!(
                "unknown merge strategy: {other}"
            ))),
        }
    }
}

/// The immutable final artifact of one aggregated query.
///
/// Constructed exactly once, after outcome collection closes. Degraded
/// operation is reported in-band: inspect [`AggregateResponse::success`],
/// [`AggregateResponse::providers_failed`], and the per-provider
/// `error_detail` fields rather than expecting an `Err`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateResponse {
    /// The query as dispatched.
    pub query: Query,
    /// Merged, deduplicated results per the configured strategy.
    pub merged_results: Vec<SearchResult>,
    /// Providers whose outcome was Success or EmptySuccess.
    pub providers_used: BTreeSet<String>,
    /// Providers whose outcome was Failed or TimedOut.
    pub providers_failed: BTreeSet<String>,
    /// One settled outcome per dispatched provider.
    pub outcomes: BTreeMap<String, ProviderOutcome>,
    /// True iff at least one provider outcome was usable.
    pub success: bool,
    /// Set when the whole call failed (no provider available, or every
    /// dispatched provider failed or timed out).
    pub error_message: Option<String>,
    /// Wall-clock time from dispatch start to merge completion.
    pub total_elapsed: Duration,
    /// Raw (pre-dedupe, pre-truncation) result count per usable provider.
    pub merge_stats: BTreeMap<String, usize>,
}

impl AggregateResponse {
    /// Response for a query that could not be dispatched at all.
    pub(crate) fn short_circuit(query: Query, error_message: String) -> Self {
        Self {
            query,
            merged_results: Vec::new(),
            providers_used: BTreeSet::new(),
            providers_failed: BTreeSet::new(),
            outcomes: BTreeMap::new(),
            success: false,
            error_message: Some(error_message),
            total_elapsed: Duration::ZERO,
            merge_stats: BTreeMap::new(),
        }
    }
}
