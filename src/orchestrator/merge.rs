//! Merge engine: combine per-provider outcomes into one result sequence.
//!
//! Consumes the outcome list in provider-completion order and applies one
//! of three strategies. Merge statistics always record the raw per-provider
//! contribution before any strategy-specific filtering, so
//! `sum(stats.values())` equals the pre-dedupe total for every strategy.

use std::collections::{BTreeMap, HashSet};

use crate::types::{MergeStrategy, ProviderOutcome, ProviderQuality, SearchResult};

use super::url_normalize::dedupe_key;

/// Merge settled outcomes into one ordered result sequence.
///
/// `outcomes` must be in provider-completion order; the strategies that
/// preserve input order (`dedupe_by_url`, `keep_all`) therefore reflect
/// race outcome, not dispatch order. Only Success/EmptySuccess outcomes
/// contribute; Failed and TimedOut outcomes are skipped entirely.
///
/// `cap` bounds the returned sequence for every strategy. `score_pool_cap`
/// additionally cuts the sorted pool for [`MergeStrategy::ScoreBased`]
/// before `cap` applies; `None` disables the cut.
///
/// Returns the merged sequence and the per-provider raw-count statistics.
pub fn merge(
    outcomes: &[ProviderOutcome],
    strategy: MergeStrategy,
    cap: usize,
    score_pool_cap: Option<usize>,
) -> (Vec<SearchResult>, BTreeMap<String, usize>) {
    let mut stats = BTreeMap::new();
    let mut pool: Vec<(ProviderQuality, SearchResult)> = Vec::new();

    for outcome in outcomes {
        if !outcome.status.is_usable() {
            continue;
        }
        stats.insert(outcome.provider.clone(), outcome.results.len());
        pool.extend(
            outcome
                .results
                .iter()
                .map(|r| (outcome.quality, r.clone())),
        );
    }

    let raw_total = pool.len();
    let mut merged = match strategy {
        MergeStrategy::DedupeByUrl => dedupe_by_url(pool),
        MergeStrategy::ScoreBased => score_based(pool, score_pool_cap),
        MergeStrategy::KeepAll => pool.into_iter().map(|(_, r)| r).collect(),
    };
    merged.truncate(cap);

    tracing::debug!(
        strategy = %strategy,
        raw = raw_total,
        merged = merged.len(),
        "merge complete"
    );

    (merged, stats)
}

/// Keep the first sighting of each normalised URL (or title, for entries
/// without a URL). Single pass, stable, O(n) with a seen-key set.
fn dedupe_by_url(pool: Vec<(ProviderQuality, SearchResult)>) -> Vec<SearchResult> {
    let mut seen = HashSet::new();
    let mut deduped = Vec::new();
    for (_, result) in pool {
        if seen.insert(dedupe_key(&result)) {
            deduped.push(result);
        }
    }
    deduped
}

/// Sort by provider quality tier, then snippet length, both descending.
/// The sort is stable so ties keep their original (completion) order.
fn score_based(
    mut pool: Vec<(ProviderQuality, SearchResult)>,
    pool_cap: Option<usize>,
) -> Vec<SearchResult> {
    pool.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| b.1.snippet.len().cmp(&a.1.snippet.len()))
    });
    if let Some(cut) = pool_cap {
        pool.truncate(cut);
    }
    pool.into_iter().map(|(_, r)| r).collect()
}
