//! Core dispatcher and outcome collector: fan out one query to every
//! available provider, gather settled outcomes in completion order under a
//! shared deadline, then merge and assemble the aggregate response.
//!
//! # Pipeline
//!
//! 1. Filter the injected provider list to available providers; an empty
//!    set short-circuits to a failed [`AggregateResponse`]
//! 2. Spawn one task per provider, bounded by a semaphore sized to
//!    `min(max_concurrency, providers)`; excess providers queue for a permit
//! 3. Each task converts its provider's return into a [`ProviderOutcome`]
//!    at the task boundary, so one misbehaving provider never aborts
//!    siblings
//! 4. Collect outcomes in completion order until the set drains or the
//!    deadline (plus a fixed grace) expires; stragglers become `TimedOut`
//!    and are detached, never awaited further
//! 5. Merge per the configured strategy and assemble the immutable response

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::{timeout_at, Instant as TokioInstant};

use crate::config::AggregatorConfig;
use crate::error::SearchError;
use crate::provider::SearchProvider;
use crate::types::{
    AggregateResponse, ProviderOutcome, ProviderQuality, Query, SearchResult,
};

use super::merge::merge;

/// Scheduling slack allowed past the deadline before the collector stops
/// waiting and marks the remaining tasks timed out. This is the epsilon in
/// the `total_elapsed <= deadline + epsilon` bound.
pub(crate) const COLLECTION_GRACE: Duration = Duration::from_millis(250);

/// Dispatch `query` to every available provider and aggregate the settled
/// outcomes into one response.
///
/// Never returns an error: degraded operation (provider failures, timeouts,
/// an empty provider set) is reported in-band on the response.
pub async fn orchestrate(
    providers: &[Arc<dyn SearchProvider>],
    query: Query,
    config: &AggregatorConfig,
) -> AggregateResponse {
    let started = Instant::now();

    let available: Vec<Arc<dyn SearchProvider>> = providers
        .iter()
        .filter(|p| p.is_available())
        .cloned()
        .collect();

    if available.is_empty() {
        let detail = if providers.is_empty() {
            "no providers configured"
        } else {
            "every configured provider is unavailable"
        };
        tracing::warn!(query = %query.text, detail, "short-circuiting dispatch");
        return AggregateResponse::short_circuit(
            query,
            SearchError::NoProvidersAvailable(detail.into()).to_string(),
        );
    }

    let worker_budget = config.max_concurrency.min(available.len());
    let deadline = TokioInstant::now() + query.deadline;
    let semaphore = Arc::new(Semaphore::new(worker_budget));

    tracing::debug!(
        query = %query.text,
        providers = available.len(),
        worker_budget,
        deadline_ms = query.deadline.as_millis() as u64,
        "dispatching fan-out"
    );

    let mut tasks: JoinSet<ProviderOutcome> = JoinSet::new();
    // Providers still awaiting an outcome, so deadline expiry and panicked
    // tasks can be attributed by name after collection closes.
    let mut pending: HashMap<String, ProviderQuality> = HashMap::new();

    for provider in available {
        let name = provider.name().to_string();
        let quality = provider.quality();
        pending.insert(name.clone(), quality);

        let sem = Arc::clone(&semaphore);
        let text = query.text.clone();
        let max_results = query.max_results_per_provider;
        let window = query.time_window_days;
        let query_deadline = query.deadline;

        tasks.spawn(async move {
            let task_started = Instant::now();
            let call = async {
                // The semaphore is never closed; holding the acquire result
                // keeps the permit for the duration of the provider call.
                // Waiting for a permit counts against the shared deadline.
                let _permit = sem.acquire().await;
                provider.search(&text, max_results, window).await
            };
            match timeout_at(deadline, call).await {
                Ok(Ok(results)) => {
                    tracing::debug!(
                        provider = %name,
                        count = results.len(),
                        elapsed_ms = task_started.elapsed().as_millis() as u64,
                        "provider settled"
                    );
                    ProviderOutcome::success(name, results, task_started.elapsed(), quality)
                }
                Ok(Err(err)) => {
                    tracing::warn!(provider = %name, error = %err, "provider failed");
                    ProviderOutcome::failed(name, err.to_string(), task_started.elapsed(), quality)
                }
                Err(_) => {
                    tracing::warn!(provider = %name, "provider missed the deadline");
                    ProviderOutcome::timed_out(name, query_deadline, quality)
                }
            }
        });
    }

    // Collect in completion order, not submission order.
    let cutoff = deadline + COLLECTION_GRACE;
    let mut outcomes: Vec<ProviderOutcome> = Vec::new();
    let mut deadline_hit = false;
    loop {
        match timeout_at(cutoff, tasks.join_next()).await {
            Ok(Some(Ok(outcome))) => {
                pending.remove(&outcome.provider);
                outcomes.push(outcome);
            }
            Ok(Some(Err(join_err))) => {
                // A panicked provider task; attributed by name below once
                // the set drains.
                tracing::warn!(error = %join_err, "provider task aborted");
            }
            Ok(None) => break,
            Err(_) => {
                deadline_hit = true;
                // Detach, do not abort: a provider may be mid-network-call
                // with no safe preemption point. Late results are dropped
                // with the detached handles.
                tasks.detach_all();
                break;
            }
        }
    }

    for (name, quality) in pending.drain() {
        let outcome = if deadline_hit {
            ProviderOutcome::timed_out(name, query.deadline, quality)
        } else {
            ProviderOutcome::failed(
                name,
                "provider task panicked",
                started.elapsed(),
                quality,
            )
        };
        outcomes.push(outcome);
    }

    let (merged, merge_stats) = merge(
        &outcomes,
        config.merge_strategy,
        config.max_results,
        config.score_pool_cap,
    );

    let response = assemble(query, outcomes, merged, merge_stats, started.elapsed());
    tracing::debug!(
        merged = response.merged_results.len(),
        used = response.providers_used.len(),
        failed = response.providers_failed.len(),
        total_ms = response.total_elapsed.as_millis() as u64,
        "aggregation complete"
    );
    response
}

/// Assemble the immutable aggregate response from settled outcomes.
///
/// Pure data transformation: performs no I/O and cannot fail.
pub(crate) fn assemble(
    query: Query,
    outcomes: Vec<ProviderOutcome>,
    merged_results: Vec<SearchResult>,
    merge_stats: BTreeMap<String, usize>,
    total_elapsed: Duration,
) -> AggregateResponse {
    let mut providers_used = BTreeSet::new();
    let mut providers_failed = BTreeSet::new();
    let mut by_provider = BTreeMap::new();

    for outcome in outcomes {
        if outcome.status.is_usable() {
            providers_used.insert(outcome.provider.clone());
        } else {
            providers_failed.insert(outcome.provider.clone());
        }
        by_provider.insert(outcome.provider.clone(), outcome);
    }

    let success = !providers_used.is_empty();
    let error_message = if success {
        None
    } else {
        let details: Vec<String> = by_provider
            .values()
            .map(|o| {
                format!(
                    "{}: {}",
                    o.provider,
                    o.error_detail.as_deref().unwrap_or("unknown error")
                )
            })
            .collect();
        Some(SearchError::AllProvidersFailed(details.join("; ")).to_string())
    };

    AggregateResponse {
        query,
        merged_results,
        providers_used,
        providers_failed,
        outcomes: by_provider,
        success,
        error_message,
        total_elapsed,
        merge_stats,
    }
}
