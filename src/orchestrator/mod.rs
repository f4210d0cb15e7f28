//! Search orchestrator: concurrent fan-out, outcome collection, merging.
//!
//! This module dispatches one query to every available provider
//! concurrently under a shared deadline, collects per-provider outcomes in
//! completion order with full failure isolation, merges the result sets per
//! the configured strategy, and assembles the immutable aggregate response.

pub mod merge;
pub mod search;
pub mod url_normalize;
