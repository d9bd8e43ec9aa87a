// src/scan/pool.rs
// =============================================================================
// Runs one lookup per domain, at most N at a time.
//
// How it works:
// - Each domain becomes its own tokio task, so lookups run in parallel on the
//   multi-threaded runtime
// - .buffer_unordered(N) only spawns a new task once one of the N running
//   ones has finished
// - Results come out in completion order, not input order
//
// A task that panics shows up here as a JoinError. We log it and treat that
// domain as having found nothing, so one bad domain can't take down the scan.
// =============================================================================

use futures::stream::{self, Stream, StreamExt};
use std::sync::Arc;

use super::TaskResult;
use crate::crtsh::DomainLookup;

// Starts the lookups and returns a stream of their results
//
// Parameters:
//   lookup: shared retry/fetch/extract machinery
//   domains: one task per entry (duplicates are simply looked up twice)
//   concurrency: maximum number of lookups in flight (0 is treated as 1)
pub fn run_lookups(
    lookup: Arc<DomainLookup>,
    domains: Vec<String>,
    concurrency: usize,
) -> impl Stream<Item = TaskResult> {
    stream::iter(domains)
        .map(move |domain| run_one(Arc::clone(&lookup), domain))
        .buffer_unordered(concurrency.max(1))
}

async fn run_one(lookup: Arc<DomainLookup>, domain: String) -> TaskResult {
    let task_domain = domain.clone();
    let handle = tokio::spawn(async move { lookup.subdomains_for(&task_domain).await });

    match handle.await {
        Ok(subdomains) => TaskResult { domain, subdomains },
        Err(e) => {
            tracing::error!(%domain, error = %e, "lookup task failed unexpectedly");
            TaskResult::empty(domain)
        }
    }
}
