// src/scan/mod.rs
// =============================================================================
// The whole scan: domains in, deduplicated subdomains out.
//
// Submodules:
// - pool: runs the per-domain lookups with a concurrency cap
// - aggregate: merges their results into one set
//
// Writing the set to disk is left to the caller (see output.rs), so a failed
// write never throws away what we found.
// =============================================================================

mod aggregate;
mod pool;

pub use aggregate::{aggregate, AggregateSet, TaskResult};
pub use pool::run_lookups;

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::config::ScanConfig;
use crate::crtsh::{Backoff, DomainLookup, Fetcher, HttpFetcher, TokioBackoff};

// Scans every configured domain against crt.sh
//
// Only fails if the HTTP client can't be built; per-domain failures are
// logged and simply contribute nothing.
pub async fn run(config: &ScanConfig) -> Result<AggregateSet> {
    let fetcher = HttpFetcher::new(&config.endpoint, config.timeout, &config.user_agent)
        .context("failed to create HTTP client")?;

    Ok(run_with(config, Arc::new(fetcher), Arc::new(TokioBackoff)).await)
}

// Same as run, with the network and the clock supplied by the caller
pub async fn run_with(
    config: &ScanConfig,
    fetcher: Arc<dyn Fetcher>,
    backoff: Arc<dyn Backoff>,
) -> AggregateSet {
    let lookup = Arc::new(DomainLookup::new(fetcher, backoff, config.retry, config.layout));

    tracing::info!(
        domains = config.domains.len(),
        concurrency = config.concurrency,
        "starting scan"
    );

    let results = run_lookups(lookup, config.domains.clone(), config.concurrency);
    aggregate(results).await
}
