// src/crtsh/mod.rs
// =============================================================================
// Everything that talks to crt.sh for a single domain.
//
// Submodules:
// - fetch: one HTTP request, classified into a FetchOutcome
// - extract: pulls subdomains out of the returned HTML table
// - retry: bounded retry loop with backoff on top of the two above
// =============================================================================

mod extract;
mod fetch;
mod retry;

pub use extract::TableLayout;
pub use fetch::{FetchOutcome, Fetcher, HttpFetcher, DEFAULT_ENDPOINT, DEFAULT_USER_AGENT};
pub use retry::{Backoff, DomainLookup, RetryPolicy, TokioBackoff};
