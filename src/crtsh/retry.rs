// src/crtsh/retry.rs
// =============================================================================
// This module wraps a Fetcher in a bounded retry loop.
//
// How it works:
// 1. Ask the fetcher for the domain
// 2. On success, run the extractor and return what it found
// 3. On failure, wait (exponential for 503s, fixed for anything else) and try
//    again, up to max_attempts times
// 4. If every attempt failed, log it and return an empty list
//
// A failed domain is never an error for the caller: it just contributes
// nothing to the final set.
// =============================================================================

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::extract::{extract_subdomains, TableLayout};
use super::{FetchOutcome, Fetcher};

// How long to wait between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of requests made for one domain (at least 1)
    pub max_attempts: u32,
    /// One "time unit" of backoff
    pub unit: Duration,
    /// Units to wait after a non-rate-limit failure
    pub fixed_delay_units: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            unit: Duration::from_secs(1),
            fixed_delay_units: 5,
        }
    }
}

// Which kind of failure we are backing off from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    RateLimited,
    Transient,
}

impl RetryPolicy {
    // Delay before the attempt after `attempt` (zero-indexed)
    //
    // Rate limits back off exponentially: 1, 2, 4, 8... units.
    // Everything else waits a fixed number of units.
    pub fn delay_for(&self, kind: FailureKind, attempt: u32) -> Duration {
        let units = match kind {
            FailureKind::RateLimited => 2u32.saturating_pow(attempt),
            FailureKind::Transient => self.fixed_delay_units,
        };
        self.unit.saturating_mul(units)
    }
}

// Something that can pause the current task
//
// Production code sleeps on the tokio timer; tests record the requested
// delays instead.
#[async_trait]
pub trait Backoff: Send + Sync {
    async fn wait(&self, delay: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioBackoff;

#[async_trait]
impl Backoff for TokioBackoff {
    async fn wait(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

// Everything one worker needs to look a domain up
//
// Shared read-only between workers behind an Arc.
pub struct DomainLookup {
    fetcher: Arc<dyn Fetcher>,
    backoff: Arc<dyn Backoff>,
    policy: RetryPolicy,
    layout: TableLayout,
}

impl DomainLookup {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        backoff: Arc<dyn Backoff>,
        policy: RetryPolicy,
        layout: TableLayout,
    ) -> Self {
        Self {
            fetcher,
            backoff,
            policy,
            layout,
        }
    }

    // Looks up one domain, retrying on failure
    //
    // Returns: the extracted subdomains, or an empty Vec if all attempts failed
    pub async fn subdomains_for(&self, domain: &str) -> Vec<String> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 0..max_attempts {
            let kind = match self.fetcher.fetch(domain).await {
                FetchOutcome::Success(body) => match extract_subdomains(&body, self.layout) {
                    Ok(subdomains) => {
                        tracing::debug!(%domain, attempt = attempt + 1, found = subdomains.len(), "lookup succeeded");
                        return subdomains;
                    }
                    Err(e) => {
                        last_error = e.to_string();
                        FailureKind::Transient
                    }
                },
                FetchOutcome::RateLimited => {
                    last_error = "rate limited (HTTP 503)".to_string();
                    FailureKind::RateLimited
                }
                FetchOutcome::Transient(reason) => {
                    last_error = reason;
                    FailureKind::Transient
                }
                FetchOutcome::Fatal(reason) => {
                    tracing::error!(%domain, error = %reason, "lookup cannot be performed, giving up");
                    return Vec::new();
                }
            };

            // No point waiting after the last attempt
            if attempt + 1 == max_attempts {
                break;
            }

            let delay = self.policy.delay_for(kind, attempt);
            tracing::warn!(
                %domain,
                attempt = attempt + 1,
                max_attempts,
                error = %last_error,
                delay_ms = delay.as_millis() as u64,
                "lookup failed, retrying"
            );
            self.backoff.wait(delay).await;
        }

        tracing::error!(
            %domain,
            attempts = max_attempts,
            error = %last_error,
            "giving up on domain"
        );
        Vec::new()
    }
}
