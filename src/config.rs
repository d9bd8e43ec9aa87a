// src/config.rs
// =============================================================================
// The immutable settings for one scan.
//
// The CLI fills in what the user can change (domains, output path, worker
// count); everything else keeps crt.sh-friendly defaults. The whole value is
// handed to the pipeline once and never mutated afterwards.
// =============================================================================

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::crtsh::{RetryPolicy, TableLayout, DEFAULT_ENDPOINT, DEFAULT_USER_AGENT};

/// Concurrent lookups when the user doesn't say otherwise
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub domains: Vec<String>,
    pub output: PathBuf,
    pub concurrency: usize,
    pub timeout: Duration,
    pub user_agent: String,
    pub endpoint: String,
    pub retry: RetryPolicy,
    pub layout: TableLayout,
}

impl ScanConfig {
    pub fn new(domains: Vec<String>, output: PathBuf) -> Self {
        Self {
            domains,
            output,
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            retry: RetryPolicy::default(),
            layout: TableLayout::default(),
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        // A pool of zero workers would never finish
        self.concurrency = concurrency.max(1);
        self
    }
}

// Reads a domain list, one domain per line
//
// Blank lines and lines starting with '#' are ignored, whitespace is trimmed.
pub fn read_domains_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read domain list '{}'", path.display()))?;

    Ok(parse_domain_list(&content))
}

fn parse_domain_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

// Combines the file's domains (first) with the ones given on the command line
pub fn collect_domains(input: Option<&Path>, literal: &[String]) -> Result<Vec<String>> {
    let mut domains = match input {
        Some(path) => read_domains_file(path)?,
        None => Vec::new(),
    };

    domains.extend(
        literal
            .iter()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
    );

    Ok(domains)
}
