// src/crtsh/fetch.rs
// =============================================================================
// This module makes a single request to crt.sh and classifies the result.
//
// Key functionality:
// - Builds the `q=%.example.com` wildcard search URL
// - Sends one GET with our User-Agent and timeout
// - Turns whatever happened into a FetchOutcome (no retrying here, that is the
//   job of retry.rs)
//
// The Fetcher trait is the seam between the retry loop and the network: the
// real implementation talks HTTP, tests plug in a scripted one.
// =============================================================================

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Public crt.sh search page
pub const DEFAULT_ENDPOINT: &str = "https://crt.sh/";

/// Sent as the User-Agent on every query
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:60.0) Gecko/20100101 Firefox/60.0";

// Outcome of one request to the search service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// 2xx response, with the HTML body
    Success(String),
    /// HTTP 503: the service is shedding load
    RateLimited,
    /// Network error, timeout, or any other non-success status
    Transient(String),
    /// The request could not be built at all; retrying won't help
    Fatal(String),
}

// Anything that can run one lookup against the search service
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, domain: &str) -> FetchOutcome;
}

// The real crt.sh client
//
// Holds one reqwest Client so every worker shares its connection pool.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    endpoint: String,
}

impl HttpFetcher {
    // Creates a fetcher with the given endpoint, per-request timeout and
    // User-Agent
    pub fn new(endpoint: &str, timeout: Duration, user_agent: &str) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, domain: &str) -> FetchOutcome {
        let url = match query_url(&self.endpoint, domain) {
            Ok(url) => url,
            Err(e) => return FetchOutcome::Fatal(format!("invalid endpoint '{}': {}", self.endpoint, e)),
        };

        tracing::debug!(%domain, %url, "querying crt.sh");

        match self.client.get(url).send().await {
            Ok(response) => analyze_response(response).await,
            Err(e) => FetchOutcome::Transient(describe_error(&e)),
        }
    }
}

// Builds the search URL for a domain
//
// Example:
//   endpoint = "https://crt.sh/", domain = "example.com"
//   result   = "https://crt.sh/?q=%25.example.com"
pub fn query_url(endpoint: &str, domain: &str) -> Result<Url, url::ParseError> {
    let query = format!("%.{}", domain);
    Url::parse_with_params(endpoint, &[("q", query.as_str())])
}

// Maps an HTTP response to an outcome
async fn analyze_response(response: reqwest::Response) -> FetchOutcome {
    let status = response.status();

    if status == StatusCode::SERVICE_UNAVAILABLE {
        return FetchOutcome::RateLimited;
    }

    if !status.is_success() {
        return FetchOutcome::Transient(format!("HTTP {}", status.as_u16()));
    }

    match response.text().await {
        Ok(body) => FetchOutcome::Success(body),
        Err(e) => FetchOutcome::Transient(format!("failed to read body: {}", describe_error(&e))),
    }
}

// Gives a short, readable reason for a reqwest error
fn describe_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else if error.is_redirect() {
        "too many redirects".to_string()
    } else {
        error.to_string()
    }
}
