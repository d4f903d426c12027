//! HTTP fetcher
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the crawler's user agent string
//! - GET requests to fetch page content
//! - Retry logic for transient failures
//! - Error classification

use crate::config::UserAgentConfig;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchOutcome {
    /// Successfully fetched an HTML page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// Page body content
        body: String,
    },

    /// HTTP 404 or 410
    DeadLink { status_code: u16 },

    /// HTTP 429
    RateLimited,

    /// HTTP 5xx that persisted through every retry
    ServerError { status_code: u16 },

    /// Any other non-success status
    HttpError { status_code: u16 },

    /// Connection refused, timeout after retries, body read failure
    Network { error: String },

    /// The response was not HTML
    ContentMismatch { content_type: String },
}

/// How transient failures are retried
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Fixed delay between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_secs(5),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use bibliocrawl::config::UserAgentConfig;
/// use bibliocrawl::engine::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "bibliocrawl".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL, retrying transient failures
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 404, 410 | Immediate → DeadLink |
/// | HTTP 429 | Immediate → RateLimited |
/// | HTTP 5xx | Retry, then → ServerError |
/// | Timeout | Retry, then → Network |
/// | Connection refused | Immediate → Network |
/// | Non-HTML body | Immediate → ContentMismatch |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `retry` - Retry count and delay for transient failures
pub async fn fetch_with_retry(client: &Client, url: &str, retry: &RetryPolicy) -> FetchOutcome {
    let mut attempt = 0;

    loop {
        let (outcome, transient) = fetch_once(client, url).await;

        if !transient || attempt >= retry.max_retries {
            return outcome;
        }

        attempt += 1;
        tracing::debug!(
            "Transient failure for {} ({:?}), retry {}/{} in {:?}",
            url,
            outcome,
            attempt,
            retry.max_retries,
            retry.delay
        );
        tokio::time::sleep(retry.delay).await;
    }
}

/// Performs one GET; the flag says whether the failure is worth retrying
async fn fetch_once(client: &Client, url: &str) -> (FetchOutcome, bool) {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) if e.is_timeout() => {
            return (
                FetchOutcome::Network {
                    error: "Request timeout".to_string(),
                },
                true,
            );
        }
        Err(e) if e.is_connect() => {
            return (
                FetchOutcome::Network {
                    error: format!("Connection failed: {}", e),
                },
                false,
            );
        }
        Err(e) => {
            return (
                FetchOutcome::Network {
                    error: e.to_string(),
                },
                false,
            );
        }
    };

    let status = response.status();
    let final_url = response.url().to_string();

    if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
        return (
            FetchOutcome::DeadLink {
                status_code: status.as_u16(),
            },
            false,
        );
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        return (FetchOutcome::RateLimited, false);
    }

    if status.is_server_error() {
        return (
            FetchOutcome::ServerError {
                status_code: status.as_u16(),
            },
            true,
        );
    }

    if !status.is_success() {
        return (
            FetchOutcome::HttpError {
                status_code: status.as_u16(),
            },
            false,
        );
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    // A missing header is treated as HTML
    if !content_type.is_empty() && !content_type.contains("html") {
        return (FetchOutcome::ContentMismatch { content_type }, false);
    }

    match response.text().await {
        Ok(body) => (FetchOutcome::Success { final_url, body }, false),
        Err(e) => (
            FetchOutcome::Network {
                error: e.to_string(),
            },
            e.is_timeout(),
        ),
    }
}
