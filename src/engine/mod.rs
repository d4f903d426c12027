//! Fetch engine
//!
//! This module drives the crawl against the network:
//! - A FIFO frontier keyed on canonical URLs, so each page is fetched once
//! - Bounded concurrent fetches on a `JoinSet`
//! - A minimum delay between request dispatches
//! - Retries for transient HTTP failures
//!
//! Fetching runs on spawned tasks. Parsing, sink writes and frontier
//! updates happen on the driver task as each fetch completes.

mod fetcher;
mod frontier;

pub use fetcher::{build_http_client, fetch_with_retry, FetchOutcome, RetryPolicy};
pub use frontier::Frontier;

use crate::config::{Config, CrawlConfig};
use crate::crawl::{initial_requests, Emission, FollowUp, Orchestrator, PageFetched};
use crate::output::{CrawlStats, RecordSink, StatsSnapshot};
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

/// Scheduling limits for one crawl run
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Maximum number of fetches in flight
    pub max_concurrent: usize,
    /// Minimum time between two dispatches
    pub min_delay: Duration,
    /// Stop dispatching after this many fetches
    pub max_pages: Option<u64>,
    pub retry: RetryPolicy,
}

impl EngineSettings {
    pub fn from_config(config: &CrawlConfig) -> Self {
        Self {
            max_concurrent: config.max_concurrent_pages_open.max(1) as usize,
            min_delay: Duration::from_millis(config.minimum_time_between_requests),
            max_pages: config.max_pages,
            retry: RetryPolicy::default(),
        }
    }
}

/// Main crawl engine
pub struct Engine {
    client: Client,
    settings: EngineSettings,
    frontier: Frontier,
    orchestrator: Orchestrator,
    stats: Arc<CrawlStats>,
}

impl Engine {
    /// Creates an engine with its frontier seeded
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client used for every fetch
    /// * `settings` - Concurrency, delay and retry limits
    /// * `orchestrator` - Parser dispatch for fetched pages
    /// * `seeds` - Initial requests, in fetch order
    /// * `stats` - Counters shared with the caller
    pub fn new(
        client: Client,
        settings: EngineSettings,
        orchestrator: Orchestrator,
        seeds: Vec<FollowUp>,
        stats: Arc<CrawlStats>,
    ) -> Self {
        let mut frontier = Frontier::new();
        for seed in seeds {
            frontier.push(seed);
        }

        Self {
            client,
            settings,
            frontier,
            orchestrator,
            stats,
        }
    }

    /// Runs until the frontier is empty and every fetch has completed
    ///
    /// Per-page failures are counted and logged. Only a sink error aborts
    /// the run.
    pub async fn run(mut self, sink: &mut dyn RecordSink) -> crate::Result<StatsSnapshot> {
        tracing::info!(
            "Starting crawl: {} seed requests, up to {} concurrent fetches",
            self.frontier.len(),
            self.settings.max_concurrent
        );

        let start_time = Instant::now();
        let mut in_flight = JoinSet::new();
        let mut dispatched: u64 = 0;
        let mut last_dispatch: Option<Instant> = None;
        let mut completed: u64 = 0;

        loop {
            while in_flight.len() < self.settings.max_concurrent && !self.page_limit_hit(dispatched)
            {
                let Some(request) = self.frontier.pop() else {
                    break;
                };

                if let Some(last) = last_dispatch {
                    let elapsed = last.elapsed();
                    if elapsed < self.settings.min_delay {
                        tokio::time::sleep(self.settings.min_delay - elapsed).await;
                    }
                }
                last_dispatch = Some(Instant::now());

                tracing::debug!("Fetching {} as {}", request.url, request.role);
                let client = self.client.clone();
                let retry = self.settings.retry.clone();
                in_flight.spawn(async move {
                    let outcome = fetch_with_retry(&client, request.url.as_str(), &retry).await;
                    (request, outcome)
                });
                dispatched += 1;
            }

            let Some(joined) = in_flight.join_next().await else {
                break;
            };

            match joined {
                Ok((request, outcome)) => self.handle_outcome(request, outcome, sink)?,
                Err(e) => {
                    tracing::error!("Fetch task failed: {}", e);
                    self.stats.record_failed();
                }
            }

            completed += 1;
            if completed % 10 == 0 {
                tracing::info!(
                    "Progress: {} pages done, {} queued, {} in flight, {:.2} pages/sec",
                    completed,
                    self.frontier.len(),
                    in_flight.len(),
                    completed as f64 / start_time.elapsed().as_secs_f64()
                );
            }
        }

        if self.page_limit_hit(dispatched) && !self.frontier.is_empty() {
            tracing::info!(
                "Page limit reached, {} requests left unfetched",
                self.frontier.len()
            );
        }

        sink.finish()?;
        self.stats
            .record_observer_failures(self.orchestrator.observer_failures());

        tracing::info!(
            "Crawl completed: {} pages in {:?}, {} distinct URLs seen",
            completed,
            start_time.elapsed(),
            self.frontier.seen_count()
        );

        Ok(self.stats.snapshot())
    }

    fn page_limit_hit(&self, dispatched: u64) -> bool {
        self.settings
            .max_pages
            .is_some_and(|max_pages| dispatched >= max_pages)
    }

    fn handle_outcome(
        &mut self,
        request: FollowUp,
        outcome: FetchOutcome,
        sink: &mut dyn RecordSink,
    ) -> crate::Result<()> {
        let body = match outcome {
            FetchOutcome::Success { final_url, body } => {
                if final_url != request.url.as_str() {
                    tracing::debug!("{} redirected to {}", request.url, final_url);
                }
                body
            }
            FetchOutcome::DeadLink { status_code } => {
                tracing::info!("Dead link ({}): {}", status_code, request.url);
                self.stats.record_failed();
                return Ok(());
            }
            FetchOutcome::RateLimited => {
                tracing::warn!("Rate limited on {}", request.url);
                self.stats.record_failed();
                return Ok(());
            }
            FetchOutcome::ContentMismatch { content_type } => {
                tracing::debug!("Skipping non-HTML {} ({})", request.url, content_type);
                self.stats.record_failed();
                return Ok(());
            }
            other => {
                tracing::warn!("Failed to fetch {}: {:?}", request.url, other);
                self.stats.record_failed();
                return Ok(());
            }
        };

        self.stats.record_fetched();

        let fetched = PageFetched {
            requested_url: request.url,
            role: request.role,
            content: body,
        };

        for emission in self.orchestrator.handle(&fetched) {
            match emission {
                Emission::Record(record) => {
                    self.stats.record_emitted(&record);
                    sink.write_record(&record)?;
                }
                Emission::FollowUp(follow_up) => {
                    self.stats.record_follow_up();
                    if !self.frontier.push(follow_up) {
                        self.stats.record_duplicate();
                    }
                }
            }
        }

        Ok(())
    }
}

/// Runs a configured crawl to completion
///
/// # Arguments
///
/// * `config` - Validated configuration
/// * `orchestrator` - Parser dispatch, with any observer already attached
/// * `sink` - Destination for emitted records
/// * `stats` - Counters shared with the observer
///
/// # Example
///
/// ```no_run
/// use bibliocrawl::config::load_config;
/// use bibliocrawl::engine::run_crawl;
/// use bibliocrawl::output::{open_sink, CrawlStats};
/// use bibliocrawl::Orchestrator;
/// use std::path::Path;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("bibliocrawl.toml"))?;
/// let orchestrator = Orchestrator::with_author_crawl(config.crawl.author_crawl);
/// let mut sink = open_sink(&config.output)?;
/// run_crawl(&config, orchestrator, sink.as_mut(), Arc::new(CrawlStats::new())).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: &Config,
    orchestrator: Orchestrator,
    sink: &mut dyn RecordSink,
    stats: Arc<CrawlStats>,
) -> crate::Result<StatsSnapshot> {
    let seeds = initial_requests(config)?;
    let client = build_http_client(&config.user_agent)?;
    let settings = EngineSettings::from_config(&config.crawl);

    Engine::new(client, settings, orchestrator, seeds, stats)
        .run(sink)
        .await
}
