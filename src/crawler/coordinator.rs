//! Crawler coordinator - crawl lifecycle orchestration
//!
//! The coordinator owns one crawl run from start to finish:
//! - Seeding: validate settings, build the seed locator and the frontier
//! - Running: start the worker pool and wait for the termination predicate
//! - Terminated: stop the workers, join them, and assemble the report

use crate::config::{validate_crawler_config, Config, CrawlerConfig};
use crate::crawler::extractor::{AnchorExtractor, LinkExtractor};
use crate::crawler::fetcher::{HttpFetcher, PageFetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::worker::{Worker, WorkerStats};
use crate::locator::Locator;
use crate::output::{CrawlReport, CrawlStatistics};
use crate::{ConfigResult, CrawlError};
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Lifecycle phase of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    /// Settings validated, frontier being seeded
    Seeding,
    /// Workers are running
    Running,
    /// Workers stopped and results collected
    Terminated,
}

/// Why the running phase ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    Quiescent,
    Shutdown,
    WorkerExited,
}

/// Main crawl coordinator
pub struct Coordinator {
    seed: Locator,
    depth_budget: u32,
    workers: usize,
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<dyn LinkExtractor>,
    phase: CrawlPhase,
}

impl Coordinator {
    /// Creates a coordinator with the given collaborators
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the seed URL is not a valid `http://` URL,
    /// the depth budget is outside `1..=MAX_DEPTH`, or the worker count is
    /// outside `1..=MAX_WORKERS`. No crawling happens in that case.
    pub fn new(
        config: &CrawlerConfig,
        fetcher: Arc<dyn PageFetcher>,
        extractor: Arc<dyn LinkExtractor>,
    ) -> ConfigResult<Self> {
        let seed = validate_crawler_config(config)?;

        Ok(Self {
            seed,
            depth_budget: config.depth_budget,
            workers: config.workers,
            fetcher,
            extractor,
            phase: CrawlPhase::Seeding,
        })
    }

    /// Creates a coordinator that fetches over HTTP and extracts `<a href>` links
    pub fn with_http(config: &Config) -> crate::Result<Self> {
        let fetcher = HttpFetcher::new(&config.fetch)?;
        Ok(Self::new(
            &config.crawler,
            Arc::new(fetcher),
            Arc::new(AnchorExtractor),
        )?)
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// The depth-0 locator the crawl starts from
    pub fn seed(&self) -> &Locator {
        &self.seed
    }

    /// Runs the crawl to completion
    pub async fn run(&mut self) -> crate::Result<CrawlReport> {
        self.run_until(std::future::pending()).await
    }

    /// Runs the crawl until it completes or `shutdown` resolves
    ///
    /// On shutdown the frontier is closed; workers finish the page they are on
    /// and stop. Whatever was still pending is counted as unvisited in the
    /// report.
    pub async fn run_until<S>(&mut self, shutdown: S) -> crate::Result<CrawlReport>
    where
        S: Future<Output = ()>,
    {
        let started_at = Utc::now();

        self.enter(CrawlPhase::Seeding);
        let frontier = Arc::new(Frontier::new(self.depth_budget));
        frontier.seed(self.seed.clone());

        self.enter(CrawlPhase::Running);
        let mut pool = JoinSet::new();
        for id in 0..self.workers {
            let worker = Worker::new(
                id,
                Arc::clone(&frontier),
                Arc::clone(&self.fetcher),
                Arc::clone(&self.extractor),
            );
            pool.spawn(worker.run());
        }
        tracing::info!(
            "Started {} workers (depth budget {})",
            self.workers,
            self.depth_budget
        );

        let mut totals = WorkerStats::default();
        let mut failure = None;

        tokio::pin!(shutdown);
        let reason = tokio::select! {
            _ = frontier.wait_quiescent(self.workers) => StopReason::Quiescent,
            _ = &mut shutdown => StopReason::Shutdown,
            Some(joined) = pool.join_next() => {
                match joined {
                    Ok(stats) => totals += stats,
                    Err(e) => failure = Some(e.to_string()),
                }
                StopReason::WorkerExited
            }
        };

        match reason {
            StopReason::Quiescent => {
                tracing::info!("All workers idle with nothing pending, stopping crawl");
            }
            StopReason::Shutdown => tracing::warn!("Shutdown requested, stopping crawl"),
            StopReason::WorkerExited => tracing::error!("A worker exited before the crawl finished"),
        }

        frontier.close();

        while let Some(joined) = pool.join_next().await {
            match joined {
                Ok(stats) => totals += stats,
                Err(e) => {
                    tracing::error!("Worker task failed: {}", e);
                    failure.get_or_insert_with(|| e.to_string());
                }
            }
        }

        self.enter(CrawlPhase::Terminated);

        if let Some(message) = failure {
            return Err(CrawlError::Worker(message));
        }

        let snapshot = frontier.snapshot();
        let statistics = CrawlStatistics::collect(totals, &snapshot);

        tracing::info!(
            "Crawl finished: {} visited, {} rejected, {} unvisited",
            snapshot.visited.len(),
            snapshot.rejected.len(),
            snapshot.pending.len()
        );

        Ok(CrawlReport {
            seed: self.seed.clone(),
            depth_budget: self.depth_budget,
            workers: self.workers,
            unvisited: snapshot.pending.len(),
            visited: snapshot.visited,
            rejected: snapshot.rejected,
            interrupted: reason != StopReason::Quiescent,
            statistics,
            started_at,
            finished_at: Utc::now(),
        })
    }

    fn enter(&mut self, phase: CrawlPhase) {
        tracing::debug!("Crawl phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }
}

/// Runs a complete crawl over HTTP
///
/// # Example
///
/// ```no_run
/// use depth_crawl::config::load_config;
/// use depth_crawl::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("crawl.toml"))?;
/// let report = run_crawl(config).await?;
/// println!("{} pages visited", report.visited.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> crate::Result<CrawlReport> {
    let mut coordinator = Coordinator::with_http(&config)?;
    coordinator.run().await
}
