//! Crawl worker loop
//!
//! A worker repeatedly takes a locator from the frontier, fetches it, extracts
//! its links and admits them one level deeper. Failures on one page stay on
//! that page. The loop has no exit condition of its own: it stops when the
//! coordinator closes the frontier.

use crate::crawler::extractor::LinkExtractor;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::frontier::Frontier;
use crate::locator::Locator;
use std::ops::AddAssign;
use std::sync::Arc;

/// Per-worker counters, folded into the crawl report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Locators taken from the frontier
    pub pages_taken: u64,

    /// Pages fetched successfully and scanned for links
    pub pages_fetched: u64,

    /// Fetches that failed (unreachable, timeout, protocol)
    pub fetch_failures: u64,

    /// Responses discarded for a 4xx status
    pub client_errors: u64,

    /// Child locators queued by the frontier
    pub children_admitted: u64,

    /// Child locators rejected for reaching the depth budget
    pub children_rejected: u64,

    /// Extracted links that could not become a locator
    pub links_skipped: u64,
}

impl AddAssign for WorkerStats {
    fn add_assign(&mut self, other: Self) {
        self.pages_taken += other.pages_taken;
        self.pages_fetched += other.pages_fetched;
        self.fetch_failures += other.fetch_failures;
        self.client_errors += other.client_errors;
        self.children_admitted += other.children_admitted;
        self.children_rejected += other.children_rejected;
        self.links_skipped += other.links_skipped;
    }
}

/// One member of the crawl's worker pool
pub struct Worker {
    id: usize,
    frontier: Arc<Frontier>,
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<dyn LinkExtractor>,
}

impl Worker {
    pub fn new(
        id: usize,
        frontier: Arc<Frontier>,
        fetcher: Arc<dyn PageFetcher>,
        extractor: Arc<dyn LinkExtractor>,
    ) -> Self {
        Self {
            id,
            frontier,
            fetcher,
            extractor,
        }
    }

    /// Runs until the frontier is closed, returning this worker's counters
    pub async fn run(self) -> WorkerStats {
        let mut stats = WorkerStats::default();
        tracing::debug!(worker = self.id, "Worker started");

        loop {
            if self.frontier.is_closed() {
                break;
            }

            let Some(locator) = self.frontier.take().await else {
                break;
            };

            stats.pages_taken += 1;
            self.process(&locator, &mut stats).await;
        }

        tracing::debug!(
            worker = self.id,
            pages = stats.pages_taken,
            "Worker stopped"
        );
        stats
    }

    /// Fetches one page and admits its children
    async fn process(&self, locator: &Locator, stats: &mut WorkerStats) {
        tracing::debug!(
            worker = self.id,
            url = %locator.url(),
            depth = locator.depth(),
            "Fetching page"
        );

        let body = match self.fetcher.fetch(locator).await {
            Ok(body) => body,
            Err(e) if e.is_client_error() => {
                tracing::debug!(worker = self.id, "Discarding {}", e);
                stats.client_errors += 1;
                return;
            }
            Err(e) => {
                tracing::warn!(worker = self.id, "Fetch failed: {}", e);
                stats.fetch_failures += 1;
                return;
            }
        };

        if body.is_client_error() {
            tracing::debug!(
                worker = self.id,
                url = %locator.url(),
                status = body.status,
                "Discarding client error response"
            );
            stats.client_errors += 1;
            return;
        }

        stats.pages_fetched += 1;

        let links = self.extractor.extract_links(&body.text, locator);
        for link in links {
            let child = match locator.child(&link) {
                Ok(child) => child,
                Err(e) => {
                    tracing::debug!(worker = self.id, "Skipping link {}: {}", link, e);
                    stats.links_skipped += 1;
                    continue;
                }
            };

            if self.frontier.admit(child) {
                stats.children_admitted += 1;
            } else {
                stats.children_rejected += 1;
            }
        }
    }
}
