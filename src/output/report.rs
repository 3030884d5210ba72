//! Crawl report types

use crate::locator::Locator;
use crate::output::stats::CrawlStatistics;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Everything a finished crawl hands back to its caller
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// The depth-0 starting locator
    pub seed: Locator,

    /// Exclusive depth bound the crawl ran with
    pub depth_budget: u32,

    /// Size of the worker pool
    pub workers: usize,

    /// Locators handed to workers, in hand-out order (may repeat URLs)
    pub visited: Vec<Locator>,

    /// Locators rejected for reaching the depth budget, in admission order
    pub rejected: Vec<Locator>,

    /// Pending locators never handed out (non-zero only when interrupted)
    pub unvisited: usize,

    /// True if the crawl stopped before reaching the termination predicate
    pub interrupted: bool,

    /// Aggregate counters
    pub statistics: CrawlStatistics,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    /// Wall-clock duration of the crawl in seconds
    pub fn duration_seconds(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }

    /// Status label for summaries
    pub fn status(&self) -> &'static str {
        if self.interrupted {
            "interrupted"
        } else {
            "completed"
        }
    }
}
