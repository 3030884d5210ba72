//! Statistics for a finished crawl
//!
//! Worker counters are summed and combined with per-depth counts taken from
//! the frontier's final snapshot.

use crate::crawler::{FrontierSnapshot, WorkerStats};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Locators taken from the frontier by any worker
    pub pages_taken: u64,

    /// Pages fetched successfully and scanned for links
    pub pages_fetched: u64,

    /// Fetches that failed (unreachable, timeout, protocol)
    pub fetch_failures: u64,

    /// Responses discarded for a 4xx status
    pub client_errors: u64,

    /// Child locators queued
    pub children_admitted: u64,

    /// Child locators rejected at the depth budget
    pub children_rejected: u64,

    /// Extracted links that could not become a locator
    pub links_skipped: u64,

    /// Distinct URLs among visited locators
    pub distinct_visited_urls: u64,

    /// Visited locators per depth
    pub visited_by_depth: BTreeMap<u32, u64>,

    /// Rejected locators per depth
    pub rejected_by_depth: BTreeMap<u32, u64>,
}

impl CrawlStatistics {
    /// Builds statistics from summed worker counters and the final snapshot
    pub fn collect(totals: WorkerStats, snapshot: &FrontierSnapshot) -> Self {
        let mut visited_by_depth = BTreeMap::new();
        for locator in &snapshot.visited {
            *visited_by_depth.entry(locator.depth()).or_insert(0) += 1;
        }

        let mut rejected_by_depth = BTreeMap::new();
        for locator in &snapshot.rejected {
            *rejected_by_depth.entry(locator.depth()).or_insert(0) += 1;
        }

        let distinct_visited_urls = snapshot
            .visited
            .iter()
            .map(|locator| locator.as_str())
            .collect::<HashSet<_>>()
            .len() as u64;

        Self {
            pages_taken: totals.pages_taken,
            pages_fetched: totals.pages_fetched,
            fetch_failures: totals.fetch_failures,
            client_errors: totals.client_errors,
            children_admitted: totals.children_admitted,
            children_rejected: totals.children_rejected,
            links_skipped: totals.links_skipped,
            distinct_visited_urls,
            visited_by_depth,
            rejected_by_depth,
        }
    }

    /// Share of taken pages that were fetched successfully, in percent
    pub fn success_rate(&self) -> f64 {
        if self.pages_taken == 0 {
            0.0
        } else {
            (self.pages_fetched as f64 / self.pages_taken as f64) * 100.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Pages taken: {}", stats.pages_taken);
    println!("  Pages fetched: {}", stats.pages_fetched);
    println!("  Distinct URLs visited: {}", stats.distinct_visited_urls);
    println!("  Links admitted: {}", stats.children_admitted);
    println!("  Links rejected (depth): {}", stats.children_rejected);
    println!("  Links skipped: {}", stats.links_skipped);
    println!();

    if stats.fetch_failures > 0 || stats.client_errors > 0 {
        println!("Errors:");
        println!("  Fetch failures: {}", stats.fetch_failures);
        println!("  Client errors discarded: {}", stats.client_errors);
        println!();
    }

    println!("Pages by Depth:");
    let depths: BTreeSet<u32> = stats
        .visited_by_depth
        .keys()
        .chain(stats.rejected_by_depth.keys())
        .copied()
        .collect();
    for depth in depths {
        println!(
            "  depth {}: {} visited, {} rejected",
            depth,
            stats.visited_by_depth.get(&depth).copied().unwrap_or(0),
            stats.rejected_by_depth.get(&depth).copied().unwrap_or(0)
        );
    }
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} pages fetched)",
        stats.success_rate(),
        stats.pages_fetched,
        stats.pages_taken
    );
}
