//! Output module for crawl reports and summaries
//!
//! This module handles:
//! - The report type a finished crawl returns
//! - Printing visited and rejected pages to the console
//! - Generating markdown summaries of crawl results
//! - Aggregate crawl statistics

mod markdown;
mod report;
pub mod stats;

pub use markdown::{format_markdown_summary, generate_markdown_summary, write_summary};
pub use report::{CrawlReport, OutputError, OutputResult};
pub use stats::{print_statistics, CrawlStatistics};

use crate::locator::Locator;

/// Prints the visited and rejected lists followed by statistics
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Results ===\n");
    println!("Seed: {}", report.seed);
    println!(
        "Depth budget: {}, workers: {}, status: {}\n",
        report.depth_budget,
        report.workers,
        report.status()
    );

    println!("Visited pages:");
    print_numbered(&report.visited);

    println!("\nPages that were not parsed (depth budget reached):");
    print_numbered(&report.rejected);

    if report.unvisited > 0 {
        println!(
            "\n{} pending pages were never visited",
            report.unvisited
        );
    }

    println!();
    print_statistics(&report.statistics);
}

fn print_numbered(locators: &[Locator]) {
    if locators.is_empty() {
        println!("  (none)");
        return;
    }

    for (index, locator) in locators.iter().enumerate() {
        println!("{} |  {}", index + 1, locator);
    }
}
