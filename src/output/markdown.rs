//! Markdown summary generation
//!
//! This module renders a finished crawl as a markdown document: run
//! information, statistics, a per-depth table, and the visited and rejected
//! lists.

use crate::config::OutputConfig;
use crate::locator::Locator;
use crate::output::report::{CrawlReport, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes a markdown summary of `report` to `output_path`
pub fn generate_markdown_summary(report: &CrawlReport, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(report);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Writes the summary configured in `config`, if any
///
/// Returns the path written to, or `None` when no summary path is set.
pub fn write_summary(report: &CrawlReport, config: &OutputConfig) -> crate::Result<Option<PathBuf>> {
    let Some(path) = &config.summary_path else {
        return Ok(None);
    };

    let path = PathBuf::from(path);
    generate_markdown_summary(report, &path)?;
    tracing::info!("Summary written to {}", path.display());

    Ok(Some(path))
}

/// Formats a crawl report as markdown
pub fn format_markdown_summary(report: &CrawlReport) -> String {
    let stats = &report.statistics;
    let mut md = String::new();

    md.push_str("# Depth-Crawl Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Seed**: {}\n", report.seed.url()));
    md.push_str(&format!("- **Depth Budget**: {}\n", report.depth_budget));
    md.push_str(&format!("- **Workers**: {}\n", report.workers));
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", report.finished_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {:.2} seconds\n",
        report.duration_seconds()
    ));
    md.push_str(&format!("- **Status**: {}\n\n", report.status()));

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Pages Visited**: {}\n", report.visited.len()));
    md.push_str(&format!(
        "- **Distinct URLs Visited**: {}\n",
        stats.distinct_visited_urls
    ));
    md.push_str(&format!("- **Pages Rejected**: {}\n", report.rejected.len()));
    md.push_str(&format!("- **Pages Never Visited**: {}\n", report.unvisited));
    md.push_str(&format!("- **Fetch Failures**: {}\n", stats.fetch_failures));
    md.push_str(&format!(
        "- **Client Errors Discarded**: {}\n",
        stats.client_errors
    ));
    md.push_str(&format!("- **Links Skipped**: {}\n", stats.links_skipped));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        stats.success_rate()
    ));

    // Depth breakdown
    if !stats.visited_by_depth.is_empty() || !stats.rejected_by_depth.is_empty() {
        md.push_str("## Depth Breakdown\n\n");
        md.push_str("| Depth | Visited | Rejected |\n");
        md.push_str("|-------|---------|----------|\n");

        let mut depths: Vec<u32> = stats
            .visited_by_depth
            .keys()
            .chain(stats.rejected_by_depth.keys())
            .copied()
            .collect();
        depths.sort_unstable();
        depths.dedup();

        for depth in depths {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                depth,
                stats.visited_by_depth.get(&depth).copied().unwrap_or(0),
                stats.rejected_by_depth.get(&depth).copied().unwrap_or(0)
            ));
        }
        md.push('\n');
    }

    push_locator_table(&mut md, "Visited Pages", &report.visited);
    push_locator_table(&mut md, "Rejected Pages", &report.rejected);

    md
}

fn push_locator_table(md: &mut String, title: &str, locators: &[Locator]) {
    if locators.is_empty() {
        return;
    }

    md.push_str(&format!("## {}\n\n", title));
    md.push_str("| # | URL | Depth |\n");
    md.push_str("|---|-----|-------|\n");
    for (index, locator) in locators.iter().enumerate() {
        md.push_str(&format!(
            "| {} | {} | {} |\n",
            index + 1,
            locator.url(),
            locator.depth()
        ));
    }
    md.push('\n');
}
