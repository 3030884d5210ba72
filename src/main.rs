//! depth-crawl main entry point
//!
//! This is the command-line interface for the depth-bounded site crawler.

use anyhow::{bail, Context};
use clap::Parser;
use depth_crawl::config::{load_config_with_hash, validate, Config, DEFAULT_WORKERS};
use depth_crawl::crawler::Coordinator;
use depth_crawl::output::{print_report, write_summary};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// depth-crawl: a concurrent, depth-bounded site crawler
///
/// Crawls http:// pages breadth-first from a seed URL with a fixed pool of
/// workers, and reports every page visited and every page rejected for
/// reaching the depth budget.
#[derive(Parser, Debug)]
#[command(name = "depth-crawl")]
#[command(version)]
#[command(about = "A concurrent, depth-bounded site crawler", long_about = None)]
struct Cli {
    /// Seed URL (must start with http://)
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Depth budget: pages at this depth or deeper are not fetched
    #[arg(value_name = "DEPTH")]
    depth: Option<u32>,

    /// Number of concurrent workers
    #[arg(value_name = "WORKERS")]
    workers: Option<usize>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Request timeout in milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Write a markdown summary to this path
    #[arg(long, value_name = "PATH")]
    summary: Option<PathBuf>,

    /// Validate settings and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("depth_crawl=info,warn"),
            1 => EnvFilter::new("depth_crawl=debug,info"),
            2 => EnvFilter::new("depth_crawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Merges the optional config file with command-line values and validates
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            let (Some(url), Some(depth)) = (&cli.url, cli.depth) else {
                bail!("A seed URL and depth budget are required when no --config file is given");
            };
            Config::new(url.clone(), depth, cli.workers.unwrap_or(DEFAULT_WORKERS))
        }
    };

    if let Some(url) = &cli.url {
        config.crawler.seed_url = url.clone();
    }
    if let Some(depth) = cli.depth {
        config.crawler.depth_budget = depth;
    }
    if let Some(workers) = cli.workers {
        config.crawler.workers = workers;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.fetch.timeout_ms = timeout_ms;
    }
    if let Some(summary) = &cli.summary {
        config.output.summary_path = Some(summary.display().to_string());
    }

    validate(&config).context("Invalid crawl settings")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the validated settings
fn handle_dry_run(config: &Config) {
    println!("=== depth-crawl Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed URL: {}", config.crawler.seed_url);
    println!("  Depth budget: {}", config.crawler.depth_budget);
    println!("  Workers: {}", config.crawler.workers);

    println!("\nFetch:");
    println!("  Timeout: {}ms", config.fetch.timeout_ms);
    println!("  User agent: {}", config.fetch.user_agent);

    println!("\nOutput:");
    match &config.output.summary_path {
        Some(path) => println!("  Summary: {}", path),
        None => println!("  Summary: (none)"),
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling {} (depth budget {}, {} workers)",
        config.crawler.seed_url,
        config.crawler.depth_budget,
        config.crawler.workers
    );

    let mut coordinator = Coordinator::with_http(&config)?;
    let report = coordinator.run_until(shutdown_signal()).await?;

    print_report(&report);

    if let Some(path) =
        write_summary(&report, &config.output).context("Failed to write summary")?
    {
        println!("\n✓ Summary written to: {}", path.display());
    }

    Ok(())
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
