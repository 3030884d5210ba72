//! Configuration module for depth-crawl
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Command-line values are applied on top of a loaded file by the
//! binary, then the merged result is validated again.
//!
//! # Example
//!
//! ```no_run
//! use depth_crawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.toml")).unwrap();
//! println!("Crawler will use depth budget: {}", config.crawler.depth_budget);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, FetchConfig, OutputConfig, DEFAULT_TIMEOUT_MS, DEFAULT_USER_AGENT,
    DEFAULT_WORKERS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};

// Re-export validation
pub use validation::{validate, validate_crawler_config, MAX_TIMEOUT_MS, MAX_WORKERS};
