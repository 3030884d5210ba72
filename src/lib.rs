//! depth-crawl: a concurrent, depth-bounded site crawler
//!
//! This crate crawls a site breadth-first from a single `http://` seed using a
//! fixed pool of workers that share one frontier. The crawl stops exactly when
//! every worker is idle and nothing is left pending.

pub mod config;
pub mod crawler;
pub mod locator;
pub mod output;

use thiserror::Error;

/// Main error type for depth-crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Worker task failed: {0}")]
    Worker(String),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid seed URL: {0}")]
    InvalidSeed(#[from] LocatorError),

    #[error("Depth budget must be between 1 and {max}, got {got}")]
    DepthBudget { got: u32, max: u32 },

    #[error("Worker count must be between 1 and {max}, got {got}")]
    WorkerCount { got: usize, max: usize },
}

/// Locator construction errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocatorError {
    #[error("Failed to parse URL '{url}': {reason}")]
    Parse { url: String, reason: String },

    #[error("URL must start with http://, got '{0}'")]
    InvalidScheme(String),

    #[error("Missing host in URL '{0}'")]
    MissingHost(String),

    #[error("Depth {depth} is outside 0..={max}")]
    DepthOutOfRange { depth: u32, max: u32 },
}

/// Page fetch failures
///
/// The crawler treats every variant the same way: the page contributes no
/// children and the worker moves on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Host unreachable for {url}: {message}")]
    Unreachable { url: String, message: String },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Protocol error for {url}: {message}")]
    Protocol {
        url: String,
        status: Option<u16>,
        message: String,
    },
}

impl FetchError {
    /// Returns true if the server answered with a 4xx status
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Protocol { status: Some(code), .. } if (400..500).contains(code))
    }
}

/// Result type alias for depth-crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for locator operations
pub type LocatorResult<T> = std::result::Result<T, LocatorError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlPhase, Frontier};
pub use locator::{Locator, MAX_DEPTH};
pub use output::CrawlReport;
