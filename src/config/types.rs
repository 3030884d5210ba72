use serde::Deserialize;

/// Worker count used when none is configured
pub const DEFAULT_WORKERS: usize = 4;

/// Request timeout used when none is configured (milliseconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// User agent sent when none is configured
pub const DEFAULT_USER_AGENT: &str = concat!("depth-crawl/", env!("CARGO_PKG_VERSION"));

/// Main configuration structure for depth-crawl
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Builds a configuration from the three operator-supplied values,
    /// using defaults for everything else
    pub fn new(seed_url: impl Into<String>, depth_budget: u32, workers: usize) -> Self {
        Self {
            crawler: CrawlerConfig {
                seed_url: seed_url.into(),
                depth_budget,
                workers,
            },
            fetch: FetchConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Crawl scope configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URL the crawl starts from (must be http://)
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Exclusive depth bound; locators at this depth or deeper are rejected
    #[serde(rename = "depth-budget")]
    pub depth_budget: u32,

    /// Number of concurrent workers
    #[serde(default = "default_workers")]
    pub workers: usize,
}

/// HTTP fetch configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Connect and request timeout (milliseconds)
    #[serde(rename = "timeout-ms", default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// User-Agent header value
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: default_user_agent(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Where to write a markdown summary, if anywhere
    #[serde(rename = "summary-path", default)]
    pub summary_path: Option<String>,
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
