use crate::config::types::{Config, CrawlerConfig, FetchConfig, OutputConfig};
use crate::locator::{Locator, MAX_DEPTH};
use crate::{ConfigError, ConfigResult};

/// Largest accepted worker pool
pub const MAX_WORKERS: usize = 99;

/// Largest accepted request timeout (milliseconds)
pub const MAX_TIMEOUT_MS: u64 = 120_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_crawler_config(&config.crawler)?;
    validate_fetch_config(&config.fetch)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawl scope settings and returns the seed locator
///
/// A depth budget of 0 would crawl nothing, so it is rejected rather than
/// silently accepted.
pub fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<Locator> {
    let seed = Locator::seed(&config.seed_url)?;

    if config.depth_budget < 1 || config.depth_budget > MAX_DEPTH {
        return Err(ConfigError::DepthBudget {
            got: config.depth_budget,
            max: MAX_DEPTH,
        });
    }

    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::WorkerCount {
            got: config.workers,
            max: MAX_WORKERS,
        });
    }

    Ok(seed)
}

/// Validates HTTP fetch settings
fn validate_fetch_config(config: &FetchConfig) -> ConfigResult<()> {
    if config.timeout_ms < 1 || config.timeout_ms > MAX_TIMEOUT_MS {
        return Err(ConfigError::Validation(format!(
            "timeout-ms must be between 1 and {}, got {}",
            MAX_TIMEOUT_MS, config.timeout_ms
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.user_agent.chars().any(char::is_control) {
        return Err(ConfigError::Validation(
            "user-agent cannot contain control characters".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    if let Some(path) = &config.summary_path {
        if path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "summary-path cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}
