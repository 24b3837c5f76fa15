use crate::config::types::{ClientConfig, Config, OutputConfig, ScrapeConfig};
use crate::ConfigError;
use url::Url;

/// Longest courtesy delay accepted between two requests (seconds)
pub const MAX_SLEEP_SECS: f64 = 3600.0;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scrape_config(&config.scrape)?;
    validate_client_config(&config.client)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Strips `r/` prefixes and surrounding whitespace from subreddit names
pub fn normalize_subreddit(name: &str) -> String {
    let trimmed = name.trim().trim_start_matches('/');
    trimmed
        .strip_prefix("r/")
        .unwrap_or(trimmed)
        .trim_end_matches('/')
        .to_string()
}

/// Validates scrape configuration
fn validate_scrape_config(config: &ScrapeConfig) -> Result<(), ConfigError> {
    if config.subreddits.is_empty() {
        return Err(ConfigError::Validation(
            "at least one subreddit is required".to_string(),
        ));
    }

    for name in &config.subreddits {
        validate_subreddit_name(name)?;
    }

    if config.post_limit < 1 {
        return Err(ConfigError::Validation(format!(
            "post_limit must be >= 1, got {}",
            config.post_limit
        )));
    }

    if let Some(cap) = config.max_comments_per_post {
        if cap < 1 {
            return Err(ConfigError::Validation(
                "max_comments_per_post must be >= 1 when set".to_string(),
            ));
        }
    }

    if !config.min_sleep.is_finite() || config.min_sleep < 0.0 {
        return Err(ConfigError::Validation(format!(
            "min_sleep must be a non-negative number of seconds, got {}",
            config.min_sleep
        )));
    }

    if !config.max_sleep.is_finite() || config.max_sleep < config.min_sleep {
        return Err(ConfigError::Validation(format!(
            "max_sleep ({}) must be >= min_sleep ({})",
            config.max_sleep, config.min_sleep
        )));
    }

    if config.max_sleep > MAX_SLEEP_SECS {
        return Err(ConfigError::Validation(format!(
            "max_sleep must be <= {} seconds, got {}",
            MAX_SLEEP_SECS, config.max_sleep
        )));
    }

    Ok(())
}

/// Subreddit names are ASCII letters, digits and underscores
fn validate_subreddit_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::InvalidSubreddit(
            "subreddit name cannot be empty".to_string(),
        ));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ConfigError::InvalidSubreddit(format!(
            "'{}' may only contain letters, digits and underscores",
            name
        )));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_client_config(config: &ClientConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use http or https",
            config.base_url
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.posts_path.is_empty() {
        return Err(ConfigError::Validation(
            "posts_path cannot be empty".to_string(),
        ));
    }

    if config.comments_path.is_empty() {
        return Err(ConfigError::Validation(
            "comments_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
