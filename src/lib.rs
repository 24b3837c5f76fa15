//! Thread-Ripple: a polite subreddit harvester
//!
//! This crate pages through public subreddit listings, fetches the comment
//! tree of every collected post, flattens each tree into parent-referencing
//! rows and writes posts and comments to tabular files.

pub mod config;
pub mod crawler;
pub mod model;
pub mod output;
pub mod reddit;

use thiserror::Error;

/// Main error type for Thread-Ripple operations
///
/// Only configuration, client construction and output failures surface
/// here. Per-request failures are [`FetchError`]s and are absorbed by the
/// coordinator.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

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

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid subreddit name: {0}")]
    InvalidSubreddit(String),
}

/// Errors for a single request to the remote API
///
/// Every variant is recoverable: the coordinator logs it and skips the
/// unit of work (a subreddit page or a post's comments).
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Blocked or rate-limited at {url} (HTTP {status})")]
    Blocked { url: String, status: u16 },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Malformed response from {url}: {message}")]
    Malformed { url: String, message: String },
}

impl FetchError {
    /// Returns true for 403/429 responses
    pub fn is_blocked(&self) -> bool {
        matches!(self, FetchError::Blocked { .. })
    }
}

/// Result type alias for Thread-Ripple operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for single-request operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{flatten_comment_tree, harvest, Coordinator};
pub use model::{CommentRow, PostRow};
