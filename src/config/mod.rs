//! Configuration module for Thread-Ripple
//!
//! Settings come from an optional TOML file, are overridden by command-line
//! flags and are validated once before a harvest starts.
//!
//! # Example
//!
//! ```no_run
//! use thread_ripple::config::{resolve_config, Overrides};
//! use std::path::Path;
//!
//! let config = resolve_config(Some(Path::new("harvest.toml")), Overrides::default()).unwrap();
//! println!("Harvesting {} subreddits", config.scrape.subreddits.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ClientConfig, CommentSort, Config, ListingSort, OutputConfig, ScrapeConfig, TimeWindow,
    DEFAULT_BASE_URL, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{finalize, load_config, parse_config, resolve_config, Overrides};
pub use validation::{normalize_subreddit, validate, MAX_SLEEP_SECS};
