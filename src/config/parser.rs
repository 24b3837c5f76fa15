use crate::config::types::{CommentSort, Config, ListingSort, TimeWindow};
use crate::config::validation::{normalize_subreddit, validate};
use crate::ConfigError;
use std::path::Path;

/// Values supplied on the command line
///
/// Every field is optional; a `Some` replaces whatever the config file (or
/// the built-in default) provided.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub subreddits: Option<Vec<String>>,
    pub sort: Option<ListingSort>,
    pub time_window: Option<TimeWindow>,
    pub post_limit: Option<usize>,
    pub comment_sort: Option<CommentSort>,
    pub max_comments_per_post: Option<usize>,
    pub max_depth: Option<u32>,
    pub min_sleep: Option<f64>,
    pub max_sleep: Option<f64>,
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
    pub base_url: Option<String>,
    pub posts_path: Option<String>,
    pub comments_path: Option<String>,
}

impl Overrides {
    /// Applies the command-line values on top of `config`
    pub fn apply(self, config: &mut Config) {
        if let Some(subreddits) = self.subreddits {
            config.scrape.subreddits = subreddits;
        }
        if let Some(sort) = self.sort {
            config.scrape.sort = sort;
        }
        if let Some(t) = self.time_window {
            config.scrape.time_window = t;
        }
        if let Some(limit) = self.post_limit {
            config.scrape.post_limit = limit;
        }
        if let Some(sort) = self.comment_sort {
            config.scrape.comment_sort = sort;
        }
        if self.max_comments_per_post.is_some() {
            config.scrape.max_comments_per_post = self.max_comments_per_post;
        }
        if self.max_depth.is_some() {
            config.scrape.max_depth = self.max_depth;
        }
        if let Some(min) = self.min_sleep {
            config.scrape.min_sleep = min;
        }
        if let Some(max) = self.max_sleep {
            config.scrape.max_sleep = max;
        }
        if let Some(timeout) = self.timeout_secs {
            config.client.timeout_secs = timeout;
        }
        if let Some(ua) = self.user_agent {
            config.client.user_agent = ua;
        }
        if let Some(base) = self.base_url {
            config.client.base_url = base;
        }
        if let Some(path) = self.posts_path {
            config.output.posts_path = path;
        }
        if let Some(path) = self.comments_path {
            config.output.comments_path = path;
        }
    }
}

/// Loads and parses a configuration file from the given path
///
/// The returned configuration has not been validated yet, so command-line
/// overrides can still fill in missing values. Call [`finalize`] before use.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use thread_ripple::config::{finalize, load_config};
///
/// let config = finalize(load_config(Path::new("harvest.toml")).unwrap()).unwrap();
/// println!("Post limit: {}", config.scrape.post_limit);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    Ok(config)
}

/// Builds the effective configuration from an optional file and overrides
pub fn resolve_config(path: Option<&Path>, overrides: Overrides) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    overrides.apply(&mut config);
    finalize(config)
}

/// Normalizes subreddit names and validates the configuration
pub fn finalize(mut config: Config) -> Result<Config, ConfigError> {
    config.scrape.subreddits = config
        .scrape
        .subreddits
        .iter()
        .map(|s| normalize_subreddit(s))
        .collect();

    validate(&config)?;

    Ok(config)
}
