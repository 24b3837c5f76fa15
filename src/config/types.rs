use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Site root used when no base URL is configured
pub const DEFAULT_BASE_URL: &str = "https://www.reddit.com";

/// Browser-like User-Agent; the public JSON endpoints answer generic
/// library agents with interstitial pages far more often
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/121.0 Safari/537.36";

/// Main configuration structure for Thread-Ripple
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scrape: ScrapeConfig,
    pub client: ClientConfig,
    pub output: OutputConfig,
}

/// What to harvest and how politely
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ScrapeConfig {
    /// Subreddit names, without the `r/` prefix
    pub subreddits: Vec<String>,

    /// Listing sort mode
    pub sort: ListingSort,

    /// Time window, only meaningful for the `top` sort
    pub time_window: TimeWindow,

    /// Maximum number of posts collected per subreddit
    pub post_limit: usize,

    /// Sort order requested from the comments endpoint
    pub comment_sort: CommentSort,

    /// Cap on flattened comments per post
    pub max_comments_per_post: Option<usize>,

    /// Deepest reply level to keep (top-level comments are depth 0)
    pub max_depth: Option<u32>,

    /// Lower bound of the random delay between requests (seconds)
    pub min_sleep: f64,

    /// Upper bound of the random delay between requests (seconds)
    pub max_sleep: f64,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            subreddits: Vec::new(),
            sort: ListingSort::New,
            time_window: TimeWindow::Week,
            post_limit: 25,
            comment_sort: CommentSort::Top,
            max_comments_per_post: None,
            max_depth: None,
            min_sleep: 3.0,
            max_sleep: 8.0,
        }
    }
}

impl ScrapeConfig {
    /// Returns the delay bounds as durations
    pub fn sleep_bounds(&self) -> (Duration, Duration) {
        (
            Duration::from_secs_f64(self.min_sleep),
            Duration::from_secs_f64(self.max_sleep),
        )
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ClientConfig {
    pub user_agent: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Scheme and host of the API, e.g. `https://www.reddit.com`
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Posts file; `.jsonl` selects JSON Lines, anything else CSV
    pub posts_path: String,

    /// Comments file; `.jsonl` selects JSON Lines, anything else CSV
    pub comments_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            posts_path: "reddit_posts.csv".to_string(),
            comments_path: "reddit_comments.csv".to_string(),
        }
    }
}

/// Listing sort mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ListingSort {
    New,
    Hot,
    Top,
}

impl ListingSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingSort::New => "new",
            ListingSort::Hot => "hot",
            ListingSort::Top => "top",
        }
    }
}

/// Time window for the `top` listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    Hour,
    Day,
    Week,
    Month,
    Year,
    All,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Hour => "hour",
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
            TimeWindow::Month => "month",
            TimeWindow::Year => "year",
            TimeWindow::All => "all",
        }
    }
}

/// Sort order of a comment tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CommentSort {
    Confidence,
    Top,
    New,
    Controversial,
    Old,
    Qa,
}

impl CommentSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentSort::Confidence => "confidence",
            CommentSort::Top => "top",
            CommentSort::New => "new",
            CommentSort::Controversial => "controversial",
            CommentSort::Old => "old",
            CommentSort::Qa => "qa",
        }
    }
}

impl fmt::Display for ListingSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for CommentSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
