//! Run statistics
//!
//! Counters accumulated while harvesting and the end-of-run summary that is
//! shown to the user.

use std::path::PathBuf;
use std::time::Duration;

/// Per-subreddit counters
#[derive(Debug, Clone, Default)]
pub struct SubredditStats {
    pub name: String,

    /// Posts collected from the listing
    pub posts: usize,

    /// Comment rows flattened from this subreddit's posts
    pub comments: usize,

    /// Listing pages fetched
    pub pages: usize,

    /// Why the listing walk stopped early, if it did
    pub listing_error: Option<String>,

    /// Posts whose comment request failed
    pub comment_failures: usize,

    /// Unresolved "load more" placeholders
    pub placeholders_skipped: usize,

    /// Posts already collected under an earlier subreddit
    pub duplicate_posts: usize,
}

impl SubredditStats {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// True when the listing failed before yielding a single post
    pub fn skipped(&self) -> bool {
        self.listing_error.is_some() && self.posts == 0
    }
}

/// Statistics for a whole run
#[derive(Debug, Clone, Default)]
pub struct HarvestStats {
    pub subreddits: Vec<SubredditStats>,

    /// Requests sent, failed ones included
    pub requests: usize,

    pub elapsed: Duration,

    /// Rows written to the posts file
    pub posts_written: usize,

    /// Rows written to the comments file
    pub comments_written: usize,

    pub posts_path: PathBuf,
    pub comments_path: PathBuf,
}

impl HarvestStats {
    pub fn total_posts(&self) -> usize {
        self.subreddits.iter().map(|s| s.posts).sum()
    }

    pub fn total_comments(&self) -> usize {
        self.subreddits.iter().map(|s| s.comments).sum()
    }

    pub fn comment_failures(&self) -> usize {
        self.subreddits.iter().map(|s| s.comment_failures).sum()
    }

    pub fn placeholders_skipped(&self) -> usize {
        self.subreddits.iter().map(|s| s.placeholders_skipped).sum()
    }

    /// Subreddits whose listing failed at some point
    pub fn failed_subreddits(&self) -> Vec<&SubredditStats> {
        self.subreddits
            .iter()
            .filter(|s| s.listing_error.is_some())
            .collect()
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &HarvestStats) {
    println!("\n=== Harvest Summary ===\n");

    println!("Subreddits:");
    for sub in &stats.subreddits {
        let status = if sub.skipped() {
            "skipped"
        } else if sub.listing_error.is_some() {
            "partial"
        } else {
            "ok"
        };
        println!(
            "  r/{}: {} posts, {} comments, {} pages [{}]",
            sub.name, sub.posts, sub.comments, sub.pages, status
        );
    }
    println!();

    let failed = stats.failed_subreddits();
    if !failed.is_empty() {
        println!("Listing Errors ({}):", failed.len());
        for sub in failed {
            if let Some(error) = &sub.listing_error {
                println!("  - r/{}: {}", sub.name, error);
            }
        }
        println!();
    }

    if stats.comment_failures() > 0 {
        println!(
            "Comment requests failed for {} post(s); their post rows were kept",
            stats.comment_failures()
        );
    }

    if stats.placeholders_skipped() > 0 {
        println!(
            "Skipped {} 'more comments' placeholder(s)",
            stats.placeholders_skipped()
        );
    }

    println!(
        "Collected {} posts and {} comments from {} subreddit(s)",
        stats.total_posts(),
        stats.total_comments(),
        stats.subreddits.len()
    );
    println!(
        "{} requests in {:.1}s",
        stats.requests,
        stats.elapsed.as_secs_f64()
    );
    println!();
    println!(
        "Saved {} posts to {}",
        stats.posts_written,
        stats.posts_path.display()
    );
    println!(
        "Saved {} comments to {}",
        stats.comments_written,
        stats.comments_path.display()
    );
}
