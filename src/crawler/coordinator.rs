//! Harvest coordinator - main run orchestration logic
//!
//! This module contains the run loop that coordinates the whole harvest:
//! - Walking each subreddit's listing
//! - Fetching and flattening the comment tree of every collected post
//! - Downgrading request failures to logged skips
//! - Writing both output files and reporting counts

use crate::config::{validate, Config};
use crate::crawler::comments::fetch_comment_tree;
use crate::crawler::fetcher::{build_http_client, Fetcher};
use crate::crawler::flatten::{flatten_comment_tree, FlattenLimits};
use crate::crawler::listing::collect_posts;
use crate::crawler::throttle::Throttle;
use crate::model::{CommentRow, PostRow};
use crate::output::{write_rows, HarvestStats, SubredditStats};
use crate::reddit::Endpoints;
use crate::HarvestError;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;

/// Rows and counters accumulated during a run
#[derive(Debug, Default)]
pub struct Harvest {
    pub posts: Vec<PostRow>,
    pub comments: Vec<CommentRow>,
    pub stats: HarvestStats,
}

/// Main harvest coordinator structure
pub struct Coordinator {
    config: Config,
    endpoints: Endpoints,
    fetcher: Fetcher,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// `config` is validated again here, since callers may edit it after
    /// [`finalize`](crate::config::finalize).
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HarvestError)` - The configuration, base URL or HTTP client
    ///   was unusable
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        validate(&config)?;
        let endpoints = Endpoints::new(&config.client.base_url)?;
        let client = build_http_client(&config.client)?;
        let fetcher = Fetcher::new(client, Throttle::from_config(&config.scrape));

        Ok(Self {
            config,
            endpoints,
            fetcher,
        })
    }

    /// Runs the harvest over every configured subreddit
    ///
    /// Subreddits are processed in order, one request at a time. This never
    /// fails: a subreddit whose listing fails contributes whatever was
    /// collected before the failure, and a post whose comments fail keeps
    /// its post row with no comment rows.
    pub async fn run(&mut self) -> Harvest {
        let start_time = Instant::now();
        let mut harvest = Harvest::default();
        let mut seen_posts: HashSet<String> = HashSet::new();

        let subreddits = self.config.scrape.subreddits.clone();
        for subreddit in &subreddits {
            tracing::info!("== r/{} ==", subreddit);
            let sub_stats = self
                .harvest_subreddit(subreddit, &mut seen_posts, &mut harvest)
                .await;
            harvest.stats.subreddits.push(sub_stats);
        }

        harvest.stats.requests = self.fetcher.requests_sent();
        harvest.stats.elapsed = start_time.elapsed();

        tracing::info!(
            "Harvest finished: {} posts, {} comments, {} requests in {:?}",
            harvest.posts.len(),
            harvest.comments.len(),
            harvest.stats.requests,
            harvest.stats.elapsed
        );

        harvest
    }

    /// Collects one subreddit's posts and their comments into `harvest`
    async fn harvest_subreddit(
        &mut self,
        subreddit: &str,
        seen_posts: &mut HashSet<String>,
        harvest: &mut Harvest,
    ) -> SubredditStats {
        let mut stats = SubredditStats::new(subreddit);

        let listing = collect_posts(
            &mut self.fetcher,
            &self.endpoints,
            &self.config.scrape,
            subreddit,
            seen_posts,
        )
        .await;

        stats.pages = listing.pages;
        stats.posts = listing.posts.len();
        stats.duplicate_posts = listing.duplicates;
        stats.listing_error = listing.error.map(|e| e.to_string());

        if stats.skipped() {
            tracing::warn!("Skipping r/{}: no posts collected", subreddit);
            return stats;
        }
        tracing::info!("Collected {} posts from r/{}", stats.posts, subreddit);

        let limits = FlattenLimits {
            max_comments: self.config.scrape.max_comments_per_post,
            max_depth: self.config.scrape.max_depth,
        };
        let total = listing.posts.len();

        for (i, post) in listing.posts.into_iter().enumerate() {
            tracing::info!("Comments {}/{} for post {}", i + 1, total, post.post_id);

            match fetch_comment_tree(
                &mut self.fetcher,
                &self.endpoints,
                &post.post_id,
                self.config.scrape.comment_sort,
            )
            .await
            {
                Ok(tree) => {
                    let flat = flatten_comment_tree(&post, tree, limits, &self.endpoints);
                    tracing::debug!(
                        "Post {}: {} comments, {} placeholders skipped",
                        post.post_id,
                        flat.comments.len(),
                        flat.placeholders
                    );
                    stats.comments += flat.comments.len();
                    stats.placeholders_skipped += flat.placeholders;
                    harvest.comments.extend(flat.comments);
                }
                Err(e) => {
                    if e.is_blocked() {
                        tracing::warn!(
                            "Blocked fetching comments for post {}: {} (consider a longer --min-sleep)",
                            post.post_id,
                            e
                        );
                    } else {
                        tracing::warn!("Comments unavailable for post {}: {}", post.post_id, e);
                    }
                    stats.comment_failures += 1;
                }
            }

            harvest.posts.push(post);
        }

        if stats.placeholders_skipped > 0 {
            tracing::info!(
                "Skipped {} 'more comments' placeholders in r/{} threads",
                stats.placeholders_skipped,
                subreddit
            );
        }

        stats
    }

    /// Writes both output files, replacing previous contents
    pub fn write_outputs(&self, harvest: &mut Harvest) -> Result<(), HarvestError> {
        let posts_path = PathBuf::from(&self.config.output.posts_path);
        let comments_path = PathBuf::from(&self.config.output.comments_path);

        harvest.stats.posts_written = write_rows(&posts_path, &harvest.posts)?;
        harvest.stats.comments_written = write_rows(&comments_path, &harvest.comments)?;

        tracing::info!(
            "Saved {} posts to {}",
            harvest.stats.posts_written,
            posts_path.display()
        );
        tracing::info!(
            "Saved {} comments to {}",
            harvest.stats.comments_written,
            comments_path.display()
        );

        harvest.stats.posts_path = posts_path;
        harvest.stats.comments_path = comments_path;
        Ok(())
    }
}

/// Runs a harvest and writes its output files
///
/// # Returns
///
/// * `Ok(HarvestStats)` - Counters for the final summary
/// * `Err(HarvestError)` - Setup or output writing failed
pub async fn run_harvest(config: Config) -> Result<HarvestStats, HarvestError> {
    let mut coordinator = Coordinator::new(config)?;
    let mut harvest = coordinator.run().await;
    coordinator.write_outputs(&mut harvest)?;
    Ok(harvest.stats)
}
