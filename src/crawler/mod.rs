//! Crawler module for listing and comment harvesting
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching with error classification
//! - Random courtesy delays between requests
//! - Listing pagination and per-post comment fetches
//! - Comment tree flattening
//! - Overall run coordination

mod comments;
mod coordinator;
mod fetcher;
mod flatten;
mod listing;
mod throttle;

pub use comments::fetch_comment_tree;
pub use coordinator::{run_harvest, Coordinator, Harvest};
pub use fetcher::{build_http_client, Fetcher};
pub use flatten::{flatten_comment_tree, FlattenLimits, Flattened};
pub use listing::{collect_posts, ListingOutcome};
pub use throttle::Throttle;

use crate::config::Config;
use crate::output::HarvestStats;
use crate::HarvestError;

/// Runs a complete harvest
///
/// This is the main entry point for a run. It will:
/// 1. Build the HTTP client and endpoint URLs
/// 2. Page through each subreddit's listing
/// 3. Fetch and flatten every collected post's comment tree
/// 4. Write the posts and comments files
///
/// # Arguments
///
/// * `config` - A validated configuration
///
/// # Returns
///
/// * `Ok(HarvestStats)` - Harvest completed; request failures are counted
///   in the stats rather than returned
/// * `Err(HarvestError)` - Setup or output writing failed
pub async fn harvest(config: Config) -> Result<HarvestStats, HarvestError> {
    run_harvest(config).await
}
