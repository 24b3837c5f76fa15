//! Paginated listing walk for a single subreddit

use crate::config::ScrapeConfig;
use crate::crawler::fetcher::Fetcher;
use crate::model::PostRow;
use crate::reddit::{parse_listing, Endpoints, KIND_POST};
use crate::FetchError;
use std::collections::HashSet;

/// Result of walking one subreddit's listing
#[derive(Debug, Default)]
pub struct ListingOutcome {
    /// Posts collected, in listing order
    pub posts: Vec<PostRow>,

    /// Pages successfully fetched
    pub pages: usize,

    /// Posts skipped because their id was already collected this run
    pub duplicates: usize,

    /// The failure that ended pagination early, if any
    pub error: Option<FetchError>,
}

/// Collects up to `config.post_limit` posts from a subreddit
///
/// Pagination stops when:
/// - the limit is reached
/// - a page has no children or no `after` cursor
/// - the `after` cursor repeats a cursor already followed
/// - a request fails or returns something that is not a listing
///
/// Failures are not propagated: posts from earlier pages are kept and the
/// error is recorded in the outcome. `seen` holds post ids collected so far
/// in the run and is updated in place.
pub async fn collect_posts(
    fetcher: &mut Fetcher,
    endpoints: &Endpoints,
    config: &ScrapeConfig,
    subreddit: &str,
    seen: &mut HashSet<String>,
) -> ListingOutcome {
    let mut outcome = ListingOutcome::default();
    let mut after: Option<String> = None;
    let mut followed_cursors: HashSet<String> = HashSet::new();
    let mut count = 0usize;

    while outcome.posts.len() < config.post_limit {
        let url = endpoints.listing_url(
            subreddit,
            config.sort,
            config.time_window,
            after.as_deref(),
            count,
        );
        tracing::info!(
            "r/{} page {} (after={})",
            subreddit,
            outcome.pages + 1,
            after.as_deref().unwrap_or("none")
        );

        let value = match fetcher.get_json(&url).await {
            Ok(value) => value,
            Err(e) => {
                if e.is_blocked() {
                    tracing::warn!("Blocked while listing r/{}: {}", subreddit, e);
                } else {
                    tracing::warn!("Listing request failed for r/{}: {}", subreddit, e);
                }
                outcome.error = Some(e);
                break;
            }
        };

        let listing = match parse_listing(&value) {
            Ok(listing) => listing,
            Err(message) => {
                tracing::warn!("Malformed listing for r/{}: {}", subreddit, message);
                outcome.error = Some(FetchError::Malformed {
                    url: url.to_string(),
                    message,
                });
                break;
            }
        };
        outcome.pages += 1;

        if listing.children.is_empty() {
            tracing::debug!("r/{} listing exhausted", subreddit);
            break;
        }

        for child in listing.children.iter().filter(|c| c.kind == KIND_POST) {
            let Some(post) = child
                .fields()
                .and_then(|fields| PostRow::from_fields(subreddit, fields, endpoints))
            else {
                continue;
            };

            if !seen.insert(post.post_id.clone()) {
                outcome.duplicates += 1;
                continue;
            }

            outcome.posts.push(post);
            if outcome.posts.len() >= config.post_limit {
                break;
            }
        }

        count += listing.children.len();

        match listing.after.filter(|cursor| !cursor.is_empty()) {
            Some(cursor) => {
                if !followed_cursors.insert(cursor.clone()) {
                    tracing::info!(
                        "r/{} returned cursor {} again, treating as end of listing",
                        subreddit,
                        cursor
                    );
                    break;
                }
                after = Some(cursor);
            }
            None => break,
        }
    }

    outcome
}
