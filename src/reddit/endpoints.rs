//! URL construction for the listing and comments endpoints

use crate::config::{CommentSort, ListingSort, TimeWindow};
use crate::ConfigError;
use url::Url;

/// Page size requested from the listing endpoint (the API maximum)
pub const LISTING_PAGE_SIZE: u32 = 100;

/// Number of comments requested per comment tree
pub const COMMENT_LIMIT: u32 = 500;

/// Builds endpoint URLs relative to a site root
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    /// Creates endpoints for the given base URL (e.g. `https://www.reddit.com`)
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let base = Url::parse(base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

        if base.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl(format!(
                "base_url '{}' cannot carry a path",
                base_url
            )));
        }

        Ok(Self { base })
    }

    /// Listing page URL: `/r/{sub}/{sort}.json`
    ///
    /// `after` and `count` are only sent once a cursor is known.
    pub fn listing_url(
        &self,
        subreddit: &str,
        sort: ListingSort,
        time_window: TimeWindow,
        after: Option<&str>,
        count: usize,
    ) -> Url {
        let file = format!("{}.json", sort.as_str());
        let mut url = self.with_path(&["r", subreddit, &file]);
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("raw_json", "1")
                .append_pair("limit", &LISTING_PAGE_SIZE.to_string())
                .append_pair("t", time_window.as_str());
            if let Some(after) = after {
                query
                    .append_pair("after", after)
                    .append_pair("count", &count.to_string());
            }
        }
        url
    }

    /// Comment tree URL: `/comments/{post_id}.json`
    pub fn comments_url(&self, post_id: &str, sort: CommentSort) -> Url {
        let file = format!("{}.json", post_id);
        let mut url = self.with_path(&["comments", &file]);
        url.query_pairs_mut()
            .append_pair("raw_json", "1")
            .append_pair("sort", sort.as_str())
            .append_pair("limit", &COMMENT_LIMIT.to_string());
        url
    }

    /// Makes a site-relative permalink absolute
    pub fn absolute_permalink(&self, permalink: &str) -> String {
        if permalink.starts_with('/') {
            format!("{}{}", self.origin(), permalink)
        } else {
            permalink.to_string()
        }
    }

    fn origin(&self) -> String {
        self.base.as_str().trim_end_matches('/').to_string()
    }

    fn with_path(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}
