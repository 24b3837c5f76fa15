//! Per-post comment tree fetch

use crate::config::CommentSort;
use crate::crawler::fetcher::Fetcher;
use crate::reddit::{parse_comment_page, Endpoints, Thing};
use crate::{FetchError, FetchResult};

/// Fetches the top level of a post's reply tree
///
/// Nested replies travel inside each node's `replies` field; placeholders
/// for replies the API left out are returned untouched.
pub async fn fetch_comment_tree(
    fetcher: &mut Fetcher,
    endpoints: &Endpoints,
    post_id: &str,
    sort: CommentSort,
) -> FetchResult<Vec<Thing>> {
    let url = endpoints.comments_url(post_id, sort);
    let value = fetcher.get_json(&url).await?;

    parse_comment_page(&value).map_err(|message| FetchError::Malformed {
        url: url.to_string(),
        message,
    })
}
