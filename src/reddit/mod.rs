//! Remote API surface: wire types and endpoint URLs
//!
//! This module knows the shape of the two public endpoints the harvester
//! talks to:
//! - the listing endpoint, a paginated page of posts per subreddit
//! - the comments endpoint, a single post followed by its reply tree

mod endpoints;
mod thing;

pub use endpoints::{Endpoints, COMMENT_LIMIT, LISTING_PAGE_SIZE};
pub use thing::{
    bool_field, float_field, int_field, parse_comment_page, parse_listing, replies_of,
    str_field, timestamp_field, Listing, Thing, KIND_COMMENT, KIND_MORE, KIND_POST,
};
