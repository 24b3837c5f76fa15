//! Output records
//!
//! Field order is column order: both the CSV header and the JSON Lines keys
//! follow the struct declarations.

use crate::output::Record;
use crate::reddit::{
    bool_field, float_field, int_field, str_field, timestamp_field, Endpoints,
};
use serde::Serialize;
use serde_json::{Map, Value};

/// Body text the API substitutes for moderated or deleted comments
const REMOVED_BODIES: [&str; 2] = ["[removed]", "[deleted]"];

/// One collected post
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRow {
    pub subreddit: String,
    pub post_id: String,
    /// `t3_<post_id>`
    pub fullname: String,
    pub title: String,
    pub author: Option<String>,
    pub created_utc: Option<String>,
    pub score: Option<i64>,
    pub num_comments: Option<i64>,
    pub upvote_ratio: Option<f64>,
    pub over_18: Option<bool>,
    pub is_self: Option<bool>,
    pub link_flair_text: Option<String>,
    pub permalink: String,
    pub url: Option<String>,
    pub selftext: Option<String>,
}

impl Record for PostRow {
    const COLUMNS: &'static [&'static str] = &[
        "subreddit",
        "post_id",
        "fullname",
        "title",
        "author",
        "created_utc",
        "score",
        "num_comments",
        "upvote_ratio",
        "over_18",
        "is_self",
        "link_flair_text",
        "permalink",
        "url",
        "selftext",
    ];
}

impl PostRow {
    /// Builds a row from a `t3` payload
    ///
    /// Returns `None` when the payload carries no `id`.
    pub fn from_fields(
        subreddit: &str,
        fields: &Map<String, Value>,
        endpoints: &Endpoints,
    ) -> Option<Self> {
        let post_id = str_field(fields, "id").filter(|id| !id.is_empty())?;
        let fullname = str_field(fields, "name").unwrap_or_else(|| format!("t3_{}", post_id));
        let permalink = endpoints
            .absolute_permalink(&str_field(fields, "permalink").unwrap_or_default());

        Some(Self {
            subreddit: subreddit.to_string(),
            fullname,
            title: str_field(fields, "title").unwrap_or_default(),
            author: str_field(fields, "author"),
            created_utc: timestamp_field(fields, "created_utc"),
            score: int_field(fields, "score"),
            num_comments: int_field(fields, "num_comments"),
            upvote_ratio: float_field(fields, "upvote_ratio"),
            over_18: bool_field(fields, "over_18"),
            is_self: bool_field(fields, "is_self"),
            link_flair_text: str_field(fields, "link_flair_text"),
            permalink,
            url: str_field(fields, "url"),
            // Link posts carry an empty selftext
            selftext: str_field(fields, "selftext").filter(|s| !s.is_empty()),
            post_id,
        })
    }
}

/// One flattened comment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentRow {
    pub subreddit: String,
    pub post_id: String,
    pub comment_id: String,
    /// `t1_<comment_id>`
    pub fullname: String,
    /// Id of the post for top-level comments, else of the parent comment
    pub parent_id: String,
    pub parent_fullname: String,
    /// Nesting level from the flatten walk; top-level comments are 0
    pub depth: u32,
    pub author: Option<String>,
    pub created_utc: Option<String>,
    pub score: Option<i64>,
    pub body: Option<String>,
    pub permalink: String,
    pub is_submitter: Option<bool>,
    pub distinguished: Option<String>,
    pub stickied: Option<bool>,
    pub removed: bool,
}

/// Identity of a node that replies can point at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRef {
    pub id: String,
    pub fullname: String,
}

impl ParentRef {
    /// Parent reference for the top level of a post's tree
    pub fn of_post(post: &PostRow) -> Self {
        Self {
            id: post.post_id.clone(),
            fullname: post.fullname.clone(),
        }
    }
}

impl Record for CommentRow {
    const COLUMNS: &'static [&'static str] = &[
        "subreddit",
        "post_id",
        "comment_id",
        "fullname",
        "parent_id",
        "parent_fullname",
        "depth",
        "author",
        "created_utc",
        "score",
        "body",
        "permalink",
        "is_submitter",
        "distinguished",
        "stickied",
        "removed",
    ];
}

impl CommentRow {
    /// Builds a row from a `t1` payload
    ///
    /// Returns `None` when the payload carries no `id`.
    pub fn from_fields(
        post: &PostRow,
        parent: &ParentRef,
        depth: u32,
        fields: &Map<String, Value>,
        endpoints: &Endpoints,
    ) -> Option<Self> {
        let comment_id = str_field(fields, "id").filter(|id| !id.is_empty())?;
        let fullname = str_field(fields, "name").unwrap_or_else(|| format!("t1_{}", comment_id));
        let body = str_field(fields, "body");
        let removed = match body.as_deref() {
            None => true,
            Some(text) => REMOVED_BODIES.contains(&text),
        };

        Some(Self {
            subreddit: post.subreddit.clone(),
            post_id: post.post_id.clone(),
            fullname,
            parent_id: parent.id.clone(),
            parent_fullname: parent.fullname.clone(),
            depth,
            author: str_field(fields, "author"),
            created_utc: timestamp_field(fields, "created_utc"),
            score: int_field(fields, "score"),
            body,
            permalink: endpoints
                .absolute_permalink(&str_field(fields, "permalink").unwrap_or_default()),
            is_submitter: bool_field(fields, "is_submitter"),
            distinguished: str_field(fields, "distinguished"),
            stickied: bool_field(fields, "stickied"),
            removed,
            comment_id,
        })
    }

    /// Reference used by this comment's replies
    pub fn as_parent(&self) -> ParentRef {
        ParentRef {
            id: self.comment_id.clone(),
            fullname: self.fullname.clone(),
        }
    }
}
