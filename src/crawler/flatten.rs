//! Comment tree flattening
//!
//! Converts a nested reply tree into rows in pre-order: every comment is
//! emitted before its replies, and siblings keep the order the API returned
//! them in. A row's parent is therefore always the post or a row emitted
//! earlier for the same post.

use crate::model::{CommentRow, ParentRef, PostRow};
use crate::reddit::{replies_of, Endpoints, Thing};

/// Per-post limits on the flatten walk
#[derive(Debug, Clone, Copy, Default)]
pub struct FlattenLimits {
    /// Stop after this many rows
    pub max_comments: Option<usize>,

    /// Skip nodes nested deeper than this (top level is depth 0)
    pub max_depth: Option<u32>,
}

/// Rows produced for one post
#[derive(Debug, Clone, Default)]
pub struct Flattened {
    pub comments: Vec<CommentRow>,

    /// "Load more" placeholders seen (and left unresolved) during the walk
    pub placeholders: usize,
}

/// Flattens a post's comment tree into rows
///
/// `top_level` is the children of the comment listing. Kind `t1` nodes
/// become rows; `more` placeholders are counted and skipped; anything else
/// is ignored. Nodes without an `id` are dropped along with their replies.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use thread_ripple::crawler::{flatten_comment_tree, FlattenLimits};
/// use thread_ripple::reddit::{parse_comment_page, Endpoints};
/// use thread_ripple::PostRow;
///
/// let endpoints = Endpoints::new("https://www.reddit.com").unwrap();
/// let post_data = json!({"id": "p1"});
/// let post = PostRow::from_fields("travel", post_data.as_object().unwrap(), &endpoints).unwrap();
///
/// let page = json!([
///     {"kind": "Listing", "data": {"children": []}},
///     {"kind": "Listing", "data": {"children": [
///         {"kind": "t1", "data": {"id": "c1", "body": "hi", "replies": ""}}
///     ]}}
/// ]);
/// let tree = parse_comment_page(&page).unwrap();
///
/// let flat = flatten_comment_tree(&post, tree, FlattenLimits::default(), &endpoints);
/// assert_eq!(flat.comments[0].parent_id, "p1");
/// ```
pub fn flatten_comment_tree(
    post: &PostRow,
    top_level: Vec<Thing>,
    limits: FlattenLimits,
    endpoints: &Endpoints,
) -> Flattened {
    let mut out = Flattened::default();
    let cap = limits.max_comments.unwrap_or(usize::MAX);
    let within_depth = |depth: u32| limits.max_depth.map_or(true, |max| depth <= max);

    // Explicit stack instead of recursion: reply chains can be hundreds deep
    let root = ParentRef::of_post(post);
    let mut stack: Vec<(Thing, u32, ParentRef)> = top_level
        .into_iter()
        .rev()
        .map(|node| (node, 0, root.clone()))
        .collect();

    while out.comments.len() < cap {
        let Some((node, depth, parent)) = stack.pop() else {
            break;
        };

        if node.is_placeholder() {
            out.placeholders += 1;
            continue;
        }

        if !node.is_comment() || !within_depth(depth) {
            continue;
        }

        let Some(fields) = node.fields() else {
            continue;
        };

        let Some(row) = CommentRow::from_fields(post, &parent, depth, fields, endpoints) else {
            continue;
        };

        let next_depth = depth + 1;
        if within_depth(next_depth) {
            let own_ref = row.as_parent();
            for reply in replies_of(fields).into_iter().rev() {
                stack.push((reply, next_depth, own_ref.clone()));
            }
        }

        out.comments.push(row);
    }

    out
}
