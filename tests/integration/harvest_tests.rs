//! Integration tests for the harvester
//!
//! These tests use wiremock to stand in for the listing and comments
//! endpoints and run the full fetch → flatten → write cycle end-to-end.

use serde_json::{json, Value};
use tempfile::TempDir;
use thread_ripple::config::{finalize, Config};
use thread_ripple::crawler::{run_harvest, Coordinator};
use thread_ripple::output::Record;
use thread_ripple::{CommentRow, ConfigError, HarvestError, PostRow};
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

/// Matches listing requests for the first page (no `after` cursor)
struct FirstPage;

impl Match for FirstPage {
    fn matches(&self, request: &Request) -> bool {
        request.url.query_pairs().all(|(key, _)| key != "after")
    }
}

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, subs: &[&str], post_limit: usize, dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.scrape.subreddits = subs.iter().map(|s| s.to_string()).collect();
    config.scrape.post_limit = post_limit;
    config.scrape.min_sleep = 0.0;
    config.scrape.max_sleep = 0.0;
    config.client.base_url = base_url.to_string();
    config.client.timeout_secs = 5;
    config.output.posts_path = dir.path().join("posts.csv").to_string_lossy().into_owned();
    config.output.comments_path = dir
        .path()
        .join("comments.csv")
        .to_string_lossy()
        .into_owned();
    finalize(config).expect("test config should be valid")
}

fn post_json(id: &str, subreddit: &str) -> Value {
    json!({
        "kind": "t3",
        "data": {
            "id": id,
            "name": format!("t3_{}", id),
            "subreddit": subreddit,
            "title": format!("Post {}", id),
            "author": "wanderer",
            "created_utc": 1700000000.0,
            "score": 10,
            "num_comments": 3,
            "permalink": format!("/r/{}/comments/{}/post/", subreddit, id),
            "selftext": "Any tips?"
        }
    })
}

fn listing_json(children: Vec<Value>, after: Option<&str>) -> Value {
    json!({
        "kind": "Listing",
        "data": {"after": after, "dist": children.len(), "children": children}
    })
}

fn comment_json(id: &str, replies: Vec<Value>) -> Value {
    let replies = if replies.is_empty() {
        json!("")
    } else {
        listing_json(replies, None)
    };
    json!({
        "kind": "t1",
        "data": {
            "id": id,
            "name": format!("t1_{}", id),
            "author": "local",
            "body": format!("Reply {}", id),
            "score": 2,
            "created_utc": 1700000100,
            "replies": replies
        }
    })
}

fn more_json() -> Value {
    json!({"kind": "more", "data": {"count": 7, "children": ["x1", "x2"]}})
}

fn comment_page_json(post: Value, top_level: Vec<Value>) -> Value {
    json!([listing_json(vec![post], None), listing_json(top_level, None)])
}

async fn mount_listing(server: &MockServer, subreddit: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/r/{}/new.json", subreddit)))
        .and(FirstPage)
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_comments(server: &MockServer, post_id: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/comments/{}.json", post_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

/// Answers every comments request with an empty tree
async fn mount_empty_comments(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/comments/[^/]+\.json$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            listing_json(vec![], None),
            listing_json(vec![], None)
        ])))
        .mount(server)
        .await;
}

fn comment_triples(comments: &[CommentRow], post_id: &str) -> Vec<(String, String, u32)> {
    comments
        .iter()
        .filter(|c| c.post_id == post_id)
        .map(|c| (c.comment_id.clone(), c.parent_id.clone(), c.depth))
        .collect()
}

fn triple(id: &str, parent: &str, depth: u32) -> (String, String, u32) {
    (id.to_string(), parent.to_string(), depth)
}

#[tokio::test]
async fn test_harvest_single_subreddit() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_listing(
        &server,
        "travel",
        listing_json(
            vec![post_json("p1", "travel"), post_json("p2", "travel")],
            Some("t3_p2"),
        ),
    )
    .await;

    mount_comments(
        &server,
        "p1",
        comment_page_json(
            post_json("p1", "travel"),
            vec![
                comment_json("c1", vec![comment_json("c2", vec![])]),
                comment_json("c3", vec![]),
            ],
        ),
    )
    .await;
    mount_comments(&server, "p2", comment_page_json(post_json("p2", "travel"), vec![])).await;

    let config = create_test_config(&server.uri(), &["travel"], 2, &dir);
    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let harvest = coordinator.run().await;

    let post_ids: Vec<_> = harvest.posts.iter().map(|p| p.post_id.as_str()).collect();
    assert_eq!(post_ids, vec!["p1", "p2"]);
    assert_eq!(
        harvest.posts[0].permalink,
        format!("{}/r/travel/comments/p1/post/", server.uri())
    );

    assert_eq!(
        comment_triples(&harvest.comments, "p1"),
        vec![
            triple("c1", "p1", 0),
            triple("c2", "c1", 1),
            triple("c3", "p1", 0),
        ]
    );
    assert!(comment_triples(&harvest.comments, "p2").is_empty());

    // Limit reached on the first page: no second listing request
    assert_eq!(harvest.stats.subreddits[0].pages, 1);
    assert_eq!(harvest.stats.requests, 3);
}

#[tokio::test]
async fn test_failed_subreddit_does_not_stop_run() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    // No retry: exactly one request for the failing listing
    Mock::given(method("GET"))
        .and(path("/r/x/new.json"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    mount_listing(
        &server,
        "y",
        listing_json(vec![post_json("py", "y")], None),
    )
    .await;
    mount_comments(
        &server,
        "py",
        comment_page_json(post_json("py", "y"), vec![comment_json("cy", vec![])]),
    )
    .await;

    let config = create_test_config(&server.uri(), &["x", "y"], 5, &dir);
    let mut coordinator = Coordinator::new(config).unwrap();
    let harvest = coordinator.run().await;

    assert!(harvest.posts.iter().all(|p| p.subreddit != "x"));
    assert_eq!(harvest.posts.len(), 1);
    assert_eq!(harvest.posts[0].subreddit, "y");
    assert_eq!(harvest.comments.len(), 1);
    assert_eq!(harvest.comments[0].parent_id, "py");

    let x = &harvest.stats.subreddits[0];
    assert!(x.skipped());
    assert!(x.listing_error.as_deref().unwrap().contains("500"));
    assert!(harvest.stats.subreddits[1].listing_error.is_none());
}

#[tokio::test]
async fn test_malformed_listing_is_skipped() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/r/travel/new.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body>whoa there, pardner!</body></html>")
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), &["travel"], 5, &dir);
    let mut coordinator = Coordinator::new(config).unwrap();
    let harvest = coordinator.run().await;

    assert!(harvest.posts.is_empty());
    assert!(harvest.comments.is_empty());
    assert!(harvest.stats.subreddits[0].skipped());
}

#[tokio::test]
async fn test_pagination_follows_cursor_until_limit() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_listing(
        &server,
        "travel",
        listing_json(
            vec![post_json("a", "travel"), post_json("b", "travel")],
            Some("t3_b"),
        ),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/r/travel/new.json"))
        .and(query_param("after", "t3_b"))
        .and(query_param("count", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing_json(
            vec![post_json("c", "travel"), post_json("d", "travel")],
            Some("t3_d"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    mount_empty_comments(&server).await;

    let config = create_test_config(&server.uri(), &["travel"], 3, &dir);
    let mut coordinator = Coordinator::new(config).unwrap();
    let harvest = coordinator.run().await;

    let post_ids: Vec<_> = harvest.posts.iter().map(|p| p.post_id.as_str()).collect();
    assert_eq!(post_ids, vec!["a", "b", "c"]);
    assert_eq!(harvest.stats.subreddits[0].pages, 2);
}

#[tokio::test]
async fn test_later_page_failure_keeps_earlier_posts() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_listing(
        &server,
        "travel",
        listing_json(
            vec![post_json("a", "travel"), post_json("b", "travel")],
            Some("t3_b"),
        ),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/r/travel/new.json"))
        .and(query_param("after", "t3_b"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    mount_comments(
        &server,
        "a",
        comment_page_json(post_json("a", "travel"), vec![comment_json("ca", vec![])]),
    )
    .await;
    mount_comments(&server, "b", comment_page_json(post_json("b", "travel"), vec![])).await;

    let config = create_test_config(&server.uri(), &["travel"], 10, &dir);
    let mut coordinator = Coordinator::new(config).unwrap();
    let harvest = coordinator.run().await;

    let post_ids: Vec<_> = harvest.posts.iter().map(|p| p.post_id.as_str()).collect();
    assert_eq!(post_ids, vec!["a", "b"]);
    assert_eq!(
        comment_triples(&harvest.comments, "a"),
        vec![triple("ca", "a", 0)]
    );

    let stats = &harvest.stats.subreddits[0];
    assert_eq!(stats.pages, 1);
    assert!(stats.listing_error.as_deref().unwrap().contains("500"));
    assert!(!stats.skipped());
}

#[tokio::test]
async fn test_oversized_delay_is_rejected() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let mut config = create_test_config(&server.uri(), &["travel"], 1, &dir);
    config.scrape.max_sleep = 1e20;

    let result = Coordinator::new(config);
    assert!(matches!(
        result,
        Err(HarvestError::Config(ConfigError::Validation(_)))
    ));
}

#[tokio::test]
async fn test_repeated_cursor_ends_listing() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_listing(
        &server,
        "travel",
        listing_json(vec![post_json("a", "travel")], Some("t3_a")),
    )
    .await;

    // Hands back the same cursor it was asked for
    Mock::given(method("GET"))
        .and(path("/r/travel/new.json"))
        .and(query_param("after", "t3_a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing_json(
            vec![post_json("a", "travel"), post_json("b", "travel")],
            Some("t3_a"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    mount_empty_comments(&server).await;

    let config = create_test_config(&server.uri(), &["travel"], 50, &dir);
    let mut coordinator = Coordinator::new(config).unwrap();
    let harvest = coordinator.run().await;

    let post_ids: Vec<_> = harvest.posts.iter().map(|p| p.post_id.as_str()).collect();
    assert_eq!(post_ids, vec!["a", "b"]);

    let stats = &harvest.stats.subreddits[0];
    assert_eq!(stats.pages, 2);
    assert_eq!(stats.duplicate_posts, 1);
    assert!(stats.listing_error.is_none());
}

#[tokio::test]
async fn test_comment_failure_keeps_post_row() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_listing(
        &server,
        "travel",
        listing_json(
            vec![post_json("p1", "travel"), post_json("p2", "travel")],
            None,
        ),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/comments/p1.json"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;
    mount_comments(
        &server,
        "p2",
        comment_page_json(post_json("p2", "travel"), vec![comment_json("c9", vec![])]),
    )
    .await;

    let config = create_test_config(&server.uri(), &["travel"], 10, &dir);
    let mut coordinator = Coordinator::new(config).unwrap();
    let harvest = coordinator.run().await;

    let post_ids: Vec<_> = harvest.posts.iter().map(|p| p.post_id.as_str()).collect();
    assert_eq!(post_ids, vec!["p1", "p2"]);
    assert_eq!(comment_triples(&harvest.comments, "p1"), vec![]);
    assert_eq!(
        comment_triples(&harvest.comments, "p2"),
        vec![triple("c9", "p2", 0)]
    );
    assert_eq!(harvest.stats.comment_failures(), 1);
}

#[tokio::test]
async fn test_cap_and_placeholders() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_listing(
        &server,
        "travel",
        listing_json(
            vec![post_json("p1", "travel"), post_json("p2", "travel")],
            None,
        ),
    )
    .await;

    mount_comments(
        &server,
        "p1",
        comment_page_json(
            post_json("p1", "travel"),
            vec![
                comment_json("c1", vec![comment_json("c2", vec![]), more_json()]),
                comment_json("c3", vec![]),
                comment_json("c4", vec![]),
                more_json(),
            ],
        ),
    )
    .await;
    mount_comments(
        &server,
        "p2",
        comment_page_json(
            post_json("p2", "travel"),
            vec![more_json(), comment_json("d1", vec![])],
        ),
    )
    .await;

    let mut config = create_test_config(&server.uri(), &["travel"], 10, &dir);
    config.scrape.max_comments_per_post = Some(3);
    let mut coordinator = Coordinator::new(config).unwrap();
    let harvest = coordinator.run().await;

    // Cap applies per post: p2 is processed independently after p1 hit it
    assert_eq!(
        comment_triples(&harvest.comments, "p1"),
        vec![
            triple("c1", "p1", 0),
            triple("c2", "c1", 1),
            triple("c3", "p1", 0),
        ]
    );
    assert_eq!(
        comment_triples(&harvest.comments, "p2"),
        vec![triple("d1", "p2", 0)]
    );
    assert!(harvest.comments.iter().all(|c| !c.comment_id.starts_with('x')));
}

#[tokio::test]
async fn test_post_ids_unique_across_subreddits() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_listing(
        &server,
        "travel",
        listing_json(vec![post_json("p1", "travel")], None),
    )
    .await;
    mount_listing(
        &server,
        "solotravel",
        listing_json(
            vec![post_json("p1", "travel"), post_json("s1", "solotravel")],
            None,
        ),
    )
    .await;
    mount_empty_comments(&server).await;

    let config = create_test_config(&server.uri(), &["travel", "solotravel"], 10, &dir);
    let mut coordinator = Coordinator::new(config).unwrap();
    let harvest = coordinator.run().await;

    let post_ids: Vec<_> = harvest.posts.iter().map(|p| p.post_id.as_str()).collect();
    assert_eq!(post_ids, vec!["p1", "s1"]);
    assert_eq!(harvest.stats.subreddits[1].duplicate_posts, 1);
}

#[tokio::test]
async fn test_run_harvest_writes_files() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_listing(
        &server,
        "travel",
        listing_json(vec![post_json("p1", "travel")], None),
    )
    .await;
    mount_comments(
        &server,
        "p1",
        comment_page_json(
            post_json("p1", "travel"),
            vec![comment_json("c1", vec![comment_json("c2", vec![])])],
        ),
    )
    .await;

    let mut config = create_test_config(&server.uri(), &["travel"], 5, &dir);
    let posts_path = dir.path().join("out/posts.csv");
    let comments_path = dir.path().join("out/comments.jsonl");
    config.output.posts_path = posts_path.to_string_lossy().into_owned();
    config.output.comments_path = comments_path.to_string_lossy().into_owned();

    // A previous run's file is replaced, not appended to
    std::fs::create_dir_all(dir.path().join("out")).unwrap();
    std::fs::write(&comments_path, "{\"stale\":true}\n").unwrap();

    let stats = run_harvest(config).await.expect("Harvest failed");
    assert_eq!(stats.posts_written, 1);
    assert_eq!(stats.comments_written, 2);

    let posts_csv = std::fs::read_to_string(&posts_path).unwrap();
    let mut lines = posts_csv.lines();
    assert_eq!(lines.next(), Some(PostRow::COLUMNS.join(",").as_str()));
    let row = lines.next().unwrap();
    assert!(row.starts_with("travel,p1,t3_p1,Post p1,wanderer,2023-11-14T22:13:20+00:00,10,3,"));
    assert!(lines.next().is_none());

    let comments_jsonl = std::fs::read_to_string(&comments_path).unwrap();
    let rows: Vec<Value> = comments_jsonl
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["comment_id"], "c1");
    assert_eq!(rows[0]["parent_fullname"], "t3_p1");
    assert_eq!(rows[1]["comment_id"], "c2");
    assert_eq!(rows[1]["parent_id"], "c1");
    assert_eq!(rows[1]["depth"], 1);
    assert_eq!(rows[1]["removed"], false);
}
