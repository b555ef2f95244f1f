use chrono::{TimeZone, Utc};
use daylog_core::{AppConfig, Comment, RawIssue};

use crate::{CommentCache, CommentData, FetchStats, GitHubApiClient, IssueData};

const ISSUE_JSON: &str = r###"{
    "id": 3001,
    "number": 14,
    "title": "Daily Log - Day 14",
    "body": "## Summary\nShipped the excerpt generator.",
    "created_at": "2026-02-01T08:30:00Z",
    "comments": 2,
    "html_url": "https://github.com/jarvis-clawdbot/jarvis-daily-log/issues/14",
    "state": "open",
    "labels": []
}"###;

const PULL_REQUEST_JSON: &str = r#"{
    "id": 3002,
    "number": 15,
    "title": "Fix typo",
    "body": null,
    "created_at": "2026-02-02T10:00:00Z",
    "comments": 0,
    "html_url": "https://github.com/jarvis-clawdbot/jarvis-daily-log/pull/15",
    "pull_request": { "url": "https://api.github.com/repos/o/r/pulls/15" }
}"#;

const COMMENT_JSON: &str = r#"{
    "id": 555,
    "user": { "login": "reviewer", "avatar_url": "https://avatars.example/555" },
    "body": "Nice streak!",
    "created_at": "2026-02-01T12:00:00Z"
}"#;

#[test]
fn issue_wire_type_decodes_github_shape() {
    let issue: IssueData = serde_json::from_str(ISSUE_JSON).unwrap();
    assert_eq!(issue.id, 3001);
    assert_eq!(issue.number, 14);
    assert!(issue.pull_request.is_none());
    assert_eq!(
        issue.created_at,
        Utc.with_ymd_and_hms(2026, 2, 1, 8, 30, 0).unwrap()
    );
}

#[test]
fn pull_request_flag_survives_decoding() {
    let issue: IssueData = serde_json::from_str(PULL_REQUEST_JSON).unwrap();
    assert!(issue.pull_request.is_some());
    // Null body is a valid state, not an error.
    assert!(issue.body.is_none());
}

#[test]
fn issue_conversion_defaults_missing_body() {
    let issue: IssueData = serde_json::from_str(PULL_REQUEST_JSON).unwrap();
    let raw: RawIssue = issue.into();
    assert_eq!(raw.body, "");
    assert_eq!(raw.comment_count, 0);
    assert_eq!(raw.source_url, "https://github.com/jarvis-clawdbot/jarvis-daily-log/pull/15");
}

#[test]
fn comment_wire_type_decodes_and_converts() {
    let data: CommentData = serde_json::from_str(COMMENT_JSON).unwrap();
    let comment: Comment = data.into();
    assert_eq!(comment.id, 555);
    assert_eq!(comment.author, "reviewer");
    assert_eq!(comment.body, "Nice streak!");
}

#[test]
fn client_creation_from_config() {
    let client = GitHubApiClient::new(&AppConfig::default());
    let stats = tokio_test::block_on(client.stats());
    assert_eq!(stats.total_requests, 0);
}

#[tokio::test]
async fn comment_cache_returns_inserted_entries() {
    let cache = CommentCache::new();
    assert!(cache.get(14).await.is_none());

    let comment: Comment = serde_json::from_str::<CommentData>(COMMENT_JSON)
        .unwrap()
        .into();
    let stored = cache.insert(14, vec![comment]).await;
    assert_eq!(stored.len(), 1);

    let hit = cache.get(14).await.expect("cached entry");
    assert_eq!(hit[0].author, "reviewer");
    assert_eq!(cache.len().await, 1);
    assert!(cache.get(99).await.is_none());
}

#[tokio::test]
async fn fetch_stats_count_outcomes() {
    let stats = FetchStats::default();
    stats.record_request(true).await;
    stats.record_request(false).await;
    stats.record_cache_hit().await;

    let snapshot = stats.snapshot().await;
    assert_eq!(snapshot.total_requests, 2);
    assert_eq!(snapshot.successful_requests, 1);
    assert_eq!(snapshot.failed_requests, 1);
    assert_eq!(snapshot.cache_hits, 1);
}
