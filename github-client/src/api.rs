use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use daylog_core::{AppConfig, Comment, CoreError, GitHubApiError, RawIssue};
use reqwest::{Client, Method, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::cache::CommentCache;
use crate::stats::FetchStats;

const PAGE_SIZE: &str = "100";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueData {
    pub id: u64,
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
    pub comments: u32,
    pub html_url: String,
    /// Present when the "issue" is actually a pull request; such records
    /// are filtered out at the ingestion boundary.
    #[serde(default)]
    pub pull_request: Option<PullRequestRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestRef {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentData {
    pub id: u64,
    pub user: CommentUser,
    #[serde(default)]
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentUser {
    pub login: String,
    #[serde(default)]
    pub avatar_url: String,
}

#[derive(Debug)]
pub struct GitHubApiClient {
    http_client: Client,
    base_url: String,
    repo_owner: String,
    repo_name: String,
    comment_cache: CommentCache,
    stats: Arc<FetchStats>,
}

impl GitHubApiClient {
    pub fn new(config: &AppConfig) -> Self {
        let http_client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            base_url: config.api_base.trim_end_matches('/').to_string(),
            repo_owner: config.repo_owner.clone(),
            repo_name: config.repo_name.clone(),
            comment_cache: CommentCache::new(),
            stats: Arc::new(FetchStats::default()),
        }
    }

    async fn make_request(
        &self,
        method: Method,
        endpoint: &str,
        query_params: &[(&str, &str)],
    ) -> Result<Response, CoreError> {
        let url = format!("{}{}", self.base_url, endpoint);

        let mut request_builder = self
            .http_client
            .request(method.clone(), &url)
            .header("Accept", "application/vnd.github+json");
        if !query_params.is_empty() {
            request_builder = request_builder.query(query_params);
        }

        debug!("Making GitHub API request: {} {}", method, endpoint);
        let response = match request_builder.send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Network error for {} {}: {}", method, endpoint, e);
                self.stats.record_request(false).await;
                if e.is_timeout() {
                    return Err(CoreError::GitHubApi(GitHubApiError::RequestTimeout));
                }
                return Err(CoreError::Network(e));
            }
        };

        let status = response.status();
        if status.is_success() {
            self.stats.record_request(true).await;
            debug!("Request successful: {} {}", status, endpoint);
            return Ok(response);
        }

        self.stats.record_request(false).await;
        error!("Request failed with status: {} for {}", status, endpoint);

        let rate_limited = status.as_u16() == 429
            || (status.as_u16() == 403 && remaining_quota(&response) == Some(0));
        if rate_limited {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(CoreError::GitHubApi(GitHubApiError::RateLimitExceeded {
                retry_after,
            }));
        }

        let error = match status.as_u16() {
            403 => GitHubApiError::Forbidden {
                resource: endpoint.to_string(),
            },
            404 => GitHubApiError::NotFound {
                resource: endpoint.to_string(),
            },
            code if status.is_server_error() => GitHubApiError::ServerError { status_code: code },
            _ => GitHubApiError::InvalidResponse {
                details: format!("unexpected status {status} for {endpoint}"),
            },
        };
        Err(CoreError::GitHubApi(error))
    }

    /// Fetches the full issue list ("all states, full page size") and drops
    /// pull-request-flagged records at this boundary, so downstream code
    /// only ever sees real issues.
    pub async fn fetch_issues(&self) -> Result<Vec<RawIssue>, CoreError> {
        let endpoint = format!("/repos/{}/{}/issues", self.repo_owner, self.repo_name);
        let response = self
            .make_request(
                Method::GET,
                &endpoint,
                &[("state", "all"), ("per_page", PAGE_SIZE)],
            )
            .await?;

        let issues: Vec<IssueData> = response.json().await.map_err(|e| {
            error!("Failed to parse issue list: {}", e);
            CoreError::GitHubApi(GitHubApiError::InvalidResponse {
                details: format!(
                    "Failed to parse issues for {}/{}",
                    self.repo_owner, self.repo_name
                ),
            })
        })?;

        let total = issues.len();
        let posts: Vec<RawIssue> = issues
            .into_iter()
            .filter(|issue| issue.pull_request.is_none())
            .map(RawIssue::from)
            .collect();

        info!(
            "Retrieved {} issues from {}/{} ({} pull requests filtered)",
            posts.len(),
            self.repo_owner,
            self.repo_name,
            total - posts.len()
        );
        Ok(posts)
    }

    /// Fetches comments for one issue, ordered ascending by creation time.
    /// The per-issue cache is consulted first; a successful fetch populates
    /// it, so the same issue number is requested at most once per session.
    pub async fn fetch_comments(&self, issue_number: u64) -> Result<Arc<Vec<Comment>>, CoreError> {
        if let Some(cached) = self.comment_cache.get(issue_number).await {
            debug!(issue_number, "comment cache hit");
            self.stats.record_cache_hit().await;
            return Ok(cached);
        }

        let endpoint = format!(
            "/repos/{}/{}/issues/{}/comments",
            self.repo_owner, self.repo_name, issue_number
        );
        let response = self
            .make_request(Method::GET, &endpoint, &[("per_page", PAGE_SIZE)])
            .await?;

        let raw: Vec<CommentData> = response.json().await.map_err(|e| {
            error!("Failed to parse comments: {}", e);
            CoreError::GitHubApi(GitHubApiError::InvalidResponse {
                details: format!("Failed to parse comments for issue #{issue_number}"),
            })
        })?;

        let mut comments: Vec<Comment> = raw.into_iter().map(Comment::from).collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        info!(
            "Retrieved {} comments for issue #{}",
            comments.len(),
            issue_number
        );
        Ok(self.comment_cache.insert(issue_number, comments).await)
    }

    pub async fn stats(&self) -> crate::stats::FetchSnapshot {
        self.stats.snapshot().await
    }
}

fn remaining_quota(response: &Response) -> Option<u64> {
    response
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
}

impl From<IssueData> for RawIssue {
    fn from(issue: IssueData) -> Self {
        Self {
            id: issue.id,
            number: issue.number,
            title: issue.title,
            body: issue.body.unwrap_or_default(),
            created_at: issue.created_at,
            comment_count: issue.comments,
            source_url: issue.html_url,
        }
    }
}

impl From<CommentData> for Comment {
    fn from(comment: CommentData) -> Self {
        Self {
            id: comment.id,
            author: comment.user.login,
            avatar_url: comment.user.avatar_url,
            body: comment.body.unwrap_or_default(),
            created_at: comment.created_at,
        }
    }
}
