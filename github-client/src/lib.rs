pub mod api;
pub mod cache;
pub mod stats;

pub use api::{CommentData, CommentUser, GitHubApiClient, IssueData, PullRequestRef};
pub use cache::CommentCache;
pub use stats::{FetchSnapshot, FetchStats};

#[cfg(test)]
mod tests;
