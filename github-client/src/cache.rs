use std::collections::HashMap;
use std::sync::Arc;

use daylog_core::Comment;
use tokio::sync::RwLock;

/// Per-issue comment cache.
///
/// Consulted before issuing a fetch for the same issue number. Two requests
/// racing for an uncached key may both hit the network; both results are
/// equivalent, and the second insert simply overwrites the first. No
/// in-flight de-duplication is attempted.
#[derive(Debug, Default)]
pub struct CommentCache {
    entries: RwLock<HashMap<u64, Arc<Vec<Comment>>>>,
}

impl CommentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, issue_number: u64) -> Option<Arc<Vec<Comment>>> {
        self.entries.read().await.get(&issue_number).cloned()
    }

    pub async fn insert(&self, issue_number: u64, comments: Vec<Comment>) -> Arc<Vec<Comment>> {
        let comments = Arc::new(comments);
        self.entries
            .write()
            .await
            .insert(issue_number, Arc::clone(&comments));
        comments
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
