use serde::Serialize;
use tokio::sync::RwLock;

/// Point-in-time view of the client's request counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FetchSnapshot {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub cache_hits: u64,
}

#[derive(Debug, Default)]
pub struct FetchStats {
    inner: RwLock<FetchSnapshot>,
}

impl FetchStats {
    pub async fn record_request(&self, success: bool) {
        let mut snapshot = self.inner.write().await;
        snapshot.total_requests += 1;
        if success {
            snapshot.successful_requests += 1;
        } else {
            snapshot.failed_requests += 1;
        }
    }

    pub async fn record_cache_hit(&self) {
        self.inner.write().await.cache_hits += 1;
    }

    pub async fn snapshot(&self) -> FetchSnapshot {
        *self.inner.read().await
    }
}
