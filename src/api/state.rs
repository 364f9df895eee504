//! Application state for shared services

use std::sync::Arc;
use std::time::Duration;

use crate::domain::cache::Cache;

/// Application state shared across request handlers.
///
/// The cache client is constructed once at startup and injected here;
/// handlers never reach for process-wide state.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<dyn Cache>,
    /// TTL attached to cache writes performed by handlers.
    pub cache_ttl: Duration,
}

impl AppState {
    pub fn new(cache: Arc<dyn Cache>, cache_ttl: Duration) -> Self {
        Self { cache, cache_ttl }
    }
}
