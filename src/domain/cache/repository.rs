//! Cache trait definition

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

use super::value::Retrieved;
use crate::domain::CacheError;

/// TTL attached to entries saved without an explicit override.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Key-value cache with store-owned TTL expiration.
///
/// This trait uses JSON strings internally to be dyn-compatible; use the
/// [`CacheExt`] helpers for typed get/save. Implementations must be safe for
/// concurrent use by multiple callers: the cache layer itself takes no
/// locks and relies on the store's per-command atomicity.
#[async_trait]
pub trait Cache: Send + Sync + Debug {
    /// Gets the raw JSON string stored at `key`.
    ///
    /// `Ok(None)` is the expected miss path, never an error. A read is
    /// idempotent and leaves TTL and entry presence untouched (no sliding
    /// expiration).
    async fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores a raw JSON string at `key` with the given TTL, unconditionally
    /// overwriting any existing entry (last-writer-wins).
    ///
    /// Returns whether the store acknowledged the write. An unacknowledged
    /// write is `Ok(false)`, left for the caller to judge.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, CacheError>;

    /// Liveness probe against the store. `Ok(true)` means the store answered
    /// affirmatively.
    async fn ping(&self) -> Result<bool, CacheError>;
}

/// Extension trait providing typed get/save operations.
pub trait CacheExt: Cache {
    /// Gets a typed value from the cache.
    ///
    /// A present entry that fails to parse as `V` is a
    /// [`CacheError::CorruptEntry`], never a miss. On success the value is
    /// returned as [`Retrieved`], which carries the hit marker.
    fn get<'a, V>(
        &'a self,
        key: &'a str,
    ) -> impl std::future::Future<Output = Result<Option<Retrieved<V>>, CacheError>> + Send
    where
        V: DeserializeOwned + Send,
    {
        async move {
            match self.get_raw(key).await? {
                Some(data) => {
                    let value: V = serde_json::from_str(&data)
                        .map_err(|e| CacheError::corrupt_entry(key, e.to_string()))?;
                    Ok(Some(Retrieved::new(value)))
                }
                None => Ok(None),
            }
        }
    }

    /// Serializes a value to JSON and stores it at `key` with the given TTL.
    ///
    /// A zero TTL is rejected with [`CacheError::InvalidTtl`] before any
    /// store write. Returns whether the store acknowledged the write.
    fn save<'a, V>(
        &'a self,
        key: &'a str,
        value: &'a V,
        ttl: Duration,
    ) -> impl std::future::Future<Output = Result<bool, CacheError>> + Send
    where
        V: Serialize + Send + Sync,
    {
        async move {
            if ttl.is_zero() {
                return Err(CacheError::invalid_ttl("TTL must be greater than zero"));
            }

            let data = serde_json::to_string(value).map_err(|e| {
                CacheError::backend(format!("failed to serialize cache value: {}", e))
            })?;

            self.set_raw(key, &data, ttl).await
        }
    }
}

// Blanket implementation for all types implementing Cache
impl<T: Cache + ?Sized> CacheExt for T {}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock cache for testing
    #[derive(Debug, Default)]
    pub struct MockCache {
        entries: Mutex<HashMap<String, (String, Duration)>>,
        error: Mutex<Option<String>>,
        refuse_writes: Mutex<bool>,
        unhealthy: Mutex<bool>,
    }

    impl MockCache {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_entry<V: Serialize>(self, key: &str, value: &V, ttl: Duration) -> Self {
            let json = serde_json::to_string(value).unwrap();
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), (json, ttl));
            self
        }

        /// Seeds a raw payload, bypassing serialization. Lets tests plant
        /// entries that are not valid JSON.
        pub fn with_raw_entry(self, key: &str, raw: &str) -> Self {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), (raw.to_string(), DEFAULT_TTL));
            self
        }

        pub fn with_error(self, error: impl Into<String>) -> Self {
            *self.error.lock().unwrap() = Some(error.into());
            self
        }

        /// Makes subsequent writes complete without acknowledgement.
        pub fn refusing_writes(self) -> Self {
            *self.refuse_writes.lock().unwrap() = true;
            self
        }

        /// Makes the liveness probe answer negatively.
        pub fn unhealthy(self) -> Self {
            *self.unhealthy.lock().unwrap() = true;
            self
        }

        pub fn entry_count(&self) -> usize {
            self.entries.lock().unwrap().len()
        }

        pub fn saved_ttl(&self, key: &str) -> Option<Duration> {
            self.entries.lock().unwrap().get(key).map(|(_, ttl)| *ttl)
        }

        fn check_error(&self) -> Result<(), CacheError> {
            if let Some(error) = self.error.lock().unwrap().clone() {
                return Err(CacheError::backend(error));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl Cache for MockCache {
        async fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError> {
            self.check_error()?;
            let entries = self.entries.lock().unwrap();

            Ok(entries.get(key).map(|(json, _)| json.clone()))
        }

        async fn set_raw(
            &self,
            key: &str,
            value: &str,
            ttl: Duration,
        ) -> Result<bool, CacheError> {
            self.check_error()?;

            if *self.refuse_writes.lock().unwrap() {
                return Ok(false);
            }

            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), (value.to_string(), ttl));
            Ok(true)
        }

        async fn ping(&self) -> Result<bool, CacheError> {
            self.check_error()?;
            Ok(!*self.unhealthy.lock().unwrap())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use serde::Deserialize;
        use serde_json::json;

        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        struct Payload {
            success: bool,
            message: String,
        }

        fn payload() -> Payload {
            Payload {
                success: true,
                message: "2 World".to_string(),
            }
        }

        #[tokio::test]
        async fn test_save_then_get_round_trips_with_marker() {
            let cache = MockCache::new();

            let saved = cache
                .save("/home:alice", &payload(), DEFAULT_TTL)
                .await
                .unwrap();
            assert!(saved);

            let retrieved = cache
                .get::<Payload>("/home:alice")
                .await
                .unwrap()
                .expect("entry should be present");

            assert_eq!(retrieved.value(), &payload());
            assert_eq!(
                serde_json::to_value(&retrieved).unwrap(),
                json!({"success": true, "message": "2 World", "cache": true})
            );
        }

        #[tokio::test]
        async fn test_get_missing_is_none_not_error() {
            let cache = MockCache::new();

            let result = cache.get::<Payload>("/home:never-saved").await.unwrap();
            assert!(result.is_none());
        }

        #[tokio::test]
        async fn test_get_non_json_payload_is_corrupt_entry() {
            let cache = MockCache::new().with_raw_entry("/home:alice", "not json at all");

            let result = cache.get::<Payload>("/home:alice").await;
            assert!(matches!(
                result,
                Err(CacheError::CorruptEntry { ref key, .. }) if key == "/home:alice"
            ));
        }

        #[tokio::test]
        async fn test_save_with_zero_ttl_writes_nothing() {
            let cache = MockCache::new();

            let result = cache.save("/home:alice", &payload(), Duration::ZERO).await;
            assert!(matches!(result, Err(CacheError::InvalidTtl { .. })));
            assert_eq!(cache.entry_count(), 0);
        }

        #[tokio::test]
        async fn test_unacknowledged_write_is_ok_false() {
            let cache = MockCache::new().refusing_writes();

            let saved = cache
                .save("/home:alice", &payload(), DEFAULT_TTL)
                .await
                .unwrap();
            assert!(!saved);
            assert_eq!(cache.entry_count(), 0);
        }

        #[tokio::test]
        async fn test_marker_never_persists_on_resave() {
            let cache = MockCache::new().with_entry("/home:alice", &payload(), DEFAULT_TTL);

            let retrieved = cache
                .get::<Payload>("/home:alice")
                .await
                .unwrap()
                .expect("entry should be present");

            cache
                .save("/home:bob", retrieved.value(), DEFAULT_TTL)
                .await
                .unwrap();

            let raw = cache.get_raw("/home:bob").await.unwrap().unwrap();
            let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
            assert!(stored.get("cache").is_none());
        }

        #[tokio::test]
        async fn test_save_records_ttl() {
            let cache = MockCache::new();
            let ttl = Duration::from_secs(3600);

            cache.save("/home:alice", &payload(), ttl).await.unwrap();
            assert_eq!(cache.saved_ttl("/home:alice"), Some(ttl));
        }

        #[tokio::test]
        async fn test_backend_error_propagates() {
            let cache = MockCache::new().with_error("boom");

            let result = cache.get::<Payload>("/home:alice").await;
            assert!(matches!(result, Err(CacheError::Backend { .. })));
        }

        #[tokio::test]
        async fn test_ping_reflects_health() {
            assert!(MockCache::new().ping().await.unwrap());
            assert!(!MockCache::new().unhealthy().ping().await.unwrap());
        }
    }
}
