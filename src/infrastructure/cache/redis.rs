//! Redis cache implementation

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tracing::{info, warn};

use crate::domain::CacheError;
use crate::domain::cache::Cache;

/// Reaction to a store that accepts connections but answers the startup
/// liveness probe negatively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegradedPolicy {
    /// Treat a failed probe like an unreachable store.
    Fail,
    /// Re-probe with a fixed backoff before giving up.
    Retry { attempts: u32, backoff: Duration },
}

impl Default for DegradedPolicy {
    fn default() -> Self {
        Self::Fail
    }
}

/// Configuration for the Redis cache connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisCacheConfig {
    /// Store network address
    pub host: String,
    /// Store network port
    pub port: u16,
    /// Logical database index
    pub db: i64,
    /// What to do on a non-affirmative liveness probe
    pub degraded: DegradedPolicy,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            db: 0,
            degraded: DegradedPolicy::default(),
        }
    }
}

impl RedisCacheConfig {
    /// Reads `STORE_HOST`, `STORE_PORT` and `STORE_DB` from the environment.
    /// Unset variables fall back to `localhost`, `6379` and `0`; values that
    /// do not parse are configuration errors rather than silent fallbacks.
    pub fn from_env() -> Result<Self, CacheError> {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("STORE_HOST") {
            config.host = host;
        }

        if let Ok(port) = std::env::var("STORE_PORT") {
            config.port = port.parse().map_err(|_| {
                CacheError::configuration(format!("invalid STORE_PORT '{}'", port))
            })?;
        }

        if let Ok(db) = std::env::var("STORE_DB") {
            config.db = db.parse().map_err(|_| {
                CacheError::configuration(format!("invalid STORE_DB '{}'", db))
            })?;
        }

        Ok(config)
    }

    /// Sets the degraded-probe policy
    pub fn with_degraded_policy(mut self, policy: DegradedPolicy) -> Self {
        self.degraded = policy;
        self
    }

    /// Connection URL in the form `redis://host:port/db`
    pub fn url(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.db)
    }
}

/// Redis-backed [`Cache`].
///
/// Holds a single [`ConnectionManager`] for the lifetime of the process;
/// each operation clones the manager, which multiplexes network access
/// internally, so the cache is safe for concurrent use without extra
/// locking. Construction verifies liveness before the client is handed out:
/// a client that cannot reach a healthy store is never returned.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
    config: RedisCacheConfig,
}

impl fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCache")
            .field("config", &self.config)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisCache {
    /// Connects to the store and probes it with `PING`.
    ///
    /// An unreachable store is a [`CacheError::Connection`]; a reachable
    /// store that fails the probe is handled per the configured
    /// [`DegradedPolicy`] and ends in [`CacheError::Unhealthy`]. Either way
    /// the error is returned, not acted on; the caller decides whether it
    /// terminates the process.
    pub async fn connect(config: RedisCacheConfig) -> Result<Self, CacheError> {
        let url = config.url();

        let client = Client::open(url.as_str()).map_err(|e| {
            CacheError::configuration(format!("invalid store URL '{}': {}", url, e))
        })?;

        let connection = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::connection(format!("failed to connect to '{}': {}", url, e))
        })?;

        let cache = Self { connection, config };
        cache.verify_liveness().await?;

        info!(%url, "store connection established");
        Ok(cache)
    }

    async fn verify_liveness(&self) -> Result<(), CacheError> {
        let (attempts, backoff) = match self.config.degraded {
            DegradedPolicy::Fail => (1, Duration::ZERO),
            DegradedPolicy::Retry { attempts, backoff } => (attempts.max(1), backoff),
        };

        for remaining in (0..attempts).rev() {
            match self.ping().await {
                Ok(true) => return Ok(()),
                Ok(false) if remaining > 0 => {
                    warn!(remaining, "store failed liveness probe, retrying");
                    tokio::time::sleep(backoff).await;
                }
                Ok(false) => {}
                // A command failure during bootstrap means the store is not
                // usable at all; report it as a connection failure.
                Err(CacheError::Backend { message }) => {
                    return Err(CacheError::connection(message));
                }
                Err(e) => return Err(e),
            }
        }

        Err(CacheError::unhealthy(
            "store did not answer the liveness probe affirmatively",
        ))
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.connection.clone();

        let bytes: Option<Vec<u8>> = conn
            .get(key)
            .await
            .map_err(|e| CacheError::backend(format!("GET '{}' failed: {}", key, e)))?;

        match bytes {
            Some(bytes) => {
                let text = String::from_utf8(bytes).map_err(|e| {
                    CacheError::corrupt_entry(key, format!("stored bytes are not UTF-8: {}", e))
                })?;
                Ok(Some(text))
            }
            None => Ok(None),
        }
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, CacheError> {
        if ttl.is_zero() {
            return Err(CacheError::invalid_ttl("TTL must be greater than zero"));
        }

        let mut conn = self.connection.clone();
        let ttl_secs = ttl.as_secs().max(1);

        let reply: String = redis::cmd("SETEX")
            .arg(key)
            .arg(ttl_secs)
            .arg(value)
            .query_async(&mut conn)
            .await
            .map_err(|e| CacheError::backend(format!("SETEX '{}' failed: {}", key, e)))?;

        Ok(reply == "OK")
    }

    async fn ping(&self) -> Result<bool, CacheError> {
        let mut conn = self.connection.clone();

        let reply: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| CacheError::backend(format!("PING failed: {}", e)))?;

        Ok(reply == "PONG")
    }
}
