//! Cache infrastructure - store-backed cache implementations

mod redis;

pub use redis::{DegradedPolicy, RedisCache, RedisCacheConfig};
