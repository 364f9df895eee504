//! Cache-aside HTTP service backed by Redis
//!
//! An HTTP handler consults a Redis-backed key-value cache before
//! recomputing a result and populates the cache on a miss. Entries are
//! stored as JSON strings with a store-owned TTL, and responses report
//! hit/miss provenance via the `X-cache` header.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
