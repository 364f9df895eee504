use thiserror::Error;

/// Errors raised by the caching layer.
///
/// Startup errors (`Connection`, `Unhealthy`, `Configuration`) are fatal and
/// bubble up to the binary entry point; per-request errors are returned to
/// the handler, which decides the response semantics. A store write that is
/// simply not acknowledged is not an error; it is the `Ok(false)` arm of
/// `save`.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The store could not be reached. Raised during connection bootstrap;
    /// there is no retry path for this variant.
    #[error("store connection error: {message}")]
    Connection { message: String },

    /// The store accepted the connection but did not answer the liveness
    /// probe affirmatively.
    #[error("store reachable but unhealthy: {message}")]
    Unhealthy { message: String },

    /// A stored payload could not be decoded as UTF-8 JSON. Surfaced
    /// distinctly from a miss so corruption stays observable.
    #[error("corrupt cache entry at '{key}': {message}")]
    CorruptEntry { key: String, message: String },

    /// TTL must be strictly positive; rejected before any store write.
    #[error("invalid TTL: {message}")]
    InvalidTtl { message: String },

    /// A store command failed after the connection was established.
    #[error("store command error: {message}")]
    Backend { message: String },

    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl CacheError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self::Unhealthy {
            message: message.into(),
        }
    }

    pub fn corrupt_entry(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CorruptEntry {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn invalid_ttl(message: impl Into<String>) -> Self {
        Self::InvalidTtl {
            message: message.into(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_error() {
        let error = CacheError::connection("refused at localhost:6379");
        assert_eq!(
            error.to_string(),
            "store connection error: refused at localhost:6379"
        );
    }

    #[test]
    fn test_corrupt_entry_names_the_key() {
        let error = CacheError::corrupt_entry("/home:alice", "invalid JSON");
        assert_eq!(
            error.to_string(),
            "corrupt cache entry at '/home:alice': invalid JSON"
        );
    }

    #[test]
    fn test_invalid_ttl_error() {
        let error = CacheError::invalid_ttl("TTL must be greater than zero");
        assert_eq!(
            error.to_string(),
            "invalid TTL: TTL must be greater than zero"
        );
    }
}
