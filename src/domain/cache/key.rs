//! Cache key construction

/// Separator between the namespace and the discriminating value.
const KEY_SEPARATOR: char = ':';

/// Builds a cache key from a namespace (typically a route name) and a
/// discriminating value (typically a user identifier).
///
/// Keys are deterministic: identical inputs always yield identical keys, so
/// identical logical requests address the same entry.
pub fn cache_key(namespace: &str, discriminator: &str) -> String {
    format!("{namespace}{KEY_SEPARATOR}{discriminator}")
}
