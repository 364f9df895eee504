//! Retrieved-value wrapper carrying the cache provenance marker

use serde::Serialize;

/// A value read back from the cache.
///
/// Serializes as the stored fields plus a `"cache": true` provenance flag.
/// The flag lives on this wrapper rather than on the stored value type, so a
/// later save of the inner value cannot leak the marker back into the store:
/// `save` takes the inner type, and getting it back out is [`into_inner`].
///
/// [`into_inner`]: Retrieved::into_inner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Retrieved<V> {
    #[serde(flatten)]
    value: V,
    cache: bool,
}

impl<V> Retrieved<V> {
    pub(crate) fn new(value: V) -> Self {
        Self { value, cache: true }
    }

    /// The stored value, without the provenance marker.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Unwraps the stored value, dropping the provenance marker. Use this
    /// before re-saving a previously retrieved value.
    pub fn into_inner(self) -> V {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize)]
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

    #[test]
    fn test_serializes_fields_plus_marker() {
        let retrieved = Retrieved::new(payload());

        let value = serde_json::to_value(&retrieved).unwrap();
        assert_eq!(
            value,
            json!({"success": true, "message": "2 World", "cache": true})
        );
    }

    #[test]
    fn test_into_inner_strips_marker() {
        let retrieved = Retrieved::new(payload());

        let inner = retrieved.into_inner();
        let value = serde_json::to_value(&inner).unwrap();
        assert_eq!(value, json!({"success": true, "message": "2 World"}));
    }
}
