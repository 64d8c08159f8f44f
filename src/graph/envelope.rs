//! Property envelope
//!
//! The underlying store cannot represent an empty nested column group as
//! "present", so every stored property map carries one sentinel entry. The
//! envelope is the only place that knows about the sentinel: it is added
//! here on every write path and stripped here on every read path, and no
//! caller ever observes it.

use super::property::{PropertyMap, PropertyValue};

/// Sentinel key inserted into every stored property map.
pub(crate) const SENTINEL_KEY: &str = "__present";

/// Wrap a caller-supplied property map for storage, adding the sentinel.
///
/// `None` wraps to a map holding only the sentinel, which is how an entity
/// with zero properties stays representable.
pub(crate) fn wrap(properties: Option<PropertyMap>) -> PropertyMap {
    let mut map = properties.unwrap_or_default();
    map.insert(SENTINEL_KEY.to_string(), PropertyValue::Boolean(true));
    map
}

/// Strip the sentinel from a stored property map before handing it to a
/// caller. Tolerates an already-missing sentinel.
pub(crate) fn strip(mut stored: PropertyMap) -> PropertyMap {
    stored.remove(SENTINEL_KEY);
    stored
}

/// A sentinel-only group, used for range markers and property placeholders.
pub(crate) fn placeholder() -> PropertyMap {
    wrap(None)
}
