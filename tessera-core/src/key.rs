//! Canonical discriminants.

use std::{borrow::Borrow, borrow::Cow, fmt, ops::Deref, sync::Arc};

/// Normalize the format of a raw discriminant: surrounding whitespace is
/// trimmed and ASCII letters are lowercased.
///
/// Legacy alias rewriting is domain specific and happens in the resolver;
/// this function only fixes the format, and is idempotent.
pub fn normalize_key(raw: &str) -> Cow<'_, str> {
    let trimmed = raw.trim();
    if trimmed.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(trimmed.to_ascii_lowercase())
    } else {
        Cow::Borrowed(trimmed)
    }
}

/// A canonical type discriminant (`"entity"`, `"alarm-panel"`, `"ui_action"`).
///
/// Cloning is O(1). A `TypeKey` built with [`TypeKey::new`] is always in
/// normalized format, so equal spellings compare equal.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(Arc<str>);

impl TypeKey {
    /// Build a key from a raw discriminant, normalizing its format.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(Arc::from(normalize_key(raw.as_ref()).as_ref()))
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the key is empty after normalization.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeKey").field(&&*self.0).finish()
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Deref for TypeKey {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TypeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TypeKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypeKey {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for TypeKey {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl PartialEq<str> for TypeKey {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for TypeKey {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_lowercases() {
        assert_eq!(normalize_key("  Alarm-Panel "), "alarm-panel");
        assert!(matches!(normalize_key("entity"), Cow::Borrowed("entity")));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["ui-action", " UI_Color", "weather-forecast", ""] {
            let once = normalize_key(raw).into_owned();
            assert_eq!(normalize_key(&once), once.as_str());
        }
    }

    #[test]
    fn test_type_key_equality() {
        let key = TypeKey::new("Device");
        assert_eq!(key, "device");
        assert_eq!(key, TypeKey::from("device "));
        assert_eq!(format!("{key}"), "device");
        assert_eq!(format!("{key:?}"), "TypeKey(\"device\")");
    }
}
