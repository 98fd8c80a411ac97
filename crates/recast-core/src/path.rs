//! # Value Paths — Decode Location Tracking
//!
//! A [`ValuePath`] names the location of a value inside a dynamic document,
//! starting from the root `$` and descending through structure fields
//! (`.field`) and sequence indices (`[3]`). Paths are built left-to-right
//! as the decode engine descends and are carried by every decode error so
//! a failure deep inside a nested payload can be reported precisely.
//!
//! Paths are diagnostic strings only. They are never parsed back, never
//! used for lookup, and never participate in value identity.

use std::fmt;

/// Location of a value inside a dynamic document.
///
/// The root document is `$`. Descending into a structure field `name`
/// appends `.name`; descending into sequence index `i` appends `[i]`.
/// A field named `items` inside the first element of a root-level
/// sequence is therefore `$[0].items`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValuePath(String);

impl ValuePath {
    /// Path of the root document: `$`.
    pub fn root() -> Self {
        ValuePath("$".to_string())
    }

    /// Path of the structure field `name` under this path.
    pub fn field(&self, name: &str) -> Self {
        ValuePath(format!("{}.{name}", self.0))
    }

    /// Path of the sequence element at `index` under this path.
    pub fn index(&self, index: usize) -> Self {
        ValuePath(format!("{}[{index}]", self.0))
    }

    /// The path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ValuePath {
    fn default() -> Self {
        ValuePath::root()
    }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ValuePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_dollar() {
        assert_eq!(ValuePath::root().as_str(), "$");
        assert_eq!(ValuePath::default(), ValuePath::root());
    }

    #[test]
    fn test_field_descent() {
        let path = ValuePath::root().field("user").field("name");
        assert_eq!(path.as_str(), "$.user.name");
    }

    #[test]
    fn test_index_descent() {
        let path = ValuePath::root().index(0).index(12);
        assert_eq!(path.as_str(), "$[0][12]");
    }

    #[test]
    fn test_mixed_descent() {
        let path = ValuePath::root().field("items").index(0).field("n");
        assert_eq!(path.as_str(), "$.items[0].n");
    }

    #[test]
    fn test_display_matches_as_str() {
        let path = ValuePath::root().field("a").index(3);
        assert_eq!(path.to_string(), path.as_str());
    }

    #[test]
    fn test_descent_does_not_mutate_parent() {
        let parent = ValuePath::root().field("a");
        let _child = parent.index(1);
        assert_eq!(parent.as_str(), "$.a");
    }
}
