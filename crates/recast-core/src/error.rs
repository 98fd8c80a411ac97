//! # Error Taxonomy — Decode and Schema Failures
//!
//! Two families, raised at different times and never mixed:
//!
//! - [`SchemaError`]: the schema itself is malformed. Raised once, while a
//!   declaration is being resolved into a shape, before any value is
//!   decoded.
//! - [`DecodeError`]: a dynamic value does not conform to a well-formed
//!   shape. Created fresh per failed decode; every variant carries the
//!   offending value, the expected target shape, and the [`ValuePath`]
//!   where the disagreement happened.
//!
//! ## Design
//!
//! - The decode taxonomy is closed. Callers can match exhaustively and
//!   build policy on it.
//! - Structure decoding fails fast: the first field error (or the missing
//!   required set) is the whole story. Sequence decoding fails
//!   exhaustively: every bad element is reported in one
//!   [`DecodeError::WrongCollection`], in element order.

use std::collections::BTreeSet;
use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::path::ValuePath;
use crate::shape::Shape;

/// A dynamic value failed to decode against a target shape.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// The payload omits structure fields that declare no default.
    #[error("missing required attributes {attrs:?} for {target} at {path}")]
    MissingRequiredAttributes {
        /// The structure payload as received.
        value: Value,
        /// The structure shape that was being decoded.
        target: Shape,
        /// Location of the structure inside the document.
        path: ValuePath,
        /// Names of every required field absent from the payload.
        attrs: BTreeSet<String>,
    },

    /// The value does not satisfy the target shape.
    #[error("expected {target} at {path}, got {value}")]
    WrongType {
        /// The offending value.
        value: Value,
        /// The expected shape.
        target: Shape,
        /// Location of the value inside the document.
        path: ValuePath,
    },

    /// One or more sequence elements failed to decode.
    ///
    /// Partial successes are discarded; `details` reports every failing
    /// element, in element order.
    #[error("sequence decode failed for {target} at {path}:\n{details}")]
    WrongCollection {
        /// The whole sequence as received.
        value: Value,
        /// The sequence shape that was being decoded.
        target: Shape,
        /// Location of the sequence inside the document.
        path: ValuePath,
        /// Per-element failures, in element order.
        details: CollectionErrors,
    },

    /// The target is recognized structurally but has no decode rule.
    ///
    /// Reached by opaque scalar checks with no registered custom decoder.
    #[error("no decode rule for {target} at {path}, got {value}")]
    NotSupportedType {
        /// The value that could not be decoded.
        value: Value,
        /// The ruleless target shape.
        target: Shape,
        /// Location of the value inside the document.
        path: ValuePath,
    },
}

impl DecodeError {
    /// Location of the failure inside the document.
    pub fn path(&self) -> &ValuePath {
        match self {
            DecodeError::MissingRequiredAttributes { path, .. }
            | DecodeError::WrongType { path, .. }
            | DecodeError::WrongCollection { path, .. }
            | DecodeError::NotSupportedType { path, .. } => path,
        }
    }

    /// The shape the value was expected to satisfy.
    pub fn target(&self) -> &Shape {
        match self {
            DecodeError::MissingRequiredAttributes { target, .. }
            | DecodeError::WrongType { target, .. }
            | DecodeError::WrongCollection { target, .. }
            | DecodeError::NotSupportedType { target, .. } => target,
        }
    }
}

/// A single failed sequence element with structured context.
///
/// Appears only inside [`DecodeError::WrongCollection`]; it carries no
/// nested detail of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct WrongCollectionItem {
    /// The element value as received.
    pub value: Value,
    /// The element shape it failed to satisfy.
    pub target: Shape,
    /// Location of the element inside the document.
    pub path: ValuePath,
}

impl fmt::Display for WrongCollectionItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {}: expected {}, got {}", self.path, self.target, self.value)
    }
}

/// Collection of per-element decode failures.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionErrors {
    items: Vec<WrongCollectionItem>,
}

impl CollectionErrors {
    /// Wrap a non-empty list of element failures.
    pub fn new(items: Vec<WrongCollectionItem>) -> Self {
        CollectionErrors { items }
    }

    /// Returns the number of failed elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no failures.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns a slice of all element failures.
    pub fn items(&self) -> &[WrongCollectionItem] {
        &self.items
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<WrongCollectionItem> {
        self.items
    }
}

impl From<Vec<WrongCollectionItem>> for CollectionErrors {
    fn from(items: Vec<WrongCollectionItem>) -> Self {
        CollectionErrors::new(items)
    }
}

impl fmt::Display for CollectionErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

/// The schema itself is malformed.
///
/// Raised while resolving declarations into shapes, never while decoding a
/// value. `path` names the declaration site (`"{struct}.{field}"` for a
/// structure field).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// The declaration is illegal in a decode schema.
    #[error("type {target} is not allowed in a decode schema at {path}")]
    NotAllowedType {
        /// Rendered form of the offending declaration.
        target: String,
        /// Declaration site.
        path: String,
    },

    /// The declaration is recognized but the engine has no decode rule
    /// for it.
    #[error("type {target} is not supported by the decode engine at {path}")]
    NotSupportedType {
        /// Rendered form of the offending declaration.
        target: String,
        /// Declaration site.
        path: String,
    },

    /// Two fields of one structure share a name.
    #[error("duplicate field '{name}' in struct {path}")]
    DuplicateField {
        /// The repeated field name.
        name: String,
        /// The structure being declared.
        path: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ScalarKind;
    use serde_json::json;

    fn integer() -> Shape {
        Shape::Scalar(ScalarKind::Integer)
    }

    #[test]
    fn test_wrong_type_display() {
        let err = DecodeError::WrongType {
            value: json!("5"),
            target: integer(),
            path: ValuePath::root().field("n"),
        };
        assert_eq!(err.to_string(), "expected integer at $.n, got \"5\"");
    }

    #[test]
    fn test_missing_required_display_lists_sorted_names() {
        let err = DecodeError::MissingRequiredAttributes {
            value: json!({}),
            target: integer(),
            path: ValuePath::root(),
            attrs: BTreeSet::from(["b".to_string(), "a".to_string()]),
        };
        assert_eq!(
            err.to_string(),
            "missing required attributes {\"a\", \"b\"} for integer at $"
        );
    }

    #[test]
    fn test_collection_errors_display_one_line_per_item() {
        let details = CollectionErrors::new(vec![
            WrongCollectionItem {
                value: json!("x"),
                target: integer(),
                path: ValuePath::root().index(1),
            },
            WrongCollectionItem {
                value: json!(null),
                target: integer(),
                path: ValuePath::root().index(3),
            },
        ]);
        assert_eq!(details.len(), 2);
        assert_eq!(
            details.to_string(),
            "  $[1]: expected integer, got \"x\"\n  $[3]: expected integer, got null"
        );
    }

    #[test]
    fn test_error_accessors() {
        let err = DecodeError::NotSupportedType {
            value: json!(1),
            target: integer(),
            path: ValuePath::root().field("a"),
        };
        assert_eq!(err.path().as_str(), "$.a");
        assert_eq!(err.target(), &integer());
    }

    #[test]
    fn test_schema_error_display() {
        let err = SchemaError::NotAllowedType {
            target: "sequence".to_string(),
            path: "S.items".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "type sequence is not allowed in a decode schema at S.items"
        );
    }
}
