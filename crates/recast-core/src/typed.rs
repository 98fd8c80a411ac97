//! # Typed Values — Decode Output
//!
//! A [`TypedValue`] is what the decode engine hands back on success: the
//! input value re-expressed through the target shape. Scalars are carried
//! unchanged, sequences are rebuilt element by element, and structures
//! become a [`StructValue`] holding the structure's identity plus an
//! ordered field map (payload order, with materialized defaults appended).
//!
//! `TypedValue::to_value` converts back into a dynamic value; a decode
//! followed by `to_value` is stable under re-decoding, since defaults are
//! already materialized and undeclared keys already dropped.

use std::fmt;

use indexmap::IndexMap;
use serde_json::{Map, Value};

/// A dynamic value accepted by, and re-expressed through, a target shape.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// An accepted scalar, carried unchanged.
    Scalar(Value),
    /// A decoded homogeneous sequence.
    Sequence(Vec<TypedValue>),
    /// A constructed structure value.
    Struct(StructValue),
}

impl TypedValue {
    /// The underlying scalar, if this is one.
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            TypedValue::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// The boolean payload, if this is a boolean scalar.
    pub fn as_bool(&self) -> Option<bool> {
        self.as_scalar().and_then(Value::as_bool)
    }

    /// The signed integer payload, if this is an integer scalar in `i64`
    /// range.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_scalar().and_then(Value::as_i64)
    }

    /// The unsigned integer payload, if this is an integer scalar in `u64`
    /// range.
    pub fn as_u64(&self) -> Option<u64> {
        self.as_scalar().and_then(Value::as_u64)
    }

    /// The float payload, if this is a float-form scalar.
    pub fn as_f64(&self) -> Option<f64> {
        match self.as_scalar() {
            Some(value) if value.is_f64() => value.as_f64(),
            _ => None,
        }
    }

    /// The string payload, if this is a text scalar.
    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Value::as_str)
    }

    /// The decoded elements, if this is a sequence.
    pub fn as_sequence(&self) -> Option<&[TypedValue]> {
        match self {
            TypedValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// The constructed structure, if this is one.
    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            TypedValue::Struct(value) => Some(value),
            _ => None,
        }
    }

    /// Convert back into a dynamic value.
    ///
    /// Structure fields are emitted in their stored order, so map ordering
    /// survives a decode/convert round trip.
    pub fn to_value(&self) -> Value {
        match self {
            TypedValue::Scalar(value) => value.clone(),
            TypedValue::Sequence(items) => {
                Value::Array(items.iter().map(TypedValue::to_value).collect())
            }
            TypedValue::Struct(value) => {
                let mut map = Map::with_capacity(value.len());
                for (name, field) in value.iter() {
                    map.insert(name.to_string(), field.to_value());
                }
                Value::Object(map)
            }
        }
    }
}

/// A constructed structure: identity name plus ordered decoded fields.
///
/// Field order is the payload's key order with defaulted fields appended;
/// equality is order-independent.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
    name: String,
    fields: IndexMap<String, TypedValue>,
}

impl StructValue {
    /// An empty structure value with the given identity.
    pub fn new(name: impl Into<String>) -> Self {
        StructValue { name: name.into(), fields: IndexMap::new() }
    }

    /// The identity of the structure that constructed this value.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set a decoded field. A repeated name overwrites in place.
    pub fn insert(&mut self, name: impl Into<String>, value: TypedValue) {
        self.fields.insert(name.into(), value);
    }

    /// Look up a decoded field by name.
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.fields.get(name)
    }

    /// Returns true if the field is present.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Iterate fields in stored order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypedValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of decoded fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no fields were decoded.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for StructValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({} fields)", self.name, self.fields.len())
    }
}
