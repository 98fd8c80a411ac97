//! # Dynamic Conversion — Domain Values to Dynamic Values
//!
//! The encode half of Recast. Domain values implement [`ToDynamic`] and
//! declare what they are through a [`ValueClass`] tag; the conversion
//! itself is ordinary trait dispatch, resolved per concrete type at
//! compile time. There is no runtime type lookup: a type that cannot be
//! encoded has no impl and fails to compile, so the runtime
//! [`EncodeError::NotEncodable`] case is reserved for values that are
//! representable in principle but not in the dynamic form (the canonical
//! example is a non-finite float).
//!
//! Structures either implement [`ToDynamic`] field by field or derive
//! `serde::Serialize` and go through [`serialize_to_dynamic`], the bridge
//! for model types whose dynamic form is already defined by their
//! serialization.
//!
//! Unlike decoding, encoding does no schema validation and accumulates no
//! errors: the first failure wins.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Error during conversion to a dynamic value.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// The value has no dynamic representation.
    #[error("value of type {type_name} cannot be encoded as a dynamic value: {reason}")]
    NotEncodable {
        /// Name of the offending type.
        type_name: String,
        /// Why the value is not representable.
        reason: String,
    },

    /// Serialization through the serde bridge failed.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Classification tag declared by every [`ToDynamic`] implementation.
///
/// The tag is part of the encode interface: callers can branch on what a
/// value *is* (for pruning policy, wrapping, diagnostics) without
/// inspecting the encoded form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueClass {
    /// A primitive: boolean, number, or text.
    Scalar,
    /// An ordered, element-wise encoded collection.
    Sequence,
    /// A key/value container with text keys.
    Mapping,
    /// A named structure encoded field by field.
    Structure,
    /// An enumerated type that unwraps to its underlying value.
    Enumerated,
    /// A type with its own conversion rule.
    Custom,
}

impl fmt::Display for ValueClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueClass::Scalar => "scalar",
            ValueClass::Sequence => "sequence",
            ValueClass::Mapping => "mapping",
            ValueClass::Structure => "structure",
            ValueClass::Enumerated => "enumerated",
            ValueClass::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// Conversion of a domain value into a dynamic value.
pub trait ToDynamic {
    /// What kind of value this is, for callers that branch on class.
    fn value_class(&self) -> ValueClass;

    /// Encode into a dynamic value.
    fn to_dynamic(&self) -> Result<Value, EncodeError>;
}

/// Encode `value` into a dynamic value.
///
/// Free-function entry point; equivalent to calling
/// [`ToDynamic::to_dynamic`] directly.
pub fn to_dynamic<T: ToDynamic + ?Sized>(value: &T) -> Result<Value, EncodeError> {
    value.to_dynamic()
}

/// Encode a `serde::Serialize` model through its serialization.
///
/// This is the bridge for derived model types: their dynamic form is
/// whatever their `Serialize` impl says, with no per-field `ToDynamic`
/// involvement.
pub fn serialize_to_dynamic<T: Serialize>(value: &T) -> Result<Value, EncodeError> {
    Ok(serde_json::to_value(value)?)
}

// ─────────────────────────────── Scalar impls ────────────────────────────────

impl ToDynamic for bool {
    fn value_class(&self) -> ValueClass {
        ValueClass::Scalar
    }

    fn to_dynamic(&self) -> Result<Value, EncodeError> {
        Ok(Value::Bool(*self))
    }
}

macro_rules! integer_to_dynamic {
    ($($ty:ty),* $(,)?) => {$(
        impl ToDynamic for $ty {
            fn value_class(&self) -> ValueClass {
                ValueClass::Scalar
            }

            fn to_dynamic(&self) -> Result<Value, EncodeError> {
                Ok(Value::from(*self))
            }
        }
    )*};
}

integer_to_dynamic!(i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);

impl ToDynamic for f64 {
    fn value_class(&self) -> ValueClass {
        ValueClass::Scalar
    }

    fn to_dynamic(&self) -> Result<Value, EncodeError> {
        Number::from_f64(*self).map(Value::Number).ok_or_else(|| {
            EncodeError::NotEncodable {
                type_name: "f64".to_string(),
                reason: format!("non-finite float {self}"),
            }
        })
    }
}

impl ToDynamic for f32 {
    fn value_class(&self) -> ValueClass {
        ValueClass::Scalar
    }

    fn to_dynamic(&self) -> Result<Value, EncodeError> {
        f64::from(*self).to_dynamic()
    }
}

impl ToDynamic for str {
    fn value_class(&self) -> ValueClass {
        ValueClass::Scalar
    }

    fn to_dynamic(&self) -> Result<Value, EncodeError> {
        Ok(Value::String(self.to_string()))
    }
}

impl ToDynamic for String {
    fn value_class(&self) -> ValueClass {
        ValueClass::Scalar
    }

    fn to_dynamic(&self) -> Result<Value, EncodeError> {
        Ok(Value::String(self.clone()))
    }
}

/// Dynamic values pass through unchanged; their class is whatever form
/// they already hold.
impl ToDynamic for Value {
    fn value_class(&self) -> ValueClass {
        match self {
            Value::Array(_) => ValueClass::Sequence,
            Value::Object(_) => ValueClass::Mapping,
            _ => ValueClass::Scalar,
        }
    }

    fn to_dynamic(&self) -> Result<Value, EncodeError> {
        Ok(self.clone())
    }
}

// ────────────────────────────── Container impls ──────────────────────────────

impl<T: ToDynamic + ?Sized> ToDynamic for &T {
    fn value_class(&self) -> ValueClass {
        (**self).value_class()
    }

    fn to_dynamic(&self) -> Result<Value, EncodeError> {
        (**self).to_dynamic()
    }
}

/// Absent values encode as null; present values encode as themselves.
impl<T: ToDynamic> ToDynamic for Option<T> {
    fn value_class(&self) -> ValueClass {
        match self {
            Some(value) => value.value_class(),
            None => ValueClass::Scalar,
        }
    }

    fn to_dynamic(&self) -> Result<Value, EncodeError> {
        match self {
            Some(value) => value.to_dynamic(),
            None => Ok(Value::Null),
        }
    }
}

impl<T: ToDynamic> ToDynamic for [T] {
    fn value_class(&self) -> ValueClass {
        ValueClass::Sequence
    }

    fn to_dynamic(&self) -> Result<Value, EncodeError> {
        let items: Result<Vec<Value>, EncodeError> =
            self.iter().map(ToDynamic::to_dynamic).collect();
        Ok(Value::Array(items?))
    }
}

impl<T: ToDynamic> ToDynamic for Vec<T> {
    fn value_class(&self) -> ValueClass {
        ValueClass::Sequence
    }

    fn to_dynamic(&self) -> Result<Value, EncodeError> {
        self.as_slice().to_dynamic()
    }
}

macro_rules! string_map_to_dynamic {
    ($($map:ident),* $(,)?) => {$(
        impl<T: ToDynamic> ToDynamic for $map<String, T> {
            fn value_class(&self) -> ValueClass {
                ValueClass::Mapping
            }

            fn to_dynamic(&self) -> Result<Value, EncodeError> {
                let mut out = Map::with_capacity(self.len());
                for (key, value) in self {
                    out.insert(key.clone(), value.to_dynamic()?);
                }
                Ok(Value::Object(out))
            }
        }
    )*};
}

string_map_to_dynamic!(BTreeMap, HashMap, IndexMap);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ── Scalars ──

    #[test]
    fn test_primitives_pass_through() {
        assert_eq!(to_dynamic(&true).unwrap(), json!(true));
        assert_eq!(to_dynamic(&42i64).unwrap(), json!(42));
        assert_eq!(to_dynamic(&42u8).unwrap(), json!(42));
        assert_eq!(to_dynamic(&1.5f64).unwrap(), json!(1.5));
        assert_eq!(to_dynamic("hello").unwrap(), json!("hello"));
        assert_eq!(to_dynamic(&"hello".to_string()).unwrap(), json!("hello"));
        assert_eq!(true.value_class(), ValueClass::Scalar);
        assert_eq!("x".value_class(), ValueClass::Scalar);
    }

    #[test]
    fn test_non_finite_floats_are_not_encodable() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = to_dynamic(&bad).unwrap_err();
            assert!(matches!(err, EncodeError::NotEncodable { .. }));
        }
        assert!(to_dynamic(&f32::NAN).is_err());
    }

    #[test]
    fn test_option_encodes_null_for_none() {
        let absent: Option<i64> = None;
        assert_eq!(to_dynamic(&absent).unwrap(), Value::Null);
        assert_eq!(to_dynamic(&Some(7i64)).unwrap(), json!(7));
        assert_eq!(Some("x").value_class(), ValueClass::Scalar);
    }

    #[test]
    fn test_dynamic_values_pass_through() {
        let value = json!({"a": [1, 2]});
        assert_eq!(to_dynamic(&value).unwrap(), value);
        assert_eq!(value.value_class(), ValueClass::Mapping);
        assert_eq!(json!([1]).value_class(), ValueClass::Sequence);
        assert_eq!(json!(1).value_class(), ValueClass::Scalar);
    }

    // ── Containers ──

    #[test]
    fn test_sequences_encode_element_wise() {
        let items = vec!["a".to_string(), "b".to_string()];
        assert_eq!(to_dynamic(&items).unwrap(), json!(["a", "b"]));
        assert_eq!(items.value_class(), ValueClass::Sequence);

        let slice: &[i64] = &[1, 2, 3];
        assert_eq!(to_dynamic(slice).unwrap(), json!([1, 2, 3]));
    }

    #[test]
    fn test_sequence_encoding_propagates_element_failure() {
        let items = vec![1.0f64, f64::NAN];
        assert!(to_dynamic(&items).is_err());
    }

    #[test]
    fn test_mappings_encode_entry_wise() {
        let mut sorted = BTreeMap::new();
        sorted.insert("b".to_string(), 2i64);
        sorted.insert("a".to_string(), 1i64);
        assert_eq!(to_dynamic(&sorted).unwrap(), json!({"a": 1, "b": 2}));
        assert_eq!(sorted.value_class(), ValueClass::Mapping);
    }

    #[test]
    fn test_ordered_mapping_preserves_insertion_order() {
        let mut ordered = IndexMap::new();
        ordered.insert("z".to_string(), 1i64);
        ordered.insert("a".to_string(), 2i64);
        let encoded = to_dynamic(&ordered).unwrap();
        let keys: Vec<&String> = encoded.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["z", "a"]);
    }

    // ── Domain types ──

    #[derive(Clone, Copy)]
    enum Status {
        Active,
        Suspended,
    }

    impl ToDynamic for Status {
        fn value_class(&self) -> ValueClass {
            ValueClass::Enumerated
        }

        fn to_dynamic(&self) -> Result<Value, EncodeError> {
            let underlying = match self {
                Status::Active => "active",
                Status::Suspended => "suspended",
            };
            underlying.to_dynamic()
        }
    }

    struct Server {
        host: String,
        port: u16,
        status: Status,
        tags: Vec<String>,
    }

    impl ToDynamic for Server {
        fn value_class(&self) -> ValueClass {
            ValueClass::Structure
        }

        fn to_dynamic(&self) -> Result<Value, EncodeError> {
            let mut map = Map::new();
            map.insert("host".to_string(), self.host.to_dynamic()?);
            map.insert("port".to_string(), self.port.to_dynamic()?);
            map.insert("status".to_string(), self.status.to_dynamic()?);
            map.insert("tags".to_string(), self.tags.to_dynamic()?);
            Ok(Value::Object(map))
        }
    }

    #[test]
    fn test_enumerated_unwraps_to_underlying_value() {
        assert_eq!(to_dynamic(&Status::Active).unwrap(), json!("active"));
        assert_eq!(Status::Suspended.value_class(), ValueClass::Enumerated);
    }

    #[test]
    fn test_structure_encodes_field_by_field() {
        let server = Server {
            host: "example".to_string(),
            port: 8080,
            status: Status::Suspended,
            tags: vec!["edge".to_string()],
        };
        assert_eq!(server.value_class(), ValueClass::Structure);
        assert_eq!(
            to_dynamic(&server).unwrap(),
            json!({
                "host": "example",
                "port": 8080,
                "status": "suspended",
                "tags": ["edge"],
            })
        );
    }

    struct Fingerprint(u64);

    impl ToDynamic for Fingerprint {
        fn value_class(&self) -> ValueClass {
            ValueClass::Custom
        }

        fn to_dynamic(&self) -> Result<Value, EncodeError> {
            Ok(Value::String(format!("{:016x}", self.0)))
        }
    }

    #[test]
    fn test_custom_conversion_rule() {
        let fp = Fingerprint(0xdead_beef);
        assert_eq!(fp.value_class(), ValueClass::Custom);
        assert_eq!(to_dynamic(&fp).unwrap(), json!("00000000deadbeef"));
    }

    // ── Serde bridge ──

    #[derive(Serialize)]
    struct Model {
        id: u32,
        label: String,
    }

    #[test]
    fn test_serde_bridge_encodes_derived_models() {
        let model = Model { id: 7, label: "seven".to_string() };
        assert_eq!(
            serialize_to_dynamic(&model).unwrap(),
            json!({"id": 7, "label": "seven"})
        );
    }

    #[test]
    fn test_value_class_display() {
        assert_eq!(ValueClass::Scalar.to_string(), "scalar");
        assert_eq!(ValueClass::Enumerated.to_string(), "enumerated");
    }
}
