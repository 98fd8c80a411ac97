//! # Decode Engine — Schema-Directed Interpretation of Dynamic Values
//!
//! The engine walks a dynamic value and a target shape together and either
//! constructs a [`TypedValue`] or reports a [`DecodeError`] locating the
//! first disagreement (or, inside a sequence, every disagreement).
//!
//! ## Design
//!
//! - **Registry first.** Every decode step starts with a registry lookup
//!   on the target's identity; a registered custom decoder fully replaces
//!   structural dispatch for that target, at any nesting depth.
//! - **Fail fast in structures, exhaustively in sequences.** A structure
//!   stops at the missing-required check or the first field error. A
//!   sequence decodes every element and reports all failures in one
//!   aggregate, discarding partial successes.
//! - **Total over its inputs.** A non-map against a structure or a
//!   non-sequence against a sequence is a plain `WrongType`, not a panic.
//!   Shapes the engine cannot serve were already rejected at schema build
//!   time; the one decode-time gap is an opaque scalar check with no
//!   registered decoder, reported as `NotSupportedType`.
//! - **Undeclared keys are dropped.** Structure decoding reads only
//!   declared fields. Extra payload keys are not errors and do not appear
//!   in the output.
//!
//! ## Thread Safety
//!
//! [`Decoder`] is `Send + Sync` and `decode` is a pure function of its
//! inputs; the only shared state is the per-structure profile cell, which
//! is compute-once.

use recast_core::{
    CollectionErrors, DecodeError, ScalarKind, Shape, StructShape, StructValue, TypedValue,
    ValuePath, WrongCollectionItem,
};
use serde_json::Value;

use crate::registry::{CustomDecoder, DecoderRegistry};

/// Decode `value` against `target` from the document root.
///
/// Registry-free entry point; equivalent to `Decoder::new().decode(..)`.
pub fn decode_input(value: &Value, target: &Shape) -> Result<TypedValue, DecodeError> {
    Decoder::new().decode(value, target)
}

/// The decode engine: structural dispatch plus a custom decoder registry.
#[derive(Debug, Default, Clone)]
pub struct Decoder {
    registry: DecoderRegistry,
}

impl Decoder {
    /// An engine with no custom decoders.
    pub fn new() -> Self {
        Decoder { registry: DecoderRegistry::new() }
    }

    /// An engine using the given registry.
    pub fn with_registry(registry: DecoderRegistry) -> Self {
        Decoder { registry }
    }

    /// Bind a custom decoder to a target identity.
    pub fn register(
        &mut self,
        identity: impl Into<String>,
        decoder: impl CustomDecoder + 'static,
    ) {
        self.registry.register(identity, decoder);
    }

    /// The engine's registry.
    pub fn registry(&self) -> &DecoderRegistry {
        &self.registry
    }

    /// Decode `value` against `target` from the document root.
    pub fn decode(&self, value: &Value, target: &Shape) -> Result<TypedValue, DecodeError> {
        self.decode_at(value, target, &ValuePath::root())
    }

    /// Decode `value` against `target` at an explicit path.
    ///
    /// This is the engine's recursive step, public so custom decoders can
    /// re-enter the engine for the parts of a value they do not handle
    /// themselves.
    pub fn decode_at(
        &self,
        value: &Value,
        target: &Shape,
        path: &ValuePath,
    ) -> Result<TypedValue, DecodeError> {
        if let Some(identity) = target.identity() {
            if let Some(decoder) = self.registry.lookup(identity) {
                tracing::trace!(identity, path = %path, "delegating to custom decoder");
                return decoder.decode(value, target, path);
            }
        }

        match target {
            Shape::Sequence(element) => self.decode_sequence(value, element, target, path),
            Shape::Struct(def) => self.decode_struct(value, def, target, path),
            Shape::Scalar(kind) => decode_scalar(value, kind, target, path),
        }
    }

    fn decode_sequence(
        &self,
        value: &Value,
        element: &Shape,
        target: &Shape,
        path: &ValuePath,
    ) -> Result<TypedValue, DecodeError> {
        let Some(items) = value.as_array() else {
            return Err(DecodeError::WrongType {
                value: value.clone(),
                target: target.clone(),
                path: path.clone(),
            });
        };

        let mut decoded = Vec::with_capacity(items.len());
        let mut failures = Vec::new();
        for (index, item) in items.iter().enumerate() {
            let item_path = path.index(index);
            match self.decode_at(item, element, &item_path) {
                Ok(typed) => decoded.push(typed),
                // The failure path is where the element decode gave up;
                // for scalar elements that is the element position itself.
                Err(err) => failures.push(WrongCollectionItem {
                    value: item.clone(),
                    target: element.clone(),
                    path: err.path().clone(),
                }),
            }
        }

        if failures.is_empty() {
            Ok(TypedValue::Sequence(decoded))
        } else {
            Err(DecodeError::WrongCollection {
                value: value.clone(),
                target: target.clone(),
                path: path.clone(),
                details: CollectionErrors::new(failures),
            })
        }
    }

    fn decode_struct(
        &self,
        value: &Value,
        def: &StructShape,
        target: &Shape,
        path: &ValuePath,
    ) -> Result<TypedValue, DecodeError> {
        let Some(payload) = value.as_object() else {
            return Err(DecodeError::WrongType {
                value: value.clone(),
                target: target.clone(),
                path: path.clone(),
            });
        };

        let profile = def.profile();
        let missing = profile.missing_from(payload.keys().map(String::as_str));
        if !missing.is_empty() {
            return Err(DecodeError::MissingRequiredAttributes {
                value: value.clone(),
                target: target.clone(),
                path: path.clone(),
                attrs: missing,
            });
        }

        let mut out = StructValue::new(def.name());
        for (key, field_value) in payload {
            // Undeclared keys are dropped: only declared fields are read.
            let Some(spec) = profile.field(key) else { continue };
            let decoded = self.decode_at(field_value, spec.shape(), &path.field(key))?;
            out.insert(key.clone(), decoded);
        }

        // Absent optional fields decode their declared default, so a bad
        // schema default surfaces as a located DecodeError.
        for spec in def.fields() {
            if out.contains(spec.name()) {
                continue;
            }
            if let Some(default) = spec.default() {
                let produced = default.produce();
                let decoded =
                    self.decode_at(&produced, spec.shape(), &path.field(spec.name()))?;
                out.insert(spec.name(), decoded);
            }
        }

        Ok(TypedValue::Struct(out))
    }
}

fn decode_scalar(
    value: &Value,
    kind: &ScalarKind,
    target: &Shape,
    path: &ValuePath,
) -> Result<TypedValue, DecodeError> {
    if !kind.has_rule() {
        return Err(DecodeError::NotSupportedType {
            value: value.clone(),
            target: target.clone(),
            path: path.clone(),
        });
    }

    if kind.matches(value) {
        Ok(TypedValue::Scalar(value.clone()))
    } else {
        Err(DecodeError::WrongType {
            value: value.clone(),
            target: target.clone(),
            path: path.clone(),
        })
    }
}
