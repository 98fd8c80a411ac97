//! # Decoder Registry — Custom Decode Rules by Target Identity
//!
//! The registry lets callers override or supply decoding for specific
//! targets. Identities are the names shapes already carry: a structure's
//! name, or a custom scalar check's name. Built-in scalars and sequences
//! have no identity and always take the engine's structural path.
//!
//! The engine consults the registry at the top of every decode step,
//! before structural dispatch, so a registered decoder fully replaces the
//! engine for its identity (including for nested occurrences). For opaque
//! scalar checks the registry is the only possible handler.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use recast_core::{DecodeError, Shape, TypedValue, ValuePath};
use serde_json::Value;

/// A user-supplied decode rule for one target identity.
///
/// Implementations receive the same `(value, target, path)` contract as
/// the engine and must uphold the same discipline: return a fully
/// constructed value or a taxonomy error, never a partial result.
pub trait CustomDecoder: Send + Sync {
    /// Decode `value` against `target` at `path`.
    fn decode(
        &self,
        value: &Value,
        target: &Shape,
        path: &ValuePath,
    ) -> Result<TypedValue, DecodeError>;
}

impl<F> CustomDecoder for F
where
    F: Fn(&Value, &Shape, &ValuePath) -> Result<TypedValue, DecodeError> + Send + Sync,
{
    fn decode(
        &self,
        value: &Value,
        target: &Shape,
        path: &ValuePath,
    ) -> Result<TypedValue, DecodeError> {
        self(value, target, path)
    }
}

/// Registry mapping target identities to custom decoders.
#[derive(Default, Clone)]
pub struct DecoderRegistry {
    decoders: HashMap<String, Arc<dyn CustomDecoder>>,
}

impl DecoderRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        DecoderRegistry { decoders: HashMap::new() }
    }

    /// Bind `identity` to a custom decoder. A repeated identity replaces
    /// the previous binding.
    pub fn register(
        &mut self,
        identity: impl Into<String>,
        decoder: impl CustomDecoder + 'static,
    ) {
        let identity = identity.into();
        tracing::trace!(identity = %identity, "registered custom decoder");
        self.decoders.insert(identity, Arc::new(decoder));
    }

    /// Look up the decoder bound to `identity`, if any.
    pub fn lookup(&self, identity: &str) -> Option<&dyn CustomDecoder> {
        self.decoders.get(identity).map(Arc::as_ref)
    }

    /// Returns true if a decoder is bound to `identity`.
    pub fn contains(&self, identity: &str) -> bool {
        self.decoders.contains_key(identity)
    }

    /// Number of registered decoders.
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    /// Returns true if no decoders are registered.
    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}

impl fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut identities: Vec<&str> = self.decoders.keys().map(String::as_str).collect();
        identities.sort_unstable();
        f.debug_struct("DecoderRegistry").field("identities", &identities).finish()
    }
}
