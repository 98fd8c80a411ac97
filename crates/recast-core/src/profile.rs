//! # Structure Profiles — Memoized Decode-Time Views
//!
//! Decoding a structure needs two derived views of its field list: a
//! by-name index (payload keys arrive in document order, not declaration
//! order) and the set of required field names (for the missing-attribute
//! check). A [`StructProfile`] packages both.
//!
//! Profiles are derived once per structure descriptor and memoized inside
//! it, so repeated decodes against the same schema pay the derivation cost
//! exactly once per process.
//!
//! ## Thread Safety
//!
//! The memoization cell is a `OnceLock`: compute-once, readers-many.
//! Racing first uses compute independently and one result wins; the field
//! list is frozen at build time, so every computation yields the same
//! profile and the cached reference stays valid for the descriptor's
//! lifetime. The cache is never invalidated.

use std::collections::BTreeSet;
use std::collections::HashSet;

use indexmap::IndexMap;

use crate::shape::{FieldSpec, StructShape};

/// Derived decode-time view of a structure: by-name field index plus the
/// required-name set.
#[derive(Debug, Clone, PartialEq)]
pub struct StructProfile {
    fields: IndexMap<String, FieldSpec>,
    required: BTreeSet<String>,
}

impl StructProfile {
    fn compute(shape: &StructShape) -> Self {
        let mut fields = IndexMap::with_capacity(shape.fields().len());
        let mut required = BTreeSet::new();
        for spec in shape.fields() {
            if spec.required() {
                required.insert(spec.name().to_string());
            }
            fields.insert(spec.name().to_string(), spec.clone());
        }
        StructProfile { fields, required }
    }

    /// Look up a declared field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    /// Returns true if the structure declares a field with this name.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Names of every field that declares no default, in sorted order.
    pub fn required_names(&self) -> &BTreeSet<String> {
        &self.required
    }

    /// Required field names absent from `present`.
    ///
    /// Extra names in `present` are ignored; only the required set
    /// matters here.
    pub fn missing_from<'a, I>(&self, present: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let present: HashSet<&str> = present.into_iter().collect();
        self.required
            .iter()
            .filter(|name| !present.contains(name.as_str()))
            .cloned()
            .collect()
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the structure declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl StructShape {
    /// The structure's decode-time profile, derived on first use and
    /// memoized for the descriptor's lifetime.
    pub fn profile(&self) -> &StructProfile {
        self.profile.get_or_init(|| StructProfile::compute(self))
    }
}
