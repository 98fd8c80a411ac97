//! # recast-core — Foundational Types for Recast
//!
//! This crate is the bedrock of the Recast workspace. It defines the
//! vocabulary shared by the decode engine and the encode path: target
//! shape descriptors, structure profiles, value paths, typed output
//! values, and the error taxonomy. The engine crates depend on
//! `recast-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Closed shape union.** [`Shape`] has exactly three forms: scalar,
//!    structure, sequence. Everything else is rejected while the schema is
//!    built, so the decode engine is total over its inputs.
//!
//! 2. **Schemas fail before values do.** Declarations ([`TypeExpr`]) are
//!    resolved into shapes up front; illegal or unsupported declarations
//!    raise [`SchemaError`] at build time. A [`DecodeError`] always means
//!    the *value* was wrong, never the schema.
//!
//! 3. **Errors carry their location.** Every decode error holds the
//!    offending value, the expected shape, and a [`ValuePath`] from the
//!    document root, so a failure three levels deep reads as
//!    `$.items[0].n`.
//!
//! 4. **Profiles are computed once.** The by-name field index and the
//!    required-name set of a structure ([`StructProfile`]) are memoized in
//!    the descriptor on first use and shared by every subsequent decode.
//!
//! 5. **Finite schemas by construction.** Nested structures embed
//!    already-built descriptors behind `Arc`, so self-referential schemas
//!    cannot be expressed and decode recursion is bounded by schema depth.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `recast-*` crates (this is the leaf of the
//!   DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug` and `Clone` where contents permit.

pub mod error;
pub mod path;
pub mod profile;
pub mod shape;
pub mod typed;

// Re-export primary types for ergonomic imports.
pub use error::{CollectionErrors, DecodeError, SchemaError, WrongCollectionItem};
pub use path::ValuePath;
pub use profile::StructProfile;
pub use shape::{
    FieldDefault, FieldSpec, ScalarCheck, ScalarKind, Shape, StructBuilder, StructShape,
    TypeExpr,
};
pub use typed::{StructValue, TypedValue};

/// The dynamic value representation decoded from and encoded to.
pub use serde_json::Value;
