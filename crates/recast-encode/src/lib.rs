//! # recast-encode — Dynamic Value Encoding for Recast
//!
//! The encode half of Recast: conversion of domain values into dynamic
//! values through the [`ToDynamic`] interface, a serde bridge for derived
//! model types, and empty-value pruning for compact output.
//!
//! ## Key Design Principles
//!
//! 1. **Conversion is trait dispatch.** Every encodable type carries its
//!    own [`ToDynamic`] impl, resolved at compile time. There is no
//!    runtime lookup and no fallback chain; a type without an impl does
//!    not compile.
//!
//! 2. **Every value declares its class.** The [`ValueClass`] tag lets
//!    callers branch on what a value is (scalar, sequence, structure,
//!    enumerated, custom) without inspecting its encoded form.
//!
//! 3. **First failure wins.** Encoding does not accumulate errors the
//!    way decoding does: the first non-encodable value aborts the
//!    conversion.
//!
//! 4. **Pruning is a separate pass.** Encoding always produces the full
//!    dynamic form; [`drop_empty`] compacts it afterwards under an
//!    explicit allow-list, so the two concerns compose without either
//!    knowing about the other.
//!
//! ## Crate Policy
//!
//! This crate is schema-free and independent of the decode path: it
//! never consults shape declarations and has no knowledge of decode
//! errors. Output is always `serde_json::Value`.

pub mod convert;
pub mod prune;

pub use convert::{serialize_to_dynamic, to_dynamic, EncodeError, ToDynamic, ValueClass};
pub use prune::{drop_empty, is_empty_value, to_dynamic_pruned};
