//! # recast-decode — Schema-Directed Decode Engine
//!
//! The decode half of Recast: recursive interpretation of dynamic values
//! against target shapes from `recast-core`, producing typed values or
//! precise, path-bearing taxonomy errors.
//!
//! ## Key Design Principles
//!
//! 1. **One entry point.** [`decode_input`] (or [`Decoder::decode`] when a
//!    registry is in play) is the sole call the rest of a system needs.
//!
//! 2. **Custom decoders are first-class.** The [`DecoderRegistry`] is
//!    consulted before structural dispatch on every step, so a registered
//!    decoder overrides the engine wherever its identity appears.
//!
//! 3. **Errors are the product.** The engine never panics on input data
//!    and never returns partial results; a failed decode is a structured
//!    explanation, down to the exact path.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Logging via `tracing` at trace level only; this crate never installs
//!   a subscriber.

pub mod engine;
pub mod registry;

pub use engine::{decode_input, Decoder};
pub use registry::{CustomDecoder, DecoderRegistry};
