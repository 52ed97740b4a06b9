//! ACS object backend: peephole optimizer, opcode encoder and chunk assembler.
//!
//! This crate turns a finalized [`acsc_core::Program`] plus a stream of
//! instructions from code generation into the bytes of an object file:
//! - `emit` - code buffer, opcode encoder, peephole optimizer, chunks
//! - `options` - output format selection

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod emit;
pub mod options;

#[cfg(test)]
pub mod test_utils;

pub use emit::{CodeBuffer, EmitError, Emitter, ObjectWriter, publish};
pub use options::CompileOptions;
