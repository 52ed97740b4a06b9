#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Program model consumed by the ACS object backend.
//!
//! Upstream phases (parsing, name resolution, type checking, index
//! allocation) produce a [`Program`] whose storage locations are final.
//! The backend only reads it.

mod program;
mod strings;

#[cfg(test)]
mod strings_tests;

pub use program::{
    Element, ElementTag, FuncKind, Function, Library, Program, Script, ScriptFlags, ScriptType,
    StorageClass, UserFunc, Var, VarShape, parse_program,
};
pub use strings::{IndexedString, StringTable};
