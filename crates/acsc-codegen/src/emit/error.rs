//! Error types for object emission.

use std::io;
use std::path::PathBuf;

use acsc_core::StorageClass;

/// Fatal error during object emission. Compilation stops at the first one.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// A variable index lies past its storage class's location limit.
    #[error("too many {storage} variables: index {index} exceeds the limit of {limit}")]
    TooManyVariables {
        storage: StorageClass,
        index: u32,
        limit: u32,
    },
    /// The compact format's call index is a single byte.
    #[error("too many functions: {count} (max {limit} in the compact format)")]
    TooManyFunctions { count: usize, limit: usize },
    #[error("action special {0} cannot be called directly")]
    ActionSpecialOutOfRange(i32),
    #[error("action special {id} takes at most 5 arguments, got {argc}")]
    TooManySpecialArgs { id: i32, argc: usize },
    #[error("unknown opcode id: {0}")]
    UnknownOpcode(u16),
    /// The destination exists and is not an object file.
    #[error("trying to overwrite unknown file: {}", .0.display())]
    UnknownFileOverwrite(PathBuf),
    #[error("failed to write object file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
