//! Object file emission.
//!
//! Data flows one way. Code generation calls into the [`Emitter`]
//! (peephole optimizer), which drives the [`Encoder`], which writes into
//! the [`CodeBuffer`]. Once all bodies are emitted, [`ObjectWriter`]
//! appends the metadata chunks and patches the header.

mod buffer;
mod call;
mod chunks;
mod encoder;
mod error;
mod fold;
mod object;
mod peephole;

#[cfg(test)]
mod buffer_tests;
#[cfg(test)]
mod chunks_tests;

pub use buffer::{CodeBuffer, PAGE_SIZE};
pub use chunks::{ChunkAssembler, ChunkWriter, CodeOffsets};
pub use encoder::Encoder;
pub use error::EmitError;
pub use fold::{BinaryOp, Fold, UnaryOp};
pub use object::{ObjectWriter, publish};
pub use peephole::Emitter;
