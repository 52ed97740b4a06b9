//! Object file format of the ACS virtual machine.
//!
//! This crate contains:
//! - Opcode definitions (ids, mnemonics, argument layouts, direct forms)
//! - Container constants, opcode encoding and chunk tags
//! - The file header and STRE string encryption
//! - A chunk-level reader for produced files

mod format;
mod header;
mod object;
mod opcode;
mod strings;


pub use format::{
    COMPACT_ESCAPE, ChunkTag, DEFAULT_SCRIPT_SIZE, EncodedOpcode, HEADER_SIZE, MAGIC_COMPACT,
    MAGIC_FULL, MIN_OBJECT_SIZE, ObjectFormat, STR_ENCRYPTION_CONSTANT, align_pad, decode_opcode,
    encode_opcode, is_object_signature,
};
pub use header::Header;
pub use object::{Chunk, ChunkIter, Object, ObjectError};
pub use opcode::{ArgCount, ArgLayout, DirectForm, MAX_OPCODE_ID, Opcode};
pub use strings::{decrypt_string, encrypt_string};
