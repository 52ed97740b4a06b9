//! Object file header (8 bytes).
//!
//! Layout: 0-3 magic (`ACSE` or `ACSe`), 4-7 offset of the chunk region.
//! The writer reserves it first and fills it in last, once the code
//! region's size is known.

use super::format::{HEADER_SIZE, ObjectFormat};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub format: ObjectFormat,
    /// Absolute offset of the first chunk.
    pub chunk_offset: u32,
}

impl Header {
    pub fn new(format: ObjectFormat, chunk_offset: u32) -> Self {
        Self {
            format,
            chunk_offset,
        }
    }

    /// Decode a header. `None` if the bytes are short or the magic unknown.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < HEADER_SIZE {
            return None;
        }
        let format = ObjectFormat::from_magic([bytes[0], bytes[1], bytes[2], bytes[3]])?;
        let chunk_offset = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        Some(Self {
            format,
            chunk_offset,
        })
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.format.magic());
        bytes[4..8].copy_from_slice(&self.chunk_offset.to_le_bytes());
        bytes
    }
}
