//! Container constants and opcode encoding shared by writer and reader.

use serde::{Deserialize, Serialize};

/// Magic of the full format: every opcode and most arguments are words.
pub const MAGIC_FULL: [u8; 4] = *b"ACSE";
/// Magic of the compact format: variable-width opcodes and arguments.
pub const MAGIC_COMPACT: [u8; 4] = *b"ACSe";

/// Magic followed by the offset of the chunk region.
pub const HEADER_SIZE: usize = 8;

/// Smaller files are rejected by the machine as an unknown format.
pub const MIN_OBJECT_SIZE: usize = 32;

/// Frame size every script gets without an SVCT entry.
pub const DEFAULT_SCRIPT_SIZE: u32 = 20;

/// Multiplier of the STRE per-string key.
pub const STR_ENCRYPTION_CONSTANT: i32 = 157135;

/// First byte of a two-byte compact opcode.
pub const COMPACT_ESCAPE: u8 = 240;

/// Wire encoding of an object file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectFormat {
    /// `ACSe`: byte-sized opcodes and indices where possible.
    #[default]
    Compact,
    /// `ACSE`: word-sized opcodes and arguments.
    Full,
}

impl ObjectFormat {
    pub fn magic(self) -> [u8; 4] {
        match self {
            Self::Compact => MAGIC_COMPACT,
            Self::Full => MAGIC_FULL,
        }
    }

    pub fn from_magic(magic: [u8; 4]) -> Option<Self> {
        match magic {
            MAGIC_COMPACT => Some(Self::Compact),
            MAGIC_FULL => Some(Self::Full),
            _ => None,
        }
    }

    pub fn is_compact(self) -> bool {
        self == Self::Compact
    }
}

/// Whether `bytes` start like any object file of the ACS family.
///
/// Accepts `ACS\0` (the oldest layout) as well as both chunked formats.
pub fn is_object_signature(bytes: &[u8]) -> bool {
    matches!(bytes, [b'A', b'C', b'S', b'\0' | b'E' | b'e', ..])
}

/// An encoded opcode: up to four bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodedOpcode {
    bytes: [u8; 4],
    len: u8,
}

impl EncodedOpcode {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }
}

/// Encode an opcode id.
///
/// Compact ids below 240 take one byte; larger ids take the escape byte
/// followed by `id - 240`. Full ids are little-endian words.
pub fn encode_opcode(id: u16, format: ObjectFormat) -> EncodedOpcode {
    match format {
        ObjectFormat::Full => EncodedOpcode {
            bytes: (id as i32).to_le_bytes(),
            len: 4,
        },
        ObjectFormat::Compact if id >= COMPACT_ESCAPE as u16 => {
            debug_assert!(id - (COMPACT_ESCAPE as u16) <= u8::MAX as u16);
            EncodedOpcode {
                bytes: [COMPACT_ESCAPE, (id - COMPACT_ESCAPE as u16) as u8, 0, 0],
                len: 2,
            }
        }
        ObjectFormat::Compact => EncodedOpcode {
            bytes: [id as u8, 0, 0, 0],
            len: 1,
        },
    }
}

/// Decode an opcode id, returning it with the number of bytes consumed.
pub fn decode_opcode(bytes: &[u8], format: ObjectFormat) -> Option<(u16, usize)> {
    match format {
        ObjectFormat::Full => {
            let word: [u8; 4] = bytes.get(..4)?.try_into().ok()?;
            Some((u32::from_le_bytes(word) as u16, 4))
        }
        ObjectFormat::Compact => match *bytes.first()? {
            COMPACT_ESCAPE => {
                let next = *bytes.get(1)?;
                Some((COMPACT_ESCAPE as u16 + next as u16, 2))
            }
            byte => Some((byte as u16, 1)),
        },
    }
}

/// Four-byte chunk tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkTag(pub [u8; 4]);

impl ChunkTag {
    pub const SPTR: Self = Self(*b"SPTR");
    pub const SFLG: Self = Self(*b"SFLG");
    pub const SVCT: Self = Self(*b"SVCT");
    pub const FUNC: Self = Self(*b"FUNC");
    pub const FNAM: Self = Self(*b"FNAM");
    pub const STRL: Self = Self(*b"STRL");
    pub const STRE: Self = Self(*b"STRE");
    pub const MINI: Self = Self(*b"MINI");
    pub const ARAY: Self = Self(*b"ARAY");
    pub const AINI: Self = Self(*b"AINI");
    pub const LOAD: Self = Self(*b"LOAD");
    pub const MIMP: Self = Self(*b"MIMP");
    pub const AIMP: Self = Self(*b"AIMP");
    pub const MEXP: Self = Self(*b"MEXP");
    pub const MSTR: Self = Self(*b"MSTR");
    pub const ASTR: Self = Self(*b"ASTR");
    pub const ATAG: Self = Self(*b"ATAG");

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("????")
    }
}

impl std::fmt::Display for ChunkTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Padding needed to bring `len` to a multiple of 4.
pub fn align_pad(len: usize) -> usize {
    (4 - len % 4) % 4
}
