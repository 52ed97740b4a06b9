//! Chunk-level reader for produced object files.
//!
//! The [`Object`] struct validates the header and walks the chunk region
//! the way the virtual machine's loader does: tag, length, body, repeated
//! until the end of the file.

use std::io;
use std::path::Path;

use super::format::{ChunkTag, HEADER_SIZE, ObjectFormat};
use super::header::Header;
use super::strings::decrypt_string;

/// Object load error.
#[derive(Debug, thiserror::Error)]
pub enum ObjectError {
    #[error("invalid magic: expected ACSE or ACSe")]
    InvalidMagic,
    #[error("file too small: {0} bytes (minimum {HEADER_SIZE})")]
    FileTooSmall(usize),
    #[error("chunk offset {offset} is past the end of the file ({len} bytes)")]
    ChunkOffsetOutOfRange { offset: u32, len: usize },
    #[error("chunk at {offset} is truncated")]
    TruncatedChunk { offset: usize },
    #[error("malformed {0} chunk")]
    MalformedChunk(ChunkTag),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// One chunk of the chunk region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub tag: ChunkTag,
    /// Absolute offset of the tag.
    pub offset: usize,
    pub body: &'a [u8],
}

impl<'a> Chunk<'a> {
    pub fn i32_at(&self, pos: usize) -> Option<i32> {
        let word: [u8; 4] = self.body.get(pos..pos + 4)?.try_into().ok()?;
        Some(i32::from_le_bytes(word))
    }

    pub fn i16_at(&self, pos: usize) -> Option<i16> {
        let half: [u8; 2] = self.body.get(pos..pos + 2)?.try_into().ok()?;
        Some(i16::from_le_bytes(half))
    }

    /// NUL-terminated bytes starting at `pos`, terminator excluded.
    pub fn cstr_at(&self, pos: usize) -> Option<&'a [u8]> {
        let rest = self.body.get(pos..)?;
        let end = rest.iter().position(|&b| b == 0)?;
        Some(&rest[..end])
    }

    /// The body read as consecutive little-endian words.
    pub fn words(&self) -> impl Iterator<Item = i32> + 'a {
        self.body
            .chunks_exact(4)
            .map(|w| i32::from_le_bytes([w[0], w[1], w[2], w[3]]))
    }
}

/// Iterator over the chunk region.
pub struct ChunkIter<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for ChunkIter<'a> {
    type Item = Result<Chunk<'a>, ObjectError>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.bytes[self.pos..];
        // Zero padding after the last chunk ends the region.
        if rest.len() < 8 || rest[..4] == [0; 4] {
            return None;
        }

        let offset = self.pos;
        let tag = ChunkTag([rest[0], rest[1], rest[2], rest[3]]);
        let len = u32::from_le_bytes([rest[4], rest[5], rest[6], rest[7]]) as usize;
        let Some(body) = rest.get(8..8 + len) else {
            self.pos = self.bytes.len();
            return Some(Err(ObjectError::TruncatedChunk { offset }));
        };

        self.pos += 8 + len;
        Some(Ok(Chunk { tag, offset, body }))
    }
}

/// A produced object file.
#[derive(Debug)]
pub struct Object {
    bytes: Vec<u8>,
    header: Header,
}

impl Object {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ObjectError> {
        if bytes.len() < HEADER_SIZE {
            return Err(ObjectError::FileTooSmall(bytes.len()));
        }

        let header = Header::from_bytes(&bytes).ok_or(ObjectError::InvalidMagic)?;
        let chunk_offset = header.chunk_offset as usize;
        if !(HEADER_SIZE..=bytes.len()).contains(&chunk_offset) {
            return Err(ObjectError::ChunkOffsetOutOfRange {
                offset: header.chunk_offset,
                len: bytes.len(),
            });
        }

        Ok(Self { bytes, header })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ObjectError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(bytes)
    }

    pub fn header(&self) -> Header {
        self.header
    }

    pub fn format(&self) -> ObjectFormat {
        self.header.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The code region between the header and the first chunk.
    pub fn code(&self) -> &[u8] {
        &self.bytes[HEADER_SIZE..self.header.chunk_offset as usize]
    }

    pub fn chunks(&self) -> ChunkIter<'_> {
        ChunkIter {
            bytes: &self.bytes,
            pos: self.header.chunk_offset as usize,
        }
    }

    /// First well-formed chunk with the given tag.
    pub fn chunk(&self, tag: ChunkTag) -> Option<Chunk<'_>> {
        self.chunks_tagged(tag).next()
    }

    /// Every well-formed chunk with the given tag, in file order.
    pub fn chunks_tagged(&self, tag: ChunkTag) -> impl Iterator<Item = Chunk<'_>> {
        self.chunks()
            .map_while(Result::ok)
            .filter(move |c| c.tag == tag)
    }

    /// Decode the string table from STRL or STRE.
    ///
    /// Unused slots come back as `None`.
    pub fn strings(&self) -> Result<Vec<Option<Vec<u8>>>, ObjectError> {
        let (chunk, encrypted) = match self.chunk(ChunkTag::STRL) {
            Some(chunk) => (chunk, false),
            None => match self.chunk(ChunkTag::STRE) {
                Some(chunk) => (chunk, true),
                None => return Ok(Vec::new()),
            },
        };

        let malformed = || ObjectError::MalformedChunk(chunk.tag);
        let count = chunk.i32_at(4).ok_or_else(malformed)?;
        let count = usize::try_from(count).map_err(|_| malformed())?;
        // The offset table must fit in the chunk before anything is read.
        let table_end = count.checked_mul(4).and_then(|n| n.checked_add(12));
        if table_end.is_none_or(|end| end > chunk.body.len()) {
            return Err(malformed());
        }

        let mut strings = Vec::new();
        for i in 0..count {
            let offset = chunk.i32_at(12 + i * 4).ok_or_else(malformed)? as usize;
            if offset == 0 {
                strings.push(None);
                continue;
            }
            let text = if encrypted {
                let raw = chunk.body.get(offset..).ok_or_else(malformed)?;
                decrypt_string(raw, offset as u32).ok_or_else(malformed)?
            } else {
                chunk.cstr_at(offset).ok_or_else(malformed)?.to_vec()
            };
            strings.push(Some(text));
        }
        Ok(strings)
    }
}
