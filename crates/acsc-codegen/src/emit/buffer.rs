//! Seekable byte sink made of fixed-size pages.
//!
//! Writes at a repositioned cursor overwrite in place; writing past the
//! committed length extends it. Every page except the last is full, so an
//! absolute position maps to `(pos / PAGE_SIZE, pos % PAGE_SIZE)`.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use acsc_bytecode::is_object_signature;
use tracing::debug;

use super::EmitError;

/// Capacity of one page.
pub const PAGE_SIZE: usize = 65536;

#[derive(Debug)]
pub struct CodeBuffer {
    /// Each page's length is its used size.
    pages: Vec<Vec<u8>>,
    page: usize,
    pos: usize,
}

impl CodeBuffer {
    pub fn new() -> Self {
        Self {
            pages: vec![Vec::with_capacity(PAGE_SIZE)],
            page: 0,
            pos: 0,
        }
    }

    pub fn append_bytes(&mut self, mut bytes: &[u8]) {
        while !bytes.is_empty() {
            if self.pos == PAGE_SIZE {
                self.next_page();
            }
            let page = &mut self.pages[self.page];
            let n = bytes.len().min(PAGE_SIZE - self.pos);
            let (head, rest) = bytes.split_at(n);

            let overlap = (page.len() - self.pos).min(n);
            page[self.pos..self.pos + overlap].copy_from_slice(&head[..overlap]);
            page.extend_from_slice(&head[overlap..]);

            self.pos += n;
            bytes = rest;
        }
    }

    pub fn append_u8(&mut self, value: u8) {
        self.append_bytes(&[value]);
    }

    pub fn append_i16(&mut self, value: i16) {
        self.append_bytes(&value.to_le_bytes());
    }

    pub fn append_i32(&mut self, value: i32) {
        self.append_bytes(&value.to_le_bytes());
    }

    /// String bytes without a terminator.
    pub fn append_str(&mut self, value: &str) {
        self.append_bytes(value.as_bytes());
    }

    /// String bytes followed by a NUL terminator.
    pub fn append_cstr(&mut self, value: &str) {
        self.append_bytes(value.as_bytes());
        self.append_u8(0);
    }

    pub fn append_zeros(&mut self, count: usize) {
        for _ in 0..count {
            self.append_u8(0);
        }
    }

    /// Absolute cursor position.
    pub fn tell(&self) -> usize {
        self.page * PAGE_SIZE + self.pos
    }

    /// Committed length across all pages.
    pub fn len(&self) -> usize {
        (self.pages.len() - 1) * PAGE_SIZE + self.last_page().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move the cursor to an absolute position within the committed bytes.
    pub fn seek(&mut self, pos: usize) {
        assert!(
            pos <= self.len(),
            "seek to {pos} past end of buffer ({} bytes)",
            self.len()
        );
        let (page, offset) = (pos / PAGE_SIZE, pos % PAGE_SIZE);
        if page == self.pages.len() {
            // End of a completely full last page.
            self.page = page - 1;
            self.pos = PAGE_SIZE;
        } else {
            self.page = page;
            self.pos = offset;
        }
    }

    /// Move the cursor to the end of everything written so far.
    pub fn seek_end(&mut self) {
        self.page = self.pages.len() - 1;
        self.pos = self.last_page().len();
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.pages.concat()
    }

    pub fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        for page in &self.pages {
            out.write_all(page)?;
        }
        Ok(())
    }

    /// Write the buffer to `path`.
    ///
    /// An existing file is only replaced if it starts with an object file
    /// signature.
    pub fn flush_to_file(&self, path: &Path) -> Result<(), EmitError> {
        let io_error = |source: io::Error| EmitError::Io {
            path: path.to_path_buf(),
            source,
        };

        match File::open(path) {
            Ok(file) => {
                let mut id = Vec::with_capacity(4);
                file.take(4).read_to_end(&mut id).map_err(io_error)?;
                if !is_object_signature(&id) {
                    return Err(EmitError::UnknownFileOverwrite(path.to_path_buf()));
                }
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(io_error(err)),
        }

        let mut file = File::create(path).map_err(io_error)?;
        self.write_to(&mut file).map_err(io_error)?;
        file.flush().map_err(io_error)?;

        debug!(path = %path.display(), len = self.len(), "flushed object file");
        Ok(())
    }

    fn next_page(&mut self) {
        self.page += 1;
        if self.page == self.pages.len() {
            self.pages.push(Vec::with_capacity(PAGE_SIZE));
        }
        self.pos = 0;
    }

    fn last_page(&self) -> &Vec<u8> {
        &self.pages[self.pages.len() - 1]
    }
}

impl Default for CodeBuffer {
    fn default() -> Self {
        Self::new()
    }
}
