//! Object file assembly.
//!
//! Layout: an 8-byte header, the code region holding every script and
//! function body, then the chunk region. The header is reserved up front
//! and patched last, once the chunk offset is known.

use std::path::Path;

use acsc_bytecode::{HEADER_SIZE, Header, MIN_OBJECT_SIZE, Opcode};
use acsc_core::Program;
use tracing::{debug, instrument};

use super::chunks::{ChunkAssembler, ChunkWriter, CodeOffsets};
use super::{CodeBuffer, EmitError, Emitter, Encoder};
use crate::CompileOptions;

/// Call indices are a single byte in the compact format.
const MAX_COMPACT_FUNCTIONS: usize = 256;

/// Writes one program's object file.
///
/// Code generation emits each body through [`ObjectWriter::begin_script`] or
/// [`ObjectWriter::begin_function`], then [`ObjectWriter::finish`] appends
/// the chunks.
#[derive(Debug)]
pub struct ObjectWriter<'a> {
    program: &'a Program,
    options: CompileOptions,
    emitter: Emitter,
    scripts: Vec<Option<u32>>,
    functions: Vec<Option<u32>>,
}

impl<'a> ObjectWriter<'a> {
    /// Validates resource limits before anything is written.
    pub fn new(program: &'a Program, options: CompileOptions) -> Result<Self, EmitError> {
        check_limits(program, options)?;

        let mut encoder = Encoder::new(options.format);
        encoder.buffer_mut().append_zeros(HEADER_SIZE);

        Ok(Self {
            program,
            options,
            emitter: Emitter::from_encoder(encoder),
            scripts: vec![None; program.scripts.len()],
            functions: vec![None; program.user_functions().count()],
        })
    }

    pub fn program(&self) -> &'a Program {
        self.program
    }

    pub fn emitter(&mut self) -> &mut Emitter {
        &mut self.emitter
    }

    /// Start the body of `program.scripts[index]` at the current position.
    pub fn begin_script(&mut self, index: usize) -> &mut Emitter {
        let offset = self.emitter.tell() as u32;
        self.scripts[index] = Some(offset);
        &mut self.emitter
    }

    /// Start the body of the `index`-th local user function.
    pub fn begin_function(&mut self, index: usize) -> &mut Emitter {
        let offset = self.emitter.tell() as u32;
        self.functions[index] = Some(offset);
        &mut self.emitter
    }

    /// Close the code region, write the chunks and patch the header.
    ///
    /// # Panics
    ///
    /// If a script or function body was never started.
    pub fn finish(mut self) -> CodeBuffer {
        if self.options.format.is_compact() {
            while self.emitter.tell() % 4 != 0 {
                self.emitter.emit_opcode(Opcode::Terminate);
            }
        }
        let chunk_offset = self.emitter.tell();
        debug!(chunk_offset, "code region complete");

        let offsets = CodeOffsets {
            scripts: collect_offsets(&self.scripts, "script"),
            functions: collect_offsets(&self.functions, "function"),
        };

        let mut buffer = self.emitter.into_buffer();
        let assembler = ChunkAssembler::new(self.program, &offsets, self.options.encrypt_strings);
        assembler.write(&mut ChunkWriter::new(&mut buffer));

        if buffer.len() < MIN_OBJECT_SIZE {
            buffer.append_zeros(MIN_OBJECT_SIZE - buffer.len());
        }

        let header = Header::new(self.options.format, chunk_offset as u32);
        buffer.seek(0);
        buffer.append_bytes(&header.to_bytes());
        buffer.seek_end();
        buffer
    }
}

fn collect_offsets(offsets: &[Option<u32>], what: &str) -> Vec<u32> {
    offsets
        .iter()
        .enumerate()
        .map(|(i, offset)| offset.unwrap_or_else(|| panic!("{what} {i} has no emitted body")))
        .collect()
}

fn check_limits(program: &Program, options: CompileOptions) -> Result<(), EmitError> {
    for var in &program.vars {
        let Some(limit) = var.storage.location_limit() else {
            continue;
        };
        if var.index >= limit {
            return Err(EmitError::TooManyVariables {
                storage: var.storage,
                index: var.index,
                limit,
            });
        }
    }

    let count = program.function_table().count();
    if options.format.is_compact() && count > MAX_COMPACT_FUNCTIONS {
        return Err(EmitError::TooManyFunctions {
            count,
            limit: MAX_COMPACT_FUNCTIONS,
        });
    }
    Ok(())
}

/// Emit a complete object file for `program` and write it to `path`.
///
/// `write_code` emits every script and function body. Nothing is written
/// to disk unless every step succeeds.
#[instrument(skip_all, fields(path = %path.display(), format = ?options.format))]
pub fn publish<F>(
    program: &Program,
    options: CompileOptions,
    path: &Path,
    write_code: F,
) -> Result<(), EmitError>
where
    F: FnOnce(&mut ObjectWriter<'_>) -> Result<(), EmitError>,
{
    let mut writer = ObjectWriter::new(program, options)?;
    write_code(&mut writer)?;
    writer.finish().flush_to_file(path)
}
