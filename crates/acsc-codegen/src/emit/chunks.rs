//! Metadata chunks written after the code region.
//!
//! Every chunk is a 4-byte tag, a 32-bit content length and the content.
//! Lengths are backpatched once the content is written. A missing chunk
//! means there is no data of that kind.

use acsc_bytecode::{ChunkTag, DEFAULT_SCRIPT_SIZE, align_pad, encrypt_string};
use acsc_core::{Program, Var, VarShape};
use tracing::debug;

use super::CodeBuffer;

/// Frames chunk content with its tag and length.
pub struct ChunkWriter<'a> {
    buffer: &'a mut CodeBuffer,
}

impl<'a> ChunkWriter<'a> {
    pub fn new(buffer: &'a mut CodeBuffer) -> Self {
        Self { buffer }
    }

    /// Append a chunk whose content `body` writes at the end of the buffer.
    pub fn write_chunk(&mut self, tag: ChunkTag, body: impl FnOnce(&mut CodeBuffer)) {
        self.buffer.append_bytes(&tag.0);
        let len_pos = self.buffer.tell();
        self.buffer.append_i32(0);

        let start = self.buffer.tell();
        body(self.buffer);
        let len = self.buffer.tell() - start;

        self.buffer.seek(len_pos);
        self.buffer.append_i32(len as i32);
        self.buffer.seek_end();

        debug!(%tag, len, "wrote chunk");
    }
}

/// Code offsets of every body, parallel to the program's scripts and
/// local functions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeOffsets {
    pub scripts: Vec<u32>,
    pub functions: Vec<u32>,
}

/// Writes every chunk a program needs, in the order the machine expects.
pub struct ChunkAssembler<'a> {
    program: &'a Program,
    offsets: &'a CodeOffsets,
    encrypt_strings: bool,
}

impl<'a> ChunkAssembler<'a> {
    pub fn new(program: &'a Program, offsets: &'a CodeOffsets, encrypt_strings: bool) -> Self {
        Self {
            program,
            offsets,
            encrypt_strings,
        }
    }

    pub fn write(&self, out: &mut ChunkWriter<'_>) {
        self.write_scripts(out);
        self.write_script_flags(out);
        self.write_script_frames(out);
        self.write_functions(out);
        self.write_function_names(out);
        self.write_strings(out);
        self.write_map_inits(out);
        self.write_arrays(out);
        self.write_array_inits(out);
        self.write_libraries(out);
        self.write_imported_scalars(out);
        self.write_imported_arrays(out);
        if self.program.importable {
            self.write_exports(out);
            self.write_string_vars(out);
            self.write_array_tags(out);
        }
    }

    // ========================================================================
    // Scripts
    // ========================================================================

    fn write_scripts(&self, out: &mut ChunkWriter<'_>) {
        let scripts = &self.program.scripts;
        if scripts.is_empty() {
            return;
        }
        out.write_chunk(ChunkTag::SPTR, |buf| {
            for (i, script) in scripts.iter().enumerate() {
                let offset = self.offsets.scripts[i];
                buf.append_i16(script.number as i16);
                buf.append_i16(script.kind.code());
                buf.append_i32(offset as i32);
                buf.append_i32(script.params as i32);
            }
        });
    }

    fn write_script_flags(&self, out: &mut ChunkWriter<'_>) {
        let mut flagged = self
            .program
            .scripts
            .iter()
            .filter(|s| !s.flags.is_empty())
            .peekable();
        if flagged.peek().is_none() {
            return;
        }
        out.write_chunk(ChunkTag::SFLG, |buf| {
            for script in flagged {
                buf.append_i16(script.number as i16);
                buf.append_i16(script.flags.bits() as i16);
            }
        });
    }

    fn write_script_frames(&self, out: &mut ChunkWriter<'_>) {
        let mut large = self
            .program
            .scripts
            .iter()
            .filter(|s| s.size > DEFAULT_SCRIPT_SIZE)
            .peekable();
        if large.peek().is_none() {
            return;
        }
        out.write_chunk(ChunkTag::SVCT, |buf| {
            for script in large {
                buf.append_i16(script.number as i16);
                buf.append_i16(script.size as i16);
            }
        });
    }

    // ========================================================================
    // Functions
    // ========================================================================

    fn write_functions(&self, out: &mut ChunkWriter<'_>) {
        if self.program.function_table().next().is_none() {
            return;
        }
        out.write_chunk(ChunkTag::FUNC, |buf| {
            for function in self.program.imported_functions() {
                buf.append_u8(function.param_slots() as u8);
                buf.append_u8(0);
                buf.append_u8(function.has_return as u8);
                buf.append_u8(0);
                buf.append_i32(0);
            }
            for (i, function) in self.program.user_functions().enumerate() {
                let size = function.user().map_or(0, |u| u.size);
                buf.append_u8(function.param_slots() as u8);
                buf.append_u8(size.saturating_sub(function.max_params) as u8);
                buf.append_u8(function.has_return as u8);
                buf.append_u8(0);
                buf.append_i32(self.offsets.functions[i] as i32);
            }
        });
    }

    fn write_function_names(&self, out: &mut ChunkWriter<'_>) {
        let names: Vec<&str> = self
            .program
            .function_table()
            .map(|f| f.name.as_str())
            .collect();
        if names.is_empty() {
            return;
        }
        out.write_chunk(ChunkTag::FNAM, |buf| write_name_table(buf, &names));
    }

    // ========================================================================
    // Strings
    // ========================================================================

    fn write_strings(&self, out: &mut ChunkWriter<'_>) {
        let strings = &self.program.strings;
        let count = strings.count();
        if count == 0 {
            return;
        }
        let tag = if self.encrypt_strings {
            ChunkTag::STRE
        } else {
            ChunkTag::STRL
        };
        let entries: Vec<_> = strings.iter().take(count).collect();

        out.write_chunk(tag, |buf| {
            buf.append_i32(0);
            buf.append_i32(count as i32);
            buf.append_i32(0);

            let mut offset = 12 + 4 * count;
            for entry in &entries {
                if entry.used {
                    buf.append_i32(offset as i32);
                    offset += entry.value.len() + 1;
                } else {
                    buf.append_i32(0);
                }
            }

            let mut offset = 12 + 4 * count;
            for entry in entries.iter().filter(|e| e.used) {
                if self.encrypt_strings {
                    buf.append_bytes(&encrypt_string(&entry.value, offset as u32));
                } else {
                    buf.append_bytes(&entry.value);
                    buf.append_u8(0);
                }
                offset += entry.value.len() + 1;
            }
            buf.append_zeros(align_pad(offset));
        });
    }

    // ========================================================================
    // Map variables
    // ========================================================================

    fn write_map_inits(&self, out: &mut ChunkWriter<'_>) {
        let initialized: Vec<&Var> = self
            .program
            .map_vars()
            .filter(|v| v.is_scalar() && v.initial_value() != 0)
            .collect();
        let Some(first) = initialized.first() else {
            return;
        };
        out.write_chunk(ChunkTag::MINI, |buf| {
            buf.append_i32(first.index as i32);
            for var in &initialized {
                buf.append_i32(var.initial_value());
            }
        });
    }

    fn write_arrays(&self, out: &mut ChunkWriter<'_>) {
        let visible = self.map_aggregates().filter(|v| !v.hidden);
        let hidden = self.map_aggregates().filter(|v| v.hidden);
        let arrays: Vec<&Var> = visible.chain(hidden).collect();
        if arrays.is_empty() {
            return;
        }
        out.write_chunk(ChunkTag::ARAY, |buf| {
            for var in arrays {
                buf.append_i32(var.index as i32);
                buf.append_i32(var.size as i32);
            }
        });
    }

    fn write_array_inits(&self, out: &mut ChunkWriter<'_>) {
        for var in self.map_aggregates() {
            let len = var.initialized_len();
            if len == 0 {
                continue;
            }
            out.write_chunk(ChunkTag::AINI, |buf| {
                buf.append_i32(var.index as i32);
                for element in &var.initial[..len] {
                    buf.append_i32(element.value);
                }
            });
        }
    }

    fn map_aggregates(&self) -> impl Iterator<Item = &'a Var> {
        self.program.map_vars().filter(|v| v.is_aggregate())
    }

    // ========================================================================
    // Imports
    // ========================================================================

    fn write_libraries(&self, out: &mut ChunkWriter<'_>) {
        let imports = &self.program.imports;
        if imports.is_empty() {
            return;
        }
        out.write_chunk(ChunkTag::LOAD, |buf| {
            let mut len = 0;
            for lib in imports {
                buf.append_cstr(&lib.name);
                len += lib.name.len() + 1;
            }
            buf.append_zeros(align_pad(len));
        });
    }

    fn write_imported_scalars(&self, out: &mut ChunkWriter<'_>) {
        let scalars: Vec<&Var> = self
            .program
            .used_imported_map_vars()
            .filter(|v| v.is_scalar())
            .collect();
        if scalars.is_empty() {
            return;
        }
        out.write_chunk(ChunkTag::MIMP, |buf| {
            for var in scalars {
                buf.append_i32(var.index as i32);
                buf.append_cstr(&var.name);
            }
        });
    }

    fn write_imported_arrays(&self, out: &mut ChunkWriter<'_>) {
        let arrays: Vec<&Var> = self
            .program
            .used_imported_map_vars()
            .filter(|v| v.is_aggregate())
            .collect();
        if arrays.is_empty() {
            return;
        }
        out.write_chunk(ChunkTag::AIMP, |buf| {
            buf.append_i32(arrays.len() as i32);
            for var in arrays {
                buf.append_i32(var.index as i32);
                buf.append_i32(var.size as i32);
                buf.append_cstr(&var.name);
            }
        });
    }

    // ========================================================================
    // Exports
    // ========================================================================

    fn write_exports(&self, out: &mut ChunkWriter<'_>) {
        let visible = || self.program.map_vars().filter(|v| !v.hidden);
        let aggregates = visible().filter(|v| v.is_aggregate());
        let zeroed = visible().filter(|v| v.is_scalar() && v.initial_value() == 0);
        let initialized = visible().filter(|v| v.is_scalar() && v.initial_value() != 0);

        let names: Vec<&str> = aggregates
            .chain(zeroed)
            .chain(initialized)
            .map(|v| v.name.as_str())
            .collect();
        if names.is_empty() {
            return;
        }
        out.write_chunk(ChunkTag::MEXP, |buf| write_name_table(buf, &names));
    }

    fn write_string_vars(&self, out: &mut ChunkWriter<'_>) {
        let scalars: Vec<u32> = self
            .program
            .map_vars()
            .filter(|v| v.is_scalar() && v.has_string_data)
            .map(|v| v.index)
            .collect();
        write_index_list(out, ChunkTag::MSTR, &scalars);

        let arrays: Vec<u32> = self
            .program
            .map_vars()
            .filter(|v| v.shape == VarShape::Array && v.has_string_data)
            .map(|v| v.index)
            .collect();
        write_index_list(out, ChunkTag::ASTR, &arrays);
    }

    fn write_array_tags(&self, out: &mut ChunkWriter<'_>) {
        let structs = self
            .program
            .map_vars()
            .filter(|v| v.shape == VarShape::Struct && v.has_string_data);
        for var in structs {
            let len = var.tagged_len();
            if len == 0 {
                continue;
            }
            out.write_chunk(ChunkTag::ATAG, |buf| {
                // version
                buf.append_u8(0);
                buf.append_i32(var.index as i32);
                for element in &var.initial[..len] {
                    buf.append_u8(element.tag as u8);
                }
            });
        }
    }
}

/// Count, offsets relative to the content start, NUL-terminated names,
/// then padding to 4 bytes.
fn write_name_table(buf: &mut CodeBuffer, names: &[&str]) {
    buf.append_i32(names.len() as i32);
    let mut offset = 4 + 4 * names.len();
    for name in names {
        buf.append_i32(offset as i32);
        offset += name.len() + 1;
    }
    for name in names {
        buf.append_cstr(name);
    }
    buf.append_zeros(align_pad(offset));
}

fn write_index_list(out: &mut ChunkWriter<'_>, tag: ChunkTag, indices: &[u32]) {
    if indices.is_empty() {
        return;
    }
    out.write_chunk(tag, |buf| {
        for &index in indices {
            buf.append_i32(index as i32);
        }
    });
}
