//! Opcode and argument encoding for the two object formats.

use acsc_bytecode::{ArgLayout, ObjectFormat, Opcode, align_pad, encode_opcode};

use super::CodeBuffer;

/// Writes opcodes and their inline arguments into a [`CodeBuffer`].
///
/// Argument widths depend on the format and on the most recently written
/// opcode, so the encoder tracks that opcode and how many of its arguments
/// have been written.
#[derive(Debug)]
pub struct Encoder {
    buffer: CodeBuffer,
    format: ObjectFormat,
    opcode: Opcode,
    args: usize,
}

impl Encoder {
    pub fn new(format: ObjectFormat) -> Self {
        Self::with_buffer(CodeBuffer::new(), format)
    }

    pub fn with_buffer(buffer: CodeBuffer, format: ObjectFormat) -> Self {
        Self {
            buffer,
            format,
            opcode: Opcode::None,
            args: 0,
        }
    }

    pub fn format(&self) -> ObjectFormat {
        self.format
    }

    /// The opcode whose arguments are currently being written.
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    pub fn args_written(&self) -> usize {
        self.args
    }

    pub fn buffer(&self) -> &CodeBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut CodeBuffer {
        &mut self.buffer
    }

    pub fn into_buffer(self) -> CodeBuffer {
        self.buffer
    }

    pub fn write_opcode(&mut self, opcode: Opcode) {
        let encoded = encode_opcode(opcode.id(), self.format);
        self.buffer.append_bytes(encoded.as_bytes());
        self.opcode = opcode;
        self.args = 0;
    }

    pub fn write_arg(&mut self, value: i32) {
        let compact = self.format.is_compact();
        match self.opcode.arg_layout() {
            ArgLayout::SpecialCall if compact && self.args == 0 => self.write_u8(value),
            ArgLayout::SpecialCall => self.buffer.append_i32(value),
            ArgLayout::Byte => self.write_u8(value),
            ArgLayout::Index if compact => self.write_u8(value),
            ArgLayout::CallFunc if compact && self.args == 0 => self.write_u8(value),
            ArgLayout::CallFunc if compact => self.buffer.append_i16(value as i16),
            ArgLayout::Aligned => {
                if self.args == 0 {
                    let pad = align_pad(self.buffer.tell());
                    self.buffer.append_zeros(pad);
                }
                self.buffer.append_i32(value);
            }
            ArgLayout::Index | ArgLayout::CallFunc | ArgLayout::Word => {
                self.buffer.append_i32(value)
            }
        }
        self.args += 1;
    }

    /// Byte-wide arguments keep the low byte.
    fn write_u8(&mut self, value: i32) {
        self.buffer.append_u8(value as u8);
    }
}
