//! Test helpers: a code listing decoder and emission shortcuts.

use acsc_bytecode::{ArgCount, ArgLayout, ObjectFormat, Opcode, align_pad, decode_opcode};

use crate::emit::Emitter;

/// Run `f` against a fresh emitter and return the committed bytes.
pub fn emitted(format: ObjectFormat, f: impl FnOnce(&mut Emitter)) -> Vec<u8> {
    let mut emitter = Emitter::new(format);
    f(&mut emitter);
    emitter.into_buffer().to_vec()
}

/// Like [`emitted`], rendered as a listing.
pub fn emitted_listing(format: ObjectFormat, f: impl FnOnce(&mut Emitter)) -> String {
    listing(&emitted(format, f), format)
}

/// Decode a code region into one `mnemonic args...` line per instruction.
///
/// `code` must start at a 4-byte aligned file offset.
pub fn listing(code: &[u8], format: ObjectFormat) -> String {
    let mut reader = Reader {
        code,
        pos: 0,
        compact: format.is_compact(),
    };
    let mut lines = Vec::new();

    while reader.pos < code.len() {
        let (id, len) = decode_opcode(&code[reader.pos..], format)
            .unwrap_or_else(|| panic!("truncated opcode at {}", reader.pos));
        reader.pos += len;
        let opcode = Opcode::from_id(id).unwrap_or_else(|| panic!("unknown opcode {id}"));

        let args = reader.args(opcode);
        let mut line = opcode.mnemonic().to_string();
        for arg in args {
            line.push(' ');
            line.push_str(&arg.to_string());
        }
        lines.push(line);
    }
    lines.join("\n")
}

struct Reader<'a> {
    code: &'a [u8],
    pos: usize,
    compact: bool,
}

impl Reader<'_> {
    fn args(&mut self, opcode: Opcode) -> Vec<i32> {
        let layout = opcode.arg_layout();
        match (opcode, opcode.arg_count()) {
            (Opcode::PushBytes, ArgCount::Variable) => {
                let count = self.arg(layout, 0);
                (0..count).map(|i| self.arg(layout, i as usize + 1)).collect()
            }
            (_, ArgCount::Variable) => {
                // casegotosorted: count, then value/target pairs
                let count = self.arg(layout, 0);
                let mut args = vec![count];
                for i in 0..2 * count as usize {
                    args.push(self.arg(layout, i + 1));
                }
                args
            }
            (_, ArgCount::Fixed(n)) => (0..n as usize).map(|i| self.arg(layout, i)).collect(),
        }
    }

    fn arg(&mut self, layout: ArgLayout, index: usize) -> i32 {
        let width = match layout {
            ArgLayout::SpecialCall if self.compact && index == 0 => 1,
            ArgLayout::Byte => 1,
            ArgLayout::Index if self.compact => 1,
            ArgLayout::CallFunc if self.compact && index == 0 => 1,
            ArgLayout::CallFunc if self.compact => 2,
            ArgLayout::Aligned => {
                if index == 0 {
                    self.pos += align_pad(self.pos);
                }
                4
            }
            _ => 4,
        };
        let bytes = &self.code[self.pos..self.pos + width];
        self.pos += width;
        match width {
            1 => bytes[0] as i32,
            2 => i16::from_le_bytes([bytes[0], bytes[1]]) as i32,
            _ => i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        }
    }
}
