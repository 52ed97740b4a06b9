//! Immediate queue and peephole optimizer.
//!
//! Constant pushes are not written right away. Their values wait in a queue
//! so that the next opcode can either fold them into a single constant or
//! consume them as inline operands of a direct instruction. Anything else
//! flushes the queue as ordinary pushes.

use std::collections::VecDeque;

use acsc_bytecode::{ObjectFormat, Opcode};
use tracing::trace;

use super::fold::Fold;
use super::{CodeBuffer, Encoder};

/// Longest run a single `pushbytes` can carry.
const MAX_PUSHBYTES: usize = u8::MAX as usize;

#[inline]
fn is_byte_value(value: i32) -> bool {
    (0..=255).contains(&value)
}

/// What to do with an opcode, chosen in priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Decision {
    /// A constant push; its argument joins the queue.
    Capture,
    /// Replace the last `consumed` constants with `value`.
    Fold { consumed: usize, value: i32 },
    /// Flush `excess` constants, then emit `opcode` carrying the rest.
    Direct { opcode: Opcode, excess: usize },
    /// Flush everything and emit the opcode as is.
    Emit,
}

/// Instruction sink used by code generation.
///
/// `emit_opcode` and `emit_arg` mirror the instruction stream; `tell` and
/// `seek` support backpatching jump targets.
#[derive(Debug)]
pub struct Emitter {
    encoder: Encoder,
    queue: VecDeque<i32>,
    /// The last opcode was a constant push.
    capture: bool,
}

impl Emitter {
    pub fn new(format: ObjectFormat) -> Self {
        Self::from_encoder(Encoder::new(format))
    }

    pub fn from_encoder(encoder: Encoder) -> Self {
        Self {
            encoder,
            queue: VecDeque::new(),
            capture: false,
        }
    }

    pub fn format(&self) -> ObjectFormat {
        self.encoder.format()
    }

    /// Constants waiting in the queue, oldest first.
    pub fn pending(&self) -> impl Iterator<Item = i32> + '_ {
        self.queue.iter().copied()
    }

    pub fn emit_opcode(&mut self, opcode: Opcode) {
        let decision = self.decide(opcode);
        self.capture = decision == Decision::Capture;

        match decision {
            Decision::Capture => {}
            Decision::Fold { consumed, value } => {
                trace!(%opcode, value, "folded constants");
                self.queue.truncate(self.queue.len() - consumed);
                self.queue.push_back(value);
            }
            Decision::Direct {
                opcode: direct,
                excess,
            } => {
                trace!(%opcode, %direct, excess, "selected direct form");
                self.push_immediates(excess);
                self.encoder.write_opcode(direct);
                if !direct.defers_immediates() {
                    self.write_immediates();
                }
            }
            Decision::Emit => {
                self.flush();
                self.encoder.write_opcode(opcode);
            }
        }
    }

    pub fn emit_arg(&mut self, value: i32) {
        if self.capture {
            self.queue.push_back(value);
            return;
        }
        self.encoder.write_arg(value);
        // lspec direct forms take the special id before the queued values.
        if self.encoder.opcode().defers_immediates() && self.encoder.args_written() == 1 {
            self.write_immediates();
        }
    }

    /// Emit an opcode followed by its arguments.
    pub fn emit(&mut self, opcode: Opcode, args: &[i32]) {
        self.emit_opcode(opcode);
        for &arg in args {
            self.emit_arg(arg);
        }
    }

    pub fn push_number(&mut self, value: i32) {
        self.emit(Opcode::PushNumber, &[value]);
    }

    /// Write every queued constant as ordinary pushes.
    pub fn flush(&mut self) {
        self.capture = false;
        self.push_immediates(self.queue.len());
    }

    /// Position of the next instruction. Flushes the queue first.
    pub fn tell(&mut self) -> usize {
        self.flush();
        self.encoder.buffer().tell()
    }

    /// Reposition for a backpatch. Pending constants are committed first so
    /// they stay at the end of the stream.
    pub fn seek(&mut self, pos: usize) {
        self.flush();
        self.encoder.buffer_mut().seek(pos);
    }

    pub fn seek_end(&mut self) {
        self.flush();
        self.encoder.buffer_mut().seek_end();
    }

    /// Committed bytes. Queued constants are not part of them yet.
    pub fn buffer(&self) -> &CodeBuffer {
        self.encoder.buffer()
    }

    pub fn into_buffer(mut self) -> CodeBuffer {
        self.flush();
        self.encoder.into_buffer()
    }

    fn decide(&self, opcode: Opcode) -> Decision {
        if opcode.is_number_push() {
            return Decision::Capture;
        }

        let queued = self.queue.len();

        if let Some(fold) = Fold::of(opcode)
            && queued >= fold.arity()
        {
            let consumed = fold.arity();
            let operands: Vec<i32> = self.queue.range(queued - consumed..).copied().collect();
            if let Some(value) = fold.apply(&operands) {
                return Decision::Fold { consumed, value };
            }
        }

        if let Some(form) = opcode.direct_form()
            && queued > 0
            && queued >= form.arity
        {
            let excess = queued - form.arity;
            let bytes = self.queue.range(excess..).all(|&v| is_byte_value(v));
            let direct = match form.direct_byte {
                Some(direct_byte) if bytes && self.format().is_compact() => direct_byte,
                _ => form.direct,
            };
            return Decision::Direct {
                opcode: direct,
                excess,
            };
        }

        Decision::Emit
    }

    /// Write the remaining queue as arguments of the current opcode.
    fn write_immediates(&mut self) {
        while let Some(value) = self.queue.pop_front() {
            self.encoder.write_arg(value);
        }
    }

    /// Write the oldest `count` constants as push instructions.
    fn push_immediates(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        let values: Vec<i32> = self.queue.drain(..count).collect();
        trace!(count, "flushing constants");

        let mut rest = values.as_slice();
        while let Some(&first) = rest.first() {
            let run = rest.iter().take_while(|&&v| is_byte_value(v)).count();
            if run == 0 {
                self.write_push_number(first);
                rest = &rest[1..];
                continue;
            }

            let (bytes, tail) = rest.split_at(run);
            if self.format().is_compact() {
                for group in bytes.chunks(MAX_PUSHBYTES) {
                    self.write_byte_push(group);
                }
            } else {
                // Four bytes keep the following words aligned.
                let mut groups = bytes.chunks_exact(4);
                for group in &mut groups {
                    self.encoder.write_opcode(Opcode::Push4Bytes);
                    for &value in group {
                        self.encoder.write_arg(value);
                    }
                }
                for &value in groups.remainder() {
                    self.write_push_number(value);
                }
            }
            rest = tail;
        }
    }

    fn write_byte_push(&mut self, group: &[i32]) {
        let opcode = match group.len() {
            1 => Opcode::PushByte,
            2 => Opcode::Push2Bytes,
            3 => Opcode::Push3Bytes,
            4 => Opcode::Push4Bytes,
            5 => Opcode::Push5Bytes,
            _ => Opcode::PushBytes,
        };
        self.encoder.write_opcode(opcode);
        if opcode == Opcode::PushBytes {
            self.encoder.write_arg(group.len() as i32);
        }
        for &value in group {
            self.encoder.write_arg(value);
        }
    }

    fn write_push_number(&mut self, value: i32) {
        self.encoder.write_opcode(Opcode::PushNumber);
        self.encoder.write_arg(value);
    }
}
