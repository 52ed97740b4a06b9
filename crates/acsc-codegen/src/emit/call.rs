//! Call instruction selection.

use acsc_bytecode::Opcode;
use acsc_core::{FuncKind, Function};

use super::{EmitError, Emitter};

const LSPEC: [Opcode; 5] = [
    Opcode::Lspec1,
    Opcode::Lspec2,
    Opcode::Lspec3,
    Opcode::Lspec4,
    Opcode::Lspec5,
];

impl Emitter {
    /// Emit the call of `function` after its `argc` arguments were pushed.
    ///
    /// `wants_result` is set when the call appears in an expression whose
    /// value is used.
    pub fn emit_call(
        &mut self,
        function: &Function,
        argc: usize,
        wants_result: bool,
    ) -> Result<(), EmitError> {
        match &function.kind {
            FuncKind::ActionSpecial { id } => self.emit_action_special(*id, argc, wants_result),
            FuncKind::Extension { id } => {
                self.emit(Opcode::CallFunc, &[argc as i32, *id]);
                Ok(())
            }
            FuncKind::Dedicated { opcode } | FuncKind::Format { opcode } => {
                let opcode = Opcode::from_id(*opcode).ok_or(EmitError::UnknownOpcode(*opcode))?;
                for _ in argc..function.max_params as usize {
                    self.push_number(0);
                }
                self.emit_opcode(opcode);
                Ok(())
            }
            FuncKind::User(user) => {
                let opcode = if wants_result && function.has_return {
                    Opcode::Call
                } else {
                    Opcode::CallDiscard
                };
                self.emit(opcode, &[user.index as i32]);
                Ok(())
            }
        }
    }

    fn emit_action_special(
        &mut self,
        id: i32,
        argc: usize,
        wants_result: bool,
    ) -> Result<(), EmitError> {
        if !(0..=255).contains(&id) {
            return Err(EmitError::ActionSpecialOutOfRange(id));
        }
        if argc > LSPEC.len() {
            return Err(EmitError::TooManySpecialArgs { id, argc });
        }

        if wants_result {
            for _ in argc..LSPEC.len() {
                self.push_number(0);
            }
            self.emit(Opcode::Lspec5Result, &[id]);
        } else if argc == 0 {
            self.push_number(0);
            self.emit(Opcode::Lspec1, &[id]);
        } else {
            let opcode = LSPEC[argc - 1];
            self.emit(opcode, &[id]);
        }
        Ok(())
    }
}
