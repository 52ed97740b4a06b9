//! Compile-time evaluation of constant operands.
//!
//! Results follow the 32-bit machine: arithmetic wraps, comparisons yield
//! 0 or 1, shift counts are masked and right shifts are arithmetic.

use acsc_bytecode::Opcode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    LogicalNot,
    BitNot,
}

impl UnaryOp {
    pub fn apply(self, value: i32) -> i32 {
        match self {
            Self::Negate => value.wrapping_neg(),
            Self::LogicalNot => (value == 0) as i32,
            Self::BitNot => !value,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Shl,
    Shr,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    /// Returns `None` for a zero divisor; the machine evaluates those.
    pub fn apply(self, l: i32, r: i32) -> Option<i32> {
        let value = match self {
            Self::BitOr => l | r,
            Self::BitXor => l ^ r,
            Self::BitAnd => l & r,
            Self::Eq => (l == r) as i32,
            Self::Ne => (l != r) as i32,
            Self::Lt => (l < r) as i32,
            Self::Le => (l <= r) as i32,
            Self::Gt => (l > r) as i32,
            Self::Ge => (l >= r) as i32,
            Self::Shl => l.wrapping_shl(r as u32),
            Self::Shr => l.wrapping_shr(r as u32),
            Self::Add => l.wrapping_add(r),
            Self::Sub => l.wrapping_sub(r),
            Self::Mul => l.wrapping_mul(r),
            Self::Div | Self::Mod if r == 0 => return None,
            Self::Div => l.wrapping_div(r),
            Self::Mod => l.wrapping_rem(r),
        };
        Some(value)
    }
}

/// An opcode the peephole optimizer can evaluate ahead of time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fold {
    Unary(UnaryOp),
    Binary(BinaryOp),
}

impl Fold {
    /// Logical and/or are not folded.
    pub fn of(opcode: Opcode) -> Option<Self> {
        let fold = match opcode {
            Opcode::UnaryMinus => Self::Unary(UnaryOp::Negate),
            Opcode::NegateLogical => Self::Unary(UnaryOp::LogicalNot),
            Opcode::NegateBinary => Self::Unary(UnaryOp::BitNot),
            Opcode::OrBitwise => Self::Binary(BinaryOp::BitOr),
            Opcode::EorBitwise => Self::Binary(BinaryOp::BitXor),
            Opcode::AndBitwise => Self::Binary(BinaryOp::BitAnd),
            Opcode::Eq => Self::Binary(BinaryOp::Eq),
            Opcode::Ne => Self::Binary(BinaryOp::Ne),
            Opcode::Lt => Self::Binary(BinaryOp::Lt),
            Opcode::Le => Self::Binary(BinaryOp::Le),
            Opcode::Gt => Self::Binary(BinaryOp::Gt),
            Opcode::Ge => Self::Binary(BinaryOp::Ge),
            Opcode::Lshift => Self::Binary(BinaryOp::Shl),
            Opcode::Rshift => Self::Binary(BinaryOp::Shr),
            Opcode::Add => Self::Binary(BinaryOp::Add),
            Opcode::Subtract => Self::Binary(BinaryOp::Sub),
            Opcode::Multiply => Self::Binary(BinaryOp::Mul),
            Opcode::Divide => Self::Binary(BinaryOp::Div),
            Opcode::Modulus => Self::Binary(BinaryOp::Mod),
            _ => return None,
        };
        Some(fold)
    }

    /// Number of queued constants consumed.
    pub fn arity(self) -> usize {
        match self {
            Self::Unary(_) => 1,
            Self::Binary(_) => 2,
        }
    }

    /// Evaluate over the operands, oldest first.
    pub fn apply(self, operands: &[i32]) -> Option<i32> {
        match (self, operands) {
            (Self::Unary(op), &[value]) => Some(op.apply(value)),
            (Self::Binary(op), &[l, r]) => op.apply(l, r),
            _ => None,
        }
    }
}
