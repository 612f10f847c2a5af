//! Operator catalogue.
//!
//! Each opcode tags one elementary operation. Opcodes carry no state; they are
//! dispatch discriminants for expression nodes and for the in-place update
//! rules in [`crate::engine`]. [`eval_forward`] evaluates a single opcode on
//! plain floats.

use std::fmt;

use crate::float::Float;

/// Elementary operation codes.
///
/// `Sub` and `Div` are part of the catalogue but never tag a node: the rewrite
/// layer turns `a - b` into `a + (-b)` and `a / b` into `a * inverse(b)`.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OpCode {
    // ── Arithmetic ──
    Add,
    Sub,
    Mul,
    Div,

    // ── Unary ──
    Neg,
    /// Reciprocal, `1 / x`.
    Inv,

    // ── Trig ──
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,

    // ── Exp / Log ──
    Exp,
    /// Natural logarithm.
    Log,
    Log10,

    // ── Powers ──
    Sqrt,
    Pow,

    // ── Misc ──
    Abs,
}

impl OpCode {
    /// Every opcode, in declaration order.
    pub const ALL: [OpCode; 18] = [
        OpCode::Add,
        OpCode::Sub,
        OpCode::Mul,
        OpCode::Div,
        OpCode::Neg,
        OpCode::Inv,
        OpCode::Sin,
        OpCode::Cos,
        OpCode::Tan,
        OpCode::Asin,
        OpCode::Acos,
        OpCode::Atan,
        OpCode::Exp,
        OpCode::Log,
        OpCode::Log10,
        OpCode::Sqrt,
        OpCode::Pow,
        OpCode::Abs,
    ];

    /// Number of operands the operation takes.
    #[inline]
    pub fn arity(self) -> usize {
        match self {
            OpCode::Add | OpCode::Sub | OpCode::Mul | OpCode::Div | OpCode::Pow => 2,
            _ => 1,
        }
    }

    #[inline]
    pub fn is_unary(self) -> bool {
        self.arity() == 1
    }

    /// Lower-case function name, as used in [`crate::functions`].
    pub fn name(self) -> &'static str {
        match self {
            OpCode::Add => "add",
            OpCode::Sub => "sub",
            OpCode::Mul => "mul",
            OpCode::Div => "div",
            OpCode::Neg => "neg",
            OpCode::Inv => "inv",
            OpCode::Sin => "sin",
            OpCode::Cos => "cos",
            OpCode::Tan => "tan",
            OpCode::Asin => "asin",
            OpCode::Acos => "acos",
            OpCode::Atan => "atan",
            OpCode::Exp => "exp",
            OpCode::Log => "log",
            OpCode::Log10 => "log10",
            OpCode::Sqrt => "sqrt",
            OpCode::Pow => "pow",
            OpCode::Abs => "abs",
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Evaluate a single opcode on plain floats.
///
/// For binary ops, `a` and `b` are the two operand values. For unary ops,
/// `a` is the operand value and `b` is ignored.
#[inline]
pub fn eval_forward<F: Float>(op: OpCode, a: F, b: F) -> F {
    match op {
        OpCode::Add => a + b,
        OpCode::Sub => a - b,
        OpCode::Mul => a * b,
        OpCode::Div => a / b,
        OpCode::Pow => a.powf(b),

        OpCode::Neg => -a,
        OpCode::Inv => F::one() / a,

        OpCode::Sin => a.sin(),
        OpCode::Cos => a.cos(),
        OpCode::Tan => a.tan(),
        OpCode::Asin => a.asin(),
        OpCode::Acos => a.acos(),
        OpCode::Atan => a.atan(),

        OpCode::Exp => a.exp(),
        OpCode::Log => a.ln(),
        OpCode::Log10 => a.log10(),

        OpCode::Sqrt => a.sqrt(),
        OpCode::Abs => a.abs(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_splits_catalogue() {
        let binary: Vec<_> = OpCode::ALL.iter().filter(|op| op.arity() == 2).collect();
        assert_eq!(
            binary,
            [&OpCode::Add, &OpCode::Sub, &OpCode::Mul, &OpCode::Div, &OpCode::Pow]
        );
        assert_eq!(OpCode::ALL.iter().filter(|op| op.is_unary()).count(), 13);
    }

    #[test]
    fn display_uses_function_name() {
        assert_eq!(OpCode::Log10.to_string(), "log10");
        assert_eq!(OpCode::Inv.to_string(), "inv");
    }

    #[test]
    fn eval_forward_matches_std() {
        assert_eq!(eval_forward(OpCode::Log, 2.0_f64, 0.0), 2.0_f64.ln());
        assert_eq!(eval_forward(OpCode::Pow, 2.0_f64, 3.0), 8.0);
        assert_eq!(eval_forward(OpCode::Inv, 4.0_f32, 0.0), 0.25);
    }
}
