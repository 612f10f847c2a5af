//! Smart constructors for expression nodes.
//!
//! Every operator and elementary function builds its node through one of
//! these functions. Each inspects the operand shapes at construction time and
//! returns a simplified node instead of the naive wrapper:
//!
//! | Pattern | Result |
//! |---|---|
//! | `-(-x)` | `x` |
//! | `-(c·d)` | `(-c)·d` |
//! | `(-a) + (-b)` | `-(a + b)` |
//! | `x + c` | `c + x` |
//! | `c·(c2·d)` | `(c·c2)·d` |
//! | `c·(-x)` | `(-c)·x` |
//! | `x·c` | `c·x` |
//! | `(-a)·(-b)` | `a·b` |
//! | `(1/a)·(1/b)` | `1/(a·b)` |
//! | `(c·d1)·d2` | `c·d1·d2` (ternary) |
//! | `1/(1/x)` | `x` |
//! | `a - b` | `a + (-b)` |
//! | `a / b` | `a · (1/b)` |
//!
//! Scalar-only operands fold to a scalar. The evaluation engine relies on
//! trees being in this normal form.

use num_traits::{Float as _, One};

use crate::expr::Expr;
use crate::number::Number;
use crate::opcode::{self, OpCode};

/// `-x`
pub fn negative<'a, T: Number>(x: Expr<'a, T>) -> Expr<'a, T> {
    match x {
        Expr::Scalar(c) => Expr::Scalar(-c),
        Expr::Unary {
            op: OpCode::Neg,
            arg,
        } => *arg,
        Expr::ScalarDual { factor, dual } => Expr::ScalarDual {
            factor: -factor,
            dual,
        },
        x => Expr::Unary {
            op: OpCode::Neg,
            arg: Box::new(x),
        },
    }
}

/// `1 / x`
pub fn inverse<'a, T: Number>(x: Expr<'a, T>) -> Expr<'a, T> {
    match x {
        Expr::Scalar(c) => Expr::Scalar(T::Scalar::one() / c),
        Expr::Unary {
            op: OpCode::Inv,
            arg,
        } => *arg,
        x => Expr::Unary {
            op: OpCode::Inv,
            arg: Box::new(x),
        },
    }
}

/// `l + r`
pub fn add<'a, T: Number>(l: Expr<'a, T>, r: Expr<'a, T>) -> Expr<'a, T> {
    match (l, r) {
        (Expr::Scalar(a), Expr::Scalar(b)) => Expr::Scalar(a + b),
        (
            Expr::Unary {
                op: OpCode::Neg,
                arg: a,
            },
            Expr::Unary {
                op: OpCode::Neg,
                arg: b,
            },
        ) => negative(add(*a, *b)),
        // scalars go on the left
        (l, r @ Expr::Scalar(_)) => binary(OpCode::Add, r, l),
        (l, r) => binary(OpCode::Add, l, r),
    }
}

/// `l - r`, always `l + (-r)`.
#[inline]
pub fn sub<'a, T: Number>(l: Expr<'a, T>, r: Expr<'a, T>) -> Expr<'a, T> {
    add(l, negative(r))
}

/// `l · r`
pub fn mul<'a, T: Number>(l: Expr<'a, T>, r: Expr<'a, T>) -> Expr<'a, T> {
    match (l, r) {
        (Expr::Scalar(a), Expr::Scalar(b)) => Expr::Scalar(a * b),
        (Expr::Scalar(c), x) | (x, Expr::Scalar(c)) => scalar_mul(c, x),
        (
            Expr::Unary {
                op: OpCode::Neg,
                arg: a,
            },
            Expr::Unary {
                op: OpCode::Neg,
                arg: b,
            },
        ) => mul(*a, *b),
        (
            Expr::Unary {
                op: OpCode::Inv,
                arg: a,
            },
            Expr::Unary {
                op: OpCode::Inv,
                arg: b,
            },
        ) => inverse(mul(*a, *b)),
        (Expr::ScalarDual { factor, dual: lhs }, Expr::Leaf(rhs))
        | (Expr::Leaf(lhs), Expr::ScalarDual { factor, dual: rhs }) => {
            Expr::ScalarDualDual { factor, lhs, rhs }
        }
        (l, r) => binary(OpCode::Mul, l, r),
    }
}

/// `c · x`
fn scalar_mul<'a, T: Number>(c: T::Scalar, x: Expr<'a, T>) -> Expr<'a, T> {
    match x {
        Expr::Leaf(dual) => Expr::ScalarDual { factor: c, dual },
        Expr::ScalarDual { factor, dual } => Expr::ScalarDual {
            factor: c * factor,
            dual,
        },
        Expr::ScalarDualDual { factor, lhs, rhs } => Expr::ScalarDualDual {
            factor: c * factor,
            lhs,
            rhs,
        },
        Expr::Unary {
            op: OpCode::Neg,
            arg,
        } => scalar_mul(-c, *arg),
        x => binary(OpCode::Mul, Expr::Scalar(c), x),
    }
}

/// `l / r`, always `l · (1/r)`.
#[inline]
pub fn div<'a, T: Number>(l: Expr<'a, T>, r: Expr<'a, T>) -> Expr<'a, T> {
    mul(l, inverse(r))
}

/// `l ^ r`
pub fn pow<'a, T: Number>(l: Expr<'a, T>, r: Expr<'a, T>) -> Expr<'a, T> {
    match (l, r) {
        (Expr::Scalar(a), Expr::Scalar(b)) => Expr::Scalar(a.powf(b)),
        (l, r) => binary(OpCode::Pow, l, r),
    }
}

/// `op(x)` for a unary elementary function. Negation and inversion go
/// through [`negative`] and [`inverse`].
///
/// # Panics
///
/// Panics if `op` is a binary opcode.
pub fn unary<'a, T: Number>(op: OpCode, x: Expr<'a, T>) -> Expr<'a, T> {
    assert!(op.is_unary(), "{op} is not a unary opcode");
    match (op, x) {
        (OpCode::Neg, x) => negative(x),
        (OpCode::Inv, x) => inverse(x),
        (op, Expr::Scalar(c)) => Expr::Scalar(opcode::eval_forward(op, c, c)),
        (op, x) => Expr::Unary {
            op,
            arg: Box::new(x),
        },
    }
}

#[inline]
fn binary<'a, T: Number>(op: OpCode, lhs: Expr<'a, T>, rhs: Expr<'a, T>) -> Expr<'a, T> {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}
