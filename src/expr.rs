//! Lazily built expression nodes.
//!
//! An [`Expr`] is an immutable, single-use tree describing a computation over
//! scalars and [`Dual`]s. It carries no derivative data of its own; nothing is
//! computed until the tree is collapsed into a `Dual` by the evaluation engine.
//!
//! Nodes are produced by operator overloading and by the functions in
//! [`crate::functions`], always through the smart constructors in
//! [`crate::rewrite`], so every tree is already in rewritten normal form.

use std::borrow::Cow;

use crate::dual::Dual;
use crate::number::Number;
use crate::opcode::OpCode;

/// Closed set of expression node shapes.
///
/// Dual operands are held through a [`Cow`]: borrowed when the expression was
/// built from `&Dual`, owned when built from a `Dual` by value.
///
/// Two plain floats never form an expression:
///
/// ```compile_fail
/// use lazydual::Expr;
///
/// let e: Expr<'static, f64> = 2.0_f64 * 3.0_f64;
/// ```
///
/// Operator nodes can be matched on but only built through
/// [`crate::rewrite`], so their opcode always fits their arity:
///
/// ```compile_fail
/// use lazydual::{Dual64, Expr, OpCode};
///
/// let x = Dual64::variable(1.0);
/// let e: Expr<'_, f64> = Expr::Binary {
///     op: OpCode::Sin,
///     lhs: Box::new(Expr::from(&x)),
///     rhs: Box::new(Expr::from(&x)),
/// };
/// ```
#[derive(Clone, Debug)]
pub enum Expr<'a, T: Number> {
    /// Plain scalar operand.
    Scalar(T::Scalar),
    /// A concrete dual number.
    Leaf(Cow<'a, Dual<T>>),
    /// `op(arg)` for a unary opcode.
    #[non_exhaustive]
    Unary { op: OpCode, arg: Box<Expr<'a, T>> },
    /// `lhs op rhs` for `Add`, `Mul` or `Pow`.
    #[non_exhaustive]
    Binary {
        op: OpCode,
        lhs: Box<Expr<'a, T>>,
        rhs: Box<Expr<'a, T>>,
    },
    /// `factor · dual`, evaluated fused without materializing the product.
    ScalarDual {
        factor: T::Scalar,
        dual: Cow<'a, Dual<T>>,
    },
    /// `factor · lhs · rhs` over two duals; the ternary node shape.
    ScalarDualDual {
        factor: T::Scalar,
        lhs: Cow<'a, Dual<T>>,
        rhs: Cow<'a, Dual<T>>,
    },
}

impl<'a, T: Number> Expr<'a, T> {
    /// Opcode tagging this node, if it is an operator node.
    ///
    /// The fused scalar-dual shapes report [`OpCode::Mul`].
    pub fn op(&self) -> Option<OpCode> {
        match self {
            Expr::Scalar(_) | Expr::Leaf(_) => None,
            Expr::Unary { op, .. } | Expr::Binary { op, .. } => Some(*op),
            Expr::ScalarDual { .. } | Expr::ScalarDualDual { .. } => Some(OpCode::Mul),
        }
    }

    /// True for a [`Expr::Leaf`].
    #[inline]
    pub fn is_dual(&self) -> bool {
        matches!(self, Expr::Leaf(_))
    }

    /// True for a unary node tagged `op`.
    #[inline]
    pub fn is_unary(&self, op: OpCode) -> bool {
        matches!(self, Expr::Unary { op: o, .. } if *o == op)
    }

    /// Number of nodes in the tree, leaves and scalars included.
    pub fn node_count(&self) -> usize {
        match self {
            Expr::Scalar(_) | Expr::Leaf(_) => 1,
            Expr::ScalarDual { .. } => 3,
            Expr::ScalarDualDual { .. } => 4,
            Expr::Unary { arg, .. } => 1 + arg.node_count(),
            Expr::Binary { lhs, rhs, .. } => 1 + lhs.node_count() + rhs.node_count(),
        }
    }
}

impl<'a, T: Number> From<&'a Dual<T>> for Expr<'a, T> {
    #[inline]
    fn from(dual: &'a Dual<T>) -> Self {
        Expr::Leaf(Cow::Borrowed(dual))
    }
}

impl<'a, T: Number> From<Dual<T>> for Expr<'a, T> {
    #[inline]
    fn from(dual: Dual<T>) -> Self {
        Expr::Leaf(Cow::Owned(dual))
    }
}
