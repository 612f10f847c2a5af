//! Elementary functions over duals and expressions.
//!
//! Each function accepts anything convertible into an [`Expr`] (`&Dual`,
//! `Dual`, or an expression) and returns a lazy node; nothing is evaluated
//! until the result is collapsed.

use num_traits::{Pow, Zero};

use crate::expr::Expr;
use crate::number::Number;
use crate::opcode::OpCode;
use crate::rewrite;

macro_rules! elementary {
    ($($(#[$doc:meta])* $name:ident => $op:ident;)*) => {
        $(
            $(#[$doc])*
            #[inline]
            pub fn $name<'a, T: Number>(x: impl Into<Expr<'a, T>>) -> Expr<'a, T> {
                rewrite::unary(OpCode::$op, x.into())
            }
        )*
    };
}

elementary! {
    /// Sine.
    sin => Sin;
    /// Cosine.
    cos => Cos;
    /// Tangent.
    tan => Tan;
    /// Arcsine. Outside `[-1, 1]` the value and derivative are NaN.
    asin => Asin;
    /// Arccosine. Outside `[-1, 1]` the value and derivative are NaN.
    acos => Acos;
    /// Arctangent.
    atan => Atan;
    /// Natural exponential.
    exp => Exp;
    /// Natural logarithm.
    log => Log;
    /// Base-10 logarithm.
    log10 => Log10;
    /// Square root.
    sqrt => Sqrt;
    /// Absolute value; the derivative takes the sign of the operand.
    abs => Abs;
}

/// `base ^ exponent`.
///
/// Accepts any mix of scalars, duals and expressions. Two plain scalars use
/// ordinary float `powf` and build no node.
///
/// ```
/// use lazydual::{eval, pow, Dual64};
///
/// let x = Dual64::variable(2.0);
/// let y = eval(pow(&x, 3.0));
/// assert_eq!((y.val, y.grad), (8.0, 12.0));
/// assert_eq!(pow(2.0_f64, 10.0_f64), 1024.0);
/// ```
#[inline]
pub fn pow<L: Pow<R>, R>(base: L, exponent: R) -> L::Output {
    base.pow(exponent)
}

/// `x * x`
pub fn abs2<'a, T: Number>(x: impl Into<Expr<'a, T>>) -> Expr<'a, T> {
    let x = x.into();
    rewrite::mul(x.clone(), x)
}

/// Complex conjugate; the identity on real duals.
#[inline]
pub fn conj<'a, T: Number>(x: impl Into<Expr<'a, T>>) -> Expr<'a, T> {
    x.into()
}

/// Real part; the identity on real duals.
#[inline]
pub fn real<'a, T: Number>(x: impl Into<Expr<'a, T>>) -> Expr<'a, T> {
    x.into()
}

/// Imaginary part; always zero on real duals.
#[inline]
pub fn imag<'a, T: Number>(_x: impl Into<Expr<'a, T>>) -> T::Scalar {
    T::Scalar::zero()
}

/// Unary plus: returns its operand unchanged.
#[inline]
pub fn positive<'a, T: Number>(x: impl Into<Expr<'a, T>>) -> Expr<'a, T> {
    x.into()
}
