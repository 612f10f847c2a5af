//! The [`Number`] trait: the field type of a [`Dual`].
//!
//! A first-order `Dual<f64>` stores two `f64` fields; a second-order
//! `Dual<Dual<f64>>` stores two `Dual<f64>` fields, and so on. The evaluation
//! engine only ever touches fields through the in-place kernel operations
//! declared here, so the same chain-rule code runs at every nesting depth.

use std::fmt::{Debug, Display};

use crate::dual::Dual;
use crate::expr::Expr;
use crate::float::Float;
use crate::opcode::{self, OpCode};

/// A value that can sit in the `val` and `grad` slots of a [`Dual`].
///
/// Implemented for `f32`, `f64`, and `Dual<T>` for any `T: Number`. All
/// mutating methods update `self` in place.
pub trait Number: Clone + Default + Debug + Display + 'static {
    /// The innermost primitive float.
    type Scalar: Float;

    /// Lift a plain float (constant, every derivative slot zero).
    fn from_scalar(c: Self::Scalar) -> Self;

    /// The innermost primal value.
    fn value(&self) -> Self::Scalar;

    /// `self += c`
    fn add_scalar(&mut self, c: Self::Scalar);

    /// `self *= c`
    fn scale(&mut self, c: Self::Scalar);

    /// `self += rhs`
    fn add_num(&mut self, rhs: &Self);

    /// `self -= rhs`
    fn sub_num(&mut self, rhs: &Self);

    /// `self *= rhs`
    fn mul_num(&mut self, rhs: &Self);

    /// `self += c * rhs`, without materializing `c * rhs`.
    fn add_scaled(&mut self, c: Self::Scalar, rhs: &Self);

    /// `self = -self`
    fn negate(&mut self);

    /// `self = op(self)` for a unary opcode.
    fn apply(&mut self, op: OpCode);

    /// `self = c / self`
    fn rdiv_scalar(&mut self, c: Self::Scalar);

    /// `self = self^c`
    fn powf_scalar(&mut self, c: Self::Scalar);

    /// `self = self^rhs`
    fn powf_num(&mut self, rhs: &Self);

    /// Write `c` into the derivative slot `depth` levels below the outermost.
    ///
    /// Depth 0 is the outermost `grad`; depth `k` is `val^k.grad`. Callers
    /// guarantee `depth` is within the nesting depth of `Self`.
    #[doc(hidden)]
    fn seed_at(&mut self, depth: usize, c: Self::Scalar);
}

macro_rules! impl_number_for_float {
    ($f:ty) => {
        impl Number for $f {
            type Scalar = $f;

            #[inline]
            fn from_scalar(c: $f) -> Self {
                c
            }

            #[inline]
            fn value(&self) -> $f {
                *self
            }

            #[inline]
            fn add_scalar(&mut self, c: $f) {
                *self += c;
            }

            #[inline]
            fn scale(&mut self, c: $f) {
                *self *= c;
            }

            #[inline]
            fn add_num(&mut self, rhs: &Self) {
                *self += *rhs;
            }

            #[inline]
            fn sub_num(&mut self, rhs: &Self) {
                *self -= *rhs;
            }

            #[inline]
            fn mul_num(&mut self, rhs: &Self) {
                *self *= *rhs;
            }

            #[inline]
            fn add_scaled(&mut self, c: $f, rhs: &Self) {
                *self += c * *rhs;
            }

            #[inline]
            fn negate(&mut self) {
                *self = -*self;
            }

            #[inline]
            fn apply(&mut self, op: OpCode) {
                debug_assert!(op.is_unary(), "{op} is not a unary opcode");
                *self = opcode::eval_forward(op, *self, 0.0);
            }

            #[inline]
            fn rdiv_scalar(&mut self, c: $f) {
                *self = c / *self;
            }

            #[inline]
            fn powf_scalar(&mut self, c: $f) {
                *self = self.powf(c);
            }

            #[inline]
            fn powf_num(&mut self, rhs: &Self) {
                *self = self.powf(*rhs);
            }

            fn seed_at(&mut self, depth: usize, _c: $f) {
                unreachable!("seed depth {depth} exceeds the nesting depth of a plain float")
            }
        }
    };
}

impl_number_for_float!(f32);
impl_number_for_float!(f64);

/// Recursive extraction of the innermost primal value.
///
/// Numbers return themselves, duals return the innermost `val`, and
/// expressions are collapsed first.
pub trait Val {
    type Output;

    fn val(&self) -> Self::Output;
}

macro_rules! impl_val_for_float {
    ($f:ty) => {
        impl Val for $f {
            type Output = $f;

            #[inline]
            fn val(&self) -> $f {
                *self
            }
        }
    };
}

impl_val_for_float!(f32);
impl_val_for_float!(f64);

impl<T: Number> Val for Dual<T> {
    type Output = T::Scalar;

    #[inline]
    fn val(&self) -> T::Scalar {
        self.val.value()
    }
}

impl<'a, T: Number> Val for Expr<'a, T> {
    type Output = T::Scalar;

    fn val(&self) -> T::Scalar {
        Dual::from(self.clone()).val.value()
    }
}

/// Innermost primal value of a number, dual, or expression.
///
/// ```
/// use lazydual::{val, Dual64};
///
/// let x = Dual64::variable(3.0);
/// assert_eq!(val(&x), 3.0);
/// assert_eq!(val(&(&x * &x)), 9.0);
/// ```
#[inline]
pub fn val<V: Val + ?Sized>(x: &V) -> V::Output {
    x.val()
}
