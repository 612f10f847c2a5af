use std::fmt::{self, Display};

use num_traits::{One, Zero};

use crate::derivative::NthDerivative;
use crate::engine;
use crate::expr::Expr;
use crate::number::Number;
use crate::opcode::OpCode;

/// Forward-mode dual number: a value paired with its derivative.
///
/// `Dual { val, grad }` represents `val + grad·ε` where `ε² = 0`. The field
/// type `T` is either a primitive float (first order) or another `Dual`
/// (higher order, see [`HigherOrderDual`](crate::HigherOrderDual)).
///
/// Arithmetic on duals does not compute anything: it builds an [`Expr`] that
/// is collapsed in one pass by [`Dual::from`], [`Dual::assign`], or
/// [`eval`](crate::eval).
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dual<T> {
    /// Primal value.
    pub val: T,
    /// Derivative with respect to the currently seeded variable(s).
    pub grad: T,
}

/// Renders only the value component.
impl<T: Display> Display for Dual<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.val, f)
    }
}

impl<T: Number> Dual<T> {
    /// Create a new dual number.
    #[inline]
    pub fn new(val: T, grad: T) -> Self {
        Dual { val, grad }
    }

    /// Create a constant (zero derivative).
    #[inline]
    pub fn constant(val: T) -> Self {
        Dual {
            val,
            grad: T::from_scalar(T::Scalar::zero()),
        }
    }

    /// Create a variable (unit derivative) for differentiation.
    #[inline]
    pub fn variable(val: T) -> Self {
        Dual {
            val,
            grad: T::from_scalar(T::Scalar::one()),
        }
    }

    /// Lift a plain float: `val = c`, every derivative slot zero.
    #[inline]
    pub fn from_scalar(c: T::Scalar) -> Self {
        Dual::constant(T::from_scalar(c))
    }

    /// Collapse `expr` into `self`, overwriting both fields.
    pub fn assign<'a>(&mut self, expr: impl Into<Expr<'a, T>>) {
        let mut tmp = Dual::default();
        engine::assign(self, expr.into(), &mut tmp);
    }

    /// Derivative of order `N` (order 0 is the value), read as the innermost
    /// scalar after peeling `N` derivative slots.
    ///
    /// Asking for more orders than the nesting depth does not compile.
    #[inline]
    pub fn derivative<const N: usize>(&self) -> <Self as Number>::Scalar
    where
        Self: NthDerivative<N>,
    {
        NthDerivative::<N>::nth_derivative(self)
    }
}

impl<'a, T: Number> From<Expr<'a, T>> for Dual<T> {
    fn from(expr: Expr<'a, T>) -> Self {
        match expr {
            Expr::Leaf(dual) => dual.into_owned(),
            expr => {
                let mut out = Dual::default();
                let mut tmp = Dual::default();
                engine::assign(&mut out, expr, &mut tmp);
                out
            }
        }
    }
}

macro_rules! impl_from_float {
    ($f:ty) => {
        impl<T: Number<Scalar = $f>> From<$f> for Dual<T> {
            #[inline]
            fn from(c: $f) -> Self {
                Dual::from_scalar(c)
            }
        }
    };
}

impl_from_float!(f32);
impl_from_float!(f64);

/// Force full collapse of an expression into a concrete [`Dual`].
///
/// A `Dual` passed by value comes back untouched.
///
/// ```
/// use lazydual::{eval, sin, Dual64};
///
/// let x = Dual64::variable(1.0);
/// let y = eval(sin(&x) * 2.0);
/// assert_eq!(y.val, 2.0 * 1.0_f64.sin());
/// assert_eq!(y.grad, 2.0 * 1.0_f64.cos());
/// ```
#[inline]
pub fn eval<'a, T: Number>(expr: impl Into<Expr<'a, T>>) -> Dual<T> {
    Dual::from(expr.into())
}

// Nesting: a Dual is itself a valid field type, with every kernel operation
// routed back through the evaluation engine one level down.
impl<T: Number> Number for Dual<T> {
    type Scalar = T::Scalar;

    #[inline]
    fn from_scalar(c: T::Scalar) -> Self {
        Dual::from_scalar(c)
    }

    #[inline]
    fn value(&self) -> T::Scalar {
        self.val.value()
    }

    #[inline]
    fn add_scalar(&mut self, c: T::Scalar) {
        self.val.add_scalar(c);
    }

    #[inline]
    fn scale(&mut self, c: T::Scalar) {
        engine::scale(self, c);
    }

    #[inline]
    fn add_num(&mut self, rhs: &Self) {
        engine::add_dual(self, rhs);
    }

    #[inline]
    fn sub_num(&mut self, rhs: &Self) {
        engine::sub_dual(self, rhs);
    }

    #[inline]
    fn mul_num(&mut self, rhs: &Self) {
        engine::mul_dual(self, rhs);
    }

    #[inline]
    fn add_scaled(&mut self, c: T::Scalar, rhs: &Self) {
        self.val.add_scaled(c, &rhs.val);
        self.grad.add_scaled(c, &rhs.grad);
    }

    #[inline]
    fn negate(&mut self) {
        engine::negate(self);
    }

    #[inline]
    fn apply(&mut self, op: OpCode) {
        engine::apply(self, op);
    }

    #[inline]
    fn rdiv_scalar(&mut self, c: T::Scalar) {
        engine::rdiv_scalar(self, c);
    }

    #[inline]
    fn powf_scalar(&mut self, c: T::Scalar) {
        engine::pow_scalar(self, c);
    }

    #[inline]
    fn powf_num(&mut self, rhs: &Self) {
        engine::pow_dual(self, rhs);
    }

    fn seed_at(&mut self, depth: usize, c: T::Scalar) {
        if depth == 0 {
            self.grad = T::from_scalar(c);
        } else {
            self.val.seed_at(depth - 1, c);
        }
    }
}
