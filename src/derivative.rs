use crate::dual::Dual;
use crate::number::Number;

/// Read the derivative of order `N` out of a (possibly nested) dual.
///
/// Order 0 is the innermost value. Order `k > 0` peels one `grad` and asks
/// the derivative slot for order `k - 1`. The trait is only implemented down
/// to the nesting depth of the type, so an order deeper than the type carries
/// is a compile error rather than a runtime failure:
///
/// ```compile_fail
/// use lazydual::{derivative, Dual64};
///
/// let x = Dual64::variable(1.0);
/// derivative::<2, _>(&x);
/// ```
pub trait NthDerivative<const N: usize>: Number {
    fn nth_derivative(&self) -> Self::Scalar;
}

macro_rules! impl_order_zero_for_float {
    ($f:ty) => {
        impl NthDerivative<0> for $f {
            #[inline]
            fn nth_derivative(&self) -> $f {
                *self
            }
        }
    };
}

impl_order_zero_for_float!(f32);
impl_order_zero_for_float!(f64);

impl<T: Number> NthDerivative<0> for Dual<T> {
    #[inline]
    fn nth_derivative(&self) -> T::Scalar {
        self.val.value()
    }
}

macro_rules! impl_order {
    ($($n:literal => $prev:literal),* $(,)?) => {
        $(
            impl<T: NthDerivative<$prev>> NthDerivative<$n> for Dual<T> {
                #[inline]
                fn nth_derivative(&self) -> T::Scalar {
                    <T as NthDerivative<$prev>>::nth_derivative(&self.grad)
                }
            }
        )*
    };
}

impl_order!(1 => 0, 2 => 1, 3 => 2, 4 => 3, 5 => 4, 6 => 5, 7 => 6, 8 => 7);

/// Derivative of order `N` of `d`; see [`NthDerivative`].
///
/// ```
/// use lazydual::{derivative, eval, higher_order_variable, pow};
///
/// let x = higher_order_variable::<2>(2.0);
/// let y = eval(pow(&x, 3.0));
/// assert_eq!(derivative::<0, _>(&y), 8.0);
/// assert_eq!(derivative::<1, _>(&y), 12.0);
/// assert_eq!(derivative::<2, _>(&y), 12.0);
/// ```
#[inline]
pub fn derivative<const N: usize, D: NthDerivative<N>>(d: &D) -> D::Scalar {
    d.nth_derivative()
}
