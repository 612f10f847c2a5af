//! Comparisons read only the innermost value; derivative slots never take
//! part. Expressions are collapsed before comparing.

use std::cmp::Ordering;

use crate::dual::Dual;
use crate::expr::Expr;
use crate::number::{Number, Val};

macro_rules! impl_value_cmp {
    ($([$($gen:tt)*] $Lhs:ty, $Rhs:ty;)*) => {
        $(
            impl<$($gen)*> PartialEq<$Rhs> for $Lhs {
                #[inline]
                fn eq(&self, other: &$Rhs) -> bool {
                    Val::val(self) == Val::val(other)
                }
            }

            impl<$($gen)*> PartialOrd<$Rhs> for $Lhs {
                #[inline]
                fn partial_cmp(&self, other: &$Rhs) -> Option<Ordering> {
                    Val::val(self).partial_cmp(&Val::val(other))
                }
            }
        )*
    };
}

impl_value_cmp! {
    [T: Number] Dual<T>, Dual<T>;
    ['a, T: Number] Dual<T>, Expr<'a, T>;
    ['a, T: Number] Expr<'a, T>, Dual<T>;
    ['a, 'b, T: Number] Expr<'a, T>, Expr<'b, T>;
    [T: Number<Scalar = f32>] Dual<T>, f32;
    [T: Number<Scalar = f32>] f32, Dual<T>;
    ['a, T: Number<Scalar = f32>] Expr<'a, T>, f32;
    ['a, T: Number<Scalar = f32>] f32, Expr<'a, T>;
    [T: Number<Scalar = f64>] Dual<T>, f64;
    [T: Number<Scalar = f64>] f64, Dual<T>;
    ['a, T: Number<Scalar = f64>] Expr<'a, T>, f64;
    ['a, T: Number<Scalar = f64>] f64, Expr<'a, T>;
}
