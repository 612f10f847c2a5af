use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::dual::Dual;
use crate::engine;
use crate::expr::Expr;
use crate::number::Number;
use crate::rewrite;

// ──────────────────────────────────────────────
//  Binary operators: build expression nodes
// ──────────────────────────────────────────────

impl_expr_binary!(Add, add, rewrite::add);
impl_expr_binary!(Sub, sub, rewrite::sub);
impl_expr_binary!(Mul, mul, rewrite::mul);
impl_expr_binary!(Div, div, rewrite::div);

impl_scalar_binary!(f32; Add, add, rewrite::add);
impl_scalar_binary!(f32; Sub, sub, rewrite::sub);
impl_scalar_binary!(f32; Mul, mul, rewrite::mul);
impl_scalar_binary!(f32; Div, div, rewrite::div);
impl_scalar_binary!(f64; Add, add, rewrite::add);
impl_scalar_binary!(f64; Sub, sub, rewrite::sub);
impl_scalar_binary!(f64; Mul, mul, rewrite::mul);
impl_scalar_binary!(f64; Div, div, rewrite::div);

// ──────────────────────────────────────────────
//  Negation
// ──────────────────────────────────────────────

impl<'a, T: Number> Neg for &'a Dual<T> {
    type Output = Expr<'a, T>;
    #[inline]
    fn neg(self) -> Expr<'a, T> {
        rewrite::negative(Expr::from(self))
    }
}

impl<T: Number> Neg for Dual<T> {
    type Output = Expr<'static, T>;
    #[inline]
    fn neg(self) -> Expr<'static, T> {
        rewrite::negative(Expr::from(self))
    }
}

impl<'a, T: Number> Neg for Expr<'a, T> {
    type Output = Expr<'a, T>;
    #[inline]
    fn neg(self) -> Expr<'a, T> {
        rewrite::negative(self)
    }
}

// ──────────────────────────────────────────────
//  Compound assignment: collapse into the target
// ──────────────────────────────────────────────

macro_rules! impl_dual_assign {
    ($Trait:ident, $method:ident, $accumulate:path) => {
        impl<'a, T: Number> $Trait<&'a Dual<T>> for Dual<T> {
            #[inline]
            fn $method(&mut self, rhs: &'a Dual<T>) {
                $accumulate(self, Expr::from(rhs), &mut Dual::default());
            }
        }

        impl<T: Number> $Trait<Dual<T>> for Dual<T> {
            #[inline]
            fn $method(&mut self, rhs: Dual<T>) {
                $accumulate(self, Expr::from(rhs), &mut Dual::default());
            }
        }

        impl<'a, T: Number> $Trait<Expr<'a, T>> for Dual<T> {
            #[inline]
            fn $method(&mut self, rhs: Expr<'a, T>) {
                $accumulate(self, rhs, &mut Dual::default());
            }
        }

        impl<T: Number<Scalar = f32>> $Trait<f32> for Dual<T> {
            #[inline]
            fn $method(&mut self, rhs: f32) {
                $accumulate(self, Expr::Scalar(rhs), &mut Dual::default());
            }
        }

        impl<T: Number<Scalar = f64>> $Trait<f64> for Dual<T> {
            #[inline]
            fn $method(&mut self, rhs: f64) {
                $accumulate(self, Expr::Scalar(rhs), &mut Dual::default());
            }
        }
    };
}

impl_dual_assign!(AddAssign, add_assign, engine::accumulate_add);
impl_dual_assign!(SubAssign, sub_assign, engine::accumulate_sub);
impl_dual_assign!(MulAssign, mul_assign, engine::accumulate_mul);
impl_dual_assign!(DivAssign, div_assign, engine::accumulate_div);
