//! Evaluation engine: collapses an [`Expr`] tree into a [`Dual`].
//!
//! Two families of mutually recursive operations walk the tree:
//!
//! - [`assign`] overwrites the target with the expression's value and
//!   derivative;
//! - [`accumulate_add`], [`accumulate_sub`], [`accumulate_mul`],
//!   [`accumulate_div`] and [`accumulate_pow`] fold the expression's
//!   contribution into the target's current contents.
//!
//! Each node shape applies exactly one chain-rule update. Operands that must
//! be materialized before they can be folded in are written into the scratch
//! dual `tmp`, which is threaded through the recursion by exclusive reference.
//! `tmp` holds no live state between calls; whenever it becomes the target of
//! an inner collapse, that collapse gets a fresh scratch of its own.
//!
//! Field updates go through the [`Number`] kernel, so for nested duals every
//! field operation re-enters this module one level down.

use num_traits::{FloatConst, One};

use crate::dual::Dual;
use crate::expr::Expr;
use crate::number::Number;
use crate::opcode::OpCode;
use crate::rewrite;

// ── Assignment ──

/// `this = expr`
pub(crate) fn assign<T: Number>(this: &mut Dual<T>, expr: Expr<'_, T>, tmp: &mut Dual<T>) {
    match expr {
        Expr::Scalar(c) => {
            this.val = T::from_scalar(c);
            this.grad = zero();
        }
        Expr::Leaf(dual) => this.clone_from(&dual),
        Expr::ScalarDual { factor, dual } => {
            this.clone_from(&dual);
            scale(this, factor);
        }
        Expr::ScalarDualDual { factor, lhs, rhs } => {
            this.clone_from(&lhs);
            mul_dual(this, &rhs);
            scale(this, factor);
        }
        Expr::Unary { op, arg } => {
            assign(this, *arg, tmp);
            apply(this, op);
        }
        Expr::Binary { op, lhs, rhs } => match op {
            // addition and multiplication commute; the right operand seeds
            // the target so a left-hand scalar folds in without a temporary
            OpCode::Add => {
                assign(this, *rhs, tmp);
                accumulate_add(this, *lhs, tmp);
            }
            OpCode::Mul => {
                assign(this, *rhs, tmp);
                accumulate_mul(this, *lhs, tmp);
            }
            OpCode::Pow => {
                assign(this, *lhs, tmp);
                accumulate_pow(this, *rhs, tmp);
            }
            op => unreachable!("{op} never tags a binary node"),
        },
    }
}

/// Collapse `expr` into the scratch dual.
///
/// `tmp` is the target of this collapse, so the collapse cannot also use it
/// as scratch. Each level of materialization therefore owns one stack-held
/// `Dual`. The chain is as deep as the tree's fallback nesting, and no
/// scratch allocates on the heap for any field type.
#[inline]
fn materialize<T: Number>(tmp: &mut Dual<T>, expr: Expr<'_, T>) {
    let mut inner = Dual::default();
    assign(tmp, expr, &mut inner);
}

// ── Accumulation ──

/// `this += expr`
pub(crate) fn accumulate_add<T: Number>(this: &mut Dual<T>, expr: Expr<'_, T>, tmp: &mut Dual<T>) {
    match expr {
        Expr::Scalar(c) => this.val.add_scalar(c),
        Expr::Leaf(dual) => add_dual(this, &dual),
        Expr::ScalarDual { factor, dual } => {
            this.val.add_scaled(factor, &dual.val);
            this.grad.add_scaled(factor, &dual.grad);
        }
        Expr::Unary {
            op: OpCode::Neg,
            arg,
        } => {
            materialize(tmp, *arg);
            sub_dual(this, tmp);
        }
        Expr::Unary {
            op: OpCode::Inv,
            arg,
        } => {
            materialize(tmp, *arg);
            // d(1/u) = -du / u²
            let mut aux = tmp.val.clone();
            aux.apply(OpCode::Inv);
            this.val.add_num(&aux);
            let mut dg = aux.clone();
            dg.mul_num(&aux);
            dg.mul_num(&tmp.grad);
            this.grad.sub_num(&dg);
        }
        Expr::Binary {
            op: OpCode::Add,
            lhs,
            rhs,
        } => {
            accumulate_add(this, *lhs, tmp);
            accumulate_add(this, *rhs, tmp);
        }
        expr => {
            materialize(tmp, expr);
            add_dual(this, tmp);
        }
    }
}

/// `this -= expr`
pub(crate) fn accumulate_sub<T: Number>(this: &mut Dual<T>, expr: Expr<'_, T>, tmp: &mut Dual<T>) {
    match expr {
        Expr::Scalar(c) => this.val.add_scalar(-c),
        Expr::Leaf(dual) => sub_dual(this, &dual),
        expr => accumulate_add(this, rewrite::negative(expr), tmp),
    }
}

/// `this *= expr`
pub(crate) fn accumulate_mul<T: Number>(this: &mut Dual<T>, expr: Expr<'_, T>, tmp: &mut Dual<T>) {
    match expr {
        Expr::Scalar(c) => scale(this, c),
        Expr::Leaf(dual) => mul_dual(this, &dual),
        Expr::ScalarDual { factor, dual } => {
            scale(this, factor);
            mul_dual(this, &dual);
        }
        Expr::ScalarDualDual { factor, lhs, rhs } => {
            scale(this, factor);
            mul_dual(this, &lhs);
            mul_dual(this, &rhs);
        }
        Expr::Unary {
            op: OpCode::Neg,
            arg,
        } => {
            accumulate_mul(this, *arg, tmp);
            negate(this);
        }
        Expr::Binary {
            op: OpCode::Mul,
            lhs,
            rhs,
        } => {
            accumulate_mul(this, *lhs, tmp);
            accumulate_mul(this, *rhs, tmp);
        }
        expr => {
            materialize(tmp, expr);
            mul_dual(this, tmp);
        }
    }
}

/// `this /= expr`
pub(crate) fn accumulate_div<T: Number>(this: &mut Dual<T>, expr: Expr<'_, T>, tmp: &mut Dual<T>) {
    match expr {
        Expr::Scalar(c) => scale(this, T::Scalar::one() / c),
        Expr::Leaf(dual) => div_dual(this, &dual),
        expr => accumulate_mul(this, rewrite::inverse(expr), tmp),
    }
}

/// `this = this ^ expr`
pub(crate) fn accumulate_pow<T: Number>(this: &mut Dual<T>, expr: Expr<'_, T>, tmp: &mut Dual<T>) {
    match expr {
        Expr::Scalar(c) => pow_scalar(this, c),
        Expr::Leaf(dual) => pow_dual(this, &dual),
        expr => {
            materialize(tmp, expr);
            pow_dual(this, tmp);
        }
    }
}

// ── Dual-operand kernels ──

#[inline]
fn zero<T: Number>() -> T {
    T::from_scalar(num_traits::Zero::zero())
}

#[inline]
pub(crate) fn scale<T: Number>(this: &mut Dual<T>, c: T::Scalar) {
    this.val.scale(c);
    this.grad.scale(c);
}

#[inline]
pub(crate) fn negate<T: Number>(this: &mut Dual<T>) {
    this.val.negate();
    this.grad.negate();
}

#[inline]
pub(crate) fn add_dual<T: Number>(this: &mut Dual<T>, other: &Dual<T>) {
    this.val.add_num(&other.val);
    this.grad.add_num(&other.grad);
}

#[inline]
pub(crate) fn sub_dual<T: Number>(this: &mut Dual<T>, other: &Dual<T>) {
    this.val.sub_num(&other.val);
    this.grad.sub_num(&other.grad);
}

/// Product rule; `grad` is updated before `val` is overwritten.
pub(crate) fn mul_dual<T: Number>(this: &mut Dual<T>, other: &Dual<T>) {
    let Dual { val, grad } = this;
    grad.mul_num(&other.val);
    let mut cross = val.clone();
    cross.mul_num(&other.grad);
    grad.add_num(&cross);
    val.mul_num(&other.val);
}

/// Quotient rule; the grad term uses the already rescaled `val`.
pub(crate) fn div_dual<T: Number>(this: &mut Dual<T>, other: &Dual<T>) {
    let Dual { val, grad } = this;
    let mut aux = other.val.clone();
    aux.apply(OpCode::Inv);
    val.mul_num(&aux);
    let mut cross = val.clone();
    cross.mul_num(&other.grad);
    grad.sub_num(&cross);
    grad.mul_num(&aux);
}

/// `p = u^c`, `du *= (c/u)·p`. A zero base gives a NaN derivative.
pub(crate) fn pow_scalar<T: Number>(this: &mut Dual<T>, c: T::Scalar) {
    let Dual { val, grad } = this;
    let mut p = val.clone();
    p.powf_scalar(c);
    let mut factor = val.clone();
    factor.rdiv_scalar(c);
    factor.mul_num(&p);
    grad.mul_num(&factor);
    *val = p;
}

/// `c / u`, with derivative `-(c/u)·du/u`
pub(crate) fn rdiv_scalar<T: Number>(this: &mut Dual<T>, c: T::Scalar) {
    let Dual { val, grad } = this;
    let mut m = val.clone();
    m.apply(OpCode::Inv);
    val.rdiv_scalar(c);
    m.mul_num(val);
    m.negate();
    grad.mul_num(&m);
}

/// `d(u^w) = u^w · (w·du/u + ln(u)·dw)`
pub(crate) fn pow_dual<T: Number>(this: &mut Dual<T>, other: &Dual<T>) {
    let Dual { val, grad } = this;
    let mut p = val.clone();
    p.powf_num(&other.val);
    let mut lg = val.clone();
    lg.apply(OpCode::Log);
    let mut ratio = val.clone();
    ratio.apply(OpCode::Inv);
    ratio.mul_num(&other.val);
    grad.mul_num(&ratio);
    lg.mul_num(&other.grad);
    grad.add_num(&lg);
    grad.mul_num(&p);
    *val = p;
}

// ── Elementary functions ──

/// `this = op(this)`, applying `op`'s chain-rule update in place.
///
/// Rules needing the pre-update value compute their multiplier first; `inv`,
/// `exp` and `sqrt` read the post-update value.
pub(crate) fn apply<T: Number>(this: &mut Dual<T>, op: OpCode) {
    let one = T::Scalar::one();
    let Dual { val, grad } = this;
    match op {
        OpCode::Neg => {
            val.negate();
            grad.negate();
        }
        OpCode::Inv => {
            val.apply(OpCode::Inv);
            let mut m = val.clone();
            m.mul_num(val);
            m.negate();
            grad.mul_num(&m);
        }
        OpCode::Sin => {
            let mut m = val.clone();
            m.apply(OpCode::Cos);
            grad.mul_num(&m);
            val.apply(OpCode::Sin);
        }
        OpCode::Cos => {
            let mut m = val.clone();
            m.apply(OpCode::Sin);
            m.negate();
            grad.mul_num(&m);
            val.apply(OpCode::Cos);
        }
        OpCode::Tan => {
            let mut m = val.clone();
            m.apply(OpCode::Cos);
            m.apply(OpCode::Inv);
            val.apply(OpCode::Tan);
            grad.mul_num(&m);
            grad.mul_num(&m);
        }
        OpCode::Asin | OpCode::Acos => {
            // ±1 / sqrt(1 - u²)
            let mut m = val.clone();
            m.mul_num(val);
            m.negate();
            m.add_scalar(one);
            m.apply(OpCode::Sqrt);
            m.apply(OpCode::Inv);
            if op == OpCode::Acos {
                m.negate();
            }
            val.apply(op);
            grad.mul_num(&m);
        }
        OpCode::Atan => {
            let mut m = val.clone();
            m.mul_num(val);
            m.add_scalar(one);
            m.apply(OpCode::Inv);
            val.apply(OpCode::Atan);
            grad.mul_num(&m);
        }
        OpCode::Exp => {
            val.apply(OpCode::Exp);
            grad.mul_num(val);
        }
        OpCode::Log => {
            let mut m = val.clone();
            m.apply(OpCode::Inv);
            val.apply(OpCode::Log);
            grad.mul_num(&m);
        }
        OpCode::Log10 => {
            let mut m = val.clone();
            m.scale(T::Scalar::LN_10());
            m.apply(OpCode::Inv);
            val.apply(OpCode::Log10);
            grad.mul_num(&m);
        }
        OpCode::Sqrt => {
            val.apply(OpCode::Sqrt);
            let mut m = val.clone();
            m.apply(OpCode::Inv);
            m.scale(one / (one + one));
            grad.mul_num(&m);
        }
        OpCode::Abs => {
            let old = val.clone();
            val.apply(OpCode::Abs);
            let mut m = val.clone();
            m.apply(OpCode::Inv);
            m.mul_num(&old);
            grad.mul_num(&m);
        }
        OpCode::Add | OpCode::Sub | OpCode::Mul | OpCode::Div | OpCode::Pow => {
            unreachable!("{op} is not a unary opcode")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dual64;

    fn collapse(expr: Expr<'_, f64>) -> Dual64 {
        let mut out = Dual64::default();
        let mut tmp = Dual64::default();
        assign(&mut out, expr, &mut tmp);
        out
    }

    #[test]
    fn scalar_assignment_clears_derivative() {
        let mut d = Dual64::variable(5.0);
        let mut tmp = Dual64::default();
        assign(&mut d, Expr::Scalar(2.0), &mut tmp);
        assert_eq!((d.val, d.grad), (2.0, 0.0));
    }

    #[test]
    fn accumulate_add_of_inverse_applies_reciprocal_rule() {
        let x = Dual64::variable(2.0);
        let mut acc = Dual64::new(1.0, 0.0);
        let mut tmp = Dual64::default();
        accumulate_add(&mut acc, rewrite::inverse(Expr::from(&x)), &mut tmp);
        assert_eq!(acc.val, 1.5);
        assert_eq!(acc.grad, -0.25);
    }

    #[test]
    fn accumulate_add_of_negation_subtracts() {
        let x = Dual64::new(3.0, 2.0);
        let mut acc = Dual64::new(10.0, 1.0);
        let mut tmp = Dual64::default();
        accumulate_add(&mut acc, rewrite::negative(Expr::from(&x)), &mut tmp);
        assert_eq!((acc.val, acc.grad), (7.0, -1.0));
    }

    #[test]
    fn accumulate_sub_of_scalar_leaves_derivative() {
        let mut acc = Dual64::new(10.0, 1.0);
        let mut tmp = Dual64::default();
        accumulate_sub(&mut acc, Expr::Scalar(4.0), &mut tmp);
        assert_eq!((acc.val, acc.grad), (6.0, 1.0));
    }

    #[test]
    fn quotient_rule_uses_rescaled_value() {
        // x / y at x = 3, y = 2 with dx = 1
        let mut acc = Dual64::variable(3.0);
        div_dual(&mut acc, &Dual64::constant(2.0));
        assert_eq!((acc.val, acc.grad), (1.5, 0.5));

        // dy = 1: d(x/y)/dy = -x/y²
        let mut acc = Dual64::constant(3.0);
        div_dual(&mut acc, &Dual64::variable(2.0));
        assert_eq!((acc.val, acc.grad), (1.5, -0.75));
    }

    #[test]
    fn ternary_node_scales_product() {
        let a = Dual64::variable(2.0);
        let b = Dual64::new(5.0, 0.0);
        let e = rewrite::mul(rewrite::mul(Expr::Scalar(3.0), Expr::from(&a)), Expr::from(&b));
        let d = collapse(e);
        assert_eq!((d.val, d.grad), (30.0, 15.0));
    }

    #[test]
    fn pow_with_scalar_base() {
        // 2^x at x = 3: value 8, derivative 8 ln 2
        let x = Dual64::variable(3.0);
        let d = collapse(rewrite::pow(Expr::Scalar(2.0), Expr::from(&x)));
        assert_eq!(d.val, 8.0);
        assert!((d.grad - 8.0 * std::f64::consts::LN_2).abs() < 1e-12);
    }

    #[test]
    fn abs_derivative_carries_sign() {
        let mut d = Dual64::variable(-2.0);
        apply(&mut d, OpCode::Abs);
        assert_eq!((d.val, d.grad), (2.0, -1.0));
    }

    #[test]
    fn scratch_contents_never_leak_into_result() {
        // x^(sin x · cos x + e^x · x) materializes three levels deep
        let x = Dual64::variable(0.8);
        let build = || {
            rewrite::pow(
                Expr::from(&x),
                rewrite::add(
                    rewrite::mul(
                        rewrite::unary(OpCode::Sin, Expr::from(&x)),
                        rewrite::unary(OpCode::Cos, Expr::from(&x)),
                    ),
                    rewrite::mul(rewrite::unary(OpCode::Exp, Expr::from(&x)), Expr::from(&x)),
                ),
            )
        };
        let clean = collapse(build());

        let mut out = Dual64::default();
        let mut tmp = Dual64::new(123.0, -7.0);
        assign(&mut out, build(), &mut tmp);
        assert_eq!(out.val.to_bits(), clean.val.to_bits());
        assert_eq!(out.grad.to_bits(), clean.grad.to_bits());

        let u = 0.8_f64;
        let w = u.sin() * u.cos() + u.exp() * u;
        let dw = (u.cos() * u.cos() - u.sin() * u.sin()) + u.exp() * (u + 1.0);
        assert!((clean.val - u.powf(w)).abs() < 1e-12);
        assert!((clean.grad - u.powf(w) * (w / u + u.ln() * dw)).abs() < 1e-12);
    }
}
