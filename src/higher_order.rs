//! Type-level nesting for higher-order derivatives.
//!
//! Depth 0 is a plain `f64`; depth `N` is a `Dual` whose value and derivative
//! slots are both depth `N - 1`. One forward pass over a depth-`N` variable
//! seeded at every level yields derivatives of order `0..=N`.

use crate::dual::Dual;
use crate::number::Number;

/// Type-level nesting depth.
#[derive(Clone, Copy, Debug, Default)]
pub struct Depth<const N: usize>;

/// Maps a [`Depth`] to its nested dual type.
pub trait Nesting {
    type Type: Number<Scalar = f64>;
}

impl Nesting for Depth<0> {
    type Type = f64;
}

macro_rules! impl_nesting {
    ($($n:literal => $prev:literal),* $(,)?) => {
        $(
            impl Nesting for Depth<$n> {
                type Type = Dual<<Depth<$prev> as Nesting>::Type>;
            }
        )*
    };
}

impl_nesting!(1 => 0, 2 => 1, 3 => 2, 4 => 3, 5 => 4, 6 => 5, 7 => 6, 8 => 7);

/// `f64`-based dual nested `N` times, for `N` in `0..=8`.
///
/// `HigherOrderDual<1>` is [`Dual64`](crate::Dual64); `HigherOrderDual<2>` is
/// `Dual<Dual<f64>>`.
pub type HigherOrderDual<const N: usize> = <Depth<N> as Nesting>::Type;

/// A depth-`N` variable at `x`, seeded at every depth.
///
/// Evaluating `f` on it gives `f^(k)(x)` as `derivative::<k, _>` of the
/// result for each `k` up to `N`.
pub fn higher_order_variable<const N: usize>(x: f64) -> HigherOrderDual<N>
where
    Depth<N>: Nesting,
{
    let mut d = <HigherOrderDual<N> as Number>::from_scalar(x);
    for depth in 0..N {
        d.seed_at(depth, 1.0);
    }
    d
}
