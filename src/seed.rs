//! Selecting independent variables.
//!
//! A [`Wrt`] lists argument positions. Entry `k` seeds derivative depth `k` of
//! the argument it names: entry 0 sets the outermost `grad`, entry `k` sets
//! `val.val…(k times).grad`. With a second-order dual, `wrt([i, j])` therefore
//! makes the innermost derivative of the result `∂²f / ∂x_i ∂x_j`, and
//! `wrt([i, i])` makes it `∂²f / ∂x_i²`.
//!
//! [`seed`] and [`unseed`] are the raw primitives. [`SeedGuard`] pairs them
//! so the seeds are cleared on every exit path, unwinding included.

use std::ops::Deref;

use num_traits::{One, Zero};
use tracing::trace;

use crate::derivative::NthDerivative;
use crate::dual::Dual;
use crate::error::{Error, Result};
use crate::number::Number;

/// Ordered list of argument positions to differentiate against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Wrt<const N: usize>(pub [usize; N]);

impl<const N: usize> Wrt<N> {
    /// Selected positions, outermost depth first.
    #[inline]
    pub fn positions(&self) -> &[usize; N] {
        &self.0
    }

    /// Derivative order requested, one per entry.
    #[inline]
    pub const fn order(&self) -> usize {
        N
    }

    fn check(&self, len: usize) -> Result<()> {
        match self.0.iter().find(|&&index| index >= len) {
            Some(&index) => Err(Error::ArgumentOutOfRange { index, len }),
            None => Ok(()),
        }
    }
}

/// Build a variable selection from argument positions.
#[inline]
pub fn wrt<const N: usize>(positions: [usize; N]) -> Wrt<N> {
    Wrt(positions)
}

fn write_slots<T: Number, const N: usize>(wrt: &Wrt<N>, args: &mut [Dual<T>], c: T::Scalar) {
    for (depth, &index) in wrt.0.iter().enumerate() {
        args[index].seed_at(depth, c);
    }
}

/// Set each selected derivative slot to one.
///
/// All positions are validated before any argument is touched.
pub fn seed<T: Number, const N: usize>(wrt: &Wrt<N>, args: &mut [Dual<T>]) -> Result<()>
where
    Dual<T>: NthDerivative<N>,
{
    wrt.check(args.len())?;
    trace!(positions = ?wrt.0, "seed");
    write_slots(wrt, args, T::Scalar::one());
    Ok(())
}

/// Reset each selected derivative slot to zero.
pub fn unseed<T: Number, const N: usize>(wrt: &Wrt<N>, args: &mut [Dual<T>]) -> Result<()>
where
    Dual<T>: NthDerivative<N>,
{
    wrt.check(args.len())?;
    trace!(positions = ?wrt.0, "unseed");
    write_slots(wrt, args, T::Scalar::zero());
    Ok(())
}

/// Seeds on construction, unseeds on drop.
///
/// Derefs to the seeded arguments so they can be handed straight to the
/// function being differentiated.
pub struct SeedGuard<'s, T: Number, const N: usize> {
    wrt: Wrt<N>,
    args: &'s mut [Dual<T>],
}

impl<'s, T: Number, const N: usize> SeedGuard<'s, T, N> {
    pub fn new(wrt: Wrt<N>, args: &'s mut [Dual<T>]) -> Result<Self>
    where
        Dual<T>: NthDerivative<N>,
    {
        seed(&wrt, args)?;
        Ok(SeedGuard { wrt, args })
    }

    /// Positions are known to be in range and within the nesting depth.
    pub(crate) fn new_unchecked(wrt: Wrt<N>, args: &'s mut [Dual<T>]) -> Self {
        write_slots(&wrt, args, T::Scalar::one());
        SeedGuard { wrt, args }
    }
}

impl<T: Number, const N: usize> Deref for SeedGuard<'_, T, N> {
    type Target = [Dual<T>];

    #[inline]
    fn deref(&self) -> &[Dual<T>] {
        self.args
    }
}

impl<T: Number, const N: usize> Drop for SeedGuard<'_, T, N> {
    fn drop(&mut self) {
        trace!(positions = ?self.wrt.0, "unseed");
        write_slots(&self.wrt, self.args, T::Scalar::zero());
    }
}
