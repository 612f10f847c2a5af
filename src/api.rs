use tracing::debug;

use crate::derivative::{derivative, NthDerivative};
use crate::dual::Dual;
use crate::error::Result;
use crate::number::Number;
use crate::seed::{wrt, SeedGuard, Wrt};

/// Seed, evaluate, extract and unseed in one call.
///
/// The derivative order is the length of `wrt`; see [`crate::seed`] for how
/// entries map to nesting depths. `f` may return a `Dual` or any owned
/// expression. Seeds are cleared before returning, including when `f` panics.
///
/// ```
/// use lazydual::{differentiate, sin, wrt, Dual64};
///
/// let mut args = [Dual64::from(1.0)];
/// let d = differentiate(|x| sin(x[0]), wrt([0]), &mut args).unwrap();
/// assert_eq!(d, 1.0_f64.cos());
/// assert_eq!(args[0].grad, 0.0);
/// ```
pub fn differentiate<T, F, R, const N: usize>(
    f: F,
    wrt: Wrt<N>,
    args: &mut [Dual<T>],
) -> Result<<Dual<T> as Number>::Scalar>
where
    T: Number,
    Dual<T>: NthDerivative<N>,
    F: FnOnce(&[Dual<T>]) -> R,
    R: Into<Dual<T>>,
{
    debug!(order = N, positions = ?wrt.positions(), "differentiate");
    let guard = SeedGuard::new(wrt, args)?;
    let out: Dual<T> = f(&*guard).into();
    drop(guard);
    Ok(derivative::<N, _>(&out))
}

/// Wrap `f` into a function of `(argument position, arguments)` returning the
/// first-order partial derivative with respect to that argument.
///
/// ```
/// use lazydual::{grad, Dual64};
///
/// let df = grad(|x: &[Dual64]| x[0] * x[1]);
/// let mut args = [Dual64::from(3.0), Dual64::from(5.0)];
/// assert_eq!(df(0, &mut args).unwrap(), 5.0);
/// assert_eq!(df(1, &mut args).unwrap(), 3.0);
/// ```
pub fn grad<T, F, R>(
    f: F,
) -> impl Fn(usize, &mut [Dual<T>]) -> Result<<Dual<T> as Number>::Scalar>
where
    T: Number,
    Dual<T>: NthDerivative<1>,
    F: Fn(&[Dual<T>]) -> R,
    R: Into<Dual<T>>,
{
    move |index: usize, args: &mut [Dual<T>]| differentiate(&f, wrt([index]), args)
}

/// Every first-order partial derivative of `f` at `args`, one forward pass
/// per argument.
pub fn gradient<T, F, R>(f: F, args: &mut [Dual<T>]) -> Vec<<Dual<T> as Number>::Scalar>
where
    T: Number,
    Dual<T>: NthDerivative<1>,
    F: Fn(&[Dual<T>]) -> R,
    R: Into<Dual<T>>,
{
    debug!(n = args.len(), "gradient");
    let mut partials = Vec::with_capacity(args.len());
    for index in 0..args.len() {
        let guard = SeedGuard::new_unchecked(wrt([index]), args);
        let out: Dual<T> = f(&*guard).into();
        drop(guard);
        partials.push(derivative::<1, _>(&out));
    }
    partials
}
