//! Forward-mode automatic differentiation with lazily built expressions.
//!
//! Arithmetic on [`Dual`] numbers builds an [`Expr`] tree, which is rewritten
//! into a normal form while it is being built and collapsed into a single
//! `Dual` in one pass. Nesting `Dual` inside itself gives higher-order
//! derivatives (see [`HigherOrderDual`]).
//!
//! ```
//! use lazydual::{differentiate, wrt, Dual64};
//!
//! let mut args = [Dual64::from(3.0)];
//! let d = differentiate(|x| x[0] * x[0], wrt([0]), &mut args).unwrap();
//! assert_eq!(d, 6.0);
//! ```

pub mod api;
pub mod derivative;
pub mod dual;
mod engine;
pub mod error;
pub mod expr;
pub mod float;
pub mod functions;
pub mod higher_order;
pub mod number;
pub mod opcode;
pub mod rewrite;
pub mod seed;
mod traits;

pub use api::{differentiate, grad, gradient};
pub use derivative::{derivative, NthDerivative};
pub use dual::{eval, Dual};
pub use error::{Error, Result};
pub use expr::Expr;
pub use float::Float;
pub use functions::{
    abs, abs2, acos, asin, atan, conj, cos, exp, imag, log, log10, pow, positive, real, sin, sqrt,
    tan,
};
pub use higher_order::{higher_order_variable, HigherOrderDual};
pub use number::{val, Number, Val};
pub use opcode::OpCode;
pub use seed::{seed, unseed, wrt, SeedGuard, Wrt};

/// Type alias for first-order dual numbers over `f64`.
pub type Dual64 = Dual<f64>;
/// Type alias for first-order dual numbers over `f32`.
pub type Dual32 = Dual<f32>;
