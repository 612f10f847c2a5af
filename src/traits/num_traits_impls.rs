use num_traits::Pow;

use crate::dual::Dual;
use crate::expr::Expr;
use crate::number::Number;
use crate::rewrite;

// `pow` over every operand mix; float-float is num-traits' own `powf` impl.

impl_expr_binary!(Pow, pow, rewrite::pow);
impl_scalar_binary!(f32; Pow, pow, rewrite::pow);
impl_scalar_binary!(f64; Pow, pow, rewrite::pow);
