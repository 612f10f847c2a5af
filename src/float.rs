use std::fmt::{Debug, Display};

use num_traits::{Float as NumFloat, FloatConst, FromPrimitive};

/// Marker trait for the innermost scalar type (`f32`, `f64`).
///
/// Every [`Dual`](crate::Dual), however deeply nested, bottoms out in one of
/// these. Only primitive float types implement it.
pub trait Float:
    NumFloat + FloatConst + FromPrimitive + Copy + Send + Sync + Default + Debug + Display + 'static
{
}

impl Float for f32 {}
impl Float for f64 {}
