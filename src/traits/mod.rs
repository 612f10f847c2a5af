// Operator impls are concrete per operand pairing: a blanket
// `impl<R: Into<Expr>>` would overlap with the scalar impls.

/// `$Trait` for every pairing of `&Dual`, `Dual` and `Expr`, building the node
/// with `$build`.
macro_rules! impl_expr_binary {
    ($Trait:ident, $method:ident, $build:path) => {
        impl_expr_binary!(@pairs $Trait, $method, $build;
            ['a] &'a Dual<T>, &'a Dual<T> => Expr<'a, T>;
            ['a] &'a Dual<T>, Dual<T> => Expr<'a, T>;
            ['a] &'a Dual<T>, Expr<'a, T> => Expr<'a, T>;
            ['a] Dual<T>, &'a Dual<T> => Expr<'a, T>;
            [] Dual<T>, Dual<T> => Expr<'static, T>;
            ['a] Dual<T>, Expr<'a, T> => Expr<'a, T>;
            ['a] Expr<'a, T>, &'a Dual<T> => Expr<'a, T>;
            ['a] Expr<'a, T>, Dual<T> => Expr<'a, T>;
            ['a] Expr<'a, T>, Expr<'a, T> => Expr<'a, T>;
        );
    };
    (@pairs $Trait:ident, $method:ident, $build:path;
        $([$($lt:lifetime)?] $Lhs:ty, $Rhs:ty => $Out:ty;)*) => {
        $(
            impl<$($lt,)? T: Number> $Trait<$Rhs> for $Lhs {
                type Output = $Out;
                #[inline]
                fn $method(self, rhs: $Rhs) -> $Out {
                    $build(Expr::from(self), Expr::from(rhs))
                }
            }
        )*
    };
}

/// `$Trait` between the primitive float `$f` and each of `&Dual`, `Dual` and
/// `Expr`, on either side. Float-float pairs have no impl and stay plain
/// scalar arithmetic.
macro_rules! impl_scalar_binary {
    ($f:ty; $Trait:ident, $method:ident, $build:path) => {
        impl<'a, T: Number<Scalar = $f>> $Trait<$f> for &'a Dual<T> {
            type Output = Expr<'a, T>;
            #[inline]
            fn $method(self, rhs: $f) -> Expr<'a, T> {
                $build(Expr::from(self), Expr::Scalar(rhs))
            }
        }

        impl<T: Number<Scalar = $f>> $Trait<$f> for Dual<T> {
            type Output = Expr<'static, T>;
            #[inline]
            fn $method(self, rhs: $f) -> Expr<'static, T> {
                $build(Expr::from(self), Expr::Scalar(rhs))
            }
        }

        impl<'a, T: Number<Scalar = $f>> $Trait<$f> for Expr<'a, T> {
            type Output = Expr<'a, T>;
            #[inline]
            fn $method(self, rhs: $f) -> Expr<'a, T> {
                $build(self, Expr::Scalar(rhs))
            }
        }

        impl<'a, T: Number<Scalar = $f>> $Trait<&'a Dual<T>> for $f {
            type Output = Expr<'a, T>;
            #[inline]
            fn $method(self, rhs: &'a Dual<T>) -> Expr<'a, T> {
                $build(Expr::Scalar(self), Expr::from(rhs))
            }
        }

        impl<T: Number<Scalar = $f>> $Trait<Dual<T>> for $f {
            type Output = Expr<'static, T>;
            #[inline]
            fn $method(self, rhs: Dual<T>) -> Expr<'static, T> {
                $build(Expr::Scalar(self), Expr::from(rhs))
            }
        }

        impl<'a, T: Number<Scalar = $f>> $Trait<Expr<'a, T>> for $f {
            type Output = Expr<'a, T>;
            #[inline]
            fn $method(self, rhs: Expr<'a, T>) -> Expr<'a, T> {
                $build(Expr::Scalar(self), rhs)
            }
        }
    };
}

pub mod cmp;
pub mod num_traits_impls;
pub mod std_ops;
