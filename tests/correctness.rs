use approx::assert_relative_eq;
use lazydual::opcode::{eval_forward, OpCode};
use lazydual::rewrite;
use lazydual::{atan, cos, eval, exp, log, pow, sin, sqrt, tan, val, Dual64, Expr};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Central finite difference: (f(x+h) - f(x-h)) / 2h
fn finite_diff(f: impl Fn(f64) -> f64, x: f64) -> f64 {
    let h = 1e-6;
    (f(x + h) - f(x - h)) / (2.0 * h)
}

fn assert_bits_eq(a: Dual64, b: Dual64) {
    assert_eq!(a.val.to_bits(), b.val.to_bits(), "values differ: {} vs {}", a.val, b.val);
    assert_eq!(a.grad.to_bits(), b.grad.to_bits(), "derivatives differ: {} vs {}", a.grad, b.grad);
}

type Case = (
    &'static str,
    fn(&Dual64) -> Dual64,
    fn(f64) -> f64,
);

fn cases() -> [Case; 8] {
    [
        ("poly", |x| eval(3.0 * x * x - 2.0 * x + 1.0), |x| 3.0 * x * x - 2.0 * x + 1.0),
        ("rational", |x| eval((x + 1.0) / (x * x + 2.0)), |x| (x + 1.0) / (x * x + 2.0)),
        ("trig", |x| eval(sin(x) * cos(x) + tan(x * 0.5)), |x| x.sin() * x.cos() + (x * 0.5).tan()),
        ("exp_log", |x| eval(exp(-x) * log(x * x + 1.0)), |x| (-x).exp() * (x * x + 1.0).ln()),
        ("nested", |x| eval(sqrt(exp(sin(x)) + 1.0)), |x| (x.sin().exp() + 1.0).sqrt()),
        ("atan_pow", |x| eval(atan(pow(x, 3.0)) - 1.0 / x), |x| x.powf(3.0).atan() - 1.0 / x),
        ("neg_chain", |x| eval(-(-x * 2.0) - (-sin(x))), |x| x * 2.0 + x.sin()),
        ("quotient_chain", |x| eval(x / (x + 2.0) / (x + 3.0)), |x| x / (x + 2.0) / (x + 3.0)),
    ]
}

#[test]
fn random_expression_battery() {
    let mut rng = StdRng::seed_from_u64(42);
    for (name, f_dual, f_f64) in cases() {
        for _ in 0..20 {
            let x: f64 = rng.gen_range(0.3..2.5);
            let d = f_dual(&Dual64::variable(x));
            assert_relative_eq!(d.val, f_f64(x), max_relative = 1e-12);
            let fd = finite_diff(f_f64, x);
            assert!(
                (d.grad - fd).abs() <= 1e-6 * (1.0 + fd.abs()),
                "{name} at {x}: ad={}, fd={fd}",
                d.grad
            );
        }
    }
}

/// Plain float evaluation returning `(value, rounding error bound)`.
type ScalarFn = Box<dyn Fn(f64) -> (f64, f64)>;

const EPS: f64 = f64::EPSILON;

fn boxed(f: impl Fn(f64) -> (f64, f64) + 'static) -> ScalarFn {
    Box::new(f)
}

/// Random tree over `{+, -, *, /, sin, cos, exp, log, pow}`, built once as an
/// expression over `x` and once as plain float arithmetic with a first-order
/// error bound. Divisors, log arguments and pow bases are kept positive; exp
/// is bounded through sin.
fn random_tree<'a>(rng: &mut StdRng, x: &'a Dual64, depth: u32) -> (Expr<'a, f64>, ScalarFn) {
    if depth == 0 || rng.gen_bool(0.2) {
        if rng.gen_bool(0.6) {
            return (Expr::from(x), boxed(|u| (u, 0.0)));
        }
        let c: f64 = rng.gen_range(-2.0..2.0);
        return (Expr::Scalar(c), boxed(move |_| (c, 0.0)));
    }
    let op = rng.gen_range(0..9);
    let (a, fa) = random_tree(rng, x, depth - 1);
    match op {
        0..=3 => {
            let (b, fb) = random_tree(rng, x, depth - 1);
            match op {
                0 => (
                    a + b,
                    boxed(move |u| {
                        let ((p, ep), (q, eq)) = (fa(u), fb(u));
                        let v = p + q;
                        (v, ep + eq + EPS * v.abs())
                    }),
                ),
                1 => (
                    a - b,
                    boxed(move |u| {
                        let ((p, ep), (q, eq)) = (fa(u), fb(u));
                        let v = p - q;
                        (v, ep + eq + EPS * v.abs())
                    }),
                ),
                2 => (
                    a * b,
                    boxed(move |u| {
                        let ((p, ep), (q, eq)) = (fa(u), fb(u));
                        let v = p * q;
                        (v, p.abs() * eq + q.abs() * ep + EPS * v.abs())
                    }),
                ),
                _ => (
                    a / (b.clone() * b + 1.0),
                    boxed(move |u| {
                        let ((p, ep), (q, eq)) = (fa(u), fb(u));
                        let w = q * q + 1.0;
                        let ew = 2.0 * q.abs() * eq + 2.0 * EPS * w;
                        let v = p / w;
                        (v, ep / w + p.abs() * ew / (w * w) + 2.0 * EPS * v.abs())
                    }),
                ),
            }
        }
        4 => (
            sin(a),
            boxed(move |u| {
                let (p, ep) = fa(u);
                let v = p.sin();
                (v, ep + EPS * (1.0 + v.abs()))
            }),
        ),
        5 => (
            cos(a),
            boxed(move |u| {
                let (p, ep) = fa(u);
                let v = p.cos();
                (v, ep + EPS * (1.0 + v.abs()))
            }),
        ),
        6 => (
            exp(sin(a)),
            boxed(move |u| {
                let (p, ep) = fa(u);
                let v = p.sin().exp();
                (v, v * (ep + 2.0 * EPS) + EPS * v)
            }),
        ),
        7 => (
            log(a.clone() * a + 1.0),
            boxed(move |u| {
                let (p, ep) = fa(u);
                let w = p * p + 1.0;
                let ew = 2.0 * p.abs() * ep + 2.0 * EPS * w;
                let v = w.ln();
                (v, ew / w + EPS * (1.0 + v.abs()))
            }),
        ),
        _ => {
            let c: f64 = rng.gen_range(0.5..2.5);
            (
                pow(a.clone() * a + 0.5, c),
                boxed(move |u| {
                    let (p, ep) = fa(u);
                    let w = p * p + 0.5;
                    let ew = 2.0 * p.abs() * ep + 2.0 * EPS * w;
                    let v = w.powf(c);
                    (v, c * v * ew / w + 2.0 * EPS * v)
                }),
            )
        }
    }
}

#[test]
fn random_trees_match_scalar_arithmetic() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..500 {
        let u: f64 = rng.gen_range(0.3..1.5);
        let x = Dual64::variable(u);
        let depth = rng.gen_range(1..=4);
        let (expr, f) = random_tree(&mut rng, &x, depth);
        let (expected, bound) = f(u);
        let got = val(&eval(expr));
        assert!(
            (got - expected).abs() <= 1e3 * bound + 1e-300,
            "depth {depth} at {u}: lazy={got}, scalar={expected}, bound={bound}"
        );
    }
}

#[test]
fn unary_nodes_match_float_evaluation() {
    let mut rng = StdRng::seed_from_u64(7);
    for op in OpCode::ALL.into_iter().filter(|op| op.is_unary()) {
        let x: f64 = rng.gen_range(0.1..0.9);
        let d = eval(rewrite::unary(op, Expr::from(&Dual64::variable(x))));
        assert_relative_eq!(d.val, eval_forward(op, x, 0.0), max_relative = 1e-14);
    }
}

#[test]
fn double_negation_is_bit_identical() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..50 {
        let x = Dual64::new(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0));
        assert_bits_eq(eval(-(-&x)), x);
        assert_bits_eq(eval(-(-sin(&x))), eval(sin(&x)));
    }
}

#[test]
fn product_of_negations_is_bit_identical() {
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..50 {
        let a = Dual64::new(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0));
        let b = Dual64::new(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0));
        assert_bits_eq(eval(-&a * -&b), eval(&a * &b));
        assert_bits_eq(eval(-exp(&a) * -cos(&b)), eval(exp(&a) * cos(&b)));
    }
}

#[test]
fn rewritten_forms_match_their_expansion() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..50 {
        let a = Dual64::new(rng.gen_range(0.5..4.0), rng.gen_range(-2.0..2.0));
        let b = Dual64::new(rng.gen_range(0.5..4.0), rng.gen_range(-2.0..2.0));
        // a - b is built as a + (-b)
        assert_bits_eq(eval(&a - &b), eval(&a + -&b));
        // (1/a)(1/b) is built as 1/(ab)
        let product = eval(&a * &b);
        let inv = eval(1.0 / &product);
        let lhs = eval(rewrite::mul(
            rewrite::inverse(Expr::from(&a)),
            rewrite::inverse(Expr::from(&b)),
        ));
        assert_relative_eq!(lhs.val, inv.val, max_relative = 1e-14);
        assert_relative_eq!(lhs.grad, inv.grad, epsilon = 1e-12, max_relative = 1e-12);
    }
}

#[test]
fn compound_assignment_matches_collapse() {
    let mut rng = StdRng::seed_from_u64(4);
    for _ in 0..20 {
        let x = Dual64::variable(rng.gen_range(0.5..3.0));
        let y = Dual64::constant(rng.gen_range(0.5..3.0));

        let mut acc = Dual64::from(1.0);
        acc += sin(&x);
        acc *= &y;
        acc -= exp(&x) * 2.0;
        acc /= &x + &y;
        let direct = eval((1.0 + sin(&x)) * &y - exp(&x) * 2.0);
        let direct = eval(&direct / (&x + &y));
        assert_relative_eq!(acc.val, direct.val, epsilon = 1e-12, max_relative = 1e-12);
        assert_relative_eq!(acc.grad, direct.grad, epsilon = 1e-12, max_relative = 1e-12);
    }
}
