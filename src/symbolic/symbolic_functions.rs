//! Named mathematical functions of the symbolic engine.
//!
//! `SymFn` lists every function an expression can apply. Names follow the usual computer
//! algebra spelling (`log` is the natural logarithm, `Abs`, `Heaviside`, `Mod`) and are
//! parsed from and printed to strings through `strum`.
//!
//! Function application auto-evaluates in `eval_func`: exact special values
//! (`sin(0) = 0`, `log(E) = 1`, `Heaviside(0) = 1/2`), inverse pairs (`exp(log(x)) = x`),
//! parity (`sin(-x) = -sin(x)`) and numeric evaluation when an argument is a float.
#![allow(non_camel_case_types)]

use crate::symbolic::numbers::Number;
use crate::symbolic::symbolic_engine::{Expr, MathConst};
use num::{BigInt, One};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// factorials above this argument stay unevaluated
const MAX_EXACT_FACTORIAL: i64 = 1000;

/// Functions known to the engine
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter, AsRefStr,
)]
pub enum SymFn {
    exp,
    log,
    sin,
    cos,
    tan,
    cot,
    sec,
    csc,
    asin,
    acos,
    atan,
    acot,
    atan2,
    sinh,
    cosh,
    tanh,
    coth,
    asinh,
    acosh,
    atanh,
    Abs,
    sign,
    floor,
    ceiling,
    factorial,
    binomial,
    re,
    im,
    conjugate,
    Heaviside,
    DiracDelta,
    Mod,
    Min,
    Max,
}

impl SymFn {
    /// Number of arguments, None for variadic functions
    pub fn arity(&self) -> Option<usize> {
        match self {
            SymFn::atan2 | SymFn::binomial | SymFn::Mod => Some(2),
            SymFn::Min | SymFn::Max => None,
            _ => Some(1),
        }
    }

    pub fn is_variadic(&self) -> bool {
        self.arity().is_none()
    }

    fn is_odd(&self) -> bool {
        matches!(
            self,
            SymFn::sin
                | SymFn::tan
                | SymFn::cot
                | SymFn::csc
                | SymFn::asin
                | SymFn::atan
                | SymFn::acot
                | SymFn::sinh
                | SymFn::tanh
                | SymFn::coth
                | SymFn::asinh
                | SymFn::atanh
        )
    }

    fn is_even(&self) -> bool {
        matches!(self, SymFn::cos | SymFn::sec | SymFn::cosh | SymFn::Abs)
    }

    /// Numeric value of the function, None outside the real domain
    pub fn eval_f64(&self, args: &[f64]) -> Option<f64> {
        let x = *args.first()?;
        let value = match self {
            SymFn::exp => x.exp(),
            SymFn::log => {
                if x <= 0.0 {
                    return None;
                }
                x.ln()
            }
            SymFn::sin => x.sin(),
            SymFn::cos => x.cos(),
            SymFn::tan => x.tan(),
            SymFn::cot => 1.0 / x.tan(),
            SymFn::sec => 1.0 / x.cos(),
            SymFn::csc => 1.0 / x.sin(),
            SymFn::asin => x.asin(),
            SymFn::acos => x.acos(),
            SymFn::atan => x.atan(),
            SymFn::acot => (1.0 / x).atan(),
            SymFn::atan2 => x.atan2(*args.get(1)?),
            SymFn::sinh => x.sinh(),
            SymFn::cosh => x.cosh(),
            SymFn::tanh => x.tanh(),
            SymFn::coth => 1.0 / x.tanh(),
            SymFn::asinh => x.asinh(),
            SymFn::acosh => x.acosh(),
            SymFn::atanh => x.atanh(),
            SymFn::Abs => x.abs(),
            SymFn::sign => {
                if x == 0.0 {
                    0.0
                } else {
                    x.signum()
                }
            }
            SymFn::floor => x.floor(),
            SymFn::ceiling => x.ceil(),
            SymFn::factorial => {
                if x < 0.0 || x.fract() != 0.0 || x > 170.0 {
                    return None;
                }
                (1..=x as u64).map(|k| k as f64).product()
            }
            SymFn::binomial => {
                let k = *args.get(1)?;
                if k < 0.0 || k.fract() != 0.0 {
                    return None;
                }
                (0..k as u64).fold(1.0, |acc, i| acc * (x - i as f64) / (i as f64 + 1.0))
            }
            SymFn::re | SymFn::conjugate => x,
            SymFn::im => 0.0,
            SymFn::Heaviside => {
                if x > 0.0 {
                    1.0
                } else if x < 0.0 {
                    0.0
                } else {
                    0.5
                }
            }
            SymFn::DiracDelta => {
                if x != 0.0 {
                    0.0
                } else {
                    return None;
                }
            }
            SymFn::Mod => {
                let q = *args.get(1)?;
                if q == 0.0 {
                    return None;
                }
                x - q * (x / q).floor()
            }
            SymFn::Min => args.iter().cloned().fold(f64::INFINITY, f64::min),
            SymFn::Max => args.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        };
        if value.is_finite() { Some(value) } else { None }
    }
}

fn neg(e: &Expr) -> Expr {
    Expr::mul_many(vec![Expr::int(-1), e.clone()])
}

fn is_pi(e: &Expr) -> bool {
    matches!(e, Expr::Constant(MathConst::Pi))
}

/// Automatic evaluation of `f(args)`; None leaves the application unevaluated
pub fn eval_func(f: SymFn, args: &[Expr]) -> Option<Expr> {
    match f.arity() {
        Some(n) if args.len() != n => return None,
        None if args.is_empty() => return None,
        _ => {}
    }
    let numbers: Option<Vec<&Number>> = args.iter().map(|a| a.as_number()).collect();
    if let Some(numbers) = &numbers {
        if numbers.iter().any(|n| n.is_float()) {
            let values: Vec<f64> = numbers.iter().map(|n| n.to_f64()).collect();
            if let Some(v) = f.eval_f64(&values) {
                return Some(Expr::float(v));
            }
        }
    }
    let x = &args[0];
    if f.is_odd() && x.could_extract_minus_sign() {
        return Some(neg(&Expr::func(f, vec![neg(x)])));
    }
    if f.is_even() && x.could_extract_minus_sign() {
        return Some(Expr::func(f, vec![neg(x)]));
    }
    match f {
        SymFn::exp => match x {
            _ if x.is_zero() => Some(Expr::one()),
            _ if x.is_one() => Some(Expr::E()),
            Expr::Func(SymFn::log, inner) => inner.first().cloned(),
            _ => None,
        },
        SymFn::log => match x {
            _ if x.is_one() => Some(Expr::zero()),
            Expr::Constant(MathConst::E) => Some(Expr::one()),
            _ => None,
        },
        SymFn::sin | SymFn::tan | SymFn::asin | SymFn::atan | SymFn::sinh | SymFn::tanh
        | SymFn::asinh | SymFn::atanh => {
            if x.is_zero() || (matches!(f, SymFn::sin | SymFn::tan) && is_pi(x)) {
                Some(Expr::zero())
            } else {
                None
            }
        }
        SymFn::cos | SymFn::sec | SymFn::cosh => {
            if x.is_zero() {
                Some(Expr::one())
            } else if is_pi(x) && f != SymFn::cosh {
                Some(Expr::int(-1))
            } else {
                None
            }
        }
        SymFn::acos => x.is_one().then(Expr::zero),
        SymFn::Abs => match x {
            Expr::Num(n) => Some(Expr::Num(n.abs())),
            Expr::Func(SymFn::Abs, _) => Some(x.clone()),
            _ if x.is_positive() => Some(x.clone()),
            _ => None,
        },
        SymFn::sign => match x {
            Expr::Num(n) if n.is_zero() => Some(Expr::zero()),
            Expr::Num(n) if n.is_negative() => Some(Expr::int(-1)),
            _ if x.is_positive() => Some(Expr::one()),
            _ => None,
        },
        SymFn::floor => x.as_number().map(|n| Expr::Num(n.floor())),
        SymFn::ceiling => x.as_number().map(|n| Expr::Num(n.ceil())),
        SymFn::factorial => {
            let n = x.as_i64()?;
            if !(0..=MAX_EXACT_FACTORIAL).contains(&n) {
                return None;
            }
            let value = (1..=n).fold(BigInt::one(), |acc, k| acc * BigInt::from(k));
            Some(Expr::Num(Number::from_bigint(value)))
        }
        SymFn::binomial => {
            let n = x.as_bigint_value()?;
            let k = args[1].as_i64()?;
            if k < 0 || k > MAX_EXACT_FACTORIAL {
                return None;
            }
            let mut value = num::BigRational::one();
            for i in 0..k {
                value = value * num::BigRational::new(&n - BigInt::from(i), BigInt::from(i + 1));
            }
            Some(Expr::Num(Number::Rational(value)))
        }
        SymFn::re | SymFn::conjugate => x.as_number().map(|_| x.clone()),
        SymFn::im => x.as_number().map(|_| Expr::zero()),
        SymFn::Heaviside => match x {
            Expr::Num(n) if n.is_zero() => Some(Expr::rational(1, 2)),
            Expr::Num(n) if n.is_negative() => Some(Expr::zero()),
            _ if x.is_positive() => Some(Expr::one()),
            _ => None,
        },
        SymFn::DiracDelta => match x {
            Expr::Num(n) if !n.is_zero() => Some(Expr::zero()),
            _ if x.is_positive() => Some(Expr::zero()),
            _ => None,
        },
        SymFn::Mod => {
            let q = &args[1];
            if x == q || x.is_zero() {
                return Some(Expr::zero());
            }
            match (x, q) {
                (Expr::Num(p), Expr::Num(q)) => p.modulo(q).map(Expr::Num),
                _ => None,
            }
        }
        SymFn::Min | SymFn::Max => eval_min_max(f, args),
        SymFn::atan2 => {
            if x.is_zero() && args[1].is_positive() {
                Some(Expr::zero())
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Flattens nested Min/Max, folds the numeric arguments, drops duplicates
fn eval_min_max(f: SymFn, args: &[Expr]) -> Option<Expr> {
    let mut flat: Vec<Expr> = Vec::new();
    for a in args {
        match a {
            Expr::Func(g, inner) if *g == f => flat.extend(inner.iter().cloned()),
            _ => flat.push(a.clone()),
        }
    }
    let mut best: Option<Number> = None;
    let mut symbolic: Vec<Expr> = Vec::new();
    for a in flat {
        match a {
            Expr::Num(n) => {
                best = Some(match best {
                    None => n,
                    Some(b) => {
                        let n_wins = if f == SymFn::Min {
                            n.to_f64() < b.to_f64()
                        } else {
                            n.to_f64() > b.to_f64()
                        };
                        if n_wins { n } else { b }
                    }
                })
            }
            other => {
                if !symbolic.contains(&other) {
                    symbolic.push(other);
                }
            }
        }
    }
    if let Some(b) = best {
        symbolic.push(Expr::Num(b));
    }
    symbolic.sort();
    if symbolic.len() == 1 {
        return symbolic.pop();
    }
    if symbolic.as_slice() == args {
        return None;
    }
    Some(Expr::Func(f, symbolic))
}

impl Expr {
    fn as_bigint_value(&self) -> Option<BigInt> {
        self.as_number().and_then(|n| n.as_bigint())
    }

    /// Numeric value of an expression without free symbols
    pub fn eval_f64(&self) -> Option<f64> {
        match self {
            Expr::Num(n) => Some(n.to_f64()),
            Expr::Constant(c) => Some(c.value()),
            Expr::Var(_) | Expr::Derivative(_, _) | Expr::Integral(_, _) => None,
            Expr::Add(v) => v.iter().map(|a| a.eval_f64()).sum(),
            Expr::Mul(v) => v.iter().map(|a| a.eval_f64()).product(),
            Expr::Pow(b, e) => {
                let (b, e) = (b.eval_f64()?, e.eval_f64()?);
                let v = b.powf(e);
                if v.is_finite() { Some(v) } else { None }
            }
            Expr::Func(f, args) => {
                let values: Option<Vec<f64>> = args.iter().map(|a| a.eval_f64()).collect();
                f.eval_f64(&values?)
            }
        }
    }

    /// Evaluates with numeric values for the named symbols
    pub fn eval_at(&self, values: &[(&str, f64)]) -> Option<f64> {
        let map = values
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect();
        self.set_variable_from_map(&map).eval_f64()
    }
}

/// shorthand constructors mirroring the engine function names
pub fn sin(x: Expr) -> Expr {
    Expr::func(SymFn::sin, vec![x])
}

pub fn cos(x: Expr) -> Expr {
    Expr::func(SymFn::cos, vec![x])
}

pub fn exp(x: Expr) -> Expr {
    Expr::func(SymFn::exp, vec![x])
}

pub fn log(x: Expr) -> Expr {
    Expr::func(SymFn::log, vec![x])
}

pub fn sqrt(x: Expr) -> Expr {
    Expr::power(x, Expr::rational(1, 2))
}
