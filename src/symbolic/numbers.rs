//! Numeric atoms of the symbolic engine.
//!
//! A number is either an exact rational (arbitrary precision, the default for integer
//! input) or a floating point approximation. Arithmetic between two exact numbers stays
//! exact; any float operand makes the result a float.

use num::{BigInt, BigRational, One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;

/// exponents above this magnitude are not expanded exactly
const MAX_EXACT_EXPONENT: u32 = 4096;

/// Numeric value: exact rational or float
#[derive(Clone, Debug)]
pub enum Number {
    /// exact rational, always normalized (gcd(num, den) = 1, den > 0)
    Rational(BigRational),
    /// floating point approximation
    Float(f64),
}

impl Number {
    pub fn int(n: i64) -> Self {
        Number::Rational(BigRational::from_integer(BigInt::from(n)))
    }

    pub fn from_bigint(n: BigInt) -> Self {
        Number::Rational(BigRational::from_integer(n))
    }

    /// exact p/q, None for a zero denominator
    pub fn rational(p: i64, q: i64) -> Option<Self> {
        if q == 0 {
            return None;
        }
        Some(Number::Rational(BigRational::new(BigInt::from(p), BigInt::from(q))))
    }

    pub fn float(f: f64) -> Self {
        Number::Float(f)
    }

    pub fn zero() -> Self {
        Number::int(0)
    }

    pub fn one() -> Self {
        Number::int(1)
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Rational(r) => r.is_zero(),
            Number::Float(f) => *f == 0.0,
        }
    }

    /// exact one (a float 1.0 is deliberately not "one")
    pub fn is_one(&self) -> bool {
        matches!(self, Number::Rational(r) if r.is_one())
    }

    pub fn is_neg_one(&self) -> bool {
        matches!(self, Number::Rational(r) if *r == -BigRational::one())
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Number::Rational(r) => r.is_negative(),
            Number::Float(f) => *f < 0.0,
        }
    }

    pub fn is_positive(&self) -> bool {
        match self {
            Number::Rational(r) => r.is_positive(),
            Number::Float(f) => *f > 0.0,
        }
    }

    /// exact integer
    pub fn is_integer(&self) -> bool {
        matches!(self, Number::Rational(r) if r.is_integer())
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Number::Rational(r) => r.to_f64().unwrap_or_else(|| {
                let n = r.numer().to_f64().unwrap_or(f64::NAN);
                let d = r.denom().to_f64().unwrap_or(f64::NAN);
                n / d
            }),
            Number::Float(f) => *f,
        }
    }

    pub fn as_rational(&self) -> Option<&BigRational> {
        match self {
            Number::Rational(r) => Some(r),
            Number::Float(_) => None,
        }
    }

    pub fn as_bigint(&self) -> Option<BigInt> {
        match self {
            Number::Rational(r) if r.is_integer() => Some(r.to_integer()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_bigint().and_then(|n| n.to_i64())
    }

    pub fn abs(&self) -> Number {
        match self {
            Number::Rational(r) => Number::Rational(r.abs()),
            Number::Float(f) => Number::Float(f.abs()),
        }
    }

    fn combine(
        &self,
        other: &Number,
        exact: impl Fn(&BigRational, &BigRational) -> BigRational,
        approx: impl Fn(f64, f64) -> f64,
    ) -> Number {
        match (self, other) {
            (Number::Rational(a), Number::Rational(b)) => Number::Rational(exact(a, b)),
            _ => Number::Float(approx(self.to_f64(), other.to_f64())),
        }
    }

    pub fn add(&self, other: &Number) -> Number {
        self.combine(other, |a, b| a + b, |a, b| a + b)
    }

    pub fn sub(&self, other: &Number) -> Number {
        self.combine(other, |a, b| a - b, |a, b| a - b)
    }

    pub fn mul(&self, other: &Number) -> Number {
        self.combine(other, |a, b| a * b, |a, b| a * b)
    }

    pub fn neg(&self) -> Number {
        match self {
            Number::Rational(r) => Number::Rational(-r),
            Number::Float(f) => Number::Float(-f),
        }
    }

    /// None when dividing by an exact zero
    pub fn checked_div(&self, other: &Number) -> Option<Number> {
        if other.is_zero() && !other.is_float() {
            return None;
        }
        Some(self.combine(other, |a, b| a / b, |a, b| a / b))
    }

    pub fn recip(&self) -> Option<Number> {
        Number::one().checked_div(self)
    }

    /// largest integer not greater than the number
    pub fn floor(&self) -> Number {
        match self {
            Number::Rational(r) => Number::Rational(r.floor()),
            Number::Float(f) => Number::Float(f.floor()),
        }
    }

    pub fn ceil(&self) -> Number {
        match self {
            Number::Rational(r) => Number::Rational(r.ceil()),
            Number::Float(f) => Number::Float(f.ceil()),
        }
    }

    /// p - q*floor(p/q), None for an exact zero modulus
    pub fn modulo(&self, q: &Number) -> Option<Number> {
        let ratio = self.checked_div(q)?;
        Some(self.sub(&q.mul(&ratio.floor())))
    }

    /// Power of two numbers when the result is representable as a number.
    ///
    /// Exact bases with integer exponents stay exact, fractional exponents are exact only
    /// for perfect powers. Returns None when the result must stay symbolic
    /// (e.g. `2**(1/2)`, `(-1)**(1/2)`, `0**(-1)`).
    pub fn pow(&self, exp: &Number) -> Option<Number> {
        match (self, exp) {
            (Number::Rational(b), Number::Rational(e)) => {
                if e.is_integer() {
                    let n = e.to_integer().to_i64()?;
                    if b.is_zero() && n < 0 {
                        return None;
                    }
                    if n.unsigned_abs() > MAX_EXACT_EXPONENT as u64 {
                        return None;
                    }
                    return Some(Number::Rational(rational_powi(b, n)));
                }
                if b.is_negative() {
                    return None;
                }
                let q = e.denom().to_u32()?;
                let p = e.numer().to_i64()?;
                if q > MAX_EXACT_EXPONENT || p.unsigned_abs() > MAX_EXACT_EXPONENT as u64 {
                    return None;
                }
                let num_root = exact_root(b.numer(), q)?;
                let den_root = exact_root(b.denom(), q)?;
                let root = BigRational::new(num_root, den_root);
                if root.is_zero() && p < 0 {
                    return None;
                }
                Some(Number::Rational(rational_powi(&root, p)))
            }
            _ => {
                let (base, e) = (self.to_f64(), exp.to_f64());
                if base < 0.0 && e.fract() != 0.0 {
                    return None;
                }
                if base == 0.0 && e < 0.0 {
                    return None;
                }
                Some(Number::Float(base.powf(e)))
            }
        }
    }
}

/// r**n for an exact rational and a (possibly negative) integer exponent, r != 0 when n < 0
fn rational_powi(r: &BigRational, n: i64) -> BigRational {
    let k = n.unsigned_abs() as usize;
    let numer = num::pow(r.numer().clone(), k);
    let denom = num::pow(r.denom().clone(), k);
    if n >= 0 {
        BigRational::new(numer, denom)
    } else {
        BigRational::new(denom, numer)
    }
}

/// integer q-th root of a non-negative integer when it is exact
fn exact_root(n: &BigInt, q: u32) -> Option<BigInt> {
    if n.is_negative() {
        return None;
    }
    let r = n.nth_root(q);
    if num::pow(r.clone(), q as usize) == *n {
        Some(r)
    } else {
        None
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// exact numbers sort before floats, floats use the IEEE total order
impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Number::Rational(a), Number::Rational(b)) => a.cmp(b),
            (Number::Float(a), Number::Float(b)) => a.total_cmp(b),
            (Number::Rational(_), Number::Float(_)) => Ordering::Less,
            (Number::Float(_), Number::Rational(_)) => Ordering::Greater,
        }
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::int(n)
    }
}

impl From<f64> for Number {
    fn from(f: f64) -> Self {
        Number::Float(f)
    }
}

impl From<BigRational> for Number {
    fn from(r: BigRational) -> Self {
        Number::Rational(r)
    }
}

/// float formatting: integral floats keep a trailing `.0`
pub fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{:.1}", f)
    } else {
        format!("{}", f)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Number::Rational(r) => {
                if r.is_integer() {
                    write!(f, "{}", r.numer())
                } else {
                    write!(f, "{}/{}", r.numer(), r.denom())
                }
            }
            Number::Float(x) => write!(f, "{}", format_float(*x)),
        }
    }
}

/// Rounds to `digits` significant digits.
pub fn round_to_digits(x: f64, digits: usize) -> f64 {
    if x == 0.0 || !x.is_finite() || digits == 0 {
        return x;
    }
    let magnitude = x.abs().log10().floor() as i32;
    let shift = digits as i32 - 1 - magnitude;
    if shift > 300 || shift < -300 {
        return x;
    }
    let scale = 10f64.powi(shift);
    (x * scale).round() / scale
}
