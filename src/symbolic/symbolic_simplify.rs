//! # Symbolic Expression Simplification Module
//!
//! This module provides the algebraic rewriting operations that work on top of the
//! canonical expression tree: expansion, collection of terms, rational normal forms,
//! numeric evaluation and the general purpose `simplify`.
//!
//! ## Simplification Strategy
//!
//! Constant folding, like-term collection and power rules already happen in the
//! canonical constructors, so `simplify` only has to choose between rewritten forms:
//!
//! 1. **Recursive descent**: arguments are simplified first
//! 2. **Candidate forms**: the expression itself, `cancel`, `factor`, `expand`, and the
//!    Pythagorean identity `sin(u)**2 + cos(u)**2 = 1`
//! 3. **Selection**: the candidate with the smallest operation count wins, the original
//!    expression on ties
//!
//! ## Key Features
//!
//! - **Distribution**: `expand` multiplies out products of sums and integer powers of sums
//!   with `itertools` cartesian products
//! - **Collection**: `collect` groups the terms of a sum by powers of the given symbols,
//!   `4*b**2 + 4*b*c + a*c -> 4*b**2 + c*(a + 4*b)`
//! - **Rational forms**: `as_numer_denom` and `together` put a sum over a common denominator
//! - **Numeric evaluation**: `evalf` substitutes values and turns exact numbers and
//!   constants into floats rounded to the requested significant digits
//!
//! ## Performance Considerations
//!
//! Expansion of `(a + b)**n` is bounded by `MAX_EXPAND_EXPONENT`, larger powers are left
//! as they are.

use crate::symbolic::numbers::{Number, round_to_digits};
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_functions::SymFn;
use itertools::Itertools;
use std::collections::BTreeMap;

/// integer powers of sums above this exponent are not multiplied out
const MAX_EXPAND_EXPONENT: i64 = 64;

/// default number of significant digits of `n()`
pub const DEFAULT_DIGITS: usize = 15;

impl Expr {
    //___________________________________EXPANSION____________________________________

    /// Multiplies out products and integer powers of sums, recursively.
    ///
    /// ## Examples
    ///
    /// - `(a - 1)*(a + 1)` → `a**2 - 1`
    /// - `(2*b + c)**2` → `4*b**2 + 4*b*c + c**2`
    /// - `1/(x + 1)**2` → `1/(x**2 + 2*x + 1)`
    /// - `(x + 1)*(x + 2)/(x + 3)` → `x**2/(x + 3) + 3*x/(x + 3) + 2/(x + 3)`
    pub fn expand(&self) -> Expr {
        match self {
            Expr::Num(_) | Expr::Constant(_) | Expr::Var(_) => self.clone(),
            Expr::Add(terms) => Expr::add_many(terms.iter().map(|t| t.expand()).collect()),
            Expr::Mul(factors) => {
                let expanded: Vec<Expr> = factors.iter().map(|f| f.expand()).collect();
                distribute(&expanded)
            }
            Expr::Pow(base, exp) => {
                let base = base.expand();
                let exp = exp.expand();
                match (&base, exp.as_i64()) {
                    (Expr::Add(_), Some(n)) if (2..=MAX_EXPAND_EXPONENT).contains(&n) => {
                        expand_power(&base, n)
                    }
                    (Expr::Add(_), Some(n)) if (-MAX_EXPAND_EXPONENT..=-2).contains(&n) => {
                        Expr::power(expand_power(&base, -n), Expr::int(-1))
                    }
                    _ => Expr::power(base, exp),
                }
            }
            _ => self.map_args(|a| a.expand()),
        }
    }

    //___________________________________COLLECTION____________________________________

    /// Collects the terms of a sum by powers of each symbol in turn. Terms in which a
    /// symbol occurs other than as a plain power are left for the next symbol.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let (a, b, c) = symbols!(a, b, c);
    /// let e = 4 * b.clone().pow(2) + 4 * b.clone() * c.clone() + c.clone() * a.clone();
    /// assert_eq!(e.collect(&[c.clone()]).to_string(), "4*b**2 + c*(a + 4*b)");
    /// ```
    pub fn collect(&self, syms: &[Expr]) -> Expr {
        match self {
            Expr::Add(terms) => collect_terms(terms.clone(), syms),
            _ => self.clone(),
        }
    }

    //___________________________________RATIONAL FORMS____________________________________

    /// Numerator and denominator with every negative power moved to the denominator and
    /// sums brought over a common denominator.
    pub fn as_numer_denom(&self) -> (Expr, Expr) {
        match self {
            Expr::Num(Number::Rational(r)) => (
                Expr::Num(Number::from_bigint(r.numer().clone())),
                Expr::Num(Number::from_bigint(r.denom().clone())),
            ),
            Expr::Mul(factors) => {
                let (numers, denoms): (Vec<Expr>, Vec<Expr>) =
                    factors.iter().map(|f| f.as_numer_denom()).unzip();
                (Expr::mul_many(numers), Expr::mul_many(denoms))
            }
            Expr::Add(terms) => terms
                .iter()
                .map(|t| t.as_numer_denom())
                .reduce(|(n1, d1), (n2, d2)| {
                    if d1 == d2 {
                        (n1 + n2, d1)
                    } else {
                        (n1 * d2.clone() + n2 * d1.clone(), d1 * d2)
                    }
                })
                .unwrap_or_else(|| (Expr::zero(), Expr::one())),
            Expr::Pow(base, exp) => {
                if let Some(n) = exp.as_i64() {
                    let (bn, bd) = base.as_numer_denom();
                    if n < 0 {
                        return (Expr::power(bd, Expr::int(-n)), Expr::power(bn, Expr::int(-n)));
                    }
                    return (Expr::power(bn, exp.as_ref().clone()), Expr::power(bd, exp.as_ref().clone()));
                }
                if exp.could_extract_minus_sign() {
                    let positive = -exp.as_ref().clone();
                    return (Expr::one(), Expr::power(base.as_ref().clone(), positive));
                }
                (self.clone(), Expr::one())
            }
            _ => (self.clone(), Expr::one()),
        }
    }

    /// The expression over a common denominator: `a + b/c -> (a*c + b)/c`
    pub fn together(&self) -> Expr {
        let (n, d) = self.as_numer_denom();
        if d.is_one() {
            return n;
        }
        Expr::mul_unevaluated(vec![n.expand(), Expr::power(d.expand(), Expr::int(-1))])
    }

    //___________________________________SIMPLIFICATION____________________________________

    /// Applies `sin(u)**2 + cos(u)**2 = 1` to the terms of a sum
    pub fn trigsimp(&self) -> Expr {
        let Expr::Add(terms) = self else {
            return self.map_args(|a| a.trigsimp());
        };
        let mut terms: Vec<Expr> = terms.iter().map(|t| t.trigsimp()).collect();
        let mut changed = true;
        while changed {
            changed = false;
            'outer: for i in 0..terms.len() {
                let Some((c, u)) = squared_function(&terms[i], SymFn::sin) else {
                    continue;
                };
                for j in 0..terms.len() {
                    if let Some((c2, u2)) = squared_function(&terms[j], SymFn::cos) {
                        if c == c2 && u == u2 {
                            let (hi, lo) = if i > j { (i, j) } else { (j, i) };
                            terms.remove(hi);
                            terms.remove(lo);
                            terms.push(Expr::Num(c));
                            changed = true;
                            break 'outer;
                        }
                    }
                }
            }
        }
        Expr::add_many(terms)
    }

    /// General purpose simplification: the simplest of several rewritten forms.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let e = (a.clone() + 1).pow(2) / (a.clone() + 1);
    /// assert_eq!(e.simplify(), a + 1);
    /// ```
    pub fn simplify(&self) -> Expr {
        let s = match self {
            Expr::Num(_) | Expr::Constant(_) | Expr::Var(_) => return self.clone(),
            _ => self.map_args(|a| a.simplify()),
        };
        let candidates = vec![
            s.clone(),
            s.trigsimp(),
            s.cancel(),
            s.factor(),
            s.expand(),
        ];
        candidates
            .into_iter()
            .min_by_key(|c| c.count_ops())
            .unwrap_or(s)
    }

    //___________________________________NUMERIC EVALUATION____________________________________

    /// Numeric evaluation to `digits` significant digits after substituting the given
    /// values simultaneously. Integer exponents and unit coefficients stay exact, free
    /// symbols stay symbolic.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let mut values = BTreeMap::new();
    /// values.insert(b.clone(), Expr::float(2.0));
    /// values.insert(c.clone(), Expr::int(4));
    /// assert_eq!((b / c).evalf(4, Some(&values)), Expr::float(0.5));
    /// ```
    pub fn evalf(&self, digits: usize, subs: Option<&BTreeMap<Expr, Expr>>) -> Expr {
        let substituted = match subs {
            Some(map) if !map.is_empty() => {
                self.subs_pairs(&Expr::sort_substitution_map(map), true)
            }
            _ => self.clone(),
        };
        substituted.to_floats(digits).round_floats(digits)
    }

    /// `evalf` with the default precision and no substitution
    pub fn n(&self) -> Expr {
        self.evalf(DEFAULT_DIGITS, None)
    }

    fn to_floats(&self, digits: usize) -> Expr {
        match self {
            Expr::Num(n) => Expr::float(round_to_digits(n.to_f64(), digits)),
            Expr::Constant(c) => Expr::float(round_to_digits(c.value(), digits)),
            Expr::Var(_) => self.clone(),
            Expr::Pow(b, e) if e.as_i64().is_some() => {
                Expr::power(b.to_floats(digits), e.as_ref().clone())
            }
            Expr::Mul(factors) => match factors.split_first() {
                Some((Expr::Num(c), rest)) if c.is_one() || c.is_neg_one() => {
                    let mut out = vec![Expr::Num(c.clone())];
                    out.extend(rest.iter().map(|f| f.to_floats(digits)));
                    Expr::mul_many(out)
                }
                _ => self.map_args(|a| a.to_floats(digits)),
            },
            _ => self.map_args(|a| a.to_floats(digits)),
        }
    }

    fn round_floats(&self, digits: usize) -> Expr {
        match self {
            Expr::Num(Number::Float(v)) => Expr::float(round_to_digits(*v, digits)),
            Expr::Num(_) | Expr::Constant(_) | Expr::Var(_) => self.clone(),
            _ => self.map_args(|a| a.round_floats(digits)),
        }
    }
}

fn terms_of(e: &Expr) -> Vec<Expr> {
    match e {
        Expr::Add(terms) => terms.clone(),
        other => vec![other.clone()],
    }
}

/// product of expanded factors, distributed over every sum among them
fn distribute(factors: &[Expr]) -> Expr {
    if !factors.iter().any(|f| matches!(f, Expr::Add(_))) {
        return Expr::mul_many(factors.to_vec());
    }
    let products = factors
        .iter()
        .map(terms_of)
        .multi_cartesian_product()
        .map(Expr::mul_many)
        .collect();
    Expr::add_many(products)
}

/// `base**n` multiplied out, `base` already expanded
fn expand_power(base: &Expr, n: i64) -> Expr {
    (1..n).fold(base.clone(), |acc, _| {
        let products = terms_of(&acc)
            .iter()
            .cartesian_product(terms_of(base).iter())
            .map(|(t1, t2)| Expr::mul_many(vec![t1.clone(), t2.clone()]))
            .collect();
        Expr::add_many(products)
    })
}

/// exponent of `sym` in a single factor, when the factor is a power of it
fn power_of(factor: &Expr, sym: &Expr) -> Option<Expr> {
    if factor == sym {
        return Some(Expr::one());
    }
    match factor {
        Expr::Pow(b, e) if b.as_ref() == sym && !e.has(sym) => Some(e.as_ref().clone()),
        _ => None,
    }
}

/// splits a term into `(exponent of sym, rest)`, None when sym occurs in another way
fn split_power(term: &Expr, sym: &Expr) -> Option<(Expr, Expr)> {
    let factors = match term {
        Expr::Mul(factors) => factors.clone(),
        other => vec![other.clone()],
    };
    let mut exponent = None;
    let mut rest = Vec::new();
    for f in factors {
        match power_of(&f, sym) {
            Some(e) if exponent.is_none() => exponent = Some(e),
            _ => {
                if f.has(sym) {
                    return None;
                }
                rest.push(f);
            }
        }
    }
    exponent.map(|e| (e, Expr::mul_many(rest)))
}

fn collect_terms(terms: Vec<Expr>, syms: &[Expr]) -> Expr {
    let Some((sym, others)) = syms.split_first() else {
        return Expr::add_many(terms);
    };
    let mut groups: BTreeMap<Expr, Vec<Expr>> = BTreeMap::new();
    let mut rest = Vec::new();
    for t in terms {
        match split_power(&t, sym) {
            Some((e, coeff)) => groups.entry(e).or_default().push(coeff),
            None => rest.push(t),
        }
    }
    let mut out: Vec<Expr> = groups
        .into_iter()
        .map(|(e, coeffs)| {
            Expr::mul_many(vec![Expr::add_many(coeffs), Expr::power(sym.clone(), e)])
        })
        .collect();
    out.push(collect_terms(rest, others));
    Expr::add_many(out)
}

/// `c*f(u)**2` as `(c, u)` for the function `f`
fn squared_function(term: &Expr, f: SymFn) -> Option<(Number, Expr)> {
    let (c, rest) = term.as_coeff_mul();
    match rest {
        Expr::Pow(b, e) if *e == Expr::int(2) => match b.as_ref() {
            Expr::Func(g, args) if *g == f && args.len() == 1 => Some((c, args[0].clone())),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::symbolic_functions::{cos, exp, log, sin};
    use crate::symbols;
    use num_traits::Pow;

    #[test]
    fn test_expand_products_and_powers() {
        let (a, b, c) = symbols!(a, b, c);
        assert_eq!(((a.clone() - 1) * (a.clone() + 1)).expand(), a.clone().pow(2) - 1);
        let sq = (2 * b.clone() + c.clone()).pow(2).expand();
        assert_eq!(
            sq,
            4 * b.clone().pow(2) + 4 * b.clone() * c.clone() + c.clone().pow(2)
        );
        assert_eq!(sq.to_string(), "4*b**2 + 4*b*c + c**2");
        let recip = (a.clone() + 1).pow(-2).expand();
        assert_eq!(recip, (a.clone().pow(2) + 2 * a.clone() + 1).pow(-1));
        assert_eq!(sin(a.clone() * (b.clone() + 1)).expand(), sin(a.clone() * b.clone() + a.clone()));
    }

    #[test]
    fn test_collect() {
        let (a, b, c, x) = symbols!(a, b, c, x);
        let e = 4 * b.clone().pow(2) + 4 * b.clone() * c.clone() + c.clone() * a.clone();
        let collected = e.collect(&[c.clone()]);
        assert_eq!(
            collected,
            4 * b.clone().pow(2) + c.clone() * (a.clone() + 4 * b.clone())
        );
        assert_eq!(collected.to_string(), "4*b**2 + c*(a + 4*b)");
        let poly = a.clone() * x.clone().pow(3) + b.clone() * x.clone().pow(3) + c.clone() * x.clone();
        assert_eq!(
            poly.collect(&[x.clone()]),
            c.clone() * x.clone() + x.clone().pow(3) * (a.clone() + b.clone())
        );
        assert_eq!(a.collect(&[x]), a);
    }

    #[test]
    fn test_numer_denom_and_together() {
        let (a, b, c) = symbols!(a, b, c);
        let (n, d) = (b.clone() / c.clone()).as_numer_denom();
        assert_eq!((n, d), (b.clone(), c.clone()));
        let (n, d) = (a.clone() + b.clone() / c.clone()).as_numer_denom();
        assert_eq!(n.expand(), a.clone() * c.clone() + b.clone());
        assert_eq!(d, c.clone());
        assert_eq!(Expr::rational(3, 4).as_numer_denom(), (Expr::int(3), Expr::int(4)));
    }

    #[test]
    fn test_simplify() {
        let (a, c, x) = symbols!(a, c, x);
        let e = (a.clone() + 1).pow(2) / (a.clone() + 1);
        assert_eq!(e.simplify(), a.clone() + 1);
        assert_eq!(exp(log(c.clone())).simplify(), c.clone());
        let t = sin(x.clone()).pow(2) + cos(x.clone()).pow(2);
        assert_eq!(t.simplify(), Expr::one());
        let r = (x.clone().pow(2) - 1) / (x.clone() - 1);
        assert_eq!(r.simplify(), x.clone() + 1);
        assert_eq!((a.clone().pow(2) - 1).simplify(), a.pow(2) - 1);
    }

    #[test]
    fn test_evalf() {
        let (a, b, c) = symbols!(a, b, c);
        let mut values = BTreeMap::new();
        values.insert(b.clone(), Expr::float(2.0));
        values.insert(c.clone(), Expr::int(4));
        assert_eq!((b.clone() / c.clone()).evalf(4, Some(&values)), Expr::float(0.5));
        assert_eq!(a.evalf(4, Some(&values)), a);
        assert_eq!(Expr::pi().evalf(4, None), Expr::float(3.142));
        assert_eq!(Expr::rational(1, 3).evalf(3, None).to_string(), "0.333");
        assert_eq!((2 * a.clone()).n(), 2.0 * a.clone());
        assert_eq!((-a.clone()).n(), -a.clone());
        assert_eq!(a.clone().pow(2).n(), a.pow(2));
    }
}
