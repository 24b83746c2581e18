//! # Polynomial Factorization Module
//!
//! Sparse multivariate polynomials with exact rational coefficients, and the
//! factorization built on them.
//!
//! ## Representation
//!
//! A `Poly` stores its generators (symbols, but also opaque atoms such as `sin(x)` or
//! `pi`) and a map from exponent vectors (monomials) to coefficients. Monomials are
//! compared lexicographically, so the last entry of the map is the leading term in the
//! lex order of the generators.
//!
//! ## Factorization Strategy
//!
//! 1. **Content**: the rational content is pulled out, the leading coefficient of what
//!    remains is positive
//! 2. **Monomial content**: the common power of every generator (`x**2*y + x*y -> x*y*(x + 1)`)
//! 3. **Univariate rational roots**: candidates `p/q` with `p | a0`, `q | an`, removed by
//!    synthetic division as long as one is found
//! 4. **Multivariate quadratics**: a generator of degree two with a numeric leading
//!    coefficient whose discriminant is a perfect square polynomial
//!    (`4*b**2 + 4*b*c + c**2 -> (2*b + c)**2`)
//!
//! Anything else is kept as an irreducible factor.
//!
//! ## Key Methods
//! - `Poly::from_expr`, `Poly::to_expr` - conversion from and to canonical expressions
//! - `Poly::factor_list` - unit and list of (factor, multiplicity)
//! - `Expr::factor` - factored form of a rational function
//! - `Expr::cancel` - expanded numerator over expanded denominator, common factors removed

use crate::symbolic::numbers::Number;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::divisors;
use itertools::Itertools;
use num::{BigInt, BigRational, Integer, One, Signed, Zero};
use std::collections::BTreeMap;

/// exponent of every generator in a term
pub type Monomial = Vec<u32>;

/// Sparse polynomial over the rationals
#[derive(Clone, Debug, PartialEq)]
pub struct Poly {
    pub gens: Vec<Expr>,
    pub terms: BTreeMap<Monomial, BigRational>,
}

impl Poly {
    pub fn zero(gens: &[Expr]) -> Poly {
        Poly {
            gens: gens.to_vec(),
            terms: BTreeMap::new(),
        }
    }

    pub fn constant(gens: &[Expr], c: BigRational) -> Poly {
        let mut p = Poly::zero(gens);
        p.insert(vec![0; gens.len()], c);
        p
    }

    /// the i-th generator as a polynomial
    pub fn generator(gens: &[Expr], i: usize) -> Poly {
        let mut m = vec![0; gens.len()];
        m[i] = 1;
        let mut p = Poly::zero(gens);
        p.insert(m, BigRational::one());
        p
    }

    fn insert(&mut self, m: Monomial, c: BigRational) {
        let entry = self.terms.entry(m.clone()).or_insert_with(BigRational::zero);
        *entry += c;
        if entry.is_zero() {
            self.terms.remove(&m);
        }
    }

    //___________________________________CONVERSION____________________________________

    /// Polynomial view of an expression. The expression is expanded first; every node
    /// that is not a sum, a product, a rational number or a positive integer power
    /// becomes a generator. Floats and negative integer powers are rejected.
    pub fn from_expr(expr: &Expr) -> Option<Poly> {
        let expanded = expr.expand();
        let mut gens = Vec::new();
        collect_generators(&expanded, &mut gens)?;
        gens.sort();
        gens.dedup();
        let mut poly = Poly::zero(&gens);
        let terms = match &expanded {
            Expr::Add(terms) => terms.clone(),
            other => vec![other.clone()],
        };
        for term in terms {
            let (m, c) = term_to_monomial(&term, &gens)?;
            poly.insert(m, c);
        }
        Some(poly)
    }

    pub fn to_expr(&self) -> Expr {
        let terms = self
            .terms
            .iter()
            .map(|(m, c)| {
                let mut factors = vec![Expr::Num(Number::Rational(c.clone()))];
                for (g, k) in self.gens.iter().zip(m.iter()) {
                    if *k > 0 {
                        factors.push(Expr::power(g.clone(), Expr::int(*k as i64)));
                    }
                }
                Expr::mul_many(factors)
            })
            .collect();
        Expr::add_many(terms)
    }

    //___________________________________ARITHMETIC____________________________________

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn is_constant(&self) -> bool {
        self.terms.keys().all(|m| m.iter().all(|k| *k == 0))
    }

    fn constant_value(&self) -> BigRational {
        self.terms
            .iter()
            .find(|(m, _)| m.iter().all(|k| *k == 0))
            .map(|(_, c)| c.clone())
            .unwrap_or_else(BigRational::zero)
    }

    /// leading term in lex order
    pub fn leading(&self) -> Option<(&Monomial, &BigRational)> {
        self.terms.iter().next_back()
    }

    fn leading_coefficient(&self) -> BigRational {
        self.leading()
            .map(|(_, c)| c.clone())
            .unwrap_or_else(BigRational::zero)
    }

    pub fn add(&self, other: &Poly) -> Poly {
        let mut out = self.clone();
        for (m, c) in &other.terms {
            out.insert(m.clone(), c.clone());
        }
        out
    }

    pub fn neg(&self) -> Poly {
        self.scale(&-BigRational::one())
    }

    pub fn sub(&self, other: &Poly) -> Poly {
        self.add(&other.neg())
    }

    pub fn mul(&self, other: &Poly) -> Poly {
        let mut out = Poly::zero(&self.gens);
        for ((m1, c1), (m2, c2)) in self.terms.iter().cartesian_product(other.terms.iter()) {
            let m: Monomial = m1.iter().zip(m2.iter()).map(|(a, b)| a + b).collect();
            out.insert(m, c1 * c2);
        }
        out
    }

    pub fn scale(&self, c: &BigRational) -> Poly {
        if c.is_zero() {
            return Poly::zero(&self.gens);
        }
        Poly {
            gens: self.gens.clone(),
            terms: self
                .terms
                .iter()
                .map(|(m, v)| (m.clone(), v * c))
                .collect(),
        }
    }

    pub fn degree_in(&self, i: usize) -> u32 {
        self.terms.keys().map(|m| m[i]).max().unwrap_or(0)
    }

    pub fn total_degree(&self) -> u32 {
        self.terms
            .keys()
            .map(|m| m.iter().sum::<u32>())
            .max()
            .unwrap_or(0)
    }

    /// indices of the generators that actually occur
    fn used_generators(&self) -> Vec<usize> {
        (0..self.gens.len())
            .filter(|i| self.degree_in(*i) > 0)
            .collect()
    }

    /// Rational content, signed like the leading coefficient: gcd of the numerators over
    /// lcm of the denominators.
    pub fn content(&self) -> BigRational {
        let mut num = BigInt::zero();
        let mut den = BigInt::one();
        for c in self.terms.values() {
            num = num.gcd(c.numer());
            den = den.lcm(c.denom());
        }
        if num.is_zero() {
            return BigRational::one();
        }
        let content = BigRational::new(num, den);
        if self.leading_coefficient().is_negative() {
            -content
        } else {
            content
        }
    }

    /// integer coefficients without common divisor, positive leading coefficient
    pub fn primitive(&self) -> Poly {
        self.scale(&self.content().recip())
    }

    /// smallest exponent of every generator over all terms
    pub fn monomial_content(&self) -> Monomial {
        let n = self.gens.len();
        let mut out: Option<Monomial> = None;
        for m in self.terms.keys() {
            out = Some(match out {
                None => m.clone(),
                Some(acc) => acc.iter().zip(m.iter()).map(|(a, b)| *a.min(b)).collect(),
            });
        }
        out.unwrap_or_else(|| vec![0; n])
    }

    fn div_monomial(&self, d: &Monomial) -> Poly {
        Poly {
            gens: self.gens.clone(),
            terms: self
                .terms
                .iter()
                .map(|(m, c)| (m.iter().zip(d.iter()).map(|(a, b)| a - b).collect(), c.clone()))
                .collect(),
        }
    }

    /// coefficients of the powers of generator `i`, each a polynomial free of it
    pub fn coefficients_in(&self, i: usize) -> Vec<Poly> {
        let mut out = vec![Poly::zero(&self.gens); self.degree_in(i) as usize + 1];
        for (m, c) in &self.terms {
            let mut rest = m.clone();
            rest[i] = 0;
            out[m[i] as usize].insert(rest, c.clone());
        }
        out
    }

    fn univariate_coefficients(&self, i: usize) -> Vec<BigRational> {
        self.coefficients_in(i)
            .iter()
            .map(|p| p.constant_value())
            .collect()
    }

    fn from_univariate(gens: &[Expr], i: usize, coeffs: &[BigRational]) -> Poly {
        let mut p = Poly::zero(gens);
        for (k, c) in coeffs.iter().enumerate() {
            let mut m = vec![0; gens.len()];
            m[i] = k as u32;
            p.insert(m, c.clone());
        }
        p
    }

    /// Square root of a perfect square polynomial.
    ///
    /// ## Algorithm
    /// The root of the leading term is the leading term of the root; every further term
    /// `t` is read off the leading term of the remainder `p - r**2`, which is `2*lt(r)*t`.
    pub fn sqrt(&self) -> Option<Poly> {
        let Some((lm, lc)) = self.leading() else {
            return Some(self.clone());
        };
        if lm.iter().any(|k| k % 2 == 1) || lc.is_negative() {
            return None;
        }
        let root_c = rational_sqrt(lc)?;
        let root_m: Monomial = lm.iter().map(|k| k / 2).collect();
        let mut root = Poly::zero(&self.gens);
        root.insert(root_m.clone(), root_c.clone());
        for _ in 0..=self.terms.len() {
            let rem = self.sub(&root.mul(&root));
            let Some((rm, rc)) = rem.leading() else {
                return Some(root);
            };
            if rm.iter().zip(root_m.iter()).any(|(a, b)| a < b) {
                return None;
            }
            let tm: Monomial = rm.iter().zip(root_m.iter()).map(|(a, b)| a - b).collect();
            if tm >= root_m {
                return None;
            }
            let two = BigRational::from_integer(BigInt::from(2));
            let tc = rc / (two * &root_c);
            root.insert(tm, tc);
        }
        None
    }

    //___________________________________FACTORIZATION____________________________________

    /// Factorization `unit * prod(f**k)` with primitive factors of positive leading
    /// coefficient.
    pub fn factor_list(&self) -> (BigRational, Vec<(Poly, u32)>) {
        if self.is_zero() {
            return (BigRational::zero(), Vec::new());
        }
        let mut p = self.primitive();
        let mut factors: Vec<Poly> = Vec::new();
        let mono = p.monomial_content();
        for (i, k) in mono.iter().enumerate() {
            for _ in 0..*k {
                factors.push(Poly::generator(&self.gens, i));
            }
        }
        p = p.div_monomial(&mono);
        if !p.is_constant() {
            factors.extend(p.factor_primitive());
        }
        let mut grouped: Vec<(Poly, u32)> = Vec::new();
        for f in factors {
            match grouped.iter_mut().find(|(g, _)| *g == f) {
                Some(entry) => entry.1 += 1,
                None => grouped.push((f, 1)),
            }
        }
        let product = grouped
            .iter()
            .fold(Poly::constant(&self.gens, BigRational::one()), |acc, (f, k)| {
                (0..*k).fold(acc, |a, _| a.mul(f))
            });
        let unit = self.leading_coefficient() / product.leading_coefficient();
        (unit, grouped)
    }

    fn factor_primitive(&self) -> Vec<Poly> {
        if self.total_degree() <= 1 {
            return vec![self.clone()];
        }
        let used = self.used_generators();
        if used.len() == 1 {
            return self.univariate_factors(used[0]);
        }
        self.quadratic_split(&used)
            .unwrap_or_else(|| vec![self.clone()])
    }

    fn univariate_factors(&self, i: usize) -> Vec<Poly> {
        let mut out = Vec::new();
        let mut rest = self.clone();
        'search: while rest.degree_in(i) >= 2 {
            let coeffs = rest.univariate_coefficients(i);
            let (Some(a0), Some(an)) = (coeffs.first(), coeffs.last()) else {
                break;
            };
            let (Some(ps), Some(qs)) = (divisors(a0.numer()), divisors(an.numer())) else {
                break;
            };
            for q in &qs {
                for p in &ps {
                    for candidate in [p.clone(), -p.clone()] {
                        let r = BigRational::new(candidate, q.clone());
                        if !horner(&coeffs, &r).is_zero() {
                            continue;
                        }
                        let linear = Poly::from_univariate(
                            &self.gens,
                            i,
                            &[
                                BigRational::from_integer(-r.numer().clone()),
                                BigRational::from_integer(r.denom().clone()),
                            ],
                        );
                        out.push(linear);
                        let quotient = synthetic_division(&coeffs, &r);
                        rest = Poly::from_univariate(&self.gens, i, &quotient).primitive();
                        continue 'search;
                    }
                }
            }
            break;
        }
        if !rest.is_constant() {
            out.push(rest);
        }
        out
    }

    fn quadratic_split(&self, used: &[usize]) -> Option<Vec<Poly>> {
        for &i in used {
            if self.degree_in(i) != 2 {
                continue;
            }
            let coeffs = self.coefficients_in(i);
            if !coeffs[2].is_constant() {
                continue;
            }
            let a = coeffs[2].constant_value();
            let four_a = BigRational::from_integer(BigInt::from(4)) * &a;
            let disc = coeffs[1].mul(&coeffs[1]).sub(&coeffs[0].scale(&four_a));
            let Some(s) = disc.sqrt() else {
                continue;
            };
            let inv = (BigRational::from_integer(BigInt::from(2)) * a).recip();
            let x = Poly::generator(&self.gens, i);
            let r1 = coeffs[1].neg().add(&s).scale(&inv);
            let r2 = coeffs[1].neg().sub(&s).scale(&inv);
            return Some(vec![x.sub(&r1).primitive(), x.sub(&r2).primitive()]);
        }
        None
    }
}

fn rational_sqrt(r: &BigRational) -> Option<BigRational> {
    let n = r.numer().sqrt();
    let d = r.denom().sqrt();
    if &(&n * &n) == r.numer() && &(&d * &d) == r.denom() {
        Some(BigRational::new(n, d))
    } else {
        None
    }
}

fn horner(coeffs: &[BigRational], r: &BigRational) -> BigRational {
    coeffs
        .iter()
        .rev()
        .fold(BigRational::zero(), |acc, c| acc * r + c)
}

/// quotient of the division by `x - r`, coefficients in increasing degree
fn synthetic_division(coeffs: &[BigRational], r: &BigRational) -> Vec<BigRational> {
    let n = coeffs.len();
    let mut quotient = vec![BigRational::zero(); n.saturating_sub(1)];
    let mut carry = BigRational::zero();
    for k in (1..n).rev() {
        carry = carry * r + &coeffs[k];
        quotient[k - 1] = carry.clone();
    }
    quotient
}

fn collect_generators(e: &Expr, out: &mut Vec<Expr>) -> Option<()> {
    match e {
        Expr::Num(Number::Rational(_)) => Some(()),
        Expr::Num(Number::Float(_)) => None,
        Expr::Add(v) | Expr::Mul(v) => v.iter().try_for_each(|a| collect_generators(a, out)),
        Expr::Pow(b, exp) => match exp.as_i64() {
            Some(k) if k > 0 => collect_generators(b, out),
            Some(_) => None,
            None => {
                out.push(e.clone());
                Some(())
            }
        },
        _ => {
            out.push(e.clone());
            Some(())
        }
    }
}

fn term_to_monomial(term: &Expr, gens: &[Expr]) -> Option<(Monomial, BigRational)> {
    let (coeff, rest) = term.as_coeff_mul();
    let c = coeff.as_rational()?.clone();
    let mut m = vec![0u32; gens.len()];
    let factors = match rest {
        Expr::Mul(v) => v,
        other if other.is_one() => Vec::new(),
        other => vec![other],
    };
    for f in factors {
        let (base, k) = match &f {
            Expr::Pow(b, exp) => match exp.as_i64() {
                Some(k) if k > 0 => (*b.clone(), k as u32),
                _ => (f.clone(), 1),
            },
            _ => (f.clone(), 1),
        };
        let i = gens.iter().position(|g| *g == base)?;
        m[i] += k;
    }
    Some((m, c))
}

/// factors of a polynomial expression with their multiplicities, None for non-polynomials
fn expr_factor_list(e: &Expr) -> Option<(BigRational, Vec<(Expr, i64)>)> {
    let poly = Poly::from_expr(e)?;
    let (unit, factors) = poly.factor_list();
    Some((
        unit,
        factors
            .into_iter()
            .map(|(f, k)| (f.to_expr(), k as i64))
            .collect(),
    ))
}

/// numerator and denominator factor lists with the common factors removed
fn cancelled_factor_lists(e: &Expr) -> Option<(BigRational, Vec<(Expr, i64)>, Vec<(Expr, i64)>)> {
    let (n, d) = e.as_numer_denom();
    let (un, mut fn_) = expr_factor_list(&n)?;
    let (ud, mut fd) = expr_factor_list(&d)?;
    if ud.is_zero() {
        return None;
    }
    for (g, kd) in fd.iter_mut() {
        if let Some((_, kn)) = fn_.iter_mut().find(|(f, _)| f == g) {
            let common = (*kn).min(*kd);
            *kn -= common;
            *kd -= common;
        }
    }
    fn_.retain(|(_, k)| *k > 0);
    fd.retain(|(_, k)| *k > 0);
    Some((un / ud, fn_, fd))
}

impl Expr {
    /// Factored form over the rationals of a polynomial or rational function.
    ///
    /// Non-polynomial atoms (`sin(x)`, `sqrt(x)`, ...) take part as opaque generators,
    /// expressions with floats are returned unchanged.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let a = Expr::symbol("a");
    /// assert_eq!((a.clone().pow(2) - 1).factor().to_string(), "(a - 1)*(a + 1)");
    /// ```
    pub fn factor(&self) -> Expr {
        if matches!(self, Expr::Num(_) | Expr::Constant(_) | Expr::Var(_)) {
            return self.clone();
        }
        let Some((unit, numer, denom)) = cancelled_factor_lists(self) else {
            return self.clone();
        };
        let mut factors = vec![Expr::Num(Number::Rational(unit))];
        factors.extend(numer.into_iter().map(|(f, k)| Expr::power(f, Expr::int(k))));
        factors.extend(denom.into_iter().map(|(f, k)| Expr::power(f, Expr::int(-k))));
        Expr::mul_unevaluated(factors)
    }

    /// Rational function with common factors of numerator and denominator removed,
    /// both expanded: `(x**2 - 1)/(x - 1) -> x + 1`
    pub fn cancel(&self) -> Expr {
        if matches!(self, Expr::Num(_) | Expr::Constant(_) | Expr::Var(_)) {
            return self.clone();
        }
        let Some((unit, numer, denom)) = cancelled_factor_lists(self) else {
            return self.clone();
        };
        let product = |list: Vec<(Expr, i64)>| {
            Expr::mul_many(
                list.into_iter()
                    .map(|(f, k)| Expr::power(f, Expr::int(k)))
                    .collect(),
            )
            .expand()
        };
        let n = (Expr::Num(Number::Rational(unit)) * product(numer)).expand();
        let d = product(denom);
        if d.is_one() { n } else { n / d }
    }
}
