//! # Symbolic Engine Module
//!
//! This module provides the expression tree every other part of the crate works on:
//! both sides of an `Equation`, the arguments of the Equation-aware functions, the
//! results of `solve` and the targets of `subs`.
//!
//! ## Purpose
//!
//! The symbolic engine allows users to:
//! - Create symbols and build expressions with ordinary Rust operators
//! - Keep every expression in a canonical, auto-evaluated form so that `==` compares
//!   mathematical structure (`(b/c)*c == b`, `x/x == 1`, `x + x == 2*x`)
//! - Substitute sub-expressions one by one or simultaneously
//! - Walk the tree (free symbols, operation count, argument rebuild)
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! - **Atoms**: `Num` (exact rational or float), `Constant` (pi, E), `Var` (symbol)
//! - **Operations**: `Add`, `Mul` (n-ary, flattened and sorted), `Pow`
//! - **Functions**: `Func(SymFn, args)` - sin, log, Abs, Mod, Heaviside, ...
//! - **Calculus**: unevaluated `Derivative` and `Integral`
//!
//! There is no subtraction or division node: `a - b` is `a + (-1)*b` and `a/b` is
//! `a*b**(-1)`, the way the printers and the algebra routines expect.
//!
//! ### Key Methods
//! - `Symbols(symbols: &str)` - create multiple variables from a comma-separated string
//! - `add_many`, `mul_many`, `power`, `func` - canonical constructors
//! - `subs_one`, `subs_pairs` - substitution
//! - `free_symbols`, `count_ops`, `is_number` - introspection
//!
//! ## Interesting Code Features
//!
//! 1. **Canonical constructors**: like terms and like bases are combined on
//!    construction, numeric parts are folded exactly
//! 2. **Operator overloading**: `std::ops` traits for `Expr`, `&Expr` and plain numbers in
//!    both operand orders, `num_traits::Pow` for powers, `%` builds `Mod`
//! 3. **Subset substitution**: `(a + b + c).subs_one(a + b, d)` gives `c + d`

#![allow(non_camel_case_types)]

use crate::symbolic::numbers::Number;
use crate::symbolic::symbolic_functions::{SymFn, eval_func};
use crate::symbolic::utils::extract_perfect_power;
use num::{BigInt, BigRational, One, Signed, ToPrimitive, Zero};
use num_traits::Pow;
use std::collections::{BTreeMap, BTreeSet};

/// Named mathematical constants
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MathConst {
    Pi,
    E,
}

impl MathConst {
    pub fn value(&self) -> f64 {
        match self {
            MathConst::Pi => std::f64::consts::PI,
            MathConst::E => std::f64::consts::E,
        }
    }
}

/// A symbol: a name plus the positivity assumption
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol {
    pub name: String,
    pub positive: bool,
}

impl Symbol {
    pub fn new(name: &str) -> Self {
        Symbol {
            name: name.to_string(),
            positive: false,
        }
    }

    /// symbol assumed to be strictly positive (used for physical units)
    pub fn positive(name: &str) -> Self {
        Symbol {
            name: name.to_string(),
            positive: true,
        }
    }
}

/// Core symbolic expression, always held in canonical form.
///
/// The variant order is part of the canonical ordering of `Add` terms and `Mul` factors
/// (numbers first), so new variants must go at the end.
///
/// # Examples
/// ```rust, ignore
/// use RustedAlgebra::symbolic::symbolic_engine::Expr;
/// let (a, b, c) = symbols!(a, b, c);
/// let expr = a.clone() * c.clone() + b / c;
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Expr {
    /// Exact rational or float number
    Num(Number),
    /// pi or E
    Constant(MathConst),
    /// Symbolic variable
    Var(Symbol),
    /// base ** exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Product of two or more factors, numeric coefficient first
    Mul(Vec<Expr>),
    /// Sum of two or more terms
    Add(Vec<Expr>),
    /// Named function applied to its arguments
    Func(SymFn, Vec<Expr>),
    /// Unevaluated derivative of an expression with respect to the listed symbols
    Derivative(Box<Expr>, Vec<Symbol>),
    /// Unevaluated indefinite integral with respect to the listed symbols
    Integral(Box<Expr>, Vec<Symbol>),
}

impl Expr {
    /// BASIC FEATURES

    /// Creates multiple symbolic variables from a comma-separated string.
    ///
    /// # Arguments
    /// * `symbols` - Comma-separated string of variable names (e.g., "x, y, z")
    ///
    /// # Returns
    /// Vector of Expr::Var instances for each variable name
    ///
    /// # Examples
    /// ```rust, ignore
    /// let vars = Expr::Symbols("x, y, z");
    /// assert_eq!(vars.len(), 3);
    /// ```
    pub fn Symbols(symbols: &str) -> Vec<Expr> {
        symbols
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(Expr::symbol)
            .collect()
    }

    pub fn symbol(name: &str) -> Expr {
        Expr::Var(Symbol::new(name))
    }

    pub fn positive_symbol(name: &str) -> Expr {
        Expr::Var(Symbol::positive(name))
    }

    pub fn int(n: i64) -> Expr {
        Expr::Num(Number::int(n))
    }

    pub fn float(f: f64) -> Expr {
        Expr::Num(Number::float(f))
    }

    /// exact p/q; a zero denominator leaves the unevaluated `p*0**(-1)`
    pub fn rational(p: i64, q: i64) -> Expr {
        match Number::rational(p, q) {
            Some(n) => Expr::Num(n),
            None => Expr::mul_many(vec![Expr::int(p), Expr::power(Expr::int(q), Expr::int(-1))]),
        }
    }

    pub fn zero() -> Expr {
        Expr::int(0)
    }

    pub fn one() -> Expr {
        Expr::int(1)
    }

    pub fn pi() -> Expr {
        Expr::Constant(MathConst::Pi)
    }

    pub fn E() -> Expr {
        Expr::Constant(MathConst::E)
    }

    /// Convenience method to wrap expression in Box for recursive structures.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Num(n) if n.is_zero())
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Num(n) if n.is_one())
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Expr::Num(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Expr::Var(s) => Some(s),
            _ => None,
        }
    }

    /// exact integer value of a numeric atom
    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(|n| n.as_i64())
    }

    fn is_integer_number(&self) -> bool {
        matches!(self, Expr::Num(n) if n.is_integer())
    }

    //___________________________________CANONICAL CONSTRUCTORS____________________________________

    /// Splits a term into its numeric coefficient and the remaining factor: `3*x*y -> (3, x*y)`
    pub fn as_coeff_mul(&self) -> (Number, Expr) {
        match self {
            Expr::Num(n) => (n.clone(), Expr::one()),
            Expr::Mul(factors) => match factors.split_first() {
                Some((Expr::Num(n), rest)) => {
                    let rest = if rest.len() == 1 {
                        rest[0].clone()
                    } else {
                        Expr::Mul(rest.to_vec())
                    };
                    (n.clone(), rest)
                }
                _ => (Number::one(), self.clone()),
            },
            _ => (Number::one(), self.clone()),
        }
    }

    /// Base and exponent of a factor: `x**2 -> (x, 2)`, `exp(a) -> (E, a)`, `x -> (x, 1)`
    pub fn as_base_exp(&self) -> (Expr, Expr) {
        match self {
            Expr::Pow(b, e) => (*b.clone(), *e.clone()),
            Expr::Func(SymFn::exp, args) if args.len() == 1 => (Expr::E(), args[0].clone()),
            _ => (self.clone(), Expr::one()),
        }
    }

    /// Canonical sum: flattens nested sums, folds numbers, combines like terms
    /// (`2*x + 3*x -> 5*x`) and drops zero terms.
    pub fn add_many(terms: Vec<Expr>) -> Expr {
        let mut constant = Number::zero();
        let mut collected: BTreeMap<Expr, Number> = BTreeMap::new();
        let mut stack = terms;
        while let Some(term) = stack.pop() {
            match term {
                Expr::Num(n) => constant = constant.add(&n),
                Expr::Add(inner) => stack.extend(inner),
                other => {
                    let (c, t) = other.as_coeff_mul();
                    let entry = collected.entry(t).or_insert_with(Number::zero);
                    *entry = entry.add(&c);
                }
            }
        }
        let mut out: Vec<Expr> = collected
            .into_iter()
            .filter(|(_, c)| !c.is_zero())
            .map(|(t, c)| Expr::with_coeff(c, t))
            .collect();
        if out.is_empty() {
            return Expr::Num(constant);
        }
        if !constant.is_zero() {
            out.push(Expr::Num(constant));
        }
        if out.len() == 1 {
            return out.remove(0);
        }
        out.sort();
        Expr::Add(out)
    }

    /// c*t without distributing over a sum
    fn with_coeff(c: Number, t: Expr) -> Expr {
        if c.is_one() {
            return t;
        }
        if t.is_one() {
            return Expr::Num(c);
        }
        match t {
            Expr::Mul(mut factors) => {
                factors.insert(0, Expr::Num(c));
                Expr::Mul(factors)
            }
            other => Expr::Mul(vec![Expr::Num(c), other]),
        }
    }

    /// Canonical product: flattens nested products, folds the numeric coefficient,
    /// combines like bases by adding exponents (`x*x**2 -> x**3`, `(b/c)*c -> b`) and
    /// distributes a numeric coefficient over a single sum (`2*(x + 1) -> 2*x + 2`).
    pub fn mul_many(factors: Vec<Expr>) -> Expr {
        Expr::mul_canonical(factors, true)
    }

    fn mul_canonical(factors: Vec<Expr>, renormalize: bool) -> Expr {
        let mut coeff = Number::one();
        let mut bases: BTreeMap<Expr, Vec<Expr>> = BTreeMap::new();
        let mut stack = factors;
        while let Some(f) = stack.pop() {
            match f {
                Expr::Num(n) => coeff = coeff.mul(&n),
                Expr::Mul(inner) => stack.extend(inner),
                other => {
                    let (b, e) = other.as_base_exp();
                    bases.entry(b).or_default().push(e);
                }
            }
        }
        if coeff.is_zero() {
            return Expr::Num(coeff);
        }
        let mut rest: Vec<Expr> = Vec::new();
        let mut split_products = false;
        for (base, mut exps) in bases {
            let exp = if exps.len() == 1 {
                exps.remove(0)
            } else {
                Expr::add_many(exps)
            };
            match Expr::power(base, exp) {
                Expr::Num(n) => coeff = coeff.mul(&n),
                Expr::Mul(inner) => {
                    split_products = true;
                    for g in inner {
                        match g {
                            Expr::Num(n) => coeff = coeff.mul(&n),
                            other => rest.push(other),
                        }
                    }
                }
                other => rest.push(other),
            }
        }
        if split_products && renormalize {
            rest.push(Expr::Num(coeff));
            return Expr::mul_canonical(rest, false);
        }
        if rest.is_empty() {
            return Expr::Num(coeff);
        }
        if rest.len() == 1 && !coeff.is_one() {
            if let Expr::Add(terms) = &rest[0] {
                let distributed = terms
                    .iter()
                    .map(|t| Expr::mul_many(vec![Expr::Num(coeff.clone()), t.clone()]))
                    .collect();
                return Expr::add_many(distributed);
            }
        }
        rest.sort();
        if coeff.is_one() {
            if rest.len() == 1 {
                return rest.remove(0);
            }
            return Expr::Mul(rest);
        }
        rest.insert(0, Expr::Num(coeff));
        Expr::Mul(rest)
    }

    /// Product kept exactly as given (sorted, coefficient first), used for factored forms
    /// such as `2*(x + 1)` that the canonical product would distribute.
    pub fn mul_unevaluated(factors: Vec<Expr>) -> Expr {
        let mut coeff = Number::one();
        let mut rest = Vec::new();
        for f in factors {
            match f {
                Expr::Num(n) => coeff = coeff.mul(&n),
                Expr::Mul(inner) => {
                    for g in inner {
                        match g {
                            Expr::Num(n) => coeff = coeff.mul(&n),
                            other => rest.push(other),
                        }
                    }
                }
                other => rest.push(other),
            }
        }
        if coeff.is_zero() || rest.is_empty() {
            return Expr::Num(coeff);
        }
        rest.sort();
        if coeff.is_one() && rest.len() == 1 {
            return rest.remove(0);
        }
        if !coeff.is_one() {
            rest.insert(0, Expr::Num(coeff));
        }
        Expr::Mul(rest)
    }

    /// Canonical power.
    ///
    /// Folds numeric powers exactly (`4**(1/2) -> 2`, `8**(1/2) -> 2*sqrt(2)`), merges
    /// nested powers when it is safe (`(x**2)**3 -> x**6`), distributes integer powers
    /// over products and turns `E**x` into `exp(x)`.
    pub fn power(base: Expr, exp: Expr) -> Expr {
        if let Expr::Num(n) = &exp {
            if n.is_zero() {
                return Expr::one();
            }
            if n.is_one() {
                return base;
            }
        }
        if base.is_one() {
            return Expr::one();
        }
        match (&base, &exp) {
            (Expr::Num(b), Expr::Num(e)) => Expr::power_numbers(b, e),
            (Expr::Constant(MathConst::E), _) => Expr::func(SymFn::exp, vec![exp.clone()]),
            (Expr::Pow(b1, e1), _) if exp.is_integer_number() || b1.is_positive() => {
                let merged = Expr::mul_many(vec![*e1.clone(), exp.clone()]);
                Expr::power(*b1.clone(), merged)
            }
            (Expr::Func(SymFn::exp, args), Expr::Num(_)) if args.len() == 1 => {
                Expr::func(SymFn::exp, vec![Expr::mul_many(vec![args[0].clone(), exp.clone()])])
            }
            (Expr::Mul(factors), _) if exp.is_integer_number() => Expr::mul_many(
                factors
                    .iter()
                    .map(|f| Expr::power(f.clone(), exp.clone()))
                    .collect(),
            ),
            (Expr::Mul(factors), _) => {
                let (positive, rest): (Vec<Expr>, Vec<Expr>) =
                    factors.iter().cloned().partition(|f| f.is_positive());
                if positive.is_empty() {
                    return Expr::Pow(base.clone().boxed(), exp.clone().boxed());
                }
                let mut out: Vec<Expr> = positive
                    .into_iter()
                    .map(|f| Expr::power(f, exp.clone()))
                    .collect();
                out.push(Expr::power(Expr::mul_many(rest), exp.clone()));
                Expr::mul_many(out)
            }
            _ => Expr::Pow(base.clone().boxed(), exp.clone().boxed()),
        }
    }

    fn power_numbers(b: &Number, e: &Number) -> Expr {
        if let Some(r) = b.pow(e) {
            return Expr::Num(r);
        }
        if let (Number::Rational(br), Number::Rational(er)) = (b, e) {
            // (-n)**e -> (-1)**e * n**e
            if br.is_negative() && br.is_integer() && !er.is_integer() {
                let magnitude = Number::Rational(-br.clone());
                if !magnitude.is_one() {
                    return Expr::mul_many(vec![
                        Expr::Pow(Expr::int(-1).boxed(), Expr::Num(e.clone()).boxed()),
                        Expr::power_numbers(&magnitude, e),
                    ]);
                }
            }
            if br.is_positive() && br.is_integer() && !er.is_integer() {
                let whole = er.floor();
                let frac: BigRational = er - &whole;
                if let (Some(q), Some(s)) = (frac.denom().to_u32(), frac.numer().to_usize()) {
                    let inside = num::pow(br.numer().clone(), s);
                    let (outside, remaining) = extract_perfect_power(&inside, q);
                    if !outside.is_one() || !whole.is_zero() {
                        if let Some(w) = b.pow(&Number::Rational(whole)) {
                            let coeff = w.mul(&Number::from_bigint(outside));
                            let root = if remaining.is_one() {
                                Expr::one()
                            } else {
                                Expr::Pow(
                                    Expr::Num(Number::from_bigint(remaining)).boxed(),
                                    Expr::Num(Number::Rational(BigRational::new(
                                        BigInt::from(1),
                                        BigInt::from(q),
                                    )))
                                    .boxed(),
                                )
                            };
                            return Expr::mul_unevaluated(vec![Expr::Num(coeff), root]);
                        }
                    }
                }
            }
        }
        Expr::Pow(Expr::Num(b.clone()).boxed(), Expr::Num(e.clone()).boxed())
    }

    /// Function application with automatic evaluation (`sin(0) -> 0`, `exp(log(x)) -> x`)
    pub fn func(f: SymFn, args: Vec<Expr>) -> Expr {
        match eval_func(f, &args) {
            Some(evaluated) => evaluated,
            None => Expr::Func(f, args),
        }
    }

    /// Unevaluated derivative; nested derivatives merge their variable lists
    pub fn derivative(expr: Expr, vars: Vec<Symbol>) -> Expr {
        if vars.is_empty() {
            return expr;
        }
        match expr {
            Expr::Derivative(inner, mut inner_vars) => {
                inner_vars.extend(vars);
                Expr::Derivative(inner, inner_vars)
            }
            other => Expr::Derivative(other.boxed(), vars),
        }
    }

    /// Unevaluated integral
    pub fn integral(expr: Expr, vars: Vec<Symbol>) -> Expr {
        if vars.is_empty() {
            return expr;
        }
        Expr::Integral(expr.boxed(), vars)
    }

    //___________________________________TRAVERSAL____________________________________

    /// Direct sub-expressions of the node
    pub fn args(&self) -> Vec<Expr> {
        match self {
            Expr::Num(_) | Expr::Constant(_) | Expr::Var(_) => Vec::new(),
            Expr::Pow(b, e) => vec![*b.clone(), *e.clone()],
            Expr::Mul(v) | Expr::Add(v) | Expr::Func(_, v) => v.clone(),
            Expr::Derivative(inner, _) | Expr::Integral(inner, _) => vec![*inner.clone()],
        }
    }

    /// Rebuilds the node from new arguments through the canonical constructors
    pub fn rebuild(&self, args: Vec<Expr>) -> Expr {
        let mut args = args;
        match self {
            Expr::Num(_) | Expr::Constant(_) | Expr::Var(_) => self.clone(),
            Expr::Pow(_, _) => {
                let e = args.pop().unwrap_or_else(Expr::one);
                let b = args.pop().unwrap_or_else(Expr::one);
                Expr::power(b, e)
            }
            Expr::Mul(_) => Expr::mul_many(args),
            Expr::Add(_) => Expr::add_many(args),
            Expr::Func(f, _) => Expr::func(*f, args),
            Expr::Derivative(_, vars) => {
                Expr::derivative(args.pop().unwrap_or_else(Expr::zero), vars.clone())
            }
            Expr::Integral(_, vars) => {
                Expr::integral(args.pop().unwrap_or_else(Expr::zero), vars.clone())
            }
        }
    }

    /// Applies `f` to every direct argument and rebuilds
    pub fn map_args(&self, f: impl Fn(&Expr) -> Expr) -> Expr {
        match self {
            Expr::Num(_) | Expr::Constant(_) | Expr::Var(_) => self.clone(),
            _ => self.rebuild(self.args().iter().map(f).collect()),
        }
    }

    /// Set of free symbols. The variables of an indefinite integral stay free, a derivative
    /// contributes only the symbols of the differentiated expression.
    pub fn free_symbols(&self) -> BTreeSet<Symbol> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut BTreeSet<Symbol>) {
        match self {
            Expr::Var(s) => {
                out.insert(s.clone());
            }
            Expr::Derivative(inner, _) => inner.collect_symbols(out),
            Expr::Integral(inner, vars) => {
                inner.collect_symbols(out);
                out.extend(vars.iter().cloned());
            }
            _ => {
                for a in self.args() {
                    a.collect_symbols(out);
                }
            }
        }
    }

    /// check if the expression contains a variable
    pub fn contains_variable(&self, var_name: &str) -> bool {
        self.free_symbols().iter().any(|s| s.name == var_name)
    }

    /// check if `pattern` occurs anywhere in the tree
    pub fn has(&self, pattern: &Expr) -> bool {
        self == pattern || self.args().iter().any(|a| a.has(pattern))
    }

    pub fn is_number(&self) -> bool {
        self.free_symbols().is_empty()
    }

    /// Number of operations in the tree, the complexity measure used by `simplify`
    /// and for ordering substitution maps
    pub fn count_ops(&self) -> usize {
        match self {
            Expr::Num(n) => usize::from(n.is_negative()),
            Expr::Constant(_) | Expr::Var(_) => 0,
            Expr::Pow(b, e) => 1 + b.count_ops() + e.count_ops(),
            Expr::Mul(v) | Expr::Add(v) => {
                v.len().saturating_sub(1) + v.iter().map(|a| a.count_ops()).sum::<usize>()
            }
            Expr::Func(_, v) => 1 + v.iter().map(|a| a.count_ops()).sum::<usize>(),
            Expr::Derivative(inner, vars) | Expr::Integral(inner, vars) => {
                vars.len() + inner.count_ops()
            }
        }
    }

    /// Sign information available without knowing symbol values
    pub fn is_positive(&self) -> bool {
        match self {
            Expr::Num(n) => n.is_positive(),
            Expr::Constant(_) => true,
            Expr::Var(s) => s.positive,
            Expr::Pow(b, e) => b.is_positive() && (e.as_number().is_some() || e.is_positive()),
            Expr::Mul(v) | Expr::Add(v) => v.iter().all(|a| a.is_positive()),
            Expr::Func(SymFn::exp, v) => v.iter().all(|a| a.as_number().is_some() || a.is_positive()),
            _ => false,
        }
    }

    /// true for a product with a negative numeric coefficient or a negative number
    pub fn could_extract_minus_sign(&self) -> bool {
        match self {
            Expr::Num(n) => n.is_negative(),
            Expr::Mul(v) => matches!(v.first(), Some(Expr::Num(n)) if n.is_negative()),
            _ => false,
        }
    }

    //___________________________________SUBSTITUTION____________________________________

    /// Replaces every occurrence of `old` by `new` and re-evaluates.
    ///
    /// Besides exact matches, a sum (product) target also matches a subset of the terms
    /// (factors) of a larger sum (product): `(x + a + b).subs_one(x + a, 4) == b + 4`.
    pub fn subs_one(&self, old: &Expr, new: &Expr) -> Expr {
        if self == old {
            return new.clone();
        }
        match (self, old) {
            (Expr::Num(_) | Expr::Constant(_), _) => self.clone(),
            (Expr::Add(terms), Expr::Add(targets)) | (Expr::Mul(terms), Expr::Mul(targets)) => {
                if let Some(remaining) = take_subset(terms, targets) {
                    let mut rebuilt: Vec<Expr> =
                        remaining.iter().map(|t| t.subs_one(old, new)).collect();
                    rebuilt.push(new.clone());
                    return self.rebuild(rebuilt);
                }
                self.map_args(|a| a.subs_one(old, new))
            }
            (Expr::Derivative(inner, vars), Expr::Var(s)) | (Expr::Integral(inner, vars), Expr::Var(s))
                if vars.contains(s) =>
            {
                // the variable is bound: only a symbol replacement renames it
                match new {
                    Expr::Var(ns) => {
                        let vars = vars
                            .iter()
                            .map(|v| if v == s { ns.clone() } else { v.clone() })
                            .collect();
                        let inner = inner.subs_one(old, new);
                        match self {
                            Expr::Derivative(_, _) => Expr::derivative(inner, vars),
                            _ => Expr::integral(inner, vars),
                        }
                    }
                    _ => self.clone(),
                }
            }
            _ => self.map_args(|a| a.subs_one(old, new)),
        }
    }

    /// Applies substitution pairs in order, each one seeing the result of the previous.
    /// With `simultaneous` the replacements go through placeholder symbols first so that
    /// no replacement is rewritten by a later pair.
    pub fn subs_pairs(&self, pairs: &[(Expr, Expr)], simultaneous: bool) -> Expr {
        if !simultaneous {
            return pairs
                .iter()
                .fold(self.clone(), |acc, (old, new)| acc.subs_one(old, new));
        }
        let dummies: Vec<Expr> = (0..pairs.len())
            .map(|i| Expr::symbol(&format!("_Dummy_{}", i)))
            .collect();
        let masked = pairs
            .iter()
            .zip(dummies.iter())
            .fold(self.clone(), |acc, ((old, _), dummy)| acc.subs_one(old, dummy));
        pairs
            .iter()
            .zip(dummies.iter())
            .fold(masked, |acc, ((_, new), dummy)| acc.subs_one(dummy, new))
    }

    /// Orders a substitution map the way unordered maps are applied: the most complex
    /// targets first, so `x + a` is replaced before `a`.
    pub fn sort_substitution_map(map: &BTreeMap<Expr, Expr>) -> Vec<(Expr, Expr)> {
        let mut pairs: Vec<(Expr, Expr)> =
            map.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        pairs.sort_by(|(k1, _), (k2, _)| {
            k2.count_ops()
                .cmp(&k1.count_ops())
                .then_with(|| k1.cmp(k2))
        });
        pairs
    }

    /// Substitutes numbers for symbols by name
    pub fn set_variable_from_map(&self, var_map: &BTreeMap<String, f64>) -> Expr {
        match self {
            Expr::Var(s) => match var_map.get(&s.name) {
                Some(v) => Expr::float(*v),
                None => self.clone(),
            },
            _ => self.map_args(|a| a.set_variable_from_map(var_map)),
        }
    }
}

/// Multiset difference `terms - targets` when every target occurs in `terms`
fn take_subset(terms: &[Expr], targets: &[Expr]) -> Option<Vec<Expr>> {
    if targets.len() >= terms.len() {
        return None;
    }
    let mut remaining = terms.to_vec();
    for t in targets {
        let pos = remaining.iter().position(|r| r == t)?;
        remaining.remove(pos);
    }
    Some(remaining)
}

//___________________________________CONVERSIONS____________________________________

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        Expr::int(n)
    }
}

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        Expr::int(n as i64)
    }
}

impl From<f64> for Expr {
    fn from(f: f64) -> Self {
        Expr::float(f)
    }
}

impl From<Number> for Expr {
    fn from(n: Number) -> Self {
        Expr::Num(n)
    }
}

impl From<BigRational> for Expr {
    fn from(r: BigRational) -> Self {
        Expr::Num(Number::Rational(r))
    }
}

impl From<Symbol> for Expr {
    fn from(s: Symbol) -> Self {
        Expr::Var(s)
    }
}

impl From<&Expr> for Expr {
    fn from(e: &Expr) -> Self {
        e.clone()
    }
}

//___________________________________OPERATORS____________________________________

fn build_add(a: Expr, b: Expr) -> Expr {
    Expr::add_many(vec![a, b])
}

fn build_sub(a: Expr, b: Expr) -> Expr {
    Expr::add_many(vec![a, Expr::mul_many(vec![Expr::int(-1), b])])
}

fn build_mul(a: Expr, b: Expr) -> Expr {
    Expr::mul_many(vec![a, b])
}

fn build_div(a: Expr, b: Expr) -> Expr {
    Expr::mul_many(vec![a, Expr::power(b, Expr::int(-1))])
}

fn build_rem(a: Expr, b: Expr) -> Expr {
    Expr::func(SymFn::Mod, vec![a, b])
}

macro_rules! impl_expr_binop {
    ($trait:ident, $method:ident, $build:ident) => {
        impl std::ops::$trait<Expr> for Expr {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                $build(self, rhs)
            }
        }
        impl std::ops::$trait<&Expr> for Expr {
            type Output = Expr;
            fn $method(self, rhs: &Expr) -> Expr {
                $build(self, rhs.clone())
            }
        }
        impl std::ops::$trait<Expr> for &Expr {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                $build(self.clone(), rhs)
            }
        }
        impl std::ops::$trait<&Expr> for &Expr {
            type Output = Expr;
            fn $method(self, rhs: &Expr) -> Expr {
                $build(self.clone(), rhs.clone())
            }
        }
        impl_expr_binop!(@scalar $trait, $method, $build, i64);
        impl_expr_binop!(@scalar $trait, $method, $build, f64);
    };
    (@scalar $trait:ident, $method:ident, $build:ident, $t:ty) => {
        impl std::ops::$trait<$t> for Expr {
            type Output = Expr;
            fn $method(self, rhs: $t) -> Expr {
                $build(self, Expr::from(rhs))
            }
        }
        impl std::ops::$trait<$t> for &Expr {
            type Output = Expr;
            fn $method(self, rhs: $t) -> Expr {
                $build(self.clone(), Expr::from(rhs))
            }
        }
        impl std::ops::$trait<Expr> for $t {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                $build(Expr::from(self), rhs)
            }
        }
        impl std::ops::$trait<&Expr> for $t {
            type Output = Expr;
            fn $method(self, rhs: &Expr) -> Expr {
                $build(Expr::from(self), rhs.clone())
            }
        }
    };
}

impl_expr_binop!(Add, add, build_add);
impl_expr_binop!(Sub, sub, build_sub);
impl_expr_binop!(Mul, mul, build_mul);
impl_expr_binop!(Div, div, build_div);
impl_expr_binop!(Rem, rem, build_rem);

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::mul_many(vec![Expr::int(-1), self])
    }
}

impl std::ops::Neg for &Expr {
    type Output = Expr;

    fn neg(self) -> Self::Output {
        Expr::mul_many(vec![Expr::int(-1), self.clone()])
    }
}

impl std::ops::AddAssign for Expr {
    fn add_assign(&mut self, rhs: Self) {
        *self = build_add(self.clone(), rhs);
    }
}

impl std::ops::SubAssign for Expr {
    fn sub_assign(&mut self, rhs: Self) {
        *self = build_sub(self.clone(), rhs);
    }
}

impl std::ops::MulAssign for Expr {
    fn mul_assign(&mut self, rhs: Self) {
        *self = build_mul(self.clone(), rhs);
    }
}

impl std::ops::DivAssign for Expr {
    fn div_assign(&mut self, rhs: Self) {
        *self = build_div(self.clone(), rhs);
    }
}

macro_rules! impl_expr_pow {
    ($($t:ty),*) => {
        $(
            impl Pow<$t> for Expr {
                type Output = Expr;
                fn pow(self, rhs: $t) -> Expr {
                    Expr::power(self, Expr::from(rhs))
                }
            }
            impl Pow<$t> for &Expr {
                type Output = Expr;
                fn pow(self, rhs: $t) -> Expr {
                    Expr::power(self.clone(), Expr::from(rhs))
                }
            }
        )*
    };
}

impl_expr_pow!(i64, f64, Expr);

impl Pow<&Expr> for Expr {
    type Output = Expr;
    fn pow(self, rhs: &Expr) -> Expr {
        Expr::power(self, rhs.clone())
    }
}

impl Pow<&Expr> for &Expr {
    type Output = Expr;
    fn pow(self, rhs: &Expr) -> Expr {
        Expr::power(self.clone(), rhs.clone())
    }
}

/// Declares symbols with the same names as the bindings
///
/// # Examples
/// ```rust, ignore
/// let (x, y) = symbols!(x, y);
/// ```
#[macro_export]
macro_rules! symbols {
    ($($var:ident),+ $(,)?) => {
        {
            ($(
                $crate::symbolic::symbolic_engine::Expr::symbol(stringify!($var))
            ),+)
        }
    };
}
