//! # Symbolic Engine Derivatives Module
//!
//! This module extends the symbolic engine with analytical differentiation.
//!
//! ## Key Methods
//!
//! ### Differentiation
//! - `diff(var: &str)` - analytical partial derivative
//! - `diff_many(vars, evaluate)` - repeated differentiation, or the unevaluated
//!   `Derivative` when `evaluate` is false
//! - `diff_n(var, n)` - higher-order derivatives
//! - `differentiation_variables(..)` - expands `(x, 2, y)` style variable lists
//!
//! ### Numerical Validation
//! - `compare_num1D()` - compares the analytical derivative with central differences
//!
//! ## Interesting Code Features
//!
//! 1. **Recursive Differentiation Rules**: product rule, general power rule and chain rule
//!    with a derivative table for every engine function
//! 2. **Unevaluated fallbacks**: functions without a known derivative (`Mod`, `Min`, ...)
//!    give an unevaluated `Derivative` instead of an error
//! 3. **Integral awareness**: differentiating an indefinite integral with respect to its
//!    own variable gives back the integrand

use crate::symbolic::symbolic_engine::{Expr, Symbol};
use crate::symbolic::symbolic_errors::{AlgebraError, Result};
use crate::symbolic::symbolic_functions::SymFn;
use crate::symbolic::utils::{linspace, numerical_derivative};
use num_traits::Pow;

fn f1(f: SymFn, u: &Expr) -> Expr {
    Expr::func(f, vec![u.clone()])
}

impl Expr {
    /// DIFFERENTIATION

    /// Computes the analytical derivative of the expression with respect to a variable.
    ///
    /// Implements the standard rules:
    /// - Power rule: d/dx(u^n) = n*u^(n-1)*u'
    /// - Exponential rule: d/dx(a^u) = a^u*log(a)*u'
    /// - Product rule: d/dx(f*g) = f'*g + f*g'
    /// - Chain rule: d/dx(f(g(x))) = f'(g(x))*g'(x)
    ///
    /// Symbols are matched by name.
    ///
    /// # Arguments
    /// * `var` - Variable name to differentiate with respect to
    ///
    /// # Returns
    /// New expression representing the derivative
    ///
    /// # Examples
    /// ```rust, ignore
    /// let expr = Expr::parse_expression("x^2 + sin(x)").unwrap();
    /// let derivative = expr.diff("x"); // 2*x + cos(x)
    /// ```
    pub fn diff(&self, var: &str) -> Expr {
        if !self.contains_variable(var) && !matches!(self, Expr::Integral(_, _)) {
            return Expr::zero();
        }
        match self {
            Expr::Num(_) | Expr::Constant(_) => Expr::zero(),
            Expr::Var(s) => {
                if s.name == var {
                    Expr::one()
                } else {
                    Expr::zero()
                }
            }
            Expr::Add(terms) => Expr::add_many(terms.iter().map(|t| t.diff(var)).collect()),
            Expr::Mul(factors) => {
                let mut terms = Vec::with_capacity(factors.len());
                for (i, f) in factors.iter().enumerate() {
                    let df = f.diff(var);
                    if df.is_zero() {
                        continue;
                    }
                    let mut product: Vec<Expr> = factors
                        .iter()
                        .enumerate()
                        .filter(|(j, _)| *j != i)
                        .map(|(_, g)| g.clone())
                        .collect();
                    product.push(df);
                    terms.push(Expr::mul_many(product));
                }
                Expr::add_many(terms)
            }
            Expr::Pow(base, exp) => {
                let base_has = base.contains_variable(var);
                let exp_has = exp.contains_variable(var);
                if !exp_has {
                    // n*u^(n-1)*u'
                    let reduced = Expr::add_many(vec![*exp.clone(), Expr::int(-1)]);
                    Expr::mul_many(vec![
                        *exp.clone(),
                        Expr::power(*base.clone(), reduced),
                        base.diff(var),
                    ])
                } else if !base_has {
                    Expr::mul_many(vec![self.clone(), f1(SymFn::log, base), exp.diff(var)])
                } else {
                    // u^v*(v'*log(u) + v*u'/u)
                    let inner = Expr::add_many(vec![
                        Expr::mul_many(vec![exp.diff(var), f1(SymFn::log, base)]),
                        Expr::mul_many(vec![
                            *exp.clone(),
                            base.diff(var),
                            Expr::power(*base.clone(), Expr::int(-1)),
                        ]),
                    ]);
                    Expr::mul_many(vec![self.clone(), inner])
                }
            }
            Expr::Func(f, args) => match derivative_of_function(*f, args, var) {
                Some(d) => d,
                None => Expr::derivative(self.clone(), vec![Symbol::new(var)]),
            },
            Expr::Derivative(_, _) => Expr::derivative(self.clone(), vec![Symbol::new(var)]),
            Expr::Integral(inner, vars) => {
                if vars.len() == 1 && vars[0].name == var {
                    *inner.clone()
                } else if !inner.contains_variable(var) {
                    Expr::zero()
                } else {
                    Expr::integral(inner.diff(var), vars.clone())
                }
            }
        }
    }

    /// Differentiates with respect to each variable in turn; with `evaluate == false`
    /// builds the unevaluated `Derivative` instead
    pub fn diff_many(&self, vars: &[Symbol], evaluate: bool) -> Expr {
        if !evaluate {
            return Expr::derivative(self.clone(), vars.to_vec());
        }
        vars.iter().fold(self.clone(), |acc, v| acc.diff(&v.name))
    }

    /// n-th derivative with respect to one variable
    pub fn diff_n(&self, var: &str, n: usize) -> Expr {
        (0..n).fold(self.clone(), |acc, _| acc.diff(var))
    }

    /// Expands a differentiation variable list: a positive integer after a symbol repeats
    /// that symbol, `[x, 2, y] -> [x, x, y]`.
    pub fn differentiation_variables(vars: &[Expr]) -> Result<Vec<Symbol>> {
        let mut out: Vec<Symbol> = Vec::new();
        for v in vars {
            match v {
                Expr::Var(s) => out.push(s.clone()),
                Expr::Num(_) => {
                    let n = v.as_i64().filter(|n| *n >= 0).ok_or_else(|| {
                        AlgebraError::ValueError(format!(
                            "differentiation count must be a non-negative integer, got {}",
                            v
                        ))
                    })?;
                    let last = out.pop().ok_or_else(|| {
                        AlgebraError::ValueError(format!(
                            "differentiation count {} must follow a variable",
                            v
                        ))
                    })?;
                    for _ in 0..n {
                        out.push(last.clone());
                    }
                }
                other => {
                    return Err(AlgebraError::ValueError(format!(
                        "cannot differentiate with respect to {}",
                        other
                    )));
                }
            }
        }
        Ok(out)
    }

    /// Compares the analytical derivative with central differences on `[start, end]`.
    ///
    /// # Returns
    /// (root mean square deviation, deviation below `max_norm`)
    pub fn compare_num1D(
        &self,
        var: &str,
        start: f64,
        end: f64,
        num_values: usize,
        max_norm: f64,
    ) -> (f64, bool) {
        let derivative = self.diff(var);
        let domain = linspace(start, end, num_values);
        let analytical: Vec<f64> = domain
            .iter()
            .map(|x| derivative.eval_at(&[(var, *x)]).unwrap_or(f64::NAN))
            .collect();
        let step = (1.0 / 1e4) * (end - start) / (num_values.max(2) as f64 - 1.0);
        let function = |x: f64| self.eval_at(&[(var, x)]).unwrap_or(f64::NAN);
        let numerical = numerical_derivative(function, &domain, step);
        let norma_val = (analytical
            .iter()
            .zip(numerical.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            / domain.len() as f64)
            .sqrt();
        (norma_val, norma_val < max_norm)
    }
}

/// Chain rule for `f(args)`; None when the derivative has no closed form here
fn derivative_of_function(f: SymFn, args: &[Expr], var: &str) -> Option<Expr> {
    if f == SymFn::atan2 {
        let (y, x) = (&args[0], &args[1]);
        let numer = x.clone() * y.diff(var) - y.clone() * x.diff(var);
        let denom = x.clone().pow(2) + y.clone().pow(2);
        return Some(numer / denom);
    }
    if args.len() != 1 {
        return None;
    }
    let u = &args[0];
    let sq = |e: Expr| e.pow(2);
    let outer = match f {
        SymFn::exp => f1(SymFn::exp, u),
        SymFn::log => u.clone().pow(-1),
        SymFn::sin => f1(SymFn::cos, u),
        SymFn::cos => -f1(SymFn::sin, u),
        SymFn::tan => 1 + sq(f1(SymFn::tan, u)),
        SymFn::cot => -1 - sq(f1(SymFn::cot, u)),
        SymFn::sec => f1(SymFn::sec, u) * f1(SymFn::tan, u),
        SymFn::csc => -(f1(SymFn::csc, u) * f1(SymFn::cot, u)),
        SymFn::asin => (1 - sq(u.clone())).pow(Expr::rational(-1, 2)),
        SymFn::acos => -(1 - sq(u.clone())).pow(Expr::rational(-1, 2)),
        SymFn::atan => (1 + sq(u.clone())).pow(-1),
        SymFn::acot => -(1 + sq(u.clone())).pow(-1),
        SymFn::sinh => f1(SymFn::cosh, u),
        SymFn::cosh => f1(SymFn::sinh, u),
        SymFn::tanh => 1 - sq(f1(SymFn::tanh, u)),
        SymFn::coth => 1 - sq(f1(SymFn::coth, u)),
        SymFn::asinh => (sq(u.clone()) + 1).pow(Expr::rational(-1, 2)),
        SymFn::acosh => (sq(u.clone()) - 1).pow(Expr::rational(-1, 2)),
        SymFn::atanh => (1 - sq(u.clone())).pow(-1),
        SymFn::Abs => f1(SymFn::sign, u),
        SymFn::sign => 2 * f1(SymFn::DiracDelta, u),
        SymFn::Heaviside => f1(SymFn::DiracDelta, u),
        SymFn::floor | SymFn::ceiling => Expr::zero(),
        _ => return None,
    };
    Some(outer * u.diff(var))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::symbolic_functions::{cos, exp, log, sin};
    use crate::symbols;

    #[test]
    fn test_polynomial_and_quotient() {
        let (b, c, x) = symbols!(b, c, x);
        assert_eq!(x.clone().pow(3).diff("x"), 3 * x.clone().pow(2));
        assert_eq!((b.clone() / c.clone()).diff("c"), -b.clone() / c.clone().pow(2));
        assert_eq!(
            (b.clone() / c.clone().pow(2)).diff("c"),
            -2 * b.clone() / c.clone().pow(3)
        );
        assert_eq!((b.clone() * x.clone()).diff("x"), b);
        assert_eq!(c.diff("x"), Expr::zero());
    }

    #[test]
    fn test_chain_rule() {
        let x = Expr::symbol("x");
        assert_eq!(sin(2 * x.clone()).diff("x"), 2 * cos(2 * x.clone()));
        assert_eq!(exp(x.clone().pow(2)).diff("x"), 2 * x.clone() * exp(x.clone().pow(2)));
        assert_eq!(log(x.clone()).diff("x"), x.clone().pow(-1));
    }

    #[test]
    fn test_unknown_derivative_stays_unevaluated() {
        let (a, c) = symbols!(a, c);
        let m = a.clone() % c.clone();
        assert_eq!(
            m.diff("c"),
            Expr::derivative(m.clone(), vec![Symbol::new("c")])
        );
        let d = Expr::derivative(m, vec![Symbol::new("c")]);
        assert_eq!(d.diff("c").to_string(), "Derivative(Mod(a, c), (c, 2))");
        let constant = Expr::derivative(a, vec![Symbol::new("c")]);
        assert_eq!(constant.diff("c"), Expr::zero());
    }

    #[test]
    fn test_integral_and_variable_lists() {
        let x = Expr::symbol("x");
        let i = Expr::integral(sin(x.clone()), vec![Symbol::new("x")]);
        assert_eq!(i.diff("x"), sin(x.clone()));
        let vars = Expr::differentiation_variables(&[x.clone(), Expr::int(2)]).unwrap();
        assert_eq!(vars.len(), 2);
        assert_eq!(x.clone().pow(3).diff_many(&vars, true), 6 * x.clone());
        assert!(Expr::differentiation_variables(&[Expr::int(2)]).is_err());
    }

    #[test]
    fn test_compare_with_numerical_derivative() {
        let x = Expr::symbol("x");
        let f = sin(x.clone()) * x.clone().pow(2) + exp(x.clone() / 2);
        let (norm, ok) = f.compare_num1D("x", 0.1, 2.0, 50, 1e-4);
        assert!(ok, "deviation {}", norm);
    }
}
