use crate::symbolic::symbolic_engine::{Expr, Symbol};
use crate::symbolic::symbolic_functions::SymFn;
use num_traits::Pow;

impl Expr {
    /// SYMBOLIC INTEGRATION

    /// Main integration method - integrates with respect to a variable.
    /// Returns the indefinite integral (without constant of integration); integrands
    /// outside the supported rules give the unevaluated `Integral`.
    ///  This module deals with simple integrals.
    pub fn integrate(&self, var: &str) -> Expr {
        let x = Expr::symbol(var);
        // ∫ c dx = c*x
        if !self.contains_variable(var) {
            return self.clone() * x;
        }
        match self {
            // ∫ x dx = x²/2
            Expr::Var(_) => x.pow(2) / 2,

            // ∫ (f + g) dx = ∫ f dx + ∫ g dx
            Expr::Add(terms) => Expr::add_many(terms.iter().map(|t| t.integrate(var)).collect()),

            Expr::Mul(factors) => self.integrate_multiplication(factors, var),

            // ∫ u^n dx for u linear in x, ∫ a^u dx
            Expr::Pow(base, exp) => self.integrate_power(base, exp, var),

            Expr::Func(f, args) if args.len() == 1 => self.integrate_function(*f, &args[0], var),

            // ∫ d/dx f dx = f
            Expr::Derivative(inner, vars) if vars.len() == 1 && vars[0].name == var => {
                *inner.clone()
            }

            _ => self.unevaluated_integral(var),
        }
    }

    /// Integrates with respect to each variable in turn
    pub fn integrate_many(&self, vars: &[Symbol]) -> Expr {
        vars.iter().fold(self.clone(), |acc, v| acc.integrate(&v.name))
    }

    fn unevaluated_integral(&self, var: &str) -> Expr {
        Expr::integral(self.clone(), vec![Symbol::new(var)])
    }

    /// slope `a` when the expression is `a*x + b` with a, b free of x
    fn linear_coefficient(&self, var: &str) -> Option<Expr> {
        let slope = self.diff(var);
        if slope.is_zero() || slope.contains_variable(var) {
            None
        } else {
            Some(slope)
        }
    }

    // ∫ c*f dx = c*∫ f dx, products of several x-dependent factors are expanded first
    fn integrate_multiplication(&self, factors: &[Expr], var: &str) -> Expr {
        let (dependent, constant): (Vec<Expr>, Vec<Expr>) =
            factors.iter().cloned().partition(|f| f.contains_variable(var));
        let constant = Expr::mul_many(constant);
        if dependent.len() == 1 {
            let inner = dependent[0].integrate(var);
            if matches!(inner, Expr::Integral(_, _)) {
                return self.unevaluated_integral(var);
            }
            return constant * inner;
        }
        let product = Expr::mul_many(dependent);
        let expanded = product.expand();
        if expanded != product && !matches!(expanded, Expr::Mul(_)) {
            let inner = expanded.integrate(var);
            if !inner.has_unevaluated_integral() {
                return constant * inner;
            }
        }
        self.unevaluated_integral(var)
    }

    fn integrate_power(&self, base: &Expr, exp: &Expr, var: &str) -> Expr {
        if !exp.contains_variable(var) {
            if let Some(a) = base.linear_coefficient(var) {
                // ∫ (a*x + b)^-1 dx = log(a*x + b)/a
                if *exp == Expr::int(-1) {
                    return Expr::func(SymFn::log, vec![base.clone()]) / a;
                }
                // ∫ (a*x + b)^n dx = (a*x + b)^(n+1)/((n+1)*a)
                let raised = exp.clone() + 1;
                return Expr::power(base.clone(), raised.clone()) / (raised * a);
            }
            if let (Expr::Add(_), Some(n)) = (base, exp.as_i64()) {
                if n >= 2 {
                    let expanded = self.expand();
                    if expanded != *self {
                        return expanded.integrate(var);
                    }
                }
            }
            return self.unevaluated_integral(var);
        }
        // ∫ c^(a*x + b) dx = c^(a*x + b)/(a*log(c))
        if !base.contains_variable(var) {
            if let Some(a) = exp.linear_coefficient(var) {
                return self.clone() / (a * Expr::func(SymFn::log, vec![base.clone()]));
            }
        }
        self.unevaluated_integral(var)
    }

    fn integrate_function(&self, f: SymFn, u: &Expr, var: &str) -> Expr {
        let Some(a) = u.linear_coefficient(var) else {
            return self.unevaluated_integral(var);
        };
        let g = |h: SymFn| Expr::func(h, vec![u.clone()]);
        let antiderivative = match f {
            SymFn::exp => g(SymFn::exp),
            SymFn::sin => -g(SymFn::cos),
            SymFn::cos => g(SymFn::sin),
            SymFn::tan => -Expr::func(SymFn::log, vec![g(SymFn::cos)]),
            SymFn::sinh => g(SymFn::cosh),
            SymFn::cosh => g(SymFn::sinh),
            // ∫ log(u) dx = (u*log(u) - u)/a
            SymFn::log => u.clone() * g(SymFn::log) - u.clone(),
            _ => return self.unevaluated_integral(var),
        };
        antiderivative / a
    }

    /// true when an unevaluated `Integral` occurs anywhere in the tree
    pub fn has_unevaluated_integral(&self) -> bool {
        matches!(self, Expr::Integral(_, _))
            || self.args().iter().any(|a| a.has_unevaluated_integral())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::symbolic_functions::{cos, exp, log, sin};
    use crate::symbols;

    #[test]
    fn test_power_rule_and_linearity() {
        let (a, x) = symbols!(a, x);
        assert_eq!(x.integrate("x"), x.clone().pow(2) / 2);
        assert_eq!(a.integrate("x"), a.clone() * x.clone());
        assert_eq!(
            (3 * x.clone().pow(2) + a.clone()).integrate("x"),
            x.clone().pow(3) + a.clone() * x.clone()
        );
        assert_eq!(x.clone().pow(-1).integrate("x"), log(x.clone()));
    }

    #[test]
    fn test_linear_arguments() {
        let x = Expr::symbol("x");
        assert_eq!(exp(2 * x.clone()).integrate("x"), exp(2 * x.clone()) / 2);
        assert_eq!(sin(x.clone()).integrate("x"), -cos(x.clone()));
        assert_eq!(
            (2 * x.clone() + 1).pow(-1).integrate("x"),
            log(2 * x.clone() + 1) / 2
        );
    }

    #[test]
    fn test_unsupported_integrand_is_unevaluated() {
        let x = Expr::symbol("x");
        let f = sin(x.clone().pow(2));
        assert_eq!(
            f.integrate("x"),
            Expr::integral(f.clone(), vec![Symbol::new("x")])
        );
        assert!(f.integrate("x").has_unevaluated_integral());
    }

    #[test]
    fn test_integral_then_derivative() {
        let x = Expr::symbol("x");
        let f = x.clone() * (x.clone() + 1);
        let antiderivative = f.integrate("x");
        assert!(!antiderivative.has_unevaluated_integral());
        assert_eq!(antiderivative.diff("x").expand(), f.expand());
    }
}
