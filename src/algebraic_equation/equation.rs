//! # Equation
//!
//! ## Purpose
//! `Equation` is an immutable two-sided value `lhs = rhs` over the symbolic engine. Every
//! operation returns a new `Equation` built by doing the same thing to both sides.
//!
//! ## Key Methods
//! - `new(lhs, rhs)`: converts both sides into expressions, rejects sets and relationals
//! - `diff(vars)`: differentiates both sides; the lhs is left unevaluated when it does not
//!   depend on the differentiation variables
//! - `integrate(vars, side)`: integrates ONE side and returns a plain expression
//! - `subs(args, simultaneous)`: substitution by pairs, maps and other equations
//! - `expand`, `factor`, `collect`, `simplify`, `evalf`, `n`: side-wise helpers
//! - `check()`: decides the equation with the simplifier (tri-state)
//!
//! ## Interesting Code Features
//! - structural `==`: `Equation(a, b/c)*c == Equation(a*c, b)` holds because the engine
//!   builds canonical forms, while mathematical equivalence is left to `check()`
//! - factoring and collecting never cancel anything across the `=` sign

use crate::symbolic::symbolic_engine::{Expr, Symbol};
use crate::symbolic::symbolic_errors::{AlgebraError, Result};
use crate::symbolic::symbolic_relational::{Equality, Truth};
use crate::symbolic::symbolic_traits::TryIntoExpr;
use std::collections::{BTreeMap, BTreeSet};

/// Two-sided symbolic value `lhs = rhs`
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Equation {
    lhs: Expr,
    rhs: Expr,
}

/// short synonym of `Equation`
pub type Eqn = Equation;

/// Either side of a call into the Equation-aware API: a plain expression or an equation
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    Expr(Expr),
    Eqn(Equation),
}

/// Explicit name -> value bindings, used for equation labels and by `units`
pub type Namespace = BTreeMap<String, Operand>;

/// Argument shapes accepted by `subs`
#[derive(Clone, Debug, PartialEq)]
pub enum SubsArg {
    /// `old -> new`
    Pair(Expr, Expr),
    /// pairs applied in the given order
    Pairs(Vec<(Expr, Expr)>),
    /// pairs applied from the most complex target to the simplest
    Map(BTreeMap<Expr, Expr>),
    /// `lhs -> rhs` of another equation
    Eqn(Equation),
    /// a list of equations; must be unpacked into `Eqn` arguments
    Eqns(Vec<Equation>),
}

impl Equation {
    /// Builds `lhs = rhs` from anything convertible to an expression.
    ///
    /// # Errors
    /// `TypeError` when a side is a set or a relational statement, `Parse` for malformed
    /// expression text.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let (a, b, c) = symbols!(a, b, c);
    /// let eq = Equation::new(a, b / c)?;
    /// let eq2 = Equation::new("p*V", "n*R*T")?;
    /// ```
    pub fn new<L: TryIntoExpr, R: TryIntoExpr>(lhs: L, rhs: R) -> Result<Equation> {
        Ok(Equation {
            lhs: lhs.try_into_expr()?,
            rhs: rhs.try_into_expr()?,
        })
    }

    /// both sides are expressions already
    pub(crate) fn from_sides(lhs: Expr, rhs: Expr) -> Equation {
        Equation { lhs, rhs }
    }

    pub fn lhs(&self) -> &Expr {
        &self.lhs
    }

    pub fn rhs(&self) -> &Expr {
        &self.rhs
    }

    /// `[lhs, rhs]`
    pub fn args(&self) -> Vec<Expr> {
        vec![self.lhs.clone(), self.rhs.clone()]
    }

    /// `rhs = lhs`
    pub fn reversed(&self) -> Equation {
        Equation::from_sides(self.rhs.clone(), self.lhs.clone())
    }

    /// synonym of `reversed`
    pub fn swap(&self) -> Equation {
        self.reversed()
    }

    /// the equation as an engine equality statement
    pub fn as_boolean(&self) -> Equality {
        Equality::new(self.lhs.clone(), self.rhs.clone())
    }

    /// `True`/`False` when the simplifier can decide `lhs - rhs == 0`, otherwise the
    /// unevaluated statement
    pub fn check(&self) -> Truth {
        self.as_boolean().simplify()
    }

    /// union of the free symbols of both sides
    pub fn free_symbols(&self) -> BTreeSet<Symbol> {
        let mut symbols = self.lhs.free_symbols();
        symbols.extend(self.rhs.free_symbols());
        symbols
    }

    /// applies `f` to both sides
    pub fn map_sides(&self, f: impl Fn(&Expr) -> Expr) -> Equation {
        Equation::from_sides(f(&self.lhs), f(&self.rhs))
    }

    //___________________________________CALCULUS____________________________________

    /// Differentiates both sides. `vars` holds symbols, a positive integer after a symbol
    /// repeats it: `[c, 2]` is the second derivative in `c`.
    ///
    /// The rhs is always evaluated. The lhs is evaluated only when it is not already a
    /// `Derivative` and one of the variables occurs in it; otherwise it becomes an
    /// unevaluated `Derivative`. Differentiating in one call and stepwise can therefore
    /// leave the lhs in different states:
    /// - `Eqn(a*c, b/c**2).diff([c, b])` gives `Eqn(0, -2/c**3)`
    /// - `.diff([c]).diff([b])` gives `Eqn(Derivative(a, b), -2/c**3)`
    /// - `.diff([b]).diff([c])` gives `Eqn(Derivative(a*c, b, c), -2/c**3)`
    pub fn diff(&self, vars: &[Expr]) -> Result<Equation> {
        let symbols = Expr::differentiation_variables(vars)?;
        let evaluate_lhs = !matches!(self.lhs, Expr::Derivative(_, _))
            && symbols.iter().any(|s| self.lhs.contains_variable(&s.name));
        Ok(Equation::from_sides(
            self.lhs.diff_many(&symbols, evaluate_lhs),
            self.rhs.diff_many(&symbols, true),
        ))
    }

    /// Integrates one side of the equation and returns that side's integral.
    ///
    /// # Errors
    /// `ValueError` without a side, `AttributeError` for a side other than
    /// `"lhs"`/`"rhs"`.
    pub fn integrate(&self, vars: &[Expr], side: Option<&str>) -> Result<Expr> {
        let side = side.ok_or_else(|| {
            AlgebraError::ValueError(
                "You must specify `side=\"lhs\"` or `side=\"rhs\"` when integrating an Equation"
                    .to_string(),
            )
        })?;
        let target = match side {
            "lhs" => &self.lhs,
            "rhs" => &self.rhs,
            _ => {
                return Err(AlgebraError::AttributeError(
                    "`side` must equal \"lhs\" or \"rhs\".".to_string(),
                ));
            }
        };
        Ok(target.integrate_many(&integration_variables(vars)?))
    }

    //___________________________________SUBSTITUTION____________________________________

    /// Substitutes into both sides.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let eq1 = Equation::new(x + a + b + c, x * a * b * c)?;
    /// let eq2 = Equation::new(x + a, 4)?;
    /// let eq3 = Equation::new(b, 5)?;
    /// // Eqn(c + 9, 5*a*c*x)
    /// let res = eq1.subs(&[SubsArg::Eqn(eq2), SubsArg::Eqn(eq3)], false)?;
    /// ```
    ///
    /// # Errors
    /// `TypeError` for a single list of equations, `ValueError` when equations are mixed
    /// with other argument shapes.
    pub fn subs(&self, args: &[SubsArg], simultaneous: bool) -> Result<Equation> {
        let pairs = equation_substitution_pairs(args)?;
        Ok(self.map_sides(|side| side.subs_pairs(&pairs, simultaneous)))
    }

    //___________________________________HELPERS____________________________________
    // no cancellation across the `=` sign is attempted

    pub fn expand(&self) -> Equation {
        self.map_sides(|e| e.expand())
    }

    pub fn factor(&self) -> Equation {
        self.map_sides(|e| e.factor())
    }

    pub fn collect(&self, syms: &[Expr]) -> Equation {
        self.map_sides(|e| e.collect(syms))
    }

    pub fn simplify(&self) -> Equation {
        self.map_sides(|e| e.simplify())
    }

    pub fn cancel(&self) -> Equation {
        self.map_sides(|e| e.cancel())
    }

    /// numeric evaluation of both sides to `digits` significant digits
    pub fn evalf(&self, digits: usize, subs: Option<&BTreeMap<Expr, Expr>>) -> Equation {
        self.map_sides(|e| e.evalf(digits, subs))
    }

    pub fn n(&self) -> Equation {
        self.map_sides(|e| e.n())
    }
}

impl Equality {
    /// recasts the statement as an `Equation`
    pub fn to_equation(&self) -> Equation {
        Equation::from_sides(self.lhs.clone(), self.rhs.clone())
    }

    /// synonym of `to_equation`
    pub fn to_eqn(&self) -> Equation {
        self.to_equation()
    }
}

/// integration variables must be symbols
fn integration_variables(vars: &[Expr]) -> Result<Vec<Symbol>> {
    vars.iter()
        .map(|v| match v {
            Expr::Var(s) => Ok(s.clone()),
            other => Err(AlgebraError::ValueError(format!(
                "Invalid limits given: {} is not a symbol",
                other
            ))),
        })
        .collect()
}

/// Flattens plain substitution arguments into ordered pairs
fn plain_substitution_pairs(args: &[SubsArg]) -> Vec<(Expr, Expr)> {
    let mut pairs = Vec::new();
    for arg in args {
        match arg {
            SubsArg::Pair(old, new) => pairs.push((old.clone(), new.clone())),
            SubsArg::Pairs(v) => pairs.extend(v.iter().cloned()),
            SubsArg::Map(map) => pairs.extend(Expr::sort_substitution_map(map)),
            SubsArg::Eqn(_) | SubsArg::Eqns(_) => {}
        }
    }
    pairs
}

fn has_equation(args: &[SubsArg]) -> bool {
    args.iter()
        .any(|a| matches!(a, SubsArg::Eqn(_) | SubsArg::Eqns(_)))
}

/// Substitution pairs of `Equation::subs`: equations become `lhs -> rhs` and are applied
/// like a map
fn equation_substitution_pairs(args: &[SubsArg]) -> Result<Vec<(Expr, Expr)>> {
    if !args.is_empty() && args.iter().all(|a| matches!(a, SubsArg::Eqn(_))) {
        let map: BTreeMap<Expr, Expr> = args
            .iter()
            .filter_map(|a| match a {
                SubsArg::Eqn(eq) => Some((eq.lhs.clone(), eq.rhs.clone())),
                _ => None,
            })
            .collect();
        return Ok(Expr::sort_substitution_map(&map));
    }
    if args.len() == 1 && matches!(args[0], SubsArg::Eqns(_)) {
        return Err(AlgebraError::TypeError(
            "You passed into `subs` a list of elements of type `Equation`, but this is not \
             supported. Please, consider unpacking the list into separate `Eqn` arguments \
             or select your equations from the list."
                .to_string(),
        ));
    }
    if has_equation(args) {
        return Err(AlgebraError::ValueError(
            "`args` contains one or more Equation and some other data type. This mode of \
             operation is not supported. Please, read `subs` documentation to understand \
             how to use it."
                .to_string(),
        ));
    }
    Ok(plain_substitution_pairs(args))
}

impl Expr {
    /// Substitution into a plain expression with the argument shapes of `Equation::subs`.
    ///
    /// # Errors
    /// `ValueError` when an equation is among the arguments.
    pub fn subs(&self, args: &[SubsArg], simultaneous: bool) -> Result<Expr> {
        if has_equation(args) {
            return Err(AlgebraError::ValueError(
                "An Equation cannot be substituted into an expression; substitute into an \
                 Equation instead."
                    .to_string(),
            ));
        }
        Ok(self.subs_pairs(&plain_substitution_pairs(args), simultaneous))
    }
}

//___________________________________CONVERSIONS____________________________________

impl Operand {
    pub fn as_equation(&self) -> Option<&Equation> {
        match self {
            Operand::Eqn(eq) => Some(eq),
            Operand::Expr(_) => None,
        }
    }

    pub fn as_expr(&self) -> Option<&Expr> {
        match self {
            Operand::Expr(e) => Some(e),
            Operand::Eqn(_) => None,
        }
    }

    pub fn is_equation(&self) -> bool {
        matches!(self, Operand::Eqn(_))
    }

    /// the expression, or a TypeError naming `context` for an equation
    pub fn expect_expr(&self, context: &str) -> Result<Expr> {
        match self {
            Operand::Expr(e) => Ok(e.clone()),
            Operand::Eqn(eq) => Err(AlgebraError::TypeError(format!(
                "{} expects an expression, got the Equation {}",
                context, eq
            ))),
        }
    }
}

impl From<Expr> for Operand {
    fn from(e: Expr) -> Self {
        Operand::Expr(e)
    }
}

impl From<&Expr> for Operand {
    fn from(e: &Expr) -> Self {
        Operand::Expr(e.clone())
    }
}

impl From<Equation> for Operand {
    fn from(eq: Equation) -> Self {
        Operand::Eqn(eq)
    }
}

impl From<&Equation> for Operand {
    fn from(eq: &Equation) -> Self {
        Operand::Eqn(eq.clone())
    }
}

impl From<i64> for Operand {
    fn from(n: i64) -> Self {
        Operand::Expr(Expr::int(n))
    }
}

impl From<i32> for Operand {
    fn from(n: i32) -> Self {
        Operand::Expr(Expr::from(n))
    }
}

impl From<f64> for Operand {
    fn from(f: f64) -> Self {
        Operand::Expr(Expr::float(f))
    }
}

impl From<Symbol> for Operand {
    fn from(s: Symbol) -> Self {
        Operand::Expr(Expr::Var(s))
    }
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Operand::Expr(e) => write!(f, "{}", e),
            Operand::Eqn(eq) => write!(f, "{}", eq),
        }
    }
}

impl From<(Expr, Expr)> for SubsArg {
    fn from((old, new): (Expr, Expr)) -> Self {
        SubsArg::Pair(old, new)
    }
}

impl From<Vec<(Expr, Expr)>> for SubsArg {
    fn from(pairs: Vec<(Expr, Expr)>) -> Self {
        SubsArg::Pairs(pairs)
    }
}

impl From<BTreeMap<Expr, Expr>> for SubsArg {
    fn from(map: BTreeMap<Expr, Expr>) -> Self {
        SubsArg::Map(map)
    }
}

impl From<Equation> for SubsArg {
    fn from(eq: Equation) -> Self {
        SubsArg::Eqn(eq)
    }
}

impl From<Vec<Equation>> for SubsArg {
    fn from(eqs: Vec<Equation>) -> Self {
        SubsArg::Eqns(eqs)
    }
}
