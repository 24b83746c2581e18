//! # Equation-aware functions
//!
//! ## Purpose
//! Makes the engine's named functions accept equations: a function called with exactly
//! one `Equation` among its arguments is evaluated twice, once with the lhs and once with
//! the rhs in that position, and the two results form a new `Equation`.
//!
//! ## Key Parts
//! - `FUNCTION_CATALOG`: every named function of the engine plus a few helpers
//! - `extend_functions`: walks a catalog once, skips `SKIP`, wraps the rest and warns
//!   (without stopping) about entries that cannot be wrapped
//! - `default_registry()`: the registry of the full catalog, built on first use
//! - `SideWise` and the generated free functions `sin`, `cos`, `log`, ...: the same rule
//!   resolved at compile time for `Expr` and `Equation` arguments
//! - `sqrt`, `root`, `Heaviside`, `collect`, `diff`, `integrate`: hand-written members of
//!   the family
//!
//! ## Example
//! ```rust, ignore
//! let eq = Equation::new(a.clone(), b.clone() / c.clone())?;
//! let s = sin(&eq);                                   // sin(a) = sin(b/c)
//! let f = default_registry().get("atan2").unwrap();
//! let t = f.call(&[eq.into(), Expr::int(1).into()])?; // atan2(a, 1) = atan2(b/c, 1)
//! ```

use crate::algebraic_equation::equation::{Equation, Operand};
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_errors::{AlgebraError, Result};
use crate::symbolic::symbolic_functions::SymFn;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// How a catalog entry is called
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CatalogKind {
    /// engine function with a fixed number of arguments
    Function(SymFn),
    /// engine function with any number of arguments
    Variadic(SymFn),
    /// convenience constructor that is not a function node of its own
    Helper,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub kind: CatalogKind,
}

const fn function(name: &'static str, f: SymFn) -> CatalogEntry {
    CatalogEntry {
        name,
        kind: CatalogKind::Function(f),
    }
}

const fn helper(name: &'static str) -> CatalogEntry {
    CatalogEntry {
        name,
        kind: CatalogKind::Helper,
    }
}

/// Named functions exported by the engine
pub static FUNCTION_CATALOG: &[CatalogEntry] = &[
    function("exp", SymFn::exp),
    function("log", SymFn::log),
    function("sin", SymFn::sin),
    function("cos", SymFn::cos),
    function("tan", SymFn::tan),
    function("cot", SymFn::cot),
    function("sec", SymFn::sec),
    function("csc", SymFn::csc),
    function("asin", SymFn::asin),
    function("acos", SymFn::acos),
    function("atan", SymFn::atan),
    function("acot", SymFn::acot),
    function("atan2", SymFn::atan2),
    function("sinh", SymFn::sinh),
    function("cosh", SymFn::cosh),
    function("tanh", SymFn::tanh),
    function("coth", SymFn::coth),
    function("asinh", SymFn::asinh),
    function("acosh", SymFn::acosh),
    function("atanh", SymFn::atanh),
    function("Abs", SymFn::Abs),
    function("sign", SymFn::sign),
    function("floor", SymFn::floor),
    function("ceiling", SymFn::ceiling),
    function("factorial", SymFn::factorial),
    function("binomial", SymFn::binomial),
    function("re", SymFn::re),
    function("im", SymFn::im),
    function("conjugate", SymFn::conjugate),
    function("Heaviside", SymFn::Heaviside),
    function("DiracDelta", SymFn::DiracDelta),
    function("Mod", SymFn::Mod),
    CatalogEntry {
        name: "Min",
        kind: CatalogKind::Variadic(SymFn::Min),
    },
    CatalogEntry {
        name: "Max",
        kind: CatalogKind::Variadic(SymFn::Max),
    },
    helper("sqrt"),
    helper("root"),
    helper("cbrt"),
    helper("real_root"),
    helper("Id"),
];

/// Equation-aware versions written by hand
pub const EXTENDED_ELSEWHERE: &[&str] = &["sqrt", "root", "Heaviside"];

/// Functions that are not meaningful on equations or have no general way to be
pub const NOT_APPLICABLE: &[&str] = &[
    "Min",
    "Max",
    "Id",
    "real_root",
    "cbrt",
    "unbranched_argument",
    "polarify",
    "unpolarify",
    "piecewise_fold",
    "E1",
    "Eijk",
    "bspline_basis",
    "bspline_basis_set",
    "interpolating_spline",
    "jn_zeros",
    "jacobi_normalized",
    "Ynm_c",
    "piecewise_exclusive",
    "Piecewise",
    "motzkin",
    "hyper",
    "meijerg",
    "chebyshevu_root",
    "chebyshevt_root",
    "betainc_regularized",
];

/// true for names `extend_functions` leaves alone
pub fn is_skipped(name: &str) -> bool {
    EXTENDED_ELSEWHERE.contains(&name) || NOT_APPLICABLE.contains(&name)
}

//___________________________________EQUATION-AWARE FUNCTION____________________________________

/// Engine function that splits a single equation argument over both sides
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EqnFunction {
    name: &'static str,
    f: SymFn,
}

impl EqnFunction {
    /// Wraps a catalog entry.
    ///
    /// # Errors
    /// `TypeError` for variadic functions and helpers: they have no fixed argument slots
    /// to split an equation over.
    pub fn extend(entry: &CatalogEntry) -> Result<EqnFunction> {
        match entry.kind {
            CatalogKind::Function(f) => Ok(EqnFunction {
                name: entry.name,
                f,
            }),
            CatalogKind::Variadic(_) => Err(AlgebraError::TypeError(format!(
                "{} takes a variable number of arguments",
                entry.name
            ))),
            CatalogKind::Helper => Err(AlgebraError::TypeError(format!(
                "{} is a helper, not a function node",
                entry.name
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn function(&self) -> SymFn {
        self.f
    }

    /// Calls the function. No equation among the arguments: the engine function.
    /// One equation: `Equation(f(.., lhs, ..), f(.., rhs, ..))`.
    ///
    /// # Errors
    /// `NotImplemented` for more than one equation argument, `TypeError` for a wrong
    /// number of arguments.
    pub fn call(&self, args: &[Operand]) -> Result<Operand> {
        if let Some(arity) = self.f.arity() {
            if args.len() != arity {
                return Err(AlgebraError::TypeError(format!(
                    "{} takes exactly {} argument(s) ({} given)",
                    self.name,
                    arity,
                    args.len()
                )));
            }
        }
        let positions: Vec<usize> = args
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_equation())
            .map(|(i, _)| i)
            .collect();
        let plain = |replacement: Option<(usize, &Expr)>| -> Vec<Expr> {
            args.iter()
                .enumerate()
                .map(|(i, a)| match (a, replacement) {
                    (_, Some((pos, side))) if pos == i => side.clone(),
                    (Operand::Expr(e), _) => e.clone(),
                    (Operand::Eqn(eq), _) => eq.lhs().clone(),
                })
                .collect()
        };
        match positions.as_slice() {
            [] => Ok(Operand::Expr(Expr::func(self.f, plain(None)))),
            [pos] => {
                let eq = args[*pos].as_equation().ok_or_else(|| {
                    AlgebraError::TypeError(format!("{}: argument {} is not an Equation", self.name, pos))
                })?;
                let lhs = Expr::func(self.f, plain(Some((*pos, eq.lhs()))));
                let rhs = Expr::func(self.f, plain(Some((*pos, eq.rhs()))));
                Ok(Operand::Eqn(Equation::from_sides(lhs, rhs)))
            }
            _ => Err(AlgebraError::NotImplemented(
                "Function calls with more than one Equation as a parameter are not supported. \
                 You may be able to get your desired outcome using .applyrhs and .applylhs."
                    .to_string(),
            )),
        }
    }
}

/// Equation-aware functions by name
#[derive(Clone, Debug, Default)]
pub struct EqnFunctionRegistry {
    functions: BTreeMap<&'static str, EqnFunction>,
    /// catalog entries left out with a warning
    unwrapped: Vec<&'static str>,
}

impl EqnFunctionRegistry {
    pub fn get(&self, name: &str) -> Option<&EqnFunction> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.functions.keys().copied().collect()
    }

    /// names the generator warned about and left out, in catalog order
    pub fn unwrapped(&self) -> &[&'static str] {
        &self.unwrapped
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// `name(args)` through the registry
    pub fn call(&self, name: &str, args: &[Operand]) -> Result<Operand> {
        self.get(name)
            .ok_or_else(|| AlgebraError::AttributeError(format!("no Equation-aware function `{}`", name)))?
            .call(args)
    }
}

/// Wraps every catalog entry that is not skipped. An entry that cannot be wrapped is
/// reported with a warning and left out; the pass always completes.
pub fn extend_functions(catalog: &[CatalogEntry]) -> EqnFunctionRegistry {
    let mut registry = EqnFunctionRegistry::default();
    for entry in catalog {
        if is_skipped(entry.name) {
            debug!("skipping {}", entry.name);
            continue;
        }
        match EqnFunction::extend(entry) {
            Ok(f) => {
                registry.functions.insert(entry.name, f);
            }
            Err(e) => {
                warn!(
                    "function/operation {} may not work properly with Equations. If you use it \
                     with Equations, validate its behavior. ({})",
                    entry.name, e
                );
                registry.unwrapped.push(entry.name);
            }
        }
    }
    registry
}

/// Registry of the full catalog, built exactly once
pub fn default_registry() -> &'static EqnFunctionRegistry {
    static REGISTRY: OnceLock<EqnFunctionRegistry> = OnceLock::new();
    REGISTRY.get_or_init(|| extend_functions(FUNCTION_CATALOG))
}

//___________________________________TYPED SURFACE____________________________________

/// Values a one-argument function can be mapped over: an expression, or both sides of an
/// equation
pub trait SideWise {
    type Output;
    fn side_wise(self, f: impl Fn(Expr) -> Expr) -> Self::Output;
}

impl SideWise for Expr {
    type Output = Expr;
    fn side_wise(self, f: impl Fn(Expr) -> Expr) -> Expr {
        f(self)
    }
}

impl SideWise for &Expr {
    type Output = Expr;
    fn side_wise(self, f: impl Fn(Expr) -> Expr) -> Expr {
        f(self.clone())
    }
}

impl SideWise for Equation {
    type Output = Equation;
    fn side_wise(self, f: impl Fn(Expr) -> Expr) -> Equation {
        self.map_sides(|side| f(side.clone()))
    }
}

impl SideWise for &Equation {
    type Output = Equation;
    fn side_wise(self, f: impl Fn(Expr) -> Expr) -> Equation {
        self.map_sides(|side| f(side.clone()))
    }
}

impl SideWise for Operand {
    type Output = Operand;
    fn side_wise(self, f: impl Fn(Expr) -> Expr) -> Operand {
        match self {
            Operand::Expr(e) => Operand::Expr(f(e)),
            Operand::Eqn(eq) => Operand::Eqn(eq.side_wise(f)),
        }
    }
}

macro_rules! side_wise_functions {
    ($($name:ident),* $(,)?) => {
        $(
            #[doc = concat!("`", stringify!($name), "` of an expression or of both sides of an equation")]
            pub fn $name<T: SideWise>(arg: T) -> T::Output {
                arg.side_wise(|e| Expr::func(SymFn::$name, vec![e]))
            }
        )*
    };
}

side_wise_functions!(
    exp, log, sin, cos, tan, cot, sec, csc, asin, acos, atan, acot, sinh, cosh, tanh, coth,
    asinh, acosh, atanh, Abs, sign, floor, ceiling, factorial, re, im, conjugate, DiracDelta,
);

/// principal square root
pub fn sqrt<T: SideWise>(arg: T) -> T::Output {
    arg.side_wise(|e| Expr::power(e, Expr::rational(1, 2)))
}

/// k-th n-th root: the principal root times `(-1)**(2*k/n)`
pub fn root<T: SideWise>(arg: T, n: i64, k: i64) -> Result<T::Output> {
    if n == 0 {
        return Err(AlgebraError::ValueError("root: the index n must be nonzero".to_string()));
    }
    let exponent = Expr::rational(1, n);
    let branch = Expr::power(Expr::int(-1), Expr::rational(2 * k, n));
    Ok(arg.side_wise(|e| Expr::power(e, exponent.clone()) * branch.clone()))
}

/// unit step
pub fn Heaviside<T: SideWise>(arg: T) -> T::Output {
    arg.side_wise(|e| Expr::func(SymFn::Heaviside, vec![e]))
}

/// collects an expression, or both sides of an equation, in the powers of `syms`
pub fn collect<T: SideWise>(arg: T, syms: &[Expr]) -> T::Output {
    arg.side_wise(|e| e.collect(syms))
}

/// Derivative of an expression, or of an equation with the lhs rule of `Equation::diff`
pub fn diff(f: impl Into<Operand>, vars: &[Expr]) -> Result<Operand> {
    match f.into() {
        Operand::Eqn(eq) => Ok(Operand::Eqn(eq.diff(vars)?)),
        Operand::Expr(e) => {
            let vars = Expr::differentiation_variables(vars)?;
            Ok(Operand::Expr(e.diff_many(&vars, true)))
        }
    }
}

/// Integral of an expression, or of one side of an equation; `side` is required for
/// equations and ignored for expressions
pub fn integrate(f: impl Into<Operand>, vars: &[Expr], side: Option<&str>) -> Result<Expr> {
    match f.into() {
        Operand::Eqn(eq) => eq.integrate(vars, side),
        Operand::Expr(e) => {
            let wrapped = Equation::from_sides(e, Expr::zero());
            wrapped.integrate(vars, Some("lhs"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols;
    use num_traits::Pow;

    #[test]
    fn test_catalog_skip_sets() {
        assert!(is_skipped("sqrt"));
        assert!(is_skipped("Min"));
        assert!(is_skipped("Piecewise"));
        assert!(!is_skipped("sin"));
        let registry = default_registry();
        assert!(registry.contains("sin"));
        assert!(registry.contains("atan2"));
        assert!(!registry.contains("Heaviside"));
        assert!(!registry.contains("Max"));
        assert!(!registry.contains("cbrt"));
        assert!(std::ptr::eq(registry, default_registry()));
    }

    #[test]
    fn test_generator_warns_and_continues() {
        let catalog = [
            function("sin", SymFn::sin),
            CatalogEntry {
                name: "Hull",
                kind: CatalogKind::Variadic(SymFn::Max),
            },
            helper("polygamma_helper"),
            function("cos", SymFn::cos),
        ];
        let registry = extend_functions(&catalog);
        assert_eq!(registry.names(), vec!["cos", "sin"]);
        assert_eq!(registry.unwrapped(), &["Hull", "polygamma_helper"]);
        assert!(EqnFunction::extend(&catalog[1]).is_err());
        assert!(default_registry().unwrapped().is_empty());
    }

    #[test]
    fn test_call_with_zero_one_and_two_equations() {
        let (a, b, c) = symbols!(a, b, c);
        let eq = Equation::new(a.clone(), b.clone() / c.clone()).unwrap();
        let registry = default_registry();
        let plain = registry.call("cos", &[a.clone().into()]).unwrap();
        assert_eq!(plain, Operand::Expr(Expr::func(SymFn::cos, vec![a.clone()])));
        let split = registry
            .call("atan2", &[c.clone().into(), eq.clone().into()])
            .unwrap();
        assert_eq!(
            split,
            Operand::Eqn(Equation::from_sides(
                Expr::func(SymFn::atan2, vec![c.clone(), a.clone()]),
                Expr::func(SymFn::atan2, vec![c.clone(), b.clone() / c.clone()])
            ))
        );
        assert!(matches!(
            registry.call("atan2", &[eq.clone().into(), eq.clone().into()]),
            Err(AlgebraError::NotImplemented(_))
        ));
        assert!(matches!(
            registry.call("sin", &[]),
            Err(AlgebraError::TypeError(_))
        ));
    }

    #[test]
    fn test_typed_functions() {
        let (a, b, c) = symbols!(a, b, c);
        let eq = Equation::new(a.clone(), b.clone() / c.clone()).unwrap();
        assert_eq!(
            log(&eq),
            Equation::from_sides(
                Expr::func(SymFn::log, vec![a.clone()]),
                Expr::func(SymFn::log, vec![b.clone() / c.clone()])
            )
        );
        assert_eq!(sin(a.clone()), Expr::func(SymFn::sin, vec![a.clone()]));
        assert_eq!(exp(log(&eq)), eq);
        assert_eq!(sqrt(Expr::int(4)), Expr::int(2));
    }

    #[test]
    fn test_sqrt_root_and_heaviside() {
        let (a, b, c) = symbols!(a, b, c);
        let eq = Equation::new(a.clone(), b.clone() / c.clone()).unwrap();
        let cube = root(&eq, 3, 0).unwrap();
        assert_eq!(cube.to_string(), "a**(1/3) = (b/c)**(1/3)");
        let square = sqrt(&eq);
        assert_eq!(square.lhs(), &a.clone().pow(Expr::rational(1, 2)));
        assert_eq!(root(Expr::int(-8), 3, 0).unwrap(), Expr::int(-8).pow(Expr::rational(1, 3)));
        assert_eq!(root(&a, 2, 1).unwrap(), -(a.clone().pow(Expr::rational(1, 2))));
        assert!(root(&a, 0, 0).is_err());
        let step = Heaviside(&eq);
        assert_eq!(step.lhs(), &Expr::func(SymFn::Heaviside, vec![a.clone()]));
    }

    #[test]
    fn test_collect_diff_integrate_free_functions() {
        let (a, b, c) = symbols!(a, b, c);
        let e = 4 * b.clone().pow(2) + 4 * b.clone() * c.clone() + c.clone() * a.clone();
        assert_eq!(collect(&e, &[c.clone()]).to_string(), "4*b**2 + c*(a + 4*b)");
        let q = Equation::new(a.clone() * c.clone(), b.clone() / c.clone().pow(2)).unwrap();
        assert_eq!(
            diff(q.clone(), &[c.clone()]).unwrap(),
            Operand::Eqn(Equation::new(a.clone(), -2 * b.clone() / c.clone().pow(3)).unwrap())
        );
        assert_eq!(
            diff(a.clone() * c.clone(), &[c.clone()]).unwrap(),
            Operand::Expr(a.clone())
        );
        let q = Equation::new(a.clone() * c.clone(), b.clone() / c.clone()).unwrap();
        assert!(matches!(
            integrate(q.clone(), &[b.clone()], None),
            Err(AlgebraError::ValueError(_))
        ));
        assert_eq!(
            integrate(q, &[b.clone()], Some("rhs")).unwrap().to_string(),
            "b**2/(2*c)"
        );
        assert_eq!(integrate(a.clone(), &[a.clone()], None).unwrap(), a.pow(2) / 2);
    }
}
