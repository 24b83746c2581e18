//! # Side-targeted application
//!
//! ## Purpose
//! `apply` runs an operation on one or both sides of an equation, `do_`/`dolhs`/`dorhs`
//! give method-call syntax for the engine's expression methods:
//! `eq.dorhs().method("integrate")?.call(&[b.into()])?`.
//!
//! ## Key Types
//! - `ExprOperation`: capability interface of everything that can be applied to a side
//! - `Operation`: `enum_dispatch` enum over engine methods (`ExprMethod`), engine
//!   functions (`SymFn`) and user closures (`Closure`)
//! - `ExprMethod`: the methods an expression implements; an operation whose name is one
//!   of them is replaced by the method before it is applied
//! - `Sides`/`BoundMethod`: `do_()` selector and the method bound to it

use crate::algebraic_equation::equation::{Equation, Operand, SubsArg};
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_errors::{AlgebraError, Result};
use crate::symbolic::symbolic_functions::SymFn;
use crate::symbolic::symbolic_simplify::DEFAULT_DIGITS;
use enum_dispatch::enum_dispatch;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Side(s) of an equation an operation is applied to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Side {
    Both,
    Lhs,
    Rhs,
}

impl Side {
    fn touches_lhs(&self) -> bool {
        matches!(self, Side::Both | Side::Lhs)
    }

    fn touches_rhs(&self) -> bool {
        matches!(self, Side::Both | Side::Rhs)
    }
}

/// Something that can be applied to one side of an equation
#[enum_dispatch(Operation)]
pub trait ExprOperation {
    /// name used for method resolution and messages
    fn name(&self) -> String;
    /// result of the operation on `expr` with the extra arguments `args`
    fn apply_to(&self, expr: &Expr, args: &[Operand]) -> Result<Expr>;
}

#[enum_dispatch]
#[derive(Clone, Debug)]
pub enum Operation {
    ExprMethod,
    SymFn,
    Closure,
}

//___________________________________EXPRESSION METHODS____________________________________

/// Methods every expression implements
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString, EnumIter, AsRefStr)]
#[allow(non_camel_case_types)]
pub enum ExprMethod {
    expand,
    factor,
    collect,
    simplify,
    cancel,
    together,
    trigsimp,
    evalf,
    n,
    diff,
    integrate,
    subs,
}

fn exprs_of(args: &[Operand], context: &str) -> Result<Vec<Expr>> {
    args.iter().map(|a| a.expect_expr(context)).collect()
}

fn no_arguments(method: ExprMethod, args: &[Operand]) -> Result<()> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(AlgebraError::TypeError(format!(
            "{}() takes no arguments ({} given)",
            method,
            args.len()
        )))
    }
}

/// `subs` arguments given as operands: equations, or `old, new` expression pairs
fn subs_arguments(args: &[Operand]) -> Result<Vec<SubsArg>> {
    let mut out = Vec::new();
    let mut pending: Option<Expr> = None;
    for a in args {
        match (a, pending.take()) {
            (Operand::Eqn(eq), None) => out.push(SubsArg::Eqn(eq.clone())),
            (Operand::Expr(e), None) => pending = Some(e.clone()),
            (Operand::Expr(new), Some(old)) => out.push(SubsArg::Pair(old, new.clone())),
            (Operand::Eqn(eq), Some(old)) => {
                return Err(AlgebraError::ValueError(format!(
                    "subs: expected a replacement expression for {}, got the Equation {}",
                    old, eq
                )));
            }
        }
    }
    if let Some(old) = pending {
        return Err(AlgebraError::ValueError(format!(
            "subs: missing replacement for {}",
            old
        )));
    }
    Ok(out)
}

impl ExprOperation for ExprMethod {
    fn name(&self) -> String {
        self.to_string()
    }

    fn apply_to(&self, expr: &Expr, args: &[Operand]) -> Result<Expr> {
        let method = *self;
        match method {
            ExprMethod::expand => no_arguments(method, args).map(|_| expr.expand()),
            ExprMethod::factor => no_arguments(method, args).map(|_| expr.factor()),
            ExprMethod::simplify => no_arguments(method, args).map(|_| expr.simplify()),
            ExprMethod::cancel => no_arguments(method, args).map(|_| expr.cancel()),
            ExprMethod::together => no_arguments(method, args).map(|_| expr.together()),
            ExprMethod::trigsimp => no_arguments(method, args).map(|_| expr.trigsimp()),
            ExprMethod::n => no_arguments(method, args).map(|_| expr.n()),
            ExprMethod::collect => Ok(expr.collect(&exprs_of(args, "collect")?)),
            ExprMethod::evalf => {
                let digits = match exprs_of(args, "evalf")?.first() {
                    None => DEFAULT_DIGITS,
                    Some(d) => d
                        .as_i64()
                        .filter(|d| *d > 0)
                        .map(|d| d as usize)
                        .ok_or_else(|| {
                            AlgebraError::ValueError(format!(
                                "evalf: precision must be a positive integer, got {}",
                                d
                            ))
                        })?,
                };
                Ok(expr.evalf(digits, None))
            }
            ExprMethod::diff => {
                let vars = Expr::differentiation_variables(&exprs_of(args, "diff")?)?;
                Ok(expr.diff_many(&vars, true))
            }
            ExprMethod::integrate => {
                let vars = exprs_of(args, "integrate")?
                    .into_iter()
                    .map(|v| match v {
                        Expr::Var(s) => Ok(s),
                        other => Err(AlgebraError::ValueError(format!(
                            "Invalid limits given: {} is not a symbol",
                            other
                        ))),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(expr.integrate_many(&vars))
            }
            ExprMethod::subs => expr.subs(&subs_arguments(args)?, false),
        }
    }
}

//___________________________________ENGINE FUNCTIONS____________________________________

impl ExprOperation for SymFn {
    fn name(&self) -> String {
        self.to_string()
    }

    /// `f(expr, *args)`
    fn apply_to(&self, expr: &Expr, args: &[Operand]) -> Result<Expr> {
        let mut call_args = vec![expr.clone()];
        call_args.extend(exprs_of(args, self.as_ref())?);
        if let Some(arity) = self.arity() {
            if call_args.len() != arity {
                return Err(AlgebraError::TypeError(format!(
                    "{} takes exactly {} argument(s) ({} given)",
                    self,
                    arity,
                    call_args.len()
                )));
            }
        }
        Ok(Expr::func(*self, call_args))
    }
}

//___________________________________USER CLOSURES____________________________________

type ClosureFn = dyn Fn(&Expr, &[Operand]) -> Result<Expr>;

/// Named user operation
#[derive(Clone)]
pub struct Closure {
    name: String,
    f: Rc<ClosureFn>,
}

impl Closure {
    pub fn new(name: &str, f: impl Fn(&Expr, &[Operand]) -> Result<Expr> + 'static) -> Self {
        Closure {
            name: name.to_string(),
            f: Rc::new(f),
        }
    }

    /// operation without extra arguments
    pub fn unary(name: &str, f: impl Fn(&Expr) -> Expr + 'static) -> Self {
        Closure::new(name, move |e, _| Ok(f(e)))
    }
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Closure({})", self.name)
    }
}

impl ExprOperation for Closure {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn apply_to(&self, expr: &Expr, args: &[Operand]) -> Result<Expr> {
        (self.f)(expr, args)
    }
}

//___________________________________APPLY____________________________________

impl Operation {
    /// the expression method of the same name, if there is one
    fn specialised(self) -> Operation {
        match self {
            Operation::ExprMethod(_) => self,
            other => match ExprMethod::from_str(&other.name()) {
                Ok(method) => Operation::ExprMethod(method),
                Err(_) => other,
            },
        }
    }
}

impl Equation {
    /// Applies `op` with the extra arguments `args` to the chosen side(s).
    ///
    /// # Examples
    /// ```rust, ignore
    /// let eq = Equation::new(a.clone(), b.clone() / c.clone())?;
    /// let logged = eq.apply(SymFn::log, &[], Side::Both)?;       // log(a) = log(b/c)
    /// let doubled = eq.apply(Closure::unary("twice", |e| 2 * e.clone()), &[], Side::Rhs)?;
    /// ```
    pub fn apply(&self, op: impl Into<Operation>, args: &[Operand], side: Side) -> Result<Equation> {
        let op = op.into().specialised();
        let lhs = if side.touches_lhs() {
            op.apply_to(self.lhs(), args)?
        } else {
            self.lhs().clone()
        };
        let rhs = if side.touches_rhs() {
            op.apply_to(self.rhs(), args)?
        } else {
            self.rhs().clone()
        };
        Ok(Equation::from_sides(lhs, rhs))
    }

    pub fn applylhs(&self, op: impl Into<Operation>, args: &[Operand]) -> Result<Equation> {
        self.apply(op, args, Side::Lhs)
    }

    pub fn applyrhs(&self, op: impl Into<Operation>, args: &[Operand]) -> Result<Equation> {
        self.apply(op, args, Side::Rhs)
    }

    /// method-call syntax on both sides: `eq.do_().method("expand")?.call(&[])?`
    pub fn do_(&self) -> Sides<'_> {
        Sides { eqn: self, side: Side::Both }
    }

    pub fn dolhs(&self) -> Sides<'_> {
        Sides { eqn: self, side: Side::Lhs }
    }

    pub fn dorhs(&self) -> Sides<'_> {
        Sides { eqn: self, side: Side::Rhs }
    }
}

/// Side selector returned by `do_`, `dolhs` and `dorhs`
#[derive(Clone, Copy, Debug)]
pub struct Sides<'a> {
    eqn: &'a Equation,
    side: Side,
}

impl<'a> Sides<'a> {
    /// Binds the expression method `name` to the selected side(s).
    ///
    /// # Errors
    /// `AttributeError` when expressions have no such method.
    pub fn method(&self, name: &str) -> Result<BoundMethod<'a>> {
        let method = ExprMethod::from_str(name).map_err(|_| {
            AlgebraError::AttributeError(format!(
                "Expressions in the equation have no attribute `{0}`. Try `.apply({0}, *args)` \
                 or pass the equation as a parameter to `{0}()`.",
                name
            ))
        })?;
        Ok(BoundMethod {
            eqn: self.eqn,
            side: self.side,
            method,
        })
    }
}

/// `apply` partially applied to an equation, a side and a method
#[derive(Clone, Copy, Debug)]
pub struct BoundMethod<'a> {
    eqn: &'a Equation,
    side: Side,
    method: ExprMethod,
}

impl BoundMethod<'_> {
    pub fn call(&self, args: &[Operand]) -> Result<Equation> {
        self.eqn.apply(self.method, args, self.side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols;
    use num_traits::Pow;

    #[test]
    fn test_apply_function_to_sides() {
        let (a, b, c) = symbols!(a, b, c);
        let eq = Equation::new(a.clone(), b.clone() / c.clone()).unwrap();
        let logged = eq.apply(SymFn::log, &[], Side::Both).unwrap();
        assert_eq!(
            logged,
            Equation::new(
                Expr::func(SymFn::log, vec![a.clone()]),
                Expr::func(SymFn::log, vec![b.clone() / c.clone()])
            )
            .unwrap()
        );
        let lhs_only = eq.applylhs(SymFn::sin, &[]).unwrap();
        assert_eq!(lhs_only.rhs(), eq.rhs());
        assert_eq!(lhs_only.lhs(), &Expr::func(SymFn::sin, vec![a]));
        assert!(matches!(
            eq.apply(SymFn::atan2, &[], Side::Both),
            Err(AlgebraError::TypeError(_))
        ));
    }

    #[test]
    fn test_apply_closure() {
        let (a, b) = symbols!(a, b);
        let eq = Equation::new(a.clone(), b.clone()).unwrap();
        let squared = eq
            .applyrhs(Closure::unary("square", |e| e.clone().pow(2)), &[])
            .unwrap();
        assert_eq!(squared, Equation::new(a.clone(), b.clone().pow(2)).unwrap());
        let shift = Closure::new("shift", |e, args| {
            let by = args
                .first()
                .map(|o| o.expect_expr("shift"))
                .transpose()?
                .unwrap_or_else(Expr::one);
            Ok(e.clone() + by)
        });
        let shifted = eq.apply(shift, &[Operand::from(3)], Side::Both).unwrap();
        assert_eq!(shifted, Equation::new(a + 3, b + 3).unwrap());
    }

    #[test]
    fn test_closure_named_like_a_method_uses_the_method() {
        let x = symbols!(x);
        let eq = Equation::new((x.clone() + 1).pow(2), 0).unwrap();
        let never_called = Closure::unary("expand", |_| Expr::int(42));
        let expanded = eq.apply(never_called, &[], Side::Both).unwrap();
        assert_eq!(expanded.lhs(), &(x.clone().pow(2) + 2 * x + 1));
    }

    #[test]
    fn test_do_methods() {
        let (a, b, c) = symbols!(a, b, c);
        let q = Equation::new(a.clone() * c.clone(), b.clone() / c.clone()).unwrap();
        let integrated = q
            .dorhs()
            .method("integrate")
            .unwrap()
            .call(&[b.clone().into()])
            .unwrap()
            .dolhs()
            .method("integrate")
            .unwrap()
            .call(&[a.clone().into()])
            .unwrap();
        assert_eq!(integrated.to_string(), "a**2*c/2 = b**2/(2*c)");
        let poly = Equation::new(
            a.clone(),
            4 * b.clone().pow(2) + 4 * b.clone() * c.clone() + c.clone() * a.clone(),
        )
        .unwrap();
        let collected = poly.dorhs().method("collect").unwrap().call(&[c.clone().into()]).unwrap();
        assert_eq!(collected.to_string(), "a = 4*b**2 + c*(a + 4*b)");
        let expanded = poly.do_().method("expand").unwrap().call(&[]).unwrap();
        assert_eq!(expanded, poly);
    }

    #[test]
    fn test_do_unknown_method() {
        let (a, b) = symbols!(a, b);
        let eq = Equation::new(a, b).unwrap();
        match eq.do_().method("frobnicate") {
            Err(AlgebraError::AttributeError(msg)) => {
                assert!(msg.contains("`frobnicate`"));
                assert!(msg.contains(".apply(frobnicate"));
            }
            other => panic!("expected AttributeError, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_do_subs_rejects_equations() {
        let (a, b, x) = symbols!(a, b, x);
        let eq = Equation::new(x.clone() + a.clone(), b.clone()).unwrap();
        let sub = Equation::new(x.clone(), 4).unwrap();
        assert!(matches!(
            eq.dolhs().method("subs").unwrap().call(&[sub.into()]),
            Err(AlgebraError::ValueError(_))
        ));
        let replaced = eq
            .dolhs()
            .method("subs")
            .unwrap()
            .call(&[x.into(), 4.into()])
            .unwrap();
        assert_eq!(replaced, Equation::new(a + 4, b).unwrap());
    }

    #[test]
    fn test_side_names() {
        assert_eq!(Side::from_str("lhs").unwrap(), Side::Lhs);
        assert_eq!(Side::Both.to_string(), "both");
    }
}
