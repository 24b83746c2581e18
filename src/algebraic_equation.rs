//! # Algebraic equations
//!
//! Two-sided equations `lhs = rhs` over the native symbolic engine. Every operation is done to
//! both sides, so the manipulation reads like algebra on paper:
//! ```rust, ignore
//! use RustedAlgebra::algebraic_equation::*;
//! use RustedAlgebra::symbols;
//! let (p, V, n, R, T) = symbols!(p, V, n, R, T);
//! let ideal = Eqn::new(p.clone() * V.clone(), n * R * T)?;
//! let solved = ideal / V;             // p = R*T*n/V
//! println!("{}", solved);
//! println!("{}", solved.to_latex());  // p=\frac{R T n}{V}
//! ```
//! Functions applied to an equation act on each side (`sin(&eq)`, `sqrt(&eq)`), `solve` returns
//! solutions as equations and the output layer renders equations as code, text or LaTeX.
#![allow(non_snake_case)]

/// the equation value type, substitution, calculus and side-wise algebra
pub mod equation;
/// arithmetic operators between equations and expressions
pub mod equation_ops;
/// `apply`/`do`: arbitrary operations on one or both sides
pub mod apply;
/// engine functions extended to accept equations
pub mod eqn_functions;
/// solving equations and systems
pub mod solve;
/// code/text/LaTeX rendering
pub mod output;
/// output and numerics settings, toml loader
pub mod config;

#[cfg(test)]
mod algebraic_equation_tests;

pub use apply::{Closure, ExprMethod, ExprOperation, Operation, Side};
pub use config::{AlgebraConfig, NumericsConfig, OutputConfig};
pub use eqn_functions::{
    Abs, DiracDelta, Heaviside, SideWise, acos, acosh, acot, asin, asinh, atan, atanh, ceiling,
    collect, conjugate, cos, cosh, cot, coth, csc, default_registry, diff, exp, factorial, floor,
    im, integrate, log, re, root, sec, sign, sin, sinh, sqrt, tan, tanh,
};
pub use equation::{Eqn, Equation, Namespace, Operand, SubsArg};
pub use output::EquationPrinter;
pub use solve::{Solution, SolveInput, SolveResult, solve};
pub use crate::Utils::preparser::units;
