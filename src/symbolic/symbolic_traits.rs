// SYMBOLIC TRAITS //////////////////////////////////////////////////////////////////
// This module contains the conversion traits of the symbolic engine.
// Every value that may stand on one side of an equation converts to `Expr` here;
// sets and relational statements are rejected with a TypeError.

use crate::symbolic::parse_expr::sympify;
use crate::symbolic::symbolic_engine::{Expr, Symbol};
use crate::symbolic::symbolic_errors::{AlgebraError, Result};
use crate::symbolic::symbolic_relational::{Equality, FiniteSet};
use num::BigRational;

/// Fallible conversion of a value into an expression ("sympify")
pub trait TryIntoExpr {
    fn try_into_expr(self) -> Result<Expr>;
}

///////////////// IMPLEMENTATION OF THE TRAIT FOR THE NATIVE ENGINE /////////////////////////
impl TryIntoExpr for Expr {
    fn try_into_expr(self) -> Result<Expr> {
        Ok(self)
    }
}

impl TryIntoExpr for &Expr {
    fn try_into_expr(self) -> Result<Expr> {
        Ok(self.clone())
    }
}

impl TryIntoExpr for Symbol {
    fn try_into_expr(self) -> Result<Expr> {
        Ok(Expr::Var(self))
    }
}

macro_rules! impl_try_into_expr_for_numbers {
    ($($t:ty),*) => {
        $(
            impl TryIntoExpr for $t {
                fn try_into_expr(self) -> Result<Expr> {
                    Ok(Expr::from(self))
                }
            }
        )*
    };
}

impl_try_into_expr_for_numbers!(i32, i64, f64, BigRational);

impl TryIntoExpr for &str {
    fn try_into_expr(self) -> Result<Expr> {
        sympify(self)
    }
}

impl TryIntoExpr for String {
    fn try_into_expr(self) -> Result<Expr> {
        sympify(&self)
    }
}

impl<T: std::fmt::Display> TryIntoExpr for FiniteSet<T> {
    fn try_into_expr(self) -> Result<Expr> {
        Err(AlgebraError::TypeError(format!(
            "lhs and rhs of an equation must be expressions, got the set {}",
            self
        )))
    }
}

impl TryIntoExpr for Equality {
    fn try_into_expr(self) -> Result<Expr> {
        Err(AlgebraError::TypeError(format!(
            "lhs and rhs of an equation must be expressions, got the relational {}",
            self
        )))
    }
}
