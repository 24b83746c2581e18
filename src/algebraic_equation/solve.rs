//! # Solving equations
//!
//! `solve` accepts equations and plain expressions, hands `lhs - rhs` (or the expression
//! itself) to the engine solver, and turns every solution back into equations
//! `symbol = value` when an equation was given.
//!
//! A single symbol with a single solution comes back bare (`SolveResult::Single`),
//! everything else as a set of solutions, or as a list when `solve_to_list` is set.
//! Each solution of a system is itself a list of equations in the order of the requested
//! symbols.

use crate::algebraic_equation::config::OutputConfig;
use crate::algebraic_equation::equation::{Equation, Operand};
use crate::symbolic::symbolic_engine::{Expr, Symbol};
use crate::symbolic::symbolic_errors::{AlgebraError, Result};
use crate::symbolic::symbolic_relational::FiniteSet;
use crate::symbolic::symbolic_solve::{SolutionMap, solve_system};
use log::info;
use std::collections::BTreeMap;
use tabled::{builder::Builder, settings::Style};

/// What to solve: one equation/expression or several
#[derive(Clone, Debug, PartialEq)]
pub enum SolveInput {
    One(Operand),
    Many(Vec<Operand>),
}

/// One solution
#[derive(Clone, Debug, PartialEq)]
pub enum Solution {
    /// value of the only unknown, for expression input
    Expr(Expr),
    /// values of several unknowns, for expression input
    Map(BTreeMap<Symbol, Expr>),
    /// `symbol = value`
    Eqn(Equation),
    /// `symbol = value` for every unknown of a system
    System(Vec<Equation>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum SolveResult {
    Single(Solution),
    FiniteSet(FiniteSet<Solution>),
    List(Vec<Solution>),
}

impl SolveResult {
    /// all solutions, in order
    pub fn solutions(&self) -> Vec<Solution> {
        match self {
            SolveResult::Single(s) => vec![s.clone()],
            SolveResult::FiniteSet(set) => set.to_vec(),
            SolveResult::List(list) => list.clone(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SolveResult::Single(_) => 1,
            SolveResult::FiniteSet(set) => set.len(),
            SolveResult::List(list) => list.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Solution {
    /// solution as `(symbol, value)` rows
    fn rows(&self) -> Vec<(String, String)> {
        match self {
            Solution::Expr(e) => vec![(String::new(), e.to_string())],
            Solution::Map(map) => map
                .iter()
                .map(|(s, v)| (s.name.clone(), v.to_string()))
                .collect(),
            Solution::Eqn(eq) => vec![(eq.lhs().to_string(), eq.rhs().to_string())],
            Solution::System(eqs) => eqs
                .iter()
                .map(|eq| (eq.lhs().to_string(), eq.rhs().to_string()))
                .collect(),
        }
    }
}

impl From<Operand> for SolveInput {
    fn from(o: Operand) -> Self {
        SolveInput::One(o)
    }
}

impl From<Equation> for SolveInput {
    fn from(eq: Equation) -> Self {
        SolveInput::One(Operand::Eqn(eq))
    }
}

impl From<&Equation> for SolveInput {
    fn from(eq: &Equation) -> Self {
        SolveInput::One(Operand::Eqn(eq.clone()))
    }
}

impl From<Expr> for SolveInput {
    fn from(e: Expr) -> Self {
        SolveInput::One(Operand::Expr(e))
    }
}

impl From<Vec<Operand>> for SolveInput {
    fn from(v: Vec<Operand>) -> Self {
        SolveInput::Many(v)
    }
}

impl From<Vec<Equation>> for SolveInput {
    fn from(v: Vec<Equation>) -> Self {
        SolveInput::Many(v.into_iter().map(Operand::Eqn).collect())
    }
}

fn unknowns(symbols: &[Expr]) -> Result<Vec<Symbol>> {
    symbols
        .iter()
        .map(|s| match s {
            Expr::Var(sym) => Ok(sym.clone()),
            other => Err(AlgebraError::ValueError(format!(
                "solve: {} is not a symbol",
                other
            ))),
        })
        .collect()
}

/// Equations of one solution, in the order of `order` when every requested symbol has a
/// value
fn solution_equations(map: &SolutionMap, order: &[Symbol]) -> Vec<Equation> {
    let eqn = |s: &Symbol, v: &Expr| Equation::from_sides(Expr::Var(s.clone()), v.clone());
    if order.len() == map.len() && order.iter().all(|s| map.contains_key(s)) {
        order
            .iter()
            .filter_map(|s| map.get(s).map(|v| eqn(s, v)))
            .collect()
    } else {
        map.iter().map(|(s, v)| eqn(s, v)).collect()
    }
}

fn log_summary(solutions: &[Solution]) {
    let mut builder = Builder::default();
    builder.push_record(["#", "symbol", "value"]);
    for (i, sol) in solutions.iter().enumerate() {
        for (symbol, value) in sol.rows() {
            builder.push_record([(i + 1).to_string(), symbol, value]);
        }
    }
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    info!("\n \n SOLUTIONS \n \n {}", table);
}

/// Solves equations and/or expressions for `symbols` (every free symbol when empty).
///
/// # Examples
/// ```rust, ignore
/// let eq = Equation::new(a.clone() * x.clone().pow(2), b.clone() * x.clone() + c.clone())?;
/// let roots = solve(eq, &[x.clone()], &OutputConfig::default())?;
/// assert_eq!(roots.len(), 2);
/// ```
///
/// # Errors
/// `ValueError` when a target is not a symbol, `NotImplemented` for shapes the engine
/// cannot solve.
pub fn solve(f: impl Into<SolveInput>, symbols: &[Expr], config: &OutputConfig) -> Result<SolveResult> {
    let members = match f.into() {
        SolveInput::One(o) => vec![o],
        SolveInput::Many(v) => v,
    };
    let contains_eqn = members.iter().any(|m| m.is_equation());
    let exprs: Vec<Expr> = members
        .into_iter()
        .map(|m| match m {
            Operand::Eqn(eq) => eq.lhs().clone() - eq.rhs().clone(),
            Operand::Expr(e) => e,
        })
        .collect();
    let order = unknowns(symbols)?;
    let maps = solve_system(&exprs, &order)?;
    let solutions: Vec<Solution> = maps
        .iter()
        .map(|map| {
            if contains_eqn {
                let mut eqs = solution_equations(map, &order);
                if eqs.len() == 1 {
                    Solution::Eqn(eqs.remove(0))
                } else {
                    Solution::System(eqs)
                }
            } else if map.len() == 1 {
                match map.values().next() {
                    Some(v) => Solution::Expr(v.clone()),
                    None => Solution::Map(map.clone()),
                }
            } else {
                Solution::Map(map.clone())
            }
        })
        .collect();
    for sol in &solutions {
        match sol {
            Solution::Eqn(eq) => info!("{}", eq),
            Solution::System(eqs) => {
                for eq in eqs {
                    info!("{}", eq);
                }
            }
            Solution::Expr(e) => info!("{}", e),
            Solution::Map(map) => info!("{:?}", map),
        }
    }
    log_summary(&solutions);
    let single = solutions.len() == 1 && matches!(solutions[0], Solution::Eqn(_) | Solution::Expr(_));
    if single {
        return Ok(SolveResult::Single(solutions[0].clone()));
    }
    if config.solve_to_list {
        Ok(SolveResult::List(solutions))
    } else {
        Ok(SolveResult::FiniteSet(solutions.into_iter().collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols;
    use num_traits::Pow;

    #[test]
    fn test_quadratic_equation_has_both_roots() {
        let (a, b, c, x) = symbols!(a, b, c, x);
        let eq = Equation::new(a.clone() * x.clone().pow(2), b.clone() * x.clone() + c.clone()).unwrap();
        let res = solve(&eq, &[x.clone()], &OutputConfig::default()).unwrap();
        assert_eq!(res.len(), 2);
        let disc = (4 * a.clone() * c.clone() + b.clone().pow(2)).pow(Expr::rational(1, 2));
        let minus = ((b.clone() - disc.clone()) / (2 * a.clone())).expand();
        let plus = ((b.clone() + disc) / (2 * a.clone())).expand();
        match res {
            SolveResult::FiniteSet(set) => {
                assert!(set.contains(&Solution::Eqn(Equation::new(x.clone(), minus).unwrap())));
                assert!(set.contains(&Solution::Eqn(Equation::new(x.clone(), plus).unwrap())));
            }
            other => panic!("expected a set, got {:?}", other),
        }
    }

    #[test]
    fn test_single_solution_is_bare() {
        let (a, b, c) = symbols!(a, b, c);
        let eq = Equation::new(a.clone(), b.clone() / c.clone()).unwrap();
        let res = solve(eq, &[c.clone()], &OutputConfig::default()).unwrap();
        assert_eq!(
            res,
            SolveResult::Single(Solution::Eqn(Equation::new(c, b / a).unwrap()))
        );
    }

    #[test]
    fn test_expression_input_returns_values() {
        let x = symbols!(x);
        let res = solve(x.clone().pow(2) - 4, &[x.clone()], &OutputConfig::default()).unwrap();
        assert_eq!(res.len(), 2);
        assert!(res.solutions().contains(&Solution::Expr(Expr::int(2))));
        assert!(res.solutions().contains(&Solution::Expr(Expr::int(-2))));
    }

    #[test]
    fn test_system_follows_requested_symbol_order() {
        let (x, y) = symbols!(x, y);
        let system = vec![
            Equation::new(x.clone() + y.clone(), 3).unwrap(),
            Equation::new(x.clone() - y.clone(), 1).unwrap(),
        ];
        let res = solve(system, &[y.clone(), x.clone()], &OutputConfig::default()).unwrap();
        assert_eq!(
            res.solutions(),
            vec![Solution::System(vec![
                Equation::new(y.clone(), 1).unwrap(),
                Equation::new(x.clone(), 2).unwrap(),
            ])]
        );
    }

    #[test]
    fn test_negative_discriminant_keeps_unit_root() {
        let x = symbols!(x);
        let eq = Equation::new(x.clone().pow(2), -1).unwrap();
        let res = solve(&eq, &[x.clone()], &OutputConfig::default()).unwrap();
        let i = Expr::int(-1).pow(Expr::rational(1, 2));
        let solutions = res.solutions();
        assert_eq!(solutions.len(), 2);
        assert!(solutions.contains(&Solution::Eqn(Equation::new(x.clone(), i.clone()).unwrap())));
        assert!(solutions.contains(&Solution::Eqn(Equation::new(x.clone(), -i).unwrap())));
        assert!(!res.to_string().contains("sqrt(-4)"));
    }

    #[test]
    fn test_solve_to_list() {
        let x = symbols!(x);
        let config = OutputConfig {
            solve_to_list: true,
            ..OutputConfig::default()
        };
        let eq = Equation::new(x.clone().pow(2), 9).unwrap();
        let res = solve(eq, &[x.clone()], &config).unwrap();
        assert!(matches!(res, SolveResult::List(ref v) if v.len() == 2));
    }

    #[test]
    fn test_invalid_targets_and_unsupported_shapes() {
        let (x, y) = symbols!(x, y);
        let eq = Equation::new(x.clone(), 1).unwrap();
        assert!(matches!(
            solve(&eq, &[x.clone() + 1], &OutputConfig::default()),
            Err(AlgebraError::ValueError(_))
        ));
        let nonlinear = vec![
            Equation::new(x.clone() * y.clone(), 1).unwrap(),
            Equation::new(x.clone() + y.clone(), 3).unwrap(),
        ];
        assert!(matches!(
            solve(nonlinear, &[x, y], &OutputConfig::default()),
            Err(AlgebraError::NotImplemented(_))
        ));
    }
}
