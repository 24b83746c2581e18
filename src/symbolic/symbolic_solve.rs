//! # Symbolic Equation Solver
//!
//! Solves `expr = 0` (or a system of such expressions) for the given symbols and returns
//! one map symbol -> value per solution.
//!
//! ## Supported Shapes
//!
//! - **Univariate, degree ≤ 2**: linear solution or quadratic formula, each root expanded
//! - **Univariate, higher degree**: roots of the factors of degree ≤ 2 found by `factor`
//! - **Linear systems**: Gauss-Jordan elimination over expressions, pivot symbols are
//!   given in terms of the free ones when the system is underdetermined
//!
//! Denominators are cleared first, roots that make one of them vanish are dropped.
//! Every other shape is reported as `NotImplemented`.

use crate::symbolic::symbolic_engine::{Expr, Symbol};
use crate::symbolic::symbolic_errors::{AlgebraError, Result};
use crate::symbolic::symbolic_factor::Poly;
use log::debug;
use num::ToPrimitive;
use std::collections::BTreeMap;

/// one solution of a system
pub type SolutionMap = BTreeMap<Symbol, Expr>;

/// Solves the system `exprs = 0` for `symbols`. With no symbols given the free symbols
/// of the system are the unknowns.
pub fn solve_system(exprs: &[Expr], symbols: &[Symbol]) -> Result<Vec<SolutionMap>> {
    let symbols: Vec<Symbol> = if symbols.is_empty() {
        let mut all = std::collections::BTreeSet::new();
        for e in exprs {
            all.extend(e.free_symbols());
        }
        all.into_iter().collect()
    } else {
        symbols.to_vec()
    };
    let mut numerators = Vec::new();
    let mut denominators = Vec::new();
    for e in exprs {
        let (n, d) = e.as_numer_denom();
        let n = n.expand();
        if n.is_zero() {
            continue;
        }
        if n.is_number() && symbols.iter().all(|s| !n.contains_variable(&s.name)) {
            debug!("equation {} = 0 has no solution", e);
            return Ok(Vec::new());
        }
        numerators.push(n);
        if !d.is_number() {
            denominators.push(d);
        }
    }
    debug!(
        "solving {} equation(s) for {} unknown(s)",
        numerators.len(),
        symbols.len()
    );
    if numerators.is_empty() || symbols.is_empty() {
        return Ok(Vec::new());
    }
    let solutions = if symbols.len() == 1 {
        let sym = &symbols[0];
        let roots = solve_univariate(&numerators[0], sym)?;
        roots
            .into_iter()
            .filter(|r| {
                numerators[1..]
                    .iter()
                    .all(|other| other.subs_one(&Expr::Var(sym.clone()), r).simplify().is_zero())
            })
            .map(|r| BTreeMap::from([(sym.clone(), r)]))
            .collect()
    } else {
        solve_linear_system(&numerators, &symbols)?
    };
    Ok(solutions
        .into_iter()
        .filter(|sol| !vanishes_any(&denominators, sol))
        .collect())
}

fn vanishes_any(denominators: &[Expr], sol: &SolutionMap) -> bool {
    let pairs: Vec<(Expr, Expr)> = sol
        .iter()
        .map(|(s, v)| (Expr::Var(s.clone()), v.clone()))
        .collect();
    denominators
        .iter()
        .any(|d| d.subs_pairs(&pairs, true).simplify().is_zero())
}

/// Coefficients of the powers of `sym` in a polynomial expression, lowest degree first.
/// None when `sym` occurs other than in non-negative integer powers.
pub fn coefficients_in(expr: &Expr, sym: &Symbol) -> Option<Vec<Expr>> {
    let x = Expr::Var(sym.clone());
    let expanded = expr.expand();
    let terms = match &expanded {
        Expr::Add(terms) => terms.clone(),
        other => vec![other.clone()],
    };
    let mut by_degree: BTreeMap<usize, Vec<Expr>> = BTreeMap::new();
    for t in terms {
        let factors = match &t {
            Expr::Mul(f) => f.clone(),
            other => vec![other.clone()],
        };
        let mut degree = 0usize;
        let mut rest = Vec::new();
        for f in factors {
            if f == x {
                degree += 1;
                continue;
            }
            if let Expr::Pow(b, e) = &f {
                if **b == x {
                    degree += e.as_i64().filter(|k| *k > 0)?.to_usize()?;
                    continue;
                }
            }
            if f.has(&x) {
                return None;
            }
            rest.push(f);
        }
        by_degree.entry(degree).or_default().push(Expr::mul_many(rest));
    }
    let top = by_degree.keys().next_back().copied().unwrap_or(0);
    Some(
        (0..=top)
            .map(|k| {
                by_degree
                    .remove(&k)
                    .map(Expr::add_many)
                    .unwrap_or_else(Expr::zero)
            })
            .collect(),
    )
}

fn not_implemented(expr: &Expr, sym: &Symbol) -> AlgebraError {
    AlgebraError::NotImplemented(format!(
        "could not solve {} = 0 for {}",
        expr, sym.name
    ))
}

/// roots of a polynomial of degree ≤ 2 given by its coefficients
fn roots_up_to_quadratic(coeffs: &[Expr]) -> Option<Vec<Expr>> {
    match coeffs {
        [_] => Some(Vec::new()),
        [c, b] => Some(vec![(-c.clone() / b.clone()).cancel()]),
        [c, b, a] => {
            if c.is_zero() {
                return Some(vec![Expr::zero(), (-b.clone() / a.clone()).cancel()]);
            }
            let disc = (b.clone() * b.clone() - 4 * a.clone() * c.clone()).expand();
            if disc.is_zero() {
                return Some(vec![(-b.clone() / (2 * a.clone())).cancel()]);
            }
            let root = Expr::power(disc, Expr::rational(1, 2));
            Some(vec![
                ((-b.clone() - root.clone()) / (2 * a.clone())).expand(),
                ((-b.clone() + root) / (2 * a.clone())).expand(),
            ])
        }
        _ => None,
    }
}

fn solve_univariate(expr: &Expr, sym: &Symbol) -> Result<Vec<Expr>> {
    let coeffs = coefficients_in(expr, sym).ok_or_else(|| not_implemented(expr, sym))?;
    let mut roots = match roots_up_to_quadratic(&coeffs) {
        Some(roots) => roots,
        None => {
            let poly = Poly::from_expr(expr).ok_or_else(|| not_implemented(expr, sym))?;
            let (_, factors) = poly.factor_list();
            let mut roots = Vec::new();
            for (f, _) in factors {
                let fe = f.to_expr();
                if !fe.contains_variable(&sym.name) {
                    continue;
                }
                let fc = coefficients_in(&fe, sym).ok_or_else(|| not_implemented(expr, sym))?;
                let found = roots_up_to_quadratic(&fc).ok_or_else(|| not_implemented(expr, sym))?;
                roots.extend(found);
            }
            roots
        }
    };
    let mut unique: Vec<Expr> = Vec::new();
    for r in roots.drain(..) {
        if !unique.contains(&r) {
            unique.push(r);
        }
    }
    Ok(unique)
}

/// Gauss-Jordan elimination on the augmented matrix of a linear system
fn solve_linear_system(exprs: &[Expr], symbols: &[Symbol]) -> Result<Vec<SolutionMap>> {
    let n = symbols.len();
    let zero_pairs: Vec<(Expr, Expr)> = symbols
        .iter()
        .map(|s| (Expr::Var(s.clone()), Expr::zero()))
        .collect();
    let mut rows: Vec<Vec<Expr>> = Vec::with_capacity(exprs.len());
    for e in exprs {
        let mut row = Vec::with_capacity(n + 1);
        for s in symbols {
            let coeff = e.diff(&s.name).expand();
            if symbols.iter().any(|t| coeff.contains_variable(&t.name)) {
                return Err(AlgebraError::NotImplemented(format!(
                    "system is not linear in the unknowns: {} = 0",
                    e
                )));
            }
            row.push(coeff);
        }
        row.push((-e.subs_pairs(&zero_pairs, true)).expand());
        rows.push(row);
    }
    let mut pivots: Vec<(usize, usize)> = Vec::new();
    let mut pr = 0;
    for col in 0..n {
        let Some(found) = (pr..rows.len()).find(|r| !rows[*r][col].is_zero()) else {
            continue;
        };
        rows.swap(pr, found);
        let pivot = rows[pr][col].clone();
        for k in 0..=n {
            rows[pr][k] = (rows[pr][k].clone() / pivot.clone()).cancel();
        }
        for r in 0..rows.len() {
            if r == pr || rows[r][col].is_zero() {
                continue;
            }
            let factor = rows[r][col].clone();
            for k in 0..=n {
                rows[r][k] = (rows[r][k].clone() - factor.clone() * rows[pr][k].clone()).cancel();
            }
        }
        pivots.push((pr, col));
        pr += 1;
        if pr == rows.len() {
            break;
        }
    }
    if rows[pr..].iter().any(|row| !row[n].is_zero()) {
        debug!("linear system is inconsistent");
        return Ok(Vec::new());
    }
    let pivot_cols: Vec<usize> = pivots.iter().map(|(_, c)| *c).collect();
    let mut solution = SolutionMap::new();
    for (r, c) in &pivots {
        let mut value = rows[*r][n].clone();
        for j in (0..n).filter(|j| !pivot_cols.contains(j)) {
            value = value - rows[*r][j].clone() * Expr::Var(symbols[j].clone());
        }
        solution.insert(symbols[*c].clone(), value.cancel());
    }
    Ok(vec![solution])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols;
    use num_traits::Pow;

    fn sym(name: &str) -> Symbol {
        Symbol::new(name)
    }

    #[test]
    fn test_coefficients_in() {
        let (a, b, x) = symbols!(a, b, x);
        let e = a.clone() * x.clone().pow(2) + b.clone() * x.clone() + 3;
        assert_eq!(
            coefficients_in(&e, &sym("x")).unwrap(),
            vec![Expr::int(3), b.clone(), a.clone()]
        );
        assert!(coefficients_in(&crate::symbolic::symbolic_functions::sin(x.clone()), &sym("x")).is_none());
    }

    #[test]
    fn test_quadratic_formula() {
        let (a, b, c, x) = symbols!(a, b, c, x);
        let e = a.clone() * x.clone().pow(2) - (b.clone() * x.clone() + c.clone());
        let sols = solve_system(&[e], &[sym("x")]).unwrap();
        assert_eq!(sols.len(), 2);
        let disc = (4 * a.clone() * c.clone() + b.clone().pow(2)).pow(Expr::rational(1, 2));
        let minus = ((b.clone() - disc.clone()) / (2 * a.clone())).expand();
        let plus = ((b.clone() + disc) / (2 * a.clone())).expand();
        assert!(sols.iter().any(|s| s[&sym("x")] == minus));
        assert!(sols.iter().any(|s| s[&sym("x")] == plus));
    }

    #[test]
    fn test_numeric_roots_and_denominators() {
        let x = Expr::symbol("x");
        let sols = solve_system(&[x.clone().pow(2) - 4], &[sym("x")]).unwrap();
        let roots: Vec<Expr> = sols.iter().map(|s| s[&sym("x")].clone()).collect();
        assert_eq!(roots, vec![Expr::int(-2), Expr::int(2)]);
        // x = 1 makes the denominator vanish
        let e = (x.clone().pow(2) - 1) / (x.clone() - 1);
        let sols = solve_system(&[e], &[sym("x")]).unwrap();
        assert_eq!(sols.len(), 1);
        assert_eq!(sols[0][&sym("x")], Expr::int(-1));
        let cubic = x.clone().pow(3) - 6 * x.clone().pow(2) + 11 * x.clone() - 6;
        assert_eq!(solve_system(&[cubic], &[sym("x")]).unwrap().len(), 3);
    }

    #[test]
    fn test_solve_for_symbol_in_denominator() {
        let (a, b, c) = symbols!(a, b, c);
        let sols = solve_system(&[a.clone() - b.clone() / c.clone()], &[sym("c")]).unwrap();
        assert_eq!(sols.len(), 1);
        assert_eq!(sols[0][&sym("c")], b / a);
    }

    #[test]
    fn test_linear_system() {
        let (x, y) = symbols!(x, y);
        let sols = solve_system(
            &[x.clone() + y.clone() - 3, x.clone() - y.clone() - 1],
            &[sym("x"), sym("y")],
        )
        .unwrap();
        assert_eq!(sols.len(), 1);
        assert_eq!(sols[0][&sym("x")], Expr::int(2));
        assert_eq!(sols[0][&sym("y")], Expr::int(1));
        let inconsistent =
            solve_system(&[x.clone() + y.clone(), x.clone() + y.clone() - 1], &[sym("x"), sym("y")])
                .unwrap();
        assert!(inconsistent.is_empty());
        let nonlinear = solve_system(&[x.clone() * y.clone() - 1, x - y], &[sym("x"), sym("y")]);
        assert!(matches!(nonlinear, Err(AlgebraError::NotImplemented(_))));
    }
}
