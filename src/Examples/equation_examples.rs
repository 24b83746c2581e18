// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
#![allow(non_snake_case)]

use crate::Utils::display_math_operations::{DmoState, diff_op, dmo};
use crate::Utils::preparser::{InputTransformers, units};
use crate::algebraic_equation::*;
use crate::symbolic::symbolic_engine::{Expr, Symbol};
use crate::symbolic::symbolic_errors::Result;
use crate::symbols;
use num_traits::Pow;

#[allow(dead_code)]
pub fn equation_examples(example: usize) -> Result<()> {
    let config = AlgebraConfig::default();
    match example {
        0 => {
            // IDEAL GAS LAW: same operation on both sides
            let (p, V, n, R, T) = symbols!(p, V, n, R, T);
            let ideal = Eqn::new(p.clone() * V.clone(), n.clone() * R.clone() * T.clone())?;
            println!("{}", ideal);
            let p_of_T = &ideal / &V;
            println!("divided by V: {}", p_of_T);
            println!("LaTeX: {}", p_of_T.to_latex());
            let T_of_p = (&ideal / (n.clone() * R.clone())).reversed();
            println!("solved by hand: {}", T_of_p);
            // numbers in
            let at_stp = T_of_p.subs(
                &[SubsArg::from(vec![
                    (p.clone(), Expr::float(101325.0)),
                    (V.clone(), Expr::float(0.0224)),
                    (n.clone(), Expr::int(1)),
                    (R.clone(), Expr::float(8.314)),
                ])],
                false,
            )?;
            println!("at STP: {}", at_stp.evalf(5, None));
        }
        1 => {
            // FUNCTIONS OF EQUATIONS AND SOLVE
            let (a, b, c, x) = symbols!(a, b, c, x);
            let quadratic = Eqn::new(a.clone() * x.clone().pow(2), b.clone() * x.clone() + c.clone())?;
            println!("quadratic: {}", quadratic);
            let roots = solve(&quadratic, &[x.clone()], &config.output)?;
            println!("roots: {}", roots);
            let printer = EquationPrinter::new(&config.output);
            println!("LaTeX: {}", printer.solutions_latex(&roots));
            let t = Eqn::new(a.clone(), b.clone() / c.clone())?;
            println!("sin: {}", sin(&t));
            println!("cube root: {}", root(&t, 3, 0)?);
            println!("d/dc: {}", t.diff(&[c.clone()])?);
            println!("integral of rhs in b: {}", integrate(&t, &[b.clone()], Some("rhs"))?);
        }
        2 => {
            // apply/do and labelled output
            let (a, b, c) = symbols!(a, b, c);
            let eq = Eqn::new(a.clone().pow(2) - 1, (2 * b.clone() + c.clone()).pow(2))?;
            let expanded = eq.do_().method("expand")?.call(&[])?;
            println!("expanded: {}", expanded);
            let factored = expanded.apply(ExprMethod::factor, &[], Side::Both)?;
            println!("factored again: {}", factored);
            let mut namespace = Namespace::new();
            namespace.insert("squares".to_string(), Operand::from(&factored));
            let printer = EquationPrinter::new(&config.output).with_namespace(&namespace);
            println!("{}", printer.str(&factored));
            println!("{}", printer.latex(&factored));
        }
        3 => {
            // compact input, units and display math operations
            let mut namespace = Namespace::new();
            units("m s", &mut namespace)?;
            let transformers = InputTransformers::new();
            let (name, value) = transformers.define("speed =@ v = m/s", &mut namespace, &config)?;
            println!("{} := {}", name, value);
            let t = Expr::parse_expression("a - b/c")?;
            println!("{}", dmo("t", &t));
            println!("{}", diff_op("t", &t, &Symbol::new("c")));
            let mut state = DmoState::new();
            println!("{}", state.dmo_auto(true));
            let (result, _) = state.integ("t", &t, &Symbol::new("c"), None);
            println!("integral: {}", result);
        }
        _ => {
            println!("example {} does not exist", example);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_examples_run() {
        for example in 0..4 {
            assert!(equation_examples(example).is_ok());
        }
    }
}
