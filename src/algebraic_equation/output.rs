//! # Rendering equations
//!
//! Three renderings of an [`Equation`]:
//! - code literal (`repr`): `Equation(a, b/c)`, or the human form when `human_text` is set;
//! - human text (`str`): `a = b/c`;
//! - LaTeX: `a=\frac{b}{c}`.
//!
//! With `label` set the printer appends the name the equation is bound to, either given
//! explicitly or looked up in a [`Namespace`]:
//! ```text
//! a = b/c          (eq1)
//! ```
//! With `show_code` set the code literal is printed first.

use crate::algebraic_equation::config::OutputConfig;
use crate::algebraic_equation::equation::{Equation, Namespace, Operand};
use crate::algebraic_equation::solve::{Solution, SolveResult};
use itertools::Itertools;
use std::fmt;

const TEXT_LABEL_GAP: &str = "          ";
const LATEX_LABEL_GAP: &str = r"\,\,\,\,\,\,\,\,\,\,";

pub struct EquationPrinter<'a> {
    config: &'a OutputConfig,
    namespace: Option<&'a Namespace>,
    label: Option<String>,
}

impl<'a> EquationPrinter<'a> {
    pub fn new(config: &'a OutputConfig) -> Self {
        EquationPrinter {
            config,
            namespace: None,
            label: None,
        }
    }

    /// look names up in `namespace`
    pub fn with_namespace(mut self, namespace: &'a Namespace) -> Self {
        self.namespace = Some(namespace);
        self
    }

    /// name to print, takes precedence over the namespace
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// `Equation(lhs, rhs)` regardless of settings
    pub fn code_literal(eq: &Equation) -> String {
        format!("Equation({}, {})", eq.lhs().to_repr(), eq.rhs().to_repr())
    }

    /// Name the equation is bound to: the explicit label, else the first name in sorted
    /// order not starting with `_` whose equation has the same code literal.
    pub fn name_of(&self, eq: &Equation) -> Option<String> {
        if let Some(label) = &self.label {
            return Some(label.clone());
        }
        let namespace = self.namespace?;
        let literal = Self::code_literal(eq);
        namespace
            .iter()
            .filter(|(name, _)| !name.starts_with('_'))
            .find_map(|(name, value)| match value {
                Operand::Eqn(bound) if Self::code_literal(bound) == literal => Some(name.clone()),
                _ => None,
            })
    }

    pub fn repr(&self, eq: &Equation) -> String {
        if self.config.human_text {
            self.str(eq)
        } else {
            Self::code_literal(eq)
        }
    }

    pub fn str(&self, eq: &Equation) -> String {
        let mut out = String::new();
        if self.config.show_code {
            out.push_str(&format!("code version: {}\n", Self::code_literal(eq)));
        }
        out.push_str(&format!("{} = {}", eq.lhs(), eq.rhs()));
        if self.config.label {
            if let Some(name) = self.name_of(eq) {
                out.push_str(&format!("{}({})", TEXT_LABEL_GAP, name));
            }
        }
        out
    }

    pub fn latex(&self, eq: &Equation) -> String {
        let mut out = String::new();
        if self.config.show_code && !self.config.human_text {
            out.push_str(&format!(
                r"\text{{code version: {}}} \newline ",
                Self::code_literal(eq)
            ));
        }
        out.push_str(&format!("{}={}", eq.lhs().to_latex(), eq.rhs().to_latex()));
        if self.config.label {
            if let Some(name) = self.name_of(eq) {
                out.push_str(&format!(r"{}(\text{{{}}})", LATEX_LABEL_GAP, name));
            }
        }
        out
    }

    fn solution_str(&self, solution: &Solution) -> String {
        match solution {
            Solution::Expr(e) => e.to_string(),
            Solution::Map(map) => format!(
                "{{{}}}",
                map.iter().map(|(s, v)| format!("{}: {}", s.name, v)).join(", ")
            ),
            Solution::Eqn(eq) => self.str(eq),
            Solution::System(eqs) => format!("[{}]", eqs.iter().map(|eq| self.str(eq)).join(", ")),
        }
    }

    fn solution_latex(&self, solution: &Solution) -> String {
        match solution {
            Solution::Expr(e) => e.to_latex(),
            Solution::Map(map) => format!(
                r"\left\{{{}\right\}}",
                map.iter()
                    .map(|(s, v)| format!("{}: {}", crate::symbolic::symbolic_printing::latex_symbol(&s.name), v.to_latex()))
                    .join(", ")
            ),
            Solution::Eqn(eq) => self.latex(eq),
            Solution::System(eqs) => format!(
                r"\left[{}\right]",
                eqs.iter().map(|eq| self.latex(eq)).join(", ")
            ),
        }
    }

    /// `{…}` for sets, `[…]` for lists, the solution itself when single
    pub fn solutions(&self, result: &SolveResult) -> String {
        match result {
            SolveResult::Single(s) => self.solution_str(s),
            SolveResult::FiniteSet(set) => {
                format!("{{{}}}", set.iter().map(|s| self.solution_str(s)).join(", "))
            }
            SolveResult::List(list) => {
                format!("[{}]", list.iter().map(|s| self.solution_str(s)).join(", "))
            }
        }
    }

    /// LaTeX of a solve result; lists are not typeset
    pub fn solutions_latex(&self, result: &SolveResult) -> String {
        match result {
            SolveResult::Single(s) => self.solution_latex(s),
            SolveResult::FiniteSet(set) => format!(
                r"\left\{{{}\right\}}",
                set.iter().map(|s| self.solution_latex(s)).join(", ")
            ),
            SolveResult::List(_) => self.solutions(result),
        }
    }
}

impl Equation {
    /// code literal `Equation(lhs, rhs)`
    pub fn to_repr(&self) -> String {
        EquationPrinter::code_literal(self)
    }

    pub fn to_latex(&self) -> String {
        EquationPrinter::new(&OutputConfig::default()).latex(self)
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", EquationPrinter::new(&OutputConfig::default()).str(self))
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let config = OutputConfig::default();
        write!(f, "{}", EquationPrinter::new(&config).solution_str(self))
    }
}

impl fmt::Display for SolveResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let config = OutputConfig::default();
        write!(f, "{}", EquationPrinter::new(&config).solutions(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::symbolic_engine::Expr;
    use crate::symbols;

    fn sample() -> Equation {
        let (a, b, c) = symbols!(a, b, c);
        Equation::new(a, b / c).unwrap()
    }

    #[test]
    fn test_three_renderings() {
        let eq = sample();
        let config = OutputConfig::default();
        let printer = EquationPrinter::new(&config);
        assert_eq!(printer.str(&eq), "a = b/c");
        assert_eq!(printer.repr(&eq), "a = b/c");
        assert_eq!(printer.latex(&eq), r"a=\frac{b}{c}");
        assert_eq!(eq.to_repr(), "Equation(a, b/c)");
        assert_eq!(eq.to_string(), "a = b/c");

        let code = OutputConfig {
            human_text: false,
            ..OutputConfig::default()
        };
        assert_eq!(EquationPrinter::new(&code).repr(&eq), "Equation(a, b/c)");
    }

    #[test]
    fn test_show_code_prefix() {
        let eq = sample();
        let config = OutputConfig {
            show_code: true,
            ..OutputConfig::default()
        };
        let printer = EquationPrinter::new(&config);
        assert_eq!(printer.str(&eq), "code version: Equation(a, b/c)\na = b/c");
        // LaTeX carries the code only when human text is off
        assert_eq!(printer.latex(&eq), r"a=\frac{b}{c}");
        let config = OutputConfig {
            show_code: true,
            human_text: false,
            ..OutputConfig::default()
        };
        assert_eq!(
            EquationPrinter::new(&config).latex(&eq),
            r"\text{code version: Equation(a, b/c)} \newline a=\frac{b}{c}"
        );
    }

    #[test]
    fn test_labels_from_namespace() {
        let eq = sample();
        let mut namespace = Namespace::new();
        namespace.insert("_".to_string(), Operand::Eqn(eq.clone()));
        namespace.insert("t".to_string(), Operand::Expr(Expr::symbol("a")));
        namespace.insert("tst".to_string(), Operand::Eqn(eq.clone()));
        namespace.insert("zz".to_string(), Operand::Eqn(eq.clone()));
        let config = OutputConfig::default();
        let printer = EquationPrinter::new(&config).with_namespace(&namespace);
        assert_eq!(printer.str(&eq), "a = b/c          (tst)");
        assert_eq!(
            printer.latex(&eq),
            r"a=\frac{b}{c}\,\,\,\,\,\,\,\,\,\,(\text{tst})"
        );

        let explicit = EquationPrinter::new(&config)
            .with_namespace(&namespace)
            .with_label("ideal");
        assert_eq!(explicit.str(&eq), "a = b/c          (ideal)");

        let unlabelled = OutputConfig {
            label: false,
            ..OutputConfig::default()
        };
        assert_eq!(
            EquationPrinter::new(&unlabelled).with_namespace(&namespace).str(&eq),
            "a = b/c"
        );
    }

    #[test]
    fn test_unbound_equation_has_no_label() {
        let (x, y) = symbols!(x, y);
        let other = Equation::new(x, y).unwrap();
        let mut namespace = Namespace::new();
        namespace.insert("tst".to_string(), Operand::Eqn(sample()));
        let config = OutputConfig::default();
        let printer = EquationPrinter::new(&config).with_namespace(&namespace);
        assert_eq!(printer.str(&other), "x = y");
    }

    #[test]
    fn test_solution_rendering() {
        let (x, y) = symbols!(x, y);
        let set = SolveResult::FiniteSet(
            vec![
                Solution::Eqn(Equation::new(x.clone(), -2).unwrap()),
                Solution::Eqn(Equation::new(x.clone(), 2).unwrap()),
            ]
            .into_iter()
            .collect(),
        );
        assert_eq!(set.to_string(), "{x = -2, x = 2}");
        let config = OutputConfig::default();
        assert_eq!(
            EquationPrinter::new(&config).solutions_latex(&set),
            r"\left\{x=-2, x=2\right\}"
        );
        let list = SolveResult::List(vec![Solution::System(vec![
            Equation::new(x, 2).unwrap(),
            Equation::new(y, 1).unwrap(),
        ])]);
        assert_eq!(list.to_string(), "[[x = 2, y = 1]]");
        assert_eq!(EquationPrinter::new(&config).solutions_latex(&list), list.to_string());
    }
}
