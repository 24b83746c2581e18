#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use RustedAlgebra::symbolic::symbolic_engine::Expr;
/// let parsed_expression = Expr::parse_expression("a*x**2 - b*x - c").unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) builds canonical symbolic expressions: sums, products and powers are flattened
///    and combined on construction, so `(b/c)*c == b` holds structurally
/// 2) substitutes expressions for symbols and sub-expressions
/// 3) introspects free symbols, operation counts and numeric content
///# Example#
/// ```
/// use RustedAlgebra::symbols;
/// use RustedAlgebra::symbolic::symbolic_engine::Expr;
/// let (a, b, c) = symbols!(a, b, c);
/// let expr = a.clone() + b.clone() / c.clone();
/// assert_eq!((b.clone() / c.clone()) * c.clone(), b);
/// println!("{}", expr.subs_one(&a, &Expr::int(2)));
/// ```
pub mod symbolic_engine;
/// exact rationals and floats: the numeric leaves of an expression
pub mod numbers;
/// error taxonomy of the engine and the equation layer
pub mod symbolic_errors;
/// named functions (sin, log, Abs, Heaviside, ...): numeric evaluation and
/// automatic simplification of special values
pub mod symbolic_functions;
/// printers: str (sympy-like), repr and LaTeX
pub mod symbolic_printing;
/// symbolic differentiation
///# Example#
/// ```
/// use RustedAlgebra::symbols;
/// let (a, c) = symbols!(a, c);
/// let df = (a.clone() * c.clone() * c.clone()).diff("c");
/// println!("{}", df);
/// ```
pub mod symbolic_engine_derivatives;
/// symbolic indefinite integration of elementary expressions
pub mod symbolic_integration;
/// expand, collect, together, trigsimp, simplify and evalf
pub mod symbolic_simplify;
/// multivariate polynomials over the rationals, factorization and cancellation
pub mod symbolic_factor;
/// polynomial and linear-system solver
///# Example#
/// ```
/// use RustedAlgebra::symbols;
/// use RustedAlgebra::symbolic::symbolic_engine::Symbol;
/// use RustedAlgebra::symbolic::symbolic_solve::solve_system;
/// let x = symbols!(x);
/// let roots = solve_system(&[x.clone() * x.clone() - 4], &[Symbol::new("x")]).unwrap();
/// assert_eq!(roots.len(), 2);
/// ```
pub mod symbolic_solve;
/// the `Equality` assertion and `FiniteSet`
pub mod symbolic_relational;
/// conversion of values into expressions
pub mod symbolic_traits;
/// string and number utilities used by the parser and the factorizer
pub mod utils;
#[cfg(test)]
mod symbolic_engine_tests;
