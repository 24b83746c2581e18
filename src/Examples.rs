//! examples of usage of RustedAlgebra
/// Equations: arithmetic, functions, solve, output
pub mod equation_examples;
