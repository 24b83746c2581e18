//! different utility modules used throughout the project
/// terminal and file logger setup
pub mod logger;
/// compact `name =@ lhs = rhs` input, exact integers, units
pub mod preparser;
/// LaTeX of math operations together with their results
pub mod display_math_operations;
