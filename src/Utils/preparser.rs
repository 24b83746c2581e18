//! Text input for equations.
//!
//! Compact equation syntax: `name =@ lhs = rhs` is rewritten to `name = Eqn(lhs,rhs)`,
//! sides kept verbatim. [`InputTransformers`] chains the rewrites applied to incoming
//! lines, and [`InputTransformers::define`] evaluates a compact line straight into a
//! [`Namespace`].
//!
//! # Example
//! ```rust, ignore
//! let lines = vec!["eq1 =@ a + b = c/d\n".to_string()];
//! assert_eq!(equation_preparser(&lines).unwrap(), vec!["eq1 = Eqn( a + b , c/d)\n"]);
//! ```
use crate::algebraic_equation::config::AlgebraConfig;
use crate::algebraic_equation::equation::{Equation, Namespace, Operand};
use crate::symbolic::parse_expr::{ParseOptions, parse_with_options};
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_errors::{AlgebraError, Result};
use itertools::Itertools;
use log::debug;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{anychar, multispace0, one_of},
    combinator::{map, opt, recognize},
    sequence::{pair, preceded},
};
use regex::Regex;
use std::sync::OnceLock;
use strum_macros::{Display, EnumString};

const SEPARATOR_ERROR: &str = "The two sides of the equation must be separated by an \"=\" sign when using the \"=@\" special input method.";

/// true for names usable as symbols and namespace keys
pub fn is_identifier(name: &str) -> bool {
    static IDENT: OnceLock<Option<Regex>> = OnceLock::new();
    IDENT
        .get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(name))
}

/// Parts of a compact line: `(name, lhs, rhs)`, or None when the line has no `=@`
fn split_compact(line: &str) -> Result<Option<(&str, &str, &str)>> {
    let Some((name, equation)) = line.split_once("=@") else {
        return Ok(None);
    };
    let sides: Vec<&str> = equation.split('=').collect();
    if sides.len() != 2 {
        return Err(AlgebraError::ValueError(SEPARATOR_ERROR.to_string()));
    }
    let lhs = sides[0];
    let rhs = sides[1].strip_suffix('\n').unwrap_or(sides[1]);
    if lhs.trim().is_empty() || rhs.trim().is_empty() {
        return Err(AlgebraError::ValueError(SEPARATOR_ERROR.to_string()));
    }
    Ok(Some((name, lhs, rhs)))
}

/// Rewrites compact equation lines; other lines pass through unchanged
pub fn equation_preparser(lines: &[String]) -> Result<Vec<String>> {
    lines
        .iter()
        .map(|line| {
            Ok(match split_compact(line)? {
                None => line.clone(),
                Some((name, lhs, rhs)) if name.is_empty() => format!("Eqn({},{})\n", lhs, rhs),
                Some((name, lhs, rhs)) => format!("{}= Eqn({},{})\n", name, lhs, rhs),
            })
        })
        .collect()
}

//___________________________________EXACT INTEGERS____________________________________

#[derive(Debug, PartialEq)]
enum Token<'a> {
    Name(&'a str),
    Int(&'a str),
    Float(&'a str),
    Other(&'a str),
}

fn name_token(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
    ))
    .parse(input)
}

fn digits(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_digit()).parse(input)
}

fn number_token(input: &str) -> IResult<&str, Token<'_>> {
    let (rest, text) = recognize((
        alt((
            recognize(pair(digits, opt(pair(tag("."), opt(digits))))),
            recognize(pair(tag("."), digits)),
        )),
        opt((one_of("eE"), opt(one_of("+-")), digits)),
    ))
    .parse(input)?;
    if text.contains(['.', 'e', 'E']) {
        Ok((rest, Token::Float(text)))
    } else {
        Ok((rest, Token::Int(text)))
    }
}

fn token(input: &str) -> IResult<&str, Token<'_>> {
    preceded(
        multispace0,
        alt((
            number_token,
            map(name_token, Token::Name),
            map(recognize(anychar), Token::Other),
        )),
    )
    .parse(input)
}

fn tokens(line: &str) -> Vec<Token<'_>> {
    let mut out = Vec::new();
    let mut rest = line;
    while !rest.trim().is_empty() {
        match token(rest) {
            Ok((next, tok)) => {
                out.push(tok);
                rest = next;
            }
            Err(_) => break,
        }
    }
    out
}

/// Wraps every integer literal as `Integer (n )` so that integer division stays exact.
/// Names and numbers are followed by one space, other tokens are kept as is.
pub fn integers_as_exact(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| {
            tokens(line)
                .into_iter()
                .map(|tok| match tok {
                    Token::Int(n) => format!("Integer ({} )", n),
                    Token::Name(s) | Token::Float(s) => format!("{} ", s),
                    Token::Other(s) => s.to_string(),
                })
                .collect::<String>()
        })
        .join("\n")
}

//___________________________________PIPELINE____________________________________

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
pub enum InputTransformer {
    EquationPreparser,
    IntegersAsExact,
}

/// Ordered rewrites applied to incoming lines
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputTransformers {
    transformers: Vec<InputTransformer>,
}

impl Default for InputTransformers {
    fn default() -> Self {
        InputTransformers {
            transformers: vec![InputTransformer::EquationPreparser],
        }
    }
}

impl InputTransformers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, t: InputTransformer) -> bool {
        self.transformers.contains(&t)
    }

    pub fn set_integers_as_exact(&mut self, config: &mut AlgebraConfig) {
        if !self.contains(InputTransformer::IntegersAsExact) {
            self.transformers.push(InputTransformer::IntegersAsExact);
        }
        config.numerics.integers_as_exact = true;
    }

    pub fn unset_integers_as_exact(&mut self, config: &mut AlgebraConfig) {
        self.transformers.retain(|t| *t != InputTransformer::IntegersAsExact);
        config.numerics.integers_as_exact = false;
    }

    /// runs every registered rewrite in order
    pub fn transform(&self, lines: &[String]) -> Result<Vec<String>> {
        let mut current = lines.to_vec();
        for t in &self.transformers {
            current = match t {
                InputTransformer::EquationPreparser => equation_preparser(&current)?,
                InputTransformer::IntegersAsExact => integers_as_exact(&current)
                    .split('\n')
                    .map(str::to_string)
                    .collect(),
            };
        }
        Ok(current)
    }

    /// Evaluates `name =@ lhs = rhs` or `name = expr` into `namespace`.
    /// Names already bound to expressions are substituted while parsing.
    pub fn define(
        &self,
        line: &str,
        namespace: &mut Namespace,
        config: &AlgebraConfig,
    ) -> Result<(String, Operand)> {
        let opts = ParseOptions {
            integers_as_exact: config.numerics.integers_as_exact,
            locals: namespace
                .iter()
                .filter_map(|(k, v)| v.as_expr().map(|e| (k.clone(), e.clone())))
                .collect(),
        };
        let (name, value) = match split_compact(line)? {
            Some((name, lhs, rhs)) => {
                let eq = Equation::new(parse_with_options(lhs, &opts)?, parse_with_options(rhs, &opts)?)?;
                (name.trim().to_string(), Operand::Eqn(eq))
            }
            None => match line.split_once('=') {
                Some((name, rhs)) => (name.trim().to_string(), Operand::Expr(parse_with_options(rhs, &opts)?)),
                None => {
                    return Err(AlgebraError::ValueError(format!(
                        "expected `name =@ lhs = rhs` or `name = expr`, got `{}`",
                        line.trim()
                    )));
                }
            },
        };
        if name.is_empty() {
            return Ok(("_".to_string(), value));
        }
        if !is_identifier(&name) {
            return Err(AlgebraError::ValueError(format!("`{}` is not a valid name", name)));
        }
        debug!("{} := {}", name, value);
        namespace.insert(name.clone(), value.clone());
        Ok((name, value))
    }
}

/// Declares positive symbols for every name in `names` (space or comma separated) and
/// binds them in `namespace`.
pub fn units(names: &str, namespace: &mut Namespace) -> Result<Vec<Expr>> {
    let names: Vec<&str> = names
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();
    if let Some(bad) = names.iter().find(|n| !is_identifier(n)) {
        return Err(AlgebraError::ValueError(format!("`{}` is not a valid unit name", bad)));
    }
    Ok(names
        .into_iter()
        .map(|name| {
            let unit = Expr::positive_symbol(name);
            namespace.insert(name.to_string(), Operand::Expr(unit.clone()));
            unit
        })
        .collect())
}
