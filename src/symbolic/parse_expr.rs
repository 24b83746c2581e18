//! a module turns a String expression into a symbolic expression
//!
//! The text is first parsed with `nom` into a small syntax tree and then lowered to a
//! canonical `Expr`. Operator precedence, from loosest to tightest:
//!
//! | operators        | associativity |
//! |------------------|---------------|
//! | `+` `-`          | left          |
//! | `*` `/` `%`      | left          |
//! | unary `-` `+`    | prefix        |
//! | `**` `^`         | right         |
//!
//! so `-x**2` is `-(x**2)` and `2**3**2` is `2**9`.
//!
//! Integer literals behave like host-language integers unless `integers_as_exact` is set:
//! `1/2` is the float `0.5` and `2**-1` is `0.5`, while `Integer(1)/Integer(2)` and any
//! division involving a symbol stay exact.
//!
//! # Example
//! ```rust, ignore
//! use RustedAlgebra::symbolic::parse_expr::parse_expression;
//! let e = parse_expression("x**2 + sin(y)/2").unwrap();
//! assert_eq!(e.to_string(), "x**2 + sin(y)/2");
//! ```
use crate::symbolic::numbers::Number;
use crate::symbolic::symbolic_engine::{Expr, Symbol};
use crate::symbolic::symbolic_errors::{AlgebraError, Result};
use crate::symbolic::symbolic_functions::SymFn;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{multispace0, one_of},
    combinator::{not, opt, recognize},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, terminated},
};
use num::{BigInt, BigRational, Zero};
use std::collections::BTreeMap;
use std::str::FromStr;

// Intermediate syntax tree
#[derive(Debug, Clone, PartialEq)]
enum ParseNode {
    Int(BigInt),
    Float(f64),
    Name(String),
    Call(String, Vec<ParseNode>),
    Binary(BinOp, Box<ParseNode>, Box<ParseNode>),
    Neg(Box<ParseNode>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

/// Settings of a parse: integer semantics and names bound to expressions
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    pub integers_as_exact: bool,
    pub locals: BTreeMap<String, Expr>,
}

impl ParseOptions {
    pub fn exact() -> Self {
        ParseOptions {
            integers_as_exact: true,
            locals: BTreeMap::new(),
        }
    }
}

//___________________________________GRAMMAR____________________________________

fn ws<'a, O, P>(inner: P) -> impl Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>
where
    P: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}

// Identifiers start with a letter or underscore, then letters, digits, underscores
fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
    ))
    .parse(input)
}

fn digits(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_digit()).parse(input)
}

// 12, 1.5, .5, 2e-3
fn number(input: &str) -> IResult<&str, ParseNode> {
    let (rest, text) = recognize((
        alt((
            recognize(pair(digits, opt(pair(tag("."), opt(digits))))),
            recognize(pair(tag("."), digits)),
        )),
        opt((one_of("eE"), opt(one_of("+-")), digits)),
    ))
    .parse(input)?;
    let is_float = text.contains(['.', 'e', 'E']);
    let node = if is_float {
        match text.parse::<f64>() {
            Ok(v) => ParseNode::Float(v),
            Err(_) => {
                return Err(nom::Err::Failure(nom::error::Error::new(
                    input,
                    nom::error::ErrorKind::Float,
                )));
            }
        }
    } else {
        match BigInt::from_str(text) {
            Ok(v) => ParseNode::Int(v),
            Err(_) => {
                return Err(nom::Err::Failure(nom::error::Error::new(
                    input,
                    nom::error::ErrorKind::Digit,
                )));
            }
        }
    };
    Ok((rest, node))
}

fn call(input: &str) -> IResult<&str, ParseNode> {
    let (input, name) = identifier(input)?;
    let (input, args) = delimited(
        ws(tag("(")),
        separated_list0(ws(tag(",")), expr),
        ws(tag(")")),
    )
    .parse(input)?;
    Ok((input, ParseNode::Call(name.to_string(), args)))
}

fn name(input: &str) -> IResult<&str, ParseNode> {
    let (rest, id) = identifier(input)?;
    Ok((rest, ParseNode::Name(id.to_string())))
}

fn atom(input: &str) -> IResult<&str, ParseNode> {
    ws(alt((
        number,
        call,
        name,
        delimited(tag("("), expr, tag(")")),
    )))
    .parse(input)
}

fn power_op(input: &str) -> IResult<&str, &str> {
    ws(alt((tag("**"), tag("^")))).parse(input)
}

// base ** unary, right associative
fn power(input: &str) -> IResult<&str, ParseNode> {
    let (input, base) = atom(input)?;
    let (input, exponent) = opt(preceded(power_op, unary)).parse(input)?;
    Ok(match exponent {
        Some(e) => (
            input,
            ParseNode::Binary(BinOp::Pow, Box::new(base), Box::new(e)),
        ),
        None => (input, base),
    })
}

fn unary(input: &str) -> IResult<&str, ParseNode> {
    let (rest, sign) = opt(ws(one_of("+-"))).parse(input)?;
    match sign {
        Some('-') => {
            let (rest, inner) = unary(rest)?;
            Ok((rest, ParseNode::Neg(Box::new(inner))))
        }
        Some(_) => unary(rest),
        None => power(input),
    }
}

fn term_op(input: &str) -> IResult<&str, BinOp> {
    ws(alt((
        terminated(tag("*"), not(tag("*"))).map(|_| BinOp::Mul),
        tag("/").map(|_| BinOp::Div),
        tag("%").map(|_| BinOp::Mod),
    )))
    .parse(input)
}

fn term(input: &str) -> IResult<&str, ParseNode> {
    let (input, first) = unary(input)?;
    let (input, rest) = many0(pair(term_op, unary)).parse(input)?;
    Ok((input, fold_binary(first, rest)))
}

fn expr_op(input: &str) -> IResult<&str, BinOp> {
    ws(alt((
        tag("+").map(|_| BinOp::Add),
        tag("-").map(|_| BinOp::Sub),
    )))
    .parse(input)
}

fn expr(input: &str) -> IResult<&str, ParseNode> {
    let (input, first) = term(input)?;
    let (input, rest) = many0(pair(expr_op, term)).parse(input)?;
    Ok((input, fold_binary(first, rest)))
}

fn fold_binary(first: ParseNode, rest: Vec<(BinOp, ParseNode)>) -> ParseNode {
    rest.into_iter().fold(first, |acc, (op, rhs)| {
        ParseNode::Binary(op, Box::new(acc), Box::new(rhs))
    })
}

//___________________________________LOWERING____________________________________

/// lowered expression plus whether it still behaves as a host-language integer
struct Lowered {
    expr: Expr,
    host_int: bool,
}

impl Lowered {
    fn exact(expr: Expr) -> Self {
        Lowered {
            expr,
            host_int: false,
        }
    }
}

fn parse_err(msg: String) -> AlgebraError {
    AlgebraError::Parse(msg)
}

fn lower(node: &ParseNode, opts: &ParseOptions) -> Result<Lowered> {
    match node {
        ParseNode::Int(n) => Ok(Lowered {
            expr: Expr::Num(Number::from_bigint(n.clone())),
            host_int: !opts.integers_as_exact,
        }),
        ParseNode::Float(v) => Ok(Lowered::exact(Expr::float(*v))),
        ParseNode::Name(name) => Ok(Lowered::exact(lower_name(name, opts))),
        ParseNode::Neg(inner) => {
            let inner = lower(inner, opts)?;
            Ok(Lowered {
                expr: -inner.expr,
                host_int: inner.host_int,
            })
        }
        ParseNode::Call(name, args) => lower_call(name, args, opts).map(Lowered::exact),
        ParseNode::Binary(op, l, r) => {
            let l = lower(l, opts)?;
            let r = lower(r, opts)?;
            lower_binary(*op, l, r)
        }
    }
}

fn lower_name(name: &str, opts: &ParseOptions) -> Expr {
    if let Some(bound) = opts.locals.get(name) {
        return bound.clone();
    }
    match name {
        "pi" => Expr::pi(),
        "E" => Expr::E(),
        _ => Expr::symbol(name),
    }
}

fn lower_binary(op: BinOp, l: Lowered, r: Lowered) -> Result<Lowered> {
    let both_int = l.host_int && r.host_int;
    let (a, b) = (l.expr, r.expr);
    let expr = match op {
        BinOp::Add => a + b,
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        BinOp::Mod => {
            if b.is_zero() {
                return Err(parse_err("integer division or modulo by zero".to_string()));
            }
            a % b
        }
        BinOp::Div => {
            if both_int {
                let (x, y) = (a.eval_f64(), b.eval_f64());
                match (x, y) {
                    (Some(_), Some(y)) if y == 0.0 => {
                        return Err(parse_err("division by zero".to_string()));
                    }
                    (Some(x), Some(y)) => return Ok(Lowered::exact(Expr::float(x / y))),
                    _ => a / b,
                }
            } else {
                a / b
            }
        }
        BinOp::Pow => {
            if both_int && b.as_number().is_some_and(|n| n.is_negative()) {
                if let (Some(x), Some(y)) = (a.eval_f64(), b.eval_f64()) {
                    return Ok(Lowered::exact(Expr::float(x.powf(y))));
                }
            }
            Expr::power(a, b)
        }
    };
    Ok(Lowered {
        expr,
        host_int: both_int && op != BinOp::Div,
    })
}

fn integer_argument(node: &ParseNode, func: &str) -> Result<BigInt> {
    match node {
        ParseNode::Int(n) => Ok(n.clone()),
        ParseNode::Neg(inner) => integer_argument(inner, func).map(|n| -n),
        _ => Err(parse_err(format!("{}() expects an integer literal", func))),
    }
}

fn symbol_arguments(args: &[ParseNode], func: &str) -> Result<Vec<Symbol>> {
    args.iter()
        .map(|a| match a {
            ParseNode::Name(n) => Ok(Symbol::new(n)),
            _ => Err(parse_err(format!("{}() expects symbols after the expression", func))),
        })
        .collect()
}

fn lower_call(name: &str, args: &[ParseNode], opts: &ParseOptions) -> Result<Expr> {
    let lowered = |opts: &ParseOptions| -> Result<Vec<Expr>> {
        args.iter().map(|a| lower(a, opts).map(|l| l.expr)).collect()
    };
    match name {
        "Integer" if args.len() == 1 => {
            Ok(Expr::Num(Number::from_bigint(integer_argument(&args[0], name)?)))
        }
        "Rational" if args.len() == 2 => {
            let p = integer_argument(&args[0], name)?;
            let q = integer_argument(&args[1], name)?;
            if q.is_zero() {
                return Err(parse_err("Rational() with zero denominator".to_string()));
            }
            Ok(Expr::Num(Number::Rational(BigRational::new(p, q))))
        }
        "Float" if args.len() == 1 => {
            let v = lowered(opts)?[0]
                .eval_f64()
                .ok_or_else(|| parse_err("Float() expects a number".to_string()))?;
            Ok(Expr::float(v))
        }
        "sqrt" if args.len() == 1 => {
            let mut a = lowered(&ParseOptions::exact_with(opts))?;
            Ok(Expr::power(a.remove(0), Expr::rational(1, 2)))
        }
        "root" if args.len() == 2 => {
            let mut a = lowered(&ParseOptions::exact_with(opts))?;
            let n = a.remove(1);
            let x = a.remove(0);
            Ok(Expr::power(x, Expr::one() / n))
        }
        "ln" if args.len() == 1 => Ok(Expr::func(SymFn::log, lowered(opts)?)),
        "Derivative" | "Integral" if !args.is_empty() => {
            let inner = lower(&args[0], opts)?.expr;
            let vars = symbol_arguments(&args[1..], name)?;
            if name == "Derivative" {
                Ok(Expr::derivative(inner, vars))
            } else {
                Ok(Expr::integral(inner, vars))
            }
        }
        _ => {
            let f = SymFn::from_str(name)
                .map_err(|_| parse_err(format!("unknown function '{}'", name)))?;
            let args = lowered(opts)?;
            match f.arity() {
                Some(n) if n != args.len() => Err(parse_err(format!(
                    "{}() takes {} argument(s), {} given",
                    name,
                    n,
                    args.len()
                ))),
                None if args.is_empty() => Err(parse_err(format!(
                    "{}() needs at least one argument",
                    name
                ))),
                _ => Ok(Expr::func(f, args)),
            }
        }
    }
}

impl ParseOptions {
    // same locals, exact integers: the arguments of sqrt and root are exact
    fn exact_with(opts: &ParseOptions) -> ParseOptions {
        ParseOptions {
            integers_as_exact: true,
            locals: opts.locals.clone(),
        }
    }
}

//___________________________________ENTRY POINTS____________________________________

/// Parses with explicit options
pub fn parse_with_options(input: &str, opts: &ParseOptions) -> Result<Expr> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(parse_err("empty expression".to_string()));
    }
    let (rest, node) = expr(trimmed).map_err(|e| parse_err(format!("{} in '{}'", e, input)))?;
    if !rest.trim().is_empty() {
        return Err(parse_err(format!(
            "unexpected input '{}' in '{}'",
            rest.trim(),
            input
        )));
    }
    Ok(lower(&node, opts)?.expr)
}

/// Parses with host-language integer semantics (`1/2 -> 0.5`)
pub fn parse_expression(input: &str) -> Result<Expr> {
    parse_with_options(input, &ParseOptions::default())
}

/// Parses with exact integers (`1/2 -> 1/2`), the conversion used for string operands
pub fn sympify(input: &str) -> Result<Expr> {
    parse_with_options(input, &ParseOptions::exact())
}

impl Expr {
    /// Parses an expression from a string with exact integers
    pub fn parse_expression(input: &str) -> Result<Expr> {
        sympify(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::symbolic_functions::{exp, log, sin};
    use crate::symbols;
    use num_traits::Pow;

    #[test]
    fn test_parse_precedence() {
        let (x, y) = symbols!(x, y);
        assert_eq!(sympify("x + y*2").unwrap(), x.clone() + y.clone() * 2);
        assert_eq!(sympify("-x**2").unwrap(), -(x.clone().pow(2)));
        assert_eq!(sympify("2**3**2").unwrap(), Expr::int(512));
        assert_eq!(sympify("x^2").unwrap(), x.clone().pow(2));
        assert_eq!(sympify("(x + y)*(x - y)").unwrap(), (x.clone() + y.clone()) * (x.clone() - y.clone()));
        assert_eq!(sympify("x - y - 1").unwrap(), x.clone() - y.clone() - 1);
        assert_eq!(sympify("x/y/2").unwrap(), x.clone() / y.clone() / 2);
    }

    #[test]
    fn test_parse_functions_and_constants() {
        let (a, b, c, x) = symbols!(a, b, c, x);
        assert_eq!(sympify("sin(x)").unwrap(), sin(x.clone()));
        assert_eq!(sympify("ln(x)").unwrap(), log(x.clone()));
        assert_eq!(sympify("exp(log(c))").unwrap(), c.clone());
        assert_eq!(sympify("Mod(a, c)").unwrap(), a.clone() % c.clone());
        assert_eq!(sympify("a % c").unwrap(), a.clone() % c.clone());
        assert_eq!(sympify("sqrt(x)").unwrap(), x.clone().pow(Expr::rational(1, 2)));
        assert_eq!(sympify("pi").unwrap(), Expr::pi());
        assert_eq!(sympify("exp(2*x)").unwrap(), exp(2 * x.clone()));
        assert_eq!(sympify("b/c").unwrap(), b / c);
        assert_eq!(
            sympify("Derivative(a, x)").unwrap(),
            Expr::derivative(a, vec![Symbol::new("x")])
        );
    }

    #[test]
    fn test_integer_semantics() {
        let x = Expr::symbol("x");
        assert_eq!(parse_expression("1/2").unwrap(), Expr::float(0.5));
        assert_eq!(parse_expression("2**-1").unwrap(), Expr::float(0.5));
        assert_eq!(parse_expression("x/2").unwrap(), x.clone() / 2);
        assert_eq!(sympify("1/2").unwrap(), Expr::rational(1, 2));
        assert_eq!(
            parse_expression("Integer (1 )/Integer (2 )*x +0.333 *x ").unwrap(),
            x.clone() * Expr::rational(1, 2) + 0.333 * x.clone()
        );
        assert_eq!(parse_expression("Rational(3, 6)").unwrap(), Expr::rational(1, 2));
        assert_eq!(parse_expression("7 % 3").unwrap(), Expr::int(1));
    }

    #[test]
    fn test_locals() {
        let mut opts = ParseOptions::exact();
        opts.locals.insert("k".to_string(), Expr::int(3));
        let x = Expr::symbol("x");
        assert_eq!(parse_with_options("k*x", &opts).unwrap(), 3 * x);
    }

    #[test]
    fn test_invalid_expressions() {
        assert!(matches!(sympify("x +"), Err(AlgebraError::Parse(_))));
        assert!(matches!(sympify("sin(x"), Err(AlgebraError::Parse(_))));
        assert!(matches!(sympify(""), Err(AlgebraError::Parse(_))));
        assert!(matches!(sympify("foo(x)"), Err(AlgebraError::Parse(_))));
        assert!(matches!(sympify("atan2(x)"), Err(AlgebraError::Parse(_))));
        assert!(matches!(parse_expression("1/0"), Err(AlgebraError::Parse(_))));
    }
}
