//! String and LaTeX printers for symbolic expressions.
//!
//! The string form reads like ordinary computer-algebra output (`b/c`, `-2*b/c**3`,
//! `sqrt(x)`, `Mod(a, c)`, `Derivative(a, c)`), the same text is used as the code-literal
//! (repr) form. The LaTeX form is meant for typeset classroom output
//! (`\frac{b}{c}`, `x^{2}`, `\sin{\left(x \right)}`).
//!
//! Sums are printed in lexicographic monomial order with the constant term last,
//! products put symbols before functions and sums.

use crate::symbolic::numbers::Number;
use crate::symbolic::symbolic_engine::{Expr, MathConst, Symbol};
use crate::symbolic::symbolic_functions::SymFn;
use itertools::Itertools;
use num::{BigInt, One};
use std::cmp::Ordering;
use std::fmt;

const PREC_ADD: u8 = 40;
const PREC_MUL: u8 = 50;
const PREC_POW: u8 = 60;
const PREC_ATOM: u8 = 100;

const GREEK: [&str; 24] = [
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa",
    "lambda", "mu", "nu", "xi", "omicron", "pi", "rho", "sigma", "tau", "upsilon", "phi", "chi",
    "psi", "omega",
];

fn precedence(e: &Expr) -> u8 {
    match e {
        Expr::Num(n) => {
            if n.is_negative() {
                PREC_ADD
            } else if n.as_rational().is_some_and(|r| !r.is_integer()) {
                PREC_MUL
            } else {
                PREC_ATOM
            }
        }
        Expr::Constant(_) | Expr::Var(_) | Expr::Func(_, _) => PREC_ATOM,
        Expr::Derivative(_, _) | Expr::Integral(_, _) => PREC_ATOM,
        Expr::Add(_) => PREC_ADD,
        Expr::Mul(_) => {
            if e.could_extract_minus_sign() {
                PREC_ADD
            } else {
                PREC_MUL
            }
        }
        Expr::Pow(_, exp) => match exp.as_number() {
            Some(n) if n.is_negative() => PREC_MUL,
            _ if is_half(exp) => PREC_ATOM,
            _ => PREC_POW,
        },
    }
}

fn is_half(e: &Expr) -> bool {
    *e == Expr::rational(1, 2)
}

/// Puts brackets around `item` when it binds weaker than `level` (or equally, unless strict)
fn needs_parens(item: &Expr, level: u8, strict: bool) -> bool {
    let p = precedence(item);
    p < level || (!strict && p <= level)
}

fn paren_str(item: &Expr, level: u8, strict: bool) -> String {
    if needs_parens(item, level, strict) {
        format!("({})", item)
    } else {
        item.to_string()
    }
}

fn paren_latex(item: &Expr, level: u8, strict: bool) -> String {
    if needs_parens(item, level, strict) {
        format!("\\left({}\\right)", item.to_latex())
    } else {
        item.to_latex()
    }
}

//___________________________________TERM AND FACTOR ORDER____________________________________

/// generator and exponent of every non-numeric factor of a term
fn monomial(term: &Expr) -> Vec<((u8, String), f64)> {
    let factors = match term {
        Expr::Num(_) => return Vec::new(),
        Expr::Mul(v) => v.clone(),
        other => vec![other.clone()],
    };
    factors
        .iter()
        .filter(|f| f.as_number().is_none())
        .map(|f| match f {
            Expr::Pow(b, e) if e.as_number().is_some() => {
                (generator_key(b), e.as_number().map(|n| n.to_f64()).unwrap_or(1.0))
            }
            other => (generator_key(other), 1.0),
        })
        .collect()
}

fn generator_key(e: &Expr) -> (u8, String) {
    let rank = match e {
        Expr::Var(_) | Expr::Constant(_) => 0,
        Expr::Pow(_, _) => 1,
        Expr::Func(_, _) | Expr::Derivative(_, _) | Expr::Integral(_, _) => 2,
        _ => 3,
    };
    (rank, e.to_string())
}

/// Terms of a sum in print order: lexicographic in the generators, constants last
pub fn ordered_terms(terms: &[Expr]) -> Vec<Expr> {
    let monomials: Vec<Vec<((u8, String), f64)>> = terms.iter().map(monomial).collect();
    let gens: Vec<(u8, String)> = monomials
        .iter()
        .flat_map(|m| m.iter().map(|(g, _)| g.clone()))
        .sorted()
        .dedup()
        .collect();
    let keys: Vec<Vec<f64>> = monomials
        .iter()
        .map(|m| {
            gens.iter()
                .map(|g| {
                    m.iter()
                        .filter(|(mg, _)| mg == g)
                        .map(|(_, e)| *e)
                        .sum::<f64>()
                })
                .collect()
        })
        .collect();
    let mut idx: Vec<usize> = (0..terms.len()).collect();
    idx.sort_by(|&i, &j| {
        let by_degree = keys[j]
            .iter()
            .zip(keys[i].iter())
            .map(|(a, b)| a.partial_cmp(b).unwrap_or(Ordering::Equal))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal);
        by_degree.then_with(|| terms[i].to_string().cmp(&terms[j].to_string()))
    });
    idx.into_iter().map(|i| terms[i].clone()).collect()
}

fn factor_print_key(f: &Expr) -> (u8, String) {
    match f {
        Expr::Constant(_) => (0, String::new()),
        Expr::Var(s) => (1, s.name.clone()),
        Expr::Pow(b, _) if matches!(**b, Expr::Var(_) | Expr::Constant(_)) => (1, b.to_string()),
        Expr::Pow(_, _) => (2, f.to_string()),
        Expr::Func(_, _) | Expr::Derivative(_, _) | Expr::Integral(_, _) => (3, f.to_string()),
        _ => (4, f.to_string()),
    }
}

// sums keep the canonical term order, so `(a - 1)*(a + 1)`
fn factor_print_order(a: &Expr, b: &Expr) -> Ordering {
    match (a, b) {
        (Expr::Add(_), Expr::Add(_)) => a.cmp(b),
        _ => factor_print_key(a).cmp(&factor_print_key(b)),
    }
}

/// Product split into sign, numerator and denominator factors
struct MulParts {
    negative: bool,
    coeff: Number,
    numer: Vec<Expr>,
    denom: Vec<Expr>,
}

fn split_mul(factors: &[Expr]) -> MulParts {
    let (coeff, rest) = match factors.split_first() {
        Some((Expr::Num(n), rest)) => (n.clone(), rest.to_vec()),
        _ => (Number::one(), factors.to_vec()),
    };
    let negative = coeff.is_negative();
    let coeff = coeff.abs();
    let mut numer = Vec::new();
    let mut denom = Vec::new();
    for f in rest
        .into_iter()
        .sorted_by(|a, b| factor_print_order(a, b))
    {
        match &f {
            Expr::Pow(b, e) if e.could_extract_minus_sign() => {
                denom.push(Expr::power(*b.clone(), -(*e.clone())));
            }
            _ => numer.push(f),
        }
    }
    MulParts {
        negative,
        coeff,
        numer,
        denom,
    }
}

//___________________________________STRING PRINTER____________________________________

fn str_number(n: &Number) -> String {
    n.to_string()
}

fn str_mul(factors: &[Expr]) -> String {
    let parts = split_mul(factors);
    let mut numer: Vec<String> = Vec::new();
    let mut denom: Vec<String> = Vec::new();
    match &parts.coeff {
        Number::Rational(r) => {
            if !r.numer().is_one() {
                numer.push(r.numer().to_string());
            }
            if !r.denom().is_one() {
                denom.push(r.denom().to_string());
            }
        }
        Number::Float(_) => numer.push(parts.coeff.to_string()),
    }
    numer.extend(parts.numer.iter().map(|f| paren_str(f, PREC_MUL, false)));
    denom.extend(parts.denom.iter().map(|f| paren_str(f, PREC_MUL, false)));
    let sign = if parts.negative { "-" } else { "" };
    let numer = if numer.is_empty() {
        "1".to_string()
    } else {
        numer.join("*")
    };
    match denom.len() {
        0 => format!("{}{}", sign, numer),
        1 => format!("{}{}/{}", sign, numer, denom[0]),
        _ => format!("{}{}/({})", sign, numer, denom.join("*")),
    }
}

fn str_pow(base: &Expr, exp: &Expr) -> String {
    if is_half(exp) {
        return format!("sqrt({})", base);
    }
    if *exp == Expr::rational(-1, 2) {
        return format!("1/sqrt({})", base);
    }
    if *exp == Expr::int(-1) {
        return format!("1/{}", paren_str(base, PREC_MUL, false));
    }
    let exp_str = match exp {
        Expr::Num(n) if n.is_negative() || !n.is_integer() && !n.is_float() => format!("({})", n),
        _ => paren_str(exp, PREC_POW, false),
    };
    format!("{}**{}", paren_str(base, PREC_POW, false), exp_str)
}

/// `x` or `(x, n)` groups of repeated differentiation variables
fn grouped_vars(vars: &[Symbol]) -> Vec<(Symbol, usize)> {
    vars.iter()
        .chunk_by(|v| (*v).clone())
        .into_iter()
        .map(|(v, group)| (v, group.count()))
        .collect()
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Num(n) => write!(f, "{}", str_number(n)),
            Expr::Constant(MathConst::Pi) => write!(f, "pi"),
            Expr::Constant(MathConst::E) => write!(f, "E"),
            Expr::Var(s) => write!(f, "{}", s.name),
            Expr::Add(terms) => {
                let mut out = String::new();
                for (i, t) in ordered_terms(terms).iter().enumerate() {
                    let s = t.to_string();
                    if i == 0 {
                        out.push_str(&s);
                    } else if let Some(stripped) = s.strip_prefix('-') {
                        out.push_str(" - ");
                        out.push_str(stripped);
                    } else {
                        out.push_str(" + ");
                        out.push_str(&s);
                    }
                }
                write!(f, "{}", out)
            }
            Expr::Mul(factors) => write!(f, "{}", str_mul(factors)),
            Expr::Pow(b, e) => write!(f, "{}", str_pow(b, e)),
            Expr::Func(func, args) => write!(f, "{}({})", func, args.iter().join(", ")),
            Expr::Derivative(inner, vars) => {
                let vars = grouped_vars(vars)
                    .into_iter()
                    .map(|(v, n)| {
                        if n == 1 {
                            v.name
                        } else {
                            format!("({}, {})", v.name, n)
                        }
                    })
                    .join(", ");
                write!(f, "Derivative({}, {})", inner, vars)
            }
            Expr::Integral(inner, vars) => {
                write!(f, "Integral({}, {})", inner, vars.iter().map(|v| &v.name).join(", "))
            }
        }
    }
}

//___________________________________LATEX PRINTER____________________________________

/// LaTeX form of a symbol name: greek letters and `_` subscripts
pub fn latex_symbol(name: &str) -> String {
    let (head, sub) = match name.split_once('_') {
        Some((h, s)) if !h.is_empty() && !s.is_empty() => (h, Some(s)),
        _ => (name, None),
    };
    let head = if GREEK.contains(&head.to_lowercase().as_str()) {
        let mut chars = head.chars();
        match chars.next() {
            Some(c) if c.is_uppercase() => format!("\\{}{}", c, chars.as_str()),
            _ => format!("\\{}", head),
        }
    } else {
        head.to_string()
    };
    match sub {
        Some(s) => format!("{}_{{{}}}", head, latex_symbol(s)),
        None => head,
    }
}

fn latex_number(n: &Number) -> String {
    match n {
        Number::Rational(r) if !r.is_integer() => {
            let sign = if n.is_negative() { "- " } else { "" };
            let abs = n.abs();
            match abs.as_rational() {
                Some(a) => format!("{}\\frac{{{}}}{{{}}}", sign, a.numer(), a.denom()),
                None => n.to_string(),
            }
        }
        _ => n.to_string(),
    }
}

fn latex_mul(factors: &[Expr]) -> String {
    let parts = split_mul(factors);
    let mut numer: Vec<(bool, String)> = Vec::new();
    let mut denom: Vec<String> = Vec::new();
    match &parts.coeff {
        Number::Rational(r) => {
            if !r.numer().is_one() {
                numer.push((true, r.numer().to_string()));
            }
            if !r.denom().is_one() {
                denom.push(r.denom().to_string());
            }
        }
        Number::Float(_) => numer.push((true, parts.coeff.to_string())),
    }
    numer.extend(
        parts
            .numer
            .iter()
            .map(|f| (false, paren_latex(f, PREC_MUL, false))),
    );
    denom.extend(parts.denom.iter().map(|f| paren_latex(f, PREC_MUL, false)));
    let mut numer_str = String::new();
    for (i, (is_num, s)) in numer.iter().enumerate() {
        if i > 0 {
            let prev_is_num = numer[i - 1].0;
            numer_str.push_str(if *is_num && prev_is_num { " \\cdot " } else { " " });
        }
        numer_str.push_str(s);
    }
    if numer_str.is_empty() {
        numer_str.push('1');
    }
    let sign = if parts.negative { "- " } else { "" };
    if denom.is_empty() {
        format!("{}{}", sign, numer_str)
    } else {
        format!("{}\\frac{{{}}}{{{}}}", sign, numer_str, denom.join(" "))
    }
}

fn trig_latex_name(f: SymFn) -> Option<&'static str> {
    match f {
        SymFn::sin => Some("\\sin"),
        SymFn::cos => Some("\\cos"),
        SymFn::tan => Some("\\tan"),
        SymFn::cot => Some("\\cot"),
        SymFn::sec => Some("\\sec"),
        SymFn::csc => Some("\\csc"),
        SymFn::sinh => Some("\\sinh"),
        SymFn::cosh => Some("\\cosh"),
        SymFn::tanh => Some("\\tanh"),
        SymFn::coth => Some("\\coth"),
        _ => None,
    }
}

fn latex_pow(base: &Expr, exp: &Expr) -> String {
    if let Expr::Num(n) = exp {
        if n.is_negative() {
            let inverse = Expr::power(base.clone(), Expr::Num(n.neg()));
            return format!("\\frac{{1}}{{{}}}", inverse.to_latex());
        }
        if let Some(r) = n.as_rational() {
            if r.numer().is_one() && !r.is_integer() {
                let inner = base.to_latex();
                if *r.denom() == BigInt::from(2) {
                    return format!("\\sqrt{{{}}}", inner);
                }
                return format!("\\sqrt[{}]{{{}}}", r.denom(), inner);
            }
        }
    }
    if let Expr::Func(f, args) = base {
        if let (Some(name), 1) = (trig_latex_name(*f), args.len()) {
            return format!(
                "{}^{{{}}}{{\\left({} \\right)}}",
                name,
                exp.to_latex(),
                args[0].to_latex()
            );
        }
    }
    let base_str = if matches!(base, Expr::Func(_, _) | Expr::Derivative(_, _) | Expr::Integral(_, _)) {
        format!("\\left({}\\right)", base.to_latex())
    } else {
        paren_latex(base, PREC_POW, false)
    };
    format!("{}^{{{}}}", base_str, exp.to_latex())
}

fn latex_func(f: SymFn, args: &[Expr]) -> String {
    let arg_list = args.iter().map(|a| a.to_latex()).join(", ");
    if let Some(name) = trig_latex_name(f) {
        return format!("{}{{\\left({} \\right)}}", name, arg_list);
    }
    match f {
        SymFn::exp => format!("e^{{{}}}", arg_list),
        SymFn::log => format!("\\log{{\\left({} \\right)}}", arg_list),
        SymFn::Abs => format!("\\left|{{{}}}\\right|", arg_list),
        SymFn::floor => format!("\\left\\lfloor{{{}}}\\right\\rfloor", arg_list),
        SymFn::ceiling => format!("\\left\\lceil{{{}}}\\right\\rceil", arg_list),
        SymFn::factorial => format!("{}!", paren_latex(&args[0], PREC_ATOM, true)),
        SymFn::binomial => format!(
            "{{\\binom{{{}}}{{{}}}}}",
            args[0].to_latex(),
            args[1].to_latex()
        ),
        SymFn::conjugate => format!("\\overline{{{}}}", arg_list),
        SymFn::Heaviside => format!("\\theta\\left({}\\right)", arg_list),
        SymFn::DiracDelta => format!("\\delta\\left({}\\right)", arg_list),
        SymFn::Mod => format!(
            "{} \\bmod {}",
            paren_latex(&args[0], PREC_MUL, false),
            paren_latex(&args[1], PREC_MUL, false)
        ),
        SymFn::Min => format!("\\min\\left({}\\right)", arg_list),
        SymFn::Max => format!("\\max\\left({}\\right)", arg_list),
        _ => format!("\\operatorname{{{}}}{{\\left({} \\right)}}", f, arg_list),
    }
}

fn latex_derivative(inner: &Expr, vars: &[Symbol]) -> String {
    let d = if inner.free_symbols().len() > 1 {
        "\\partial"
    } else {
        "d"
    };
    let groups = grouped_vars(vars);
    let dim: usize = groups.iter().map(|(_, n)| n).sum();
    let denominator: String = groups
        .iter()
        .rev()
        .map(|(v, n)| {
            if *n == 1 {
                format!("{} {}", d, latex_symbol(&v.name))
            } else {
                format!("{} {}^{{{}}}", d, latex_symbol(&v.name), n)
            }
        })
        .collect();
    let head = if dim == 1 {
        format!("\\frac{{{}}}{{{}}}", d, denominator)
    } else {
        format!("\\frac{{{}^{{{}}}}}{{{}}}", d, dim, denominator)
    };
    format!("{} {}", head, paren_latex(inner, PREC_MUL, true))
}

fn latex_integral(inner: &Expr, vars: &[Symbol]) -> String {
    let sign = match vars.len() {
        1 => "\\int".to_string(),
        2 => "\\iint".to_string(),
        3 => "\\iiint".to_string(),
        n => "\\int".repeat(n),
    };
    let measure: String = vars
        .iter()
        .map(|v| format!("\\, d{}", latex_symbol(&v.name)))
        .collect();
    format!("{} {}{}", sign, paren_latex(inner, PREC_MUL, true), measure)
}

impl Expr {
    /// LaTeX form of the expression
    pub fn to_latex(&self) -> String {
        match self {
            Expr::Num(n) => latex_number(n),
            Expr::Constant(MathConst::Pi) => "\\pi".to_string(),
            Expr::Constant(MathConst::E) => "e".to_string(),
            Expr::Var(s) => latex_symbol(&s.name),
            Expr::Add(terms) => {
                let mut out = String::new();
                for (i, t) in ordered_terms(terms).iter().enumerate() {
                    let s = t.to_latex();
                    if i == 0 {
                        out.push_str(&s);
                    } else if let Some(stripped) =
                        s.strip_prefix("- ").or_else(|| s.strip_prefix('-'))
                    {
                        out.push_str(" - ");
                        out.push_str(stripped);
                    } else {
                        out.push_str(" + ");
                        out.push_str(&s);
                    }
                }
                out
            }
            Expr::Mul(factors) => latex_mul(factors),
            Expr::Pow(b, e) => latex_pow(b, e),
            Expr::Func(f, args) => latex_func(*f, args),
            Expr::Derivative(inner, vars) => latex_derivative(inner, vars),
            Expr::Integral(inner, vars) => latex_integral(inner, vars),
        }
    }

    /// code-literal form; identical to the string form
    pub fn to_repr(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols;
    use num_traits::Pow;

    #[test]
    fn test_str_of_quotients_and_powers() {
        let (a, b, c, x) = symbols!(a, b, c, x);
        assert_eq!((b.clone() / c.clone()).to_string(), "b/c");
        assert_eq!((-2 * b.clone() / c.clone().pow(3)).to_string(), "-2*b/c**3");
        assert_eq!(x.clone().pow(2).to_string(), "x**2");
        assert_eq!(x.clone().pow(Expr::rational(1, 2)).to_string(), "sqrt(x)");
        assert_eq!(a.clone().pow(Expr::rational(1, 3)).to_string(), "a**(1/3)");
        assert_eq!(
            (b.clone() / c.clone()).pow(Expr::rational(1, 3)).to_string(),
            "(b/c)**(1/3)"
        );
        assert_eq!((b.clone() / (c.clone() * x.clone())).to_string(), "b/(c*x)");
        assert_eq!((x.clone() / 2).to_string(), "x/2");
        assert_eq!(Expr::one() / x.clone(), x.clone().pow(-1));
        assert_eq!(x.pow(-1).to_string(), "1/x");
    }

    #[test]
    fn test_str_of_sums_orders_terms() {
        let (a, b, c, x) = symbols!(a, b, c, x);
        let e = x.clone() + b.clone() + c.clone() + 2;
        assert_eq!(e.to_string(), "b + c + x + 2");
        let e = a.clone().pow(2) - 1;
        assert_eq!(e.to_string(), "a**2 - 1");
        let e = 4 * b.clone().pow(2) + 4 * b.clone() * c.clone() + c.clone().pow(2);
        assert_eq!(e.to_string(), "4*b**2 + 4*b*c + c**2");
        assert_eq!((x.clone() - a.clone()).to_string(), "-a + x");
        let product = (x.clone() + 2) * (x.clone() - 3);
        assert_eq!(product.to_string(), "(x - 3)*(x + 2)");
        assert_eq!(((a.clone() + 1) * (a.clone() - 1)).to_string(), "(a - 1)*(a + 1)");
    }

    #[test]
    fn test_str_of_functions_and_calculus() {
        let (a, c) = symbols!(a, c);
        assert_eq!((a.clone() % c.clone()).to_string(), "Mod(a, c)");
        let d = Expr::derivative(a.clone(), vec![Symbol::new("c")]);
        assert_eq!(d.to_string(), "Derivative(a, c)");
        let d2 = Expr::derivative(a.clone(), vec![Symbol::new("c"), Symbol::new("c")]);
        assert_eq!(d2.to_string(), "Derivative(a, (c, 2))");
        assert_eq!(d.to_latex(), "\\frac{d}{d c} a");
        assert_eq!(
            Expr::integral(a, vec![Symbol::new("c")]).to_latex(),
            "\\int a\\, dc"
        );
    }

    #[test]
    fn test_latex() {
        let (b, c, x) = symbols!(b, c, x);
        assert_eq!((b.clone() / c.clone()).to_latex(), "\\frac{b}{c}");
        assert_eq!(x.clone().pow(2).to_latex(), "x^{2}");
        assert_eq!(x.clone().pow(Expr::rational(1, 2)).to_latex(), "\\sqrt{x}");
        assert_eq!(
            Expr::func(SymFn::sin, vec![x.clone()]).to_latex(),
            "\\sin{\\left(x \\right)}"
        );
        assert_eq!(
            (-2 * b.clone() / c.clone().pow(3)).to_latex(),
            "- \\frac{2 b}{c^{3}}"
        );
        assert_eq!(Expr::func(SymFn::exp, vec![x.clone()]).to_latex(), "e^{x}");
        assert_eq!(Expr::rational(1, 2).to_latex(), "\\frac{1}{2}");
        assert_eq!(latex_symbol("alpha_1"), "\\alpha_{1}");
        assert_eq!((x.clone() + 1).pow(2).to_latex(), "\\left(x + 1\\right)^{2}");
    }
}
