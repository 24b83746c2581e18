use crate::symbolic::symbolic_engine::{Expr, Symbol};
use crate::symbolic::symbolic_functions::SymFn;
use crate::symbols;
use num_traits::Pow;
use std::collections::BTreeMap;
//___________________________________TESTS____________________________________

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_add_assign() {
        let (x, y) = symbols!(x, y);
        let mut expr = x.clone();
        expr += y.clone();
        expr += x.clone();
        assert_eq!(expr, 2 * x + y);
    }

    #[test]
    fn test_sub_assign() {
        let x = symbols!(x);
        let mut expr = 3 * x.clone();
        expr -= x.clone();
        assert_eq!(expr, 2 * x.clone());
        expr -= 2 * x;
        assert_eq!(expr, Expr::zero());
    }

    #[test]
    fn test_mul_assign() {
        let x = symbols!(x);
        let mut expr = x.clone();
        expr *= x.clone();
        assert_eq!(expr, x.pow(2));
    }

    #[test]
    fn test_div_assign() {
        let (b, c) = symbols!(b, c);
        let mut expr = b.clone() / c.clone();
        expr /= b;
        assert_eq!(expr, c.pow(-1));
    }

    #[test]
    fn test_neg() {
        let x = symbols!(x);
        assert_eq!(-(-x.clone()), x);
        assert_eq!((-x).to_string(), "-x");
    }

    #[test]
    fn test_canonical_cancellation() {
        let (a, b, c, x) = symbols!(a, b, c, x);
        assert_eq!((b.clone() / c.clone()) * c.clone(), b);
        assert_eq!(x.clone() / x.clone(), Expr::one());
        assert_eq!(x.clone() - x.clone(), Expr::zero());
        assert_eq!(0 * x.clone(), Expr::zero());
        assert_eq!(a.clone() * c.clone() / c.clone(), a);
        assert_eq!(x.clone().pow(2) * x.clone().pow(3), x.pow(5));
    }

    #[test]
    fn test_like_terms_collection() {
        let (x, y) = symbols!(x, y);
        let e = 2 * x.clone() + 3 * y.clone() + x.clone() - y.clone();
        assert_eq!(e, 3 * x + 2 * y);
    }

    #[test]
    fn test_numeric_folding_is_exact() {
        assert_eq!(Expr::int(1) / 2, Expr::rational(1, 2));
        assert_eq!(Expr::rational(1, 3) + Expr::rational(2, 3), Expr::one());
        assert_eq!(Expr::int(2).pow(Expr::int(-2)), Expr::rational(1, 4));
        assert_eq!(Expr::int(4).pow(Expr::rational(1, 2)), Expr::int(2));
        assert_eq!(Expr::float(0.5) * 2, Expr::float(1.0));
    }

    #[test]
    fn test_mod_operator() {
        let (a, c) = symbols!(a, c);
        assert_eq!(a.clone() % c.clone(), Expr::func(SymFn::Mod, vec![a, c]));
        assert_eq!(Expr::int(7) % 3, Expr::one());
    }

    #[test]
    fn test_free_symbols_and_introspection() {
        let (a, b, c) = symbols!(a, b, c);
        let e = a.clone() + b.clone() / c.clone();
        let names: Vec<String> = e.free_symbols().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(e.contains_variable("c"));
        assert!(!e.is_number());
        assert!((Expr::pi() * 2).is_number());
        assert!(e.count_ops() > a.count_ops());
    }

    #[test]
    fn test_substitute() {
        let (a, b, c, x) = symbols!(a, b, c, x);
        let e = x.clone() + a.clone() + b.clone() + c.clone();
        assert_eq!(e.subs_one(&a, &Expr::int(2)), x.clone() + b.clone() + c.clone() + 2);
        // a sum target matches a subset of the terms
        let target = x.clone() + a.clone();
        assert_eq!(e.subs_one(&target, &Expr::int(4)), b + c + 4);
    }

    #[test]
    fn test_substitution_order() {
        let (x, y) = symbols!(x, y);
        let e = x.clone() + 2 * y.clone();
        let pairs = vec![(x.clone(), y.clone()), (y.clone(), x.clone())];
        assert_eq!(e.subs_pairs(&pairs, false), 3 * x.clone());
        assert_eq!(e.subs_pairs(&pairs, true), y + 2 * x);
    }

    #[test]
    fn test_substitution_map_is_sorted_by_complexity() {
        let (a, x) = symbols!(a, x);
        let mut map = BTreeMap::new();
        map.insert(a.clone(), Expr::int(1));
        map.insert(x.clone() + a.clone(), Expr::int(4));
        let sorted = Expr::sort_substitution_map(&map);
        assert_eq!(sorted[0].0, x + a.clone());
        assert_eq!(sorted[1].0, a);
    }

    #[test]
    fn test_set_variable() {
        let (x, y) = symbols!(x, y);
        let e = x.clone() * y.clone() + 1;
        let mut values = BTreeMap::new();
        values.insert("x".to_string(), 2.0);
        let partial = e.set_variable_from_map(&values);
        assert_eq!(partial, 2.0 * y + 1);
    }

    #[test]
    fn test_diff() {
        let (a, b, c) = symbols!(a, b, c);
        assert_eq!((a.clone() * c.clone()).diff("c"), a);
        let e = b.clone() / c.clone().pow(2);
        assert_eq!(e.diff("c"), -2 * b / c.clone().pow(3));
        assert_eq!(Expr::func(SymFn::sin, vec![c.clone()]).diff("c"), Expr::func(SymFn::cos, vec![c]));
    }

    #[test]
    fn test_multi_diff() {
        let (x, y) = symbols!(x, y);
        let e = x.clone().pow(2) * y.clone().pow(3);
        let vars = vec![Symbol::new("x"), Symbol::new("y")];
        assert_eq!(e.diff_many(&vars, true), 6 * x.clone() * y.clone().pow(2));
        let unevaluated = e.diff_many(&vars, false);
        assert_eq!(unevaluated, Expr::derivative(e.clone(), vars));
        assert_eq!(e.diff_n("x", 2), 2 * y.pow(3));
    }

    #[test]
    fn test_integrate_power_rule() {
        let x = symbols!(x);
        assert_eq!(x.clone().pow(2).integrate("x"), x.clone().pow(3) / 3);
        assert_eq!(
            (1 / x.clone()).integrate("x"),
            Expr::func(SymFn::log, vec![x.clone()])
        );
    }

    #[test]
    fn test_numeric_evaluation() {
        let (x, y) = symbols!(x, y);
        let e = x.clone().pow(2) + Expr::func(SymFn::exp, vec![y.clone()]);
        let value = e.eval_at(&[("x", 2.0), ("y", 0.0)]);
        assert_relative_eq!(value.unwrap_or(f64::NAN), 5.0, epsilon = 1e-12);
        assert!(e.eval_at(&[("x", 2.0)]).is_none());
    }

    #[test]
    fn test_parse_and_print_round_trip() {
        let e = Expr::parse_expression("a*x**2 + b*x + c").unwrap();
        let (a, b, c, x) = symbols!(a, b, c, x);
        assert_eq!(e, a * x.clone().pow(2) + b * x + c);
        assert_eq!(e.to_string(), "a*x**2 + b*x + c");
    }

    #[test]
    fn test_expand_and_factor() {
        let x = symbols!(x);
        let square = (x.clone() + 1).pow(2);
        let expanded = square.expand();
        assert_eq!(expanded, x.clone().pow(2) + 2 * x.clone() + 1);
        assert_eq!(expanded.factor().to_string(), "(x + 1)**2");
    }

    #[test]
    fn test_symbols_macro() {
        let (x, y) = symbols!(x, y);
        assert_eq!(x, Expr::symbol("x"));
        assert_eq!(y, Expr::Var(Symbol::new("y")));
        let many = Expr::Symbols("p, q");
        assert_eq!(many, vec![Expr::symbol("p"), Expr::symbol("q")]);
    }

    #[test]
    fn test_integer_literals_mix_with_expressions() {
        let (u, x) = symbols!(u, x);
        let root = (1 - u.clone().pow(2)).pow(Expr::rational(1, 2));
        assert_eq!(
            root,
            Expr::power(Expr::one() - u.clone().pow(2), Expr::rational(1, 2))
        );
        let shifted = (x.clone() + 1).expand();
        assert_eq!(shifted, x.clone() + Expr::int(1));
        let scaled = (2 * x.clone() - 3 * u.clone()).expand();
        assert_eq!(scaled, Expr::int(2) * x.clone() - Expr::int(3) * u);
        assert_eq!((x.clone() * 2).pow(2), 4 * x.pow(2));
    }

    #[test]
    fn test_negative_base_roots_are_reduced() {
        let i = Expr::int(-1).pow(Expr::rational(1, 2));
        assert_eq!(i.to_string(), "sqrt(-1)");
        let root = Expr::int(-4).pow(Expr::rational(1, 2));
        assert_eq!(root, 2 * i.clone());
        assert_eq!(root.to_string(), "2*sqrt(-1)");
        assert_eq!(i.clone() * i, Expr::int(-1));
    }
}
