use crate::algebraic_equation::*;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_errors::AlgebraError;
use crate::symbols;
use approx::assert_relative_eq;
use num_traits::Pow;

#[test]
fn test_define_equation_and_renderings() {
    let (a, b, c) = symbols!(a, b, c);
    let tsteqn = Eqn::new(a.clone(), b.clone() / c.clone()).unwrap();
    assert_eq!(tsteqn.lhs(), &a);
    assert_eq!(tsteqn.rhs(), &(b.clone() / c.clone()));
    assert_eq!(tsteqn.args(), vec![a.clone(), b.clone() / c.clone()]);
    assert_eq!(tsteqn.to_repr(), "Equation(a, b/c)");
    assert_eq!(tsteqn.to_string(), "a = b/c");
    assert_eq!(tsteqn.to_latex(), r"a=\frac{b}{c}");
    assert_eq!(tsteqn.reversed().reversed(), tsteqn);
    assert_eq!(tsteqn.swap(), Eqn::new(b.clone() / c.clone(), a.clone()).unwrap());
}

#[test]
fn test_equation_from_strings_and_numbers() {
    let (a, b) = symbols!(a, b);
    let eq = Eqn::new("a", "2*b").unwrap();
    assert_eq!(eq, Eqn::new(a, 2 * b).unwrap());
    let numeric = Eqn::new(1, 0).unwrap();
    assert!(numeric.check() == false);
    assert!(matches!(Eqn::new("a +", "b"), Err(AlgebraError::Parse(_))));
}

#[test]
fn test_arithmetic_with_expressions_and_equations() {
    let (a, b, c) = symbols!(a, b, c);
    let tsteqn = Eqn::new(a.clone(), b.clone() / c.clone()).unwrap();
    assert_eq!(&tsteqn * &c, Eqn::new(a.clone() * c.clone(), b.clone()).unwrap());
    assert_eq!(
        c.clone() / &tsteqn,
        Eqn::new(c.clone() / a.clone(), c.clone().pow(2) / b.clone()).unwrap()
    );
    assert_eq!(
        &tsteqn - &tsteqn,
        Eqn::new(Expr::zero(), Expr::zero()).unwrap()
    );
    let squared = tsteqn.clone().pow(2);
    assert_eq!(
        squared,
        Eqn::new(a.clone().pow(2), b.clone().pow(2) / c.clone().pow(2)).unwrap()
    );
}

#[test]
fn test_ideal_gas_law_manipulation() {
    let (p, V, n, R, T) = symbols!(p, V, n, R, T);
    let ideal = Eqn::new(p.clone() * V.clone(), n.clone() * R.clone() * T.clone()).unwrap();
    assert_eq!(
        &ideal / &V,
        Eqn::new(p.clone(), n.clone() * R.clone() * T.clone() / V.clone()).unwrap()
    );
    let for_t = &ideal / (n.clone() * R.clone());
    assert_eq!(for_t.reversed().lhs(), &T);
    let solved = solve(&ideal, &[T.clone()], &OutputConfig::default()).unwrap();
    assert_eq!(
        solved,
        SolveResult::Single(Solution::Eqn(
            Eqn::new(T.clone(), p.clone() * V.clone() / (n.clone() * R.clone())).unwrap()
        ))
    );
}

#[test]
fn test_functions_split_over_sides() {
    let (a, b, c) = symbols!(a, b, c);
    let tsteqn = Eqn::new(a.clone(), b.clone() / c.clone()).unwrap();
    assert_eq!(
        sin(&tsteqn),
        Eqn::new(sin(&a), sin(b.clone() / c.clone())).unwrap()
    );
    assert_eq!(
        log(exp(&tsteqn)),
        Eqn::new(log(exp(&a)), log(exp(b.clone() / c.clone()))).unwrap()
    );
    assert_eq!(
        sqrt(&tsteqn),
        Eqn::new(a.clone().pow(Expr::rational(1, 2)), (b.clone() / c.clone()).pow(Expr::rational(1, 2))).unwrap()
    );
    let registry = default_registry();
    let via_registry = registry
        .call("cos", &[Operand::from(&tsteqn)])
        .unwrap();
    assert_eq!(via_registry, Operand::Eqn(cos(&tsteqn)));
    let two = registry.call(
        "atan2",
        &[Operand::from(&tsteqn), Operand::from(&tsteqn)],
    );
    assert!(matches!(two, Err(AlgebraError::NotImplemented(_))));
}

#[test]
fn test_calculus() {
    let (a, b, c) = symbols!(a, b, c);
    let q = Eqn::new(a.clone() * c.clone(), b.clone() / c.clone().pow(2)).unwrap();
    assert_eq!(
        q.diff(&[c.clone()]).unwrap(),
        Eqn::new(a.clone(), -2 * b.clone() / c.clone().pow(3)).unwrap()
    );
    assert_eq!(
        diff(&q, &[c.clone()]).unwrap(),
        Operand::Eqn(q.diff(&[c.clone()]).unwrap())
    );
    assert!(matches!(
        integrate(&q, &[b.clone()], None),
        Err(AlgebraError::ValueError(_))
    ));
    assert!(matches!(
        integrate(&q, &[b.clone()], Some("middle")),
        Err(AlgebraError::AttributeError(_))
    ));
    assert_eq!(
        integrate(&q, &[b.clone()], Some("rhs")).unwrap(),
        b.clone().pow(2) / (2 * c.clone().pow(2))
    );
    assert_eq!(
        integrate(&q, &[b.clone()], Some("lhs")).unwrap(),
        a * b * c
    );
}

#[test]
fn test_substitution() {
    let (a, b, c, x) = symbols!(a, b, c, x);
    let tsteqn = Eqn::new(a.clone(), b.clone() / c.clone()).unwrap();
    let by_pair = tsteqn
        .subs(&[SubsArg::from((b.clone(), Expr::int(2)))], false)
        .unwrap();
    assert_eq!(by_pair, Eqn::new(a.clone(), 2 / c.clone()).unwrap());

    let cdef = Eqn::new(c.clone(), 5 * x.clone()).unwrap();
    let by_eqn = tsteqn.subs(&[SubsArg::from(cdef.clone())], false).unwrap();
    assert_eq!(by_eqn, Eqn::new(a.clone(), b.clone() / (5 * x.clone())).unwrap());

    let list = tsteqn.subs(&[SubsArg::from(vec![cdef.clone()])], false);
    assert!(matches!(list, Err(AlgebraError::TypeError(_))));
    let mixed = tsteqn.subs(
        &[SubsArg::from(cdef.clone()), SubsArg::from((b.clone(), Expr::int(1)))],
        false,
    );
    assert!(matches!(mixed, Err(AlgebraError::ValueError(_))));
    let into_expr = (a.clone() + c.clone()).subs(&[SubsArg::from(cdef)], false);
    assert!(matches!(into_expr, Err(AlgebraError::ValueError(_))));
}

#[test]
fn test_apply_and_do() {
    let (a, b, c) = symbols!(a, b, c);
    let tsteqn = Eqn::new(a.clone(), b.clone() / c.clone()).unwrap();
    let lhs_only = tsteqn
        .applylhs(Closure::unary("double", |e| 2 * e.clone()), &[])
        .unwrap();
    assert_eq!(lhs_only, Eqn::new(2 * a.clone(), b.clone() / c.clone()).unwrap());
    let both = tsteqn
        .apply(ExprMethod::integrate, &[Operand::from(&b)], Side::Both)
        .unwrap();
    assert_eq!(both, tsteqn.do_().method("integrate").unwrap().call(&[Operand::from(&b)]).unwrap());
    let unknown = tsteqn.do_().method("levitate");
    assert!(matches!(unknown, Err(AlgebraError::AttributeError(_))));
}

#[test]
fn test_root_and_quadratic_solve() {
    let (a, b, c, x) = symbols!(a, b, c, x);
    let cubic = Eqn::new(a.clone(), b.clone() / c.clone()).unwrap();
    assert_eq!(root(&cubic, 3, 0).unwrap().to_string(), "a**(1/3) = (b/c)**(1/3)");
    assert!(root(&cubic, 0, 0).is_err());

    let quadratic = Eqn::new(a.clone() * x.clone().pow(2), b.clone() * x.clone() + c.clone()).unwrap();
    let roots = solve(&quadratic, &[x.clone()], &OutputConfig::default()).unwrap();
    assert_eq!(roots.len(), 2);
    for solution in roots.solutions() {
        match solution {
            Solution::Eqn(eq) => {
                assert_eq!(eq.lhs(), &x);
                let residual = quadratic
                    .subs(&[SubsArg::from((x.clone(), eq.rhs().clone()))], false)
                    .unwrap();
                let at = |e: &Expr| {
                    e.subs(
                        &[SubsArg::from(vec![
                            (a.clone(), Expr::int(2)),
                            (b.clone(), Expr::int(3)),
                            (c.clone(), Expr::int(5)),
                        ])],
                        false,
                    )
                    .unwrap()
                    .evalf(15, None)
                };
                let l = at(residual.lhs()).eval_f64().unwrap();
                let r = at(residual.rhs()).eval_f64().unwrap();
                assert_relative_eq!(l, r, epsilon = 1e-9);
            }
            other => panic!("expected an equation, got {}", other),
        }
    }
}

#[test]
fn test_printer_with_namespace_and_config_file() {
    let (a, b, c) = symbols!(a, b, c);
    let tsteqn = Eqn::new(a, b / c).unwrap();
    let mut namespace = Namespace::new();
    namespace.insert("tsteqn".to_string(), Operand::from(&tsteqn));
    let config = AlgebraConfig::from_toml_str("[output]\nhuman_text = false\n").unwrap();
    let printer = EquationPrinter::new(&config.output).with_namespace(&namespace);
    assert_eq!(printer.repr(&tsteqn), "Equation(a, b/c)");
    assert_eq!(printer.str(&tsteqn), "a = b/c          (tsteqn)");
}

#[test]
fn test_units_in_namespace() {
    let mut namespace = Namespace::new();
    let declared = units("m s", &mut namespace).unwrap();
    let speed = Eqn::new(Expr::symbol("v"), declared[0].clone() / declared[1].clone()).unwrap();
    assert_eq!(speed.free_symbols().len(), 3);
    assert!(namespace.contains_key("m"));
}
