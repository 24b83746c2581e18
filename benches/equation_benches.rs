use RustedAlgebra::algebraic_equation::*;
use RustedAlgebra::symbolic::symbolic_engine::Expr;
use RustedAlgebra::symbols;
use criterion::{Criterion, criterion_group, criterion_main};
use num_traits::Pow;
use std::hint::black_box;

fn bench_side_wise_algebra(c: &mut Criterion) {
    let (a, b, cc) = symbols!(a, b, c);
    let eq = Eqn::new(a.clone().pow(2) - 1, (2 * b.clone() + cc.clone()).pow(2)).unwrap();
    c.bench_function("expand + factor", |bch| {
        bch.iter(|| black_box(&eq).expand().factor())
    });
}

fn bench_quadratic_solve(c: &mut Criterion) {
    let (a, b, cc, x) = symbols!(a, b, c, x);
    let eq = Eqn::new(a.clone() * x.clone().pow(2), b.clone() * x.clone() + cc.clone()).unwrap();
    let config = OutputConfig::default();
    c.bench_function("solve quadratic", |bch| {
        bch.iter(|| solve(black_box(&eq), &[x.clone()], &config).unwrap())
    });
}

fn bench_render(c: &mut Criterion) {
    let eq = Eqn::new("p*V", "n*R*T").unwrap() / Expr::symbol("V");
    let config = OutputConfig::default();
    c.bench_function("latex", |bch| {
        bch.iter(|| EquationPrinter::new(&config).latex(black_box(&eq)))
    });
}

criterion_group!(benches, bench_side_wise_algebra, bench_quadratic_solve, bench_render);
criterion_main!(benches);
