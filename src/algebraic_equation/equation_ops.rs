//! Arithmetic on equations.
//!
//! One equation and one expression: the expression is combined with each side,
//! `Eqn(L, R) op e == Eqn(L op e, R op e)` and `e op Eqn(L, R) == Eqn(e op L, e op R)`.
//! Two equations combine side by side, `Eqn(L1, R1) op Eqn(L2, R2) == Eqn(L1 op L2, R1 op R2)`,
//! never lhs with rhs.

use crate::algebraic_equation::equation::Equation;
use crate::symbolic::symbolic_engine::Expr;
use num_traits::Pow;
use std::ops::{Add, Div, Mul, Neg, Rem, Sub};

fn side_wise(eq: &Equation, f: impl Fn(&Expr) -> Expr) -> Equation {
    eq.map_sides(f)
}

fn pair_wise(a: &Equation, b: &Equation, f: impl Fn(&Expr, &Expr) -> Expr) -> Equation {
    Equation::from_sides(f(a.lhs(), b.lhs()), f(a.rhs(), b.rhs()))
}

macro_rules! impl_equation_binop {
    ($trait:ident, $method:ident) => {
        // Equation op Equation
        impl $trait<Equation> for Equation {
            type Output = Equation;
            fn $method(self, rhs: Equation) -> Equation {
                pair_wise(&self, &rhs, |x, y| x.clone().$method(y))
            }
        }
        impl $trait<&Equation> for Equation {
            type Output = Equation;
            fn $method(self, rhs: &Equation) -> Equation {
                pair_wise(&self, rhs, |x, y| x.clone().$method(y))
            }
        }
        impl $trait<Equation> for &Equation {
            type Output = Equation;
            fn $method(self, rhs: Equation) -> Equation {
                pair_wise(self, &rhs, |x, y| x.clone().$method(y))
            }
        }
        impl $trait<&Equation> for &Equation {
            type Output = Equation;
            fn $method(self, rhs: &Equation) -> Equation {
                pair_wise(self, rhs, |x, y| x.clone().$method(y))
            }
        }
        impl_equation_binop!(@scalar $trait, $method, Expr);
        impl_equation_binop!(@scalar $trait, $method, &Expr);
        impl_equation_binop!(@scalar $trait, $method, i64);
        impl_equation_binop!(@scalar $trait, $method, f64);
    };
    (@scalar $trait:ident, $method:ident, $t:ty) => {
        // Equation op expression
        impl $trait<$t> for Equation {
            type Output = Equation;
            fn $method(self, rhs: $t) -> Equation {
                let rhs = Expr::from(rhs);
                side_wise(&self, |side| side.clone().$method(&rhs))
            }
        }
        impl $trait<$t> for &Equation {
            type Output = Equation;
            fn $method(self, rhs: $t) -> Equation {
                let rhs = Expr::from(rhs);
                side_wise(self, |side| side.clone().$method(&rhs))
            }
        }
        // reflected: expression op Equation
        impl $trait<Equation> for $t {
            type Output = Equation;
            fn $method(self, rhs: Equation) -> Equation {
                let lhs = Expr::from(self);
                side_wise(&rhs, |side| lhs.clone().$method(side))
            }
        }
        impl $trait<&Equation> for $t {
            type Output = Equation;
            fn $method(self, rhs: &Equation) -> Equation {
                let lhs = Expr::from(self);
                side_wise(rhs, |side| lhs.clone().$method(side))
            }
        }
    };
}

impl_equation_binop!(Add, add);
impl_equation_binop!(Sub, sub);
impl_equation_binop!(Mul, mul);
impl_equation_binop!(Div, div);
impl_equation_binop!(Rem, rem);

impl Neg for Equation {
    type Output = Equation;
    fn neg(self) -> Equation {
        side_wise(&self, |side| -side)
    }
}

impl Neg for &Equation {
    type Output = Equation;
    fn neg(self) -> Equation {
        side_wise(self, |side| -side)
    }
}

//___________________________________POWERS____________________________________

impl Pow<Equation> for Equation {
    type Output = Equation;
    fn pow(self, rhs: Equation) -> Equation {
        pair_wise(&self, &rhs, |x, y| Expr::power(x.clone(), y.clone()))
    }
}

impl Pow<&Equation> for &Equation {
    type Output = Equation;
    fn pow(self, rhs: &Equation) -> Equation {
        pair_wise(self, rhs, |x, y| Expr::power(x.clone(), y.clone()))
    }
}

macro_rules! impl_equation_pow {
    ($($t:ty),*) => {
        $(
            impl Pow<$t> for Equation {
                type Output = Equation;
                fn pow(self, rhs: $t) -> Equation {
                    let exp = Expr::from(rhs);
                    side_wise(&self, |side| Expr::power(side.clone(), exp.clone()))
                }
            }
            impl Pow<$t> for &Equation {
                type Output = Equation;
                fn pow(self, rhs: $t) -> Equation {
                    let exp = Expr::from(rhs);
                    side_wise(self, |side| Expr::power(side.clone(), exp.clone()))
                }
            }
            // reflected: base ** Equation
            impl Pow<Equation> for $t {
                type Output = Equation;
                fn pow(self, rhs: Equation) -> Equation {
                    let base = Expr::from(self);
                    side_wise(&rhs, |side| Expr::power(base.clone(), side.clone()))
                }
            }
            impl Pow<&Equation> for $t {
                type Output = Equation;
                fn pow(self, rhs: &Equation) -> Equation {
                    let base = Expr::from(self);
                    side_wise(rhs, |side| Expr::power(base.clone(), side.clone()))
                }
            }
        )*
    };
}

impl_equation_pow!(Expr, &Expr, i64, f64);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols;

    fn eqn(lhs: Expr, rhs: Expr) -> Equation {
        Equation::from_sides(lhs, rhs)
    }

    #[test]
    fn test_equation_with_expression() {
        let (a, b, c) = symbols!(a, b, c);
        let eq = eqn(a.clone(), b.clone() / c.clone());
        assert_eq!(eq.clone() * c.clone(), eqn(a.clone() * c.clone(), b.clone()));
        assert_eq!(&eq + 1, eqn(a.clone() + 1, b.clone() / c.clone() + 1));
        assert_eq!(eq.clone() - c.clone(), eqn(a.clone() - c.clone(), b.clone() / c.clone() - c.clone()));
        assert_eq!(eq.clone() / 2, eqn(a.clone() / 2, b.clone() / (2 * c.clone())));
        assert_eq!(eq.clone() % c.clone(), eqn(a.clone() % c.clone(), (b.clone() / c.clone()) % c.clone()));
        assert_eq!(eq.clone().pow(2), eqn(a.clone().pow(2), b.clone().pow(2) / c.clone().pow(2)));
        assert_eq!(-eq, eqn(-a, -b / c));
    }

    #[test]
    fn test_reflected_operators() {
        let (a, b, c) = symbols!(a, b, c);
        let eq = eqn(a.clone(), b.clone() / c.clone());
        assert_eq!(
            c.clone() / eq.clone(),
            eqn(c.clone() / a.clone(), c.clone().pow(2) / b.clone())
        );
        assert_eq!(1 - eq.clone(), eqn(1 - a.clone(), 1 - b.clone() / c.clone()));
        assert_eq!(Expr::int(2).pow(&eq), eqn(Expr::int(2).pow(a.clone()), Expr::int(2).pow(b.clone() / c.clone())));
        assert_eq!(&a * &eq, eqn(a.clone().pow(2), a.clone() * eq.rhs()));
        let chained = (2 * eq.clone() - 1).expand();
        assert_eq!(chained, eqn(2 * a.clone() - 1, 2 * b.clone() / c.clone() - 1));
    }

    #[test]
    fn test_equation_with_equation_is_side_wise() {
        let (a, b, c, d) = symbols!(a, b, c, d);
        let e1 = eqn(a.clone(), b.clone());
        let e2 = eqn(c.clone(), d.clone());
        assert_eq!(&e1 + &e2, eqn(a.clone() + c.clone(), b.clone() + d.clone()));
        assert_eq!(&e1 * &e2, eqn(a.clone() * c.clone(), b.clone() * d.clone()));
        assert_eq!(e1.clone().pow(e2.clone()), eqn(a.clone().pow(c.clone()), b.clone().pow(d.clone())));
        assert_eq!(&e1 - &e1, eqn(Expr::zero(), Expr::zero()));
        let m = &e1 % &e1;
        assert_eq!(m, eqn(Expr::zero(), Expr::zero()));
    }

    #[test]
    fn test_gas_law() {
        let (p, v, n, r, t) = symbols!(p, V, n, R, T);
        let eq = eqn(p.clone() * v.clone(), n.clone() * r.clone() * t.clone());
        let divided = eq / v.clone();
        assert_eq!(divided, eqn(p, n * r * t / v));
    }
}
