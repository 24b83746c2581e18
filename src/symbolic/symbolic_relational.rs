//! Equality assertions and finite sets.
//!
//! `Equality` is the engine's plain relational value: it states `lhs == rhs` and can be
//! asked whether the statement is decidably true or false. It has no arithmetic.
//! `FiniteSet` is an insertion-ordered collection without duplicates, the return type of
//! `solve` when more than one solution exists.

use crate::symbolic::symbolic_engine::Expr;
use itertools::Itertools;
use std::fmt;

/// `lhs == rhs` as a statement
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Equality {
    pub lhs: Expr,
    pub rhs: Expr,
}

/// Result of deciding an `Equality`
#[derive(Clone, Debug, PartialEq)]
pub enum Truth {
    True,
    False,
    /// neither provably true nor provably false
    Unevaluated(Equality),
}

impl Equality {
    pub fn new(lhs: Expr, rhs: Expr) -> Self {
        Equality { lhs, rhs }
    }

    /// Decides the statement with the simplifier: `True` when `lhs - rhs` simplifies to
    /// zero, `False` when it simplifies to a nonzero number.
    pub fn simplify(&self) -> Truth {
        let difference = (self.lhs.clone() - self.rhs.clone()).simplify();
        if difference.is_zero() {
            return Truth::True;
        }
        if difference.is_number() {
            if let Some(v) = difference.eval_f64() {
                if v != 0.0 {
                    return Truth::False;
                }
            }
        }
        Truth::Unevaluated(self.clone())
    }

    pub fn to_latex(&self) -> String {
        format!("{} = {}", self.lhs.to_latex(), self.rhs.to_latex())
    }
}

impl fmt::Display for Equality {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Eq({}, {})", self.lhs, self.rhs)
    }
}

impl Truth {
    pub fn is_true(&self) -> bool {
        matches!(self, Truth::True)
    }

    pub fn is_false(&self) -> bool {
        matches!(self, Truth::False)
    }
}

impl PartialEq<bool> for Truth {
    fn eq(&self, other: &bool) -> bool {
        match self {
            Truth::True => *other,
            Truth::False => !*other,
            Truth::Unevaluated(_) => false,
        }
    }
}

impl fmt::Display for Truth {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Truth::True => write!(f, "True"),
            Truth::False => write!(f, "False"),
            Truth::Unevaluated(eq) => write!(f, "{}", eq),
        }
    }
}

/// Unordered collection without duplicates; iteration follows insertion order
#[derive(Clone, Debug)]
pub struct FiniteSet<T> {
    items: Vec<T>,
}

impl<T: PartialEq + Clone> FiniteSet<T> {
    pub fn new(items: Vec<T>) -> Self {
        let mut set = FiniteSet { items: Vec::new() };
        for item in items {
            set.insert(item);
        }
        set
    }

    /// adds the item unless an equal one is present; true when it was added
    pub fn insert(&mut self, item: T) -> bool {
        if self.items.contains(&item) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.items.clone()
    }
}

impl<T: PartialEq> PartialEq for FiniteSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items.len() == other.items.len() && self.items.iter().all(|i| other.items.contains(i))
    }
}

impl<T: PartialEq + Clone> FromIterator<T> for FiniteSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        FiniteSet::new(iter.into_iter().collect())
    }
}

impl<T> IntoIterator for FiniteSet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;
    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<T: fmt::Display> fmt::Display for FiniteSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{{}}}", self.items.iter().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols;

    #[test]
    fn test_equality_decision() {
        let (a, b, c) = symbols!(a, b, c);
        assert!(Equality::new(Expr::int(1), Expr::zero()).simplify().is_false());
        assert!(Equality::new(Expr::int(1), Expr::zero()).simplify() == false);
        let same = Equality::new(b.clone() / c.clone() * c.clone(), b.clone());
        assert_eq!(same.simplify(), Truth::True);
        let open = Equality::new(a.clone(), b.clone() / c.clone());
        assert_eq!(open.simplify(), Truth::Unevaluated(open.clone()));
        assert_eq!(open.to_string(), "Eq(a, b/c)");
        assert_eq!(open.to_latex(), "a = \\frac{b}{c}");
    }

    #[test]
    fn test_finite_set() {
        let (a, b) = symbols!(a, b);
        let set = FiniteSet::new(vec![a.clone(), b.clone(), a.clone()]);
        assert_eq!(set.len(), 2);
        assert!(set.contains(&b));
        assert_eq!(set, FiniteSet::new(vec![b.clone(), a.clone()]));
        assert_eq!(set.to_string(), "{a, b}");
    }
}
