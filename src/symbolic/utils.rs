// the collection of utility functions: bracket checks for the parsers and integer helpers
// for exact powers and rational roots
use num::{BigInt, One, Signed, ToPrimitive, Zero};

/// trial division stops at this prime candidate
const TRIAL_DIVISION_LIMIT: u64 = 1_000_000;

/// true when the string has brackets and every one of them is closed in the right order
pub fn has_brackets(s: &str) -> bool {
    let mut stack = Vec::new();
    let mut has_brackets = false;

    for c in s.chars() {
        match c {
            '(' | '{' | '[' => {
                stack.push(c);
                has_brackets = true;
            }
            ')' => {
                if stack.pop() != Some('(') {
                    return false;
                }
                has_brackets = true
            }
            '}' => {
                if stack.pop() != Some('{') {
                    return false;
                }
                has_brackets = true;
            }
            ']' => {
                if stack.pop() != Some('[') {
                    return false;
                }
                has_brackets = true;
            }
            _ => {}
        }
    }

    has_brackets && stack.is_empty()
}

/// true when there are no brackets at all or all of them are balanced
pub fn brackets_balanced(s: &str) -> bool {
    !s.chars().any(|c| "(){}[]".contains(c)) || has_brackets(s)
}

pub fn find_char_positions(input: &str, target_char: char) -> Vec<usize> {
    input
        .char_indices()
        .filter(|(_, c)| *c == target_char)
        .map(|(i, _)| i)
        .collect()
}

// find positions of giving char that are outside round brackets only
pub fn find_char_positions_outside_brackets(s: &str, c: char) -> Vec<usize> {
    let mut depth = 0usize;
    let mut positions = Vec::new();
    for (i, ch) in s.char_indices() {
        if ch == '(' {
            depth += 1;
        } else if ch == ')' {
            depth = depth.saturating_sub(1);
        } else if ch == c && depth == 0 {
            positions.push(i);
        }
    }
    positions
}

/// Splits a non-negative integer `n` into `(outside, inside)` with `n = outside**q * inside`
/// and no prime factor of `inside` repeated `q` times: `(8, 2) -> (2, 2)`, `(12, 2) -> (2, 3)`.
pub fn extract_perfect_power(n: &BigInt, q: u32) -> (BigInt, BigInt) {
    if q < 2 || n.is_zero() || n.is_negative() {
        return (BigInt::one(), n.clone());
    }
    let mut outside = BigInt::one();
    let mut inside = BigInt::one();
    let mut rest = n.clone();
    let mut p: u64 = 2;
    while p <= TRIAL_DIVISION_LIMIT {
        let bp = BigInt::from(p);
        if &bp * &bp > rest {
            break;
        }
        let mut multiplicity = 0u32;
        while (&rest % &bp).is_zero() {
            rest /= &bp;
            multiplicity += 1;
        }
        if multiplicity > 0 {
            outside *= num::pow(bp.clone(), (multiplicity / q) as usize);
            inside *= num::pow(bp, (multiplicity % q) as usize);
        }
        p += if p == 2 { 1 } else { 2 };
    }
    if !rest.is_one() {
        let root = rest.nth_root(q);
        if num::pow(root.clone(), q as usize) == rest {
            outside *= root;
        } else {
            inside *= rest;
        }
    }
    (outside, inside)
}

/// Positive divisors of |n| in increasing order, None when |n| is too large to factor
pub fn divisors(n: &BigInt) -> Option<Vec<BigInt>> {
    let n = n.abs();
    if n.is_zero() {
        return Some(vec![]);
    }
    let limit = n.sqrt();
    if limit > BigInt::from(TRIAL_DIVISION_LIMIT) {
        return None;
    }
    let limit = limit.to_u64()?;
    let mut small = Vec::new();
    let mut large = Vec::new();
    for d in 1..=limit {
        let bd = BigInt::from(d);
        if (&n % &bd).is_zero() {
            let other = &n / &bd;
            if other != bd {
                large.push(other);
            }
            small.push(bd);
        }
    }
    large.reverse();
    small.extend(large);
    Some(small)
}

pub fn linspace(start: f64, end: f64, num_values: usize) -> Vec<f64> {
    if num_values < 2 {
        return vec![start];
    }
    let step = (end - start) / (num_values as f64 - 1.0);
    (0..num_values).map(|i| start + (i as f64 * step)).collect()
}

/// central differences of f at every point of x_values
pub fn numerical_derivative<F>(f: F, x_values: &[f64], h: f64) -> Vec<f64>
where
    F: Fn(f64) -> f64,
{
    x_values
        .iter()
        .map(|&x| (f(x + h) - f(x - h)) / (2.0 * h))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brackets() {
        assert!(has_brackets("sin(x*(y+1))"));
        assert!(!has_brackets("sin(x*(y+1)"));
        assert!(brackets_balanced("x+y"));
        assert!(!brackets_balanced("x+y)"));
        assert_eq!(find_char_positions_outside_brackets("a=f(b=c)=d", '='), vec![1, 8]);
        assert_eq!(find_char_positions("a=b=c", '='), vec![1, 3]);
    }

    #[test]
    fn test_extract_perfect_power() {
        let (o, i) = extract_perfect_power(&BigInt::from(8), 2);
        assert_eq!((o, i), (BigInt::from(2), BigInt::from(2)));
        let (o, i) = extract_perfect_power(&BigInt::from(12), 2);
        assert_eq!((o, i), (BigInt::from(2), BigInt::from(3)));
        let (o, i) = extract_perfect_power(&BigInt::from(54), 3);
        assert_eq!((o, i), (BigInt::from(3), BigInt::from(2)));
        let (o, i) = extract_perfect_power(&BigInt::from(7), 2);
        assert_eq!((o, i), (BigInt::from(1), BigInt::from(7)));
    }

    #[test]
    fn test_divisors() {
        let d: Vec<i64> = divisors(&BigInt::from(-12))
            .unwrap()
            .iter()
            .map(|x| x.to_i64().unwrap())
            .collect();
        assert_eq!(d, vec![1, 2, 3, 4, 6, 12]);
        assert_eq!(divisors(&BigInt::from(9)).unwrap().len(), 3);
    }

    #[test]
    fn test_numerical_derivative() {
        let x = linspace(0.0, 1.0, 5);
        assert_eq!(x.len(), 5);
        let d = numerical_derivative(|t| t * t, &x, 1e-5);
        assert!((d[4] - 2.0).abs() < 1e-6);
    }
}
