//! Display Math Operations: LaTeX of the operation performed, not only of its result.
//!
//! `diff_op("t", &t, &c)` for `t = a - b/c` gives
//! ```text
//! \frac{d}{d c} t = \frac{d}{d c} (a - \frac{b}{c}) = \frac{b}{c^{2}}
//! ```
//! [`DmoState`] holds the automatic-display switch; operations run through it log the
//! typeset operation at `info` level when display is on.
use crate::symbolic::symbolic_engine::{Expr, Symbol};
use crate::symbolic::symbolic_printing::latex_symbol;
use log::info;

/// `name\equiv <latex>`
pub fn dmo(name: &str, expr: &Expr) -> String {
    if name.is_empty() || name == expr.to_string() {
        return dmo_expr(expr);
    }
    format!(r"{}\equiv {}", latex_symbol(name), expr.to_latex())
}

pub fn dmo_expr(expr: &Expr) -> String {
    expr.to_latex()
}

/// `\frac{d}{d var} name = \frac{d}{d var} (<expr>) = <result>`
pub fn diff_op(name: &str, expr: &Expr, var: &Symbol) -> String {
    let result = expr.diff(&var.name);
    operation_latex(name, expr, &result, |inner| {
        Expr::derivative(inner, vec![var.clone()]).to_latex()
    })
}

/// `\int name\, dvar = \int (<expr>)\, dvar = <result>`
pub fn integ_op(name: &str, expr: &Expr, var: &Symbol) -> String {
    let result = expr.integrate(&var.name);
    operation_latex(name, expr, &result, |inner| {
        Expr::integral(inner, vec![var.clone()]).to_latex()
    })
}

// the operation applied to a placeholder symbol standing for the typeset operand
fn operation_latex(name: &str, expr: &Expr, result: &Expr, op: impl Fn(Expr) -> String) -> String {
    let placeholder = "OPERAND";
    let applied = op(Expr::symbol(placeholder));
    let on_expr = applied.replace(placeholder, &format!("({})", expr.to_latex()));
    let mut out = String::new();
    if !name.is_empty() && name != expr.to_string() {
        out.push_str(&applied.replace(placeholder, &latex_symbol(name)));
        out.push_str(" = ");
    }
    out.push_str(&on_expr);
    out.push_str(" = ");
    out.push_str(&result.to_latex());
    out
}

/// Automatic display switch for dmo-aware operations
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DmoState {
    auto: bool,
}

impl DmoState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dmo_auto(&mut self, status: bool) -> &'static str {
        self.auto = status;
        if status {
            "Automatic display of math operation activated for `dmo aware` operations."
        } else {
            "Automatic display of math operation deactivated."
        }
    }

    pub fn is_auto(&self) -> bool {
        self.auto
    }

    /// an explicit `display_op` overrides the automatic switch
    fn displays(&self, display_op: Option<bool>) -> bool {
        display_op.unwrap_or(self.auto)
    }

    /// Differentiates `expr`, logging the typeset operation when display is on
    pub fn diff(&self, name: &str, expr: &Expr, var: &Symbol, display_op: Option<bool>) -> (Expr, Option<String>) {
        let result = expr.diff(&var.name);
        if self.displays(display_op) {
            let shown = diff_op(name, expr, var);
            info!("$${}$$", shown);
            (result, Some(shown))
        } else {
            (result, None)
        }
    }

    pub fn integ(&self, name: &str, expr: &Expr, var: &Symbol, display_op: Option<bool>) -> (Expr, Option<String>) {
        let result = expr.integrate(&var.name);
        if self.displays(display_op) {
            let shown = integ_op(name, expr, var);
            info!("$${}$$", shown);
            (result, Some(shown))
        } else {
            (result, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols;

    #[test]
    fn test_dmo_definition() {
        let (b, c) = symbols!(b, c);
        let p = b / c;
        assert_eq!(dmo("p", &p), r"p\equiv \frac{b}{c}");
        assert_eq!(dmo("", &p), r"\frac{b}{c}");
        assert_eq!(dmo_expr(&p), r"\frac{b}{c}");
    }

    #[test]
    fn test_diff_op_shows_operation_and_result() {
        let (a, b, c) = symbols!(a, b, c);
        let t = a - b / c;
        let shown = diff_op("t", &t, &Symbol::new("c"));
        assert!(shown.starts_with(r"\frac{d}{d c} t = \frac{d}{d c} ("));
        assert!(shown.ends_with(r" = \frac{b}{c^{2}}"));
    }

    #[test]
    fn test_integ_op() {
        let x = symbols!(x);
        let shown = integ_op("f", &x, &Symbol::new("x"));
        assert_eq!(shown, r"\int f\, dx = \int (x)\, dx = \frac{x^{2}}{2}");
    }

    #[test]
    fn test_auto_switch_and_override() {
        let x = symbols!(x);
        let mut state = DmoState::new();
        let (result, shown) = state.diff("f", &x, &Symbol::new("x"), None);
        assert_eq!(result, Expr::one());
        assert!(shown.is_none());
        state.dmo_auto(true);
        assert!(state.is_auto());
        assert!(state.integ("f", &x, &Symbol::new("x"), None).1.is_some());
        assert!(state.integ("f", &x, &Symbol::new("x"), Some(false)).1.is_none());
    }
}
