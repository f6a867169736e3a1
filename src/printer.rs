//! Debug rendering of expression trees.

use crate::ast::Expr;

/// Render `expr` in fully parenthesized prefix form, e.g. the tree for
/// `1 + 2` as `(+ 1 2)`.
///
/// Diagnostic aid only; evaluation never consults it.
pub fn render(expr: &Expr) -> String {
    match expr {
        Expr::Literal(lit) => lit.to_string(),
        Expr::Grouping(inner) => format!("(group {})", render(inner)),
        Expr::Unary(operator, rhs) => format!("({} {})", operator.lexeme, render(rhs)),
        Expr::Binary(lhs, operator, rhs) => {
            format!("({} {} {})", operator.lexeme, render(lhs), render(rhs))
        }
        Expr::Variable(name) => name.lexeme.clone(),
        Expr::Assign(name, value) => format!("(= {} {})", name.lexeme, render(value)),
    }
}
