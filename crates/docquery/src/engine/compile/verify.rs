use docquery_core::{stmt::Expr, Result};

/// Checks that a compiled expression is fully bound.
pub(super) fn apply(expr: &Expr) -> Result<()> {
    if expr.contains_expr(Expr::is_query_source) {
        return Err(docquery_core::Error::invalid_statement(
            "compiled expression references an unbound query source",
        ));
    }

    if expr.contains_expr(Expr::is_entities) {
        return Err(docquery_core::Error::invalid_statement(
            "compiled expression reads entities not bound to a collection",
        ));
    }

    Ok(())
}
