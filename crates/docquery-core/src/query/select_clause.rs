use crate::stmt::Expr;

#[derive(Debug, Clone)]
pub struct SelectClause {
    /// The projection, referring to query sources
    pub selector: Expr,
}

impl SelectClause {
    /// Returns `true` if the selector is a bare reference to a query source.
    pub fn is_source_ref(&self) -> bool {
        self.selector.is_query_source()
    }
}
