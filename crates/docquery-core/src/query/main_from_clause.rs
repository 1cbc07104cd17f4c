use super::QuerySourceId;
use crate::stmt::Expr;

/// The sequence a query model reads from.
#[derive(Debug, Clone)]
pub struct MainFromClause {
    pub source: QuerySourceId,

    /// Sequence expression, usually `Expr::Entities`
    pub expr: Expr,
}
