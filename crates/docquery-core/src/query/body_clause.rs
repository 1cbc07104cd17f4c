use super::QuerySourceId;
use crate::stmt::{Direction, Expr};

/// A clause between the main from clause and the select clause.
#[derive(Debug, Clone)]
pub enum BodyClause {
    /// Keeps the items satisfying the predicate.
    Where(Expr),

    /// Sorts by each key in turn.
    OrderBy(Vec<(Expr, Direction)>),

    /// Inner join of the current items with another sequence.
    Join(JoinClause),

    /// Pairs each current item with the list of matching inner items. The
    /// clause's source is the list.
    GroupJoin(JoinClause),

    /// Flattens a collection reachable from the current items.
    AdditionalFrom { source: QuerySourceId, expr: Expr },
}

#[derive(Debug, Clone)]
pub struct JoinClause {
    /// Source declared by the clause
    pub source: QuerySourceId,

    /// For group joins, the source naming one inner item inside `inner_key`.
    /// Equal to `source` for plain joins.
    pub item: QuerySourceId,

    /// The joined sequence
    pub inner: Expr,

    /// Key of the current items
    pub outer_key: Expr,

    /// Key of the inner items, referring to `item`
    pub inner_key: Expr,
}

impl BodyClause {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Where(_) => "where",
            Self::OrderBy(_) => "orderby",
            Self::Join(_) => "join",
            Self::GroupJoin(_) => "join into",
            Self::AdditionalFrom { .. } => "from",
        }
    }
}
