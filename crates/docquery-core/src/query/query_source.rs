use crate::stmt::{Expr, Type};
use std::fmt;

/// Identifies a source declared by a clause of a query model.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuerySourceId(pub usize);

/// An item-producing clause: the main from clause, a join, a group join or
/// an additional from clause.
#[derive(Debug, Clone)]
pub struct QuerySource {
    pub id: QuerySourceId,

    /// Name of the range variable, used for diagnostics
    pub name: String,

    /// The type of one item produced by the source
    pub item_ty: Type,
}

impl QuerySource {
    /// Returns a reference to the source's current item.
    pub fn to_expr(&self) -> Expr {
        Expr::query_source(self.id, self.item_ty.clone())
    }
}

impl fmt::Debug for QuerySourceId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "QuerySourceId({})", self.0)
    }
}
