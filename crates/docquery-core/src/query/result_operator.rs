use crate::schema::app::{FieldId, ModelId};
use crate::stmt::Expr;

/// An operator applied to the sequence produced by the select clause.
#[derive(Debug, Clone)]
pub enum ResultOperator {
    Take(i64),
    Skip(i64),
    First,
    FirstOrDefault,
    Single,
    SingleOrDefault,
    Any,

    /// Predicate over the main source's items
    All(Expr),

    Count,
    Distinct,

    /// Key and element selectors over the main source's items
    GroupBy { key: Expr, element: Expr },

    /// Keeps entities of the model or its subtypes.
    OfType(ModelId),

    /// Eagerly populates a navigation path of the selected entities.
    Include(Vec<FieldId>),
}

impl ResultOperator {
    pub fn is_group_by(&self) -> bool {
        matches!(self, Self::GroupBy { .. })
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All(_))
    }

    pub fn is_include(&self) -> bool {
        matches!(self, Self::Include(_))
    }
}
