use super::*;
use crate::query::QuerySourceId;

/// A free reference to a query source declared by a clause of the query
/// model. Compilation binds every such reference to a lambda parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprQuerySource {
    pub source: QuerySourceId,

    /// The type of one item of the source
    pub ty: Type,
}

impl Expr {
    pub fn query_source(source: QuerySourceId, ty: impl Into<Type>) -> Self {
        ExprQuerySource {
            source,
            ty: ty.into(),
        }
        .into()
    }

    pub fn is_query_source(&self) -> bool {
        matches!(self, Self::QuerySource(_))
    }

    pub fn as_query_source(&self) -> Option<&ExprQuerySource> {
        match self {
            Self::QuerySource(expr) => Some(expr),
            _ => None,
        }
    }
}

impl From<ExprQuerySource> for Expr {
    fn from(value: ExprQuerySource) -> Self {
        Self::QuerySource(value)
    }
}
