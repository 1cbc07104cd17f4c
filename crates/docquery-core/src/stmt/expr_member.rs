use super::*;

/// Reads a model field from an entity-typed expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprMember {
    /// Expression evaluating to an entity record
    pub base: Box<Expr>,

    /// The field being read
    pub field: FieldId,

    /// The field's expression type
    pub ty: Type,
}

impl Expr {
    pub fn member(base: impl Into<Expr>, field: FieldId, ty: impl Into<Type>) -> Self {
        ExprMember {
            base: Box::new(base.into()),
            field,
            ty: ty.into(),
        }
        .into()
    }

    pub fn is_member(&self) -> bool {
        matches!(self, Self::Member(_))
    }

    pub fn as_member(&self) -> Option<&ExprMember> {
        match self {
            Self::Member(member) => Some(member),
            _ => None,
        }
    }
}

impl From<ExprMember> for Expr {
    fn from(value: ExprMember) -> Self {
        Self::Member(value)
    }
}
