use super::*;

/// All entities of a model, before the expression is bound to a store read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprEntities {
    pub model: ModelId,
}

impl Expr {
    pub fn entities(model: ModelId) -> Self {
        ExprEntities { model }.into()
    }

    pub fn is_entities(&self) -> bool {
        matches!(self, Self::Entities(_))
    }
}

impl From<ExprEntities> for Expr {
    fn from(value: ExprEntities) -> Self {
        Self::Entities(value)
    }
}
