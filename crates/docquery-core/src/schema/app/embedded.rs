use super::*;

/// A navigation whose target documents are stored inline in the parent
/// document.
#[derive(Debug, Clone)]
pub struct Embedded {
    /// The embedded model
    pub target: ModelId,

    /// `true` when the parent stores an array of embedded documents
    pub many: bool,

    /// The target's `BelongsTo` navigation back to the embedding model, if
    /// it declares one. Populated from the in-memory parent when included.
    pub pair: Option<FieldId>,
}

impl Embedded {
    pub fn target<'a>(&self, schema: &'a Schema) -> &'a Model {
        schema.model(self.target)
    }

    pub fn expr_ty(&self) -> stmt::Type {
        if self.many {
            stmt::Type::list(self.target)
        } else {
            stmt::Type::Model(self.target)
        }
    }
}
