use super::*;

/// A navigation to one entity of another collection, stored as a foreign key
/// field on this model.
#[derive(Debug, Clone)]
pub struct BelongsTo {
    /// Associated model
    pub target: ModelId,

    /// The field on this model holding the target's primary key
    pub foreign_key: FieldId,
}

/// A navigation to the entities of another collection whose foreign key
/// field holds this model's primary key.
#[derive(Debug, Clone)]
pub struct HasMany {
    /// Associated model
    pub target: ModelId,

    /// The field on the target model referencing this model
    pub foreign_key: FieldId,
}

impl BelongsTo {
    pub fn target<'a>(&self, schema: &'a Schema) -> &'a Model {
        schema.model(self.target)
    }
}

impl HasMany {
    pub fn target<'a>(&self, schema: &'a Schema) -> &'a Model {
        schema.model(self.target)
    }
}
