use super::{Field, FieldId, FieldTy};
use std::fmt;

#[derive(Debug, Clone)]
pub struct Model {
    /// Uniquely identifies the model within the schema
    pub id: ModelId,

    /// Name of the model
    pub name: String,

    /// Fields contained by the model. Fields inherited from the parent model
    /// come first, at the same indices as in the parent.
    pub fields: Vec<Field>,

    /// The model this model extends
    pub parent: Option<ModelId>,

    /// Models directly extending this model
    pub children: Vec<ModelId>,

    /// Value stored in the type discriminator field for documents of this
    /// model. Only set for models that are part of a hierarchy.
    pub discriminator: Option<String>,

    /// The primary key field. Every model with its own collection has one.
    pub primary_key: Option<FieldId>,

    /// Embedded models are only stored inside other documents.
    pub embedded: bool,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub usize);

impl Model {
    pub fn field(&self, field: impl Into<FieldId>) -> &Field {
        let field_id = field.into();
        &self.fields[field_id.index]
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn primary_key_field(&self) -> Option<&Field> {
        self.primary_key.map(|id| self.field(id))
    }

    pub fn discriminator_field(&self) -> Option<&Field> {
        self.fields
            .iter()
            .find(|field| field.ty.is_discriminator())
    }

    pub fn is_embedded(&self) -> bool {
        self.embedded
    }

    /// Returns `true` if the model is part of a hierarchy sharing one
    /// collection.
    pub fn is_polymorphic(&self) -> bool {
        self.discriminator.is_some()
    }

    pub fn navigations(&self) -> impl Iterator<Item = &Field> + '_ {
        self.fields.iter().filter(|field| field.is_navigation())
    }

    pub fn primitives(&self) -> impl Iterator<Item = &Field> + '_ {
        self.fields
            .iter()
            .filter(|field| matches!(field.ty, FieldTy::Primitive(_)))
    }
}

impl ModelId {
    /// Create a `FieldId` representing the current model's field at index
    /// `index`.
    pub const fn field(self, index: usize) -> FieldId {
        FieldId { model: self, index }
    }
}

impl From<&Self> for ModelId {
    fn from(src: &Self) -> Self {
        *src
    }
}

impl From<&Model> for ModelId {
    fn from(value: &Model) -> Self {
        value.id
    }
}

impl fmt::Debug for ModelId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ModelId({})", self.0)
    }
}
