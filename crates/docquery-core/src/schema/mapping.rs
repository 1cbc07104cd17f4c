use super::app::{FieldId, ModelId};
use indexmap::IndexMap;

/// Name of the document field holding the primary key.
pub const ID_FIELD: &str = "_id";

/// Name of the document field holding the type discriminator.
pub const DISCRIMINATOR_FIELD: &str = "_t";

/// Defines the correspondence between app-level models and documents.
#[derive(Debug, Default)]
pub struct Mapping {
    /// Mapping of each model to its documents
    pub models: IndexMap<ModelId, Model>,
}

/// How one model is stored.
#[derive(Debug, Clone)]
pub struct Model {
    /// Model identifier
    pub id: ModelId,

    /// Collection holding the model's documents. `None` for embedded models.
    pub collection: Option<String>,

    /// Document field name for each model field, by field index. Referenced
    /// navigations are not stored and map to `None`.
    pub fields: Vec<Option<String>>,
}

impl Mapping {
    pub fn model(&self, id: impl Into<ModelId>) -> &Model {
        self.models.get(&id.into()).expect("invalid model ID")
    }
}

impl Model {
    /// Returns the name of the document field storing `field`.
    pub fn field_name(&self, field: impl Into<FieldId>) -> Option<&str> {
        let field = field.into();
        debug_assert_eq!(field.model, self.id);
        self.fields.get(field.index)?.as_deref()
    }
}
