pub mod app;

mod builder;
pub use builder::Builder;

pub mod mapping;
use mapping::Mapping;

use crate::stmt;
use app::{Field, FieldId, Model, ModelId};

#[derive(Debug)]
pub struct Schema {
    /// Application-level schema
    pub app: app::Schema,

    /// Maps the app-level schema to collections and document fields
    pub mapping: Mapping,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Get a model by ID
    pub fn model(&self, id: impl Into<ModelId>) -> &Model {
        self.app.model(id)
    }

    /// Get a field by ID
    pub fn field(&self, id: FieldId) -> &Field {
        self.app.field(id)
    }

    pub fn mapping_for(&self, id: impl Into<ModelId>) -> &mapping::Model {
        self.mapping.model(id)
    }

    /// Returns the collection storing documents of the model, or `None` for
    /// embedded models.
    pub fn collection_for(&self, id: impl Into<ModelId>) -> Option<&str> {
        self.mapping.model(id).collection.as_deref()
    }

    /// Returns the store read for all entities of `id`.
    ///
    /// Subtypes share the collection of their hierarchy root, so a read of a
    /// subtype is restricted to the discriminators of the subtype and its
    /// descendants.
    pub fn scan(&self, id: impl Into<ModelId>) -> Option<stmt::ExprScan> {
        let id = id.into();
        let model = self.model(id);
        let collection = self.collection_for(id)?;

        let discriminators = match model.parent {
            Some(_) => Some(self.app.discriminators(id)),
            None => None,
        };

        Some(stmt::ExprScan {
            model: id,
            collection: collection.to_string(),
            discriminators,
        })
    }
}
