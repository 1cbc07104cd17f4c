use super::{Field, FieldId, Model, ModelId};

use indexmap::IndexMap;

#[derive(Debug, Default)]
pub struct Schema {
    pub models: IndexMap<ModelId, Model>,
}

impl Schema {
    /// Get a field by ID
    pub fn field(&self, id: FieldId) -> &Field {
        self.model(id.model)
            .fields
            .get(id.index)
            .expect("invalid field ID")
    }

    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.models.values()
    }

    /// Get a model by ID
    pub fn model(&self, id: impl Into<ModelId>) -> &Model {
        self.models.get(&id.into()).expect("invalid model ID")
    }

    pub fn model_by_name(&self, name: &str) -> Option<&Model> {
        self.models().find(|model| model.name == name)
    }

    /// Returns the root of the hierarchy `id` belongs to.
    pub fn root(&self, id: impl Into<ModelId>) -> ModelId {
        let mut id = id.into();

        while let Some(parent) = self.model(id).parent {
            id = parent;
        }

        id
    }

    /// Returns `true` if `id` is `ancestor` or extends it, directly or not.
    pub fn extends(&self, id: impl Into<ModelId>, ancestor: impl Into<ModelId>) -> bool {
        let ancestor = ancestor.into();
        let mut current = Some(id.into());

        while let Some(id) = current {
            if id == ancestor {
                return true;
            }

            current = self.model(id).parent;
        }

        false
    }

    /// Returns the discriminators of `id` and every model extending it, in
    /// declaration order.
    pub fn discriminators(&self, id: impl Into<ModelId>) -> Vec<String> {
        let mut ret = vec![];
        let mut stack = vec![id.into()];

        while let Some(id) = stack.pop() {
            let model = self.model(id);
            ret.extend(model.discriminator.clone());
            stack.extend(model.children.iter().rev());
        }

        ret
    }
}
