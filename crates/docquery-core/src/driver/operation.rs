mod delete;
pub use delete::Delete;

mod find;
pub use find::Find;

mod insert;
pub use insert::Insert;

mod update;
pub use update::Update;

use bson::Document;

#[derive(Debug, Clone)]
pub enum Operation {
    /// Delete the documents matching a filter
    Delete(Delete),

    /// Read the documents matching a filter
    Find(Find),

    /// Store new documents
    Insert(Insert),

    /// Set fields on the documents matching a filter
    Update(Update),
}

impl Operation {
    pub fn collection(&self) -> &str {
        match self {
            Self::Delete(op) => &op.collection,
            Self::Find(op) => &op.collection,
            Self::Insert(op) => &op.collection,
            Self::Update(op) => &op.collection,
        }
    }

    pub fn as_find(&self) -> Option<&Find> {
        match self {
            Self::Find(op) => Some(op),
            _ => None,
        }
    }

    pub fn is_find(&self) -> bool {
        matches!(self, Self::Find(_))
    }
}
