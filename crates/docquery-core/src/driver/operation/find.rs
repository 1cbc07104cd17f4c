use super::*;

/// Reads documents of a collection.
///
/// The filter is a conjunction of `field: value` equalities and
/// `field: { "$in": [...] }` membership tests. An empty filter matches every
/// document.
#[derive(Debug, Clone)]
pub struct Find {
    pub collection: String,
    pub filter: Document,
}

impl Find {
    pub fn new(collection: impl Into<String>, filter: Document) -> Self {
        Self {
            collection: collection.into(),
            filter,
        }
    }
}

impl From<Find> for Operation {
    fn from(value: Find) -> Self {
        Self::Find(value)
    }
}
