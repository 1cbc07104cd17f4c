use super::*;

#[derive(Debug, Clone)]
pub struct Delete {
    pub collection: String,
    pub filter: Document,
}

impl From<Delete> for Operation {
    fn from(value: Delete) -> Self {
        Self::Delete(value)
    }
}
