use super::*;

#[derive(Debug, Clone)]
pub struct Update {
    pub collection: String,
    pub filter: Document,

    /// Fields to set on each matching document
    pub set: Document,
}

impl From<Update> for Operation {
    fn from(value: Update) -> Self {
        Self::Update(value)
    }
}
