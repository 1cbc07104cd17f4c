use super::*;

#[derive(Debug, Clone)]
pub struct Insert {
    pub collection: String,
    pub documents: Vec<Document>,
}

impl From<Insert> for Operation {
    fn from(value: Insert) -> Self {
        Self::Insert(value)
    }
}
