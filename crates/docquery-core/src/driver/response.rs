use crate::Result;
use bson::Document;

#[derive(Debug, Clone)]
pub struct Response {
    pub rows: Rows,
}

#[derive(Debug, Clone)]
pub enum Rows {
    /// Number of documents impacted by the operation
    Count(u64),

    /// Documents read by the operation
    Documents(Vec<Document>),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
        }
    }

    pub fn documents(documents: Vec<Document>) -> Self {
        Self {
            rows: Rows::Documents(documents),
        }
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    pub fn is_documents(&self) -> bool {
        matches!(self, Self::Documents(_))
    }

    pub fn into_documents(self) -> Result<Vec<Document>> {
        match self {
            Self::Documents(documents) => Ok(documents),
            Self::Count(_) => Err(crate::Error::invalid_result(
                "expected documents, got a count",
            )),
        }
    }
}
