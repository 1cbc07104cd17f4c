use super::*;

/// Reads every document of a collection, materialized as entities of
/// `model`.
///
/// When `discriminators` is set, only documents whose stored type
/// discriminator is one of the listed values are read. This is how a query
/// over a subtype is served from the collection shared by its hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExprScan {
    pub model: ModelId,
    pub collection: String,
    pub discriminators: Option<Vec<String>>,
}

impl Expr {
    pub fn scan(model: ModelId, collection: impl Into<String>) -> Self {
        ExprScan {
            model,
            collection: collection.into(),
            discriminators: None,
        }
        .into()
    }

    pub fn is_scan(&self) -> bool {
        matches!(self, Self::Scan(_))
    }
}

impl From<ExprScan> for Expr {
    fn from(value: ExprScan) -> Self {
        Self::Scan(value)
    }
}
