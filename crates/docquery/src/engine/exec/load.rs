use crate::Db;
use docquery_core::{
    driver::operation::Find,
    schema::mapping::DISCRIMINATOR_FIELD,
    stmt::ExprScan,
    Result,
};

use bson::{doc, Document};

/// Reads the documents of one scan. Scans of a subtype only read documents
/// carrying one of the subtype's discriminators.
pub(super) async fn find(db: &Db, scan: &ExprScan) -> Result<Vec<Document>> {
    let mut filter = Document::new();

    if let Some(discriminators) = &scan.discriminators {
        filter.insert(DISCRIMINATOR_FIELD, doc! { "$in": discriminators.clone() });
    }

    let response = db
        .driver()
        .exec(Find::new(&scan.collection, filter).into())
        .await?;

    let documents = response.rows.into_documents()?;

    tracing::debug!(
        collection = %scan.collection,
        documents = documents.len(),
        "loaded collection"
    );

    Ok(documents)
}
