mod response;
pub use response::{Response, Rows};

pub mod operation;
pub use operation::Operation;

use crate::{async_trait, schema::Schema};

use std::fmt::Debug;

/// A schemaless document store holding named collections of BSON documents.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Register the schema with the driver.
    async fn register_schema(&self, schema: &Schema) -> crate::Result<()> {
        let _ = schema;
        Ok(())
    }

    /// Execute a store operation
    async fn exec(&self, op: Operation) -> crate::Result<Response>;
}
