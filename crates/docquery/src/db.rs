mod builder;
pub use builder::Builder;

use crate::engine::{
    self,
    compile::{CompiledQuery, QueryCompiler},
};
use docquery_core::{
    driver::{operation::Insert, Driver},
    query::QueryModel,
    schema::{app::ModelId, mapping::DISCRIMINATOR_FIELD},
    stmt::ValueStream,
    Result, Schema,
};

use bson::Document;
use std::sync::Arc;

/// A handle to a document store and the schema of the models stored in it.
#[derive(Debug, Clone)]
pub struct Db {
    schema: Arc<Schema>,
    driver: Arc<dyn Driver>,
    compiler: QueryCompiler,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// The store the handle executes against.
    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }

    pub fn compiler(&self) -> &QueryCompiler {
        &self.compiler
    }

    pub fn compile(&self, query: &QueryModel) -> Result<CompiledQuery> {
        self.compiler.compile(query)
    }

    pub async fn exec(&self, query: &CompiledQuery) -> Result<ValueStream> {
        engine::exec::exec(self, query).await
    }

    /// Compiles and executes a query model.
    pub async fn query(&self, query: &QueryModel) -> Result<ValueStream> {
        let compiled = self.compile(query)?;
        self.exec(&compiled).await
    }

    /// Stores documents of `model` in the model's collection.
    ///
    /// Documents of a hierarchy member get the model's discriminator unless
    /// they already carry one.
    pub async fn insert(&self, model: ModelId, mut documents: Vec<Document>) -> Result<u64> {
        let Some(collection) = self.schema.collection_for(model) else {
            return Err(docquery_core::Error::invalid_argument(format!(
                "`{}` is not stored in a collection of its own",
                self.schema.model(model).name
            )));
        };

        if let Some(discriminator) = &self.schema.model(model).discriminator {
            for document in &mut documents {
                if !document.contains_key(DISCRIMINATOR_FIELD) {
                    document.insert(DISCRIMINATOR_FIELD, discriminator.clone());
                }
            }
        }

        let response = self
            .driver
            .exec(
                Insert {
                    collection: collection.to_string(),
                    documents,
                }
                .into(),
            )
            .await?;

        match response.rows {
            docquery_core::driver::Rows::Count(count) => Ok(count),
            docquery_core::driver::Rows::Documents(_) => Err(docquery_core::Error::invalid_result(
                "insert returned documents",
            )),
        }
    }
}
