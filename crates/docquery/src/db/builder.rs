use super::Db;
use crate::engine::compile::{
    CompensatorFactory, Dependencies, EntityQueryableVisitorFactory,
    MemberAccessBindingVisitorFactory, OperatorProvider, ProjectionVisitorFactory, QueryCompiler,
};
use docquery_core::{
    driver::Driver,
    schema::{self, app::ModelDef},
    Result,
};

use std::sync::Arc;

#[derive(Debug, Default)]
pub struct Builder {
    /// Model definitions, in registration order
    models: Vec<ModelDef>,

    /// Schema builder
    core: schema::Builder,

    /// Compilation collaborators. Unset ones use the document store defaults.
    dependencies: crate::DependenciesBuilder,
}

impl Builder {
    pub fn register(&mut self, model: ModelDef) -> &mut Self {
        self.models.push(model);
        self
    }

    /// Set the collection name prefix for all collections
    pub fn collection_name_prefix(&mut self, prefix: &str) -> &mut Self {
        self.core.collection_name_prefix(prefix);
        self
    }

    pub fn operator_provider(&mut self, operator_provider: OperatorProvider) -> &mut Self {
        self.dependencies.operator_provider(operator_provider);
        self
    }

    pub fn entity_queryable_visitor_factory(
        &mut self,
        factory: impl EntityQueryableVisitorFactory,
    ) -> &mut Self {
        self.dependencies.entity_queryable_visitor_factory(factory);
        self
    }

    pub fn member_access_binding_visitor_factory(
        &mut self,
        factory: impl MemberAccessBindingVisitorFactory,
    ) -> &mut Self {
        self.dependencies
            .member_access_binding_visitor_factory(factory);
        self
    }

    pub fn projection_visitor_factory(&mut self, factory: impl ProjectionVisitorFactory) -> &mut Self {
        self.dependencies.projection_visitor_factory(factory);
        self
    }

    pub fn compensator_factory(&mut self, factory: impl CompensatorFactory) -> &mut Self {
        self.dependencies.compensator_factory(factory);
        self
    }

    pub fn build_schema(&self) -> Result<schema::Schema> {
        self.core.build(&self.models)
    }

    pub async fn build(&mut self, driver: impl Driver) -> Result<Db> {
        let schema = Arc::new(self.build_schema()?);

        driver.register_schema(&schema).await?;

        let dependencies: Dependencies = self.dependencies.with_defaults().build()?;

        tracing::debug!(
            models = schema.app.models.len(),
            provider = ?dependencies.operator_provider(),
            "database handle built"
        );

        Ok(Db {
            compiler: QueryCompiler::new(schema.clone(), dependencies),
            schema,
            driver: Arc::new(driver),
        })
    }
}
