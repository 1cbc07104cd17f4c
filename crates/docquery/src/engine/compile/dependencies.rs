use super::QuerySourceMapping;
use docquery_core::{query::QuerySourceId, stmt::Expr, Result, Schema};

use std::{fmt, sync::Arc};

/// A tree transform created by one of the compilation factories.
pub trait Rewrite {
    fn rewrite(&mut self, expr: Expr) -> Result<Expr>;
}

/// Binds unbound entity sequences to store reads.
pub trait EntityQueryableVisitorFactory: fmt::Debug + Send + Sync + 'static {
    fn create<'a>(&'a self, schema: &'a Schema) -> Box<dyn Rewrite + 'a>;
}

/// Binds query source references to lambda parameter accesses.
pub trait MemberAccessBindingVisitorFactory: fmt::Debug + Send + Sync + 'static {
    fn create<'a>(
        &'a self,
        schema: &'a Schema,
        mapping: &'a QuerySourceMapping,
        in_projection: bool,
    ) -> Box<dyn Rewrite + 'a>;
}

/// Rewrites a selector scoped to one query source.
pub trait ProjectionVisitorFactory: fmt::Debug + Send + Sync + 'static {
    fn create<'a>(
        &'a self,
        schema: &'a Schema,
        compensator: &'a dyn CompensatorFactory,
        source: QuerySourceId,
    ) -> Box<dyn Rewrite + 'a>;
}

/// Rewrites include markers into relationship assignments.
pub trait CompensatorFactory: fmt::Debug + Send + Sync + 'static {
    fn create<'a>(&'a self, schema: &'a Schema) -> Box<dyn Rewrite + 'a>;
}

/// Selects the execution pipeline a query is compiled for.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorProvider {
    /// Results are computed eagerly and buffered.
    #[default]
    Sync,

    /// Results are produced by a lazily pulled asynchronous stream.
    Async,
}

/// Collaborators used by [`QueryCompiler`](super::QueryCompiler).
#[derive(Debug, Clone)]
pub struct Dependencies {
    pub(crate) entity_queryable: Arc<dyn EntityQueryableVisitorFactory>,
    pub(crate) member_access_binding: Arc<dyn MemberAccessBindingVisitorFactory>,
    pub(crate) projection: Arc<dyn ProjectionVisitorFactory>,
    pub(crate) compensator: Arc<dyn CompensatorFactory>,
    pub(crate) operator_provider: OperatorProvider,
}

/// Assembles [`Dependencies`]. Every collaborator must be set.
#[derive(Debug, Default, Clone)]
pub struct DependenciesBuilder {
    entity_queryable: Option<Arc<dyn EntityQueryableVisitorFactory>>,
    member_access_binding: Option<Arc<dyn MemberAccessBindingVisitorFactory>>,
    projection: Option<Arc<dyn ProjectionVisitorFactory>>,
    compensator: Option<Arc<dyn CompensatorFactory>>,
    operator_provider: Option<OperatorProvider>,
}

impl Dependencies {
    pub fn builder() -> DependenciesBuilder {
        DependenciesBuilder::default()
    }

    /// The document store collaborators.
    pub fn document_store(operator_provider: OperatorProvider) -> Dependencies {
        Dependencies {
            entity_queryable: Arc::new(super::DefaultEntityQueryableVisitorFactory),
            member_access_binding: Arc::new(super::DefaultMemberAccessBindingVisitorFactory),
            projection: Arc::new(super::DefaultProjectionVisitorFactory),
            compensator: Arc::new(super::DefaultCompensatorFactory),
            operator_provider,
        }
    }

    pub fn operator_provider(&self) -> OperatorProvider {
        self.operator_provider
    }
}

impl DependenciesBuilder {
    pub fn entity_queryable_visitor_factory(
        &mut self,
        factory: impl EntityQueryableVisitorFactory,
    ) -> &mut Self {
        self.entity_queryable = Some(Arc::new(factory));
        self
    }

    pub fn member_access_binding_visitor_factory(
        &mut self,
        factory: impl MemberAccessBindingVisitorFactory,
    ) -> &mut Self {
        self.member_access_binding = Some(Arc::new(factory));
        self
    }

    pub fn projection_visitor_factory(&mut self, factory: impl ProjectionVisitorFactory) -> &mut Self {
        self.projection = Some(Arc::new(factory));
        self
    }

    pub fn compensator_factory(&mut self, factory: impl CompensatorFactory) -> &mut Self {
        self.compensator = Some(Arc::new(factory));
        self
    }

    pub fn operator_provider(&mut self, operator_provider: OperatorProvider) -> &mut Self {
        self.operator_provider = Some(operator_provider);
        self
    }

    /// Fills every unset collaborator with the document store default.
    pub fn with_defaults(&mut self) -> &mut Self {
        let defaults = Dependencies::document_store(self.operator_provider.unwrap_or_default());

        self.entity_queryable
            .get_or_insert(defaults.entity_queryable);
        self.member_access_binding
            .get_or_insert(defaults.member_access_binding);
        self.projection.get_or_insert(defaults.projection);
        self.compensator.get_or_insert(defaults.compensator);
        self.operator_provider
            .get_or_insert(defaults.operator_provider);
        self
    }

    pub fn build(&self) -> Result<Dependencies> {
        Ok(Dependencies {
            entity_queryable: required(&self.entity_queryable, "entity queryable visitor factory")?,
            member_access_binding: required(
                &self.member_access_binding,
                "member access binding visitor factory",
            )?,
            projection: required(&self.projection, "projection visitor factory")?,
            compensator: required(&self.compensator, "compensator factory")?,
            operator_provider: required(&self.operator_provider, "operator provider")?,
        })
    }
}

fn required<T: Clone>(value: &Option<T>, name: &str) -> Result<T> {
    value
        .clone()
        .ok_or_else(|| docquery_core::Error::invalid_argument(format!("missing {name}")))
}
