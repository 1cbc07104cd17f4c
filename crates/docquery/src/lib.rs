pub mod db;
pub use db::Db;

mod engine;
pub use engine::compile::{
    CompensatorFactory, CompiledQuery, DefaultCompensatorFactory,
    DefaultEntityQueryableVisitorFactory, DefaultMemberAccessBindingVisitorFactory,
    DefaultProjectionVisitorFactory, Dependencies, DependenciesBuilder,
    EntityQueryableVisitorFactory, MemberAccessBindingVisitorFactory, OperatorProvider,
    ProjectionVisitorFactory, QueryCompiler, QuerySourceMapping, Rewrite, Translation,
};

pub use docquery_core::{
    driver::Driver,
    query::{self, QueryModel},
    schema::{self, app::ModelDef, Schema},
    stmt, Error, Result,
};
