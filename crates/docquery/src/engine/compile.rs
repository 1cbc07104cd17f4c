//! Translation of a [`QueryModel`] into one fully bound expression.
//!
//! [`QueryCompiler`] walks the clauses of the query model in order,
//! threading a [`Translation`] through each step. Each clause expression is
//! bound to the lambda parameter of the pipeline built so far by
//! [`QueryCompiler::replace_clause_references`]. Include markers are turned
//! into relationship assignments by the compensator.

mod compensator;
pub use compensator::DefaultCompensatorFactory;

mod dependencies;
pub use dependencies::{
    CompensatorFactory, Dependencies, DependenciesBuilder, EntityQueryableVisitorFactory,
    MemberAccessBindingVisitorFactory, OperatorProvider, ProjectionVisitorFactory, Rewrite,
};

mod entity_queryable;
pub use entity_queryable::DefaultEntityQueryableVisitorFactory;

mod member_access_binding;
pub use member_access_binding::DefaultMemberAccessBindingVisitorFactory;

mod projection;
pub use projection::DefaultProjectionVisitorFactory;

mod query_model_visitor;
pub use query_model_visitor::QueryCompiler;

mod translation;
pub use translation::{QuerySourceMapping, Translation};

mod verify;

use docquery_core::stmt::{Expr, Type};

/// The output of compiling one query model.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    /// Fully bound expression: no query source references or unbound entity
    /// sequences remain.
    pub expr: Expr,

    /// The pipeline the expression was compiled for
    pub provider: OperatorProvider,

    /// The type the expression evaluates to
    pub ty: Type,
}

impl CompiledQuery {
    /// Returns `true` if executing the query yields a sequence of values.
    pub fn is_sequence(&self) -> bool {
        self.ty.sequence_element().is_some()
    }
}
