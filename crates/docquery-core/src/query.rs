//! The clause-based query model compiled by the engine.
//!
//! A query model is one main from clause, any number of body clauses, exactly
//! one select clause and any number of result operators. Clause expressions
//! refer to the sources declared by clauses with [`ExprQuerySource`]
//! references.
//!
//! [`ExprQuerySource`]: crate::stmt::ExprQuerySource

mod body_clause;
pub use body_clause::{BodyClause, JoinClause};

mod builder;
pub use builder::Builder;

mod main_from_clause;
pub use main_from_clause::MainFromClause;

mod query_source;
pub use query_source::{QuerySource, QuerySourceId};

mod result_operator;
pub use result_operator::ResultOperator;

mod select_clause;
pub use select_clause::SelectClause;

use crate::stmt::Expr;

#[derive(Debug, Clone)]
pub struct QueryModel {
    main_from: MainFromClause,
    body_clauses: Vec<BodyClause>,
    select_clause: SelectClause,
    result_operators: Vec<ResultOperator>,

    /// Every source declared by the model, indexed by `QuerySourceId`
    sources: Vec<QuerySource>,
}

impl QueryModel {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn main_from(&self) -> &MainFromClause {
        &self.main_from
    }

    pub fn body_clauses(&self) -> &[BodyClause] {
        &self.body_clauses
    }

    pub fn select_clause(&self) -> &SelectClause {
        &self.select_clause
    }

    pub fn result_operators(&self) -> &[ResultOperator] {
        &self.result_operators
    }

    pub fn sources(&self) -> &[QuerySource] {
        &self.sources
    }

    /// Get a query source by ID
    pub fn source(&self, id: QuerySourceId) -> &QuerySource {
        self.sources.get(id.0).expect("invalid query source ID")
    }

    /// Returns a reference expression to the main from clause's items.
    pub fn main_source_ref(&self) -> Expr {
        self.source(self.main_from.source).to_expr()
    }

    /// Returns `true` if a result operator consumes the items of the source
    /// directly, making the select clause irrelevant.
    pub fn has_group_by_or_all(&self) -> bool {
        self.result_operators
            .iter()
            .any(|op| op.is_group_by() || op.is_all())
    }
}
