use super::{
    BodyClause, JoinClause, MainFromClause, QueryModel, QuerySource, QuerySourceId,
    ResultOperator, SelectClause,
};
use crate::stmt::{Direction, Expr, Type};
use crate::Result;

/// Assembles a [`QueryModel`] clause by clause.
///
/// Source-declaring methods return a reference expression to the declared
/// source's item, used to build later clause expressions.
#[derive(Debug, Default)]
pub struct Builder {
    main_from: Option<MainFromClause>,
    body_clauses: Vec<BodyClause>,
    select_clause: Option<SelectClause>,
    result_operators: Vec<ResultOperator>,
    sources: Vec<QuerySource>,

    /// First misuse of the builder, reported by `build`
    error: Option<crate::Error>,
}

impl Builder {
    /// Declares the main from clause.
    pub fn from(&mut self, name: &str, expr: impl Into<Expr>) -> Expr {
        let expr = expr.into();
        let (id, item) = self.declare(name, item_ty(&expr));

        if self.main_from.is_some() {
            self.fail("query model already has a main from clause");
        }

        self.main_from = Some(MainFromClause { source: id, expr });
        item
    }

    pub fn filter(&mut self, predicate: impl Into<Expr>) -> &mut Self {
        self.body_clauses.push(BodyClause::Where(predicate.into()));
        self
    }

    pub fn order_by(&mut self, key: impl Into<Expr>, direction: Direction) -> &mut Self {
        let key = (key.into(), direction);

        // Consecutive orderings are secondary keys of one clause
        match self.body_clauses.last_mut() {
            Some(BodyClause::OrderBy(keys)) => keys.push(key),
            _ => self.body_clauses.push(BodyClause::OrderBy(vec![key])),
        }

        self
    }

    /// Declares an inner join. `inner_key` receives the joined item.
    pub fn join(
        &mut self,
        name: &str,
        inner: impl Into<Expr>,
        outer_key: impl Into<Expr>,
        inner_key: impl FnOnce(Expr) -> Expr,
    ) -> Expr {
        let inner = inner.into();
        let (id, item) = self.declare(name, item_ty(&inner));

        self.body_clauses.push(BodyClause::Join(JoinClause {
            source: id,
            item: id,
            inner,
            outer_key: outer_key.into(),
            inner_key: inner_key(item.clone()),
        }));

        item
    }

    /// Declares a group join. `inner_key` receives one joined item; the
    /// returned reference is the list of matches.
    pub fn group_join(
        &mut self,
        name: &str,
        inner: impl Into<Expr>,
        outer_key: impl Into<Expr>,
        inner_key: impl FnOnce(Expr) -> Expr,
    ) -> Expr {
        let inner = inner.into();
        let inner_ty = item_ty(&inner);
        let (item_id, item) = self.declare(&format!("{name}_item"), inner_ty.clone());
        let (id, group) = self.declare(name, Type::list(inner_ty));

        self.body_clauses.push(BodyClause::GroupJoin(JoinClause {
            source: id,
            item: item_id,
            inner,
            outer_key: outer_key.into(),
            inner_key: inner_key(item),
        }));

        group
    }

    /// Declares an additional from clause over a collection reachable from
    /// earlier sources.
    pub fn additional_from(&mut self, name: &str, expr: impl Into<Expr>) -> Expr {
        let expr = expr.into();
        let (source, item) = self.declare(name, item_ty(&expr));

        self.body_clauses
            .push(BodyClause::AdditionalFrom { source, expr });
        item
    }

    pub fn select(&mut self, selector: impl Into<Expr>) -> &mut Self {
        if self.select_clause.is_some() {
            self.fail("query model already has a select clause");
        }

        self.select_clause = Some(SelectClause {
            selector: selector.into(),
        });
        self
    }

    pub fn result_operator(&mut self, operator: ResultOperator) -> &mut Self {
        if matches!(&operator, ResultOperator::Include(path) if path.is_empty()) {
            self.fail("include path is empty");
        }

        self.result_operators.push(operator);
        self
    }

    pub fn build(&mut self) -> Result<QueryModel> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }

        let Some(main_from) = self.main_from.take() else {
            return Err(crate::Error::invalid_argument(
                "query model has no main from clause",
            ));
        };

        let Some(select_clause) = self.select_clause.take() else {
            return Err(crate::Error::invalid_argument(
                "query model has no select clause",
            ));
        };

        Ok(QueryModel {
            main_from,
            body_clauses: std::mem::take(&mut self.body_clauses),
            select_clause,
            result_operators: std::mem::take(&mut self.result_operators),
            sources: std::mem::take(&mut self.sources),
        })
    }

    fn declare(&mut self, name: &str, item_ty: Type) -> (QuerySourceId, Expr) {
        let id = QuerySourceId(self.sources.len());
        let source = QuerySource {
            id,
            name: name.to_string(),
            item_ty,
        };
        let item = source.to_expr();
        self.sources.push(source);
        (id, item)
    }

    fn fail(&mut self, message: &str) {
        if self.error.is_none() {
            self.error = Some(crate::Error::invalid_argument(message));
        }
    }
}

fn item_ty(expr: &Expr) -> Type {
    expr.ty().sequence_element().cloned().unwrap_or(Type::Unknown)
}
