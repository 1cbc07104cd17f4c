use super::{
    verify, CompiledQuery, Dependencies, OperatorProvider, QuerySourceMapping, Translation,
};
use docquery_core::{
    query::{BodyClause, QueryModel, QuerySourceId, ResultOperator, SelectClause},
    schema::app::ModelId,
    stmt::{Expr, Method, Type},
    Result, Schema,
};

use std::sync::Arc;

/// Compiles query models into expressions runnable against the document
/// store.
///
/// The compiler holds no per-query state: every compilation threads its own
/// [`Translation`] through the clause visits.
#[derive(Debug, Clone)]
pub struct QueryCompiler {
    schema: Arc<Schema>,
    dependencies: Dependencies,
}

impl QueryCompiler {
    pub fn new(schema: Arc<Schema>, dependencies: Dependencies) -> QueryCompiler {
        QueryCompiler {
            schema,
            dependencies,
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn dependencies(&self) -> &Dependencies {
        &self.dependencies
    }

    pub fn compile(&self, query: &QueryModel) -> Result<CompiledQuery> {
        let main_from = query.source(query.main_from().source);

        tracing::debug!(
            main_from = %main_from.name,
            body_clauses = query.body_clauses().len(),
            result_operators = query.result_operators().len(),
            provider = ?self.dependencies.operator_provider,
            "compiling query model"
        );

        let select_clause = fold_includes(query);

        let mut state = self.visit_main_from_clause(Translation::default(), query)?;

        for clause in query.body_clauses() {
            state = self.visit_body_clause(state, clause, query)?;
        }

        state = self.visit_select_clause(state, &select_clause, query)?;

        for operator in query.result_operators() {
            state = self.visit_result_operator(state, operator, query)?;
        }

        let Some(expr) = state.expression else {
            return Err(docquery_core::Error::invalid_statement(
                "query model produced no expression",
            ));
        };

        verify::apply(&expr)?;

        Ok(CompiledQuery {
            ty: expr.ty(),
            expr,
            provider: self.dependencies.operator_provider,
        })
    }

    pub fn visit_main_from_clause(&self, state: Translation, query: &QueryModel) -> Result<Translation> {
        if state.expression.is_some() {
            return Err(docquery_core::Error::invalid_statement(
                "main from clause visited twice",
            ));
        }

        let main_from = query.main_from();
        let source = query.source(main_from.source);

        tracing::trace!(source = %source.name, "visiting main from clause");

        let expr =
            self.replace_clause_references(&state, &main_from.expr, Some(main_from.source), false)?;

        Ok(Translation::root(
            expr,
            main_from.source,
            source.item_ty.clone(),
        ))
    }

    pub fn visit_body_clause(
        &self,
        mut state: Translation,
        clause: &BodyClause,
        query: &QueryModel,
    ) -> Result<Translation> {
        tracing::trace!(clause = clause.name(), "visiting body clause");

        match clause {
            BodyClause::Where(predicate) => {
                let predicate = self.replace_clause_references(&state, predicate, None, false)?;
                let predicate = state.lambda(predicate);
                let expression = take_expression(&mut state, clause.name())?;

                state.expression = Some(Expr::filter(expression, predicate));
            }
            BodyClause::OrderBy(orderings) => {
                let mut keys = vec![];

                for (key, direction) in orderings {
                    let key = self.replace_clause_references(&state, key, None, false)?;
                    keys.push((state.lambda(key), *direction));
                }

                let expression = take_expression(&mut state, clause.name())?;
                state.expression = Some(Expr::order_by(expression, keys));
            }
            BodyClause::Join(join) | BodyClause::GroupJoin(join) => {
                let inner =
                    self.replace_clause_references(&state, &join.inner, Some(join.source), false)?;
                let outer_key = self.replace_clause_references(&state, &join.outer_key, None, false)?;
                let outer_key = state.lambda(outer_key);

                // The inner key only sees the joined item
                let item_ty = query.source(join.item).item_ty.clone();
                let mut mapping = QuerySourceMapping::new();
                mapping.insert(join.item, Expr::arg(0, item_ty.clone()));

                let inner_state = Translation {
                    expression: state.expression.clone(),
                    current_parameter: Some(item_ty),
                    mapping,
                };

                let inner_key = self.replace_clause_references(
                    &inner_state,
                    &join.inner_key,
                    Some(join.item),
                    false,
                )?;
                let inner_key = inner_state.lambda(inner_key);

                let expression = take_expression(&mut state, clause.name())?;

                state.expression = Some(match clause {
                    BodyClause::GroupJoin(_) => {
                        Expr::group_join(expression, inner, outer_key, inner_key)
                    }
                    _ => Expr::join(expression, inner, outer_key, inner_key),
                });

                state.pair_with(join.source, query.source(join.source).item_ty.clone());
            }
            BodyClause::AdditionalFrom { source, expr } => {
                let collection = self.replace_clause_references(&state, expr, Some(*source), false)?;
                let collection = state.lambda(collection);
                let expression = take_expression(&mut state, clause.name())?;

                state.expression = Some(Expr::select_many(expression, collection));
                state.pair_with(*source, query.source(*source).item_ty.clone());
            }
        }

        Ok(state)
    }

    pub fn visit_select_clause(
        &self,
        mut state: Translation,
        select_clause: &SelectClause,
        query: &QueryModel,
    ) -> Result<Translation> {
        let selector = &select_clause.selector;

        // `select x` over items that already are `x`
        if select_clause.is_source_ref() && state.current_parameter.as_ref() == Some(&selector.ty())
        {
            tracing::trace!("select clause is the identity projection");
            return Ok(state);
        }

        let main_source = query.main_from().source;

        let rewritten = self
            .dependencies
            .projection
            .create(&self.schema, &*self.dependencies.compensator, main_source)
            .rewrite(selector.clone())?;

        let resolved = self.replace_clause_references(&state, &rewritten, Some(main_source), true)?;

        if query.has_group_by_or_all() {
            tracing::debug!("select suppressed by a GroupBy or All result operator");
            return Ok(state);
        }

        let selector = self.convert_to_relationship_assignments(resolved)?;

        if selector.is_identity_arg() {
            tracing::debug!("select suppressed, selector is a pass-through");
            return Ok(state);
        }

        let ty = selector.ty();
        let selector = state.lambda(selector);
        let expression = take_expression(&mut state, "select")?;

        state.expression = Some(Expr::select(expression, selector));
        state.current_parameter = Some(ty);

        // Earlier sources are not visible past the projection
        state.mapping.clear();

        Ok(state)
    }

    pub fn visit_result_operator(
        &self,
        mut state: Translation,
        operator: &ResultOperator,
        query: &QueryModel,
    ) -> Result<Translation> {
        tracing::trace!(?operator, "visiting result operator");

        match operator {
            // Folded into the selector
            ResultOperator::Include(_) => return Ok(state),
            ResultOperator::OfType(model) => return self.visit_of_type(state, *model),
            _ => {}
        }

        let expression = take_expression(&mut state, "result operator")?;

        let expression = match operator {
            ResultOperator::Take(count) => Expr::take(expression, *count),
            ResultOperator::Skip(count) => Expr::skip(expression, *count),
            ResultOperator::First => Expr::element(Method::First, expression),
            ResultOperator::FirstOrDefault => Expr::element(Method::FirstOrDefault, expression),
            ResultOperator::Single => Expr::element(Method::Single, expression),
            ResultOperator::SingleOrDefault => Expr::element(Method::SingleOrDefault, expression),
            ResultOperator::Any => Expr::any(expression, None),
            ResultOperator::Count => Expr::count(expression),
            ResultOperator::Distinct => Expr::distinct(expression),
            ResultOperator::All(predicate) => {
                let predicate = self.replace_clause_references(&state, predicate, None, false)?;
                Expr::all(expression, state.lambda(predicate))
            }
            ResultOperator::GroupBy { key, element } => {
                let main_source = query.main_from().source;
                let key = self.replace_clause_references(&state, key, None, false)?;

                // Grouped entities of the main source are populated like
                // selected ones
                let element = match element.as_query_source() {
                    Some(item) if item.source == main_source => {
                        apply_includes(query, element.clone())
                    }
                    _ => {
                        if query.result_operators().iter().any(ResultOperator::is_include) {
                            tracing::warn!(
                                "include ignored: the grouped element is not an entity of the main source"
                            );
                        }
                        element.clone()
                    }
                };

                let element = self
                    .dependencies
                    .projection
                    .create(&self.schema, &*self.dependencies.compensator, main_source)
                    .rewrite(element)?;
                let element = self.replace_clause_references(&state, &element, None, true)?;
                let element = self.convert_to_relationship_assignments(element)?;

                let expression =
                    Expr::group_by(expression, state.lambda(key), state.lambda(element));

                state.current_parameter = expression.ty().sequence_element().cloned();
                state.mapping.clear();
                expression
            }
            ResultOperator::Include(_) | ResultOperator::OfType(_) => expression,
        };

        state.expression = Some(expression);
        Ok(state)
    }

    /// Filters on the stored discriminator, then exposes the items as the
    /// requested subtype.
    fn visit_of_type(&self, mut state: Translation, model: ModelId) -> Result<Translation> {
        let Some(current) = state.parameter().as_model() else {
            return Err(docquery_core::Error::invalid_statement(
                "OfType requires a sequence of entities",
            ));
        };

        if !self.schema.app.extends(model, current) {
            return Err(docquery_core::Error::invalid_statement(format!(
                "`{}` does not extend `{}`",
                self.schema.model(model).name,
                self.schema.model(current).name
            )));
        }

        if model == current {
            return Ok(state);
        }

        let Some(discriminator) = self.schema.model(current).discriminator_field() else {
            return Err(docquery_core::Error::invalid_schema(format!(
                "`{}` has no discriminator field",
                self.schema.model(current).name
            )));
        };

        let predicate = Expr::in_list(
            Expr::member(Expr::arg(0, current), discriminator.id, Type::String),
            Expr::list(self.schema.app.discriminators(model)),
        );

        let expression = take_expression(&mut state, "OfType")?;
        let ty = expression.ty().sequence_like(model);

        state.expression = Some(Expr::cast(
            Expr::filter(expression, state.lambda(predicate)),
            ty,
        ));
        state.current_parameter = Some(Type::Model(model));

        // Re-type the mapped items so that subtype fields can be read
        for bound in state.mapping.values_mut() {
            if bound.is_identity_arg() {
                *bound = Expr::arg(0, model);
            }
        }

        Ok(state)
    }

    /// Replaces an include marker by the compensator's relationship
    /// assignments. Any other expression is returned unchanged.
    pub fn convert_to_relationship_assignments(&self, expr: Expr) -> Result<Expr> {
        if !expr.is_include() {
            return Ok(expr);
        }

        self.dependencies
            .compensator
            .create(&self.schema)
            .rewrite(expr)
    }

    /// Binds the free references of a clause expression.
    ///
    /// Entity sequences are bound to collection reads, then query source
    /// references to accesses of the current lambda parameter. Outside of a
    /// projection, a synchronous sequence is adapted into an asynchronous one
    /// when compiling for [`OperatorProvider::Async`] and either the pipeline
    /// built so far is asynchronous or the sequence starts the pipeline.
    pub fn replace_clause_references(
        &self,
        state: &Translation,
        expr: &Expr,
        query_source: Option<QuerySourceId>,
        in_projection: bool,
    ) -> Result<Expr> {
        let expr = self
            .dependencies
            .entity_queryable
            .create(&self.schema)
            .rewrite(expr.clone())?;

        let expr = self
            .dependencies
            .member_access_binding
            .create(&self.schema, &state.mapping, in_projection)
            .rewrite(expr)?;

        if in_projection {
            return Ok(expr);
        }

        Ok(self.adapt_async(state, expr, query_source))
    }

    fn adapt_async(&self, state: &Translation, expr: Expr, query_source: Option<QuerySourceId>) -> Expr {
        let ty = expr.ty();

        let continues_async_pipeline = !ty.is_string()
            && !ty.is_bytes()
            && state.root_ty().is_some_and(|root| root.is_stream());
        let starts_pipeline = state.expression.is_none() && ty.is_generic();

        if !continues_async_pipeline && !starts_pipeline {
            return expr;
        }

        // Asynchronous sequences are never wrapped twice
        if !ty.is_list() || self.dependencies.operator_provider != OperatorProvider::Async {
            return expr;
        }

        tracing::debug!(?query_source, "adapting sequence into an asynchronous stream");
        Expr::to_async(expr)
    }
}

/// Applies `Include` result operators to the selector.
fn fold_includes(query: &QueryModel) -> SelectClause {
    SelectClause {
        selector: apply_includes(query, query.select_clause().selector.clone()),
    }
}

/// Wraps `expr` in an include marker per `Include` result operator.
fn apply_includes(query: &QueryModel, expr: Expr) -> Expr {
    query
        .result_operators()
        .iter()
        .filter_map(|operator| match operator {
            ResultOperator::Include(path) => Some(path),
            _ => None,
        })
        .fold(expr, |expr, path| Expr::include(path.clone(), expr))
}

fn take_expression(state: &mut Translation, clause: &str) -> Result<Expr> {
    state.expression.take().ok_or_else(|| {
        docquery_core::Error::invalid_statement(format!(
            "`{clause}` visited before the main from clause"
        ))
    })
}
