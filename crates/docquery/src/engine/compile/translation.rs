use docquery_core::{
    query::QuerySourceId,
    stmt::{self, Expr, Type},
};
use indexmap::IndexMap;

/// Maps each query source to its item, expressed in terms of the current
/// lambda parameter.
pub type QuerySourceMapping = IndexMap<QuerySourceId, Expr>;

/// The state threaded through the clauses of one compilation.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Translation {
    /// The pipeline built so far. `None` until the main from clause is
    /// visited.
    pub expression: Option<Expr>,

    /// Type of the items produced by `expression`, the parameter type of the
    /// next clause lambda.
    pub current_parameter: Option<Type>,

    pub mapping: QuerySourceMapping,
}

impl Translation {
    /// Starts a pipeline at `expression`, exposing `source` as its items.
    pub fn root(expression: Expr, source: QuerySourceId, item_ty: Type) -> Translation {
        let mut mapping = QuerySourceMapping::new();
        mapping.insert(source, Expr::arg(0, item_ty.clone()));

        Translation {
            expression: Some(expression),
            current_parameter: Some(item_ty),
            mapping,
        }
    }

    /// The type of the pipeline's root expression.
    pub fn root_ty(&self) -> Option<Type> {
        self.expression.as_ref().map(Expr::ty)
    }

    pub(crate) fn parameter(&self) -> Type {
        self.current_parameter.clone().unwrap_or(Type::Unknown)
    }

    /// Wraps a resolved clause expression in a lambda over the current
    /// parameter.
    pub(crate) fn lambda(&self, body: Expr) -> Expr {
        Expr::lambda(self.parameter(), body)
    }

    /// Replaces the current parameter by a `(previous, item)` record and
    /// exposes `source` as the record's second slot.
    pub(crate) fn pair_with(&mut self, source: QuerySourceId, item_ty: Type) {
        let record_ty = Type::Record(vec![self.parameter(), item_ty]);
        let param = Expr::arg(0, record_ty.clone());

        for expr in self.mapping.values_mut() {
            stmt::visit_mut::for_each_expr_mut(expr, |expr| {
                if expr.is_identity_arg() {
                    *expr = Expr::project(param.clone(), 0);
                }
            });
        }

        self.mapping.insert(source, Expr::project(param, 1));
        self.current_parameter = Some(record_ty);
    }
}
