use super::{MemberAccessBindingVisitorFactory, QuerySourceMapping, Rewrite};
use docquery_core::{
    schema::app::FieldTy,
    stmt::{visit_mut, Expr, ExprFunc, VisitMut},
    Result, Schema,
};

/// Replaces query source references by accesses of the current lambda
/// parameter.
///
/// References nested inside lambdas are re-targeted at the enclosing
/// parameter. Outside of a projection, reading the primary key of a
/// `BelongsTo` navigation reads the foreign key instead, so the navigation
/// does not need to be populated.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultMemberAccessBindingVisitorFactory;

struct MemberAccessBindingVisitor<'a> {
    schema: &'a Schema,
    mapping: &'a QuerySourceMapping,
    in_projection: bool,

    /// Number of lambdas between the expression root and the current node
    depth: usize,

    error: Option<docquery_core::Error>,
}

impl MemberAccessBindingVisitorFactory for DefaultMemberAccessBindingVisitorFactory {
    fn create<'a>(
        &'a self,
        schema: &'a Schema,
        mapping: &'a QuerySourceMapping,
        in_projection: bool,
    ) -> Box<dyn Rewrite + 'a> {
        Box::new(MemberAccessBindingVisitor {
            schema,
            mapping,
            in_projection,
            depth: 0,
            error: None,
        })
    }
}

impl Rewrite for MemberAccessBindingVisitor<'_> {
    fn rewrite(&mut self, mut expr: Expr) -> Result<Expr> {
        self.visit_expr_mut(&mut expr);

        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(expr),
        }
    }
}

impl VisitMut for MemberAccessBindingVisitor<'_> {
    fn visit_expr_func_mut(&mut self, i: &mut ExprFunc) {
        self.depth += 1;
        visit_mut::visit_expr_func_mut(self, i);
        self.depth -= 1;
    }

    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        visit_mut::visit_expr_mut(self, expr);

        match expr {
            Expr::QuerySource(query_source) => match self.mapping.get(&query_source.source) {
                Some(bound) => *expr = self.shift(bound),
                None => {
                    if self.error.is_none() {
                        self.error = Some(docquery_core::Error::invalid_statement(format!(
                            "{:?} is not in scope",
                            query_source.source
                        )));
                    }
                }
            },
            Expr::Member(_) if !self.in_projection => {
                if let Some(foreign_key) = self.foreign_key_shortcut(expr) {
                    *expr = foreign_key;
                }
            }
            _ => {}
        }
    }
}

impl MemberAccessBindingVisitor<'_> {
    /// Re-targets a mapped expression at the current lambda depth.
    fn shift(&self, bound: &Expr) -> Expr {
        let depth = self.depth;

        bound.map_exprs(|expr| {
            if let Expr::Arg(arg) = expr {
                arg.nesting += depth;
            }
        })
    }

    /// `base.nav.pk` => `base.fk`
    fn foreign_key_shortcut(&self, expr: &Expr) -> Option<Expr> {
        let outer = expr.as_member()?;
        let inner = outer.base.as_member()?;

        let FieldTy::BelongsTo(rel) = &self.schema.field(inner.field).ty else {
            return None;
        };

        if self.schema.model(rel.target).primary_key != Some(outer.field) {
            return None;
        }

        let foreign_key = self.schema.field(rel.foreign_key);

        Some(Expr::member(
            (*inner.base).clone(),
            foreign_key.id,
            foreign_key.expr_ty(),
        ))
    }
}
