use super::{CompensatorFactory, ProjectionVisitorFactory, Rewrite};
use docquery_core::{
    query::QuerySourceId,
    schema::app::{FieldId, FieldTy},
    stmt::{visit_mut, Expr, VisitMut},
    Result, Schema,
};

/// Rewrites a selector so that it builds the caller-visible shape of one
/// result row.
///
/// Include markers nested inside the selector are turned into relationship
/// assignments. The include at the root of the selector is left to the
/// caller. Reading a referenced navigation of the scoped source materializes
/// the related entities.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultProjectionVisitorFactory;

struct ProjectionRewriter<'a> {
    schema: &'a Schema,
    compensator: Box<dyn Rewrite + 'a>,
    source: QuerySourceId,

    /// Distance from the selector root
    depth: usize,

    error: Option<docquery_core::Error>,
}

impl ProjectionVisitorFactory for DefaultProjectionVisitorFactory {
    fn create<'a>(
        &'a self,
        schema: &'a Schema,
        compensator: &'a dyn CompensatorFactory,
        source: QuerySourceId,
    ) -> Box<dyn Rewrite + 'a> {
        Box::new(ProjectionRewriter {
            schema,
            compensator: compensator.create(schema),
            source,
            depth: 0,
            error: None,
        })
    }
}

impl Rewrite for ProjectionRewriter<'_> {
    fn rewrite(&mut self, mut expr: Expr) -> Result<Expr> {
        self.visit_expr_mut(&mut expr);

        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(expr),
        }
    }
}

impl VisitMut for ProjectionRewriter<'_> {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        let is_root = self.depth == 0;

        self.depth += 1;
        visit_mut::visit_expr_mut(self, expr);
        self.depth -= 1;

        if expr.is_include() {
            if !is_root {
                self.compensate(expr);
            }
        } else if let Some(included) = self.include_navigation(expr) {
            *expr = included;
        }
    }
}

impl ProjectionRewriter<'_> {
    fn compensate(&mut self, expr: &mut Expr) {
        match self.compensator.rewrite(std::mem::take(expr)) {
            Ok(compensated) => *expr = compensated,
            Err(err) => {
                self.error.get_or_insert(err);
            }
        }
    }

    /// Wraps the source of `source.a.b.nav` in an include of `[a, b, nav]`
    /// when `nav` is a referenced navigation reached through single embedded
    /// navigations.
    fn include_navigation(&mut self, expr: &Expr) -> Option<Expr> {
        let member = expr.as_member()?;

        if !self.schema.field(member.field).is_referenced() {
            return None;
        }

        let mut chain = vec![member];
        let mut base = &*member.base;

        while let Expr::Member(parent) = base {
            match &self.schema.field(parent.field).ty {
                FieldTy::Embedded(embedded) if !embedded.many => {}
                _ => return None,
            }

            chain.push(parent);
            base = &parent.base;
        }

        match base.as_query_source() {
            Some(query_source) if query_source.source == self.source => {}
            _ => return None,
        }

        let path: Vec<FieldId> = chain.iter().rev().map(|member| member.field).collect();
        tracing::trace!(?path, "including navigation read by the projection");

        let mut rebuilt = Expr::include(path, base.clone());
        self.compensate(&mut rebuilt);

        for member in chain.into_iter().rev() {
            rebuilt = Expr::member(rebuilt, member.field, member.ty.clone());
        }

        Some(rebuilt)
    }
}
