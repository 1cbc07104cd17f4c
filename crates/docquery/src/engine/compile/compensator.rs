use super::{CompensatorFactory, Rewrite};
use docquery_core::{
    schema::app::{FieldId, FieldTy, ModelId},
    stmt::{visit_mut, AssignSource, Expr, Method, Type, VisitMut},
    Result, Schema,
};

/// Rewrites include markers into relationship assignments.
///
/// Embedded navigations arrive with the parent document, so including them
/// reads the embedded value in place. When the embedded model declares a
/// back-reference to its parent, the back-reference is assigned from the
/// in-memory parent. Referenced navigations are assigned from a read of the
/// target collection, matched on key equality. Targets without a match are
/// left unset.
///
/// Include markers over anything else are left as they are and fail when
/// executed.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultCompensatorFactory;

struct Compensator<'a> {
    schema: &'a Schema,
}

impl CompensatorFactory for DefaultCompensatorFactory {
    fn create<'a>(&'a self, schema: &'a Schema) -> Box<dyn Rewrite + 'a> {
        Box::new(Compensator { schema })
    }
}

impl Rewrite for Compensator<'_> {
    fn rewrite(&mut self, mut expr: Expr) -> Result<Expr> {
        self.visit_expr_mut(&mut expr);
        Ok(expr)
    }
}

impl VisitMut for Compensator<'_> {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        visit_mut::visit_expr_mut(self, expr);

        let Expr::Call(call) = expr else {
            return;
        };

        let (Method::Include(path), [base]) = (&call.method, &call.args[..]) else {
            return;
        };

        match self.compensate(path, base.clone()) {
            Some(compensated) => {
                tracing::trace!(?path, "include rewritten into assignments");
                *expr = compensated;
            }
            None => {
                tracing::trace!(?path, "include left untranslated");
            }
        }
    }
}

impl Compensator<'_> {
    /// Returns `None` if a step of the path is not a navigation of the
    /// entity reached so far.
    fn compensate(&self, path: &[FieldId], base: Expr) -> Option<Expr> {
        let mut model = entity_model(&base.ty())?;
        let mut expr = base;
        let mut embedded_path = vec![];

        for (i, step) in path.iter().enumerate() {
            if !self.schema.app.extends(model, step.model) {
                return None;
            }

            let field = self.schema.field(*step);

            match &field.ty {
                FieldTy::Embedded(embedded) => {
                    embedded_path.push(*step);

                    if let Some(pair) = embedded.pair {
                        expr = Expr::assign(expr, embedded_path.clone(), pair, AssignSource::Parent);
                    }

                    model = embedded.target;
                }
                FieldTy::BelongsTo(rel) => {
                    let target_key = self.schema.model(rel.target).primary_key?;
                    let inner = self.compensate(&path[i + 1..], self.scan(rel.target)?)?;

                    return Some(Expr::assign(
                        expr,
                        embedded_path,
                        *step,
                        AssignSource::join(inner, rel.foreign_key, target_key, false),
                    ));
                }
                FieldTy::HasMany(rel) => {
                    let key = self.schema.model(model).primary_key?;
                    let inner = self.compensate(&path[i + 1..], self.scan(rel.target)?)?;

                    return Some(Expr::assign(
                        expr,
                        embedded_path,
                        *step,
                        AssignSource::join(inner, key, rel.foreign_key, true),
                    ));
                }
                FieldTy::Primitive(_) | FieldTy::Discriminator => return None,
            }
        }

        Some(expr)
    }

    fn scan(&self, model: ModelId) -> Option<Expr> {
        self.schema.scan(model).map(Expr::Scan)
    }
}

/// The model of an entity or of the items of an entity sequence.
fn entity_model(ty: &Type) -> Option<ModelId> {
    match ty {
        Type::Model(model) => Some(*model),
        _ => ty.sequence_element()?.as_model(),
    }
}
