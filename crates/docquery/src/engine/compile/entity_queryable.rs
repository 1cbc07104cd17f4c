use super::{EntityQueryableVisitorFactory, Rewrite};
use docquery_core::{
    stmt::{self, visit_mut, Expr, VisitMut},
    Result, Schema,
};

/// Binds every `Expr::Entities` to a read of the model's collection.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultEntityQueryableVisitorFactory;

struct EntityQueryableVisitor<'a> {
    schema: &'a Schema,

    /// First model that could not be bound
    error: Option<docquery_core::Error>,
}

impl EntityQueryableVisitorFactory for DefaultEntityQueryableVisitorFactory {
    fn create<'a>(&'a self, schema: &'a Schema) -> Box<dyn Rewrite + 'a> {
        Box::new(EntityQueryableVisitor {
            schema,
            error: None,
        })
    }
}

impl Rewrite for EntityQueryableVisitor<'_> {
    fn rewrite(&mut self, mut expr: Expr) -> Result<Expr> {
        self.visit_expr_mut(&mut expr);

        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(expr),
        }
    }
}

impl VisitMut for EntityQueryableVisitor<'_> {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        let Expr::Entities(entities) = expr else {
            visit_mut::visit_expr_mut(self, expr);
            return;
        };

        match self.schema.scan(entities.model) {
            Some(scan) => *expr = stmt::Expr::Scan(scan),
            None if self.error.is_none() => {
                let model = self.schema.model(entities.model);
                self.error = Some(docquery_core::Error::invalid_statement(format!(
                    "model `{}` is not stored in a collection of its own",
                    model.name
                )));
            }
            None => {}
        }
    }
}
