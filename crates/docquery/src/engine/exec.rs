mod load;
mod materialize;

use super::compile::{CompiledQuery, OperatorProvider};
use crate::Db;
use docquery_core::{
    stmt::{self, Expr, ExprScan, Input, Value, ValueStream},
    Result,
};
use indexmap::{IndexMap, IndexSet};

/// Runs a compiled query.
///
/// Every collection read by the expression is loaded and materialized, then
/// the expression is evaluated over the loaded entities. With the
/// asynchronous pipeline nothing happens until the stream is first polled.
pub(crate) async fn exec(db: &Db, query: &CompiledQuery) -> Result<ValueStream> {
    match query.provider {
        OperatorProvider::Sync => {
            let value = run(db, &query.expr).await?;
            into_value_stream(value, query.is_sequence())
        }
        OperatorProvider::Async => {
            let db = db.clone();
            let expr = query.expr.clone();
            let is_sequence = query.is_sequence();

            Ok(ValueStream::from_stream(async_stream::try_stream! {
                let value = run(&db, &expr).await?;

                if is_sequence {
                    for item in value.to_list()? {
                        yield item;
                    }
                } else {
                    yield value;
                }
            }))
        }
    }
}

async fn run(db: &Db, expr: &Expr) -> Result<Value> {
    let mut input = ScanInput::default();

    for scan in scans(expr) {
        let documents = load::find(db, &scan).await?;

        let entities = documents
            .iter()
            .map(|document| materialize::entity(db.schema(), scan.model, document))
            .collect::<Result<Vec<_>>>()?;

        input.scans.insert(scan, Value::List(entities));
    }

    expr.eval(&mut input)
}

fn into_value_stream(value: Value, is_sequence: bool) -> Result<ValueStream> {
    if is_sequence {
        Ok(ValueStream::from_vec(value.to_list()?))
    } else {
        Ok(ValueStream::from_value(value))
    }
}

/// Each distinct collection read, in order of appearance.
fn scans(expr: &Expr) -> IndexSet<ExprScan> {
    let mut scans = IndexSet::new();

    stmt::visit::for_each_expr(expr, |expr| {
        if let Expr::Scan(scan) = expr {
            scans.insert(scan.clone());
        }
    });

    scans
}

/// Serves the entities loaded for each scan.
#[derive(Debug, Default)]
struct ScanInput {
    scans: IndexMap<ExprScan, Value>,
}

impl Input for ScanInput {
    fn resolve_scan(&mut self, scan: &ExprScan) -> Option<Value> {
        self.scans.get(scan).cloned()
    }
}
