use super::{
    eval::{into_items, ScopeStack},
    AssignJoin, AssignSource, ExprAssign, Input, Value, ValueRecord,
};
use crate::{schema::app::FieldId, Result};
use indexmap::IndexMap;

impl ExprAssign {
    pub(super) fn eval_ref(&self, scope: &ScopeStack<'_>, input: &mut impl Input) -> Result<Value> {
        let mut base = self.base.eval_ref(scope, input)?;

        match &self.source {
            AssignSource::Parent => self.assign_parent(&mut base),
            AssignSource::Join(join) => {
                let inner = into_items(join.inner.eval_ref(scope, input)?)?;
                self.assign_join(&mut base, join, inner)?;
            }
        }

        Ok(base)
    }

    fn assign_parent(&self, base: &mut Value) {
        // Without at least one step there is no embedding parent
        let Some((last, parents_path)) = self.path.split_last() else {
            return;
        };

        let mut parents = vec![];
        collect_targets(base, parents_path, &mut parents);

        for parent in parents {
            let snapshot = Value::Record(parent.clone());

            let Some(children) = parent.fields.get_mut(last.index) else {
                continue;
            };

            let mut targets = vec![];
            collect_targets(children, &[], &mut targets);

            for target in targets {
                target.set(self.navigation.index, snapshot.clone());
            }
        }
    }

    fn assign_join(&self, base: &mut Value, join: &AssignJoin, inner: Vec<Value>) -> Result<()> {
        let mut index: IndexMap<Value, Vec<Value>> = IndexMap::new();

        for item in inner {
            let key = match &item {
                Value::Record(record) => record.get(join.inner_key.index).cloned(),
                _ => None,
            };

            match key {
                Some(key) if !key.is_null() => index.entry(key).or_default().push(item),
                _ => {}
            }
        }

        let mut targets = vec![];
        collect_targets(base, &self.path, &mut targets);

        for target in targets {
            let Some(key) = target.get(join.outer_key.index) else {
                continue;
            };

            let matches = index.get(key);

            let value = if join.many {
                Value::List(matches.cloned().unwrap_or_default())
            } else if let Some(matches) = matches {
                matches_one(join, key, matches)?
            } else {
                // Unmatched targets keep their current value
                continue;
            };

            target.set(self.navigation.index, value);
        }

        Ok(())
    }
}

fn matches_one(join: &AssignJoin, key: &Value, matches: &[Value]) -> Result<Value> {
    match matches {
        [matched] => Ok(matched.clone()),
        _ => Err(crate::Error::too_many_records(format!(
            "{} records matched key {key:?} of {:?}",
            matches.len(),
            join.outer_key
        ))),
    }
}

/// Collects the records reached from `value` by walking `path`. Lists fan
/// out; nulls end the walk.
fn collect_targets<'a>(value: &'a mut Value, path: &[FieldId], out: &mut Vec<&'a mut ValueRecord>) {
    match value {
        Value::List(items) => {
            for item in items {
                collect_targets(item, path, out);
            }
        }
        Value::Record(record) => match path {
            [] => out.push(record),
            [step, rest @ ..] => {
                if let Some(field) = record.fields.get_mut(step.index) {
                    collect_targets(field, rest, out);
                }
            }
        },
        _ => {}
    }
}
