use super::{
    eval::{into_items, ScopeStack},
    value_cmp::cmp_sort,
    Expr, ExprCall, ExprFunc, Input, Method, Value,
};
use crate::Result;
use indexmap::{IndexMap, IndexSet};
use std::cmp::Ordering;

impl ExprCall {
    pub(super) fn eval_ref(&self, scope: &ScopeStack<'_>, input: &mut impl Input) -> Result<Value> {
        let source = self.arg(0)?.eval_ref(scope, input)?;

        match &self.method {
            Method::Include(path) => Err(crate::Error::unsupported_feature(format!(
                "include of navigation path {path:?} was not rewritten into assignments"
            ))),
            Method::ToAsync => Ok(source),
            Method::Select => {
                let selector = self.func(1)?;
                let items = into_items(source)?;
                let mut ret = Vec::with_capacity(items.len());

                for item in &items {
                    ret.push(selector.apply(item, scope, input)?);
                }

                Ok(Value::List(ret))
            }
            Method::Where => {
                let predicate = self.func(1)?;
                let mut ret = vec![];

                for item in into_items(source)? {
                    if predicate.apply_bool(&item, scope, input)? {
                        ret.push(item);
                    }
                }

                Ok(Value::List(ret))
            }
            Method::SelectMany => {
                let collection = self.func(1)?;
                let mut ret = vec![];

                for item in into_items(source)? {
                    let elements = into_items(collection.apply(&item, scope, input)?)?;

                    for element in elements {
                        ret.push(Value::record_from_vec(vec![item.clone(), element]));
                    }
                }

                Ok(Value::List(ret))
            }
            Method::OrderBy(directions) => {
                let keys = (0..directions.len())
                    .map(|i| self.func(i + 1))
                    .collect::<Result<Vec<_>>>()?;

                let mut keyed = vec![];

                for item in into_items(source)? {
                    let mut values = Vec::with_capacity(keys.len());
                    for key in &keys {
                        values.push(key.apply(&item, scope, input)?);
                    }
                    keyed.push((values, item));
                }

                // `sort_by` is stable: items with equal keys keep their order
                keyed.sort_by(|(lhs, _), (rhs, _)| {
                    for ((lhs, rhs), direction) in lhs.iter().zip(rhs).zip(directions) {
                        let ordering = cmp_sort(lhs, rhs);
                        let ordering = if direction.is_desc() {
                            ordering.reverse()
                        } else {
                            ordering
                        };

                        if ordering != Ordering::Equal {
                            return ordering;
                        }
                    }

                    Ordering::Equal
                });

                Ok(Value::List(
                    keyed.into_iter().map(|(_, item)| item).collect(),
                ))
            }
            Method::Take => {
                let count = self.arg(1)?.eval_ref_usize(scope, input)?;
                let mut items = into_items(source)?;
                items.truncate(count);
                Ok(Value::List(items))
            }
            Method::Skip => {
                let count = self.arg(1)?.eval_ref_usize(scope, input)?;
                let mut items = into_items(source)?;
                items.drain(..count.min(items.len()));
                Ok(Value::List(items))
            }
            Method::First => into_items(source)?
                .into_iter()
                .next()
                .ok_or_else(|| crate::Error::record_not_found("First() on an empty sequence")),
            Method::FirstOrDefault => Ok(into_items(source)?
                .into_iter()
                .next()
                .unwrap_or_default()),
            Method::Single | Method::SingleOrDefault => {
                let mut items = into_items(source)?;

                match items.len() {
                    0 if self.method == Method::SingleOrDefault => Ok(Value::Null),
                    0 => Err(crate::Error::record_not_found(
                        "Single() on an empty sequence",
                    )),
                    1 => Ok(items.remove(0)),
                    n => Err(crate::Error::too_many_records(format!(
                        "{}() matched {n} records",
                        self.method.name()
                    ))),
                }
            }
            Method::Any => {
                let items = into_items(source)?;

                let Some(predicate) = self.args.get(1) else {
                    return Ok((!items.is_empty()).into());
                };
                let predicate = as_func(predicate, &self.method)?;

                for item in &items {
                    if predicate.apply_bool(item, scope, input)? {
                        return Ok(true.into());
                    }
                }

                Ok(false.into())
            }
            Method::All => {
                let predicate = self.func(1)?;

                for item in &into_items(source)? {
                    if !predicate.apply_bool(item, scope, input)? {
                        return Ok(false.into());
                    }
                }

                Ok(true.into())
            }
            Method::Count => Ok(Value::I64(into_items(source)?.len() as i64)),
            Method::Distinct => {
                let items: IndexSet<Value> = into_items(source)?.into_iter().collect();
                Ok(Value::List(items.into_iter().collect()))
            }
            Method::GroupBy => {
                let key = self.func(1)?;
                let element = self.func(2)?;
                let mut groups: IndexMap<Value, Vec<Value>> = IndexMap::new();

                for item in &into_items(source)? {
                    let k = key.apply(item, scope, input)?;
                    let e = element.apply(item, scope, input)?;
                    groups.entry(k).or_default().push(e);
                }

                Ok(Value::List(
                    groups
                        .into_iter()
                        .map(|(key, elements)| {
                            Value::record_from_vec(vec![key, Value::List(elements)])
                        })
                        .collect(),
                ))
            }
            Method::Join | Method::GroupJoin => {
                let inner = into_items(self.arg(1)?.eval_ref(scope, input)?)?;
                let outer_key = self.func(2)?;
                let inner_key = self.func(3)?;

                // Index the inner sequence by key, preserving its order.
                // Null keys never match.
                let mut index: IndexMap<Value, Vec<Value>> = IndexMap::new();

                for item in inner {
                    let key = inner_key.apply(&item, scope, input)?;
                    if !key.is_null() {
                        index.entry(key).or_default().push(item);
                    }
                }

                let mut ret = vec![];

                for item in into_items(source)? {
                    let key = outer_key.apply(&item, scope, input)?;
                    let matches = if key.is_null() {
                        None
                    } else {
                        index.get(&key)
                    };

                    if self.method == Method::GroupJoin {
                        let matches = matches.cloned().unwrap_or_default();
                        ret.push(Value::record_from_vec(vec![item, Value::List(matches)]));
                    } else {
                        for inner in matches.into_iter().flatten() {
                            ret.push(Value::record_from_vec(vec![item.clone(), inner.clone()]));
                        }
                    }
                }

                Ok(Value::List(ret))
            }
        }
    }

    fn arg(&self, index: usize) -> Result<&Expr> {
        self.args.get(index).ok_or_else(|| {
            crate::Error::expression_evaluation_failed(format!(
                "{}() is missing argument {index}",
                self.method.name()
            ))
        })
    }

    fn func(&self, index: usize) -> Result<&ExprFunc> {
        as_func(self.arg(index)?, &self.method)
    }
}

fn as_func<'a>(expr: &'a Expr, method: &Method) -> Result<&'a ExprFunc> {
    expr.as_func().ok_or_else(|| {
        crate::Error::expression_evaluation_failed(format!(
            "{}() expects a function argument",
            method.name()
        ))
    })
}
