use super::{BinaryOp, ConstInput, Expr, ExprArg, ExprFunc, Input, Value};
use crate::Result;
use std::cmp::Ordering;

pub(super) enum ScopeStack<'a> {
    Root,
    Scope {
        args: &'a [Value],
        parent: &'a ScopeStack<'a>,
    },
}

impl Expr {
    pub fn eval(&self, mut input: impl Input) -> Result<Value> {
        self.eval_ref(&ScopeStack::Root, &mut input)
    }

    pub fn eval_bool(&self, mut input: impl Input) -> Result<bool> {
        self.eval_ref_bool(&ScopeStack::Root, &mut input)
    }

    pub fn eval_const(&self) -> Result<Value> {
        self.eval(ConstInput::new())
    }

    pub(super) fn eval_ref(&self, scope: &ScopeStack<'_>, input: &mut impl Input) -> Result<Value> {
        match self {
            Expr::And(expr_and) => {
                debug_assert!(!expr_and.operands.is_empty());

                for operand in &expr_and.operands {
                    if !operand.eval_ref_bool(scope, input)? {
                        return Ok(false.into());
                    }
                }

                Ok(true.into())
            }
            Expr::Arg(expr_arg) => scope.resolve_arg(expr_arg, input).ok_or_else(|| {
                crate::Error::expression_evaluation_failed("failed to resolve argument")
            }),
            Expr::Assign(expr_assign) => expr_assign.eval_ref(scope, input),
            Expr::BinaryOp(expr_binary_op) => {
                let lhs = expr_binary_op.lhs.eval_ref(scope, input)?;
                let rhs = expr_binary_op.rhs.eval_ref(scope, input)?;

                match expr_binary_op.op {
                    BinaryOp::Eq => Ok((lhs == rhs).into()),
                    BinaryOp::Ne => Ok((lhs != rhs).into()),
                    op => {
                        // Missing fields never satisfy an ordered comparison
                        if lhs.is_null() || rhs.is_null() {
                            return Ok(false.into());
                        }

                        let ordering = cmp_ordered(&lhs, &rhs)?;
                        let ret = match op {
                            BinaryOp::Ge => ordering != Ordering::Less,
                            BinaryOp::Gt => ordering == Ordering::Greater,
                            BinaryOp::Le => ordering != Ordering::Greater,
                            _ => ordering == Ordering::Less,
                        };
                        Ok(ret.into())
                    }
                }
            }
            Expr::Call(expr_call) => expr_call.eval_ref(scope, input),
            Expr::Cast(expr_cast) => expr_cast.ty.cast(expr_cast.expr.eval_ref(scope, input)?),
            Expr::Entities(_) => Err(crate::Error::expression_evaluation_failed(
                "entity sources must be bound to a store read before evaluation",
            )),
            Expr::Func(_) => Err(crate::Error::expression_evaluation_failed(
                "functions can only be evaluated as method call arguments",
            )),
            Expr::If(expr_if) => {
                if expr_if.cond.eval_ref_bool(scope, input)? {
                    expr_if.then.eval_ref(scope, input)
                } else {
                    expr_if.otherwise.eval_ref(scope, input)
                }
            }
            Expr::InList(expr_in_list) => {
                let needle = expr_in_list.expr.eval_ref(scope, input)?;
                let list = expr_in_list.list.eval_ref(scope, input)?;

                let Value::List(items) = list else {
                    return Err(crate::Error::expression_evaluation_failed(
                        "InList right-hand side must evaluate to a list",
                    ));
                };

                Ok(items.iter().any(|item| item == &needle).into())
            }
            Expr::IsNull(expr_is_null) => {
                let value = expr_is_null.expr.eval_ref(scope, input)?;
                Ok(value.is_null().into())
            }
            Expr::List(exprs) => {
                let mut ret = Vec::with_capacity(exprs.items.len());

                for expr in &exprs.items {
                    ret.push(expr.eval_ref(scope, input)?);
                }

                Ok(Value::List(ret))
            }
            Expr::Member(expr_member) => match expr_member.base.eval_ref(scope, input)? {
                Value::Record(record) => Ok(record
                    .fields
                    .into_iter()
                    .nth(expr_member.field.index)
                    .unwrap_or_default()),
                Value::Null => Ok(Value::Null),
                value => Err(crate::Error::expression_evaluation_failed(format!(
                    "cannot read field {:?} of {value:?}",
                    expr_member.field
                ))),
            },
            Expr::Not(expr_not) => {
                let value = expr_not.expr.eval_ref_bool(scope, input)?;
                Ok((!value).into())
            }
            Expr::Or(expr_or) => {
                debug_assert!(!expr_or.operands.is_empty());

                for operand in &expr_or.operands {
                    if operand.eval_ref_bool(scope, input)? {
                        return Ok(true.into());
                    }
                }

                Ok(false.into())
            }
            Expr::Project(expr_project) => match expr_project.base.eval_ref(scope, input)? {
                Value::Record(record) => Ok(record
                    .fields
                    .into_iter()
                    .nth(expr_project.index)
                    .unwrap_or_default()),
                Value::Null => Ok(Value::Null),
                value => Err(crate::Error::expression_evaluation_failed(format!(
                    "cannot project slot {} of {value:?}",
                    expr_project.index
                ))),
            },
            Expr::QuerySource(expr_query_source) => {
                Err(crate::Error::expression_evaluation_failed(format!(
                    "unbound reference to query source {:?}",
                    expr_query_source.source
                )))
            }
            Expr::Record(expr_record) => {
                let mut ret = Vec::with_capacity(expr_record.len());

                for expr in &expr_record.fields {
                    ret.push(expr.eval_ref(scope, input)?);
                }

                Ok(Value::record_from_vec(ret))
            }
            Expr::Scan(expr_scan) => input.resolve_scan(expr_scan).ok_or_else(|| {
                crate::Error::expression_evaluation_failed(format!(
                    "collection `{}` was not loaded",
                    expr_scan.collection
                ))
            }),
            Expr::Value(value) => Ok(value.clone()),
        }
    }

    pub(super) fn eval_ref_bool(
        &self,
        scope: &ScopeStack<'_>,
        input: &mut impl Input,
    ) -> Result<bool> {
        match self.eval_ref(scope, input)? {
            Value::Bool(ret) => Ok(ret),
            // A missing boolean field is falsy
            Value::Null => Ok(false),
            _ => Err(crate::Error::expression_evaluation_failed(
                "expected boolean value",
            )),
        }
    }

    pub(super) fn eval_ref_usize(
        &self,
        scope: &ScopeStack<'_>,
        input: &mut impl Input,
    ) -> Result<usize> {
        match self.eval_ref(scope, input)? {
            Value::I64(n) if n >= 0 => Ok(n as usize),
            _ => Err(crate::Error::expression_evaluation_failed(
                "expected non-negative integer",
            )),
        }
    }
}

impl ExprFunc {
    /// Evaluates the body with `arg` bound to the first parameter.
    pub(super) fn apply(
        &self,
        arg: &Value,
        scope: &ScopeStack<'_>,
        input: &mut impl Input,
    ) -> Result<Value> {
        let scope = scope.scope(std::slice::from_ref(arg));
        self.body.eval_ref(&scope, input)
    }

    pub(super) fn apply_bool(
        &self,
        arg: &Value,
        scope: &ScopeStack<'_>,
        input: &mut impl Input,
    ) -> Result<bool> {
        let scope = scope.scope(std::slice::from_ref(arg));
        self.body.eval_ref_bool(&scope, input)
    }
}

impl ScopeStack<'_> {
    fn resolve_arg(&self, expr_arg: &ExprArg, input: &mut impl Input) -> Option<Value> {
        let mut nesting = expr_arg.nesting;
        let mut scope = self;

        while nesting > 0 {
            nesting -= 1;

            scope = match scope {
                ScopeStack::Root => return None,
                ScopeStack::Scope { parent, .. } => *parent,
            };
        }

        match scope {
            ScopeStack::Root => input.resolve_arg(expr_arg),
            ScopeStack::Scope { args, .. } => args.get(expr_arg.position).cloned(),
        }
    }

    fn scope<'child>(&'child self, args: &'child [Value]) -> ScopeStack<'child> {
        ScopeStack::Scope { args, parent: self }
    }
}

fn cmp_ordered(lhs: &Value, rhs: &Value) -> Result<Ordering> {
    lhs.partial_cmp(rhs).ok_or_else(|| {
        crate::Error::expression_evaluation_failed("ordered comparison between incompatible types")
    })
}

/// Converts a sequence value into its items. A missing embedded collection
/// is an empty sequence.
pub(super) fn into_items(value: Value) -> Result<Vec<Value>> {
    match value {
        Value::List(items) => Ok(items),
        Value::Null => Ok(vec![]),
        value => Err(crate::Error::expression_evaluation_failed(format!(
            "expected a sequence; actual={value:?}"
        ))),
    }
}
