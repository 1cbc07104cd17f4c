#![allow(unused_variables)]

use super::{
    AssignSource, Expr, ExprAnd, ExprArg, ExprAssign, ExprBinaryOp, ExprCall, ExprCast,
    ExprEntities, ExprFunc, ExprIf, ExprInList, ExprIsNull, ExprList, ExprMember, ExprNot,
    ExprOr, ExprProject, ExprQuerySource, ExprRecord, ExprScan, Node, Type, Value,
};

pub trait Visit {
    fn visit<N: Node>(&mut self, i: &N)
    where
        Self: Sized,
    {
        i.visit(self);
    }

    fn visit_expr(&mut self, i: &Expr) {
        visit_expr(self, i);
    }

    fn visit_expr_and(&mut self, i: &ExprAnd) {
        visit_expr_and(self, i);
    }

    fn visit_expr_arg(&mut self, i: &ExprArg) {
        visit_expr_arg(self, i);
    }

    fn visit_expr_assign(&mut self, i: &ExprAssign) {
        visit_expr_assign(self, i);
    }

    fn visit_expr_binary_op(&mut self, i: &ExprBinaryOp) {
        visit_expr_binary_op(self, i);
    }

    fn visit_expr_call(&mut self, i: &ExprCall) {
        visit_expr_call(self, i);
    }

    fn visit_expr_cast(&mut self, i: &ExprCast) {
        visit_expr_cast(self, i);
    }

    fn visit_expr_entities(&mut self, i: &ExprEntities) {
        visit_expr_entities(self, i);
    }

    fn visit_expr_func(&mut self, i: &ExprFunc) {
        visit_expr_func(self, i);
    }

    fn visit_expr_if(&mut self, i: &ExprIf) {
        visit_expr_if(self, i);
    }

    fn visit_expr_in_list(&mut self, i: &ExprInList) {
        visit_expr_in_list(self, i);
    }

    fn visit_expr_is_null(&mut self, i: &ExprIsNull) {
        visit_expr_is_null(self, i);
    }

    fn visit_expr_list(&mut self, i: &ExprList) {
        visit_expr_list(self, i);
    }

    fn visit_expr_member(&mut self, i: &ExprMember) {
        visit_expr_member(self, i);
    }

    fn visit_expr_not(&mut self, i: &ExprNot) {
        visit_expr_not(self, i);
    }

    fn visit_expr_or(&mut self, i: &ExprOr) {
        visit_expr_or(self, i);
    }

    fn visit_expr_project(&mut self, i: &ExprProject) {
        visit_expr_project(self, i);
    }

    fn visit_expr_query_source(&mut self, i: &ExprQuerySource) {
        visit_expr_query_source(self, i);
    }

    fn visit_expr_record(&mut self, i: &ExprRecord) {
        visit_expr_record(self, i);
    }

    fn visit_expr_scan(&mut self, i: &ExprScan) {
        visit_expr_scan(self, i);
    }

    fn visit_type(&mut self, i: &Type) {
        visit_type(self, i);
    }

    fn visit_value(&mut self, i: &Value) {
        visit_value(self, i);
    }
}

impl<V: Visit> Visit for &mut V {
    fn visit_expr(&mut self, i: &Expr) {
        Visit::visit_expr(&mut **self, i);
    }

    fn visit_expr_and(&mut self, i: &ExprAnd) {
        Visit::visit_expr_and(&mut **self, i);
    }

    fn visit_expr_arg(&mut self, i: &ExprArg) {
        Visit::visit_expr_arg(&mut **self, i);
    }

    fn visit_expr_assign(&mut self, i: &ExprAssign) {
        Visit::visit_expr_assign(&mut **self, i);
    }

    fn visit_expr_binary_op(&mut self, i: &ExprBinaryOp) {
        Visit::visit_expr_binary_op(&mut **self, i);
    }

    fn visit_expr_call(&mut self, i: &ExprCall) {
        Visit::visit_expr_call(&mut **self, i);
    }

    fn visit_expr_cast(&mut self, i: &ExprCast) {
        Visit::visit_expr_cast(&mut **self, i);
    }

    fn visit_expr_entities(&mut self, i: &ExprEntities) {
        Visit::visit_expr_entities(&mut **self, i);
    }

    fn visit_expr_func(&mut self, i: &ExprFunc) {
        Visit::visit_expr_func(&mut **self, i);
    }

    fn visit_expr_if(&mut self, i: &ExprIf) {
        Visit::visit_expr_if(&mut **self, i);
    }

    fn visit_expr_in_list(&mut self, i: &ExprInList) {
        Visit::visit_expr_in_list(&mut **self, i);
    }

    fn visit_expr_is_null(&mut self, i: &ExprIsNull) {
        Visit::visit_expr_is_null(&mut **self, i);
    }

    fn visit_expr_list(&mut self, i: &ExprList) {
        Visit::visit_expr_list(&mut **self, i);
    }

    fn visit_expr_member(&mut self, i: &ExprMember) {
        Visit::visit_expr_member(&mut **self, i);
    }

    fn visit_expr_not(&mut self, i: &ExprNot) {
        Visit::visit_expr_not(&mut **self, i);
    }

    fn visit_expr_or(&mut self, i: &ExprOr) {
        Visit::visit_expr_or(&mut **self, i);
    }

    fn visit_expr_project(&mut self, i: &ExprProject) {
        Visit::visit_expr_project(&mut **self, i);
    }

    fn visit_expr_query_source(&mut self, i: &ExprQuerySource) {
        Visit::visit_expr_query_source(&mut **self, i);
    }

    fn visit_expr_record(&mut self, i: &ExprRecord) {
        Visit::visit_expr_record(&mut **self, i);
    }

    fn visit_expr_scan(&mut self, i: &ExprScan) {
        Visit::visit_expr_scan(&mut **self, i);
    }

    fn visit_type(&mut self, i: &Type) {
        Visit::visit_type(&mut **self, i);
    }

    fn visit_value(&mut self, i: &Value) {
        Visit::visit_value(&mut **self, i);
    }
}

pub fn visit_expr<V>(v: &mut V, node: &Expr)
where
    V: Visit + ?Sized,
{
    match node {
        Expr::And(expr) => v.visit_expr_and(expr),
        Expr::Arg(expr) => v.visit_expr_arg(expr),
        Expr::Assign(expr) => v.visit_expr_assign(expr),
        Expr::BinaryOp(expr) => v.visit_expr_binary_op(expr),
        Expr::Call(expr) => v.visit_expr_call(expr),
        Expr::Cast(expr) => v.visit_expr_cast(expr),
        Expr::Entities(expr) => v.visit_expr_entities(expr),
        Expr::Func(expr) => v.visit_expr_func(expr),
        Expr::If(expr) => v.visit_expr_if(expr),
        Expr::InList(expr) => v.visit_expr_in_list(expr),
        Expr::IsNull(expr) => v.visit_expr_is_null(expr),
        Expr::List(expr) => v.visit_expr_list(expr),
        Expr::Member(expr) => v.visit_expr_member(expr),
        Expr::Not(expr) => v.visit_expr_not(expr),
        Expr::Or(expr) => v.visit_expr_or(expr),
        Expr::Project(expr) => v.visit_expr_project(expr),
        Expr::QuerySource(expr) => v.visit_expr_query_source(expr),
        Expr::Record(expr) => v.visit_expr_record(expr),
        Expr::Scan(expr) => v.visit_expr_scan(expr),
        Expr::Value(expr) => v.visit_value(expr),
    }
}

pub fn visit_expr_and<V>(v: &mut V, node: &ExprAnd)
where
    V: Visit + ?Sized,
{
    for expr in &node.operands {
        v.visit_expr(expr);
    }
}

pub fn visit_expr_arg<V>(v: &mut V, node: &ExprArg)
where
    V: Visit + ?Sized,
{
}

pub fn visit_expr_assign<V>(v: &mut V, node: &ExprAssign)
where
    V: Visit + ?Sized,
{
    v.visit_expr(&node.base);
    if let AssignSource::Join(join) = &node.source {
        v.visit_expr(&join.inner);
    }
}

pub fn visit_expr_binary_op<V>(v: &mut V, node: &ExprBinaryOp)
where
    V: Visit + ?Sized,
{
    v.visit_expr(&node.lhs);
    v.visit_expr(&node.rhs);
}

pub fn visit_expr_call<V>(v: &mut V, node: &ExprCall)
where
    V: Visit + ?Sized,
{
    for expr in &node.args {
        v.visit_expr(expr);
    }
}

pub fn visit_expr_cast<V>(v: &mut V, node: &ExprCast)
where
    V: Visit + ?Sized,
{
    v.visit_expr(&node.expr);
    v.visit_type(&node.ty);
}

pub fn visit_expr_entities<V>(v: &mut V, node: &ExprEntities)
where
    V: Visit + ?Sized,
{
}

pub fn visit_expr_func<V>(v: &mut V, node: &ExprFunc)
where
    V: Visit + ?Sized,
{
    v.visit_expr(&node.body);
}

pub fn visit_expr_if<V>(v: &mut V, node: &ExprIf)
where
    V: Visit + ?Sized,
{
    v.visit_expr(&node.cond);
    v.visit_expr(&node.then);
    v.visit_expr(&node.otherwise);
}

pub fn visit_expr_in_list<V>(v: &mut V, node: &ExprInList)
where
    V: Visit + ?Sized,
{
    v.visit_expr(&node.expr);
    v.visit_expr(&node.list);
}

pub fn visit_expr_is_null<V>(v: &mut V, node: &ExprIsNull)
where
    V: Visit + ?Sized,
{
    v.visit_expr(&node.expr);
}

pub fn visit_expr_list<V>(v: &mut V, node: &ExprList)
where
    V: Visit + ?Sized,
{
    for expr in &node.items {
        v.visit_expr(expr);
    }
}

pub fn visit_expr_member<V>(v: &mut V, node: &ExprMember)
where
    V: Visit + ?Sized,
{
    v.visit_expr(&node.base);
}

pub fn visit_expr_not<V>(v: &mut V, node: &ExprNot)
where
    V: Visit + ?Sized,
{
    v.visit_expr(&node.expr);
}

pub fn visit_expr_or<V>(v: &mut V, node: &ExprOr)
where
    V: Visit + ?Sized,
{
    for expr in &node.operands {
        v.visit_expr(expr);
    }
}

pub fn visit_expr_project<V>(v: &mut V, node: &ExprProject)
where
    V: Visit + ?Sized,
{
    v.visit_expr(&node.base);
}

pub fn visit_expr_query_source<V>(v: &mut V, node: &ExprQuerySource)
where
    V: Visit + ?Sized,
{
}

pub fn visit_expr_record<V>(v: &mut V, node: &ExprRecord)
where
    V: Visit + ?Sized,
{
    for expr in &node.fields {
        v.visit_expr(expr);
    }
}

pub fn visit_expr_scan<V>(v: &mut V, node: &ExprScan)
where
    V: Visit + ?Sized,
{
}

pub fn visit_type<V>(v: &mut V, node: &Type)
where
    V: Visit + ?Sized,
{
}

pub fn visit_value<V>(v: &mut V, node: &Value)
where
    V: Visit + ?Sized,
{
}

pub fn for_each_expr<F>(node: &impl Node, f: F)
where
    F: FnMut(&Expr),
{
    struct ForEach<F> {
        f: F,
    }

    impl<F> Visit for ForEach<F>
    where
        F: FnMut(&Expr),
    {
        fn visit_expr(&mut self, node: &Expr) {
            visit_expr(self, node);
            (self.f)(node);
        }
    }

    node.visit(ForEach { f });
}
