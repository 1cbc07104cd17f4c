use super::*;

/// A method call: sequence operators, include markers and the asynchronous
/// adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprCall {
    pub method: Method,
    pub args: Vec<Expr>,

    /// The call's result type
    pub ty: Type,
}

impl Expr {
    pub fn call(method: Method, args: Vec<Expr>, ty: impl Into<Type>) -> Self {
        ExprCall {
            method,
            args,
            ty: ty.into(),
        }
        .into()
    }

    pub fn select(source: impl Into<Expr>, selector: impl Into<Expr>) -> Self {
        let source = source.into();
        let selector = selector.into();
        let ty = source.ty().sequence_like(func_ret(&selector));
        Self::call(Method::Select, vec![source, selector], ty)
    }

    pub fn filter(source: impl Into<Expr>, predicate: impl Into<Expr>) -> Self {
        let source = source.into();
        let ty = source.ty();
        Self::call(Method::Where, vec![source, predicate.into()], ty)
    }

    pub fn select_many(source: impl Into<Expr>, collection: impl Into<Expr>) -> Self {
        let source = source.into();
        let collection = collection.into();
        let source_ty = source.ty();
        let item = Type::Record(vec![
            element_ty(&source_ty),
            element_ty(&func_ret(&collection)),
        ]);
        Self::call(
            Method::SelectMany,
            vec![source, collection],
            source_ty.sequence_like(item),
        )
    }

    pub fn order_by(source: impl Into<Expr>, keys: Vec<(Expr, Direction)>) -> Self {
        let source = source.into();
        let ty = source.ty();
        let (keys, directions): (Vec<_>, Vec<_>) = keys.into_iter().unzip();

        let mut args = vec![source];
        args.extend(keys);
        Self::call(Method::OrderBy(directions), args, ty)
    }

    pub fn take(source: impl Into<Expr>, count: impl Into<Expr>) -> Self {
        let source = source.into();
        let ty = source.ty();
        Self::call(Method::Take, vec![source, count.into()], ty)
    }

    pub fn skip(source: impl Into<Expr>, count: impl Into<Expr>) -> Self {
        let source = source.into();
        let ty = source.ty();
        Self::call(Method::Skip, vec![source, count.into()], ty)
    }

    /// Applies one of the element operators (`First`, `Single`, ...).
    pub fn element(method: Method, source: impl Into<Expr>) -> Self {
        debug_assert!(method.is_element(), "method={method:?}");
        let source = source.into();
        let ty = element_ty(&source.ty());
        Self::call(method, vec![source], ty)
    }

    pub fn any(source: impl Into<Expr>, predicate: Option<Expr>) -> Self {
        let mut args = vec![source.into()];
        args.extend(predicate);
        Self::call(Method::Any, args, Type::Bool)
    }

    pub fn all(source: impl Into<Expr>, predicate: impl Into<Expr>) -> Self {
        Self::call(
            Method::All,
            vec![source.into(), predicate.into()],
            Type::Bool,
        )
    }

    pub fn count(source: impl Into<Expr>) -> Self {
        Self::call(Method::Count, vec![source.into()], Type::I64)
    }

    pub fn distinct(source: impl Into<Expr>) -> Self {
        let source = source.into();
        let ty = source.ty();
        Self::call(Method::Distinct, vec![source], ty)
    }

    pub fn group_by(
        source: impl Into<Expr>,
        key: impl Into<Expr>,
        element: impl Into<Expr>,
    ) -> Self {
        let source = source.into();
        let key = key.into();
        let element = element.into();
        let ty = source
            .ty()
            .sequence_like(Type::grouping(func_ret(&key), func_ret(&element)));
        Self::call(Method::GroupBy, vec![source, key, element], ty)
    }

    pub fn join(
        outer: impl Into<Expr>,
        inner: impl Into<Expr>,
        outer_key: impl Into<Expr>,
        inner_key: impl Into<Expr>,
    ) -> Self {
        let outer = outer.into();
        let inner = inner.into();
        let outer_ty = outer.ty();
        let item = Type::Record(vec![element_ty(&outer_ty), element_ty(&inner.ty())]);
        Self::call(
            Method::Join,
            vec![outer, inner, outer_key.into(), inner_key.into()],
            outer_ty.sequence_like(item),
        )
    }

    pub fn group_join(
        outer: impl Into<Expr>,
        inner: impl Into<Expr>,
        outer_key: impl Into<Expr>,
        inner_key: impl Into<Expr>,
    ) -> Self {
        let outer = outer.into();
        let inner = inner.into();
        let outer_ty = outer.ty();
        let item = Type::Record(vec![
            element_ty(&outer_ty),
            Type::list(element_ty(&inner.ty())),
        ]);
        Self::call(
            Method::GroupJoin,
            vec![outer, inner, outer_key.into(), inner_key.into()],
            outer_ty.sequence_like(item),
        )
    }

    /// Wraps a sequence in the asynchronous adapter.
    pub fn to_async(source: impl Into<Expr>) -> Self {
        let source = source.into();
        let ty = Type::stream(element_ty(&source.ty()));
        Self::call(Method::ToAsync, vec![source], ty)
    }

    /// Marks `path`, starting at the entity `expr`, for eager population.
    pub fn include(path: Vec<FieldId>, expr: impl Into<Expr>) -> Self {
        let expr = expr.into();
        let ty = expr.ty();
        Self::call(Method::Include(path), vec![expr], ty)
    }

    pub fn is_call(&self) -> bool {
        matches!(self, Self::Call(_))
    }

    pub fn is_include(&self) -> bool {
        matches!(self, Self::Call(call) if call.method.is_include())
    }

    pub fn is_to_async(&self) -> bool {
        matches!(self, Self::Call(call) if call.method.is_to_async())
    }

    pub fn as_call(&self) -> Option<&ExprCall> {
        match self {
            Self::Call(call) => Some(call),
            _ => None,
        }
    }
}

impl ExprCall {
    /// The source sequence, or the included entity for include markers.
    pub fn source(&self) -> Option<&Expr> {
        self.args.first()
    }
}

impl From<ExprCall> for Expr {
    fn from(value: ExprCall) -> Self {
        Self::Call(value)
    }
}

fn element_ty(ty: &Type) -> Type {
    ty.sequence_element().cloned().unwrap_or(Type::Unknown)
}

fn func_ret(func: &Expr) -> Type {
    match func {
        Expr::Func(func) => func.ret(),
        _ => Type::Unknown,
    }
}
