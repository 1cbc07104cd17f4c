use super::*;

#[derive(Clone, PartialEq)]
pub enum Expr {
    /// AND a set of boolean expressions
    And(ExprAnd),

    /// A lambda parameter reference
    Arg(ExprArg),

    /// Populate a navigation on entities reached from a base expression
    Assign(ExprAssign),

    /// Binary expression
    BinaryOp(ExprBinaryOp),

    /// Method call (sequence operators, include markers, async adapter)
    Call(ExprCall),

    /// Cast an expression to a different type
    Cast(ExprCast),

    /// All entities of a model. Only valid before binding.
    Entities(ExprEntities),

    /// A lambda
    Func(ExprFunc),

    /// Conditional expression
    If(ExprIf),

    /// In list
    InList(ExprInList),

    /// Whether an expression is (or is not) null.
    IsNull(ExprIsNull),

    /// A list of expressions of the same type
    List(ExprList),

    /// Read a model field
    Member(ExprMember),

    /// Negates a boolean expression
    Not(ExprNot),

    /// OR a set of boolean expressions
    Or(ExprOr),

    /// Read a record slot
    Project(ExprProject),

    /// Reference to a query source. Only valid before binding.
    QuerySource(ExprQuerySource),

    /// Evaluates to a tuple value
    Record(ExprRecord),

    /// Read the documents of a collection
    Scan(ExprScan),

    /// Evaluates to a constant value
    Value(Value),
}

impl Expr {
    pub fn null() -> Self {
        Self::Value(Value::Null)
    }

    /// Is a value that evaluates to null
    pub fn is_value_null(&self) -> bool {
        matches!(self, Self::Value(Value::Null))
    }

    /// Returns true if the expression is the `true` boolean expression
    pub fn is_true(&self) -> bool {
        matches!(self, Self::Value(Value::Bool(true)))
    }

    /// Returns true if the expression is a constant value.
    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(..))
    }

    /// Returns the type the expression evaluates to.
    pub fn ty(&self) -> Type {
        match self {
            Self::And(_)
            | Self::BinaryOp(_)
            | Self::InList(_)
            | Self::IsNull(_)
            | Self::Not(_)
            | Self::Or(_) => Type::Bool,
            Self::Arg(expr) => expr.ty.clone(),
            Self::Assign(expr) => expr.base.ty(),
            Self::Call(expr) => expr.ty.clone(),
            Self::Cast(expr) => expr.ty.clone(),
            Self::Entities(expr) => Type::list(expr.model),
            Self::Func(expr) => Type::Func(expr.args.clone(), Box::new(expr.ret())),
            Self::If(expr) => match expr.then.ty() {
                Type::Null => expr.otherwise.ty(),
                ty => ty,
            },
            Self::List(expr) => match expr.items.first() {
                Some(item) => Type::list(item.ty()),
                None => Type::list(Type::Unknown),
            },
            Self::Member(expr) => expr.ty.clone(),
            Self::Project(expr) => match expr.base.ty() {
                Type::Record(mut tys) if expr.index < tys.len() => tys.swap_remove(expr.index),
                Type::Grouping(key, _) if expr.index == 0 => *key,
                Type::Grouping(_, element) if expr.index == 1 => Type::List(element),
                _ => Type::Unknown,
            },
            Self::QuerySource(expr) => expr.ty.clone(),
            Self::Record(expr) => Type::Record(expr.iter().map(Expr::ty).collect()),
            Self::Scan(expr) => Type::list(expr.model),
            Self::Value(value) => value.ty(),
        }
    }

    /// Returns a copy of the expression with every node transformed by `f`,
    /// children first.
    pub fn map_exprs(&self, f: impl FnMut(&mut Expr)) -> Self {
        let mut mapped = self.clone();
        visit_mut::for_each_expr_mut(&mut mapped, f);
        mapped
    }

    /// Returns `true` if any node of the expression satisfies `f`.
    pub fn contains_expr(&self, mut f: impl FnMut(&Expr) -> bool) -> bool {
        let mut found = false;
        visit::for_each_expr(self, |expr| found = found || f(expr));
        found
    }
}

impl Default for Expr {
    fn default() -> Self {
        Self::Value(Value::default())
    }
}

impl Node for Expr {
    fn visit<V: Visit>(&self, mut visit: V) {
        visit.visit_expr(self);
    }

    fn visit_mut<V: VisitMut>(&mut self, mut visit: V) {
        visit.visit_expr_mut(self);
    }
}

// === Conversions ===

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Self::Value(value.into())
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Self::Value(value.into())
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Self::Value(value.into())
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl<E1, E2> From<(E1, E2)> for Expr
where
    E1: Into<Self>,
    E2: Into<Self>,
{
    fn from(value: (E1, E2)) -> Self {
        Self::Record(value.into())
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And(e) => e.fmt(f),
            Self::Arg(e) => e.fmt(f),
            Self::Assign(e) => e.fmt(f),
            Self::BinaryOp(e) => e.fmt(f),
            Self::Call(e) => e.fmt(f),
            Self::Cast(e) => e.fmt(f),
            Self::Entities(e) => e.fmt(f),
            Self::Func(e) => e.fmt(f),
            Self::If(e) => e.fmt(f),
            Self::InList(e) => e.fmt(f),
            Self::IsNull(e) => e.fmt(f),
            Self::List(e) => e.fmt(f),
            Self::Member(e) => e.fmt(f),
            Self::Not(e) => e.fmt(f),
            Self::Or(e) => e.fmt(f),
            Self::Project(e) => e.fmt(f),
            Self::QuerySource(e) => e.fmt(f),
            Self::Record(e) => e.fmt(f),
            Self::Scan(e) => e.fmt(f),
            Self::Value(e) => e.fmt(f),
        }
    }
}
