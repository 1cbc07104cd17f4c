use super::*;

/// A lambda. The body refers to the parameters with [`ExprArg`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExprFunc {
    /// Parameter types
    pub args: Vec<Type>,

    /// Function body
    pub body: Box<Expr>,
}

impl Expr {
    pub fn func(args: impl IntoIterator<Item = Type>, body: impl Into<Expr>) -> Self {
        ExprFunc {
            args: args.into_iter().collect(),
            body: Box::new(body.into()),
        }
        .into()
    }

    /// A single-parameter lambda.
    pub fn lambda(arg: impl Into<Type>, body: impl Into<Expr>) -> Self {
        Self::func([arg.into()], body)
    }

    pub fn as_func(&self) -> Option<&ExprFunc> {
        match self {
            Self::Func(func) => Some(func),
            _ => None,
        }
    }
}

impl ExprFunc {
    pub fn ret(&self) -> Type {
        self.body.ty()
    }
}

impl From<ExprFunc> for Expr {
    fn from(value: ExprFunc) -> Self {
        Self::Func(value)
    }
}
