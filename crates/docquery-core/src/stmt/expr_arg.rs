use super::*;

/// A lambda parameter reference.
///
/// `position` selects the parameter of the enclosing function and `nesting`
/// counts how many function scopes to walk outwards first: `nesting == 0`
/// refers to the innermost function.
///
/// # Examples
///
/// ```text
/// |e| e.specialties.any(|s| s.name == e.first_name)
///
/// s => arg(0, nesting = 0)   // inside the inner function
/// e => arg(0, nesting = 1)   // inside the inner function
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct ExprArg {
    /// The zero-based position of the argument.
    pub position: usize,

    /// Number of function scopes between the reference and its binding.
    pub nesting: usize,

    /// The argument type.
    pub ty: Type,
}

impl Expr {
    pub fn arg(position: usize, ty: impl Into<Type>) -> Self {
        Self::Arg(ExprArg::new(position, ty))
    }

    pub fn is_arg(&self) -> bool {
        matches!(self, Self::Arg(_))
    }

    /// Returns `true` if the expression is the innermost function's first
    /// parameter, unchanged.
    pub fn is_identity_arg(&self) -> bool {
        matches!(
            self,
            Self::Arg(ExprArg {
                position: 0,
                nesting: 0,
                ..
            })
        )
    }
}

impl ExprArg {
    pub fn new(position: usize, ty: impl Into<Type>) -> ExprArg {
        ExprArg {
            position,
            nesting: 0,
            ty: ty.into(),
        }
    }
}

impl From<ExprArg> for Expr {
    fn from(value: ExprArg) -> Self {
        Self::Arg(value)
    }
}
