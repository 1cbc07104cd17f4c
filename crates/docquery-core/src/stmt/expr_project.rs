use super::*;

/// Reads one slot of a record-typed expression.
///
/// Used for the intermediate records built by join and additional-from
/// clauses, and for the key and elements of a grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprProject {
    pub base: Box<Expr>,
    pub index: usize,
}

impl Expr {
    pub fn project(base: impl Into<Expr>, index: usize) -> Expr {
        ExprProject {
            base: Box::new(base.into()),
            index,
        }
        .into()
    }

    pub fn is_project(&self) -> bool {
        matches!(self, Expr::Project(..))
    }
}

impl From<ExprProject> for Expr {
    fn from(value: ExprProject) -> Self {
        Expr::Project(value)
    }
}
