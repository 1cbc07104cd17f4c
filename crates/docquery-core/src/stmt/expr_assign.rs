use super::*;

/// Populates a navigation slot on entities reached from `base`.
///
/// `base` evaluates to an entity or a list of entities. From each, `path`
/// walks embedded navigations (fanning out through embedded lists) to the
/// target entities whose `navigation` slot is populated. The expression
/// evaluates to `base` with the slots set.
///
/// For single-valued joins, targets without a counterpart keep their
/// current slot value. Collection joins always assign a list, empty when
/// nothing matched.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprAssign {
    pub base: Box<Expr>,
    pub path: Vec<FieldId>,
    pub navigation: FieldId,
    pub source: AssignSource,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssignSource {
    /// Assigns the entity one level up the path: the document that embeds
    /// the target. Used for back-references of embedded entities.
    Parent,

    /// Assigns matching entities of a separately loaded sequence.
    Join(AssignJoin),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignJoin {
    /// Sequence of candidate entities
    pub inner: Box<Expr>,

    /// Key read from each target
    pub outer_key: FieldId,

    /// Key read from each candidate
    pub inner_key: FieldId,

    /// When set, all matches are assigned as a list, possibly empty.
    /// Otherwise at most one candidate may match.
    pub many: bool,
}

impl Expr {
    pub fn assign(
        base: impl Into<Expr>,
        path: Vec<FieldId>,
        navigation: FieldId,
        source: AssignSource,
    ) -> Self {
        ExprAssign {
            base: Box::new(base.into()),
            path,
            navigation,
            source,
        }
        .into()
    }

    pub fn is_assign(&self) -> bool {
        matches!(self, Self::Assign(_))
    }
}

impl AssignSource {
    pub fn join(inner: impl Into<Expr>, outer_key: FieldId, inner_key: FieldId, many: bool) -> Self {
        Self::Join(AssignJoin {
            inner: Box::new(inner.into()),
            outer_key,
            inner_key,
            many,
        })
    }

    pub fn is_parent(&self) -> bool {
        matches!(self, Self::Parent)
    }
}

impl From<ExprAssign> for Expr {
    fn from(value: ExprAssign) -> Self {
        Self::Assign(value)
    }
}
