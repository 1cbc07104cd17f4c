use super::*;

/// The operator applied by an [`ExprCall`].
///
/// The first argument of every sequence operator is the source sequence.
/// Lambda arguments are [`ExprFunc`] expressions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    /// `(source, |item| projection)`
    Select,

    /// `(source, |item| predicate)`
    Where,

    /// `(source, |item| collection)`. Yields `(item, element)` records.
    SelectMany,

    /// `(source, |item| key, ...)`, one key lambda per direction.
    OrderBy(Vec<Direction>),

    /// `(source, count)`
    Take,

    /// `(source, count)`
    Skip,

    First,
    FirstOrDefault,
    Single,
    SingleOrDefault,

    /// `(source)` or `(source, |item| predicate)`
    Any,

    /// `(source, |item| predicate)`
    All,

    Count,
    Distinct,

    /// `(source, |item| key, |item| element)`
    GroupBy,

    /// `(outer, inner, |o| key, |i| key)`. Yields `(outer, inner)` records.
    Join,

    /// `(outer, inner, |o| key, |i| key)`. Yields `(outer, [inner])` records.
    GroupJoin,

    /// Adapts a synchronous sequence into a lazily pulled asynchronous one.
    ToAsync,

    /// Marks a navigation path of the argument entity for eager population.
    /// Rewritten into assignments during compilation.
    Include(Vec<FieldId>),
}

impl Method {
    pub fn is_include(&self) -> bool {
        matches!(self, Self::Include(_))
    }

    pub fn is_to_async(&self) -> bool {
        matches!(self, Self::ToAsync)
    }

    /// Returns `true` for operators that reduce a sequence to one element.
    pub fn is_element(&self) -> bool {
        matches!(
            self,
            Self::First | Self::FirstOrDefault | Self::Single | Self::SingleOrDefault
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Select => "Select",
            Self::Where => "Where",
            Self::SelectMany => "SelectMany",
            Self::OrderBy(_) => "OrderBy",
            Self::Take => "Take",
            Self::Skip => "Skip",
            Self::First => "First",
            Self::FirstOrDefault => "FirstOrDefault",
            Self::Single => "Single",
            Self::SingleOrDefault => "SingleOrDefault",
            Self::Any => "Any",
            Self::All => "All",
            Self::Count => "Count",
            Self::Distinct => "Distinct",
            Self::GroupBy => "GroupBy",
            Self::Join => "Join",
            Self::GroupJoin => "GroupJoin",
            Self::ToAsync => "ToAsync",
            Self::Include(_) => "Include",
        }
    }
}
