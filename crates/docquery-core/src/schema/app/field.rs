use super::{BelongsTo, Embedded, HasMany, ModelId};
use crate::stmt;
use std::fmt;

#[derive(Debug, Clone)]
pub struct Field {
    /// Uniquely identifies the field within the containing model.
    pub id: FieldId,

    /// The field name
    pub name: String,

    /// Primitive, relation, embedded, ...
    pub ty: FieldTy,

    /// True if the field is the model's primary key
    pub primary_key: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct FieldId {
    pub model: ModelId,
    pub index: usize,
}

#[derive(Clone)]
pub enum FieldTy {
    Primitive(stmt::Type),

    /// The stored type discriminator of a model hierarchy
    Discriminator,

    Embedded(Embedded),
    BelongsTo(BelongsTo),
    HasMany(HasMany),
}

impl Field {
    /// Gets the id.
    pub fn id(&self) -> FieldId {
        self.id
    }

    /// The type of the value read from the field.
    pub fn expr_ty(&self) -> stmt::Type {
        match &self.ty {
            FieldTy::Primitive(ty) => ty.clone(),
            FieldTy::Discriminator => stmt::Type::String,
            FieldTy::Embedded(embedded) => embedded.expr_ty(),
            FieldTy::BelongsTo(belongs_to) => stmt::Type::Model(belongs_to.target),
            FieldTy::HasMany(has_many) => stmt::Type::list(has_many.target),
        }
    }

    /// Returns `true` if the field navigates to other entities.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self.ty,
            FieldTy::Embedded(_) | FieldTy::BelongsTo(_) | FieldTy::HasMany(_)
        )
    }

    /// Returns `true` if the field navigates to entities of another
    /// collection.
    pub fn is_referenced(&self) -> bool {
        matches!(self.ty, FieldTy::BelongsTo(_) | FieldTy::HasMany(_))
    }
}

impl FieldTy {
    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive(..))
    }

    pub fn is_discriminator(&self) -> bool {
        matches!(self, Self::Discriminator)
    }

    pub fn as_embedded(&self) -> Option<&Embedded> {
        match self {
            Self::Embedded(embedded) => Some(embedded),
            _ => None,
        }
    }

    pub fn as_belongs_to(&self) -> Option<&BelongsTo> {
        match self {
            Self::BelongsTo(belongs_to) => Some(belongs_to),
            _ => None,
        }
    }

    pub fn as_has_many(&self) -> Option<&HasMany> {
        match self {
            Self::HasMany(has_many) => Some(has_many),
            _ => None,
        }
    }

    #[track_caller]
    pub fn expect_belongs_to(&self) -> &BelongsTo {
        match self {
            Self::BelongsTo(belongs_to) => belongs_to,
            _ => panic!("expected field to be `BelongsTo`, but was {self:?}"),
        }
    }
}

impl fmt::Debug for FieldTy {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(ty) => ty.fmt(fmt),
            Self::Discriminator => fmt.write_str("Discriminator"),
            Self::Embedded(ty) => ty.fmt(fmt),
            Self::BelongsTo(ty) => ty.fmt(fmt),
            Self::HasMany(ty) => ty.fmt(fmt),
        }
    }
}

impl From<&Self> for FieldId {
    fn from(val: &Self) -> Self {
        *val
    }
}

impl From<&Field> for FieldId {
    fn from(value: &Field) -> Self {
        value.id
    }
}

impl fmt::Debug for FieldId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "FieldId({}/{})", self.model.0, self.index)
    }
}
