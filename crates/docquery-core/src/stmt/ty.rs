use super::Value;
use crate::{schema::app::ModelId, Result};

/// An expression type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Boolean value
    Bool,

    /// Signed 64-bit integer
    I64,

    /// String type
    String,

    /// A byte sequence
    Bytes,

    /// An instance of a model
    Model(ModelId),

    /// A synchronous, buffered sequence of a single type
    List(Box<Type>),

    /// A lazily pulled asynchronous sequence of a single type. Only produced
    /// by the asynchronous adapter call.
    Stream(Box<Type>),

    /// The output of a `GroupBy` operator: a key and the list of elements
    /// sharing it. Values of this type are `Record([key, List(elements)])`.
    Grouping(Box<Type>, Box<Type>),

    /// A fixed-length tuple where each item can have a different type.
    Record(Vec<Type>),

    /// A lambda taking the given arguments and returning a value.
    Func(Vec<Type>, Box<Type>),

    /// The null type can be cast to any type.
    Null,

    /// A type that could not be inferred (e.g., empty list)
    Unknown,
}

impl Type {
    pub fn list(ty: impl Into<Self>) -> Self {
        Self::List(Box::new(ty.into()))
    }

    pub fn stream(ty: impl Into<Self>) -> Self {
        Self::Stream(Box::new(ty.into()))
    }

    pub fn grouping(key: impl Into<Self>, element: impl Into<Self>) -> Self {
        Self::Grouping(Box::new(key.into()), Box::new(element.into()))
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Self::String)
    }

    pub fn is_bytes(&self) -> bool {
        matches!(self, Self::Bytes)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    pub fn is_stream(&self) -> bool {
        matches!(self, Self::Stream(_))
    }

    pub fn is_model(&self) -> bool {
        matches!(self, Self::Model(_))
    }

    pub fn as_model(&self) -> Option<ModelId> {
        match self {
            Self::Model(id) => Some(*id),
            _ => None,
        }
    }

    /// Returns `true` if the type is parameterized over other types.
    pub fn is_generic(&self) -> bool {
        matches!(
            self,
            Self::List(_) | Self::Stream(_) | Self::Grouping(..) | Self::Record(_) | Self::Func(..)
        )
    }

    /// Returns the element type when the type is a sequence, synchronous or
    /// not.
    pub fn sequence_element(&self) -> Option<&Type> {
        match self {
            Self::List(item) | Self::Stream(item) => Some(item),
            _ => None,
        }
    }

    /// Builds a sequence of `item` that is asynchronous when `self` is.
    pub fn sequence_like(&self, item: impl Into<Self>) -> Self {
        match self {
            Self::Stream(_) => Self::stream(item),
            _ => Self::list(item),
        }
    }

    /// Casts a value to this type.
    ///
    /// Only checks compatibility: values are already in their runtime
    /// representation, so no conversion happens.
    pub fn cast(&self, value: Value) -> Result<Value> {
        let ok = match (self, &value) {
            (_, Value::Null) => true,
            (Self::Bool, Value::Bool(_)) => true,
            (Self::I64, Value::I64(_)) => true,
            (Self::String, Value::String(_)) => true,
            (Self::Bytes, Value::Bytes(_)) => true,
            (Self::Model(_) | Self::Record(_) | Self::Grouping(..), Value::Record(_)) => true,
            (Self::List(_) | Self::Stream(_), Value::List(_)) => true,
            (Self::Unknown, _) => true,
            _ => false,
        };

        if ok {
            Ok(value)
        } else {
            Err(crate::Error::expression_evaluation_failed(format!(
                "cannot cast {value:?} to {self:?}"
            )))
        }
    }
}

impl From<&Type> for Type {
    fn from(value: &Type) -> Self {
        value.clone()
    }
}

impl From<ModelId> for Type {
    fn from(value: ModelId) -> Self {
        Self::Model(value)
    }
}
