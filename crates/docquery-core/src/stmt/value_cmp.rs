//! Ordering for values and `PartialEq` implementations between `Value` and
//! Rust primitive types.

use super::{Expr, Value};
use std::cmp::Ordering;

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Null, Value::Null) => Some(Ordering::Equal),
            (Value::Bool(a), Value::Bool(b)) => a.partial_cmp(b),
            (Value::I64(a), Value::I64(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => a.partial_cmp(b),
            (Value::Bytes(a), Value::Bytes(b)) => a.partial_cmp(b),
            (Value::Record(a), Value::Record(b)) => cmp_slices(a, b),
            (Value::List(a), Value::List(b)) => cmp_slices(a, b),
            _ => None,
        }
    }
}

fn cmp_slices(lhs: &[Value], rhs: &[Value]) -> Option<Ordering> {
    for (lhs, rhs) in lhs.iter().zip(rhs) {
        match lhs.partial_cmp(rhs)? {
            Ordering::Equal => {}
            ordering => return Some(ordering),
        }
    }

    Some(lhs.len().cmp(&rhs.len()))
}

/// Total order used for sorting: nulls sort first, incomparable values are
/// treated as equal so the sort stays stable.
pub(crate) fn cmp_sort(lhs: &Value, rhs: &Value) -> Ordering {
    match (lhs, rhs) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        _ => lhs.partial_cmp(rhs).unwrap_or(Ordering::Equal),
    }
}

macro_rules! impl_value_eq {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl PartialEq<$ty> for Value {
                fn eq(&self, other: &$ty) -> bool {
                    matches!(self, Value::$variant(val) if val == other)
                }
            }

            impl PartialEq<$ty> for Expr {
                fn eq(&self, other: &$ty) -> bool {
                    matches!(self, Expr::Value(Value::$variant(val)) if val == other)
                }
            }

            impl PartialEq<Value> for $ty {
                fn eq(&self, other: &Value) -> bool {
                    other.eq(self)
                }
            }
        )*
    };
}

impl_value_eq! {
    bool => Bool,
    i64 => I64,
    String => String,
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        matches!(self, Value::String(val) if val == other)
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        matches!(self, Value::String(val) if val == other)
    }
}

impl PartialEq<&str> for Expr {
    fn eq(&self, other: &&str) -> bool {
        matches!(self, Expr::Value(Value::String(val)) if val == other)
    }
}
