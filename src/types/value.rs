use std::cmp::Ordering;
use std::fmt;

use super::ops::CompareOp;

/// Primitive values held by a record or written as a condition literal.
///
/// Ints and floats compare with each other; bools and strings only with
/// their own kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),
}

impl Value {
    /// Compare this (record) value against a literal.
    ///
    /// Numbers are ordered numerically, ints and floats mixing freely. Any
    /// other pairing only supports `=` and `!=`: equal means same type and
    /// same value, and ordering operators are `false`.
    #[must_use]
    pub fn compare(&self, op: CompareOp, literal: &Value) -> bool {
        match self.numeric_cmp(literal) {
            Some(ordering) => op.accepts(ordering),
            // Unordered numbers (NaN) are only ever unequal.
            None if self.is_numeric() && literal.is_numeric() => op == CompareOp::Neq,
            None => match op {
                CompareOp::Eq => self.same_primitive(literal),
                CompareOp::Neq => !self.same_primitive(literal),
                CompareOp::Gt | CompareOp::Gte | CompareOp::Lt | CompareOp::Lte => false,
            },
        }
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    #[allow(clippy::cast_precision_loss)]
    fn numeric_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
            _ => None,
        }
    }

    fn same_primitive(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "'{v}'"),
        }
    }
}
