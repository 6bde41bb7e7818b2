//! Raw property values and the values bound into a naming tree.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

/// A flat, ordered mapping from property key to raw value.
///
/// One bag is produced per file (or node), consumed once by the binder and
/// then discarded.
pub type PropertyBag = IndexMap<String, RawValue>;

/// A value exactly as a property source produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Single(String),
    List(Vec<String>),
}

impl RawValue {
    /// Returns the value if it is a single string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::Single(s) => Some(s),
            RawValue::List(_) => None,
        }
    }

    /// Appends another occurrence of the same key, promoting to a list.
    pub fn push(&mut self, value: String) {
        match self {
            RawValue::Single(first) => {
                let first = std::mem::take(first);
                *self = RawValue::List(vec![first, value]);
            }
            RawValue::List(values) => values.push(value),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Single(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Single(value)
    }
}

impl From<Vec<String>> for RawValue {
    fn from(values: Vec<String>) -> Self {
        RawValue::List(values)
    }
}

/// A value bound as a leaf of the naming tree.
#[derive(Clone)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Datetime(toml::value::Datetime),
    List(Vec<Value>),
    Table(IndexMap<String, Value>),
    /// A domain object produced by a converter, e.g. a connection descriptor.
    Object(Arc<dyn Any + Send + Sync>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Table(table) => Some(table),
            _ => None,
        }
    }

    /// Downcasts an [`Value::Object`] to its concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Object(object) => object.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl From<RawValue> for Value {
    fn from(raw: RawValue) -> Self {
        match raw {
            RawValue::Single(s) => Value::Text(s),
            RawValue::List(values) => Value::List(values.into_iter().map(Value::Text).collect()),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Value::Integer(i) => f.debug_tuple("Integer").field(i).finish(),
            Value::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Value::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            Value::Datetime(dt) => f.debug_tuple("Datetime").field(dt).finish(),
            Value::List(values) => f.debug_tuple("List").field(values).finish(),
            Value::Table(table) => f.debug_tuple("Table").field(table).finish(),
            Value::Object(_) => write!(f, "Object(..)"),
        }
    }
}

// Objects compare by identity; everything else structurally.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Datetime(a), Value::Datetime(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Table(a), Value::Table(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Short human-readable description used in clash errors.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s:?}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Datetime(dt) => write!(f, "{dt}"),
            Value::List(values) => write!(f, "list of {} values", values.len()),
            Value::Table(table) => write!(f, "table of {} entries", table.len()),
            Value::Object(_) => write!(f, "object"),
        }
    }
}
