use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::Error;

/// A native value used as a literal operand in a query.
///
/// Column references render as bare identifiers; everything wrapped in a
/// `Value` renders as a literal through [`crate::output::quote`].
///
/// # Examples
///
/// ```
/// use kusto_tool::Value;
///
/// let s = Value::from("hello");
/// let n = Value::from(42);
/// let list = Value::from(vec!["a", "b"]);
/// assert_eq!(s, Value::String("hello".to_string()));
/// assert_eq!(n, Value::Integer(42));
/// assert!(matches!(list, Value::Array(_)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Typeless null
    Null,

    /// Boolean (true/false)
    Boolean(bool),

    /// Integer number (rendered without a fractional part)
    Integer(i64),

    /// Floating-point number
    Float(f64),

    /// Exact decimal, rendered as `decimal(...)`
    Decimal(Decimal),

    /// UTF-8 string
    String(String),

    /// Ordered collection, rendered as a `dynamic([...])` list
    Array(Vec<Value>),

    /// Key/value pairs in insertion order, rendered as a lookup `datatable`
    Object(Vec<(String, Value)>),
}

impl Value {
    /// The column type a literal of this kind produces.
    pub fn dtype(&self) -> DType {
        match self {
            Value::Null => DType::Dynamic,
            Value::Boolean(_) => DType::Bool,
            Value::Integer(_) => DType::Long,
            Value::Float(_) => DType::Real,
            Value::Decimal(_) => DType::Decimal,
            Value::String(_) => DType::String,
            Value::Array(_) | Value::Object(_) => DType::Dynamic,
        }
    }

    /// Plain text of the value, without literal quoting.
    pub fn as_string(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Integer(n) => n.to_string(),
            Value::Float(n) => format!("{n:?}"),
            Value::Decimal(d) => d.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Null => "null".to_string(),
            Value::Array(_) | Value::Object(_) => crate::output::quote(self),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::Array(values.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => Value::Array(arr.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(obj) => {
                Value::Object(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

/// Column data type tag.
///
/// `Dynamic` is the property-bag marker: only columns of this type allow
/// field access through [`crate::Column::field`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    String,
    Int,
    Long,
    Real,
    Decimal,
    Bool,
    DateTime,
    TimeSpan,
    Guid,
    Dynamic,
}

impl DType {
    /// Type name as written in the query language.
    pub fn as_str(&self) -> &'static str {
        match self {
            DType::String => "string",
            DType::Int => "int",
            DType::Long => "long",
            DType::Real => "real",
            DType::Decimal => "decimal",
            DType::Bool => "bool",
            DType::DateTime => "datetime",
            DType::TimeSpan => "timespan",
            DType::Guid => "guid",
            DType::Dynamic => "dynamic",
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, DType::Dynamic)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Aliases follow the engine's own synonyms (double, date, time, uuid).
        match s.trim().to_ascii_lowercase().as_str() {
            "string" => Ok(DType::String),
            "int" => Ok(DType::Int),
            "long" => Ok(DType::Long),
            "real" | "double" => Ok(DType::Real),
            "decimal" => Ok(DType::Decimal),
            "bool" | "boolean" => Ok(DType::Bool),
            "datetime" | "date" => Ok(DType::DateTime),
            "timespan" | "time" => Ok(DType::TimeSpan),
            "guid" | "uuid" | "uniqueid" => Ok(DType::Guid),
            "dynamic" => Ok(DType::Dynamic),
            _ => Err(Error::UnknownType(s.to_string())),
        }
    }
}
