//! Literal rendering for query values.
//!
//! Every native [`Value`] renders to *some* text. Nothing here validates that
//! the result is accepted by the engine; in particular string literals are
//! wrapped in single quotes without escaping embedded quotes, so callers must
//! not pass text containing `'`.
//!
//! # Examples
//!
//! ```
//! use kusto_tool::Value;
//! use kusto_tool::output::{quote, list_to_kusto};
//!
//! assert_eq!(quote(&Value::from("a")), "'a'");
//! assert_eq!(quote(&Value::from(2)), "2");
//! assert_eq!(
//!     list_to_kusto(&[Value::from("a"), Value::from("b")]),
//!     "dynamic([\n\t'a',\n\t'b'\n])"
//! );
//! ```

use crate::value::Value;

/// Renders a value as a query-language literal.
pub fn quote(value: &Value) -> String {
    match value {
        Value::Null => "dynamic(null)".to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Integer(n) => n.to_string(),
        Value::Float(n) => format!("{n:?}"),
        Value::Decimal(d) => format!("decimal({d})"),
        Value::String(s) => format!("'{s}'"),
        Value::Array(items) => list_to_kusto(items),
        Value::Object(pairs) => dict_to_datatable(pairs),
    }
}

/// Renders an ordered collection as a `dynamic([...])` list, one element per line.
pub fn list_to_kusto(items: &[Value]) -> String {
    if items.is_empty() {
        return "dynamic([])".to_string();
    }

    let items: Vec<String> = items.iter().map(quote).collect();
    format!("dynamic([\n\t{}\n])", items.join(",\n\t"))
}

/// Renders key/value pairs as a two-column string `datatable` for use as a
/// lookup table.
///
/// ```
/// use kusto_tool::Value;
/// use kusto_tool::output::dict_to_datatable;
///
/// let pairs = vec![
///     ("foo".to_string(), Value::from("one")),
///     ("bar".to_string(), Value::from("two")),
/// ];
/// assert_eq!(
///     dict_to_datatable(&pairs),
///     "datatable(key: string, value: string)[\n    'foo', 'one',\n\t'bar', 'two',\n]"
/// );
/// ```
pub fn dict_to_datatable(pairs: &[(String, Value)]) -> String {
    let rows: Vec<String> = pairs
        .iter()
        .map(|(k, v)| format!("'{}', '{}',", k, v.as_string()))
        .collect();
    format!("datatable(key: string, value: string)[\n    {}\n]", rows.join("\n\t"))
}
