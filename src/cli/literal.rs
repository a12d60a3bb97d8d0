//! JSON -> query literal conversion

use super::CliError;
use crate::Value;
use crate::output::{dict_to_datatable, list_to_kusto, quote};

/// Convert a JSON document to query-language literal text.
///
/// Objects become a key/value `datatable`, arrays a `dynamic` list, and
/// scalars a single literal.
pub fn json_to_literal(json: &str) -> Result<String, CliError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    Ok(match Value::from(value) {
        Value::Object(pairs) => dict_to_datatable(&pairs),
        Value::Array(items) => list_to_kusto(&items),
        scalar => quote(&scalar),
    })
}
