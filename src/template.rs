//! Query templates and table-population commands.
//!
//! Templates use `{{ name }}` placeholders. Array parameters are expanded to
//! a `dynamic([...])` literal so they can be used with `in`; strings are
//! inserted as-is, without quoting.
//!
//! # Examples
//!
//! ```
//! use kusto_tool::template::{Params, render_template_query};
//!
//! let mut params = Params::new();
//! params.insert("table".into(), "StormEvents".into());
//! params.insert("n".into(), 10.into());
//!
//! let query = render_template_query("{{ table }} | take {{n}}", &params).unwrap();
//! assert_eq!(query, "StormEvents | take 10");
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::error::TemplateError;
use crate::output::list_to_kusto;
use crate::value::Value;

/// Template parameters by name.
pub type Params = serde_json::Map<String, serde_json::Value>;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder pattern is valid")
});

/// Substitutes every `{{ name }}` placeholder in `query`.
pub fn render_template_query(query: &str, params: &Params) -> Result<String, TemplateError> {
    let mut rendered = String::with_capacity(query.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(query) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let value = params
            .get(name.as_str())
            .ok_or_else(|| TemplateError::MissingParameter(name.as_str().to_string()))?;

        rendered.push_str(&query[last..whole.start()]);
        rendered.push_str(&param_text(value));
        last = whole.end();
    }

    rendered.push_str(&query[last..]);
    Ok(rendered)
}

fn param_text(value: &serde_json::Value) -> String {
    match Value::from(value.clone()) {
        Value::Array(items) => list_to_kusto(&items),
        other => other.as_string(),
    }
}

/// Target of a `.set-or-append` / `.set-or-replace` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCommand {
    pub table: String,
    pub folder: String,
    pub docstring: String,
    /// Replace the table contents instead of appending
    pub replace: bool,
}

impl SetCommand {
    pub fn new(
        table: impl Into<String>,
        folder: impl Into<String>,
        docstring: impl Into<String>,
    ) -> Self {
        SetCommand {
            table: table.into(),
            folder: folder.into(),
            docstring: docstring.into(),
            replace: false,
        }
    }

    pub fn replace(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }

    fn verb(&self) -> &'static str {
        if self.replace { "replace" } else { "append" }
    }
}

/// Wraps a rendered query in a command that stores its results in a table.
///
/// ```
/// use kusto_tool::template::{Params, SetCommand, render_set};
///
/// let cmd = SetCommand::new("StormEventsTake10", "myfolder", "mydocstring");
/// let text = render_set("StormEvents | take 10", &cmd, &Params::new()).unwrap();
/// assert_eq!(
///     text,
///     ".set-or-append StormEventsTake10\nwith (\nfolder = \"myfolder\",\ndocstring = \"mydocstring\",\n)\n<|\nStormEvents | take 10"
/// );
/// ```
pub fn render_set(query: &str, command: &SetCommand, params: &Params) -> Result<String, TemplateError> {
    let query = render_template_query(query, params)?;
    Ok(format!(
        ".set-or-{} {}\nwith (\nfolder = \"{}\",\ndocstring = \"{}\",\n)\n<|\n{}",
        command.verb(),
        command.table,
        command.folder,
        command.docstring,
        query
    ))
}
