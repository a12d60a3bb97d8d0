//! Render query templates and set commands

use super::CliError;
use crate::template::{Params, SetCommand, render_set, render_template_query};

/// Options for the render command
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Query template text
    pub query: String,
    /// Template parameters as a JSON object
    pub params: Option<String>,
}

/// Options for the set command
#[derive(Debug, Clone, Default)]
pub struct SetOptions {
    pub render: RenderOptions,
    /// Destination table
    pub table: String,
    /// Folder recorded in the table metadata
    pub folder: String,
    /// Docstring recorded in the table metadata
    pub docstring: String,
    /// Replace instead of append
    pub replace: bool,
}

fn parse_params(params: Option<&str>) -> Result<Params, CliError> {
    let Some(text) = params else {
        return Ok(Params::new());
    };
    match serde_json::from_str(text)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(CliError::InvalidParams(other.to_string())),
    }
}

/// Render a query template with its parameters
pub fn execute_render(options: &RenderOptions) -> Result<String, CliError> {
    let params = parse_params(options.params.as_deref())?;
    Ok(render_template_query(&options.query, &params)?)
}

/// Render a `.set-or-append` / `.set-or-replace` command
pub fn execute_set(options: &SetOptions) -> Result<String, CliError> {
    let params = parse_params(options.render.params.as_deref())?;
    let command = SetCommand::new(&options.table, &options.folder, &options.docstring)
        .replace(options.replace);
    Ok(render_set(&options.render.query, &command, &params)?)
}
