//! CLI support for kusto-tool
//!
//! Provides programmatic access to the `kusto` command's operations so they
//! can be embedded in other tools.

mod literal;
mod render;

pub use literal::json_to_literal;
pub use render::{RenderOptions, SetOptions, execute_render, execute_set};

use std::io;

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// Query building or rendering error
    Query(crate::Error),
    /// JSON parsing error
    Json(serde_json::Error),
    /// Parameters were valid JSON but not an object
    InvalidParams(String),
    /// IO error
    Io(io::Error),
    /// No input provided
    NoInput,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Query(e) => write!(f, "{}", e),
            CliError::Json(e) => write!(f, "Invalid JSON: {}", e),
            CliError::InvalidParams(got) => {
                write!(f, "Parameters must be a JSON object, got: {}", got)
            }
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::NoInput => write!(f, "No input provided. Pass it as an argument or pipe it to stdin."),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Query(e) => Some(e),
            CliError::Json(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<crate::Error> for CliError {
    fn from(e: crate::Error) -> Self {
        CliError::Query(e)
    }
}

impl From<crate::TemplateError> for CliError {
    fn from(e: crate::TemplateError) -> Self {
        CliError::Query(crate::Error::Template(e))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}
